//! Bucle interactivo: un prompt principal y, tras `preview`, un menú numérico.

use std::io::{self, Write};
use std::path::PathBuf;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

use estante_core::CoreError;
use estante_core::ports::{AuthorResolver, DetailFetcher, InfluenceFetcher, RegistryStore, StoreError};
use estante_core::services::{AddOutcome, Universe};

use crate::infrastructure::opener::LinkOpener;

const MAIN_PROMPT: &str = "Enter a new author name or type 'preview' to see previous searches: ";

const PREVIEW_PROMPT: &str = "Enter 1 to see a network of all your author searches and their influences, \
  2 to see the main genres your last search writes for, \
  3 to see your last search's personal website, \
  4 to open the Amazon page for their books, \
  5 to save information about all your searched authors to the cache, \
  6 to load the saved cache: ";

/// Búsqueda de libros del autor. El nombre se inserta tal cual, sin escapar.
pub fn shop_url(author: &str) -> String {
  format!("https://www.amazon.com/s?k={author}")
}

/// Opciones del menú `preview`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewCommand {
  DrawGraph,
  Genres,
  Website,
  Shop,
  Save,
  Load,
}

impl PreviewCommand {
  /// `None` para cualquier entrada que no sea un número del menú.
  pub fn parse(input: &str) -> Option<Self> {
    let input = input.trim();
    if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
      return None;
    }
    match input.parse::<u32>().ok()? {
      1 => Some(PreviewCommand::DrawGraph),
      2 => Some(PreviewCommand::Genres),
      3 => Some(PreviewCommand::Website),
      4 => Some(PreviewCommand::Shop),
      5 => Some(PreviewCommand::Save),
      6 => Some(PreviewCommand::Load),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prompt {
  Main,
  Preview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
  Continue,
  Exit,
}

pub struct Session<R, D, I, S, O>
where
  R: AuthorResolver,
  D: DetailFetcher,
  I: InfluenceFetcher,
  S: RegistryStore,
  O: LinkOpener,
{
  universe: Universe<R, D, I>,
  store: S,
  opener: O,
  graph_file: PathBuf,
  /// Último autor añadido con éxito.
  last_search: Option<String>,
  prompt: Prompt,
}

impl<R, D, I, S, O> Session<R, D, I, S, O>
where
  R: AuthorResolver,
  D: DetailFetcher,
  I: InfluenceFetcher,
  S: RegistryStore,
  O: LinkOpener,
{
  pub fn new(universe: Universe<R, D, I>, store: S, opener: O, graph_file: PathBuf) -> Self {
    Self { universe, store, opener, graph_file, last_search: None, prompt: Prompt::Main }
  }

  pub fn universe(&self) -> &Universe<R, D, I> {
    &self.universe
  }

  pub fn last_search(&self) -> Option<&str> {
    self.last_search.as_deref()
  }

  pub fn prompt_text(&self) -> &'static str {
    match self.prompt {
      Prompt::Main => MAIN_PROMPT,
      Prompt::Preview => PREVIEW_PROMPT,
    }
  }

  /// Lee líneas de `input` hasta `exit`/`quit` o fin de entrada.
  pub async fn run<In, W>(&mut self, input: In, out: &mut W) -> io::Result<()>
  where
    In: AsyncBufRead + Unpin,
    W: Write,
  {
    let mut lines = input.lines();
    loop {
      write!(out, "{}", self.prompt_text())?;
      out.flush()?;

      let Some(line) = lines.next_line().await? else {
        writeln!(out)?;
        return Ok(());
      };

      if self.handle_line(&line, out).await? == Flow::Exit {
        return Ok(());
      }
    }
  }

  pub async fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Flow> {
    match self.prompt {
      Prompt::Preview => {
        self.prompt = Prompt::Main;
        if let Some(command) = PreviewCommand::parse(line) {
          self.preview(command, out)?;
        }
        Ok(Flow::Continue)
      }
      Prompt::Main => {
        let input = line.trim();
        match input {
          "" => {}
          "exit" | "quit" => return Ok(Flow::Exit),
          "preview" => self.prompt = Prompt::Preview,
          name => self.add(name, out).await?,
        }
        Ok(Flow::Continue)
      }
    }
  }

  /// Añade autores antes de abrir el prompt.
  pub async fn seed<N: AsRef<str>, W: Write>(&mut self, names: &[N], out: &mut W) -> io::Result<()> {
    for name in names {
      self.add(name.as_ref(), out).await?;
    }
    Ok(())
  }

  pub fn load<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
    match self.universe.load_from(&self.store) {
      Ok(()) => writeln!(out, "Loaded {} authors from {}", self.universe.registry().len(), self.store.location()),
      Err(CoreError::Store(StoreError::Missing(location))) => writeln!(out, "No saved authors at {location} yet"),
      Err(e) => {
        warn!(error = %e, "could not load registry");
        writeln!(out, "Could not load saved authors: {e}")
      }
    }
  }

  async fn add<W: Write>(&mut self, name: &str, out: &mut W) -> io::Result<()> {
    match self.universe.add_author(name).await {
      AddOutcome::Added(added) => {
        for notice in &added.notices {
          writeln!(out, "{}: {notice}", added.name)?;
        }
        let count = self.universe.author(&added.name).map_or(0, |r| r.influences().len());
        writeln!(out, "Added {} ({count} influences)", added.name)?;
        self.last_search = Some(added.name);
      }
      AddOutcome::NotFound => {
        writeln!(out, "Sorry, the catalog did not find {name:?}. Check the spelling or try another author")?;
      }
      AddOutcome::Unreachable(e) => {
        writeln!(out, "Could not reach the catalog ({e}). Nothing was changed, try again later")?;
      }
    }
    Ok(())
  }

  fn preview<W: Write>(&mut self, command: PreviewCommand, out: &mut W) -> io::Result<()> {
    match command {
      PreviewCommand::DrawGraph => self.draw_graph(out),
      PreviewCommand::Genres => {
        let Some(name) = self.require_last_search(out)? else { return Ok(()) };
        let genres = self.universe.author(name).map(|r| r.genres().join(", ")).unwrap_or_default();
        writeln!(out, "{name}")?;
        writeln!(out, "Genres: {genres}")
      }
      PreviewCommand::Website => {
        let Some(name) = self.require_last_search(out)? else { return Ok(()) };
        match self.universe.author(name).and_then(|r| r.website()) {
          Some(website) => writeln!(out, "Website: {website}"),
          None => writeln!(out, "Website: none on record"),
        }
      }
      PreviewCommand::Shop => {
        let Some(name) = self.require_last_search(out)? else { return Ok(()) };
        let url = shop_url(name);
        if let Err(e) = self.opener.open(&url) {
          warn!(url = %url, error = %e, "could not open browser");
        }
        writeln!(out, "Opening {url}")
      }
      PreviewCommand::Save => match self.universe.save_to(&self.store) {
        Ok(()) => writeln!(out, "Saved {} authors to {}", self.universe.registry().len(), self.store.location()),
        Err(e) => {
          warn!(error = %e, "could not save registry");
          writeln!(out, "Could not save: {e}")
        }
      },
      PreviewCommand::Load => self.load(out),
    }
  }

  fn require_last_search<W: Write>(&self, out: &mut W) -> io::Result<Option<&str>> {
    if self.last_search.is_none() {
      writeln!(out, "No author searched yet")?;
    }
    Ok(self.last_search.as_deref())
  }

  fn draw_graph<W: Write>(&self, out: &mut W) -> io::Result<()> {
    let graph = self.universe.to_drawable_graph();
    if graph.node_count() == 0 {
      return writeln!(out, "The influence graph is empty");
    }

    for node in graph.nodes() {
      let influences = graph.influences_of(node);
      if !influences.is_empty() {
        writeln!(out, "{node} -> {}", influences.join(", "))?;
      }
    }

    match estante_fs::atomic_write_str(&self.graph_file, &graph.to_dot()) {
      Ok(()) => writeln!(out, "Graph written to {}", self.graph_file.display()),
      Err(e) => {
        warn!(path = %self.graph_file.display(), error = %e, "could not write graph");
        writeln!(out, "Could not write graph: {e}")
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use async_trait::async_trait;
  use estante_core::ports::{AuthorDetails, CatalogError, InfluenceRef, ResolvedAuthor};
  use estante_storage::JsonRegistryStore;
  use std::cell::RefCell;
  use std::rc::Rc;
  use tempfile::{TempDir, tempdir};

  const ASIMOV: &str = "https://gr/author/16667.Isaac_Asimov";
  const WELLS: &str = "https://gr/author/880695.H_G_Wells";

  /// Catálogo fijo: Asimov con una influencia, Wells sin nada.
  #[derive(Clone, Copy)]
  struct StubCatalog;

  #[async_trait]
  impl AuthorResolver for StubCatalog {
    async fn resolve(&self, query: &str) -> Result<Option<ResolvedAuthor>, CatalogError> {
      Ok(match query {
        "Isaac Asimov" => Some(ResolvedAuthor { name: query.into(), url: ASIMOV.into() }),
        "hg wells" => Some(ResolvedAuthor { name: "H.G. Wells".into(), url: WELLS.into() }),
        "offline" => return Err(CatalogError::Transport("connection refused".into())),
        _ => None,
      })
    }
  }

  #[async_trait]
  impl DetailFetcher for StubCatalog {
    async fn fetch_details(&self, profile_url: &str) -> Result<AuthorDetails, CatalogError> {
      Ok(match profile_url {
        ASIMOV => AuthorDetails {
          website: Some("http://www.asimovonline.com".into()),
          genres: vec!["Science Fiction".into(), "Nonfiction".into()],
        },
        _ => AuthorDetails::default(),
      })
    }
  }

  #[async_trait]
  impl InfluenceFetcher for StubCatalog {
    async fn fetch_influences(&self, profile_url: &str) -> Result<Vec<InfluenceRef>, CatalogError> {
      Ok(match profile_url {
        ASIMOV => vec![InfluenceRef { name: "H.G. Wells".into(), url: WELLS.into() }],
        _ => vec![],
      })
    }
  }

  #[derive(Clone, Default)]
  struct RecordingOpener {
    opened: Rc<RefCell<Vec<String>>>,
  }

  impl LinkOpener for RecordingOpener {
    fn open(&self, url: &str) -> io::Result<()> {
      self.opened.borrow_mut().push(url.to_string());
      Ok(())
    }
  }

  type TestSession = Session<StubCatalog, StubCatalog, StubCatalog, JsonRegistryStore, RecordingOpener>;

  fn session_in(dir: &TempDir, opener: RecordingOpener) -> TestSession {
    let universe = Universe::new(StubCatalog, StubCatalog, StubCatalog);
    let store = JsonRegistryStore::new(dir.path().join("myauthors.json"));
    Session::new(universe, store, opener, dir.path().join("influences.dot"))
  }

  async fn feed(session: &mut TestSession, lines: &[&str]) -> String {
    let mut out = Vec::new();
    for line in lines {
      session.handle_line(line, &mut out).await.unwrap();
    }
    String::from_utf8(out).unwrap()
  }

  #[test]
  fn preview_menu_accepts_only_menu_numbers() {
    assert_eq!(PreviewCommand::parse("1"), Some(PreviewCommand::DrawGraph));
    assert_eq!(PreviewCommand::parse(" 5 "), Some(PreviewCommand::Save));
    assert_eq!(PreviewCommand::parse("6"), Some(PreviewCommand::Load));
    assert_eq!(PreviewCommand::parse("0"), None);
    assert_eq!(PreviewCommand::parse("7"), None);
    assert_eq!(PreviewCommand::parse("-1"), None);
    assert_eq!(PreviewCommand::parse("two"), None);
    assert_eq!(PreviewCommand::parse(""), None);
  }

  #[test]
  fn shop_url_is_not_escaped() {
    assert_eq!(shop_url("Isaac Asimov"), "https://www.amazon.com/s?k=Isaac Asimov");
  }

  #[tokio::test]
  async fn display_commands_before_any_search_fail_cleanly() {
    let dir = tempdir().unwrap();
    let mut session = session_in(&dir, RecordingOpener::default());

    let out = feed(&mut session, &["preview", "2", "preview", "3", "preview", "4"]).await;

    assert_eq!(out.matches("No author searched yet").count(), 3);
    assert_eq!(session.last_search(), None);
  }

  #[tokio::test]
  async fn added_author_becomes_the_last_search() {
    let dir = tempdir().unwrap();
    let opener = RecordingOpener::default();
    let mut session = session_in(&dir, opener.clone());

    let out = feed(&mut session, &["Isaac Asimov", "preview", "2", "preview", "3", "preview", "4"]).await;

    assert_eq!(session.last_search(), Some("Isaac Asimov"));
    assert!(out.contains("Added Isaac Asimov (1 influences)"));
    assert!(out.contains("Genres: Science Fiction, Nonfiction"));
    assert!(out.contains("Website: http://www.asimovonline.com"));
    assert_eq!(*opener.opened.borrow(), vec!["https://www.amazon.com/s?k=Isaac Asimov".to_string()]);
  }

  #[tokio::test]
  async fn resolved_name_replaces_the_query_as_last_search() {
    let dir = tempdir().unwrap();
    let mut session = session_in(&dir, RecordingOpener::default());

    let out = feed(&mut session, &["hg wells", "preview", "3"]).await;

    assert_eq!(session.last_search(), Some("H.G. Wells"));
    assert!(out.contains("H.G. Wells: the catalog has no influences on record"));
    assert!(out.contains("Website: none on record"));
  }

  #[tokio::test]
  async fn failures_keep_the_previous_last_search() {
    let dir = tempdir().unwrap();
    let mut session = session_in(&dir, RecordingOpener::default());

    let out = feed(&mut session, &["Isaac Asimov", "Zzzznonexistent", "offline"]).await;

    assert!(out.contains("did not find \"Zzzznonexistent\""));
    assert!(out.contains("Could not reach the catalog"));
    assert_eq!(session.last_search(), Some("Isaac Asimov"));
    assert_eq!(session.universe().registry().len(), 2);
  }

  #[tokio::test]
  async fn non_numeric_menu_input_is_a_silent_no_op() {
    let dir = tempdir().unwrap();
    let mut session = session_in(&dir, RecordingOpener::default());

    let out = feed(&mut session, &["preview", "genres"]).await;

    assert!(out.is_empty());
    assert_eq!(session.prompt_text(), MAIN_PROMPT);
    assert!(session.universe().registry().is_empty());
  }

  #[tokio::test]
  async fn draw_graph_lists_edges_and_writes_dot() {
    let dir = tempdir().unwrap();
    let mut session = session_in(&dir, RecordingOpener::default());

    let out = feed(&mut session, &["Isaac Asimov", "preview", "1"]).await;

    assert!(out.contains("Isaac Asimov -> H.G. Wells"));
    let dot = std::fs::read_to_string(dir.path().join("influences.dot")).unwrap();
    assert!(dot.contains("H.G. Wells"));
  }

  #[tokio::test]
  async fn save_then_load_in_a_new_session() {
    let dir = tempdir().unwrap();
    let mut first = session_in(&dir, RecordingOpener::default());
    let out = feed(&mut first, &["Isaac Asimov", "preview", "5"]).await;
    assert!(out.contains("Saved 2 authors to"));

    let mut second = session_in(&dir, RecordingOpener::default());
    let out = feed(&mut second, &["preview", "6", "preview", "1"]).await;

    assert!(out.contains("Loaded 2 authors from"));
    assert!(out.contains("Isaac Asimov -> H.G. Wells"));
    assert_eq!(second.universe().registry(), first.universe().registry());
  }

  #[tokio::test]
  async fn loading_without_a_saved_file_is_reported() {
    let dir = tempdir().unwrap();
    let mut session = session_in(&dir, RecordingOpener::default());

    let out = feed(&mut session, &["preview", "6"]).await;

    assert!(out.contains("No saved authors at"));
  }

  #[tokio::test]
  async fn run_stops_on_exit_and_on_end_of_input() {
    let dir = tempdir().unwrap();
    let mut session = session_in(&dir, RecordingOpener::default());

    let mut out = Vec::new();
    session.run(&b"\nIsaac Asimov\nexit\nhg wells\n"[..], &mut out).await.unwrap();
    assert_eq!(session.last_search(), Some("Isaac Asimov"));

    let mut out = Vec::new();
    session.run(&b"hg wells"[..], &mut out).await.unwrap();
    assert_eq!(session.last_search(), Some("H.G. Wells"));
    assert!(String::from_utf8(out).unwrap().starts_with(MAIN_PROMPT));
  }

  #[tokio::test]
  async fn seed_adds_authors_before_the_prompt() {
    let dir = tempdir().unwrap();
    let mut session = session_in(&dir, RecordingOpener::default());

    let mut out = Vec::new();
    session.seed(&["Isaac Asimov", "hg wells"], &mut out).await.unwrap();

    assert_eq!(session.last_search(), Some("H.G. Wells"));
    assert!(session.universe().author("H.G. Wells").unwrap().was_searched());
  }
}
