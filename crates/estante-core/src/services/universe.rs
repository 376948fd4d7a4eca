use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::{AuthorRecord, InfluenceGraph, Registry};
use crate::errors::CoreError;
use crate::ports::{
  AuthorDetails, AuthorResolver, CatalogError, DetailFetcher, InfluenceFetcher, InfluenceRef, RegistryStore,
  ResolvedAuthor,
};

/// Plazo por defecto para cada llamada al catálogo.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(30);

/// Sección que la ficha del autor no tenía. Informativo, nunca fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
  NoInfluences,
  NoWebsite,
  NoGenres,
}

impl fmt::Display for Notice {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let text = match self {
      Notice::NoInfluences => "the catalog has no influences on record for this author, try another one",
      Notice::NoWebsite => "this author doesn't have a personal website listed",
      Notice::NoGenres => "no genres on record for this author",
    };
    f.write_str(text)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedAuthor {
  /// Nombre canónico con el que quedó registrado.
  pub name: String,
  pub notices: Vec<Notice>,
}

/// Resultado de [`Universe::add_author`].
#[derive(Debug, Clone)]
pub enum AddOutcome {
  Added(AddedAuthor),
  /// El buscador no encontró al autor. Nada cambió.
  NotFound,
  /// El catálogo falló o no respondió a tiempo. Nada cambió.
  Unreachable(CatalogError),
}

impl AddOutcome {
  pub fn name(&self) -> Option<&str> {
    match self {
      AddOutcome::Added(added) => Some(&added.name),
      _ => None,
    }
  }

  pub fn is_added(&self) -> bool {
    matches!(self, AddOutcome::Added(_))
  }
}

/// El universo de influencias: registro de autores más grafo dirigido.
///
/// Orquesta los tres ports del catálogo y mantiene el grafo alineado con
/// los campos `influence` del registro. Pensado para un único llamador;
/// las operaciones se ejecutan en secuencia, sin solaparse.
pub struct Universe<R, D, I>
where
  R: AuthorResolver,
  D: DetailFetcher,
  I: InfluenceFetcher,
{
  resolver: R,
  details: D,
  influences: I,
  deadline: Duration,
  registry: Registry,
  graph: InfluenceGraph,
}

impl<R, D, I> Universe<R, D, I>
where
  R: AuthorResolver,
  D: DetailFetcher,
  I: InfluenceFetcher,
{
  pub fn new(resolver: R, details: D, influences: I) -> Self {
    Self {
      resolver,
      details,
      influences,
      deadline: DEFAULT_DEADLINE,
      registry: Registry::new(),
      graph: InfluenceGraph::new(),
    }
  }

  /// Cambia el plazo máximo de cada llamada al catálogo.
  pub fn with_deadline(mut self, deadline: Duration) -> Self {
    self.deadline = deadline;
    self
  }

  pub fn registry(&self) -> &Registry {
    &self.registry
  }

  pub fn author(&self, name: &str) -> Option<&AuthorRecord> {
    self.registry.get(name)
  }

  /// El grafo tal cual, para que el colaborador de visualización lo dibuje.
  pub fn to_drawable_graph(&self) -> &InfluenceGraph {
    &self.graph
  }

  /// Busca al autor, descarga su ficha e influencias y lo integra.
  ///
  /// 1. Si `query` es un autor ya añadido con URL conocida, se reutiliza sin
  ///    buscar. Una URL que solo llegó como referencia de influencia no se
  ///    considera verificada: se busca igualmente, y solo se usa si el
  ///    buscador no devuelve nada.
  /// 2. Se piden detalles e influencias sobre esa URL.
  /// 3. Solo cuando las tres consultas terminaron se toca el registro, de
  ///    modo que `NotFound` y `Unreachable` nunca dejan cambios a medias.
  pub async fn add_author(&mut self, query: &str) -> AddOutcome {
    let verified = self.registry.get(query).filter(|r| r.was_searched()).and_then(AuthorRecord::url);

    let author = match verified {
      Some(url) => {
        debug!(query, url, "reusing known url");
        ResolvedAuthor { name: query.to_string(), url: url.to_string() }
      }
      None => match self.within(self.resolver.resolve(query)).await {
        Ok(Some(found)) => found,
        Ok(None) => match self.registry.known_url(query) {
          Some(url) => {
            debug!(query, url, "search found nothing, falling back to referenced url");
            ResolvedAuthor { name: query.to_string(), url: url.to_string() }
          }
          None => {
            info!(query, "author not found in catalog");
            return AddOutcome::NotFound;
          }
        },
        Err(e) => return catalog_unreachable(query, e),
      },
    };

    let details = match self.within(self.details.fetch_details(&author.url)).await {
      Ok(details) => details,
      Err(e) => return catalog_unreachable(query, e),
    };

    let influences = match self.within(self.influences.fetch_influences(&author.url)).await {
      Ok(influences) => influences,
      Err(e) => return catalog_unreachable(query, e),
    };

    let count = influences.len();
    let added = self.apply(author, details, influences);
    info!(author = %added.name, influences = count, "author added");
    AddOutcome::Added(added)
  }

  /// Añade varios autores en orden; los fallos no detienen al resto.
  pub async fn seed<S: AsRef<str>>(&mut self, queries: &[S]) -> Vec<(String, AddOutcome)> {
    let mut outcomes = Vec::with_capacity(queries.len());
    for query in queries {
      let query = query.as_ref();
      let outcome = self.add_author(query).await;
      outcomes.push((query.to_string(), outcome));
    }
    outcomes
  }

  /// Pre-registra URLs. Igual que con las influencias, una URL ya conocida
  /// no se sobrescribe.
  pub fn merge_urls<P, N, U>(&mut self, pairs: P)
  where
    P: IntoIterator<Item = (N, U)>,
    N: AsRef<str>,
    U: Into<String>,
  {
    for (name, url) in pairs {
      let name = name.as_ref();
      self.registry.fill_url(name, url);
      self.graph.ensure_node(name);
    }
  }

  /// Codifica el registro (no el grafo) en JSON.
  pub fn serialize(&self) -> Result<Vec<u8>, CoreError> {
    Ok(self.registry.to_json()?)
  }

  /// Reemplaza el registro por el contenido de `bytes` y reconstruye el
  /// grafo a partir de los campos `influence`.
  ///
  /// Si los bytes no son válidos el estado actual queda intacto.
  pub fn deserialize(&mut self, bytes: &[u8]) -> Result<(), CoreError> {
    let registry = Registry::from_json(bytes)?;
    self.graph = InfluenceGraph::from_registry(&registry);
    self.registry = registry;
    Ok(())
  }

  pub fn save_to<S: RegistryStore>(&self, store: &S) -> Result<(), CoreError> {
    let bytes = self.serialize()?;
    store.save(&bytes)?;
    info!(authors = self.registry.len(), location = %store.location(), "registry saved");
    Ok(())
  }

  pub fn load_from<S: RegistryStore>(&mut self, store: &S) -> Result<(), CoreError> {
    let bytes = store.load()?;
    self.deserialize(&bytes)?;
    info!(authors = self.registry.len(), location = %store.location(), "registry loaded");
    Ok(())
  }

  fn apply(&mut self, author: ResolvedAuthor, details: AuthorDetails, influences: Vec<InfluenceRef>) -> AddedAuthor {
    let mut notices = Vec::new();
    if influences.is_empty() {
      notices.push(Notice::NoInfluences);
    }
    if details.website.is_none() {
      notices.push(Notice::NoWebsite);
    }
    if details.genres.is_empty() {
      notices.push(Notice::NoGenres);
    }

    let ResolvedAuthor { name, url } = author;
    self.registry.set_url(&name, url);
    self.registry.set_details(&name, details.website, details.genres);

    let mut names: Vec<String> = Vec::with_capacity(influences.len());
    for influence in influences {
      self.registry.fill_url(&influence.name, influence.url);
      if !names.contains(&influence.name) {
        names.push(influence.name);
      }
    }

    self.graph.set_influences(&name, &names);
    self.registry.set_influence(&name, names);

    AddedAuthor { name, notices }
  }

  async fn within<T, F>(&self, call: F) -> Result<T, CatalogError>
  where
    F: Future<Output = Result<T, CatalogError>>,
  {
    tokio::time::timeout(self.deadline, call).await.map_err(|_| CatalogError::Timeout(self.deadline))?
  }
}

fn catalog_unreachable(query: &str, err: CatalogError) -> AddOutcome {
  warn!(query, error = %err, "catalog unreachable, registry left untouched");
  AddOutcome::Unreachable(err)
}
