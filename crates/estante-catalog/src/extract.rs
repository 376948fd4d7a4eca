//! Extracción de datos desde el HTML del catálogo.
//!
//! Funciones puras sobre el texto de la página: no hacen red. La ficha de
//! autor se organiza en pares `<div>Título</div><div>valor</div>`; cada
//! sección se localiza por el texto exacto de su título.

use estante_core::ports::{AuthorDetails, InfluenceRef, ResolvedAuthor};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::query::name_matches;

fn selector(css: &str) -> Selector {
  Selector::parse(css).expect("static selector")
}

fn absolute(base: &Url, href: &str) -> Option<String> {
  base.join(href.trim()).ok().map(String::from)
}

/// Un href ya absoluto se guarda tal cual; sólo los relativos se resuelven.
fn verbatim_or_joined(base: &Url, href: &str) -> Option<String> {
  let href = href.trim();
  match Url::parse(href) {
    Ok(_) => Some(href.to_string()),
    Err(_) => absolute(base, href),
  }
}

fn text_of(el: ElementRef<'_>) -> String {
  el.text().collect::<String>().trim().to_string()
}

/// `<div>` hermano que sigue al `<div>` cuyo texto es exactamente `title`.
fn section_body<'a>(doc: &'a Html, title: &str) -> Option<ElementRef<'a>> {
  let divs = selector("div");
  let heading = doc.select(&divs).find(|div| text_of(*div) == title)?;
  heading.next_siblings().filter_map(ElementRef::wrap).find(|el| el.value().name() == "div")
}

/// Resultados de búsqueda como pares `(nombre, url)`, en orden de aparición.
pub fn search_results(html: &str, base: &Url) -> Vec<(String, String)> {
  let doc = Html::parse_document(html);
  let links = selector("div.authorName__container > a[href]");
  let name = selector("span");

  doc
    .select(&links)
    .filter_map(|a| {
      let span = a.select(&name).next()?;
      let href = absolute(base, a.value().attr("href")?)?;
      Some((text_of(span), href))
    })
    .collect()
}

/// Primer resultado cuyo nombre contiene la consulta.
pub fn find_author(html: &str, base: &Url, query: &str) -> Option<ResolvedAuthor> {
  search_results(html, base)
    .into_iter()
    .find(|(name, _)| name_matches(name, query))
    .map(|(name, url)| ResolvedAuthor { name, url })
}

/// Influencias declaradas en la ficha; vacío si la sección no existe.
///
/// El texto largo viene duplicado (versión recortada + completa); se usa
/// el último `<span>`, que es la versión completa.
pub fn influences(html: &str, base: &Url) -> Vec<InfluenceRef> {
  let doc = Html::parse_document(html);
  let Some(body) = section_body(&doc, "Influences") else {
    return Vec::new();
  };
  let Some(full) = body.select(&selector("span")).last() else {
    return Vec::new();
  };

  full
    .select(&selector("a[href]"))
    .filter_map(|a| {
      let name = a.value().attr("title").map(str::trim).map(String::from).unwrap_or_else(|| text_of(a));
      let url = absolute(base, a.value().attr("href")?)?;
      (!name.is_empty()).then_some(InfluenceRef { name, url })
    })
    .collect()
}

/// Web personal y géneros de la ficha.
pub fn details(html: &str, base: &Url) -> AuthorDetails {
  let doc = Html::parse_document(html);
  let links = selector("a[href]");

  let website = section_body(&doc, "Website")
    .and_then(|body| body.select(&links).next())
    .and_then(|a| a.value().attr("href"))
    .and_then(|href| verbatim_or_joined(base, href));

  let genres = section_body(&doc, "Genre")
    .map(|body| body.select(&links).map(text_of).filter(|g| !g.is_empty()).collect())
    .unwrap_or_default();

  AuthorDetails { website, genres }
}
