use url::Url;

/// Versión ASCII de un nombre ("Gabriel García Márquez" → "Gabriel Garcia Marquez").
///
/// El buscador del catálogo trabaja mejor con nombres transliterados, y la
/// comparación de resultados se hace sobre esta misma forma.
pub fn transliterate(name: &str) -> String {
  deunicode::deunicode(name).split_whitespace().collect::<Vec<_>>().join(" ")
}

/// URL de búsqueda: `<base>/search?q=Isaac+Asimov`.
pub fn search_url(base: &Url, query: &str) -> Result<Url, url::ParseError> {
  let mut url = base.join("/search")?;
  url.query_pairs_mut().append_pair("q", &transliterate(query));
  Ok(url)
}

/// `true` si el nombre de un resultado contiene la consulta, ambos
/// transliterados y sin distinguir mayúsculas.
pub fn name_matches(candidate: &str, query: &str) -> bool {
  let needle = transliterate(query).to_lowercase();
  !needle.is_empty() && transliterate(candidate).to_lowercase().contains(&needle)
}
