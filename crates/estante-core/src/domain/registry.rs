use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use crate::domain::author::AuthorRecord;

/// Mapa nombre → [`AuthorRecord`]; el almacén autoritativo de todo lo conocido.
///
/// Todas las escrituras son *upserts*: crean la entrada si no existe y solo
/// tocan el campo que les corresponde.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
  authors: BTreeMap<String, AuthorRecord>,
}

impl Registry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, name: &str) -> Option<&AuthorRecord> {
    self.authors.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.authors.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.authors.len()
  }

  pub fn is_empty(&self) -> bool {
    self.authors.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &AuthorRecord)> {
    self.authors.iter().map(|(name, record)| (name.as_str(), record))
  }

  /// URL ya conocida para `name`, si la hay.
  pub fn known_url(&self, name: &str) -> Option<&str> {
    self.get(name).and_then(AuthorRecord::url)
  }

  fn entry(&mut self, name: &str) -> &mut AuthorRecord {
    self.authors.entry(name.to_string()).or_default()
  }

  /// Reemplaza la URL (resultado de una resolución verificada).
  pub fn set_url(&mut self, name: &str, url: impl Into<String>) {
    self.entry(name).url = Some(url.into());
  }

  /// Registra la URL solo si el autor aún no tiene una.
  ///
  /// Devuelve `true` si la URL se escribió.
  pub fn fill_url(&mut self, name: &str, url: impl Into<String>) -> bool {
    let record = self.entry(name);
    if record.url.is_some() {
      return false;
    }
    record.url = Some(url.into());
    true
  }

  pub fn set_details(&mut self, name: &str, website: Option<String>, genres: Vec<String>) {
    let record = self.entry(name);
    record.website = Some(website);
    record.genres = Some(genres);
  }

  pub fn set_influence(&mut self, name: &str, influence: Vec<String>) {
    self.entry(name).influence = Some(influence);
  }

  /// JSON con sangría de 4 espacios y claves ordenadas.
  pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    self.serialize(&mut ser)?;
    Ok(out)
  }

  pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
    serde_json::from_slice(bytes)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fill_url_never_overwrites() {
    let mut registry = Registry::new();

    assert!(registry.fill_url("H.G. Wells", "https://gr/wells-from-page"));
    assert!(!registry.fill_url("H.G. Wells", "https://gr/other"));
    assert_eq!(registry.known_url("H.G. Wells"), Some("https://gr/wells-from-page"));

    registry.set_url("H.G. Wells", "https://gr/wells-resolved");
    assert_eq!(registry.known_url("H.G. Wells"), Some("https://gr/wells-resolved"));
  }

  #[test]
  fn upserts_only_touch_their_own_field() {
    let mut registry = Registry::new();
    registry.set_details("Ursula K. Le Guin", Some("https://ursulakleguin.com".into()), vec!["Fantasy".into()]);
    registry.set_url("Ursula K. Le Guin", "https://gr/leguin");
    registry.set_influence("Ursula K. Le Guin", vec!["Lao Tzu".into()]);
    registry.set_details("Ursula K. Le Guin", None, vec![]);

    let record = registry.get("Ursula K. Le Guin").unwrap();
    assert_eq!(record.url(), Some("https://gr/leguin"));
    assert_eq!(record.website, Some(None));
    assert_eq!(record.genres, Some(vec![]));
    assert_eq!(record.influences(), ["Lao Tzu".to_string()]);
  }

  #[test]
  fn reads_the_legacy_state_file_shape() {
    let text = br#"{
      "Isaac Asimov": {
        "url": "https://www.goodreads.com/author/show/16667.Isaac_Asimov",
        "website": null,
        "genres": ["Science Fiction"],
        "influence": ["H.G. Wells"]
      },
      "H.G. Wells": { "url": "https://www.goodreads.com/author/show/880695.H_G_Wells" }
    }"#;

    let registry = Registry::from_json(text).unwrap();

    assert_eq!(registry.len(), 2);
    let asimov = registry.get("Isaac Asimov").unwrap();
    assert_eq!(asimov.website, Some(None));
    assert_eq!(asimov.influences(), ["H.G. Wells".to_string()]);
    assert!(!registry.get("H.G. Wells").unwrap().has_details());
  }

  #[test]
  fn json_is_indented_and_reloadable() {
    let mut registry = Registry::new();
    registry.set_url("b", "u2");
    registry.set_url("a", "u1");
    registry.set_details("a", None, vec!["Horror".into()]);

    let bytes = registry.to_json().unwrap();
    let text = String::from_utf8(bytes.clone()).unwrap();
    assert!(text.starts_with("{\n    \"a\": {\n        \"url\""));
    assert!(text.find("\"a\"").unwrap() < text.find("\"b\"").unwrap());

    assert_eq!(Registry::from_json(&bytes).unwrap(), registry);
  }
}
