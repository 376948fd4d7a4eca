use serde::{Deserialize, Deserializer, Serialize};

/// Todo lo que se sabe de un autor, acumulado progresivamente.
///
/// El nombre no forma parte del registro: es la clave en [`Registry`].
/// Cada campo tiene su propia operación "dueña" y permanece ausente hasta
/// que esa operación se ejecuta para este autor:
///
/// - `url`       → resolución del autor, o una referencia como influencia
/// - `website`   → consulta de detalles (puede quedar en `null`)
/// - `genres`    → consulta de detalles
/// - `influence` → solo tras un `add_author` explícito
///
/// [`Registry`]: crate::domain::Registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRecord {
  /// URL canónica del perfil en el catálogo.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,

  /// `None` = detalles nunca consultados, `Some(None)` = consultados sin web.
  #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
  pub website: Option<Option<String>>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub genres: Option<Vec<String>>,

  /// Nombres de las influencias declaradas, en el orden del catálogo.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub influence: Option<Vec<String>>,
}

// Un `null` explícito debe distinguirse de una clave ausente.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
  D: Deserializer<'de>,
{
  Option::<String>::deserialize(deserializer).map(Some)
}

impl AuthorRecord {
  pub fn url(&self) -> Option<&str> {
    self.url.as_deref()
  }

  pub fn website(&self) -> Option<&str> {
    self.website.as_ref().and_then(|w| w.as_deref())
  }

  pub fn genres(&self) -> &[String] {
    self.genres.as_deref().unwrap_or_default()
  }

  pub fn influences(&self) -> &[String] {
    self.influence.as_deref().unwrap_or_default()
  }

  /// `true` si ya se consultaron los detalles (web y géneros) de este autor.
  pub fn has_details(&self) -> bool {
    self.website.is_some() || self.genres.is_some()
  }

  /// `true` si el autor fue añadido explícitamente y no solo referenciado.
  pub fn was_searched(&self) -> bool {
    self.influence.is_some()
  }
}
