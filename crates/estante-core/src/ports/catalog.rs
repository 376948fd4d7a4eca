use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
  #[error("transport error: {0}")]
  Transport(String),

  #[error("unexpected status {status} from {url}")]
  Status { status: u16, url: String },

  #[error("parse error: {0}")]
  Parse(String),

  #[error("no response within {0:?}")]
  Timeout(Duration),
}

/// Autor encontrado por el buscador del catálogo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAuthor {
  /// Nombre tal como lo muestra el catálogo; es la clave del registro.
  pub name: String,
  pub url: String,
}

/// Datos de la ficha del autor.
///
/// Una sección ausente en la página no es un error: `website` queda en
/// `None` y `genres` vacío.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorDetails {
  pub website: Option<String>,
  pub genres: Vec<String>,
}

/// Una influencia declarada en la ficha de otro autor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfluenceRef {
  pub name: String,
  pub url: String,
}

/// Port que traduce un nombre escrito por el usuario a un autor del catálogo.
#[async_trait]
pub trait AuthorResolver: Send + Sync {
  /// `Ok(None)` cuando la búsqueda no encuentra a nadie.
  async fn resolve(&self, query: &str) -> Result<Option<ResolvedAuthor>, CatalogError>;
}

/// Port que lee web y géneros desde la URL de perfil de un autor.
#[async_trait]
pub trait DetailFetcher: Send + Sync {
  async fn fetch_details(&self, profile_url: &str) -> Result<AuthorDetails, CatalogError>;
}

/// Port que lee la lista ordenada de influencias desde la URL de perfil.
#[async_trait]
pub trait InfluenceFetcher: Send + Sync {
  /// Lista vacía si el perfil no declara influencias.
  async fn fetch_influences(&self, profile_url: &str) -> Result<Vec<InfluenceRef>, CatalogError>;
}

#[async_trait]
impl<T: AuthorResolver + ?Sized> AuthorResolver for Arc<T> {
  async fn resolve(&self, query: &str) -> Result<Option<ResolvedAuthor>, CatalogError> {
    (**self).resolve(query).await
  }
}

#[async_trait]
impl<T: DetailFetcher + ?Sized> DetailFetcher for Arc<T> {
  async fn fetch_details(&self, profile_url: &str) -> Result<AuthorDetails, CatalogError> {
    (**self).fetch_details(profile_url).await
  }
}

#[async_trait]
impl<T: InfluenceFetcher + ?Sized> InfluenceFetcher for Arc<T> {
  async fn fetch_influences(&self, profile_url: &str) -> Result<Vec<InfluenceRef>, CatalogError> {
    (**self).fetch_influences(profile_url).await
  }
}
