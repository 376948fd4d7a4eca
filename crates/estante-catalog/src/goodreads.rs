use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use estante_core::ports::{
  AuthorDetails, AuthorResolver, CatalogError, DetailFetcher, InfluenceFetcher, InfluenceRef, ResolvedAuthor,
};

use crate::config::CatalogConfig;
use crate::{extract, query};

/// Implementación de los ports de catálogo sobre Goodreads.
///
/// Es barato de clonar: `reqwest::Client` comparte internamente su pool de
/// conexiones, así que el mismo catálogo puede inyectarse en los tres ports.
#[derive(Clone)]
pub struct GoodreadsCatalog {
  client: Client,
  base: Url,
}

impl GoodreadsCatalog {
  pub fn new(cfg: &CatalogConfig) -> Result<Self, CatalogError> {
    let base = Url::parse(&cfg.base_url)
      .map_err(|e| CatalogError::Parse(format!("invalid base_url {:?}: {e}", cfg.base_url)))?;

    let client = Client::builder()
      .user_agent(cfg.user_agent.clone())
      .timeout(Duration::from_secs(cfg.timeout_secs))
      .build()
      .map_err(|e| CatalogError::Transport(format!("failed to build http client: {e}")))?;

    Ok(Self { client, base })
  }

  async fn fetch_page(&self, url: &str) -> Result<String, CatalogError> {
    debug!(url, "GET");
    let response = self.client.get(url).send().await.map_err(transport)?;

    let status = response.status();
    if !status.is_success() {
      return Err(CatalogError::Status { status: status.as_u16(), url: url.to_string() });
    }

    response.text().await.map_err(transport)
  }
}

fn transport(err: reqwest::Error) -> CatalogError {
  if err.is_timeout() {
    CatalogError::Transport(format!("request timed out: {err}"))
  } else {
    CatalogError::Transport(err.to_string())
  }
}

#[async_trait]
impl AuthorResolver for GoodreadsCatalog {
  async fn resolve(&self, name: &str) -> Result<Option<ResolvedAuthor>, CatalogError> {
    let url = query::search_url(&self.base, name).map_err(|e| CatalogError::Parse(e.to_string()))?;
    let html = self.fetch_page(url.as_str()).await?;
    Ok(extract::find_author(&html, &self.base, name))
  }
}

#[async_trait]
impl DetailFetcher for GoodreadsCatalog {
  async fn fetch_details(&self, profile_url: &str) -> Result<AuthorDetails, CatalogError> {
    let html = self.fetch_page(profile_url).await?;
    Ok(extract::details(&html, &self.base))
  }
}

#[async_trait]
impl InfluenceFetcher for GoodreadsCatalog {
  async fn fetch_influences(&self, profile_url: &str) -> Result<Vec<InfluenceRef>, CatalogError> {
    let html = self.fetch_page(profile_url).await?;
    Ok(extract::influences(&html, &self.base))
  }
}
