use estante_config::{CONFIG_BACKEND, ConfigBackend, ConfigError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CatalogConfig {
  /// Raíz del catálogo; las búsquedas y los enlaces relativos cuelgan de aquí.
  #[serde(default = "default_base_url")]
  pub base_url: String,

  #[serde(default = "default_user_agent")]
  pub user_agent: String,

  /// Timeout de cada petición HTTP, en segundos.
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_base_url() -> String {
  "https://www.goodreads.com".into()
}

fn default_user_agent() -> String {
  concat!("estante/", env!("CARGO_PKG_VERSION")).into()
}

fn default_timeout_secs() -> u64 {
  20
}

impl Default for CatalogConfig {
  fn default() -> Self {
    CatalogConfig {
      base_url: default_base_url(),
      user_agent: default_user_agent(),
      timeout_secs: default_timeout_secs(),
    }
  }
}

impl CatalogConfig {
  pub fn load() -> Result<Self, ConfigError> {
    let cfg = CONFIG_BACKEND.load_section_with_default("catalog")?;
    CONFIG_BACKEND.save_section("catalog", &cfg)?;
    Ok(cfg)
  }

  pub fn save(&self) -> Result<(), ConfigError> {
    CONFIG_BACKEND.save_section("catalog", self)
  }
}
