use estante_config::{CONFIG_BACKEND, ConfigBackend, ConfigError, PATHS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionConfig {
  /// Destino del grafo en formato DOT (opción 1 del menú).
  #[serde(default = "default_graph_file")]
  pub graph_file: PathBuf,

  /// Cargar el registro guardado al arrancar.
  #[serde(default)]
  pub load_on_start: bool,

  /// Plazo máximo de cada consulta al catálogo, en segundos.
  #[serde(default = "default_deadline_secs")]
  pub deadline_secs: u64,
}

fn default_graph_file() -> PathBuf {
  PATHS.data_dir.join("influences.dot")
}

fn default_deadline_secs() -> u64 {
  estante_core::services::DEFAULT_DEADLINE.as_secs()
}

impl Default for SessionConfig {
  fn default() -> Self {
    SessionConfig { graph_file: default_graph_file(), load_on_start: false, deadline_secs: default_deadline_secs() }
  }
}

impl SessionConfig {
  pub fn load() -> Result<Self, ConfigError> {
    let cfg = CONFIG_BACKEND.load_section_with_default("session")?;
    CONFIG_BACKEND.save_section("session", &cfg)?;
    Ok(cfg)
  }
}
