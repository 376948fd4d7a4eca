use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use estante_core::ports::{RegistryStore, StoreError};

use crate::config::StorageConfig;

/// Guarda el registro en un único archivo JSON (`myauthors.json`).
///
/// Las escrituras son atómicas: un corte a mitad de guardado deja el
/// archivo anterior intacto.
#[derive(Debug, Clone)]
pub struct JsonRegistryStore {
  path: PathBuf,
}

impl JsonRegistryStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn from_config(cfg: &StorageConfig) -> Self {
    Self::new(cfg.state_file.clone())
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl RegistryStore for JsonRegistryStore {
  fn load(&self) -> Result<Vec<u8>, StoreError> {
    debug!(path = %self.path.display(), "reading registry");
    std::fs::read(&self.path).map_err(|e| match e.kind() {
      ErrorKind::NotFound => StoreError::Missing(self.location()),
      _ => StoreError::Io(format!("{}: {e}", self.path.display())),
    })
  }

  fn save(&self, bytes: &[u8]) -> Result<(), StoreError> {
    debug!(path = %self.path.display(), bytes = bytes.len(), "writing registry");
    estante_fs::atomic_write(&self.path, bytes).map_err(|e| StoreError::Io(format!("{}: {e}", self.path.display())))
  }

  fn location(&self) -> String {
    self.path.display().to_string()
  }
}
