#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("io error: {0}")]
  Io(String),

  #[error("no saved registry at {0}")]
  Missing(String),
}

/// Port de persistencia del registro.
///
/// Trabaja con bytes ya codificados: el formato lo decide
/// `Universe::serialize`, el adapter solo decide dónde viven.
pub trait RegistryStore {
  fn load(&self) -> Result<Vec<u8>, StoreError>;
  fn save(&self, bytes: &[u8]) -> Result<(), StoreError>;

  /// Descripción legible de la ubicación (para mensajes al usuario).
  fn location(&self) -> String;
}
