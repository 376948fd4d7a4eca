// crates/estante-core/src/errors.rs
use thiserror::Error;

use crate::ports::StoreError;

/// Error genérico del núcleo de Estante.
///
/// Los fallos de red del catálogo no aparecen aquí: `Universe::add_author`
/// los convierte en `AddOutcome::Unreachable`. Solo la persistencia del
/// registro puede fallar como error.
#[derive(Debug, Error)]
pub enum CoreError {
  #[error("codec error: {0}")]
  Codec(#[from] serde_json::Error),

  #[error("store error: {0}")]
  Store(#[from] StoreError),
}
