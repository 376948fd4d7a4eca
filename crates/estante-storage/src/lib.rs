pub mod config;
pub mod json_store;

pub use config::StorageConfig;
pub use json_store::JsonRegistryStore;
