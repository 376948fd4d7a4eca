pub mod config;
pub mod extract;
pub mod goodreads;
pub mod query;

pub use config::CatalogConfig;
pub use goodreads::GoodreadsCatalog;
