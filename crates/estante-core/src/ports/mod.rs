pub mod catalog;
pub mod registry_store;

pub use catalog::{
  AuthorDetails, AuthorResolver, CatalogError, DetailFetcher, InfluenceFetcher, InfluenceRef, ResolvedAuthor,
};
pub use registry_store::{RegistryStore, StoreError};
