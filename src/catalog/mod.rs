pub mod client;
pub mod endpoint;
pub mod types;

pub use client::{CatalogClient, CatalogError, MovieCatalog};
pub use endpoint::Endpoint;
pub use types::{CatalogPayload, Movie};
