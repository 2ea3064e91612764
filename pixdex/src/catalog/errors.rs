//! Catalog error types.

use super::models::{GenreId, ItemId, TypeId};
use thiserror::Error;

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Remote catalog could not be reached or answered with a failure status
    #[error("Catalog request failed: {0}")]
    Http(String),

    /// Remote catalog answered with a body that is not a valid catalog
    #[error("Invalid catalog data: {0}")]
    Decode(#[from] serde_json::Error),

    /// Item not found
    #[error("Item {0} not found")]
    ItemNotFound(ItemId),

    /// Content type not found
    #[error("Content type {0} not found")]
    TypeNotFound(TypeId),

    /// Genre not found
    #[error("Genre {0} not found")]
    GenreNotFound(GenreId),
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
