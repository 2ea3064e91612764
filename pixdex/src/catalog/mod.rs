//! Catalog module: audiovisual content, content types and genres.
//!
//! This module implements:
//! - Catalog models with the field names the catalog API serves
//! - `CatalogProvider` trait for pluggable data sources
//! - A bundled dataset and a fallback provider that serves it when the
//!   primary source fails
//! - `Catalog`: lookups by id/type, type+genre filtering and game pool
//!   selection
//!
//! ## Example
//!
//! ```
//! use pixdex::catalog::{Catalog, CatalogFilter, StaticCatalog};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = StaticCatalog::bundled()?;
//!     let catalog = Catalog::load(&provider).await?;
//!
//!     let anime = catalog.game_pool(&CatalogFilter::new().with_types([3]));
//!     println!("{} anime titles to guess", anime.len());
//!     Ok(())
//! }
//! ```

pub mod browse;
pub mod errors;
pub mod models;
pub mod provider;

pub use browse::Catalog;
pub use errors::{CatalogError, CatalogResult};
pub use models::{CatalogFilter, ContentType, Genre, GenreId, Item, ItemId, TypeId};
pub use provider::{CatalogProvider, CatalogSnapshot, FallbackCatalog, StaticCatalog};
