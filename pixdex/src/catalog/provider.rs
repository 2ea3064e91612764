//! Catalog providers: where the item pool, content types and genres come from.

use super::{
    errors::CatalogResult,
    models::{ContentType, Genre, Item},
};
use async_trait::async_trait;
use log::warn;
use serde::{Deserialize, Serialize};

const BUNDLED_CATALOG: &str = include_str!("../../data/catalog.json");

/// Source of catalog data.
///
/// Implementations may hit the network; callers only ever see a
/// `CatalogResult`, never a transport type.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// All catalog items
    async fn items(&self) -> CatalogResult<Vec<Item>>;

    /// All content types
    async fn content_types(&self) -> CatalogResult<Vec<ContentType>>;

    /// All genres
    async fn genres(&self) -> CatalogResult<Vec<Genre>>;
}

/// Complete catalog contents as one serializable value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(alias = "tipos", default)]
    pub content_types: Vec<ContentType>,
    #[serde(alias = "generos", default)]
    pub genres: Vec<Genre>,
    #[serde(alias = "contenidos", default)]
    pub items: Vec<Item>,
}

/// In-memory catalog provider.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    snapshot: CatalogSnapshot,
}

impl StaticCatalog {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self { snapshot }
    }

    /// Catalog shipped with the crate, used when the remote catalog is
    /// unreachable.
    ///
    /// # Errors
    ///
    /// * `CatalogError::Decode` - Bundled data is malformed
    pub fn bundled() -> CatalogResult<Self> {
        let snapshot: CatalogSnapshot = serde_json::from_str(BUNDLED_CATALOG)?;
        Ok(Self::new(snapshot))
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }
}

#[async_trait]
impl CatalogProvider for StaticCatalog {
    async fn items(&self) -> CatalogResult<Vec<Item>> {
        Ok(self.snapshot.items.clone())
    }

    async fn content_types(&self) -> CatalogResult<Vec<ContentType>> {
        Ok(self.snapshot.content_types.clone())
    }

    async fn genres(&self) -> CatalogResult<Vec<Genre>> {
        Ok(self.snapshot.genres.clone())
    }
}

/// Provider that serves from `primary` and falls back to a static catalog
/// whenever `primary` fails.
pub struct FallbackCatalog<P> {
    primary: P,
    fallback: StaticCatalog,
}

impl<P: CatalogProvider> FallbackCatalog<P> {
    pub fn new(primary: P, fallback: StaticCatalog) -> Self {
        Self { primary, fallback }
    }

    /// Fall back to the bundled catalog.
    ///
    /// # Errors
    ///
    /// * `CatalogError::Decode` - Bundled data is malformed
    pub fn with_bundled(primary: P) -> CatalogResult<Self> {
        Ok(Self::new(primary, StaticCatalog::bundled()?))
    }
}

#[async_trait]
impl<P: CatalogProvider> CatalogProvider for FallbackCatalog<P> {
    async fn items(&self) -> CatalogResult<Vec<Item>> {
        match self.primary.items().await {
            Ok(items) => Ok(items),
            Err(e) => {
                warn!("Falling back to bundled items: {e}");
                self.fallback.items().await
            }
        }
    }

    async fn content_types(&self) -> CatalogResult<Vec<ContentType>> {
        match self.primary.content_types().await {
            Ok(types) => Ok(types),
            Err(e) => {
                warn!("Falling back to bundled content types: {e}");
                self.fallback.content_types().await
            }
        }
    }

    async fn genres(&self) -> CatalogResult<Vec<Genre>> {
        match self.primary.genres().await {
            Ok(genres) => Ok(genres),
            Err(e) => {
                warn!("Falling back to bundled genres: {e}");
                self.fallback.genres().await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogError;
    use std::collections::HashSet;

    struct Unreachable;

    #[async_trait]
    impl CatalogProvider for Unreachable {
        async fn items(&self) -> CatalogResult<Vec<Item>> {
            Err(CatalogError::Http("connection refused".to_string()))
        }

        async fn content_types(&self) -> CatalogResult<Vec<ContentType>> {
            Err(CatalogError::Http("connection refused".to_string()))
        }

        async fn genres(&self) -> CatalogResult<Vec<Genre>> {
            Err(CatalogError::Http("connection refused".to_string()))
        }
    }

    #[test]
    fn test_bundled_catalog_parses() {
        let catalog = StaticCatalog::bundled().expect("bundled catalog should parse");
        let snapshot = catalog.snapshot();

        assert_eq!(snapshot.content_types.len(), 3);
        assert!(!snapshot.genres.is_empty());
        assert!(snapshot.items.len() >= 4);
    }

    #[test]
    fn test_bundled_items_unique_and_reference_known_ids() {
        let snapshot = StaticCatalog::bundled().unwrap().snapshot().clone();

        let ids: HashSet<_> = snapshot.items.iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), snapshot.items.len(), "item ids must be unique");

        let type_ids: HashSet<_> = snapshot.content_types.iter().map(|t| t.id).collect();
        let genre_ids: HashSet<_> = snapshot.genres.iter().map(|g| g.id).collect();
        for item in &snapshot.items {
            assert!(type_ids.contains(&item.type_id), "{} has unknown type", item.name);
            assert!(
                item.genre_ids.iter().all(|g| genre_ids.contains(g)),
                "{} has unknown genre",
                item.name
            );
        }
    }

    #[tokio::test]
    async fn test_fallback_serves_bundled_data_on_error() {
        let provider = FallbackCatalog::with_bundled(Unreachable).unwrap();
        let bundled = StaticCatalog::bundled().unwrap();

        assert_eq!(provider.items().await.unwrap(), bundled.snapshot().items);
        assert_eq!(
            provider.content_types().await.unwrap(),
            bundled.snapshot().content_types
        );
        assert_eq!(provider.genres().await.unwrap(), bundled.snapshot().genres);
    }

    #[tokio::test]
    async fn test_fallback_prefers_primary() {
        let primary = StaticCatalog::new(CatalogSnapshot {
            items: vec![Item::new(99, "Primary Only")],
            ..Default::default()
        });
        let provider = FallbackCatalog::with_bundled(primary).unwrap();

        let items = provider.items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 99);
    }
}
