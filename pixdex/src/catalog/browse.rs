//! Loaded catalog with the lookups and filters the browse screens need.

use super::{
    errors::{CatalogError, CatalogResult},
    models::{CatalogFilter, ContentType, Genre, GenreId, Item, ItemId, TypeId},
    provider::{CatalogProvider, CatalogSnapshot},
};
use log::{debug, info};
use std::collections::HashSet;

/// A loaded, read-only catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
    content_types: Vec<ContentType>,
    genres: Vec<Genre>,
}

impl Catalog {
    /// Fetch everything from `provider`.
    ///
    /// # Errors
    ///
    /// Propagates the first provider error.
    pub async fn load<P: CatalogProvider + ?Sized>(provider: &P) -> CatalogResult<Self> {
        let (items, content_types, genres) = tokio::try_join!(
            provider.items(),
            provider.content_types(),
            provider.genres()
        )?;

        let catalog = Self::from_snapshot(CatalogSnapshot {
            content_types,
            genres,
            items,
        });
        info!(
            "Catalog loaded: {} items, {} types, {} genres",
            catalog.items.len(),
            catalog.content_types.len(),
            catalog.genres.len()
        );
        Ok(catalog)
    }

    /// Build a catalog, keeping the first item seen for each id.
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Self {
        let mut seen = HashSet::with_capacity(snapshot.items.len());
        let total = snapshot.items.len();
        let items: Vec<Item> = snapshot
            .items
            .into_iter()
            .filter(|item| seen.insert(item.id))
            .collect();
        if items.len() != total {
            debug!("Dropped {} duplicate catalog items", total - items.len());
        }

        Self {
            items,
            content_types: snapshot.content_types,
            genres: snapshot.genres,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn content_types(&self) -> &[ContentType] {
        &self.content_types
    }

    pub fn genres(&self) -> &[Genre] {
        &self.genres
    }

    /// # Errors
    ///
    /// * `CatalogError::ItemNotFound` - No item with this id
    pub fn item_by_id(&self, id: ItemId) -> CatalogResult<&Item> {
        self.items
            .iter()
            .find(|item| item.id == id)
            .ok_or(CatalogError::ItemNotFound(id))
    }

    pub fn items_by_type(&self, type_id: TypeId) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|item| item.type_id == type_id)
            .collect()
    }

    pub fn filter(&self, filter: &CatalogFilter) -> Vec<&Item> {
        self.items.iter().filter(|item| filter.matches(item)).collect()
    }

    /// # Errors
    ///
    /// * `CatalogError::TypeNotFound` - No content type with this id
    pub fn content_type_by_id(&self, id: TypeId) -> CatalogResult<&ContentType> {
        self.content_types
            .iter()
            .find(|t| t.id == id)
            .ok_or(CatalogError::TypeNotFound(id))
    }

    /// # Errors
    ///
    /// * `CatalogError::GenreNotFound` - No genre with this id
    pub fn genre_by_id(&self, id: GenreId) -> CatalogResult<&Genre> {
        self.genres
            .iter()
            .find(|g| g.id == id)
            .ok_or(CatalogError::GenreNotFound(id))
    }

    /// Genres for `ids` in the order given; unknown ids are skipped.
    pub fn genres_by_ids<'a, I>(&self, ids: I) -> Vec<&Genre>
    where
        I: IntoIterator<Item = &'a GenreId>,
    {
        ids.into_iter()
            .filter_map(|id| self.genre_by_id(*id).ok())
            .collect()
    }

    pub fn genres_for_item(&self, item: &Item) -> Vec<&Genre> {
        self.genres_by_ids(&item.genre_ids)
    }

    /// Items eligible as hangman targets under `filter`.
    pub fn game_pool(&self, filter: &CatalogFilter) -> Vec<Item> {
        self.filter(filter).into_iter().cloned().collect()
    }
}
