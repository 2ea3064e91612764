//! Catalog data models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Catalog item ID type
pub type ItemId = i64;

/// Content type ID type
pub type TypeId = i64;

/// Genre ID type
pub type GenreId = i64;

/// A piece of audiovisual content (show, movie, anime).
///
/// Field aliases accept the JSON shape served by the catalog API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(alias = "imageUrl")]
    pub image_url: String,
    #[serde(alias = "descripcion", default)]
    pub description: String,
    #[serde(alias = "tipoId")]
    pub type_id: TypeId,
    #[serde(alias = "generos", default)]
    pub genre_ids: BTreeSet<GenreId>,
}

impl Item {
    #[must_use]
    pub fn new(id: ItemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            image_url: String::new(),
            description: String::new(),
            type_id: 0,
            genre_ids: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_type(mut self, type_id: TypeId) -> Self {
        self.type_id = type_id;
        self
    }

    #[must_use]
    pub fn with_genres(mut self, genre_ids: impl IntoIterator<Item = GenreId>) -> Self {
        self.genre_ids = genre_ids.into_iter().collect();
        self
    }

    /// Whether this item is tagged with any of `genres`.
    pub fn has_any_genre(&self, genres: &BTreeSet<GenreId>) -> bool {
        !self.genre_ids.is_disjoint(genres)
    }
}

/// Kind of content (series, movie, anime)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentType {
    pub id: TypeId,
    pub singular: String,
    pub plural: String,
}

/// Content genre
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    #[serde(alias = "nombre")]
    pub name: String,
}

/// Browse filter: selected content types and genres.
///
/// An empty set does not restrict that axis. An item matches when its type is
/// selected and it carries at least one selected genre.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFilter {
    pub types: BTreeSet<TypeId>,
    pub genres: BTreeSet<GenreId>,
}

impl CatalogFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_types(mut self, types: impl IntoIterator<Item = TypeId>) -> Self {
        self.types = types.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_genres(mut self, genres: impl IntoIterator<Item = GenreId>) -> Self {
        self.genres = genres.into_iter().collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.genres.is_empty()
    }

    pub fn matches(&self, item: &Item) -> bool {
        let type_ok = self.types.is_empty() || self.types.contains(&item.type_id);
        let genre_ok = self.genres.is_empty() || item.has_any_genre(&self.genres);
        type_ok && genre_ok
    }
}
