//! HTTP catalog provider for the Pixdex API.

use async_trait::async_trait;
use log::debug;
use pixdex::catalog::{CatalogError, CatalogProvider, CatalogResult, ContentType, Genre, Item};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default API base URL
pub const DEFAULT_API_URL: &str = "http://localhost:8081";

const CONTENT_PATH: &str = "/api/contenidos";
const TYPES_PATH: &str = "/api/tipos";
const GENRES_PATH: &str = "/api/generos";

/// Catalog fetched from the Pixdex HTTP API
pub struct HttpCatalog {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCatalog {
    /// Create a new catalog client
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> CatalogResult<T> {
        let url = self.url(path);
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Http(format!("GET {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(CatalogError::Http(format!(
                "GET {url}: status {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Http(format!("GET {url}: {e}")))?;

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl CatalogProvider for HttpCatalog {
    async fn items(&self) -> CatalogResult<Vec<Item>> {
        self.fetch(CONTENT_PATH).await
    }

    async fn content_types(&self) -> CatalogResult<Vec<ContentType>> {
        self.fetch(TYPES_PATH).await
    }

    async fn genres(&self) -> CatalogResult<Vec<Genre>> {
        self.fetch(GENRES_PATH).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixdex::catalog::{Catalog, FallbackCatalog};

    // Nothing listens on the discard port
    const UNREACHABLE: &str = "http://127.0.0.1:9";

    #[test]
    fn test_url_joins_without_double_slash() {
        let catalog = HttpCatalog::new("http://localhost:8081/");
        assert_eq!(catalog.base_url(), "http://localhost:8081");
        assert_eq!(catalog.url(CONTENT_PATH), "http://localhost:8081/api/contenidos");
    }

    #[tokio::test]
    async fn test_unreachable_api_is_http_error() {
        let catalog = HttpCatalog::new(UNREACHABLE);
        let err = catalog.items().await.unwrap_err();
        assert!(matches!(err, CatalogError::Http(_)));
    }

    #[tokio::test]
    async fn test_unreachable_api_falls_back_to_bundled() {
        let provider = FallbackCatalog::with_bundled(HttpCatalog::new(UNREACHABLE)).unwrap();
        let catalog = Catalog::load(&provider).await.unwrap();
        assert!(!catalog.items().is_empty());
        assert_eq!(catalog.content_types().len(), 3);
    }
}
