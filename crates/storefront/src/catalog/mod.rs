//! Product catalog API client.
//!
//! Fetches product detail JSON from the catalog service with `reqwest` and
//! caches responses using `moka` (5-minute TTL). The catalog renders its
//! own listing pages; the storefront only needs single-product lookups for
//! the quick-view fragment and modal adds.

mod types;

pub use types::{
    DISCRETE_BOUNDS, DISCRETE_PRESETS, ProductDetail, QuantityBounds, WEIGHED_BOUNDS,
    WEIGHED_PRESETS,
};

use std::sync::Arc;
use std::time::Duration;

use huerta_core::ProductId;
use moka::future::Cache;
use thiserror::Error;
use tracing::instrument;

use crate::config::CatalogConfig;

/// Errors from the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport-level failure (DNS, connect, timeout).
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Catalog returned a non-success status.
    #[error("catalog returned HTTP {0}")]
    Status(u16),

    /// The product does not exist.
    #[error("product not found")]
    NotFound,

    /// Catalog returned a body we could not parse.
    #[error("catalog response parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Client for the product catalog API.
///
/// Cheaply cloneable; product lookups are cached for 5 minutes.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, ProductDetail>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.trim_end_matches('/').to_string(),
                cache,
            }),
        }
    }

    /// Fetch one product by ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for unknown products, `Http`/`Status`
    /// for transport and server failures, and `Parse` for malformed bodies.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &ProductId) -> Result<ProductDetail, CatalogError> {
        let key = id.to_string();
        if let Some(hit) = self.inner.cache.get(&key).await {
            return Ok(hit);
        }

        let url = format!("{}/api/producto/{key}/", self.inner.base_url);
        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound);
        }

        // Read the body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog returned non-success status"
            );
            return Err(CatalogError::Status(status.as_u16()));
        }

        let product: ProductDetail = serde_json::from_str(&body).inspect_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
        })?;

        self.inner.cache.insert(key, product.clone()).await;
        Ok(product)
    }
}
