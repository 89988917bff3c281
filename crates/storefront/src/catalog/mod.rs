//! Product catalog.
//!
//! Active products are read from Postgres and cached with `moka`
//! (TTL from `STOREFRONT_CATALOG_CACHE_TTL_SECS`). Admin writes call
//! [`Catalog::invalidate_all`] so shoppers see changes immediately.

mod query;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::{debug, instrument};

use clearsight_core::ProductId;

pub use query::{ALL, InvalidPriceRange, PriceRange, ProductQuery, SortOrder, categories};

use crate::db::{ProductRepository, RepositoryError};
use crate::models::Product;

/// Cache key for catalog reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    ActiveProducts,
    Product(ProductId),
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Products(Arc<Vec<Product>>),
    Product(Option<Box<Product>>),
}

/// Read-through cache over the product table.
#[derive(Clone)]
pub struct Catalog {
    pool: PgPool,
    cache: Cache<CacheKey, CacheValue>,
}

impl Catalog {
    /// Create a catalog with the given cache TTL.
    #[must_use]
    pub fn new(pool: PgPool, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(ttl)
            .build();
        Self { pool, cache }
    }

    /// Active products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the products cannot be loaded.
    #[instrument(skip(self))]
    pub async fn active_products(&self) -> Result<Arc<Vec<Product>>, RepositoryError> {
        if let Some(CacheValue::Products(products)) =
            self.cache.get(&CacheKey::ActiveProducts).await
        {
            debug!("Cache hit for active products");
            return Ok(products);
        }

        let products = Arc::new(ProductRepository::new(&self.pool).list_active().await?);
        self.cache
            .insert(
                CacheKey::ActiveProducts,
                CacheValue::Products(Arc::clone(&products)),
            )
            .await;
        Ok(products)
    }

    /// An active product by id. Inactive products are treated as missing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the lookup fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn active_product(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let key = CacheKey::Product(id.clone());
        if let Some(CacheValue::Product(product)) = self.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(product.map(|p| *p));
        }

        let product = ProductRepository::new(&self.pool)
            .get(id)
            .await?
            .filter(|p| p.is_active);
        self.cache
            .insert(key, CacheValue::Product(product.clone().map(Box::new)))
            .await;
        Ok(product)
    }

    /// Filtered listing for a shopper query.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the products cannot be loaded.
    pub async fn search(&self, query: &ProductQuery) -> Result<Vec<Product>, RepositoryError> {
        Ok(query.apply(&self.active_products().await?))
    }

    /// Categories of active products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the products cannot be loaded.
    pub async fn categories(&self) -> Result<Vec<String>, RepositoryError> {
        Ok(categories(&self.active_products().await?))
    }

    /// Drop every cached entry.
    pub async fn invalidate_all(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }
}
