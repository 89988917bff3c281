//! Seed the catalog from a YAML file.
//!
//! ```yaml
//! products:
//!   - name: Aviator Classic
//!     category: Sunglasses
//!     price: "2499"
//!     original_price: "3299"
//!     description: Gold metal frame with polarized green lenses.
//!     features: [Polarized, UV400]
//! ```
//!
//! Every product is validated before the database is touched.

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use clearsight_storefront::db::{self, ProductRepository};
use clearsight_storefront::models::NewProduct;

use super::database_url;

/// Top-level layout of the seed file.
#[derive(Debug, Deserialize)]
struct CatalogSeed {
    products: Vec<NewProduct>,
}

/// Insert every product in `file_path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, any product fails
/// validation, or an insert fails.
pub async fn products(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading products from file");
    let content = tokio::fs::read_to_string(path).await?;
    let seed: CatalogSeed = serde_yaml::from_str(&content)?;
    info!(products = seed.products.len(), "Parsed seed file");

    let mut valid = Vec::with_capacity(seed.products.len());
    let mut failures = 0_usize;
    for product in seed.products {
        let name = product.name.clone();
        match product.validate() {
            Ok(p) => valid.push(p),
            Err(e) => {
                error!(product = %name, error = %e, "Invalid product");
                failures += 1;
            }
        }
    }
    if failures > 0 {
        return Err(format!("{failures} products failed validation").into());
    }

    let pool = db::create_pool(&database_url()?).await?;
    let repo = ProductRepository::new(&pool);
    for product in &valid {
        let created = repo.create(product).await?;
        info!(product_id = %created.id, name = %created.name, "Inserted product");
    }

    info!(inserted = valid.len(), "Seeding complete!");
    Ok(())
}
