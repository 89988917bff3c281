//! Catalog product types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use clearsight_core::cart::{CandidateError, CartItemCandidate};
use clearsight_core::{Price, PriceError, ProductId, discount_percent};

/// Shown in place of a product image when none is set.
pub const PLACEHOLDER_IMAGE: &str = "👓";

const MIN_NAME_LENGTH: usize = 2;
const MIN_DESCRIPTION_LENGTH: usize = 10;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    /// List price before markdown, if the product is on sale.
    pub original_price: Option<Decimal>,
    pub description: Option<String>,
    pub features: Vec<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Markdown percentage when `original_price` exceeds `price`.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        self.original_price
            .and_then(|original| discount_percent(original, self.price))
    }

    /// Image reference, or the placeholder glyph.
    #[must_use]
    pub fn display_image(&self) -> &str {
        self.image_url
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(PLACEHOLDER_IMAGE)
    }

    /// Capture this product for the cart.
    ///
    /// # Errors
    ///
    /// Returns `CandidateError` if the stored price is negative.
    pub fn to_cart_candidate(&self) -> Result<CartItemCandidate, CandidateError> {
        CartItemCandidate::new(
            self.id.clone(),
            self.name.clone(),
            self.price,
            self.display_image(),
        )
    }
}

/// Validation failures for admin-submitted products.
#[derive(Debug, Error)]
pub enum ProductValidationError {
    #[error("product name must be at least {min} characters", min = MIN_NAME_LENGTH)]
    NameTooShort,
    #[error("please select a category")]
    MissingCategory,
    #[error(transparent)]
    Price(#[from] PriceError),
    #[error("description must be at least {min} characters", min = MIN_DESCRIPTION_LENGTH)]
    DescriptionTooShort,
    #[error("please enter a valid image URL: {0}")]
    InvalidImageUrl(#[from] url::ParseError),
}

/// Product submitted from the admin dashboard.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub price: Decimal,
    #[serde(default)]
    pub original_price: Option<Decimal>,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl NewProduct {
    /// Trim text fields and check them against catalog rules.
    ///
    /// An empty `image_url` is normalized to `None`.
    ///
    /// # Errors
    ///
    /// Returns the first rule the product breaks.
    pub fn validate(mut self) -> Result<Self, ProductValidationError> {
        self.name = self.name.trim().to_owned();
        self.category = self.category.trim().to_owned();
        self.description = self.description.trim().to_owned();
        self.image_url = self
            .image_url
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty());
        self.features = self
            .features
            .into_iter()
            .map(|f| f.trim().to_owned())
            .filter(|f| !f.is_empty())
            .collect();

        if self.name.chars().count() < MIN_NAME_LENGTH {
            return Err(ProductValidationError::NameTooShort);
        }
        if self.category.is_empty() {
            return Err(ProductValidationError::MissingCategory);
        }
        Price::non_negative(self.price)?;
        if let Some(original) = self.original_price {
            Price::non_negative(original)?;
        }
        if self.description.chars().count() < MIN_DESCRIPTION_LENGTH {
            return Err(ProductValidationError::DescriptionTooShort);
        }
        if let Some(image_url) = &self.image_url {
            url::Url::parse(image_url)?;
        }

        Ok(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(price: i64, original: Option<i64>) -> Product {
        Product {
            id: ProductId::parse("p1").unwrap(),
            name: "Aviator Classic".to_owned(),
            category: "Sunglasses".to_owned(),
            price: Decimal::new(price, 0),
            original_price: original.map(|o| Decimal::new(o, 0)),
            description: None,
            features: Vec::new(),
            image_url: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn new_product() -> NewProduct {
        NewProduct {
            name: " Round Titanium ".to_owned(),
            category: "Eyeglasses".to_owned(),
            price: Decimal::new(4500, 0),
            original_price: None,
            description: "Featherweight titanium frame".to_owned(),
            features: vec!["Titanium".to_owned(), " ".to_owned()],
            image_url: Some(String::new()),
        }
    }

    #[test]
    fn test_discount_percent() {
        assert_eq!(product(1500, Some(2000)).discount_percent(), Some(25));
        assert_eq!(product(1500, None).discount_percent(), None);
        assert_eq!(product(1500, Some(1500)).discount_percent(), None);
    }

    #[test]
    fn test_cart_candidate_uses_placeholder_image() {
        let p = product(1500, None);
        assert_eq!(p.display_image(), PLACEHOLDER_IMAGE);
        assert_eq!(p.to_cart_candidate().unwrap().id().as_str(), "p1");
    }

    #[test]
    fn test_validate_normalizes() {
        let valid = new_product().validate().unwrap();
        assert_eq!(valid.name, "Round Titanium");
        assert_eq!(valid.image_url, None);
        assert_eq!(valid.features, vec!["Titanium".to_owned()]);
    }

    #[test]
    fn test_validate_rules() {
        let mut p = new_product();
        p.name = "A".to_owned();
        assert!(matches!(
            p.validate(),
            Err(ProductValidationError::NameTooShort)
        ));

        let mut p = new_product();
        p.category = "  ".to_owned();
        assert!(matches!(
            p.validate(),
            Err(ProductValidationError::MissingCategory)
        ));

        let mut p = new_product();
        p.price = Decimal::new(-5, 0);
        assert!(matches!(p.validate(), Err(ProductValidationError::Price(_))));

        let mut p = new_product();
        p.description = "short".to_owned();
        assert!(matches!(
            p.validate(),
            Err(ProductValidationError::DescriptionTooShort)
        ));

        let mut p = new_product();
        p.image_url = Some("not a url".to_owned());
        assert!(matches!(
            p.validate(),
            Err(ProductValidationError::InvalidImageUrl(_))
        ));
    }
}
