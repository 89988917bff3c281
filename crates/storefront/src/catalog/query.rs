//! Listing filters for the public catalog.

use std::cmp::Ordering;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::models::Product;

/// Filter value meaning "no restriction".
pub const ALL: &str = "All";

/// A price band such as `2000-5000` or the open-ended `10000`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriceRange {
    #[default]
    Any,
    /// Inclusive on both ends.
    Between(Decimal, Decimal),
    AtLeast(Decimal),
}

/// A price range string that could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid price range: {0:?}")]
pub struct InvalidPriceRange(String);

impl PriceRange {
    /// Whether `price` falls inside the band.
    #[must_use]
    pub fn contains(&self, price: Decimal) -> bool {
        match *self {
            Self::Any => true,
            Self::Between(min, max) => price >= min && price <= max,
            Self::AtLeast(min) => price >= min,
        }
    }
}

impl FromStr for PriceRange {
    type Err = InvalidPriceRange;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(ALL) {
            return Ok(Self::Any);
        }

        let bound = |part: &str| {
            Decimal::from_str(part.trim())
                .ok()
                .filter(|d| !d.is_sign_negative())
                .ok_or_else(|| InvalidPriceRange(s.to_owned()))
        };

        match s.trim_end_matches('+').split_once('-') {
            Some((min, "")) => Ok(Self::AtLeast(bound(min)?)),
            Some((min, max)) => {
                let (min, max) = (bound(min)?, bound(max)?);
                if min > max {
                    return Err(InvalidPriceRange(s.to_owned()));
                }
                Ok(Self::Between(min, max))
            }
            None => Ok(Self::AtLeast(bound(s.trim_end_matches('+'))?)),
        }
    }
}

/// Listing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// A to Z, ignoring case.
    #[default]
    Name,
    PriceLow,
    PriceHigh,
    Newest,
}

/// Query-string filters for `GET /api/products`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    #[serde(deserialize_with = "deserialize_price_range")]
    pub price: PriceRange,
    pub sort: SortOrder,
}

fn deserialize_price_range<'de, D>(deserializer: D) -> Result<PriceRange, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

impl ProductQuery {
    /// Apply search, category and price filters, then sort.
    ///
    /// Sorting is stable, so ties keep the input order.
    #[must_use]
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != ALL);

        let mut matched: Vec<Product> = products
            .iter()
            .filter(|p| needle.as_deref().is_none_or(|n| matches_search(p, n)))
            .filter(|p| category.is_none_or(|c| p.category == c))
            .filter(|p| self.price.contains(p.price))
            .cloned()
            .collect();

        matched.sort_by(|a, b| self.sort.compare(a, b));
        matched
    }
}

impl SortOrder {
    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            Self::PriceLow => a.price.cmp(&b.price),
            Self::PriceHigh => b.price.cmp(&a.price),
            Self::Newest => b.created_at.cmp(&a.created_at),
        }
    }
}

fn matches_search(product: &Product, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle)
        || product.category.to_lowercase().contains(needle)
        || product
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
}

/// Distinct categories in the order they first appear.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for product in products {
        if !seen.contains(&product.category) {
            seen.push(product.category.clone());
        }
    }
    seen
}
