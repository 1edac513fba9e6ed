//! Catalog domain — read-only product view used by pricing and the cart.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod wire;

use crate::shared::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default upper bound of the shop's price slider.
pub const DEFAULT_MAX_PRICE: i64 = 5000;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub base_price: Decimal,
    pub point_value: Decimal,
    /// Strike-through "was" price, when the catalog provides one.
    pub original_price: Option<Decimal>,
    pub stock: i64,
    pub category: Option<u64>,
    pub category_name: Option<String>,
    pub image: Option<String>,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub image: Option<String>,
}

/// Shop page filter: name search, category, price ceiling.
///
/// The price ceiling compares against the catalog base price, not the
/// member-specific display price.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogFilter {
    pub search: String,
    pub category: Option<u64>,
    pub max_price: Decimal,
}

impl Default for CatalogFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: None,
            max_price: Decimal::from(DEFAULT_MAX_PRICE),
        }
    }
}

impl CatalogFilter {
    pub fn matches(&self, product: &Product) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = product.name.to_lowercase().contains(&needle);
        let matches_category = self.category.is_none() || product.category == self.category;
        let matches_price = product.base_price <= self.max_price;
        matches_search && matches_category && matches_price
    }

    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}
