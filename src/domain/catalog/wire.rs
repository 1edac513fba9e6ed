//! Wire types for the product endpoints.

use crate::shared::serde_util::{decimal_lenient, decimal_lenient_opt};
use crate::shared::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// REST response for `GET products/` items and `GET products/{id}/`.
///
/// Prices come back as decimal strings (`"1000.00"`); point values edited in
/// the admin screens may come back as plain numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    #[serde(with = "decimal_lenient")]
    pub price: Decimal,
    #[serde(with = "decimal_lenient", default)]
    pub point_value: Decimal,
    #[serde(with = "decimal_lenient_opt", default)]
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub category: Option<u64>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// REST response item for `GET products/categories/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryResponse {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// A list endpoint's body: either a bare array or a paginated page.
///
/// With pagination enabled the backend wraps items as
/// `{ "count": .., "next": .., "previous": .., "results": [..] }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ListResponse<T> {
    List(Vec<T>),
    Page {
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
        results: Vec<T>,
    },
}

impl<T> ListResponse<T> {
    /// Items of this response. For a page, only the items it carries.
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListResponse::List(items) => items,
            ListResponse::Page { results, .. } => results,
        }
    }

    /// URL of the following page, if the backend reported one.
    pub fn next_page(&self) -> Option<&str> {
        match self {
            ListResponse::List(_) => None,
            ListResponse::Page { next, .. } => next.as_deref(),
        }
    }
}
