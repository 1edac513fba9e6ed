//! Catalog sub-client — products and categories.

use crate::client::StorefrontClient;
use crate::domain::catalog::{CatalogFilter, Category, Product};
use crate::error::SdkError;
use crate::shared::ProductId;

/// Sub-client for catalog reads.
pub struct Catalog<'a> {
    pub(crate) client: &'a StorefrontClient,
}

impl<'a> Catalog<'a> {
    pub async fn products(&self) -> Result<Vec<Product>, SdkError> {
        let resp = self.client.http.get_products().await?;
        Ok(resp.into_items().into_iter().map(Product::from).collect())
    }

    pub async fn product(&self, id: ProductId) -> Result<Product, SdkError> {
        Ok(self.client.http.get_product(id).await?.into())
    }

    pub async fn categories(&self) -> Result<Vec<Category>, SdkError> {
        let resp = self.client.http.get_categories().await?;
        Ok(resp.into_items().into_iter().map(Category::from).collect())
    }

    /// Fetch all products and keep those matching `filter`.
    pub async fn search(&self, filter: &CatalogFilter) -> Result<Vec<Product>, SdkError> {
        let products = self.products().await?;
        Ok(products.into_iter().filter(|p| filter.matches(p)).collect())
    }
}
