//! Conversion: ProductResponse → Product.

use super::wire::{CategoryResponse, ProductResponse};
use super::{Category, Product};

impl From<ProductResponse> for Product {
    fn from(source: ProductResponse) -> Self {
        Product {
            id: source.id,
            name: source.name,
            base_price: source.price,
            point_value: source.point_value,
            original_price: source.original_price,
            stock: source.stock,
            category: source.category,
            category_name: source.category_name,
            image: source.image.filter(|s| !s.trim().is_empty()),
        }
    }
}

impl From<CategoryResponse> for Category {
    fn from(source: CategoryResponse) -> Self {
        Category {
            id: source.id,
            name: source.name,
            image: source.image.filter(|s| !s.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::ProductId;
    use rust_decimal::Decimal;

    #[test]
    fn test_price_becomes_base_price() {
        let resp = ProductResponse {
            id: ProductId(3),
            name: "Ghee".to_string(),
            price: Decimal::new(45050, 2),
            point_value: Decimal::from(40),
            original_price: None,
            stock: 0,
            category: None,
            category_name: None,
            image: Some(String::new()),
        };
        let product: Product = resp.into();
        assert_eq!(product.base_price, Decimal::new(45050, 2));
        assert!(product.image.is_none());
        assert!(!product.in_stock());
    }
}
