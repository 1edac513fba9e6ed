//! Cart domain — persisted line items with prices frozen at add-time.
//!
//! The whole cart is stored as one JSON array under [`CART_STORAGE_KEY`].
//! Every mutation rewrites it; an empty cart removes the key instead of
//! writing `[]`.

pub mod checkout;
pub mod storage;

pub use checkout::{shipping_fee, CheckoutSummary, OrderItem};
pub use storage::{CartStorage, FileStorage, MemoryStorage};

use crate::domain::catalog::Product;
use crate::domain::pricing::PricingContext;
use crate::error::StorageError;
use crate::network::CART_STORAGE_KEY;
use crate::shared::serde_util::decimal_lenient;
use crate::shared::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One product in the cart.
///
/// `unit_price` and `reward_points` are the values computed when the line was
/// first added. Later status changes do not reprice it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    pub name: String,
    #[serde(rename = "price", with = "decimal_lenient")]
    pub unit_price: Decimal,
    #[serde(rename = "point_value", with = "decimal_lenient", default)]
    pub reward_points: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub image: Option<String>,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    pub fn line_points(&self) -> Decimal {
        self.reward_points * Decimal::from(self.quantity)
    }
}

/// The cart, backed by a [`CartStorage`].
#[derive(Debug)]
pub struct CartStore<S: CartStorage> {
    storage: S,
    lines: Vec<CartLine>,
    pricing: PricingContext,
}

impl<S: CartStorage> CartStore<S> {
    /// Read the persisted cart.
    ///
    /// A missing key is an empty cart. A payload that does not parse is
    /// logged and also treated as empty; it is overwritten on the next
    /// mutation.
    pub fn load(storage: S, pricing: PricingContext) -> Result<Self, StorageError> {
        let lines = match storage.get(CART_STORAGE_KEY)? {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<CartLine>>(&raw) {
                Ok(lines) => normalize(lines),
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding unreadable cart payload");
                    Vec::new()
                }
            },
        };
        tracing::debug!(lines = lines.len(), "Loaded cart");
        Ok(Self {
            storage,
            lines,
            pricing,
        })
    }

    /// Pricing used for lines added from now on. Existing lines keep their
    /// frozen prices.
    pub fn set_pricing(&mut self, pricing: PricingContext) {
        self.pricing = pricing;
    }

    pub fn pricing(&self) -> PricingContext {
        self.pricing
    }

    // ── Mutations ────────────────────────────────────────────────────────

    /// Add one unit of `product`.
    ///
    /// A product already in the cart gets its quantity bumped; its frozen
    /// price is left alone.
    pub fn add(&mut self, product: &Product) -> Result<(), StorageError> {
        let mut lines = self.lines.clone();
        match lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => {
                let priced = self.pricing.price(product);
                lines.push(CartLine {
                    product_id: product.id,
                    name: product.name.clone(),
                    unit_price: priced.display_price,
                    reward_points: priced.reward_points,
                    quantity: 1,
                    image: product.image.clone(),
                });
            }
        }
        self.commit(lines)
    }

    /// Change a line's quantity by `delta`, never going below 1.
    ///
    /// Returns `false` when no line has `product_id`.
    pub fn update_quantity(&mut self, product_id: ProductId, delta: i64) -> Result<bool, StorageError> {
        let mut lines = self.lines.clone();
        let Some(line) = lines.iter_mut().find(|l| l.product_id == product_id) else {
            return Ok(false);
        };
        let next = (i64::from(line.quantity) + delta).clamp(1, i64::from(u32::MAX));
        line.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        self.commit(lines)?;
        Ok(true)
    }

    /// Returns `false` when no line has `product_id`.
    pub fn remove(&mut self, product_id: ProductId) -> Result<bool, StorageError> {
        let before = self.lines.len();
        let lines: Vec<CartLine> = self
            .lines
            .iter()
            .filter(|l| l.product_id != product_id)
            .cloned()
            .collect();
        let removed = lines.len() != before;
        self.commit(lines)?;
        Ok(removed)
    }

    /// Empty the cart and delete the storage key.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.commit(Vec::new())
    }

    // ── Totals ───────────────────────────────────────────────────────────

    /// `Σ unit_price × quantity`.
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// `Σ reward_points × quantity`.
    pub fn reward_points_total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_points).sum()
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Persist `lines`, then make them current.
    fn commit(&mut self, lines: Vec<CartLine>) -> Result<(), StorageError> {
        if lines.is_empty() {
            self.storage.remove(CART_STORAGE_KEY)?;
        } else {
            let payload = serde_json::to_string(&lines).map_err(|source| StorageError::Encode {
                key: CART_STORAGE_KEY.to_string(),
                source,
            })?;
            self.storage.set(CART_STORAGE_KEY, &payload)?;
        }
        self.lines = lines;
        Ok(())
    }
}

/// Merge duplicate product ids (first line wins, quantities add) and lift
/// zero quantities to 1.
fn normalize(raw: Vec<CartLine>) -> Vec<CartLine> {
    let mut lines: Vec<CartLine> = Vec::with_capacity(raw.len());
    for mut line in raw {
        line.quantity = line.quantity.max(1);
        match lines.iter_mut().find(|l| l.product_id == line.product_id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(line.quantity)
            }
            None => lines.push(line),
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::test_support::product;
    use crate::shared::MembershipStatus::{Active, Inactive};

    fn active_cart() -> CartStore<MemoryStorage> {
        CartStore::load(MemoryStorage::new(), PricingContext::new(Active)).unwrap()
    }

    /// Reads from memory; writes fail while `failing` is set.
    #[derive(Debug, Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        failing: bool,
    }

    impl FlakyStorage {
        fn check(&self, key: &str) -> Result<(), StorageError> {
            if self.failing {
                return Err(StorageError::Io {
                    key: key.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
                });
            }
            Ok(())
        }
    }

    impl CartStorage for FlakyStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.check(key)?;
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.check(key)?;
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_add_twice_bumps_quantity() {
        let mut cart = active_cart();
        let honey = product(1, "Honey", 1000, 150);
        cart.add(&honey).unwrap();
        cart.add(&honey).unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.lines()[0].unit_price, Decimal::from(850));
        assert_eq!(cart.subtotal(), Decimal::from(1700));
    }

    #[test]
    fn test_price_frozen_at_add_time() {
        let mut cart = CartStore::load(MemoryStorage::new(), PricingContext::new(Inactive)).unwrap();
        let honey = product(1, "Honey", 1000, 150);
        cart.add(&honey).unwrap();

        cart.set_pricing(PricingContext::new(Active));
        cart.add(&honey).unwrap();
        let line = cart.line(ProductId(1)).unwrap();
        assert_eq!(line.unit_price, Decimal::from(1000));
        assert_eq!(line.reward_points, Decimal::from(150));
        assert_eq!(cart.reward_points_total(), Decimal::from(300));

        cart.add(&product(2, "Ghee", 500, 50)).unwrap();
        assert_eq!(cart.line(ProductId(2)).unwrap().unit_price, Decimal::from(450));
        assert_eq!(cart.line(ProductId(2)).unwrap().reward_points, Decimal::ZERO);
    }

    #[test]
    fn test_update_quantity_floors_at_one() {
        let mut cart = active_cart();
        cart.add(&product(1, "Honey", 100, 10)).unwrap();
        assert!(cart.update_quantity(ProductId(1), 4).unwrap());
        assert_eq!(cart.line(ProductId(1)).unwrap().quantity, 5);
        assert!(cart.update_quantity(ProductId(1), -100).unwrap());
        assert_eq!(cart.line(ProductId(1)).unwrap().quantity, 1);
        assert!(!cart.update_quantity(ProductId(9), 1).unwrap());
    }

    #[test]
    fn test_remove_last_line_removes_key() {
        let mut cart = active_cart();
        cart.add(&product(1, "Honey", 100, 10)).unwrap();
        assert!(cart.storage().contains(CART_STORAGE_KEY));
        assert!(cart.remove(ProductId(1)).unwrap());
        assert!(cart.is_empty());
        assert!(!cart.storage().contains(CART_STORAGE_KEY));
        assert!(!cart.remove(ProductId(1)).unwrap());
    }

    #[test]
    fn test_clear_removes_key_and_reload_is_empty() {
        let mut cart = active_cart();
        cart.add(&product(1, "Honey", 100, 10)).unwrap();
        cart.add(&product(2, "Ghee", 100, 10)).unwrap();
        cart.clear().unwrap();
        let storage = cart.into_storage();
        assert!(!storage.contains(CART_STORAGE_KEY));

        let reloaded = CartStore::load(storage, PricingContext::anonymous()).unwrap();
        assert_eq!(reloaded.item_count(), 0);
    }

    #[test]
    fn test_persisted_payload_uses_storefront_keys() {
        let mut cart = active_cart();
        cart.add(&product(4, "Soap", 80, 5)).unwrap();
        let raw = cart.storage().get(CART_STORAGE_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json[0]["id"], 4);
        assert_eq!(json[0]["price"], "75");
        assert_eq!(json[0]["point_value"], "0");
        assert_eq!(json[0]["quantity"], 1);
    }

    #[test]
    fn test_corrupt_payload_loads_empty() {
        let mut storage = MemoryStorage::new();
        storage.set(CART_STORAGE_KEY, "{not json").unwrap();
        let cart = CartStore::load(storage, PricingContext::anonymous()).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_load_accepts_numeric_prices_and_merges_duplicates() {
        let mut storage = MemoryStorage::new();
        storage
            .set(
                CART_STORAGE_KEY,
                r#"[{"id":1,"name":"Honey","price":850,"point_value":0,"quantity":2,"image":null},
                    {"id":1,"name":"Honey","price":850,"point_value":0,"quantity":0}]"#,
            )
            .unwrap();
        let cart = CartStore::load(storage, PricingContext::anonymous()).unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.subtotal(), Decimal::from(2550));
    }

    #[test]
    fn test_failed_write_leaves_lines_untouched() {
        let mut storage = FlakyStorage::default();
        let mut cart = CartStore::load(&mut storage, PricingContext::new(Active)).unwrap();
        cart.add(&product(1, "Honey", 1000, 150)).unwrap();
        let before = cart.lines().to_vec();
        drop(cart);

        storage.failing = true;
        let mut cart = CartStore::load(&mut storage, PricingContext::new(Active)).unwrap();

        let err = cart.add(&product(1, "Honey", 1000, 150)).unwrap_err();
        assert!(matches!(err, StorageError::Io { ref key, .. } if key == CART_STORAGE_KEY));
        assert_eq!(cart.lines(), before.as_slice());

        assert!(cart.add(&product(2, "Ghee", 500, 50)).is_err());
        assert_eq!(cart.lines(), before.as_slice());

        assert!(cart.update_quantity(ProductId(1), 3).is_err());
        assert_eq!(cart.line(ProductId(1)).unwrap().quantity, 1);

        assert!(cart.remove(ProductId(1)).is_err());
        assert!(cart.clear().is_err());
        assert_eq!(cart.lines(), before.as_slice());
        assert_eq!(cart.subtotal(), Decimal::from(850));
        drop(cart);

        // Persisted copy still matches what the cart showed.
        storage.failing = false;
        let reloaded = CartStore::load(&mut storage, PricingContext::anonymous()).unwrap();
        assert_eq!(reloaded.lines(), before.as_slice());
    }

    #[test]
    fn test_failed_first_add_keeps_cart_empty() {
        let storage = FlakyStorage {
            failing: true,
            ..FlakyStorage::default()
        };
        let mut cart = CartStore::load(storage, PricingContext::anonymous()).unwrap();
        assert!(cart.add(&product(1, "Honey", 100, 10)).is_err());
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert!(!cart.storage().inner.contains(CART_STORAGE_KEY));
    }
}
