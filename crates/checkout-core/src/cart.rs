//! Cart and cart item types.
//!
//! A cart is the mutable pre-purchase basket owned by exactly one user.
//! Prices are snapshotted at add time and never looked up again at
//! checkout (price lock).

use crate::error::CheckoutError;
use crate::ids::{CartId, CartItemId, UserId, VariantId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum quantity allowed per cart item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// Chosen attribute values for a variant (option name -> chosen value).
///
/// Ordered map so that two selections compare equal regardless of
/// insertion order.
pub type AttributeSelection = BTreeMap<String, String>;

/// A user's shopping cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Unique cart identifier.
    pub id: CartId,
    /// Owning user. Exactly one live cart exists per user.
    pub user_id: UserId,
    /// Items in the cart.
    pub items: Vec<CartItem>,
    /// Cart currency. All item prices must match.
    pub currency: Currency,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Cart {
    /// Create a new empty cart for a user.
    pub fn new(user_id: UserId) -> Self {
        let now = current_timestamp();
        Self {
            id: CartId::generate(),
            user_id,
            items: Vec::new(),
            currency: Currency::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add an item to the cart.
    ///
    /// If an item with the same (variant, attribute selection, unit price)
    /// already exists, its quantity is incremented instead of a new row
    /// being created.
    ///
    /// Returns an error if the quantity is not positive, the merged
    /// quantity would exceed [`MAX_QUANTITY_PER_ITEM`], the price currency
    /// does not match the cart, or the line total would overflow.
    pub fn add_item(
        &mut self,
        variant_id: VariantId,
        variant_name: impl Into<String>,
        attributes: AttributeSelection,
        quantity: i64,
        unit_price: Money,
    ) -> Result<CartItemId, CheckoutError> {
        if quantity <= 0 {
            return Err(CheckoutError::InvalidQuantity(quantity));
        }
        if unit_price.currency != self.currency {
            return Err(CheckoutError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: unit_price.currency.code().to_string(),
            });
        }

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.merges_with(&variant_id, &attributes, &unit_price))
        {
            let merged = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CheckoutError::Overflow)?;
            if merged > MAX_QUANTITY_PER_ITEM {
                return Err(CheckoutError::QuantityExceedsLimit(
                    merged,
                    MAX_QUANTITY_PER_ITEM,
                ));
            }
            // line_total must stay representable once committed
            unit_price
                .checked_mul(merged)
                .ok_or(CheckoutError::Overflow)?;
            existing.quantity = merged;
            let id = existing.id.clone();
            self.updated_at = current_timestamp();
            return Ok(id);
        }

        let item = CartItem::new(variant_id, variant_name, attributes, quantity, unit_price)?;
        let id = item.id.clone();
        self.items.push(item);
        self.updated_at = current_timestamp();
        Ok(id)
    }

    /// Replace the quantity of an existing item.
    pub fn update_quantity(
        &mut self,
        item_id: &CartItemId,
        quantity: i64,
    ) -> Result<(), CheckoutError> {
        if quantity <= 0 {
            return Err(CheckoutError::InvalidQuantity(quantity));
        }
        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CheckoutError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }
        let item = self
            .items
            .iter_mut()
            .find(|i| &i.id == item_id)
            .ok_or_else(|| CheckoutError::CartItemNotFound(item_id.to_string()))?;
        item.unit_price
            .checked_mul(quantity)
            .ok_or(CheckoutError::Overflow)?;
        item.quantity = quantity;
        self.updated_at = current_timestamp();
        Ok(())
    }

    /// Remove an item from the cart.
    pub fn remove_item(&mut self, item_id: &CartItemId) -> Result<(), CheckoutError> {
        let len_before = self.items.len();
        self.items.retain(|i| &i.id != item_id);
        if self.items.len() == len_before {
            return Err(CheckoutError::CartItemNotFound(item_id.to_string()));
        }
        self.updated_at = current_timestamp();
        Ok(())
    }

    /// Get an item by ID.
    pub fn get_item(&self, item_id: &CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.id == item_id)
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Number of distinct rows.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Total price of the cart, computed at read time.
    ///
    /// Zero for an empty cart.
    pub fn total_price(&self) -> Result<Money, CheckoutError> {
        let line_totals = self
            .items
            .iter()
            .map(|i| i.line_total())
            .collect::<Result<Vec<_>, _>>()?;
        Money::try_sum(line_totals.iter(), self.currency).ok_or(CheckoutError::Overflow)
    }
}

/// A line item in a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Unique item identifier.
    pub id: CartItemId,
    /// Variant being purchased, resolved externally by the catalog.
    pub variant_id: VariantId,
    /// Variant display name, snapshotted at add time.
    pub variant_name: String,
    /// Chosen attribute values (e.g., "size" -> "large").
    pub attributes: AttributeSelection,
    /// Quantity, always positive.
    pub quantity: i64,
    /// Unit price snapshotted from the catalog at add time.
    pub unit_price: Money,
}

impl CartItem {
    /// Create a new cart item.
    pub fn new(
        variant_id: VariantId,
        variant_name: impl Into<String>,
        attributes: AttributeSelection,
        quantity: i64,
        unit_price: Money,
    ) -> Result<Self, CheckoutError> {
        if quantity <= 0 {
            return Err(CheckoutError::InvalidQuantity(quantity));
        }
        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CheckoutError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }
        unit_price
            .checked_mul(quantity)
            .ok_or(CheckoutError::Overflow)?;
        Ok(Self {
            id: CartItemId::generate(),
            variant_id,
            variant_name: variant_name.into(),
            attributes,
            quantity,
            unit_price,
        })
    }

    /// Total price for this row (quantity x unit price).
    pub fn line_total(&self) -> Result<Money, CheckoutError> {
        self.unit_price
            .checked_mul(self.quantity)
            .ok_or(CheckoutError::Overflow)
    }

    /// Whether a repeated add of this (variant, attributes, price) tuple
    /// should merge into this row.
    fn merges_with(
        &self,
        variant_id: &VariantId,
        attributes: &AttributeSelection,
        unit_price: &Money,
    ) -> bool {
        &self.variant_id == variant_id
            && &self.attributes == attributes
            && &self.unit_price == unit_price
    }
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> AttributeSelection {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_new_cart_is_empty() {
        let cart = Cart::new(UserId::new("user-1"));
        assert!(cart.is_empty());
        assert!(cart.total_price().unwrap().is_zero());
    }

    #[test]
    fn test_add_item() {
        let mut cart = Cart::new(UserId::new("user-1"));
        cart.add_item(
            VariantId::new("var-1"),
            "Blue Shirt",
            attrs(&[("size", "large")]),
            2,
            Money::new(1000, Currency::USD),
        )
        .unwrap();

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.unique_item_count(), 1);
    }

    #[test]
    fn test_repeated_add_merges_quantity() {
        let mut cart = Cart::new(UserId::new("user-1"));
        let price = Money::new(1000, Currency::USD);
        let selection = attrs(&[("size", "large")]);

        let first = cart
            .add_item(VariantId::new("var-1"), "Shirt", selection.clone(), 3, price)
            .unwrap();
        let second = cart
            .add_item(VariantId::new("var-1"), "Shirt", selection, 4, price)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(cart.unique_item_count(), 1);
        assert_eq!(cart.item_count(), 7);
    }

    #[test]
    fn test_different_attributes_create_separate_rows() {
        let mut cart = Cart::new(UserId::new("user-1"));
        let price = Money::new(1000, Currency::USD);

        cart.add_item(
            VariantId::new("var-1"),
            "Shirt",
            attrs(&[("size", "large")]),
            1,
            price,
        )
        .unwrap();
        cart.add_item(
            VariantId::new("var-1"),
            "Shirt",
            attrs(&[("size", "small")]),
            1,
            price,
        )
        .unwrap();

        assert_eq!(cart.unique_item_count(), 2);
    }

    #[test]
    fn test_different_price_creates_separate_row() {
        let mut cart = Cart::new(UserId::new("user-1"));
        let selection = attrs(&[("size", "large")]);

        cart.add_item(
            VariantId::new("var-1"),
            "Shirt",
            selection.clone(),
            1,
            Money::new(1000, Currency::USD),
        )
        .unwrap();
        // price changed in the catalog between adds: the old row keeps its
        // locked price and a new row is created
        cart.add_item(
            VariantId::new("var-1"),
            "Shirt",
            selection,
            1,
            Money::new(1200, Currency::USD),
        )
        .unwrap();

        assert_eq!(cart.unique_item_count(), 2);
    }

    #[test]
    fn test_add_item_rejects_non_positive_quantity() {
        let mut cart = Cart::new(UserId::new("user-1"));
        for quantity in [0, -3] {
            let err = cart
                .add_item(
                    VariantId::new("var-1"),
                    "Shirt",
                    AttributeSelection::new(),
                    quantity,
                    Money::new(1000, Currency::USD),
                )
                .unwrap_err();
            assert!(matches!(err, CheckoutError::InvalidQuantity(q) if q == quantity));
        }
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_item_rejects_currency_mismatch() {
        let mut cart = Cart::new(UserId::new("user-1"));
        let err = cart
            .add_item(
                VariantId::new("var-1"),
                "Shirt",
                AttributeSelection::new(),
                1,
                Money::new(1000, Currency::EUR),
            )
            .unwrap_err();
        assert!(matches!(err, CheckoutError::CurrencyMismatch { .. }));
    }

    #[test]
    fn test_merge_respects_quantity_cap() {
        let mut cart = Cart::new(UserId::new("user-1"));
        let price = Money::new(100, Currency::USD);
        cart.add_item(
            VariantId::new("var-1"),
            "Shirt",
            AttributeSelection::new(),
            MAX_QUANTITY_PER_ITEM,
            price,
        )
        .unwrap();

        let err = cart
            .add_item(
                VariantId::new("var-1"),
                "Shirt",
                AttributeSelection::new(),
                1,
                price,
            )
            .unwrap_err();
        assert!(matches!(err, CheckoutError::QuantityExceedsLimit(..)));
        assert_eq!(cart.item_count(), MAX_QUANTITY_PER_ITEM);
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::new(UserId::new("user-1"));
        let id = cart
            .add_item(
                VariantId::new("var-1"),
                "Shirt",
                AttributeSelection::new(),
                1,
                Money::new(1000, Currency::USD),
            )
            .unwrap();

        cart.update_quantity(&id, 5).unwrap();
        assert_eq!(cart.item_count(), 5);

        let err = cart.update_quantity(&id, 0).unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidQuantity(0)));
    }

    #[test]
    fn test_update_quantity_missing_item() {
        let mut cart = Cart::new(UserId::new("user-1"));
        let err = cart
            .update_quantity(&CartItemId::new("missing"), 2)
            .unwrap_err();
        assert!(matches!(err, CheckoutError::CartItemNotFound(_)));
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::new(UserId::new("user-1"));
        let id = cart
            .add_item(
                VariantId::new("var-1"),
                "Shirt",
                AttributeSelection::new(),
                1,
                Money::new(1000, Currency::USD),
            )
            .unwrap();

        cart.remove_item(&id).unwrap();
        assert!(cart.is_empty());
        assert!(cart.remove_item(&id).is_err());
    }

    #[test]
    fn test_total_price() {
        let mut cart = Cart::new(UserId::new("user-1"));
        cart.add_item(
            VariantId::new("var-a"),
            "Product A",
            AttributeSelection::new(),
            2,
            Money::new(1000, Currency::USD),
        )
        .unwrap();
        cart.add_item(
            VariantId::new("var-b"),
            "Product B",
            AttributeSelection::new(),
            1,
            Money::new(500, Currency::USD),
        )
        .unwrap();

        // 2 * 10.00 + 1 * 5.00 = 25.00
        assert_eq!(cart.total_price().unwrap(), Money::new(2500, Currency::USD));
    }
}
