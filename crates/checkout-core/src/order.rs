//! Order types and the per-item status lifecycle.
//!
//! An order is the immutable record of a completed purchase. Line items
//! are snapshots taken at checkout time: variant reference, display name,
//! attribute selection, quantity and unit price never change after
//! creation. Only the per-item fulfillment status is mutable, and only
//! forward.

use crate::cart::{AttributeSelection, Cart};
use crate::error::CheckoutError;
use crate::ids::{OrderId, OrderItemId, UserId, VariantId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Fulfillment status of a single order item.
///
/// `Pending -> Processing -> Shipped -> Delivered`, with `Cancelled`
/// reachable from any non-terminal state. No backward edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ItemStatus {
    /// Awaiting processing.
    #[default]
    Pending,
    /// Being prepared.
    Processing,
    /// Handed to the carrier.
    Shipped,
    /// Received by the customer.
    Delivered,
    /// Cancelled before delivery.
    Cancelled,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Processing => "processing",
            ItemStatus::Shipped => "shipped",
            ItemStatus::Delivered => "delivered",
            ItemStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(ItemStatus::Pending),
            "processing" => Some(ItemStatus::Processing),
            "shipped" => Some(ItemStatus::Shipped),
            "delivered" => Some(ItemStatus::Delivered),
            "cancelled" => Some(ItemStatus::Cancelled),
            _ => None,
        }
    }

    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemStatus::Delivered | ItemStatus::Cancelled)
    }

    /// Position along the fulfillment chain. `Cancelled` is off-chain.
    fn rank(&self) -> Option<u8> {
        match self {
            ItemStatus::Pending => Some(0),
            ItemStatus::Processing => Some(1),
            ItemStatus::Shipped => Some(2),
            ItemStatus::Delivered => Some(3),
            ItemStatus::Cancelled => None,
        }
    }

    /// Check whether a transition to `next` is legal.
    pub fn can_transition_to(&self, next: ItemStatus) -> bool {
        if next == ItemStatus::Cancelled {
            return !self.is_terminal();
        }
        match (self.rank(), next.rank()) {
            (Some(from), Some(to)) => to > from,
            _ => false,
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A completed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Unique order identifier, generated at creation and never reused.
    pub id: OrderId,
    /// Purchasing user. `None` once the user account is deleted;
    /// historical orders are never cascade-deleted.
    pub user_id: Option<UserId>,
    /// Items in the order, priced at checkout time.
    pub items: Vec<OrderItem>,
    /// Order currency.
    pub currency: Currency,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last status update.
    pub updated_at: i64,
}

impl Order {
    /// Build an order from a cart, snapshotting every line item.
    ///
    /// Prices are copied from the cart, not re-fetched from the catalog
    /// (price lock). Fails with `EmptyCart` if the cart has no items.
    pub fn from_cart(user_id: UserId, cart: &Cart) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let items = cart
            .items
            .iter()
            .map(|item| {
                // guard the line total before the order becomes durable
                item.line_total()?;
                Ok(OrderItem {
                    id: OrderItemId::generate(),
                    variant_id: item.variant_id.clone(),
                    variant_name: item.variant_name.clone(),
                    attributes: item.attributes.clone(),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    status: ItemStatus::Pending,
                })
            })
            .collect::<Result<Vec<_>, CheckoutError>>()?;

        let now = current_timestamp();
        let order = Self {
            id: OrderId::generate(),
            user_id: Some(user_id),
            items,
            currency: cart.currency,
            created_at: now,
            updated_at: now,
        };
        // the durable record must always be readable: reject an order
        // whose total can never be computed
        order.total()?;
        Ok(order)
    }

    /// Get an item by ID.
    pub fn item(&self, item_id: &OrderItemId) -> Option<&OrderItem> {
        self.items.iter().find(|i| &i.id == item_id)
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Order total, computed at read time from the locked prices.
    pub fn total(&self) -> Result<Money, CheckoutError> {
        let line_totals = self
            .items
            .iter()
            .map(|i| i.line_total())
            .collect::<Result<Vec<_>, _>>()?;
        Money::try_sum(line_totals.iter(), self.currency).ok_or(CheckoutError::Overflow)
    }

    /// Apply a status transition to one item.
    ///
    /// Returns the previous status. Quantity and price are never touched.
    pub fn transition_item(
        &mut self,
        item_id: &OrderItemId,
        next: ItemStatus,
    ) -> Result<ItemStatus, CheckoutError> {
        let item = self
            .items
            .iter_mut()
            .find(|i| &i.id == item_id)
            .ok_or_else(|| CheckoutError::OrderItemNotFound(item_id.to_string()))?;

        if !item.status.can_transition_to(next) {
            return Err(CheckoutError::InvalidStatusTransition {
                from: item.status.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }
        let previous = item.status;
        item.status = next;
        self.updated_at = current_timestamp();
        Ok(previous)
    }
}

/// A line item in an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Unique item identifier.
    pub id: OrderItemId,
    /// Variant reference, kept as an immutable snapshot.
    pub variant_id: VariantId,
    /// Variant display name at checkout time.
    pub variant_name: String,
    /// Attribute selection at checkout time.
    pub attributes: AttributeSelection,
    /// Quantity ordered.
    pub quantity: i64,
    /// Unit price at checkout time, decoupled from the live catalog.
    pub unit_price: Money,
    /// Fulfillment status, tracked independently per item.
    pub status: ItemStatus,
}

impl OrderItem {
    /// Total price for this line.
    pub fn line_total(&self) -> Result<Money, CheckoutError> {
        self.unit_price
            .checked_mul(self.quantity)
            .ok_or(CheckoutError::Overflow)
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
