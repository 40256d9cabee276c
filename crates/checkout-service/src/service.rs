//! Checkout orchestration.
//!
//! `CheckoutService` is the stateless request-per-call facade over the
//! store: cart CRUD, the atomic cart-to-order conversion, and the order
//! status lifecycle. Every operation validates before mutating; errors
//! never leave partial state behind.

use crate::authz::{Action, AllowAll, Authorizer};
use crate::catalog::Catalog;
use crate::notify::TracingSink;
use crate::store::MemoryStore;
use checkout_core::cart::{AttributeSelection, Cart};
use checkout_core::error::CheckoutError;
use checkout_core::events::{CheckoutEvent, EventSink};
use checkout_core::ids::{CartId, CartItemId, OrderId, OrderItemId, UserId, VariantId};
use checkout_core::money::Money;
use checkout_core::order::{ItemStatus, Order};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request to add an item to the caller's cart.
///
/// `unit_price` is the price the catalog quoted at add time; it is
/// recorded as-is and never re-fetched (price lock).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddItemRequest {
    pub variant_id: VariantId,
    pub attributes: AttributeSelection,
    pub quantity: i64,
    pub unit_price: Money,
}

/// The transactional checkout service.
pub struct CheckoutService {
    store: MemoryStore,
    catalog: Arc<dyn Catalog>,
    authorizer: Arc<dyn Authorizer>,
    events: Arc<dyn EventSink>,
}

impl CheckoutService {
    /// Create a service over the given catalog, with permissive
    /// authorization and tracing-backed event delivery.
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            store: MemoryStore::new(),
            catalog,
            authorizer: Arc::new(AllowAll),
            events: Arc::new(TracingSink),
        }
    }

    /// Replace the authorizer.
    pub fn with_authorizer(mut self, authorizer: Arc<dyn Authorizer>) -> Self {
        self.authorizer = authorizer;
        self
    }

    /// Replace the event sink.
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    fn check(&self, user: &UserId, action: Action, resource: &str) -> Result<(), CheckoutError> {
        if self.authorizer.authorize(user, action, resource) {
            Ok(())
        } else {
            Err(CheckoutError::Forbidden {
                action: action.as_str().to_string(),
                resource: resource.to_string(),
            })
        }
    }

    /// Get the user's cart, creating an empty one on first access.
    pub fn cart(&self, user: &UserId) -> Result<Cart, CheckoutError> {
        self.check(user, Action::ViewCart, user.as_str())?;
        self.store.with_slot(user, |slot| {
            Ok(slot
                .cart
                .get_or_insert_with(|| Cart::new(user.clone()))
                .clone())
        })
    }

    /// Add an item to the user's cart.
    ///
    /// The variant must exist and the attribute selection must lie within
    /// its declared domain. A repeated add of the same
    /// (variant, attributes, price) increments the existing row.
    pub fn add_item(
        &self,
        user: &UserId,
        request: AddItemRequest,
    ) -> Result<CartItemId, CheckoutError> {
        self.check(user, Action::EditCart, request.variant_id.as_str())?;
        if request.quantity <= 0 {
            return Err(CheckoutError::InvalidQuantity(request.quantity));
        }
        let variant = self
            .catalog
            .variant(&request.variant_id)
            .ok_or_else(|| CheckoutError::VariantNotFound(request.variant_id.to_string()))?;
        variant.validate_selection(&request.attributes)?;

        let item_id = self.store.with_slot(user, |slot| {
            let cart = slot.cart.get_or_insert_with(|| Cart::new(user.clone()));
            cart.add_item(
                request.variant_id,
                variant.name.clone(),
                request.attributes,
                request.quantity,
                request.unit_price,
            )
        })?;
        tracing::debug!(%user, item_id = %item_id, "cart item added");
        Ok(item_id)
    }

    /// Replace the quantity of a cart item.
    pub fn update_item(
        &self,
        user: &UserId,
        item_id: &CartItemId,
        quantity: i64,
    ) -> Result<(), CheckoutError> {
        self.check(user, Action::EditCart, item_id.as_str())?;
        self.store.with_slot(user, |slot| {
            let cart = slot
                .cart
                .as_mut()
                .ok_or_else(|| CheckoutError::CartItemNotFound(item_id.to_string()))?;
            cart.update_quantity(item_id, quantity)
        })
    }

    /// Remove an item from the user's cart.
    pub fn remove_item(&self, user: &UserId, item_id: &CartItemId) -> Result<(), CheckoutError> {
        self.check(user, Action::EditCart, item_id.as_str())?;
        self.store.with_slot(user, |slot| {
            let cart = slot
                .cart
                .as_mut()
                .ok_or_else(|| CheckoutError::CartItemNotFound(item_id.to_string()))?;
            cart.remove_item(item_id)
        })
    }

    /// Convert the cart into an order atomically.
    ///
    /// Runs entirely under the cart's exclusive lock: empty-check, order
    /// snapshot, persistence and cart destruction commit together or not
    /// at all. A concurrent checkout of the same cart observes the
    /// already-consumed slot and fails with `CartNotFound`; two orders are
    /// never created from one cart.
    pub fn checkout(&self, user: &UserId, cart_id: &CartId) -> Result<Order, CheckoutError> {
        self.check(user, Action::Checkout, cart_id.as_str())?;
        let order = self.store.with_slot(user, |slot| {
            let cart = match &slot.cart {
                Some(cart) if &cart.id == cart_id => cart,
                _ => return Err(CheckoutError::CartNotFound(cart_id.to_string())),
            };
            let order = Order::from_cart(user.clone(), cart)?;
            self.store.insert_order(order.clone())?;
            slot.cart = None;
            Ok(order)
        })?;

        tracing::info!(
            %user,
            order_id = %order.id,
            items = order.items.len(),
            "checkout completed"
        );
        self.events.emit(CheckoutEvent::OrderPlaced {
            order_id: order.id.clone(),
            user_id: user.clone(),
            item_count: order.items.len(),
        });
        Ok(order)
    }

    /// Read one of the user's orders.
    ///
    /// Ownership filtering is defense in depth: an order belonging to a
    /// different user reads as not found rather than forbidden.
    pub fn order(&self, user: &UserId, order_id: &OrderId) -> Result<Order, CheckoutError> {
        self.check(user, Action::ViewOrder, order_id.as_str())?;
        let order = self
            .store
            .order(order_id)?
            .filter(|o| o.user_id.as_ref() == Some(user))
            .ok_or_else(|| CheckoutError::OrderNotFound(order_id.to_string()))?;
        Ok(order)
    }

    /// List the user's orders, newest first.
    pub fn orders(&self, user: &UserId) -> Result<Vec<Order>, CheckoutError> {
        self.check(user, Action::ViewOrder, user.as_str())?;
        self.store.orders_for(user)
    }

    /// Move one order item to a new fulfillment status.
    ///
    /// Statuses only move forward; a cancellation additionally emits
    /// `OrderItemCancelled` for notification consumers.
    pub fn set_item_status(
        &self,
        user: &UserId,
        order_id: &OrderId,
        item_id: &OrderItemId,
        status: ItemStatus,
    ) -> Result<(), CheckoutError> {
        self.check(user, Action::EditOrder, order_id.as_str())?;
        let previous = self.store.update_order(order_id, |order| {
            if order.user_id.as_ref() != Some(user) {
                return Err(CheckoutError::OrderNotFound(order_id.to_string()));
            }
            order.transition_item(item_id, status)
        })?;

        self.events.emit(CheckoutEvent::ItemStatusChanged {
            order_id: order_id.clone(),
            item_id: item_id.clone(),
            from: previous,
            to: status,
        });
        if status == ItemStatus::Cancelled {
            self.events.emit(CheckoutEvent::OrderItemCancelled {
                order_id: order_id.clone(),
                item_id: item_id.clone(),
            });
        }
        Ok(())
    }
}
