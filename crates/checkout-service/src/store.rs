//! In-memory persisted state.
//!
//! Carts are held in per-user slots so that operations on one cart are
//! strictly serialized while different carts proceed independently. A
//! consumed slot (cart taken by checkout) holds `None` until the next
//! get-or-create materializes a fresh empty cart.
//!
//! Lock order is always slot mutex first, then the orders map. Checkout
//! inserts the order and clears the slot inside one slot critical
//! section, so no reader ever observes an order without its items or a
//! half-cleared cart.

use checkout_core::cart::Cart;
use checkout_core::error::CheckoutError;
use checkout_core::ids::{OrderId, UserId};
use checkout_core::order::Order;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

/// Holder for a user's single live cart.
#[derive(Debug, Default)]
pub(crate) struct CartSlot {
    pub(crate) cart: Option<Cart>,
}

/// Thread-safe store for carts and orders.
#[derive(Debug, Default)]
pub struct MemoryStore {
    carts: RwLock<HashMap<UserId, Arc<Mutex<CartSlot>>>>,
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or atomically create the slot for a user.
    fn slot(&self, user: &UserId) -> Result<Arc<Mutex<CartSlot>>, CheckoutError> {
        if let Some(slot) = self.carts.read().map_err(|_| poisoned())?.get(user) {
            return Ok(Arc::clone(slot));
        }
        let mut carts = self.carts.write().map_err(|_| poisoned())?;
        Ok(Arc::clone(
            carts.entry(user.clone()).or_default(),
        ))
    }

    /// Run `f` under the exclusive lock of the user's cart slot.
    ///
    /// Everything `f` does is invisible to concurrent callers until it
    /// returns; callers touching other users' carts are unaffected.
    pub(crate) fn with_slot<T>(
        &self,
        user: &UserId,
        f: impl FnOnce(&mut CartSlot) -> Result<T, CheckoutError>,
    ) -> Result<T, CheckoutError> {
        let slot = self.slot(user)?;
        let mut guard = slot.lock().map_err(|_| poisoned())?;
        f(&mut guard)
    }

    /// Persist a freshly created order.
    pub(crate) fn insert_order(&self, order: Order) -> Result<(), CheckoutError> {
        let mut orders = self.orders.write().map_err(|_| poisoned())?;
        orders.insert(order.id.clone(), order);
        Ok(())
    }

    /// Read an order by ID.
    pub(crate) fn order(&self, id: &OrderId) -> Result<Option<Order>, CheckoutError> {
        let orders = self.orders.read().map_err(|_| poisoned())?;
        Ok(orders.get(id).cloned())
    }

    /// Read all orders belonging to a user, newest first.
    pub(crate) fn orders_for(&self, user: &UserId) -> Result<Vec<Order>, CheckoutError> {
        let orders = self.orders.read().map_err(|_| poisoned())?;
        let mut owned: Vec<Order> = orders
            .values()
            .filter(|o| o.user_id.as_ref() == Some(user))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(owned)
    }

    /// Mutate an order under the orders lock.
    ///
    /// `f` must validate before mutating; a returned error must leave the
    /// order untouched.
    pub(crate) fn update_order<T>(
        &self,
        id: &OrderId,
        f: impl FnOnce(&mut Order) -> Result<T, CheckoutError>,
    ) -> Result<T, CheckoutError> {
        let mut orders = self.orders.write().map_err(|_| poisoned())?;
        let order = orders
            .get_mut(id)
            .ok_or_else(|| CheckoutError::OrderNotFound(id.to_string()))?;
        f(order)
    }
}

fn poisoned() -> CheckoutError {
    CheckoutError::Conflict("store lock poisoned".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_core::ids::UserId;

    #[test]
    fn test_slot_is_created_once() {
        let store = MemoryStore::new();
        let user = UserId::new("user-1");

        store
            .with_slot(&user, |slot| {
                slot.cart = Some(Cart::new(user.clone()));
                Ok(())
            })
            .unwrap();

        let id = store
            .with_slot(&user, |slot| Ok(slot.cart.as_ref().unwrap().id.clone()))
            .unwrap();
        let again = store
            .with_slot(&user, |slot| Ok(slot.cart.as_ref().unwrap().id.clone()))
            .unwrap();
        assert_eq!(id, again);
    }

    #[test]
    fn test_update_missing_order() {
        let store = MemoryStore::new();
        let err = store
            .update_order(&OrderId::new("missing"), |_| Ok(()))
            .unwrap_err();
        assert!(matches!(err, CheckoutError::OrderNotFound(_)));
    }

    #[test]
    fn test_orders_for_filters_by_owner() {
        let store = MemoryStore::new();
        let alice = UserId::new("alice");
        let bob = UserId::new("bob");

        let mut cart = Cart::new(alice.clone());
        cart.add_item(
            checkout_core::ids::VariantId::new("var-1"),
            "Thing",
            Default::default(),
            1,
            checkout_core::money::Money::new(100, Default::default()),
        )
        .unwrap();
        let order = Order::from_cart(alice.clone(), &cart).unwrap();
        store.insert_order(order).unwrap();

        assert_eq!(store.orders_for(&alice).unwrap().len(), 1);
        assert!(store.orders_for(&bob).unwrap().is_empty());
    }
}
