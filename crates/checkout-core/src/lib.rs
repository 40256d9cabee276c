//! Cart and checkout domain types.
//!
//! This crate holds the pure domain model of the checkout core:
//!
//! - **Cart**: mutable pre-purchase basket with price-locked line items
//! - **Order**: immutable purchase record with per-item fulfillment status
//! - **Money**: cents-based monetary values with checked arithmetic
//! - **Events**: explicit domain events for committed state changes
//!
//! No I/O and no locking happens here; the transactional behavior lives
//! in `checkout-service`.
//!
//! # Example
//!
//! ```rust
//! use checkout_core::prelude::*;
//!
//! let mut cart = Cart::new(UserId::new("user-1"));
//! cart.add_item(
//!     VariantId::new("var-1"),
//!     "Blue Shirt",
//!     AttributeSelection::new(),
//!     2,
//!     Money::new(1000, Currency::USD),
//! )
//! .unwrap();
//!
//! let order = Order::from_cart(UserId::new("user-1"), &cart).unwrap();
//! assert_eq!(order.total().unwrap(), Money::new(2000, Currency::USD));
//! ```

pub mod cart;
pub mod error;
pub mod events;
pub mod ids;
pub mod money;
pub mod order;

pub use error::CheckoutError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{AttributeSelection, Cart, CartItem, MAX_QUANTITY_PER_ITEM};
    pub use crate::error::CheckoutError;
    pub use crate::events::{CheckoutEvent, EventSink, NullSink};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};
    pub use crate::order::{ItemStatus, Order, OrderItem};
}
