//! Transactional cart-to-order checkout service.
//!
//! This crate wraps the `checkout-core` domain model with the behavior
//! that needs coordination:
//!
//! - **Store**: per-user cart slots with exclusive locks, so checkout on
//!   one cart is strictly serialized while other carts proceed freely
//! - **Catalog seam**: variant existence and attribute-domain validation
//! - **Authorization seam**: policy decisions made outside the core
//! - **Events**: committed state changes delivered to an [`EventSink`]
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use checkout_core::prelude::*;
//! use checkout_service::{AddItemRequest, CheckoutService, StaticCatalog, VariantRecord};
//!
//! let mut catalog = StaticCatalog::new();
//! catalog.insert(VariantRecord::new(VariantId::new("var-1"), "Blue Shirt"));
//! let service = CheckoutService::new(Arc::new(catalog));
//!
//! let user = UserId::new("user-1");
//! service
//!     .add_item(
//!         &user,
//!         AddItemRequest {
//!             variant_id: VariantId::new("var-1"),
//!             attributes: AttributeSelection::new(),
//!             quantity: 2,
//!             unit_price: Money::new(1000, Currency::USD),
//!         },
//!     )
//!     .unwrap();
//!
//! let cart = service.cart(&user).unwrap();
//! let order = service.checkout(&user, &cart.id).unwrap();
//! assert_eq!(order.total().unwrap(), Money::new(2000, Currency::USD));
//! assert!(service.cart(&user).unwrap().is_empty());
//! ```

pub mod authz;
pub mod catalog;
pub mod notify;
pub mod service;
pub mod store;

pub use authz::{Action, AllowAll, Authorizer};
pub use catalog::{Catalog, StaticCatalog, VariantRecord};
pub use checkout_core::events::EventSink;
pub use notify::TracingSink;
pub use service::{AddItemRequest, CheckoutService};
pub use store::MemoryStore;
