//! Authorization seam.
//!
//! Policy decisions are made outside the core by an external policy
//! service. The checkout service consults this interface before mutating
//! and applies plain ownership filtering on reads as defense in depth.

use checkout_core::ids::UserId;

/// Actions the checkout service asks the policy layer about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ViewCart,
    EditCart,
    Checkout,
    ViewOrder,
    EditOrder,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::ViewCart => "view_cart",
            Action::EditCart => "edit_cart",
            Action::Checkout => "checkout",
            Action::ViewOrder => "view_order",
            Action::EditOrder => "edit_order",
        }
    }
}

/// External policy decision point.
pub trait Authorizer: Send + Sync {
    /// Whether `user` may perform `action` on `resource`.
    fn authorize(&self, user: &UserId, action: Action, resource: &str) -> bool;
}

/// Authorizer that permits everything. The default when the real policy
/// layer runs in front of the service.
#[derive(Debug, Default)]
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn authorize(&self, _user: &UserId, _action: Action, _resource: &str) -> bool {
        true
    }
}
