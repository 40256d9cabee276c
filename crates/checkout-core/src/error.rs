//! Checkout error types.

use thiserror::Error;

/// Errors that can occur in cart and checkout operations.
///
/// Every variant is scoped to a single request: validation failures are
/// detected before any mutation, and transaction-level failures
/// (`Conflict`) are retryable because no side effect was committed.
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// Checkout attempted on a cart with no items.
    #[error("Cart is empty")]
    EmptyCart,

    /// Cart not found or not owned by the caller.
    #[error("Cart not found: {0}")]
    CartNotFound(String),

    /// Cart item not found or not owned by the caller.
    #[error("Item not in cart: {0}")]
    CartItemNotFound(String),

    /// Order not found or not owned by the caller.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Order item not found within the order.
    #[error("Order item not found: {0}")]
    OrderItemNotFound(String),

    /// Variant unknown to the catalog.
    #[error("Variant not found: {0}")]
    VariantNotFound(String),

    /// Non-positive quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds the per-item maximum.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Attribute value outside the variant's declared domain.
    #[error("Invalid attribute selection for variant {variant}: {option}={value}")]
    InvalidAttributeSelection {
        variant: String,
        option: String,
        value: String,
    },

    /// Illegal order item status change.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    /// Concurrent checkout detected, or the store is transiently unusable.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Authorization veto.
    #[error("Forbidden: {action} on {resource}")]
    Forbidden { action: String, resource: String },

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow in a money calculation.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,
}

impl CheckoutError {
    /// Whether the caller can safely retry without observing partial state.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CheckoutError::Conflict(_))
    }
}
