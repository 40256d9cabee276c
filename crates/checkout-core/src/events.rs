//! Domain events emitted by the checkout service.
//!
//! Status transitions and completed checkouts produce explicit events for
//! an external notification collaborator, instead of implicit framework
//! callbacks.

use crate::ids::{OrderId, OrderItemId, UserId};
use crate::order::ItemStatus;
use serde::{Deserialize, Serialize};

/// An event produced by a committed state change.
///
/// Events are emitted after the change is durable; a failed operation
/// never produces one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CheckoutEvent {
    /// A cart was converted into an order.
    OrderPlaced {
        order_id: OrderId,
        user_id: UserId,
        item_count: usize,
    },
    /// An order item moved to a new fulfillment status.
    ItemStatusChanged {
        order_id: OrderId,
        item_id: OrderItemId,
        from: ItemStatus,
        to: ItemStatus,
    },
    /// An order item was cancelled. Emitted in addition to
    /// `ItemStatusChanged` so notification consumers can subscribe to
    /// cancellations alone.
    OrderItemCancelled {
        order_id: OrderId,
        item_id: OrderItemId,
    },
}

/// Consumer of checkout events.
///
/// Implementations must be cheap and infallible; delivery to slow or
/// unreliable backends belongs behind the implementation, not in the
/// checkout path.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: CheckoutEvent);
}

/// Sink that drops every event.
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: CheckoutEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes() {
        let event = CheckoutEvent::OrderItemCancelled {
            order_id: OrderId::new("order-1"),
            item_id: OrderItemId::new("item-1"),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("OrderItemCancelled"));
    }

    #[test]
    fn test_null_sink_accepts_events() {
        NullSink.emit(CheckoutEvent::OrderPlaced {
            order_id: OrderId::new("order-1"),
            user_id: UserId::new("user-1"),
            item_count: 2,
        });
    }
}
