//! Event sinks backed by `tracing`.

use checkout_core::events::{CheckoutEvent, EventSink};

/// Sink that logs every event as a structured `tracing` record.
///
/// Cancellations are logged at `warn` so they stand out in the stream,
/// matching what a notification consumer would subscribe to first.
#[derive(Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: CheckoutEvent) {
        match &event {
            CheckoutEvent::OrderPlaced {
                order_id,
                user_id,
                item_count,
            } => {
                tracing::info!(%order_id, %user_id, item_count, "order placed");
            }
            CheckoutEvent::ItemStatusChanged {
                order_id,
                item_id,
                from,
                to,
            } => {
                tracing::info!(%order_id, %item_id, from = %from, to = %to, "order item status changed");
            }
            CheckoutEvent::OrderItemCancelled { order_id, item_id } => {
                tracing::warn!(%order_id, %item_id, "order item cancelled");
            }
        }
    }
}
