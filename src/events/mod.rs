//! Domain event bus.
//!
//! Services publish events over an mpsc channel; a single consumer task logs
//! them. Delivery is best-effort and never blocks the request path.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Events emitted by the cart/order lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    CartItemAdded { session_id: String, dish_id: i32 },
    CartItemRemoved { session_id: String, dish_id: i32 },
    OrderCreated(i32),
    OrderStatusChanged {
        order_id: i32,
        old_status: String,
        new_status: String,
    },
    UserRegistered(i32),
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing when the consumer is gone.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(err) = self.send(event.clone()).await {
            warn!("Dropping event {:?}: {}", event, err);
        }
    }
}

/// Consumes events until all senders are dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::OrderCreated(order_id) => info!(order_id, "order created"),
            Event::OrderStatusChanged {
                order_id,
                old_status,
                new_status,
            } => info!(order_id, %old_status, %new_status, "order status changed"),
            Event::CartItemAdded {
                session_id,
                dish_id,
            } => info!(%session_id, dish_id, "cart item added"),
            Event::CartItemRemoved {
                session_id,
                dish_id,
            } => info!(%session_id, dish_id, "cart item removed"),
            Event::UserRegistered(user_id) => info!(user_id, "user registered"),
        }
    }
    info!("event channel closed; consumer exiting");
}
