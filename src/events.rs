use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Events emitted by the services after successful state changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Booking events
    BookingCreated(i64),
    BookingUpdated(i64),
    BookingCancelled(i64),
    BookingStatusChanged {
        booking_id: i64,
        old_status: String,
        new_status: String,
    },

    // Catalog events
    RateCreated(i64),
    RateUpdated(i64),
    RateDeleted(i64),
    RateTierCreated(i64),
    OneWayFeeCreated(i64),
    OneWayFeeUpdated(i64),
    OneWayFeeDeleted(i64),

    // Fleet events
    VehicleCreated(i64),
    VehicleUpdated(i64),
    VehicleGroupCreated(i64),
    LocationCreated(i64),

    // User events
    UserCreated(i64),
    GuestUserCreated(i64),

    // Payment events
    PaymentRecorded {
        booking_id: i64,
        payment_id: i64,
    },

    /// Generic event data
    Generic {
        message: String,
        timestamp: DateTime<Utc>,
        metadata: serde_json::Value,
    },
}

impl Event {
    /// Create a generic event with string data
    pub fn with_data(data: String) -> Self {
        Event::Generic {
            message: data,
            timestamp: Utc::now(),
            metadata: serde_json::Value::Null,
        }
    }
}

/// Handlers implementing this trait process events asynchronously.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle_event(&self, event: Event) -> Result<(), String>;
}

/// Drains the event channel and logs each event. Runs for the lifetime of
/// the server; exits when every sender has been dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::BookingStatusChanged {
                booking_id,
                old_status,
                new_status,
            } => {
                info!(
                    booking_id,
                    old_status, new_status, "Booking status changed"
                );
            }
            other => {
                info!("Received event: {:?}", other);
            }
        }
    }

    info!("Event processing loop terminated");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn event_sender_delivers_to_receiver() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);

        sender
            .send(Event::BookingCreated(42))
            .await
            .expect("send event");

        match rx.recv().await {
            Some(Event::BookingCreated(id)) => assert_eq!(id, 42),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_fails_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(8);
        drop(rx);
        let sender = EventSender::new(tx);

        assert!(sender.send(Event::BookingCreated(1)).await.is_err());
    }
}
