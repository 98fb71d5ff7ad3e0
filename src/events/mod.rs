//! Domain-event bus.
//!
//! Transitions end with the dispatcher publishing events here; subscribers
//! (currently the cache invalidator) react without the dispatcher knowing
//! about them. Publishing never blocks and never fails the transition: a bus
//! with no subscribers simply drops the event.

use tokio::sync::broadcast;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainEvent {
    RequestChanged {
        request_id: Uuid,
    },
    QuoteChanged {
        quote_id: Uuid,
        request_id: Uuid,
    },
    BookingChanged {
        booking_id: Uuid,
    },
    ContractChanged {
        contract_id: Uuid,
        request_id: Option<Uuid>,
        booking_id: Option<Uuid>,
    },
    NotificationCreated {
        user_id: Uuid,
    },
}

#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, event: DomainEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!(?event, "domain event dropped, no subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
