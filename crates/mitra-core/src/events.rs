//! View events and the event bus the UI layer subscribes to.
//!
//! Controllers publish one event per committed state change. The UI can
//! either poll controller snapshots or subscribe here; both observe the
//! same commit order.

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::{DetailRecord, EntityId, EntityKind, ListState, TrendingState};

/// A committed change in some controller's view state.
#[derive(Debug, Clone)]
pub enum ViewEvent {
    /// Primary list moved to a new state.
    ListChanged {
        kind: EntityKind,
        sequence: u64,
        state: ListState,
    },
    /// Trending sub-state changed.
    TrendingChanged {
        kind: EntityKind,
        state: TrendingState,
    },
    /// Selected detail record changed (None when closed).
    SelectionChanged {
        kind: EntityKind,
        selected: Option<DetailRecord>,
    },
    /// Summary for the selected subject is available.
    SummaryReady {
        kind: EntityKind,
        id: EntityId,
        text: String,
        is_fallback: bool,
    },
}

impl ViewEvent {
    /// Dot-namespaced event type.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ListChanged { .. } => "list.changed",
            Self::TrendingChanged { .. } => "trending.changed",
            Self::SelectionChanged { .. } => "selection.changed",
            Self::SummaryReady { .. } => "summary.ready",
        }
    }
}

/// Event plus emission metadata.
#[derive(Debug, Clone)]
pub struct EventEnvelope {
    /// Unique event identifier (UUIDv7 for temporal ordering).
    pub event_id: Uuid,
    /// Browse session that emitted the event.
    pub session_id: Uuid,
    /// When the change was committed (UTC).
    pub occurred_at: DateTime<Utc>,
    pub payload: ViewEvent,
}

impl EventEnvelope {
    pub fn new(session_id: Uuid, payload: ViewEvent) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            session_id,
            occurred_at: Utc::now(),
            payload,
        }
    }
}

/// Broadcast bus for view events.
///
/// Cloning shares the underlying channel.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit an event to all subscribers.
    ///
    /// If there are no active subscribers, the event is silently dropped.
    pub fn emit(&self, session_id: Uuid, event: ViewEvent) {
        let envelope = EventEnvelope::new(session_id, event);
        tracing::trace!(
            event_type = envelope.payload.event_type(),
            event_id = %envelope.event_id,
            session_id = %session_id,
            subscriber_count = self.tx.receiver_count(),
            "EventBus emit"
        );
        let _ = self.tx.send(envelope);
    }

    /// Subscribe; each subscriber gets its own independent stream.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.tx.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(crate::defaults::EVENT_BUS_CAPACITY)
    }
}
