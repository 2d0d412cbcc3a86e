//! Primary list state machine and its async driver.
//!
//! [`ListMachine`] holds the transitions: every change to the list, the
//! active mood, the sequence counter or the trending sub-state goes through
//! one of its methods. [`DiscoveryController`] issues the catalog fetches
//! and feeds outcomes back in, dropping anything that arrives after
//! teardown.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use mitra_core::defaults::MOOD_LIST_ERROR;
use mitra_core::{
    CatalogSource, Entity, EntityKind, Error, EventBus, ListQuery, ListRequest, ListState, Mood,
    Result, TrendingState, ViewEvent,
};

/// Renderable copy of a controller's state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiscoveryView {
    pub list: ListState,
    /// Last settled query text (trimmed).
    pub query: String,
    pub active_mood: Option<Mood>,
    /// Sequence number of the most recently issued list request.
    pub sequence: u64,
    pub trending: TrendingState,
}

/// Synchronous transitions for one list surface.
#[derive(Debug, Clone)]
pub struct ListMachine {
    kind: EntityKind,
    view: DiscoveryView,
}

impl ListMachine {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            view: DiscoveryView::default(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn view(&self) -> &DiscoveryView {
        &self.view
    }

    fn issue(&mut self, query: ListQuery) -> ListRequest {
        self.view.sequence += 1;
        self.view.list = ListState::Loading;
        ListRequest {
            query,
            sequence: self.view.sequence,
        }
    }

    /// A typed query settled: drop any mood and list by text.
    pub fn query_settled(&mut self, query: &str) -> ListRequest {
        self.view.query = query.trim().to_string();
        self.view.active_mood = None;
        let query = ListQuery::for_text(&self.view.query);
        self.issue(query)
    }

    /// A mood was picked: list by its genre filter.
    pub fn mood_activated(&mut self, mood: Mood) -> Result<ListRequest> {
        if self.kind != EntityKind::Movie {
            return Err(Error::InvalidInput(format!(
                "mood '{}' cannot filter {} listings",
                mood.id,
                self.kind.label()
            )));
        }
        self.view.active_mood = Some(mood);
        Ok(self.issue(ListQuery::MoodFiltered(mood)))
    }

    /// The mood was cleared: list by the stored query text again.
    pub fn mood_cleared(&mut self) -> ListRequest {
        self.view.active_mood = None;
        let query = ListQuery::for_text(&self.view.query);
        self.issue(query)
    }

    /// Apply a successful fetch. Returns false when `sequence` is stale.
    pub fn request_succeeded(&mut self, sequence: u64, items: Vec<Entity>) -> bool {
        if sequence != self.view.sequence {
            return false;
        }
        self.view.list = ListState::Loaded(items);
        true
    }

    /// Apply a failed fetch. Returns false when `sequence` is stale.
    pub fn request_failed(&mut self, sequence: u64) -> bool {
        if sequence != self.view.sequence {
            return false;
        }
        let message = if self.view.active_mood.is_some() {
            MOOD_LIST_ERROR
        } else {
            self.kind.list_error_message()
        };
        self.view.list = ListState::Error(message.to_string());
        true
    }

    /// Start the trending fetch. Returns false if it was already requested.
    pub fn trending_requested(&mut self) -> bool {
        if self.view.trending != TrendingState::NotRequested {
            return false;
        }
        self.view.trending = TrendingState::Loading;
        true
    }

    pub fn trending_succeeded(&mut self, items: Vec<Entity>) {
        self.view.trending = TrendingState::Loaded(items);
    }

    pub fn trending_failed(&mut self) {
        self.view.trending = TrendingState::Unavailable;
    }
}

struct ControllerInner {
    kind: EntityKind,
    catalog: Arc<dyn CatalogSource>,
    events: EventBus,
    session_id: Uuid,
    cancel: CancellationToken,
    machine: Mutex<ListMachine>,
}

/// Drives one list surface (movies or actors).
///
/// Cheap to clone; clones share state and cancellation.
#[derive(Clone)]
pub struct DiscoveryController {
    inner: Arc<ControllerInner>,
}

impl DiscoveryController {
    pub fn new(
        kind: EntityKind,
        catalog: Arc<dyn CatalogSource>,
        events: EventBus,
        session_id: Uuid,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                kind,
                catalog,
                events,
                session_id,
                cancel,
                machine: Mutex::new(ListMachine::new(kind)),
            }),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.inner.kind
    }

    pub fn snapshot(&self) -> DiscoveryView {
        self.machine().view().clone()
    }

    pub fn is_active(&self) -> bool {
        !self.inner.cancel.is_cancelled()
    }

    /// Stop applying results; in-flight fetches are discarded on return.
    pub fn teardown(&self) {
        self.inner.cancel.cancel();
    }

    fn machine(&self) -> MutexGuard<'_, ListMachine> {
        self.inner
            .machine
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: ViewEvent) {
        self.inner.events.emit(self.inner.session_id, event);
    }

    fn emit_list(&self, machine: &ListMachine) {
        self.emit(ViewEvent::ListChanged {
            kind: self.inner.kind,
            sequence: machine.view().sequence,
            state: machine.view().list.clone(),
        });
    }

    /// Run `transition` under the lock and publish the resulting list state.
    fn begin<F>(&self, transition: F) -> Result<Option<ListRequest>>
    where
        F: FnOnce(&mut ListMachine) -> Result<ListRequest>,
    {
        if !self.is_active() {
            return Ok(None);
        }
        let mut machine = self.machine();
        let request = transition(&mut machine)?;
        self.emit_list(&machine);
        Ok(Some(request))
    }

    /// Handle a settled query: `""` lists the default page.
    pub async fn settle_query(&self, query: &str) {
        // The query transition has no input errors.
        if let Ok(Some(request)) = self.begin(|m| Ok(m.query_settled(query))) {
            self.run(request).await;
        }
    }

    /// Commit the query transition now and fetch in the background.
    ///
    /// Settled queries arriving back to back get sequence numbers in
    /// arrival order even though their fetches race.
    pub fn spawn_settle_query(&self, query: &str) -> Option<JoinHandle<()>> {
        let request = self.begin(|m| Ok(m.query_settled(query))).ok().flatten()?;
        let this = self.clone();
        Some(tokio::spawn(async move { this.run(request).await }))
    }

    /// Switch the list to a mood's genre filter.
    pub async fn activate_mood(&self, mood: Mood) -> Result<()> {
        if let Some(request) = self.begin(|m| m.mood_activated(mood))? {
            self.run(request).await;
        }
        Ok(())
    }

    /// Drop the active mood and re-list by the stored query.
    pub async fn clear_mood(&self) {
        if let Ok(Some(request)) = self.begin(|m| Ok(m.mood_cleared())) {
            self.run(request).await;
        }
    }

    async fn run(&self, request: ListRequest) {
        let kind = self.inner.kind;
        let start = Instant::now();
        let outcome = self.inner.catalog.fetch_list(kind, &request.query).await;

        if !self.is_active() {
            debug!(
                subsystem = "discovery",
                component = "list",
                kind = %kind,
                sequence = request.sequence,
                "Controller torn down, discarding list response"
            );
            return;
        }

        let mut machine = self.machine();
        let applied = match outcome {
            Ok(items) => {
                let count = items.len();
                let applied = machine.request_succeeded(request.sequence, items);
                if applied {
                    debug!(
                        subsystem = "discovery",
                        component = "list",
                        kind = %kind,
                        sequence = request.sequence,
                        query_kind = request.query.label(),
                        result_count = count,
                        duration_ms = start.elapsed().as_millis() as u64,
                        "List loaded"
                    );
                }
                applied
            }
            Err(e) => {
                let applied = machine.request_failed(request.sequence);
                if applied {
                    warn!(
                        subsystem = "discovery",
                        component = "list",
                        kind = %kind,
                        sequence = request.sequence,
                        query_kind = request.query.label(),
                        status = e.status(),
                        error = %e,
                        "List request failed"
                    );
                }
                applied
            }
        };

        if applied {
            self.emit_list(&machine);
        } else {
            debug!(
                subsystem = "discovery",
                component = "list",
                kind = %kind,
                sequence = request.sequence,
                current = machine.view().sequence,
                "Stale list response discarded"
            );
        }
    }

    /// Fetch the trending sub-list once; later calls are no-ops.
    pub async fn request_trending(&self) {
        let kind = self.inner.kind;
        {
            if !self.is_active() {
                return;
            }
            let mut machine = self.machine();
            if !machine.trending_requested() {
                return;
            }
            self.emit_trending(&machine);
        }

        let outcome = self
            .inner
            .catalog
            .fetch_list(kind, &ListQuery::Trending)
            .await;

        if !self.is_active() {
            return;
        }

        let mut machine = self.machine();
        match outcome {
            Ok(items) => {
                info!(
                    subsystem = "discovery",
                    component = "list",
                    kind = %kind,
                    result_count = items.len(),
                    "Trending loaded"
                );
                machine.trending_succeeded(items);
            }
            Err(e) => {
                warn!(
                    subsystem = "discovery",
                    component = "list",
                    kind = %kind,
                    error = %e,
                    "Trending unavailable"
                );
                machine.trending_failed();
            }
        }
        self.emit_trending(&machine);
    }

    fn emit_trending(&self, machine: &ListMachine) {
        self.emit(ViewEvent::TrendingChanged {
            kind: self.inner.kind,
            state: machine.view().trending.clone(),
        });
    }
}
