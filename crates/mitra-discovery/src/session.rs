//! Owning contexts: the process-wide collaborators and one browse session
//! per page.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use mitra_catalog::CatalogClient;
use mitra_core::{
    AppConfig, CatalogSource, Entity, EntityKind, EventBus, GenerationBackend, MarkdownRenderer,
    Mood, Result,
};
use mitra_inference::InferenceConfig;

use crate::debounce::QueryDebouncer;
use crate::detail::{DetailSelectionController, Selection};
use crate::list::{DiscoveryController, DiscoveryView};
use crate::render::SanitizingRenderer;
use crate::summary::AISummaryService;

/// Process-wide collaborators shared by every session.
#[derive(Clone)]
pub struct MitraContext {
    catalog: Arc<dyn CatalogSource>,
    summaries: Arc<AISummaryService>,
    renderer: Arc<dyn MarkdownRenderer>,
    events: EventBus,
    search_debounce: Duration,
}

impl MitraContext {
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        backend: Option<Arc<dyn GenerationBackend>>,
        renderer: Arc<dyn MarkdownRenderer>,
        search_debounce: Duration,
    ) -> Self {
        Self {
            catalog,
            summaries: Arc::new(AISummaryService::new(backend)),
            renderer,
            events: EventBus::default(),
            search_debounce,
        }
    }

    /// Wire the real catalog client, the configured generation backend and
    /// the sanitizing renderer.
    pub fn from_config(config: &AppConfig, inference: &InferenceConfig) -> Result<Self> {
        let catalog = CatalogClient::new(&config.catalog)?;
        let backend = inference.build_backend()?;
        Ok(Self::new(
            Arc::new(catalog),
            backend,
            Arc::new(SanitizingRenderer::new()),
            config.search_debounce(),
        ))
    }

    /// Load `.env` and the environment, then wire everything.
    pub fn from_env() -> Result<Self> {
        let config = AppConfig::load()?;
        let inference = InferenceConfig::from_env()?;
        Self::from_config(&config, &inference)
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn summaries(&self) -> &Arc<AISummaryService> {
        &self.summaries
    }

    pub fn renderer(&self) -> &Arc<dyn MarkdownRenderer> {
        &self.renderer
    }

    /// Open a browse session for the movie or actor page.
    pub fn open_session(&self, kind: EntityKind) -> BrowseSession {
        BrowseSession::new(self, kind)
    }
}

/// One page's worth of discovery state.
///
/// Holds the list controller, the detail controller and the query
/// debouncer; tearing the session down stops all three.
pub struct BrowseSession {
    id: Uuid,
    kind: EntityKind,
    list: DiscoveryController,
    detail: DetailSelectionController,
    debouncer: QueryDebouncer,
    settled_rx: Mutex<Option<mpsc::UnboundedReceiver<String>>>,
    cancel: CancellationToken,
}

impl BrowseSession {
    fn new(context: &MitraContext, kind: EntityKind) -> Self {
        let id = Uuid::now_v7();
        let cancel = CancellationToken::new();

        let list = DiscoveryController::new(
            kind,
            context.catalog.clone(),
            context.events.clone(),
            id,
            cancel.child_token(),
        );
        let detail = DetailSelectionController::new(
            kind,
            context.catalog.clone(),
            context.summaries.clone(),
            context.renderer.clone(),
            context.events.clone(),
            id,
            cancel.child_token(),
        );
        let (debouncer, settled_rx) =
            QueryDebouncer::spawn(context.search_debounce, cancel.child_token());

        Self {
            id,
            kind,
            list,
            detail,
            debouncer,
            settled_rx: Mutex::new(Some(settled_rx)),
            cancel,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn list(&self) -> &DiscoveryController {
        &self.list
    }

    pub fn detail(&self) -> &DetailSelectionController {
        &self.detail
    }

    pub fn view(&self) -> DiscoveryView {
        self.list.snapshot()
    }

    pub fn selection(&self) -> Option<Selection> {
        self.detail.selection()
    }

    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Fire trending and the default listing, and start applying settled
    /// queries. Calling it again is a no-op.
    pub fn mount(&self) {
        let Some(mut settled_rx) = self
            .settled_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        else {
            return;
        };

        info!(
            subsystem = "discovery",
            component = "session",
            session_id = %self.id,
            kind = %self.kind,
            "Browse session mounted"
        );

        let list = self.list.clone();
        tokio::spawn(async move { list.request_trending().await });

        self.list.spawn_settle_query("");

        let list = self.list.clone();
        let session_id = self.id;
        tokio::spawn(async move {
            while let Some(query) = settled_rx.recv().await {
                if list.spawn_settle_query(&query).is_none() {
                    break;
                }
            }
            debug!(
                subsystem = "discovery",
                component = "session",
                session_id = %session_id,
                "Settled-query loop stopped"
            );
        });
    }

    /// Feed one raw keystroke value.
    pub fn input(&self, raw: &str) {
        self.debouncer.push(raw);
    }

    /// Open the detail view for an entity from the list.
    pub async fn select(&self, entity: Entity) -> Result<()> {
        self.detail.select(entity).await
    }

    pub fn close_detail(&self) {
        self.detail.clear();
    }

    pub async fn activate_mood(&self, mood: Mood) -> Result<()> {
        self.list.activate_mood(mood).await
    }

    pub async fn clear_mood(&self) {
        self.list.clear_mood().await
    }

    /// Stop everything; nothing in flight changes state afterwards.
    pub fn teardown(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.cancel.cancel();
        info!(
            subsystem = "discovery",
            component = "session",
            session_id = %self.id,
            kind = %self.kind,
            "Browse session torn down"
        );
    }
}

impl Drop for BrowseSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
