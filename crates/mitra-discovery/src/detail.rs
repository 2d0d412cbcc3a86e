//! Detail selection: fetch, merge, summarize.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use mitra_core::{
    CatalogSource, DetailRecord, Entity, EntityKind, Error, EventBus, MarkdownRenderer, Result,
    SafeHtml, ViewEvent,
};

use crate::summary::AISummaryService;

/// Summary slot of the selected record.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryState {
    Pending,
    Ready {
        text: String,
        html: SafeHtml,
        is_fallback: bool,
    },
}

/// The record shown in the detail view.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub record: DetailRecord,
    pub summary: SummaryState,
}

#[derive(Default)]
struct SelectionCore {
    selected: Option<Selection>,
    /// Bumped on every select and clear; only the latest fetch commits.
    sequence: u64,
}

struct DetailInner {
    kind: EntityKind,
    catalog: Arc<dyn CatalogSource>,
    summaries: Arc<AISummaryService>,
    renderer: Arc<dyn MarkdownRenderer>,
    events: EventBus,
    session_id: Uuid,
    cancel: CancellationToken,
    core: Mutex<SelectionCore>,
}

/// Drives the detail view for one surface.
#[derive(Clone)]
pub struct DetailSelectionController {
    inner: Arc<DetailInner>,
}

impl DetailSelectionController {
    pub fn new(
        kind: EntityKind,
        catalog: Arc<dyn CatalogSource>,
        summaries: Arc<AISummaryService>,
        renderer: Arc<dyn MarkdownRenderer>,
        events: EventBus,
        session_id: Uuid,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            inner: Arc::new(DetailInner {
                kind,
                catalog,
                summaries,
                renderer,
                events,
                session_id,
                cancel,
                core: Mutex::new(SelectionCore::default()),
            }),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.inner.kind
    }

    /// Currently selected record, if any.
    pub fn selection(&self) -> Option<Selection> {
        self.core().selected.clone()
    }

    fn core(&self) -> MutexGuard<'_, SelectionCore> {
        self.inner.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_active(&self) -> bool {
        !self.inner.cancel.is_cancelled()
    }

    fn emit(&self, event: ViewEvent) {
        self.inner.events.emit(self.inner.session_id, event);
    }

    /// Open the detail view for a list entity.
    ///
    /// A failed detail fetch is logged and leaves the current selection
    /// exactly as it was. Only a kind mismatch is reported to the caller.
    pub async fn select(&self, entity: Entity) -> Result<()> {
        let kind = self.inner.kind;
        if entity.kind != kind {
            return Err(Error::InvalidInput(format!(
                "cannot select a {} in the {} detail view",
                entity.kind.label(),
                kind.label()
            )));
        }
        if !self.is_active() {
            return Ok(());
        }

        let sequence = {
            let mut core = self.core();
            core.sequence += 1;
            core.sequence
        };

        let detail = self.inner.catalog.fetch_detail(kind, entity.id).await;
        if !self.is_active() {
            return Ok(());
        }

        let detail = match detail {
            Ok(detail) => detail,
            Err(e) => {
                warn!(
                    subsystem = "discovery",
                    component = "detail",
                    kind = %kind,
                    entity_id = %entity.id,
                    status = e.status(),
                    error = %e,
                    "Detail fetch failed, selection unchanged"
                );
                return Ok(());
            }
        };

        let record = entity.merge(detail);
        {
            let mut core = self.core();
            if core.sequence != sequence {
                debug!(
                    subsystem = "discovery",
                    component = "detail",
                    kind = %kind,
                    entity_id = %entity.id,
                    "Superseded detail response discarded"
                );
                return Ok(());
            }
            core.selected = Some(Selection {
                record: record.clone(),
                summary: SummaryState::Pending,
            });
            self.emit(ViewEvent::SelectionChanged {
                kind,
                selected: Some(record.clone()),
            });
        }

        let entry = self.inner.summaries.summarize(&record.entity).await;
        if !self.is_active() {
            return Ok(());
        }
        let html = self.inner.renderer.render(&entry.text);

        let mut core = self.core();
        if core.sequence != sequence {
            return Ok(());
        }
        if let Some(selection) = core.selected.as_mut() {
            selection.summary = SummaryState::Ready {
                text: entry.text.clone(),
                html,
                is_fallback: entry.is_fallback,
            };
            self.emit(ViewEvent::SummaryReady {
                kind,
                id: record.id(),
                text: entry.text,
                is_fallback: entry.is_fallback,
            });
        }
        Ok(())
    }

    /// Close the detail view and ignore any fetch still in flight.
    pub fn clear(&self) {
        let mut core = self.core();
        core.sequence += 1;
        if core.selected.take().is_some() {
            self.emit(ViewEvent::SelectionChanged {
                kind: self.inner.kind,
                selected: None,
            });
        }
    }
}
