//! Typed catalog client.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

use mitra_core::{
    CatalogConfig, CatalogSource, Entity, EntityId, EntityKind, Error, ListQuery, Result,
};

use crate::endpoints::{detail_endpoint, list_endpoint};
use crate::fetch::FetchOrchestrator;

/// Catalog client over [`FetchOrchestrator`].
#[derive(Clone)]
pub struct CatalogClient {
    fetch: FetchOrchestrator,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        Ok(Self {
            fetch: FetchOrchestrator::new(config)?,
        })
    }

    pub fn from_fetcher(fetch: FetchOrchestrator) -> Self {
        Self { fetch }
    }

    pub fn fetcher(&self) -> &FetchOrchestrator {
        &self.fetch
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    #[instrument(skip(self, query), fields(subsystem = "catalog", component = "client", op = "fetch_list", kind = %kind, query_kind = query.label()))]
    async fn fetch_list(&self, kind: EntityKind, query: &ListQuery) -> Result<Vec<Entity>> {
        let endpoint = list_endpoint(kind, query)?;
        let body = self.fetch.request(&endpoint.path, &endpoint.options()).await?;
        let items = decode_list(kind, body)?;
        debug!(result_count = items.len(), "List fetched");
        Ok(items)
    }

    #[instrument(skip(self), fields(subsystem = "catalog", component = "client", op = "fetch_detail", kind = %kind, entity_id = %id))]
    async fn fetch_detail(&self, kind: EntityKind, id: EntityId) -> Result<Entity> {
        let endpoint = detail_endpoint(kind, id);
        let body = self.fetch.request(&endpoint.path, &endpoint.options()).await?;
        Entity::from_json(kind, body)
    }
}

/// Decode a list body.
///
/// A missing or null `results` is an empty list; anything else that is not
/// an array of records with ids is a decode error.
pub fn decode_list(kind: EntityKind, body: Value) -> Result<Vec<Entity>> {
    let Value::Object(mut object) = body else {
        return Err(Error::Decode(format!(
            "{} list body is not a JSON object",
            kind
        )));
    };
    match object.remove("results") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| Entity::from_json(kind, item))
            .collect(),
        Some(_) => Err(Error::Decode(format!(
            "{} list `results` is not an array",
            kind
        ))),
    }
}
