//! # mitra-catalog
//!
//! Catalog API client for the MovieMitra discovery core.
//!
//! This crate provides:
//! - [`FetchOrchestrator`]: single-attempt, bearer-authenticated JSON GETs
//!   with a typed failure taxonomy (transport / HTTP status / decode)
//! - The endpoint table for listing, search, mood discovery, trending and
//!   detail lookups
//! - [`CatalogClient`], the [`mitra_core::CatalogSource`] implementation
//!
//! # Example
//!
//! ```rust,no_run
//! use mitra_catalog::CatalogClient;
//! use mitra_core::{AppConfig, CatalogSource, EntityKind, ListQuery};
//!
//! #[tokio::main]
//! async fn main() -> mitra_core::Result<()> {
//!     let config = AppConfig::load()?;
//!     let client = CatalogClient::new(&config.catalog)?;
//!     let movies = client.fetch_list(EntityKind::Movie, &ListQuery::Trending).await?;
//!     println!("{} trending movies", movies.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod endpoints;
pub mod fetch;

pub use client::{decode_list, CatalogClient};
pub use endpoints::{detail_endpoint, list_endpoint, Endpoint};
pub use fetch::{FetchOrchestrator, FetchOutcome, RequestOptions};
