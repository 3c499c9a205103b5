//! Gatherd Server Library
//!
//! This module exposes the server components for testing and embedding.

pub mod api;
pub mod error;
pub mod models;
pub mod services;
pub mod slug;
pub mod state;
pub mod store;
pub mod validation;

use anyhow::Result;
use std::sync::Arc;

use store::fs::FsObjectStore;
use store::memory::MemoryStore;

/// Create and configure the server application.
///
/// Wires the in-memory persistence backend and the filesystem object store;
/// the store traits in [`store`] are the seam for swapping either out.
pub async fn create_app(config: state::Config) -> Result<axum::Router> {
    let objects = FsObjectStore::new(config.media_dir.clone());
    objects.ensure_media_dir().await?;

    let store = MemoryStore::new();
    let app_state = state::AppState::new(config, store.clone(), store, Arc::new(objects));
    Ok(api::create_router(app_state))
}
