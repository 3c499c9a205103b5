//! Collaborator seams for persistence and object storage.
//!
//! The services only ever talk to these traits. Each trait call is a single
//! atomic unit on the store side; nothing here assumes exclusive access to an
//! entity between two calls, and no multi-entity transaction is available.

pub mod fs;
pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Community, Event, ImageAsset, InviteResponse};

/// Filter for community lookups; `None` fields are unconstrained.
#[derive(Debug, Default, Clone)]
pub struct CommunityFilter {
    pub slug: Option<String>,
    /// Skip this id, used when re-checking a slug during rename.
    pub exclude_id: Option<Uuid>,
}

/// Filter for event lookups; `None` fields are unconstrained.
#[derive(Debug, Default, Clone)]
pub struct EventFilter {
    pub community: Option<Uuid>,
    pub slug: Option<String>,
    pub exclude_id: Option<Uuid>,
    /// Match events whose accepted list contains this user.
    pub accepted_responder: Option<Uuid>,
}

/// Partial update for a community; `None` fields are left untouched and
/// `updated_at` is refreshed by the store.
#[derive(Debug, Default, Clone)]
pub struct CommunityPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub last_updated_by: Option<Uuid>,
}

/// Partial update for an event. Two-level options distinguish "leave alone"
/// from "set to none" for the clearable image field.
#[derive(Debug, Default, Clone)]
pub struct EventPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub date: Option<String>,
    pub recurring: Option<bool>,
    pub status: Option<String>,
    pub accepted: Option<Vec<InviteResponse>>,
    pub declined: Option<Vec<InviteResponse>>,
    pub image: Option<Option<ImageAsset>>,
    pub gallery: Option<Vec<ImageAsset>>,
}

#[async_trait]
pub trait CommunityStore: Send + Sync {
    async fn insert(&self, community: Community) -> Result<Community>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Community>>;
    async fn find_one(&self, filter: CommunityFilter) -> Result<Option<Community>>;
    async fn find_all(&self) -> Result<Vec<Community>>;
    /// Applies the patch and returns the updated document, or `None` if the
    /// id is unknown.
    async fn update_by_id(&self, id: Uuid, patch: CommunityPatch) -> Result<Option<Community>>;
    async fn delete_by_id(&self, id: Uuid) -> Result<bool>;
    /// Atomic conditional update of the event counter: a single
    /// increment-by-delta on the store side, never a read-modify-write pair.
    /// Returns false if the community does not exist.
    async fn increment_event_count(&self, id: Uuid, delta: i64) -> Result<bool>;
    /// Overwrites the counter outright. Repair tool only; normal paths go
    /// through `increment_event_count`.
    async fn set_event_count(&self, id: Uuid, count: i64) -> Result<bool>;
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn insert(&self, event: Event) -> Result<Event>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>>;
    async fn find_one(&self, filter: EventFilter) -> Result<Option<Event>>;
    async fn find_many(&self, filter: EventFilter) -> Result<Vec<Event>>;
    async fn find_all(&self) -> Result<Vec<Event>>;
    async fn update_by_id(&self, id: Uuid, patch: EventPatch) -> Result<Option<Event>>;
    async fn delete_by_id(&self, id: Uuid) -> Result<bool>;
}

/// External keyed storage holding image bytes. This core manages only key
/// references; a failed delete must abort the metadata mutation that
/// triggered it.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn delete_object(&self, key: &str) -> Result<()>;
    /// One batched call for all keys; callers skip the call entirely for an
    /// empty set.
    async fn delete_objects(&self, keys: &[String]) -> Result<()>;
}
