//! In-memory store implementations.
//!
//! Default backing for the server and the fixture for tests. Every trait
//! call takes the relevant lock once and releases it before returning, so a
//! call is atomic with respect to other calls; nothing is held across await
//! points. The traits are the seam a document-database backend would
//! implement instead.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Community, Event};
use crate::store::{
    CommunityFilter, CommunityPatch, CommunityStore, EventFilter, EventPatch, EventStore,
    ObjectStore,
};

#[derive(Default)]
pub struct MemoryStore {
    communities: RwLock<HashMap<Uuid, Community>>,
    events: RwLock<HashMap<Uuid, Event>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

fn matches_community(community: &Community, filter: &CommunityFilter) -> bool {
    if let Some(slug) = &filter.slug {
        if &community.slug != slug {
            return false;
        }
    }
    if let Some(exclude) = filter.exclude_id {
        if community.id == exclude {
            return false;
        }
    }
    true
}

fn matches_event(event: &Event, filter: &EventFilter) -> bool {
    if let Some(community) = filter.community {
        if event.community != community {
            return false;
        }
    }
    if let Some(slug) = &filter.slug {
        if &event.slug != slug {
            return false;
        }
    }
    if let Some(exclude) = filter.exclude_id {
        if event.id == exclude {
            return false;
        }
    }
    if let Some(responder) = filter.accepted_responder {
        if !event.accepted.iter().any(|r| r.id == responder) {
            return false;
        }
    }
    true
}

#[async_trait]
impl CommunityStore for MemoryStore {
    async fn insert(&self, community: Community) -> Result<Community> {
        let mut communities = self.communities.write().await;
        communities.insert(community.id, community.clone());
        Ok(community)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Community>> {
        let communities = self.communities.read().await;
        Ok(communities.get(&id).cloned())
    }

    async fn find_one(&self, filter: CommunityFilter) -> Result<Option<Community>> {
        let communities = self.communities.read().await;
        Ok(communities
            .values()
            .find(|c| matches_community(c, &filter))
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Community>> {
        let communities = self.communities.read().await;
        let mut all: Vec<Community> = communities.values().cloned().collect();
        all.sort_by_key(|c| c.created_at);
        Ok(all)
    }

    async fn update_by_id(&self, id: Uuid, patch: CommunityPatch) -> Result<Option<Community>> {
        let mut communities = self.communities.write().await;
        let Some(community) = communities.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            community.name = name;
        }
        if let Some(slug) = patch.slug {
            community.slug = slug;
        }
        if let Some(user) = patch.last_updated_by {
            community.last_updated_by = Some(user);
        }
        community.updated_at = Utc::now();
        Ok(Some(community.clone()))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        let mut communities = self.communities.write().await;
        Ok(communities.remove(&id).is_some())
    }

    async fn increment_event_count(&self, id: Uuid, delta: i64) -> Result<bool> {
        let mut communities = self.communities.write().await;
        let Some(community) = communities.get_mut(&id) else {
            return Ok(false);
        };
        community.count += delta;
        community.updated_at = Utc::now();
        Ok(true)
    }

    async fn set_event_count(&self, id: Uuid, count: i64) -> Result<bool> {
        let mut communities = self.communities.write().await;
        let Some(community) = communities.get_mut(&id) else {
            return Ok(false);
        };
        community.count = count;
        community.updated_at = Utc::now();
        Ok(true)
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn insert(&self, event: Event) -> Result<Event> {
        let mut events = self.events.write().await;
        events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.get(&id).cloned())
    }

    async fn find_one(&self, filter: EventFilter) -> Result<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.values().find(|e| matches_event(e, &filter)).cloned())
    }

    async fn find_many(&self, filter: EventFilter) -> Result<Vec<Event>> {
        let events = self.events.read().await;
        let mut matched: Vec<Event> = events
            .values()
            .filter(|e| matches_event(e, &filter))
            .cloned()
            .collect();
        matched.sort_by_key(|e| e.created_at);
        Ok(matched)
    }

    async fn find_all(&self) -> Result<Vec<Event>> {
        self.find_many(EventFilter::default()).await
    }

    async fn update_by_id(&self, id: Uuid, patch: EventPatch) -> Result<Option<Event>> {
        let mut events = self.events.write().await;
        let Some(event) = events.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            event.name = name;
        }
        if let Some(slug) = patch.slug {
            event.slug = slug;
        }
        if let Some(description) = patch.description {
            event.description = Some(description);
        }
        if let Some(venue) = patch.venue {
            event.venue = venue;
        }
        if let Some(date) = patch.date {
            event.date = date;
        }
        if let Some(recurring) = patch.recurring {
            event.recurring = recurring;
        }
        if let Some(status) = patch.status {
            event.status = status;
        }
        if let Some(accepted) = patch.accepted {
            event.accepted = accepted;
        }
        if let Some(declined) = patch.declined {
            event.declined = declined;
        }
        if let Some(image) = patch.image {
            event.image = image;
        }
        if let Some(gallery) = patch.gallery {
            event.gallery = gallery;
        }
        event.updated_at = Utc::now();
        Ok(Some(event.clone()))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        let mut events = self.events.write().await;
        Ok(events.remove(&id).is_some())
    }
}

/// Record of a single call issued to [`MemoryObjectStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectStoreCall {
    Single(String),
    Batch(Vec<String>),
}

/// Object store double that tracks held keys and every delete call, and can
/// be primed to fail the next call. Used by tests and available as an
/// ephemeral backend.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<Vec<String>>,
    calls: Mutex<Vec<ObjectStoreCall>>,
    fail_next: AtomicBool,
}

impl MemoryObjectStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register an object as held by the store, as an upload would.
    pub async fn put(&self, key: &str) {
        self.objects.lock().await.push(key.to_string());
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.objects.lock().await.iter().any(|k| k == key)
    }

    pub async fn calls(&self) -> Vec<ObjectStoreCall> {
        self.calls.lock().await.clone()
    }

    /// Make the next delete call fail with a dependency error.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    fn take_failure(&self) -> Result<()> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(AppError::Dependency(
                "object store unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn delete_object(&self, key: &str) -> Result<()> {
        self.take_failure()?;
        self.calls
            .lock()
            .await
            .push(ObjectStoreCall::Single(key.to_string()));
        self.objects.lock().await.retain(|k| k != key);
        Ok(())
    }

    async fn delete_objects(&self, keys: &[String]) -> Result<()> {
        self.take_failure()?;
        self.calls
            .lock()
            .await
            .push(ObjectStoreCall::Batch(keys.to_vec()));
        self.objects.lock().await.retain(|k| !keys.contains(k));
        Ok(())
    }
}
