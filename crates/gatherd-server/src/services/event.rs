use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{CreateEvent, EVENT_STATUS_DRAFT, Event, UpdateEvent};
use crate::services::community::nonempty_slug;
use crate::store::{CommunityStore, EventFilter, EventPatch, EventStore, ObjectStore};
use crate::validation::validate_event;

#[derive(Clone)]
pub struct EventService {
    communities: Arc<dyn CommunityStore>,
    events: Arc<dyn EventStore>,
    objects: Arc<dyn ObjectStore>,
}

impl EventService {
    pub fn new(
        communities: Arc<dyn CommunityStore>,
        events: Arc<dyn EventStore>,
        objects: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            communities,
            events,
            objects,
        }
    }

    /// Create an event: the referenced community must exist, the slug must be
    /// unique within that community, and the community's event counter is
    /// bumped with an atomic increment after the event write. The two writes
    /// are separate store calls; `reconcile_event_counts` covers the window
    /// between them.
    pub async fn create(&self, payload: CreateEvent) -> Result<Event> {
        let outcome = validate_event(&payload);
        if !outcome.valid {
            return Err(AppError::Validation(outcome.errors));
        }

        let community_id = required_id(payload.community.as_deref(), "community")?;
        let created_by = required_id(payload.created_by.as_deref(), "createdBy")?;

        if self.communities.find_by_id(community_id).await?.is_none() {
            return Err(AppError::UnknownCommunity);
        }

        let name = payload.name.unwrap_or_default().trim().to_string();
        let slug = nonempty_slug(&name)?;

        let existing = self
            .events
            .find_one(EventFilter {
                community: Some(community_id),
                slug: Some(slug.clone()),
                ..Default::default()
            })
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(
                "Event with name already exists".to_string(),
            ));
        }

        let now = chrono::Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            name,
            slug,
            description: payload.description,
            community: community_id,
            venue: payload.venue.unwrap_or_default().trim().to_string(),
            date: payload.date.unwrap_or_default().trim().to_string(),
            recurring: payload.recurring.unwrap_or(false),
            status: EVENT_STATUS_DRAFT.to_string(),
            accepted: Vec::new(),
            declined: Vec::new(),
            image: None,
            gallery: Vec::new(),
            created_by,
            created_at: now,
            updated_at: now,
        };

        let event = self.events.insert(event).await?;

        // Existence was checked above; the community vanishing in between is
        // a data-integrity condition, not a user error.
        if !self
            .communities
            .increment_event_count(community_id, 1)
            .await?
        {
            return Err(AppError::Integrity(format!(
                "community {community_id} vanished between existence check and counter update"
            )));
        }

        Ok(event)
    }

    pub async fn list(&self) -> Result<Vec<Event>> {
        self.events.find_all().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Event> {
        self.events
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))
    }

    /// Events the given user has accepted an invite to.
    pub async fn list_by_responder(&self, user_id: Uuid) -> Result<Vec<Event>> {
        self.events
            .find_many(EventFilter {
                accepted_responder: Some(user_id),
                ..Default::default()
            })
            .await
    }

    /// Patch an event. A new name recomputes the slug and re-checks
    /// uniqueness within the owning community, excluding the event itself.
    pub async fn update(&self, id: Uuid, payload: UpdateEvent) -> Result<Event> {
        let event = self.get(id).await?;

        let mut patch = EventPatch {
            description: payload.description,
            venue: payload.venue,
            date: payload.date,
            recurring: payload.recurring,
            status: payload.status,
            ..Default::default()
        };

        if let Some(name) = payload.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                let mut errors = HashMap::new();
                errors.insert("name".to_string(), "event name is required".to_string());
                return Err(AppError::Validation(errors));
            }
            let slug = nonempty_slug(&name)?;

            let existing = self
                .events
                .find_one(EventFilter {
                    community: Some(event.community),
                    slug: Some(slug.clone()),
                    exclude_id: Some(id),
                    ..Default::default()
                })
                .await?;
            if existing.is_some() {
                return Err(AppError::Conflict(
                    "Event with name already exists".to_string(),
                ));
            }

            patch.name = Some(name);
            patch.slug = Some(slug);
        }

        self.events
            .update_by_id(id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))
    }

    /// Delete an event: decrement the owning community's counter, release
    /// every referenced object with a single batch delete (skipped when the
    /// event holds no media), then remove the record. A store failure aborts
    /// before the record delete so no reference ever dangles.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let event = self.get(id).await?;

        if !self
            .communities
            .increment_event_count(event.community, -1)
            .await?
        {
            // The community may have been deleted out from under its events;
            // the event itself and its media still have to go.
            tracing::warn!(
                community = %event.community,
                event = %id,
                "owning community missing during event delete, skipping counter"
            );
        }

        let mut keys: Vec<String> = Vec::new();
        if let Some(image) = &event.image {
            keys.push(image.key.clone());
        }
        keys.extend(event.gallery.iter().map(|item| item.key.clone()));

        if !keys.is_empty() {
            self.objects.delete_objects(&keys).await?;
        }

        self.events.delete_by_id(id).await?;
        Ok(())
    }
}

/// Re-parse an id field the validation gate has already vetted. Kept as a
/// real error path so the services stay safe to call without the gate.
fn required_id(value: Option<&str>, field: &str) -> Result<Uuid> {
    value
        .and_then(|s| Uuid::parse_str(s.trim()).ok())
        .ok_or_else(|| {
            let mut errors = HashMap::new();
            errors.insert(
                field.to_string(),
                format!("{field} should be a valid id"),
            );
            AppError::Validation(errors)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateCommunity, ImageAsset};
    use crate::services::CommunityService;
    use crate::store::memory::{MemoryObjectStore, MemoryStore, ObjectStoreCall};

    struct Fixture {
        communities: CommunityService,
        events: EventService,
        store: Arc<MemoryStore>,
        objects: Arc<MemoryObjectStore>,
    }

    fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let objects = MemoryObjectStore::new();
        Fixture {
            communities: CommunityService::new(store.clone(), store.clone(), objects.clone()),
            events: EventService::new(store.clone(), store.clone(), objects.clone()),
            store,
            objects,
        }
    }

    async fn seed_community(fixture: &Fixture, name: &str) -> Uuid {
        fixture
            .communities
            .create(CreateCommunity {
                name: Some(name.to_string()),
                description: None,
                avatar: None,
                created_by: None,
            })
            .await
            .unwrap()
            .id
    }

    fn event_payload(name: &str, community: Uuid) -> CreateEvent {
        CreateEvent {
            name: Some(name.to_string()),
            description: None,
            community: Some(community.to_string()),
            venue: Some("HQ".to_string()),
            date: Some("2024-01-01".to_string()),
            recurring: None,
            created_by: Some(Uuid::new_v4().to_string()),
        }
    }

    #[tokio::test]
    async fn create_checks_community_and_bumps_counter() {
        let f = fixture();
        let community_id = seed_community(&f, "Foo Builders").await;

        let event = f
            .events
            .create(event_payload("Kickoff", community_id))
            .await
            .unwrap();
        assert_eq!(event.slug, "kickoff");
        assert_eq!(event.status, "draft");
        assert!(!event.recurring);

        let community = f.communities.get(community_id).await.unwrap();
        assert_eq!(community.count, 1);

        let err = f
            .events
            .create(event_payload("Kickoff", Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnknownCommunity));
    }

    #[tokio::test]
    async fn slug_unique_within_community_only() {
        let f = fixture();
        let first = seed_community(&f, "Foo Builders").await;
        let second = seed_community(&f, "Bar Crew").await;

        f.events
            .create(event_payload("Kickoff", first))
            .await
            .unwrap();

        // Same name in the same community collides.
        let err = f
            .events
            .create(event_payload("KICKOFF", first))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // Same name in a different community is fine.
        f.events
            .create(event_payload("Kickoff", second))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn counter_converges_under_concurrent_creates() {
        let f = fixture();
        let community_id = seed_community(&f, "Foo Builders").await;

        let mut handles = Vec::new();
        for i in 0..16 {
            let events = f.events.clone();
            handles.push(tokio::spawn(async move {
                events
                    .create(event_payload(&format!("Event {i}"), community_id))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let community = f.communities.get(community_id).await.unwrap();
        assert_eq!(community.count, 16);

        // Interleaved deletes bring it back down.
        let mut handles = Vec::new();
        for event in f.events.list().await.unwrap() {
            let events = f.events.clone();
            handles.push(tokio::spawn(async move {
                events.delete(event.id).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let community = f.communities.get(community_id).await.unwrap();
        assert_eq!(community.count, 0);
    }

    #[tokio::test]
    async fn rename_rechecks_scope_excluding_self() {
        let f = fixture();
        let community_id = seed_community(&f, "Foo Builders").await;
        let kickoff = f
            .events
            .create(event_payload("Kickoff", community_id))
            .await
            .unwrap();
        f.events
            .create(event_payload("Retro", community_id))
            .await
            .unwrap();

        // Renaming to its own slug is not a conflict.
        let updated = f
            .events
            .update(
                kickoff.id,
                UpdateEvent {
                    name: Some("Kick Off".to_string()),
                    description: None,
                    venue: Some("Offsite".to_string()),
                    date: None,
                    recurring: None,
                    status: Some("published".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.slug, "kick-off");
        assert_eq!(updated.venue, "Offsite");
        assert_eq!(updated.status, "published");

        let err = f
            .events
            .update(
                kickoff.id,
                UpdateEvent {
                    name: Some("Retro".to_string()),
                    description: None,
                    venue: None,
                    date: None,
                    recurring: None,
                    status: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_cascades_counter_and_media_in_one_batch() {
        let f = fixture();
        let community_id = seed_community(&f, "Foo Builders").await;
        let event = f
            .events
            .create(event_payload("Kickoff", community_id))
            .await
            .unwrap();

        for key in ["cover", "g1", "g2"] {
            f.objects.put(key).await;
        }
        EventStore::update_by_id(
            f.store.as_ref(),
            event.id,
            EventPatch {
                image: Some(Some(ImageAsset {
                    image_url: "https://img/cover".to_string(),
                    key: "cover".to_string(),
                })),
                gallery: Some(vec![
                    ImageAsset {
                        image_url: "https://img/g1".to_string(),
                        key: "g1".to_string(),
                    },
                    ImageAsset {
                        image_url: "https://img/g2".to_string(),
                        key: "g2".to_string(),
                    },
                ]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        f.events.delete(event.id).await.unwrap();

        assert_eq!(
            f.objects.calls().await,
            vec![ObjectStoreCall::Batch(vec![
                "cover".to_string(),
                "g1".to_string(),
                "g2".to_string(),
            ])]
        );
        let community = f.communities.get(community_id).await.unwrap();
        assert_eq!(community.count, 0);
        assert!(matches!(
            f.events.get(event.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn delete_without_media_issues_no_store_call() {
        let f = fixture();
        let community_id = seed_community(&f, "Foo Builders").await;
        let event = f
            .events
            .create(event_payload("Kickoff", community_id))
            .await
            .unwrap();

        f.events.delete(event.id).await.unwrap();
        assert!(f.objects.calls().await.is_empty());
    }

    #[tokio::test]
    async fn reconcile_repairs_a_skewed_counter() {
        let f = fixture();
        let community_id = seed_community(&f, "Foo Builders").await;
        f.events
            .create(event_payload("Kickoff", community_id))
            .await
            .unwrap();

        // Simulate a crash between event write and counter update.
        f.store.set_event_count(community_id, 7).await.unwrap();

        let repaired = f.communities.reconcile_event_counts().await.unwrap();
        assert_eq!(repaired, 1);
        assert_eq!(f.communities.get(community_id).await.unwrap().count, 1);
    }
}
