use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Community, CreateCommunity, RenameCommunity};
use crate::slug::slugify;
use crate::store::{CommunityFilter, CommunityPatch, CommunityStore, EventStore, ObjectStore};
use crate::validation::validate_community;

#[derive(Clone)]
pub struct CommunityService {
    communities: Arc<dyn CommunityStore>,
    events: Arc<dyn EventStore>,
    objects: Arc<dyn ObjectStore>,
}

impl CommunityService {
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

    pub async fn create(&self, payload: CreateCommunity) -> Result<Community> {
        let outcome = validate_community(&payload);
        if !outcome.valid {
            return Err(AppError::Validation(outcome.errors));
        }

        let name = payload.name.unwrap_or_default().trim().to_string();
        let slug = nonempty_slug(&name)?;

        let existing = self
            .communities
            .find_one(CommunityFilter {
                slug: Some(slug.clone()),
                ..Default::default()
            })
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(
                "Community with name already exists".to_string(),
            ));
        }

        let now = chrono::Utc::now();
        let community = Community {
            id: Uuid::new_v4(),
            name,
            slug,
            description: payload.description,
            count: 0,
            avatar: payload.avatar,
            gallery: Vec::new(),
            created_by: parse_optional_id(payload.created_by.as_deref()),
            last_updated_by: None,
            created_at: now,
            updated_at: now,
        };

        self.communities.insert(community).await
    }

    pub async fn list(&self) -> Result<Vec<Community>> {
        self.communities.find_all().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Community> {
        self.communities
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Community not found".to_string()))
    }

    /// Rename recomputes the slug and re-checks global uniqueness, excluding
    /// the community itself. A conflict is reported, never auto-suffixed.
    pub async fn rename(&self, id: Uuid, payload: RenameCommunity) -> Result<Community> {
        self.get(id).await?;

        let name = match payload.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                let mut errors = HashMap::new();
                errors.insert("name".to_string(), "name is required".to_string());
                return Err(AppError::Validation(errors));
            }
        };
        let slug = nonempty_slug(&name)?;

        let existing = self
            .communities
            .find_one(CommunityFilter {
                slug: Some(slug.clone()),
                exclude_id: Some(id),
            })
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(
                "Community with name already exists".to_string(),
            ));
        }

        self.communities
            .update_by_id(
                id,
                CommunityPatch {
                    name: Some(name),
                    slug: Some(slug),
                    last_updated_by: parse_optional_id(payload.last_updated_by.as_deref()),
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Community not found".to_string()))
    }

    /// Deleting a community releases its avatar and gallery objects with one
    /// batch store call (skipped when there is nothing to release), then
    /// removes the record.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let community = self.get(id).await?;

        let mut keys: Vec<String> = Vec::new();
        if let Some(avatar) = &community.avatar {
            keys.push(avatar.key.clone());
        }
        keys.extend(community.gallery.iter().map(|item| item.key.clone()));

        if !keys.is_empty() {
            self.objects.delete_objects(&keys).await?;
        }

        self.communities.delete_by_id(id).await?;
        Ok(())
    }

    /// Out-of-band repair for the event counter: recounts live events per
    /// community and rewrites any counter that drifted (a crash between an
    /// event write and its counter update leaves a bounded skew). Returns
    /// the number of communities repaired.
    pub async fn reconcile_event_counts(&self) -> Result<usize> {
        let events = self.events.find_all().await?;
        let mut live: HashMap<Uuid, i64> = HashMap::new();
        for event in &events {
            *live.entry(event.community).or_insert(0) += 1;
        }

        let mut repaired = 0;
        for community in self.communities.find_all().await? {
            let expected = live.get(&community.id).copied().unwrap_or(0);
            if community.count != expected {
                tracing::warn!(
                    community = %community.id,
                    stored = community.count,
                    expected,
                    "repairing drifted event counter"
                );
                self.communities
                    .set_event_count(community.id, expected)
                    .await?;
                repaired += 1;
            }
        }
        Ok(repaired)
    }
}

pub(crate) fn parse_optional_id(value: Option<&str>) -> Option<Uuid> {
    value.and_then(|s| Uuid::parse_str(s.trim()).ok())
}

/// Slugs must be non-empty; a name made purely of punctuation has no
/// derivable slug and is reported against the name field.
pub(crate) fn nonempty_slug(name: &str) -> Result<String> {
    let slug = slugify(name);
    if slug.is_empty() {
        let mut errors = HashMap::new();
        errors.insert(
            "name".to_string(),
            "name must contain at least one letter or digit".to_string(),
        );
        return Err(AppError::Validation(errors));
    }
    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImageAsset;
    use crate::store::memory::{MemoryObjectStore, MemoryStore, ObjectStoreCall};

    fn service() -> (CommunityService, Arc<MemoryObjectStore>) {
        let store = MemoryStore::new();
        let objects = MemoryObjectStore::new();
        (
            CommunityService::new(store.clone(), store, objects.clone()),
            objects,
        )
    }

    fn payload(name: &str) -> CreateCommunity {
        CreateCommunity {
            name: Some(name.to_string()),
            description: None,
            avatar: None,
            created_by: None,
        }
    }

    #[tokio::test]
    async fn create_derives_slug() {
        let (service, _) = service();
        let community = service.create(payload("Foo Builders")).await.unwrap();
        assert_eq!(community.slug, "foo-builders");
        assert_eq!(community.count, 0);
    }

    #[tokio::test]
    async fn colliding_slug_conflicts() {
        let (service, _) = service();
        service.create(payload("Foo Builders")).await.unwrap();

        // Different spelling, same slug.
        let err = service.create(payload("foo builders")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn blank_name_is_a_field_error() {
        let (service, _) = service();
        let err = service.create(payload("   ")).await.unwrap_err();
        match err {
            AppError::Validation(errors) => {
                assert_eq!(errors.get("name").unwrap(), "name is required");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rename_excludes_self_from_uniqueness() {
        let (service, _) = service();
        let community = service.create(payload("Foo Builders")).await.unwrap();

        // Same name again is a no-conflict rename.
        let renamed = service
            .rename(
                community.id,
                RenameCommunity {
                    name: Some("FOO Builders".to_string()),
                    last_updated_by: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.slug, "foo-builders");

        service.create(payload("Bar Crew")).await.unwrap();
        let err = service
            .rename(
                community.id,
                RenameCommunity {
                    name: Some("Bar Crew".to_string()),
                    last_updated_by: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_releases_media_in_one_batch() {
        let (service, objects) = service();
        objects.put("avatar-key").await;
        objects.put("gallery-key").await;

        let mut create = payload("Foo Builders");
        create.avatar = Some(ImageAsset {
            image_url: "https://img/avatar".to_string(),
            key: "avatar-key".to_string(),
        });
        let community = service.create(create).await.unwrap();

        service.delete(community.id).await.unwrap();

        assert!(!objects.contains("avatar-key").await);
        assert_eq!(
            objects.calls().await,
            vec![ObjectStoreCall::Batch(vec!["avatar-key".to_string()])]
        );
    }

    #[tokio::test]
    async fn delete_without_media_skips_the_store() {
        let (service, objects) = service();
        let community = service.create(payload("Foo Builders")).await.unwrap();
        service.delete(community.id).await.unwrap();
        assert!(objects.calls().await.is_empty());
    }
}
