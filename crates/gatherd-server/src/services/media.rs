use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Event, ImageAsset};
use crate::store::{EventPatch, EventStore, ObjectStore};

/// Cover-image and gallery lifecycle for events.
///
/// Ordering rule throughout: the object-store delete runs before the
/// metadata write, and a delete failure aborts the whole operation. That can
/// leave an orphaned object if the process dies between the two steps, but
/// metadata never references an object that is no longer guaranteed to
/// exist.
#[derive(Clone)]
pub struct MediaService {
    events: Arc<dyn EventStore>,
    objects: Arc<dyn ObjectStore>,
}

impl MediaService {
    pub fn new(events: Arc<dyn EventStore>, objects: Arc<dyn ObjectStore>) -> Self {
        Self { events, objects }
    }

    async fn get(&self, event_id: Uuid) -> Result<Event> {
        self.events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))
    }

    async fn patch(&self, event_id: Uuid, patch: EventPatch) -> Result<Event> {
        self.events
            .update_by_id(event_id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))
    }

    /// Replace the cover image. A previously set image is deleted from the
    /// object store first so the overwrite cannot orphan it.
    pub async fn set_image(&self, event_id: Uuid, asset: ImageAsset) -> Result<Event> {
        let event = self.get(event_id).await?;

        if let Some(previous) = &event.image {
            if previous.key != asset.key {
                self.objects.delete_object(&previous.key).await?;
            }
        }

        self.patch(
            event_id,
            EventPatch {
                image: Some(Some(asset)),
                ..Default::default()
            },
        )
        .await
    }

    /// Clear the cover image. Store delete first; if it fails the field is
    /// left untouched. Clearing an event with no image is a no-op.
    pub async fn clear_image(&self, event_id: Uuid) -> Result<Event> {
        let event = self.get(event_id).await?;

        let Some(image) = &event.image else {
            return Ok(event);
        };
        self.objects.delete_object(&image.key).await?;

        self.patch(
            event_id,
            EventPatch {
                image: Some(None),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn add_gallery_item(&self, event_id: Uuid, asset: ImageAsset) -> Result<Event> {
        let event = self.get(event_id).await?;

        let mut gallery = event.gallery;
        gallery.push(asset);

        self.patch(
            event_id,
            EventPatch {
                gallery: Some(gallery),
                ..Default::default()
            },
        )
        .await
    }

    /// Remove a gallery entry by key. An unknown key is not an error: the
    /// current event is returned and no store call is issued.
    pub async fn remove_gallery_item(&self, event_id: Uuid, key: &str) -> Result<Event> {
        let event = self.get(event_id).await?;

        if !event.gallery.iter().any(|item| item.key == key) {
            return Ok(event);
        }

        self.objects.delete_object(key).await?;

        let gallery: Vec<ImageAsset> = event
            .gallery
            .into_iter()
            .filter(|item| item.key != key)
            .collect();

        self.patch(
            event_id,
            EventPatch {
                gallery: Some(gallery),
                ..Default::default()
            },
        )
        .await
    }
}
