use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::ImageAsset;

/// An Event - an occurrence belonging to exactly one community, with
/// invite/response lists and media
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    /// URL-safe identifier derived from `name`; unique within `community`.
    pub slug: String,
    pub description: Option<String>,
    /// Owning community, serialized as its id.
    pub community: Uuid,
    pub venue: String,
    pub date: String,
    pub recurring: bool,
    pub status: String,
    /// Responders who accepted, at most one entry per user id.
    pub accepted: Vec<InviteResponse>,
    /// Responders who declined, at most one entry per user id.
    pub declined: Vec<InviteResponse>,
    /// Cover image; its `key` is owned by this event in the object store.
    pub image: Option<ImageAsset>,
    pub gallery: Vec<ImageAsset>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const EVENT_STATUS_DRAFT: &str = "draft";

/// A recorded Accepted/Declined decision by one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteResponse {
    pub id: Uuid,
    pub name: String,
    pub image: Option<ImageAsset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteDecision {
    Accepted,
    Declined,
}

/// Incoming event payload; see `CreateCommunity` for why required fields are
/// optional at this level.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvent {
    pub name: Option<String>,
    pub description: Option<String>,
    pub community: Option<String>,
    pub venue: Option<String>,
    pub date: Option<String>,
    pub recurring: Option<bool>,
    pub created_by: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEvent {
    pub name: Option<String>,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub date: Option<String>,
    pub recurring: Option<bool>,
    pub status: Option<String>,
}

/// Body of the accept-invite / decline-invite endpoints.
#[derive(Debug, Deserialize)]
pub struct RespondToInvite {
    pub id: Uuid,
    pub name: String,
    pub image: Option<ImageAsset>,
}
