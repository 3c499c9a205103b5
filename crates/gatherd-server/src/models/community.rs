use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::ImageAsset;

/// A Community - a named group that owns zero or more events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    pub id: Uuid,
    pub name: String,
    /// URL-safe identifier derived from `name`; globally unique.
    pub slug: String,
    pub description: Option<String>,
    /// Number of live events referencing this community. Maintained through
    /// atomic increments, never read-modify-write.
    pub count: i64,
    pub avatar: Option<ImageAsset>,
    pub gallery: Vec<ImageAsset>,
    pub created_by: Option<Uuid>,
    pub last_updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Incoming community payload. Required fields stay optional here so the
/// validation gate can report missing ones as a field error map instead of a
/// deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommunity {
    pub name: Option<String>,
    pub description: Option<String>,
    pub avatar: Option<ImageAsset>,
    pub created_by: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameCommunity {
    pub name: Option<String>,
    pub last_updated_by: Option<String>,
}
