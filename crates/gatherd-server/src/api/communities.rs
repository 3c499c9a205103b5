use crate::error::Result;
use crate::models::{Community, CreateCommunity, RenameCommunity};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use uuid::Uuid;

pub async fn create_community(
    State(state): State<AppState>,
    Json(payload): Json<CreateCommunity>,
) -> Result<(StatusCode, Json<Community>)> {
    let community = state.community_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(community)))
}

pub async fn list_communities(State(state): State<AppState>) -> Result<Json<Vec<Community>>> {
    let communities = state.community_service.list().await?;
    Ok(Json(communities))
}

pub async fn get_community(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Community>> {
    let community = state.community_service.get(id).await?;
    Ok(Json(community))
}

pub async fn rename_community(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RenameCommunity>,
) -> Result<Json<Community>> {
    let community = state.community_service.rename(id, payload).await?;
    Ok(Json(community))
}

pub async fn delete_community(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.community_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Out-of-band repair: recount live events per community and rewrite any
/// drifted counter.
pub async fn reconcile_counts(State(state): State<AppState>) -> Result<Json<Value>> {
    let repaired = state.community_service.reconcile_event_counts().await?;
    Ok(Json(json!({ "repaired": repaired })))
}
