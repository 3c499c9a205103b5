use crate::error::Result;
use crate::models::{
    CreateEvent, Event, ImageAsset, InviteDecision, InviteResponse, RespondToInvite, UpdateEvent,
};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

pub async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<CreateEvent>,
) -> Result<(StatusCode, Json<Event>)> {
    let event = state.event_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>> {
    let events = state.event_service.list().await?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Event>> {
    let event = state.event_service.get(id).await?;
    Ok(Json(event))
}

pub async fn list_events_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Event>>> {
    let events = state.event_service.list_by_responder(user_id).await?;
    Ok(Json(events))
}

// TODO: gate update/delete/media mutation on an authorization collaborator
// (event creator or admin) once one exists.

pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEvent>,
) -> Result<Json<Event>> {
    let event = state.event_service.update(id, payload).await?;
    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.event_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Invites

pub async fn accept_invite(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RespondToInvite>,
) -> Result<Json<Event>> {
    respond(state, id, payload, InviteDecision::Accepted).await
}

pub async fn decline_invite(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RespondToInvite>,
) -> Result<Json<Event>> {
    respond(state, id, payload, InviteDecision::Declined).await
}

async fn respond(
    state: AppState,
    event_id: Uuid,
    payload: RespondToInvite,
    decision: InviteDecision,
) -> Result<Json<Event>> {
    let responder = InviteResponse {
        id: payload.id,
        name: payload.name,
        image: payload.image,
    };
    let event = state
        .invite_service
        .respond(event_id, responder, decision)
        .await?;
    Ok(Json(event))
}

// Media

pub async fn set_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(asset): Json<ImageAsset>,
) -> Result<Json<Event>> {
    let event = state.media_service.set_image(id, asset).await?;
    Ok(Json(event))
}

pub async fn clear_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Event>> {
    let event = state.media_service.clear_image(id).await?;
    Ok(Json(event))
}

pub async fn add_gallery_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(asset): Json<ImageAsset>,
) -> Result<Json<Event>> {
    let event = state.media_service.add_gallery_item(id, asset).await?;
    Ok(Json(event))
}

pub async fn remove_gallery_item(
    State(state): State<AppState>,
    Path((id, key)): Path<(Uuid, String)>,
) -> Result<Json<Event>> {
    let event = state.media_service.remove_gallery_item(id, &key).await?;
    Ok(Json(event))
}
