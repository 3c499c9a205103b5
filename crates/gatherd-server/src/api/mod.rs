mod communities;
mod events;

use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Community routes
        .route("/api/communities", post(communities::create_community))
        .route("/api/communities", get(communities::list_communities))
        .route("/api/communities/{id}", get(communities::get_community))
        .route("/api/communities/{id}", patch(communities::rename_community))
        .route("/api/communities/{id}", delete(communities::delete_community))
        .route(
            "/api/communities/reconcile-counts",
            post(communities::reconcile_counts),
        )
        // Event routes
        .route("/api/events", post(events::create_event))
        .route("/api/events", get(events::list_events))
        .route("/api/events/{id}", get(events::get_event))
        .route("/api/events/{id}", patch(events::update_event))
        .route("/api/events/{id}", delete(events::delete_event))
        .route("/api/events/user/{user_id}", get(events::list_events_for_user))
        // Invite routes
        .route("/api/events/{id}/accept-invite", patch(events::accept_invite))
        .route("/api/events/{id}/decline-invite", patch(events::decline_invite))
        // Media routes
        .route("/api/events/{id}/image", post(events::set_image))
        .route("/api/events/{id}/image", delete(events::clear_image))
        .route("/api/events/{id}/gallery-image", post(events::add_gallery_item))
        .route(
            "/api/events/{id}/gallery-image/{key}",
            delete(events::remove_gallery_item),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
