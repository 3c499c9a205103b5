use std::path::PathBuf;
use std::sync::Arc;

use crate::services::{CommunityService, EventService, InviteService, MediaService};
use crate::store::{CommunityStore, EventStore, ObjectStore};

#[derive(Clone)]
pub struct Config {
    pub bind_address: String,
    pub media_dir: PathBuf,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let media_dir = std::env::var("MEDIA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./media"));

        Ok(Config {
            bind_address,
            media_dir,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub community_service: CommunityService,
    pub event_service: EventService,
    pub invite_service: InviteService,
    pub media_service: MediaService,
}

impl AppState {
    pub fn new(
        config: Config,
        communities: Arc<dyn CommunityStore>,
        events: Arc<dyn EventStore>,
        objects: Arc<dyn ObjectStore>,
    ) -> Self {
        let community_service =
            CommunityService::new(communities.clone(), events.clone(), objects.clone());
        let event_service = EventService::new(communities, events.clone(), objects.clone());
        let invite_service = InviteService::new(events.clone());
        let media_service = MediaService::new(events, objects);

        Self {
            config,
            community_service,
            event_service,
            invite_service,
            media_service,
        }
    }
}
