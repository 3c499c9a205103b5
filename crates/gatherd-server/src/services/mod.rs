pub mod community;
pub mod event;
pub mod invite;
pub mod media;

pub use community::CommunityService;
pub use event::EventService;
pub use invite::InviteService;
pub use media::MediaService;
