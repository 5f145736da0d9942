mod identity;
mod tracks;

pub use identity::IdentityService;
pub use tracks::TrackService;
