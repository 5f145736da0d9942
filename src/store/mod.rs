//! Persistence seam for profiles, tracks and interactions.
//!
//! Handlers never talk to a backend directly: the process builds one
//! [`Store`] at startup and shares it through [`crate::state::AppState`].
//! Uniqueness (username, wallet, one interaction per user/track/kind) is
//! enforced inside the adapter as part of the write itself, so callers must
//! not pre-check and then insert.

use async_trait::async_trait;

use crate::error::ServiceResult;
use crate::models::profile::{NewProfile, ProfileView};
use crate::models::track::{NewTrack, TrackView};

mod database;
mod memory;

pub use database::DatabaseStore;
pub use memory::MemoryStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpvoteReceipt {
    pub track: TrackView,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GemReceipt {
    pub track: TrackView,
    /// Gems given by the user across all tracks, including this one.
    pub gems_given: u32,
}

#[async_trait]
pub trait Store: Send + Sync {
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> ServiceResult<()>;

    /// Fails with `DuplicateUsername` or `DuplicateWallet` on collision.
    async fn insert_profile(&self, profile: NewProfile) -> ServiceResult<ProfileView>;

    async fn find_profile_by_username_key(&self, key: &str)
    -> ServiceResult<Option<ProfileView>>;

    async fn find_profile_by_wallet(&self, wallet: &str) -> ServiceResult<Option<ProfileView>>;

    async fn insert_track(&self, track: NewTrack) -> ServiceResult<TrackView>;

    async fn find_track(&self, track_id: i64) -> ServiceResult<Option<TrackView>>;

    /// Adds the user's upvote if absent, removes it otherwise.
    async fn toggle_upvote(&self, user_id: i64, track_id: i64) -> ServiceResult<UpvoteReceipt>;

    /// Records a gem. `GemAlreadyGiven` if one exists for the pair,
    /// `GemAllowanceExhausted` once the user has given `allowance` gems.
    async fn give_gem(&self, user_id: i64, track_id: i64, allowance: u32)
    -> ServiceResult<GemReceipt>;

    async fn count_gems_given(&self, user_id: i64) -> ServiceResult<u32>;
}
