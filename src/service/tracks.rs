use std::sync::Arc;

use tracing::info;

use crate::error::{ServiceError, ServiceResult};
use crate::identity::{canonicalize_audio_url, canonicalize_track_title, sanitize_wallet_address};
use crate::models::interaction::{InteractionKind, InteractionOutcome};
use crate::models::profile::ProfileView;
use crate::models::track::{CreateTrackRequest, NewTrack, TrackView};
use crate::store::Store;

/// Track metadata plus server-owned upvote and gem counters.
#[derive(Clone)]
pub struct TrackService {
    store: Arc<dyn Store>,
    gem_allowance: u32,
}

impl TrackService {
    pub fn new(store: Arc<dyn Store>, gem_allowance: u32) -> Self {
        assert!(gem_allowance > 0, "Gem allowance must be positive");
        Self {
            store,
            gem_allowance,
        }
    }

    pub fn gem_allowance(&self) -> u32 {
        self.gem_allowance
    }

    pub async fn create_track(&self, request: CreateTrackRequest) -> ServiceResult<TrackView> {
        let track = NewTrack {
            title: canonicalize_track_title(&request.title)?,
            audio_url: canonicalize_audio_url(&request.audio_url)?,
        };
        let created = self.store.insert_track(track).await?;
        info!(track_id = created.id, title = %created.title, "Recorded track metadata");
        Ok(created)
    }

    pub async fn get_track(&self, track_id: i64) -> ServiceResult<TrackView> {
        self.store
            .find_track(track_id)
            .await?
            .ok_or(ServiceError::TrackNotFound)
    }

    pub async fn toggle_upvote(
        &self,
        wallet_address: &str,
        track_id: i64,
    ) -> ServiceResult<InteractionOutcome> {
        let user = self.resolve_user(wallet_address).await?;
        let receipt = self.store.toggle_upvote(user.id, track_id).await?;
        let given = self.store.count_gems_given(user.id).await?;

        Ok(InteractionOutcome {
            track_id: receipt.track.id,
            kind: InteractionKind::Upvote,
            active: receipt.active,
            upvotes: receipt.track.upvotes,
            gems: receipt.track.gems,
            gems_remaining: self.gem_allowance.saturating_sub(given),
        })
    }

    /// Gems are final: there is no operation that takes one back.
    pub async fn give_gem(
        &self,
        wallet_address: &str,
        track_id: i64,
    ) -> ServiceResult<InteractionOutcome> {
        let user = self.resolve_user(wallet_address).await?;
        let receipt = self
            .store
            .give_gem(user.id, track_id, self.gem_allowance)
            .await?;
        info!(user_id = user.id, track_id, "Gem given");

        Ok(InteractionOutcome {
            track_id: receipt.track.id,
            kind: InteractionKind::Gem,
            active: true,
            upvotes: receipt.track.upvotes,
            gems: receipt.track.gems,
            gems_remaining: self.gem_allowance.saturating_sub(receipt.gems_given),
        })
    }

    async fn resolve_user(&self, wallet_address: &str) -> ServiceResult<ProfileView> {
        let wallet_address = sanitize_wallet_address(wallet_address)?;
        self.store
            .find_profile_by_wallet(&wallet_address)
            .await?
            .ok_or(ServiceError::UserNotFound)
    }
}
