use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;

use super::{GemReceipt, Store, UpvoteReceipt};
use crate::error::{ServiceError, ServiceResult};
use crate::models::interaction::InteractionKind;
use crate::models::profile::{NewProfile, ProfileView};
use crate::models::track::{NewTrack, TrackView};

/// Process-local adapter. Every operation runs under one lock, which makes
/// each check-and-write a single atomic step.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    next_profile_id: i64,
    next_track_id: i64,
    profiles: BTreeMap<i64, ProfileView>,
    by_username_key: HashMap<String, i64>,
    by_wallet: HashMap<String, i64>,
    tracks: BTreeMap<i64, TrackView>,
    interactions: HashSet<(i64, i64, InteractionKind)>,
}

impl Tables {
    fn gems_given(&self, user_id: i64) -> usize {
        self.interactions
            .iter()
            .filter(|(user, _, kind)| *user == user_id && *kind == InteractionKind::Gem)
            .count()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> ServiceResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| ServiceError::Internal(anyhow!("memory store lock poisoned")))
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> ServiceResult<()> {
        self.tables().map(|_| ())
    }

    async fn insert_profile(&self, profile: NewProfile) -> ServiceResult<ProfileView> {
        let mut tables = self.tables()?;
        if tables.by_wallet.contains_key(&profile.wallet_address) {
            return Err(ServiceError::DuplicateWallet);
        }
        if tables.by_username_key.contains_key(&profile.username_key) {
            return Err(ServiceError::DuplicateUsername);
        }

        tables.next_profile_id += 1;
        let id = tables.next_profile_id;
        let view = ProfileView {
            id,
            username: profile.username,
            wallet_address: profile.wallet_address,
            profile_picture: profile.profile_picture,
            banner_url: profile.banner_url,
            bio: profile.bio,
            followers: 0,
            streams: 0,
            gems: 0,
            created_at: Utc::now(),
        };
        tables.by_username_key.insert(profile.username_key, id);
        tables.by_wallet.insert(view.wallet_address.clone(), id);
        tables.profiles.insert(id, view.clone());
        Ok(view)
    }

    async fn find_profile_by_username_key(
        &self,
        key: &str,
    ) -> ServiceResult<Option<ProfileView>> {
        let tables = self.tables()?;
        Ok(tables
            .by_username_key
            .get(key)
            .and_then(|id| tables.profiles.get(id))
            .cloned())
    }

    async fn find_profile_by_wallet(&self, wallet: &str) -> ServiceResult<Option<ProfileView>> {
        let tables = self.tables()?;
        Ok(tables
            .by_wallet
            .get(wallet)
            .and_then(|id| tables.profiles.get(id))
            .cloned())
    }

    async fn insert_track(&self, track: NewTrack) -> ServiceResult<TrackView> {
        let mut tables = self.tables()?;
        tables.next_track_id += 1;
        let view = TrackView {
            id: tables.next_track_id,
            title: track.title,
            audio_url: track.audio_url,
            upvotes: 0,
            gems: 0,
            created_at: Utc::now(),
        };
        tables.tracks.insert(view.id, view.clone());
        Ok(view)
    }

    async fn find_track(&self, track_id: i64) -> ServiceResult<Option<TrackView>> {
        Ok(self.tables()?.tracks.get(&track_id).cloned())
    }

    async fn toggle_upvote(&self, user_id: i64, track_id: i64) -> ServiceResult<UpvoteReceipt> {
        let mut tables = self.tables()?;
        if !tables.profiles.contains_key(&user_id) {
            return Err(ServiceError::UserNotFound);
        }
        if !tables.tracks.contains_key(&track_id) {
            return Err(ServiceError::TrackNotFound);
        }

        let key = (user_id, track_id, InteractionKind::Upvote);
        let active = if tables.interactions.remove(&key) {
            false
        } else {
            tables.interactions.insert(key);
            true
        };

        let track = tables
            .tracks
            .get_mut(&track_id)
            .ok_or(ServiceError::TrackNotFound)?;
        track.upvotes = if active {
            track.upvotes + 1
        } else {
            (track.upvotes - 1).max(0)
        };
        Ok(UpvoteReceipt {
            track: track.clone(),
            active,
        })
    }

    async fn give_gem(
        &self,
        user_id: i64,
        track_id: i64,
        allowance: u32,
    ) -> ServiceResult<GemReceipt> {
        let mut tables = self.tables()?;
        if !tables.profiles.contains_key(&user_id) {
            return Err(ServiceError::UserNotFound);
        }
        if !tables.tracks.contains_key(&track_id) {
            return Err(ServiceError::TrackNotFound);
        }

        let key = (user_id, track_id, InteractionKind::Gem);
        if tables.interactions.contains(&key) {
            return Err(ServiceError::GemAlreadyGiven);
        }
        let given = tables.gems_given(user_id);
        if given >= allowance as usize {
            return Err(ServiceError::GemAllowanceExhausted { allowance });
        }
        tables.interactions.insert(key);

        let track = tables
            .tracks
            .get_mut(&track_id)
            .ok_or(ServiceError::TrackNotFound)?;
        track.gems += 1;
        Ok(GemReceipt {
            track: track.clone(),
            gems_given: u32::try_from(given + 1).unwrap_or(u32::MAX),
        })
    }

    async fn count_gems_given(&self, user_id: i64) -> ServiceResult<u32> {
        let given = self.tables()?.gems_given(user_id);
        Ok(u32::try_from(given).unwrap_or(u32::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_profile(username: &str, wallet: &str) -> NewProfile {
        NewProfile {
            username: username.to_string(),
            username_key: username.to_ascii_lowercase(),
            wallet_address: wallet.to_string(),
            profile_picture: format!("avatar:{username}"),
            banner_url: format!("banner:{username}"),
            bio: None,
        }
    }

    fn new_track(title: &str) -> NewTrack {
        NewTrack {
            title: title.to_string(),
            audio_url: format!("ipfs://{title}"),
        }
    }

    #[tokio::test]
    async fn wallet_collision_wins_over_username() {
        let store = MemoryStore::new();
        store
            .insert_profile(new_profile("alice", "0xA"))
            .await
            .expect("first insert");
        let err = store
            .insert_profile(new_profile("alice", "0xA"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateWallet));
        let err = store
            .insert_profile(new_profile("ALICE", "0xB"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateUsername));
    }

    #[tokio::test]
    async fn profile_ids_are_distinct() {
        let store = MemoryStore::new();
        let a = store.insert_profile(new_profile("alice", "0xA")).await.unwrap();
        let b = store.insert_profile(new_profile("bob", "0xB")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(
            store.find_profile_by_username_key("bob").await.unwrap(),
            Some(b)
        );
    }

    #[tokio::test]
    async fn upvote_toggles_back_to_zero() {
        let store = MemoryStore::new();
        let user = store.insert_profile(new_profile("alice", "0xA")).await.unwrap();
        let track = store.insert_track(new_track("one")).await.unwrap();

        let first = store.toggle_upvote(user.id, track.id).await.unwrap();
        assert!(first.active);
        assert_eq!(first.track.upvotes, 1);

        let second = store.toggle_upvote(user.id, track.id).await.unwrap();
        assert!(!second.active);
        assert_eq!(second.track.upvotes, 0);
    }

    #[tokio::test]
    async fn gem_respects_pair_and_allowance() {
        let store = MemoryStore::new();
        let user = store.insert_profile(new_profile("alice", "0xA")).await.unwrap();
        let one = store.insert_track(new_track("one")).await.unwrap();
        let two = store.insert_track(new_track("two")).await.unwrap();

        let receipt = store.give_gem(user.id, one.id, 1).await.unwrap();
        assert_eq!(receipt.track.gems, 1);
        assert_eq!(receipt.gems_given, 1);

        assert!(matches!(
            store.give_gem(user.id, one.id, 1).await.unwrap_err(),
            ServiceError::GemAlreadyGiven
        ));
        assert!(matches!(
            store.give_gem(user.id, two.id, 1).await.unwrap_err(),
            ServiceError::GemAllowanceExhausted { allowance: 1 }
        ));
        assert_eq!(store.find_track(two.id).await.unwrap().unwrap().gems, 0);
        assert_eq!(store.count_gems_given(user.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn interactions_on_missing_track_fail() {
        let store = MemoryStore::new();
        let user = store.insert_profile(new_profile("alice", "0xA")).await.unwrap();
        assert!(matches!(
            store.toggle_upvote(user.id, 42).await.unwrap_err(),
            ServiceError::TrackNotFound
        ));
        assert!(matches!(
            store.give_gem(user.id, 42, 16).await.unwrap_err(),
            ServiceError::TrackNotFound
        ));
    }

    #[tokio::test]
    async fn interactions_by_unknown_user_fail() {
        let store = MemoryStore::new();
        let track = store.insert_track(new_track("one")).await.unwrap();
        assert!(matches!(
            store.toggle_upvote(99, track.id).await.unwrap_err(),
            ServiceError::UserNotFound
        ));
        assert!(matches!(
            store.give_gem(99, track.id, 16).await.unwrap_err(),
            ServiceError::UserNotFound
        ));
        assert_eq!(store.find_track(track.id).await.unwrap().unwrap().upvotes, 0);
    }
}
