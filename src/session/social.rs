use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Gems a fresh session starts with.
pub const DEFAULT_USER_GEMS: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GemOutcome {
    Given,
    NoWallet,
    AlreadyGiven,
    Exhausted,
}

/// Upvote and gem flags for the current browser session.
///
/// Counts are seeded from the count the track was displayed with the first
/// time it is touched, then adjusted locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialState {
    pub wallet: Option<String>,
    pub user_gems: u32,
    pub track_gems: BTreeMap<i64, bool>,
    pub gem_counts: BTreeMap<i64, u64>,
    pub track_upvotes: BTreeMap<i64, bool>,
    pub upvote_counts: BTreeMap<i64, u64>,
}

impl Default for SocialState {
    fn default() -> Self {
        Self {
            wallet: None,
            user_gems: DEFAULT_USER_GEMS,
            track_gems: BTreeMap::new(),
            gem_counts: BTreeMap::new(),
            track_upvotes: BTreeMap::new(),
            upvote_counts: BTreeMap::new(),
        }
    }
}

impl SocialState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect_wallet(&mut self, wallet: impl Into<String>) {
        self.wallet = Some(wallet.into());
    }

    pub fn disconnect(&mut self) {
        self.wallet = None;
    }

    pub fn set_user_gems(&mut self, gems: u32) {
        self.user_gems = gems;
    }

    /// Flips the upvote flag and returns the new displayed count.
    pub fn toggle_upvote(&mut self, track_id: i64, initial_count: u64) -> u64 {
        let count = self.upvote_counts.entry(track_id).or_insert(initial_count);
        let flag = self.track_upvotes.entry(track_id).or_insert(false);
        *flag = !*flag;
        *count = if *flag {
            count.saturating_add(1)
        } else {
            count.saturating_sub(1)
        };
        *count
    }

    /// Gives a gem unless the session has no wallet, already gemmed this
    /// track, or has no gems left. Only `GemOutcome::Given` changes state.
    pub fn give_gem(&mut self, track_id: i64, initial_count: u64) -> GemOutcome {
        if self.wallet.is_none() {
            return GemOutcome::NoWallet;
        }
        if self.has_given_gem(track_id) {
            return GemOutcome::AlreadyGiven;
        }
        if self.user_gems == 0 {
            return GemOutcome::Exhausted;
        }

        self.user_gems -= 1;
        self.track_gems.insert(track_id, true);
        let count = self.gem_counts.entry(track_id).or_insert(initial_count);
        *count = count.saturating_add(1);
        GemOutcome::Given
    }

    pub fn has_upvoted(&self, track_id: i64) -> bool {
        self.track_upvotes.get(&track_id).copied().unwrap_or(false)
    }

    pub fn has_given_gem(&self, track_id: i64) -> bool {
        self.track_gems.get(&track_id).copied().unwrap_or(false)
    }

    pub fn upvote_count(&self, track_id: i64) -> Option<u64> {
        self.upvote_counts.get(&track_id).copied()
    }

    pub fn gem_count(&self, track_id: i64) -> Option<u64> {
        self.gem_counts.get(&track_id).copied()
    }
}
