use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{ServiceError, ServiceResult};
use crate::identity::{
    canonicalize_bio, canonicalize_url, canonicalize_username, placeholder_avatar,
    placeholder_banner, sanitize_wallet_address, username_key,
};
use crate::models::profile::{NewProfile, ProfileView, RegisterRequest};
use crate::state::ApiCache;
use crate::store::Store;

/// Registration and lookup of wallet-keyed user profiles.
///
/// Usernames are unique case-insensitively and displayed as entered. The
/// wallet address is an opaque identifier: nothing here proves the caller
/// controls it.
#[derive(Clone)]
pub struct IdentityService {
    store: Arc<dyn Store>,
    cache: Arc<ApiCache>,
}

impl IdentityService {
    pub fn new(store: Arc<dyn Store>, cache: Arc<ApiCache>) -> Self {
        Self { store, cache }
    }

    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<ProfileView> {
        let username = canonicalize_username(&request.username)?;
        let wallet_address = sanitize_wallet_address(&request.wallet_address)?;
        let profile_picture =
            canonicalize_url("profilePicture", request.profile_picture.as_deref())?
                .unwrap_or_else(|| placeholder_avatar(&username));
        let banner_url = canonicalize_url("bannerUrl", request.banner_url.as_deref())?
            .unwrap_or_else(|| placeholder_banner(&username));
        let bio = canonicalize_bio(request.bio.as_deref())?;

        let profile = NewProfile {
            username_key: username_key(&username),
            username,
            wallet_address,
            profile_picture,
            banner_url,
            bio,
        };

        let created = self.store.insert_profile(profile).await?;
        info!(
            user_id = created.id,
            username = %created.username,
            "Registered user"
        );
        Ok(created)
    }

    pub async fn login(&self, wallet_address: &str) -> ServiceResult<ProfileView> {
        let wallet_address = sanitize_wallet_address(wallet_address)?;
        match self.store.find_profile_by_wallet(&wallet_address).await? {
            Some(profile) => Ok(profile),
            None => {
                debug!(wallet = %wallet_address, "Login for unknown wallet");
                Err(ServiceError::UserNotFound)
            }
        }
    }

    /// Resolves a username (case-insensitive) first, then a wallet address.
    pub async fn get_profile(&self, identifier: &str) -> ServiceResult<ProfileView> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(ServiceError::UserNotFound);
        }

        // A username match always wins, so the username branch runs before
        // any wallet entry is consulted.
        if canonicalize_username(identifier).is_ok() {
            let key = username_key(identifier);
            let cache_key = format!("username:{key}");
            if let Some(cached) = self.cache.profiles.get(&cache_key).await {
                return Ok((*cached).clone());
            }
            if let Some(profile) = self.store.find_profile_by_username_key(&key).await? {
                self.remember(cache_key, &profile).await;
                return Ok(profile);
            }
        }

        let cache_key = format!("wallet:{identifier}");
        if let Some(cached) = self.cache.profiles.get(&cache_key).await {
            return Ok((*cached).clone());
        }
        let profile = self
            .store
            .find_profile_by_wallet(identifier)
            .await?
            .ok_or(ServiceError::UserNotFound)?;
        self.remember(cache_key, &profile).await;
        Ok(profile)
    }

    async fn remember(&self, cache_key: String, profile: &ProfileView) {
        self.cache
            .profiles
            .insert(cache_key, Arc::new(profile.clone()))
            .await;
    }
}
