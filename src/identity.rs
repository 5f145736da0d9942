use crate::error::{ServiceError, ServiceResult};

pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 20;
pub const MAX_WALLET_ADDRESS_LEN: usize = 128;
pub const MAX_BIO_LEN: usize = 280;
pub const MAX_URL_LEN: usize = 512;
pub const MAX_TRACK_TITLE_LEN: usize = 120;

const _: () = assert!(MIN_USERNAME_LEN < MAX_USERNAME_LEN);
const _: () = assert!(MAX_BIO_LEN <= MAX_URL_LEN);

const AVATAR_PLACEHOLDER_BASE: &str = "https://api.dicebear.com/7.x/avatars/svg?seed=";
const BANNER_PLACEHOLDER_BASE: &str = "https://api.dicebear.com/7.x/shapes/svg?seed=";

/// Trims and validates a username, preserving its case for display.
pub fn canonicalize_username(value: &str) -> ServiceResult<String> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len < MIN_USERNAME_LEN || len > MAX_USERNAME_LEN {
        return Err(ServiceError::validation(
            "username",
            format!("must be between {MIN_USERNAME_LEN} and {MAX_USERNAME_LEN} characters"),
        ));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ServiceError::validation(
            "username",
            "may only contain letters, digits and underscores",
        ));
    }
    Ok(trimmed.to_string())
}

/// Lookup key for case-insensitive username matching.
pub fn username_key(username: &str) -> String {
    username.trim().to_ascii_lowercase()
}

/// Wallet addresses are opaque: only trimmed and bounded, never verified.
pub fn sanitize_wallet_address(value: &str) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::validation(
            "walletAddress",
            "cannot be empty",
        ));
    }
    if trimmed.len() > MAX_WALLET_ADDRESS_LEN {
        return Err(ServiceError::validation(
            "walletAddress",
            format!("exceeds {MAX_WALLET_ADDRESS_LEN} character limit"),
        ));
    }
    Ok(trimmed.to_string())
}

pub fn canonicalize_bio(value: Option<&str>) -> ServiceResult<Option<String>> {
    let Some(trimmed) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > MAX_BIO_LEN {
        return Err(ServiceError::validation(
            "bio",
            format!("exceeds {MAX_BIO_LEN} character limit"),
        ));
    }
    Ok(Some(trimmed.to_string()))
}

/// Optional URL field; blank input is treated as absent.
pub fn canonicalize_url(field: &'static str, value: Option<&str>) -> ServiceResult<Option<String>> {
    let Some(trimmed) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if trimmed.len() > MAX_URL_LEN {
        return Err(ServiceError::validation(
            field,
            format!("exceeds {MAX_URL_LEN} character limit"),
        ));
    }
    Ok(Some(trimmed.to_string()))
}

pub fn placeholder_avatar(username: &str) -> String {
    format!("{AVATAR_PLACEHOLDER_BASE}{username}")
}

pub fn placeholder_banner(username: &str) -> String {
    format!("{BANNER_PLACEHOLDER_BASE}{username}")
}

pub fn canonicalize_track_title(value: &str) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::validation("title", "cannot be empty"));
    }
    if trimmed.chars().count() > MAX_TRACK_TITLE_LEN {
        return Err(ServiceError::validation(
            "title",
            format!("exceeds {MAX_TRACK_TITLE_LEN} character limit"),
        ));
    }
    Ok(trimmed.to_string())
}

pub fn canonicalize_audio_url(value: &str) -> ServiceResult<String> {
    canonicalize_url("audioUrl", Some(value))?
        .ok_or_else(|| ServiceError::validation("audioUrl", "cannot be empty"))
}
