use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub id: i64,
    pub username: String,
    pub wallet_address: String,
    pub profile_picture: String,
    pub banner_url: String,
    pub bio: Option<String>,
    pub followers: i64,
    pub streams: i64,
    pub gems: i64,
    pub created_at: DateTime<Utc>,
}

/// Validated input for a profile insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub username: String,
    pub username_key: String,
    pub wallet_address: String,
    pub profile_picture: String,
    pub banner_url: String,
    pub bio: Option<String>,
}

/// Body of `POST /api/auth/register`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub wallet_address: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub banner_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub wallet_address: String,
}
