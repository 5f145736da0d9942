use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackView {
    pub id: i64,
    pub title: String,
    pub audio_url: String,
    pub upvotes: i64,
    pub gems: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrack {
    pub title: String,
    pub audio_url: String,
}

/// Body of `POST /api/tracks`. The audio itself is uploaded to blob storage
/// by the client beforehand.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrackRequest {
    pub title: String,
    pub audio_url: String,
}
