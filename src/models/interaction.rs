use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Gem,
    Upvote,
}

impl InteractionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gem => "gem",
            Self::Upvote => "upvote",
        }
    }
}

/// Result of an upvote toggle or gem, as seen by the acting user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionOutcome {
    pub track_id: i64,
    pub kind: InteractionKind,
    /// Whether the interaction is recorded for this user after the call.
    pub active: bool,
    pub upvotes: i64,
    pub gems: i64,
    pub gems_remaining: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRequest {
    pub wallet_address: String,
}
