//! Per-session state the web client keeps without a server round trip.
//!
//! None of this is authoritative: the server-owned counters live behind
//! [`crate::service::TrackService`]. These models mirror what a single
//! browser session displays and can be persisted by the client as JSON.

mod dashboard;
mod social;

pub use dashboard::{DashboardLayout, DashboardSection, SectionKind};
pub use social::{DEFAULT_USER_GEMS, GemOutcome, SocialState};
