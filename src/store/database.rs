use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QuerySelect, SqlErr, TransactionTrait,
};
use tracing::debug;

use super::{GemReceipt, Store, UpvoteReceipt};
use crate::entities::prelude::{Interaction, Track, User};
use crate::entities::{interaction, track, user};
use crate::error::{ServiceError, ServiceResult};
use crate::models::interaction::InteractionKind;
use crate::models::profile::{NewProfile, ProfileView};
use crate::models::track::{NewTrack, TrackView};

pub(crate) const USERNAME_CONSTRAINT: &str = "uq_users_username_key";
pub(crate) const WALLET_CONSTRAINT: &str = "uq_users_wallet_address";
pub(crate) const INTERACTION_CONSTRAINT: &str = "uq_interactions_user_track_kind";

/// sea-orm adapter over PostgreSQL.
pub struct DatabaseStore {
    database: DatabaseConnection,
}

impl DatabaseStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

#[async_trait]
impl Store for DatabaseStore {
    fn backend(&self) -> &'static str {
        "database"
    }

    async fn ping(&self) -> ServiceResult<()> {
        self.database.ping().await?;
        Ok(())
    }

    async fn insert_profile(&self, profile: NewProfile) -> ServiceResult<ProfileView> {
        let model = user::ActiveModel {
            id: ActiveValue::NotSet,
            username: ActiveValue::Set(profile.username),
            username_key: ActiveValue::Set(profile.username_key),
            wallet_address: ActiveValue::Set(profile.wallet_address),
            profile_picture: ActiveValue::Set(profile.profile_picture),
            banner_url: ActiveValue::Set(profile.banner_url),
            bio: ActiveValue::Set(profile.bio),
            followers: ActiveValue::Set(0),
            streams: ActiveValue::Set(0),
            gems: ActiveValue::Set(0),
            created_at: ActiveValue::Set(Utc::now().fixed_offset()),
        };

        let inserted = model
            .insert(&self.database)
            .await
            .map_err(classify_insert_error)?;
        Ok(profile_view(inserted))
    }

    async fn find_profile_by_username_key(
        &self,
        key: &str,
    ) -> ServiceResult<Option<ProfileView>> {
        let found = User::find()
            .filter(user::Column::UsernameKey.eq(key))
            .one(&self.database)
            .await?;
        Ok(found.map(profile_view))
    }

    async fn find_profile_by_wallet(&self, wallet: &str) -> ServiceResult<Option<ProfileView>> {
        let found = User::find()
            .filter(user::Column::WalletAddress.eq(wallet))
            .one(&self.database)
            .await?;
        Ok(found.map(profile_view))
    }

    async fn insert_track(&self, new_track: NewTrack) -> ServiceResult<TrackView> {
        let model = track::ActiveModel {
            id: ActiveValue::NotSet,
            title: ActiveValue::Set(new_track.title),
            audio_url: ActiveValue::Set(new_track.audio_url),
            upvotes: ActiveValue::Set(0),
            gems: ActiveValue::Set(0),
            created_at: ActiveValue::Set(Utc::now().fixed_offset()),
        };
        let inserted = model.insert(&self.database).await?;
        Ok(track_view(inserted))
    }

    async fn find_track(&self, track_id: i64) -> ServiceResult<Option<TrackView>> {
        let found = Track::find_by_id(track_id).one(&self.database).await?;
        Ok(found.map(track_view))
    }

    async fn toggle_upvote(&self, user_id: i64, track_id: i64) -> ServiceResult<UpvoteReceipt> {
        let txn = self.database.begin().await?;

        User::find_by_id(user_id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::UserNotFound)?;
        // Row lock serialises concurrent toggles on the same track.
        let locked = Track::find_by_id(track_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(ServiceError::TrackNotFound)?;

        let existing = find_interaction(&txn, user_id, track_id, InteractionKind::Upvote).await?;
        let active = match existing {
            Some(row) => {
                Interaction::delete_by_id(row.id).exec(&txn).await?;
                false
            }
            None => {
                new_interaction(user_id, track_id, InteractionKind::Upvote)
                    .insert(&txn)
                    .await?;
                true
            }
        };

        let upvotes = if active {
            locked.upvotes + 1
        } else {
            (locked.upvotes - 1).max(0)
        };
        let mut updated: track::ActiveModel = locked.into();
        updated.upvotes = ActiveValue::Set(upvotes);
        let updated = updated.update(&txn).await?;
        txn.commit().await?;

        debug!(user_id, track_id, active, "upvote toggled");
        Ok(UpvoteReceipt {
            track: track_view(updated),
            active,
        })
    }

    async fn give_gem(
        &self,
        user_id: i64,
        track_id: i64,
        allowance: u32,
    ) -> ServiceResult<GemReceipt> {
        let txn = self.database.begin().await?;

        // Lock order: user, then track. The user lock keeps the allowance
        // check and the insert consistent across tracks.
        User::find_by_id(user_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(ServiceError::UserNotFound)?;
        let locked = Track::find_by_id(track_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(ServiceError::TrackNotFound)?;

        if find_interaction(&txn, user_id, track_id, InteractionKind::Gem)
            .await?
            .is_some()
        {
            return Err(ServiceError::GemAlreadyGiven);
        }

        let given = count_gems(&txn, user_id).await?;
        if given >= u64::from(allowance) {
            return Err(ServiceError::GemAllowanceExhausted { allowance });
        }

        new_interaction(user_id, track_id, InteractionKind::Gem)
            .insert(&txn)
            .await
            .map_err(classify_gem_insert_error)?;

        let gems = locked.gems + 1;
        let mut updated: track::ActiveModel = locked.into();
        updated.gems = ActiveValue::Set(gems);
        let updated = updated.update(&txn).await?;
        txn.commit().await?;

        Ok(GemReceipt {
            track: track_view(updated),
            gems_given: u32::try_from(given + 1).unwrap_or(u32::MAX),
        })
    }

    async fn count_gems_given(&self, user_id: i64) -> ServiceResult<u32> {
        let given = count_gems(&self.database, user_id).await?;
        Ok(u32::try_from(given).unwrap_or(u32::MAX))
    }
}

async fn find_interaction<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    track_id: i64,
    kind: InteractionKind,
) -> Result<Option<interaction::Model>, DbErr> {
    Interaction::find()
        .filter(interaction::Column::UserId.eq(user_id))
        .filter(interaction::Column::TrackId.eq(track_id))
        .filter(interaction::Column::Kind.eq(kind.as_str()))
        .one(conn)
        .await
}

async fn count_gems<C: ConnectionTrait>(conn: &C, user_id: i64) -> Result<u64, DbErr> {
    Interaction::find()
        .filter(interaction::Column::UserId.eq(user_id))
        .filter(interaction::Column::Kind.eq(InteractionKind::Gem.as_str()))
        .count(conn)
        .await
}

fn new_interaction(user_id: i64, track_id: i64, kind: InteractionKind) -> interaction::ActiveModel {
    interaction::ActiveModel {
        id: ActiveValue::NotSet,
        user_id: ActiveValue::Set(user_id),
        track_id: ActiveValue::Set(track_id),
        kind: ActiveValue::Set(kind.as_str().to_string()),
        created_at: ActiveValue::Set(Utc::now().fixed_offset()),
    }
}

/// Constraint message of a unique violation, if `err` is one.
fn unique_violation_detail(err: &DbErr) -> Option<String> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => Some(detail),
        // Drivers that report no SQLSTATE still name the constraint.
        _ => Some(err.to_string()).filter(|message| message.contains("unique constraint")),
    }
}

fn classify_insert_error(err: DbErr) -> ServiceError {
    unique_violation_detail(&err)
        .and_then(|detail| classify_unique_violation(&detail))
        .unwrap_or_else(|| ServiceError::from(err))
}

fn classify_gem_insert_error(err: DbErr) -> ServiceError {
    match unique_violation_detail(&err) {
        Some(detail) if detail.contains(INTERACTION_CONSTRAINT) => ServiceError::GemAlreadyGiven,
        _ => ServiceError::from(err),
    }
}

/// Maps a unique-violation message on `users` to the domain error for its
/// constraint.
fn classify_unique_violation(detail: &str) -> Option<ServiceError> {
    if detail.contains(WALLET_CONSTRAINT) {
        Some(ServiceError::DuplicateWallet)
    } else if detail.contains(USERNAME_CONSTRAINT) {
        Some(ServiceError::DuplicateUsername)
    } else {
        None
    }
}

fn profile_view(model: user::Model) -> ProfileView {
    ProfileView {
        id: model.id,
        username: model.username,
        wallet_address: model.wallet_address,
        profile_picture: model.profile_picture,
        banner_url: model.banner_url,
        bio: model.bio,
        followers: model.followers,
        streams: model.streams,
        gems: model.gems,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn track_view(model: track::Model) -> TrackView {
    TrackView {
        id: model.id,
        title: model.title,
        audio_url: model.audio_url,
        upvotes: model.upvotes,
        gems: model.gems,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
