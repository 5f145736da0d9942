use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::Expr;

use crate::m20250301_000001_create_users_table::Users;
use crate::m20250301_000002_create_tracks_table::Tracks;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Interactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Interactions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Interactions::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Interactions::TrackId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Interactions::Kind).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Interactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_interactions_user")
                            .from(Interactions::Table, Interactions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_interactions_track")
                            .from(Interactions::Table, Interactions::TrackId)
                            .to(Tracks::Table, Tracks::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One gem and one upvote per user and track.
        manager
            .create_index(
                Index::create()
                    .name("uq_interactions_user_track_kind")
                    .table(Interactions::Table)
                    .col(Interactions::UserId)
                    .col(Interactions::TrackId)
                    .col(Interactions::Kind)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_interactions_user_kind")
                    .table(Interactions::Table)
                    .col(Interactions::UserId)
                    .col(Interactions::Kind)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Interactions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Interactions {
    Table,
    Id,
    UserId,
    TrackId,
    Kind,
    CreatedAt,
}
