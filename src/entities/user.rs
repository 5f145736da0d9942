use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display form, case preserved.
    pub username: String,
    /// Lowercased username backing the case-insensitive unique index.
    #[sea_orm(unique)]
    pub username_key: String,
    #[sea_orm(unique)]
    pub wallet_address: String,
    pub profile_picture: String,
    pub banner_url: String,
    pub bio: Option<String>,
    pub followers: i64,
    pub streams: i64,
    pub gems: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::interaction::Entity")]
    Interaction,
}

impl Related<super::interaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Interaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
