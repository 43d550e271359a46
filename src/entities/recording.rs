//! Recording entity - A user's performance of a catalog song.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Recording database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recordings")]
pub struct Model {
    /// Unique identifier for the recording
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Recorded song
    pub song_id: i64,
    /// Recording user's id (external identity provider)
    pub user_id: i64,
    /// Opaque reference to the audio file in the media store
    pub file_ref: String,
    /// When the recording was uploaded
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Recording and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each recording belongs to one song
    #[sea_orm(
        belongs_to = "super::song::Entity",
        from = "Column::SongId",
        to = "super::song::Column::Id"
    )]
    Song,
}

impl Related<super::song::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Song.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
