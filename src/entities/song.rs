//! Song entity - Karaoke catalog entry with opaque media references.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Song database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "songs")]
pub struct Model {
    /// Unique identifier for the song
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Song title
    pub title: String,
    /// Performing artist
    pub artist: String,
    /// Opaque reference to the audio file in the media store
    pub audio_ref: Option<String>,
    /// Opaque reference to the cover image in the media store
    pub cover_ref: Option<String>,
    /// Uploading user's id (external identity provider)
    pub uploaded_by: i64,
    /// When the song was uploaded
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Song and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Time-synced lyric lines parsed from the song's LRC file
    #[sea_orm(has_many = "super::lyric_line::Entity")]
    LyricLines,
    /// User recordings of this song
    #[sea_orm(has_many = "super::recording::Entity")]
    Recordings,
}

impl Related<super::lyric_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LyricLines.def()
    }
}

impl Related<super::recording::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recordings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
