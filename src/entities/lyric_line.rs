//! Lyric line entity - One time-synced lyric line of a song.
//!
//! Rows are produced by the LRC parser in file order; `position` preserves
//! that order. Re-uploading lyrics replaces the whole set for the song.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lyric line database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lyric_lines")]
pub struct Model {
    /// Unique identifier for the line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning song
    pub song_id: i64,
    /// Zero-based position within the file
    pub position: i32,
    /// Seconds from the start of the track
    pub timestamp_seconds: f64,
    /// Lyric text
    pub text: String,
}

/// Defines relationships between `LyricLine` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one song
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
