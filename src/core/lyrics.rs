//! LRC lyric parsing and storage.
//!
//! The LRC format tags each lyric line with `[mm:ss]` or `[mm:ss.frac]`.
//! Lines that don't match the pattern are dropped, as are timestamped
//! lines whose remaining text is empty. Output order is file order - the
//! parser never re-sorts, so an intentionally out-of-order file stays that
//! way.

use crate::{
    entities::{LyricLine, Song, lyric_line},
    errors::{Error, Result},
};
use regex::Regex;
use sea_orm::{ActiveValue::Set, ConnectionTrait, QueryOrder, TransactionTrait, prelude::*};
use std::sync::LazyLock;
use tracing::info;

// Matches: [mm:ss] OR [mm:ss.x+], anchored at line start
#[allow(clippy::expect_used)]
static LRC_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(\d+):(\d+(?:\.\d+)?)\](.*)$").expect("LRC pattern is valid")
});

/// One timed lyric line.
#[derive(Debug, Clone, PartialEq)]
pub struct LyricEvent {
    /// Seconds from the start of the track
    pub timestamp: f64,
    /// Lyric text with surrounding whitespace trimmed
    pub text: String,
}

/// Parses raw LRC text into timed events, in file order.
#[must_use]
pub fn parse_lrc(lrc_text: &str) -> Vec<LyricEvent> {
    let mut events = Vec::new();

    for raw_line in lrc_text.lines() {
        let Some(caps) = LRC_LINE.captures(raw_line) else {
            continue;
        };
        let (Ok(minutes), Ok(seconds)) = (caps[1].parse::<f64>(), caps[2].parse::<f64>()) else {
            continue;
        };
        let text = caps[3].trim();
        if text.is_empty() {
            continue;
        }
        events.push(LyricEvent {
            timestamp: minutes * 60.0 + seconds,
            text: text.to_string(),
        });
    }

    events
}

/// Replaces a song's stored lyric lines with the parse of `lrc_text`.
///
/// The delete and the inserts happen in one transaction, so readers never
/// observe a half-replaced lyric set.
pub async fn replace_lyrics<C: ConnectionTrait + TransactionTrait>(
    db: &C,
    song_id: i64,
    lrc_text: &str,
) -> Result<Vec<lyric_line::Model>> {
    Song::find_by_id(song_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { kind: "song", id: song_id })?;

    let events = parse_lrc(lrc_text);

    let txn = db.begin().await?;
    LyricLine::delete_many()
        .filter(lyric_line::Column::SongId.eq(song_id))
        .exec(&txn)
        .await?;

    let mut rows = Vec::with_capacity(events.len());
    for (position, event) in events.into_iter().enumerate() {
        let row = lyric_line::ActiveModel {
            song_id: Set(song_id),
            position: Set(i32::try_from(position).unwrap_or(i32::MAX)),
            timestamp_seconds: Set(event.timestamp),
            text: Set(event.text),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        rows.push(row);
    }
    txn.commit().await?;

    info!(song_id, lines = rows.len(), "replaced lyric lines");
    Ok(rows)
}

/// Fetches a song's lyric lines in file order.
pub async fn get_lyrics<C: ConnectionTrait>(db: &C, song_id: i64) -> Result<Vec<lyric_line::Model>> {
    LyricLine::find()
        .filter(lyric_line::Column::SongId.eq(song_id))
        .order_by_asc(lyric_line::Column::Position)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{create_test_song, setup_test_db};

    #[test]
    fn test_parse_drops_bad_and_empty_lines() {
        let events = parse_lrc("[01:02.50]Hello\n[bad line]\n[00:00]");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timestamp, 62.5);
        assert_eq!(events[0].text, "Hello");
    }

    #[test]
    fn test_parse_fraction_optional() {
        let events = parse_lrc("[00:05]Plain\n[02:10.125]Precise");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].timestamp, 5.0);
        assert_eq!(events[1].timestamp, 130.125);
    }

    #[test]
    fn test_parse_preserves_file_order() {
        let events = parse_lrc("[01:00]Later first\n[00:30]Earlier second");
        assert_eq!(events[0].text, "Later first");
        assert_eq!(events[1].text, "Earlier second");
    }

    #[test]
    fn test_parse_trims_text() {
        let events = parse_lrc("[00:01]   padded   \n[00:02]\t");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].text, "padded");
    }

    #[test]
    fn test_parse_requires_line_start_tag() {
        let events = parse_lrc("chorus [00:10]not tagged at start");
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_replace_lyrics_round_trip() -> Result<()> {
        let db = setup_test_db().await?;
        let song = create_test_song(&db, "Test Song").await?;

        let first = replace_lyrics(&db, song.id, "[00:01]One\n[00:02]Two").await?;
        assert_eq!(first.len(), 2);

        // Re-upload replaces the whole set
        let second = replace_lyrics(&db, song.id, "[00:03]Three").await?;
        assert_eq!(second.len(), 1);

        let stored = get_lyrics(&db, song.id).await?;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].text, "Three");
        assert_eq!(stored[0].position, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_replace_lyrics_unknown_song() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(matches!(
            replace_lyrics(&db, 404, "[00:01]x").await,
            Err(Error::NotFound { kind: "song", id: 404 })
        ));
        Ok(())
    }
}
