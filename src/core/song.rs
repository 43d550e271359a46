//! Karaoke song catalog and user recordings.
//!
//! Media bytes live in the external media store; the catalog only keeps
//! opaque references. Uploading a song with lyric text parses and stores
//! the timed lines in the same call.

use crate::{
    core::{Actor, lyrics},
    entities::{Recording, Song, lyric_line, recording, song},
    errors::{Error, Result},
};
use sea_orm::{ActiveValue::Set, ConnectionTrait, QueryOrder, TransactionTrait, prelude::*};
use tracing::info;

/// Input for uploading a song.
#[derive(Debug, Clone)]
pub struct NewSong {
    /// Song title
    pub title: String,
    /// Performing artist
    pub artist: String,
    /// Opaque reference to the audio file
    pub audio_ref: Option<String>,
    /// Opaque reference to the cover image
    pub cover_ref: Option<String>,
    /// Raw LRC text to parse into timed lines, if supplied
    pub lyrics: Option<String>,
}

/// Uploads a catalog song (admin only), parsing lyrics when supplied.
pub async fn upload_song<C: ConnectionTrait + TransactionTrait>(
    db: &C,
    actor: &Actor,
    new_song: NewSong,
) -> Result<song::Model> {
    if !actor.is_admin() {
        return Err(Error::Forbidden {
            message: "only admins may upload catalog songs".to_string(),
        });
    }

    // Song row and its lyric lines land together or not at all
    let txn = db.begin().await?;
    let model = song::ActiveModel {
        title: Set(new_song.title),
        artist: Set(new_song.artist),
        audio_ref: Set(new_song.audio_ref),
        cover_ref: Set(new_song.cover_ref),
        uploaded_by: Set(actor.user_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    if let Some(lrc_text) = new_song.lyrics {
        lyrics::replace_lyrics(&txn, model.id, &lrc_text).await?;
    }
    txn.commit().await?;

    info!(song_id = model.id, "uploaded song");
    Ok(model)
}

/// Lists the catalog by title.
pub async fn list_songs<C: ConnectionTrait>(db: &C) -> Result<Vec<song::Model>> {
    Song::find()
        .order_by_asc(song::Column::Title)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Fetches a song with its timed lyric lines.
pub async fn get_song<C: ConnectionTrait>(
    db: &C,
    song_id: i64,
) -> Result<(song::Model, Vec<lyric_line::Model>)> {
    let model = Song::find_by_id(song_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { kind: "song", id: song_id })?;
    let lines = lyrics::get_lyrics(db, song_id).await?;
    Ok((model, lines))
}

/// Stores a user's recording of a catalog song.
pub async fn create_recording<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    song_id: i64,
    file_ref: String,
) -> Result<recording::Model> {
    Song::find_by_id(song_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { kind: "song", id: song_id })?;

    recording::ActiveModel {
        song_id: Set(song_id),
        user_id: Set(actor.user_id),
        file_ref: Set(file_ref),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Lists a user's recordings, newest first.
pub async fn list_my_recordings<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
) -> Result<Vec<recording::Model>> {
    Recording::find()
        .filter(recording::Column::UserId.eq(user_id))
        .order_by_desc(recording::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{admin, participant, setup_test_db};

    fn demo_song(lyrics: Option<&str>) -> NewSong {
        NewSong {
            title: "Bohemian Rhapsody".to_string(),
            artist: "Queen".to_string(),
            audio_ref: Some("media/bohemian.mp3".to_string()),
            cover_ref: None,
            lyrics: lyrics.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_upload_song_admin_only() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(matches!(
            upload_song(&db, &participant(1), demo_song(None)).await,
            Err(Error::Forbidden { .. })
        ));
        upload_song(&db, &admin(), demo_song(None)).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_upload_song_with_lyrics() -> Result<()> {
        let db = setup_test_db().await?;
        let song =
            upload_song(&db, &admin(), demo_song(Some("[00:01]Is this the real life"))).await?;

        let (fetched, lines) = get_song(&db, song.id).await?;
        assert_eq!(fetched.title, "Bohemian Rhapsody");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Is this the real life");

        Ok(())
    }

    #[tokio::test]
    async fn test_recordings_per_user() -> Result<()> {
        let db = setup_test_db().await?;
        let song = upload_song(&db, &admin(), demo_song(None)).await?;

        create_recording(&db, &participant(1), song.id, "rec/one.webm".to_string()).await?;
        create_recording(&db, &participant(2), song.id, "rec/two.webm".to_string()).await?;

        let mine = list_my_recordings(&db, 1).await?;
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].file_ref, "rec/one.webm");

        assert!(matches!(
            create_recording(&db, &participant(1), 404, "rec/x.webm".to_string()).await,
            Err(Error::NotFound { kind: "song", .. })
        ));

        Ok(())
    }
}
