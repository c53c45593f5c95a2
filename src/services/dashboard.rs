//! Parent dashboard and playlist manager operations. Every mutation is
//! followed by a fresh query so the caller always renders what the store
//! holds.

use serde::Serialize;
use uuid::Uuid;

use crate::db::models::{NewPlaylist, NewVideo, Playlist, VideoWithMeta};
use crate::error::{AppError, StoreResultExt};
use crate::services::youtube::extract_youtube_id;
use crate::services::Notice;
use crate::store::{Store, RECENT_LIKES_LIMIT};

/// A signed-in parent. Issuing and checking credentials belongs to the
/// hosted backend; here the id is taken as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub parent_id: Uuid,
}

/// Result of a successful mutation together with the alert to show.
#[derive(Debug, Serialize)]
pub struct Outcome<T> {
    pub data: T,
    pub notice: Notice,
}

pub async fn list_playlists<S: Store + ?Sized>(store: &S) -> Result<Vec<Playlist>, AppError> {
    store.list_playlists().await.alert("Error fetching playlists")
}

pub async fn create_playlist<S: Store + ?Sized>(
    store: &S,
    session: Option<&Session>,
    title: &str,
    description: Option<String>,
) -> Result<Outcome<Vec<Playlist>>, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::validation(
            "Error creating playlist",
            "Give the playlist a name.",
        ));
    }

    let Some(session) = session else {
        log::warn!("Refusing to create playlist without a session");
        return Err(AppError::Unauthenticated {
            title: "Authentication Required",
            message: "Please sign in to create playlists.".into(),
        });
    };

    let playlist = store
        .insert_playlist(NewPlaylist {
            title: title.to_string(),
            description: description.filter(|d| !d.trim().is_empty()),
            parent_id: session.parent_id,
        })
        .await
        .alert("Error creating playlist")?;
    log::info!(
        "Parent {} created playlist {} ({})",
        session.parent_id,
        playlist.id,
        playlist.title
    );

    Ok(Outcome {
        data: list_playlists(store).await?,
        notice: Notice::new("Success", "Playlist created!"),
    })
}

pub async fn list_videos<S: Store + ?Sized>(
    store: &S,
    playlist_id: Uuid,
) -> Result<Vec<VideoWithMeta>, AppError> {
    store
        .get_playlist(playlist_id)
        .await
        .alert("Error fetching videos")?
        .ok_or_else(|| AppError::NotFound(format!("Playlist {} does not exist", playlist_id)))?;
    fetch_videos(store, playlist_id).await
}

async fn fetch_videos<S: Store + ?Sized>(
    store: &S,
    playlist_id: Uuid,
) -> Result<Vec<VideoWithMeta>, AppError> {
    let videos = store
        .list_videos(playlist_id)
        .await
        .alert("Error fetching videos")?;
    Ok(videos
        .into_iter()
        .enumerate()
        .map(|(position, video)| video.with_meta(position))
        .collect())
}

/// Adds the video behind a pasted YouTube link to the playlist.
pub async fn add_video<S: Store + ?Sized>(
    store: &S,
    playlist_id: Uuid,
    url: &str,
) -> Result<Outcome<Vec<VideoWithMeta>>, AppError> {
    let Some(youtube_id) = extract_youtube_id(url.trim()) else {
        log::warn!("Rejected video URL {:?}", url);
        return Err(AppError::validation("Error", "Invalid YouTube URL"));
    };

    store
        .get_playlist(playlist_id)
        .await
        .alert("Error adding video")?
        .ok_or_else(|| AppError::NotFound(format!("Playlist {} does not exist", playlist_id)))?;

    let video = store
        .insert_video(NewVideo {
            playlist_id: Some(playlist_id),
            title: Some(format!("Video {}", youtube_id)),
            youtube_id,
        })
        .await
        .alert("Error adding video")?;
    log::info!("Added video {} to playlist {}", video.youtube_id, playlist_id);

    Ok(Outcome {
        data: fetch_videos(store, playlist_id).await?,
        notice: Notice::new("Success", "Video added to playlist!"),
    })
}

/// Deletes a video immediately and returns what is left of its playlist.
pub async fn delete_video<S: Store + ?Sized>(
    store: &S,
    video_id: Uuid,
) -> Result<Vec<VideoWithMeta>, AppError> {
    let video = store
        .get_video(video_id)
        .await
        .alert("Error removing video")?
        .ok_or_else(|| AppError::NotFound(format!("Video {} does not exist", video_id)))?;

    let removed = store
        .delete_video(video_id)
        .await
        .alert("Error removing video")?;
    log::info!("Removed {} row(s) for video {}", removed, video_id);

    match video.playlist_id {
        Some(playlist_id) => fetch_videos(store, playlist_id).await,
        None => Ok(Vec::new()),
    }
}

/// The ten most recently liked videos.
pub async fn recent_likes<S: Store + ?Sized>(store: &S) -> Result<Vec<VideoWithMeta>, AppError> {
    let videos = store
        .recent_liked_videos(RECENT_LIKES_LIMIT)
        .await
        .alert("Error fetching likes")?;
    Ok(videos
        .into_iter()
        .enumerate()
        .map(|(position, video)| video.with_meta(position))
        .collect())
}
