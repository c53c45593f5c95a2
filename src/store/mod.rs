//! Row-level access to the `playlists`, `videos` and `likes` tables.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::models::{Like, NewPlaylist, NewVideo, Playlist, Video};
use crate::error::StoreError;

pub type StoreResult<T> = Result<T, StoreError>;

/// Number of rows returned by the liked-videos roll-up.
pub const RECENT_LIKES_LIMIT: i64 = 10;

/// The remote data store. Every call is a single request with no retry;
/// callers re-query after a mutation instead of trusting local copies.
#[async_trait]
pub trait Store: Send + Sync {
    /// All playlists, newest first.
    async fn list_playlists(&self) -> StoreResult<Vec<Playlist>>;

    async fn get_playlist(&self, id: Uuid) -> StoreResult<Option<Playlist>>;

    async fn insert_playlist(&self, playlist: NewPlaylist) -> StoreResult<Playlist>;

    /// Videos of one playlist, oldest first.
    async fn list_videos(&self, playlist_id: Uuid) -> StoreResult<Vec<Video>>;

    async fn get_video(&self, id: Uuid) -> StoreResult<Option<Video>>;

    async fn insert_video(&self, video: NewVideo) -> StoreResult<Video>;

    /// Returns the number of rows removed.
    async fn delete_video(&self, id: Uuid) -> StoreResult<usize>;

    /// Distinct ids of liked videos.
    async fn liked_video_ids(&self) -> StoreResult<Vec<Uuid>>;

    async fn insert_like(&self, video_id: Uuid) -> StoreResult<Like>;

    /// Removes every like row of the video.
    async fn delete_likes(&self, video_id: Uuid) -> StoreResult<usize>;

    /// Videos behind the most recent likes, newest like first. Likes whose
    /// video is gone are dropped; repeated likes are kept.
    async fn recent_liked_videos(&self, limit: i64) -> StoreResult<Vec<Video>>;
}
