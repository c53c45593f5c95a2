use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreResult};
use crate::db::models::{Like, NewPlaylist, NewVideo, Playlist, Video};
use crate::error::StoreError;

#[derive(Default)]
struct Tables {
    playlists: Vec<Playlist>,
    videos: Vec<Video>,
    likes: Vec<Like>,
    last_created_at: Option<NaiveDateTime>,
}

impl Tables {
    /// Strictly increasing timestamps so created_at ordering is total.
    fn next_timestamp(&mut self) -> NaiveDateTime {
        let now = Utc::now().naive_utc();
        let ts = match self.last_created_at {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_created_at = Some(ts);
        ts
    }
}

/// In-process store used for local development and tests. `set_offline`
/// makes every call fail the way an unreachable backend would.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("network request failed".into()));
        }
        Ok(())
    }

    #[cfg(test)]
    pub async fn playlist_count(&self) -> usize {
        self.tables.read().await.playlists.len()
    }

    #[cfg(test)]
    pub async fn video_count(&self) -> usize {
        self.tables.read().await.videos.len()
    }

    #[cfg(test)]
    pub async fn like_count(&self) -> usize {
        self.tables.read().await.likes.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_playlists(&self) -> StoreResult<Vec<Playlist>> {
        self.check_online()?;
        let tables = self.tables.read().await;
        let mut rows = tables.playlists.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn get_playlist(&self, id: Uuid) -> StoreResult<Option<Playlist>> {
        self.check_online()?;
        let tables = self.tables.read().await;
        Ok(tables.playlists.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_playlist(&self, playlist: NewPlaylist) -> StoreResult<Playlist> {
        self.check_online()?;
        let mut tables = self.tables.write().await;
        let row = Playlist::from_new(playlist, tables.next_timestamp());
        tables.playlists.push(row.clone());
        Ok(row)
    }

    async fn list_videos(&self, playlist_id: Uuid) -> StoreResult<Vec<Video>> {
        self.check_online()?;
        let tables = self.tables.read().await;
        let mut rows: Vec<Video> = tables
            .videos
            .iter()
            .filter(|v| v.playlist_id == Some(playlist_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
    }

    async fn get_video(&self, id: Uuid) -> StoreResult<Option<Video>> {
        self.check_online()?;
        let tables = self.tables.read().await;
        Ok(tables.videos.iter().find(|v| v.id == id).cloned())
    }

    async fn insert_video(&self, video: NewVideo) -> StoreResult<Video> {
        self.check_online()?;
        let mut tables = self.tables.write().await;
        let row = Video::from_new(video, tables.next_timestamp());
        tables.videos.push(row.clone());
        Ok(row)
    }

    async fn delete_video(&self, id: Uuid) -> StoreResult<usize> {
        self.check_online()?;
        let mut tables = self.tables.write().await;
        let before = tables.videos.len();
        tables.videos.retain(|v| v.id != id);
        let removed = before - tables.videos.len();
        // Same as the ON DELETE CASCADE on likes.video_id.
        if removed > 0 {
            tables.likes.retain(|l| l.video_id != id);
        }
        Ok(removed)
    }

    async fn liked_video_ids(&self) -> StoreResult<Vec<Uuid>> {
        self.check_online()?;
        let tables = self.tables.read().await;
        let mut ids: Vec<Uuid> = Vec::new();
        for like in &tables.likes {
            if !ids.contains(&like.video_id) {
                ids.push(like.video_id);
            }
        }
        Ok(ids)
    }

    async fn insert_like(&self, video_id: Uuid) -> StoreResult<Like> {
        self.check_online()?;
        let mut tables = self.tables.write().await;
        let row = Like::for_video(video_id, tables.next_timestamp());
        tables.likes.push(row.clone());
        Ok(row)
    }

    async fn delete_likes(&self, video_id: Uuid) -> StoreResult<usize> {
        self.check_online()?;
        let mut tables = self.tables.write().await;
        let before = tables.likes.len();
        tables.likes.retain(|l| l.video_id != video_id);
        Ok(before - tables.likes.len())
    }

    async fn recent_liked_videos(&self, limit: i64) -> StoreResult<Vec<Video>> {
        self.check_online()?;
        let tables = self.tables.read().await;
        let mut recent: Vec<&Like> = tables.likes.iter().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(recent
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(0))
            .filter_map(|like| tables.videos.iter().find(|v| v.id == like.video_id).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RECENT_LIKES_LIMIT;

    fn new_video(playlist_id: Uuid, youtube_id: &str) -> NewVideo {
        NewVideo {
            playlist_id: Some(playlist_id),
            youtube_id: youtube_id.into(),
            title: None,
        }
    }

    async fn seeded_playlist(store: &MemoryStore, title: &str) -> Playlist {
        store
            .insert_playlist(NewPlaylist {
                title: title.into(),
                description: None,
                parent_id: Uuid::new_v4(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn playlists_are_listed_newest_first() {
        let store = MemoryStore::new();
        seeded_playlist(&store, "Science Fun").await;
        seeded_playlist(&store, "Bedtime").await;

        let titles: Vec<String> = store
            .list_playlists()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Bedtime", "Science Fun"]);
    }

    #[tokio::test]
    async fn videos_are_listed_oldest_first_per_playlist() {
        let store = MemoryStore::new();
        let a = seeded_playlist(&store, "A").await;
        let b = seeded_playlist(&store, "B").await;
        store.insert_video(new_video(a.id, "d6iQrh2TK98")).await.unwrap();
        store.insert_video(new_video(b.id, "5npJ3YnL9nE")).await.unwrap();
        store.insert_video(new_video(a.id, "aaaaaaaaaaa")).await.unwrap();

        let ids: Vec<String> = store
            .list_videos(a.id)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.youtube_id)
            .collect();
        assert_eq!(ids, vec!["d6iQrh2TK98", "aaaaaaaaaaa"]);
    }

    #[tokio::test]
    async fn recent_likes_drop_missing_videos_and_keep_repeats() {
        let store = MemoryStore::new();
        let playlist = seeded_playlist(&store, "A").await;
        let kept = store.insert_video(new_video(playlist.id, "d6iQrh2TK98")).await.unwrap();
        let gone = store.insert_video(new_video(playlist.id, "5npJ3YnL9nE")).await.unwrap();

        store.insert_like(kept.id).await.unwrap();
        store.insert_like(gone.id).await.unwrap();
        store.insert_like(kept.id).await.unwrap();
        store.delete_video(gone.id).await.unwrap();

        let liked = store.recent_liked_videos(RECENT_LIKES_LIMIT).await.unwrap();
        assert_eq!(liked.len(), 2);
        assert!(liked.iter().all(|v| v.id == kept.id));
        assert_eq!(store.liked_video_ids().await.unwrap(), vec![kept.id]);
    }

    #[tokio::test]
    async fn deleted_video_frees_its_recent_like_slots() {
        let store = MemoryStore::new();
        let playlist = seeded_playlist(&store, "A").await;
        let kept = store.insert_video(new_video(playlist.id, "d6iQrh2TK98")).await.unwrap();
        let gone = store.insert_video(new_video(playlist.id, "5npJ3YnL9nE")).await.unwrap();

        store.insert_like(kept.id).await.unwrap();
        for _ in 0..RECENT_LIKES_LIMIT {
            store.insert_like(gone.id).await.unwrap();
        }
        store.delete_video(gone.id).await.unwrap();

        assert_eq!(store.like_count().await, 1);
        let liked = store.recent_liked_videos(RECENT_LIKES_LIMIT).await.unwrap();
        assert_eq!(liked.len(), 1);
        assert_eq!(liked[0].id, kept.id);
    }

    #[tokio::test]
    async fn offline_store_fails_every_call() {
        let store = MemoryStore::new();
        store.set_offline(true);
        assert!(matches!(
            store.list_playlists().await,
            Err(StoreError::Unavailable(_))
        ));
        store.set_offline(false);
        assert!(store.list_playlists().await.unwrap().is_empty());
    }
}
