use std::collections::HashSet;
use std::sync::Mutex;
use uuid::Uuid;

use crate::error::{AppError, StoreResultExt};
use crate::store::Store;

/// The set of liked video ids a viewer currently sees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LikedVideos {
    ids: HashSet<Uuid>,
}

impl LikedVideos {
    pub fn contains(&self, video_id: &Uuid) -> bool {
        self.ids.contains(video_id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn set(&mut self, video_id: Uuid, liked: bool) {
        if liked {
            self.ids.insert(video_id);
        } else {
            self.ids.remove(&video_id);
        }
    }
}

impl FromIterator<Uuid> for LikedVideos {
    fn from_iter<I: IntoIterator<Item = Uuid>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Flips the like on `video_id`. The new membership is visible in `liked`
/// before the store is called; if the store call fails only `video_id` is
/// put back, so toggles on other videos that landed meanwhile survive.
/// Returns the new membership.
///
/// The lock is only held while reading or writing the set, never across the
/// store call.
pub async fn toggle_like<S: Store + ?Sized>(
    store: &S,
    liked: &Mutex<LikedVideos>,
    video_id: Uuid,
) -> Result<bool, AppError> {
    let now_liked = {
        let mut current = liked.lock().unwrap_or_else(|e| e.into_inner());
        let now_liked = !current.contains(&video_id);
        current.set(video_id, now_liked);
        now_liked
    };

    let result = if now_liked {
        store.insert_like(video_id).await.map(|_| ())
    } else {
        store.delete_likes(video_id).await.map(|_| ())
    };

    if result.is_err() {
        log::warn!("Rolling back like on {} after store failure", video_id);
        liked
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .set(video_id, !now_liked);
    }
    result.alert("Error updating like")?;

    log::info!(
        "Video {} {}",
        video_id,
        if now_liked { "liked" } else { "unliked" }
    );
    Ok(now_liked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Like, NewPlaylist, NewVideo, Playlist, Video};
    use crate::error::StoreError;
    use crate::store::{MemoryStore, StoreResult};
    use async_trait::async_trait;
    use tokio::sync::Notify;

    /// Holds `insert_like` for one video until released, then fails it.
    struct HeldLikeStore {
        inner: MemoryStore,
        held: Uuid,
        release: Notify,
    }

    #[async_trait]
    impl Store for HeldLikeStore {
        async fn list_playlists(&self) -> StoreResult<Vec<Playlist>> {
            self.inner.list_playlists().await
        }

        async fn get_playlist(&self, id: Uuid) -> StoreResult<Option<Playlist>> {
            self.inner.get_playlist(id).await
        }

        async fn insert_playlist(&self, playlist: NewPlaylist) -> StoreResult<Playlist> {
            self.inner.insert_playlist(playlist).await
        }

        async fn list_videos(&self, playlist_id: Uuid) -> StoreResult<Vec<Video>> {
            self.inner.list_videos(playlist_id).await
        }

        async fn get_video(&self, id: Uuid) -> StoreResult<Option<Video>> {
            self.inner.get_video(id).await
        }

        async fn insert_video(&self, video: NewVideo) -> StoreResult<Video> {
            self.inner.insert_video(video).await
        }

        async fn delete_video(&self, id: Uuid) -> StoreResult<usize> {
            self.inner.delete_video(id).await
        }

        async fn liked_video_ids(&self) -> StoreResult<Vec<Uuid>> {
            self.inner.liked_video_ids().await
        }

        async fn insert_like(&self, video_id: Uuid) -> StoreResult<Like> {
            if video_id == self.held {
                self.release.notified().await;
                return Err(StoreError::Unavailable("network request failed".into()));
            }
            self.inner.insert_like(video_id).await
        }

        async fn delete_likes(&self, video_id: Uuid) -> StoreResult<usize> {
            self.inner.delete_likes(video_id).await
        }

        async fn recent_liked_videos(&self, limit: i64) -> StoreResult<Vec<Video>> {
            self.inner.recent_liked_videos(limit).await
        }
    }

    async fn stored_video(store: &MemoryStore) -> Uuid {
        store
            .insert_video(NewVideo {
                playlist_id: None,
                youtube_id: "d6iQrh2TK98".into(),
                title: None,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn toggling_twice_restores_membership() {
        let store = MemoryStore::new();
        let video_id = stored_video(&store).await;
        let other = Uuid::new_v4();
        let liked = Mutex::new(LikedVideos::from_iter([other]));
        let original = liked.lock().unwrap().clone();

        assert!(toggle_like(&store, &liked, video_id).await.unwrap());
        assert!(liked.lock().unwrap().contains(&video_id));
        assert_eq!(store.like_count().await, 1);

        assert!(!toggle_like(&store, &liked, video_id).await.unwrap());
        assert_eq!(*liked.lock().unwrap(), original);
        assert_eq!(store.like_count().await, 0);
    }

    #[tokio::test]
    async fn failed_like_restores_pre_toggle_set() {
        let store = MemoryStore::new();
        let video_id = stored_video(&store).await;
        let liked = Mutex::new(LikedVideos::default());

        store.set_offline(true);
        let err = toggle_like(&store, &liked, video_id).await.unwrap_err();

        assert_eq!(err.notice().title, "Error updating like");
        assert!(liked.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_like_keeps_a_concurrent_like_on_another_video() {
        let inner = MemoryStore::new();
        let slow = stored_video(&inner).await;
        let fast = stored_video(&inner).await;
        let store = HeldLikeStore {
            inner,
            held: slow,
            release: Notify::new(),
        };
        let liked = Mutex::new(LikedVideos::default());

        let (slow_result, fast_result) = tokio::join!(
            toggle_like(&store, &liked, slow),
            async {
                let liked_now = toggle_like(&store, &liked, fast).await;
                store.release.notify_one();
                liked_now
            }
        );

        assert!(slow_result.is_err());
        assert!(fast_result.unwrap());
        let current = liked.lock().unwrap().clone();
        assert!(current.contains(&fast));
        assert!(!current.contains(&slow));
        assert_eq!(store.inner.liked_video_ids().await.unwrap(), vec![fast]);
    }

    #[tokio::test]
    async fn failed_unlike_keeps_the_like() {
        let store = MemoryStore::new();
        let video_id = stored_video(&store).await;
        let liked = Mutex::new(LikedVideos::default());
        toggle_like(&store, &liked, video_id).await.unwrap();

        store.set_offline(true);
        assert!(toggle_like(&store, &liked, video_id).await.is_err());

        assert!(liked.lock().unwrap().contains(&video_id));
        assert_eq!(store.like_count().await, 1);
    }
}
