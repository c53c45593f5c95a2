use async_trait::async_trait;
use chrono::Utc;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::{Store, StoreResult};
use crate::db::models::{Like, NewPlaylist, NewVideo, Playlist, Video};
use crate::db::schema::{likes, playlists, videos};
use crate::db::DbPool;

/// Postgres-backed store over a deadpool of async diesel connections.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_playlists(&self) -> StoreResult<Vec<Playlist>> {
        let conn = &mut self.pool.get().await?;
        let rows = playlists::table
            .order_by(playlists::created_at.desc())
            .select(Playlist::as_select())
            .load(conn)
            .await?;
        Ok(rows)
    }

    async fn get_playlist(&self, id: Uuid) -> StoreResult<Option<Playlist>> {
        let conn = &mut self.pool.get().await?;
        let row = playlists::table
            .find(id)
            .select(Playlist::as_select())
            .first(conn)
            .await
            .optional()?;
        Ok(row)
    }

    async fn insert_playlist(&self, playlist: NewPlaylist) -> StoreResult<Playlist> {
        let conn = &mut self.pool.get().await?;
        let row = Playlist::from_new(playlist, Utc::now().naive_utc());
        diesel::insert_into(playlists::table)
            .values(&row)
            .execute(conn)
            .await?;
        Ok(row)
    }

    async fn list_videos(&self, playlist_id: Uuid) -> StoreResult<Vec<Video>> {
        let conn = &mut self.pool.get().await?;
        let rows = videos::table
            .filter(videos::playlist_id.eq(playlist_id))
            .order_by(videos::created_at.asc())
            .select(Video::as_select())
            .load(conn)
            .await?;
        Ok(rows)
    }

    async fn get_video(&self, id: Uuid) -> StoreResult<Option<Video>> {
        let conn = &mut self.pool.get().await?;
        let row = videos::table
            .find(id)
            .select(Video::as_select())
            .first(conn)
            .await
            .optional()?;
        Ok(row)
    }

    async fn insert_video(&self, video: NewVideo) -> StoreResult<Video> {
        let conn = &mut self.pool.get().await?;
        let row = Video::from_new(video, Utc::now().naive_utc());
        diesel::insert_into(videos::table)
            .values(&row)
            .execute(conn)
            .await?;
        Ok(row)
    }

    async fn delete_video(&self, id: Uuid) -> StoreResult<usize> {
        let conn = &mut self.pool.get().await?;
        let removed = diesel::delete(videos::table.filter(videos::id.eq(id)))
            .execute(conn)
            .await?;
        Ok(removed)
    }

    async fn liked_video_ids(&self) -> StoreResult<Vec<Uuid>> {
        let conn = &mut self.pool.get().await?;
        let ids = likes::table
            .select(likes::video_id)
            .distinct()
            .load::<Uuid>(conn)
            .await?;
        Ok(ids)
    }

    async fn insert_like(&self, video_id: Uuid) -> StoreResult<Like> {
        let conn = &mut self.pool.get().await?;
        let row = Like::for_video(video_id, Utc::now().naive_utc());
        diesel::insert_into(likes::table)
            .values(&row)
            .execute(conn)
            .await?;
        Ok(row)
    }

    async fn delete_likes(&self, video_id: Uuid) -> StoreResult<usize> {
        let conn = &mut self.pool.get().await?;
        let removed = diesel::delete(likes::table.filter(likes::video_id.eq(video_id)))
            .execute(conn)
            .await?;
        Ok(removed)
    }

    async fn recent_liked_videos(&self, limit: i64) -> StoreResult<Vec<Video>> {
        let conn = &mut self.pool.get().await?;
        let recent = likes::table
            .order_by(likes::created_at.desc())
            .limit(limit)
            .select(Like::as_select())
            .load(conn)
            .await?;

        let video_ids: Vec<Uuid> = recent.iter().map(|l| l.video_id).collect();
        let liked = videos::table
            .filter(videos::id.eq_any(video_ids))
            .select(Video::as_select())
            .load(conn)
            .await?;

        Ok(recent
            .iter()
            .filter_map(|like| liked.iter().find(|v| v.id == like.video_id).cloned())
            .collect())
    }
}
