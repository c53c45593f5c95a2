use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Queryable, Selectable, Insertable, Clone, PartialEq)]
#[diesel(table_name = crate::db::schema::playlists)]
pub struct Playlist {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub title: String,
    pub description: Option<String>,
    pub parent_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct NewPlaylist {
    pub title: String,
    pub description: Option<String>,
    pub parent_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, Queryable, Selectable, Insertable, Clone, PartialEq)]
#[diesel(table_name = crate::db::schema::videos)]
pub struct Video {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub playlist_id: Option<Uuid>,
    pub youtube_id: String,
    pub title: Option<String>,
    pub duration_seconds: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewVideo {
    pub playlist_id: Option<Uuid>,
    pub youtube_id: String,
    pub title: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Queryable, Selectable, Insertable, Clone, PartialEq)]
#[diesel(table_name = crate::db::schema::likes)]
pub struct Like {
    pub id: Uuid,
    pub video_id: Uuid,
    pub created_at: NaiveDateTime,
}

/// A video row as shown in the playlist manager.
#[derive(Debug, Serialize)]
pub struct VideoWithMeta {
    #[serde(flatten)]
    pub video: Video,
    pub display_title: String,
    pub thumbnail_url: String,
}

impl Playlist {
    pub fn from_new(new: NewPlaylist, created_at: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at,
            title: new.title,
            description: new.description,
            parent_id: new.parent_id,
        }
    }
}

impl Video {
    pub fn from_new(new: NewVideo, created_at: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at,
            playlist_id: new.playlist_id,
            youtube_id: new.youtube_id,
            title: new.title,
            duration_seconds: None,
        }
    }

    pub fn thumbnail_url(&self) -> String {
        format!("https://img.youtube.com/vi/{}/default.jpg", self.youtube_id)
    }

    /// `position` is zero-based; untitled videos are labelled by their 1-based slot.
    pub fn display_title(&self, position: usize) -> String {
        match &self.title {
            Some(title) if !title.is_empty() => title.clone(),
            _ => format!("Video {}", position + 1),
        }
    }

    pub fn with_meta(self, position: usize) -> VideoWithMeta {
        VideoWithMeta {
            display_title: self.display_title(position),
            thumbnail_url: self.thumbnail_url(),
            video: self,
        }
    }
}

impl Like {
    pub fn for_video(video_id: Uuid, created_at: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            video_id,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn video(title: Option<&str>) -> Video {
        Video::from_new(
            NewVideo {
                playlist_id: None,
                youtube_id: "d6iQrh2TK98".into(),
                title: title.map(str::to_string),
            },
            Utc::now().naive_utc(),
        )
    }

    #[test]
    fn untitled_video_uses_position() {
        assert_eq!(video(None).display_title(2), "Video 3");
        assert_eq!(video(Some("")).display_title(0), "Video 1");
        assert_eq!(video(Some("ABC Song")).display_title(0), "ABC Song");
    }

    #[test]
    fn thumbnail_points_at_youtube() {
        assert_eq!(
            video(None).thumbnail_url(),
            "https://img.youtube.com/vi/d6iQrh2TK98/default.jpg"
        );
    }
}
