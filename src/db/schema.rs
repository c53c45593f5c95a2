diesel::table! {
    likes (id) {
        id -> Uuid,
        video_id -> Uuid,
        created_at -> Timestamp,
    }
}

diesel::table! {
    playlists (id) {
        id -> Uuid,
        created_at -> Timestamp,
        title -> Varchar,
        description -> Nullable<Text>,
        parent_id -> Uuid,
    }
}

diesel::table! {
    videos (id) {
        id -> Uuid,
        created_at -> Timestamp,
        playlist_id -> Nullable<Uuid>,
        youtube_id -> Varchar,
        title -> Nullable<Varchar>,
        duration_seconds -> Nullable<Int4>,
    }
}

diesel::joinable!(likes -> videos (video_id));
diesel::joinable!(videos -> playlists (playlist_id));

diesel::allow_tables_to_appear_in_same_query!(likes, playlists, videos,);
