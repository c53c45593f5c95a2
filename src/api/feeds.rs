use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::api::shared::ResponseType;
use crate::error::AppError;
use crate::services::feed::{FeedRegistry, FeedSession, FeedSource, ViewToken};
use crate::services::playlist_state::PlaylistState;
use crate::services::youtube::parse_youtube_ref;
use crate::services::Notice;
use crate::store::Store;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/feeds")
            .route("", web::post().to(open_feed))
            .route("/{id}", web::get().to(get_feed))
            .route("/{id}", web::delete().to(close_feed))
            .route("/{id}/refresh", web::post().to(refresh_feed))
            .route("/{id}/viewable", web::post().to(viewable_items_changed))
            .route("/{id}/likes/{key}", web::post().to(toggle_like))
            .route("/{id}/queue", web::post().to(enqueue))
            .route("/{id}/queue/{youtube_id}", web::delete().to(dequeue)),
    );
}

/// Opens a feed over a stored playlist, or over a local list of videos
/// (the default selection when the body is empty or names neither).
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpenFeed {
    pub playlist_id: Option<Uuid>,
    pub videos: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ViewableItemsChanged {
    pub viewable_items: Vec<ViewToken>,
}

#[derive(Debug, Deserialize)]
pub struct Enqueue {
    pub url: String,
}

fn snapshot_response(session: &FeedSession, notice: Option<Notice>) -> HttpResponse {
    HttpResponse::Ok().json(ResponseType::with_notice(session.snapshot(), notice))
}

pub async fn open_feed(
    store: web::Data<dyn Store>,
    feeds: web::Data<FeedRegistry>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let request: OpenFeed = if body.iter().all(u8::is_ascii_whitespace) {
        OpenFeed::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            log::warn!("Rejected feed request body: {}", e);
            AppError::validation("Error", "Invalid feed request")
        })?
    };
    let source = match (request.playlist_id, request.videos) {
        (Some(playlist_id), _) => FeedSource::Playlist(playlist_id),
        (None, Some(videos)) => {
            let mut ids = Vec::with_capacity(videos.len());
            for video in &videos {
                let id = parse_youtube_ref(video)
                    .ok_or_else(|| AppError::validation("Error", "Invalid YouTube URL"))?;
                ids.push(id);
            }
            FeedSource::Local(PlaylistState::new(ids))
        }
        (None, None) => FeedSource::Local(PlaylistState::default()),
    };

    let (session, notice) = FeedSession::open(store.get_ref(), source, feeds.policy()).await;
    let session = feeds.insert(session);
    log::info!("Opened feed {}", session.id());
    Ok(snapshot_response(&session, notice))
}

pub async fn get_feed(
    feeds: web::Data<FeedRegistry>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let session = feeds.get(path.into_inner())?;
    Ok(snapshot_response(&session, None))
}

pub async fn close_feed(
    feeds: web::Data<FeedRegistry>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    feeds.remove(id)?;
    log::info!("Closed feed {}", id);
    Ok(HttpResponse::Ok().json(ResponseType::ok(json!({ "closed": id }))))
}

pub async fn refresh_feed(
    store: web::Data<dyn Store>,
    feeds: web::Data<FeedRegistry>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let session = feeds.get(path.into_inner())?;
    let notice = session.refresh(store.get_ref()).await;
    Ok(snapshot_response(&session, notice))
}

pub async fn viewable_items_changed(
    feeds: web::Data<FeedRegistry>,
    path: web::Path<Uuid>,
    body: web::Json<ViewableItemsChanged>,
) -> Result<HttpResponse, AppError> {
    let session = feeds.get(path.into_inner())?;
    session.on_viewable_items_changed(&body.viewable_items);
    Ok(snapshot_response(&session, None))
}

pub async fn toggle_like(
    store: web::Data<dyn Store>,
    feeds: web::Data<FeedRegistry>,
    path: web::Path<(Uuid, String)>,
) -> Result<HttpResponse, AppError> {
    let (id, key) = path.into_inner();
    let session = feeds.get(id)?;
    session.toggle_like(store.get_ref(), &key).await?;
    Ok(snapshot_response(&session, None))
}

pub async fn enqueue(
    feeds: web::Data<FeedRegistry>,
    path: web::Path<Uuid>,
    body: web::Json<Enqueue>,
) -> Result<HttpResponse, AppError> {
    let session = feeds.get(path.into_inner())?;
    session.enqueue(&body.url)?;
    Ok(snapshot_response(&session, None))
}

pub async fn dequeue(
    feeds: web::Data<FeedRegistry>,
    path: web::Path<(Uuid, String)>,
) -> Result<HttpResponse, AppError> {
    let (id, youtube_id) = path.into_inner();
    let session = feeds.get(id)?;
    session.dequeue(&youtube_id)?;
    Ok(snapshot_response(&session, None))
}
