use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::extract::ParentUnlocked;
use crate::api::shared::ResponseType;
use crate::error::AppError;
use crate::services::dashboard::{self, Session};
use crate::store::Store;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/playlists")
            .route("", web::get().to(list_playlists))
            .route("", web::post().to(create_playlist))
            .route("/{id}/videos", web::get().to(list_videos))
            .route("/{id}/videos", web::post().to(add_video)),
    );
}

#[derive(Debug, Deserialize)]
pub struct CreatePlaylist {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddVideo {
    pub url: String,
}

pub async fn list_playlists(
    _unlocked: ParentUnlocked,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let playlists = dashboard::list_playlists(store.get_ref()).await?;
    Ok(HttpResponse::Ok().json(ResponseType::ok(playlists)))
}

pub async fn create_playlist(
    _unlocked: ParentUnlocked,
    session: Option<Session>,
    store: web::Data<dyn Store>,
    body: web::Json<CreatePlaylist>,
) -> Result<HttpResponse, AppError> {
    let CreatePlaylist { title, description } = body.into_inner();
    let outcome =
        dashboard::create_playlist(store.get_ref(), session.as_ref(), &title, description).await?;
    Ok(HttpResponse::Created().json(ResponseType::with_notice(
        outcome.data,
        Some(outcome.notice),
    )))
}

pub async fn list_videos(
    _unlocked: ParentUnlocked,
    store: web::Data<dyn Store>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let videos = dashboard::list_videos(store.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ResponseType::ok(videos)))
}

pub async fn add_video(
    _unlocked: ParentUnlocked,
    store: web::Data<dyn Store>,
    path: web::Path<Uuid>,
    body: web::Json<AddVideo>,
) -> Result<HttpResponse, AppError> {
    let outcome = dashboard::add_video(store.get_ref(), path.into_inner(), &body.url).await?;
    Ok(HttpResponse::Created().json(ResponseType::with_notice(
        outcome.data,
        Some(outcome.notice),
    )))
}
