use actix_web::{web, HttpResponse};

use crate::api::extract::ParentUnlocked;
use crate::api::shared::ResponseType;
use crate::error::AppError;
use crate::services::dashboard;
use crate::store::Store;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/likes").route("/recent", web::get().to(recent_likes)));
}

pub async fn recent_likes(
    _unlocked: ParentUnlocked,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let videos = dashboard::recent_likes(store.get_ref()).await?;
    Ok(HttpResponse::Ok().json(ResponseType::ok(videos)))
}
