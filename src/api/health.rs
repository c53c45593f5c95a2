use actix_web::{web, HttpResponse};

use crate::services::feed::FeedRegistry;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health_check)));
}

async fn health_check(feeds: web::Data<FeedRegistry>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "open_feeds": feeds.len(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
