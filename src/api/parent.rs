use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::api::shared::ResponseType;
use crate::error::AppError;
use crate::services::parent_gate::ParentGate;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/unlock", web::post().to(unlock));
}

#[derive(Debug, Deserialize)]
pub struct UnlockRequest {
    pub pin: String,
}

/// Checks the PIN before the client switches to parent mode. Parent routes
/// re-check it on every request through `ParentUnlocked`.
pub async fn unlock(
    gate: web::Data<ParentGate>,
    body: web::Json<UnlockRequest>,
) -> Result<HttpResponse, AppError> {
    gate.verify(&body.pin)?;
    log::info!("Parent mode unlocked");
    Ok(HttpResponse::Ok().json(ResponseType::ok(json!({ "unlocked": true }))))
}
