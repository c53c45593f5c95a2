use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;
use crate::services::dashboard::Session;
use crate::services::parent_gate::ParentGate;

pub const PARENT_PIN_HEADER: &str = "X-Parent-Pin";

/// `Authorization: Bearer <parent uuid>`. Handlers that tolerate a missing
/// session take `Option<Session>`.
impl FromRequest for Session {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let parent_id = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .and_then(|token| Uuid::parse_str(token.trim()).ok());

        ready(
            parent_id
                .map(|parent_id| Session { parent_id })
                .ok_or_else(|| AppError::Unauthenticated {
                    title: "Authentication Required",
                    message: "Please sign in to continue.".into(),
                }),
        )
    }
}

/// Proof that the request carried the parent-mode PIN.
#[derive(Debug)]
pub struct ParentUnlocked;

impl FromRequest for ParentUnlocked {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Some(gate) = req.app_data::<web::Data<ParentGate>>() else {
            log::error!("Parent gate is not configured");
            return ready(Err(AppError::Forbidden {
                title: "Parent Mode",
                message: "Parent mode is unavailable.".into(),
            }));
        };
        let pin = req
            .headers()
            .get(PARENT_PIN_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        ready(gate.verify(pin).map(|_| ParentUnlocked))
    }
}
