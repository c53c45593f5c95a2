use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::api::extract::ParentUnlocked;
use crate::api::shared::ResponseType;
use crate::error::AppError;
use crate::services::dashboard;
use crate::store::Store;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/videos").route("/{id}", web::delete().to(delete_video)));
}

/// Removes the video without confirmation and returns the rest of its
/// playlist.
pub async fn delete_video(
    _unlocked: ParentUnlocked,
    store: web::Data<dyn Store>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let remaining = dashboard::delete_video(store.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ResponseType::ok(remaining)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::extract::PARENT_PIN_HEADER;
    use crate::api::test_support;
    use crate::db::models::{NewPlaylist, NewVideo};
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::Value;

    #[actix_web::test]
    async fn delete_removes_one_row() {
        let state = test_support::state();
        let playlist = state
            .memory
            .insert_playlist(NewPlaylist {
                title: "Science Fun".into(),
                description: None,
                parent_id: Uuid::new_v4(),
            })
            .await
            .unwrap();
        let mut ids = Vec::new();
        for youtube_id in ["d6iQrh2TK98", "5npJ3YnL9nE"] {
            let video = state
                .memory
                .insert_video(NewVideo {
                    playlist_id: Some(playlist.id),
                    youtube_id: youtube_id.into(),
                    title: None,
                })
                .await
                .unwrap();
            ids.push(video.id);
        }
        let app = test::init_service(
            App::new()
                .app_data(state.store.clone())
                .app_data(state.gate.clone())
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::delete()
            .uri(&format!("/videos/{}", ids[0]))
            .insert_header((PARENT_PIN_HEADER, test_support::PIN))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let remaining = body["data"].as_array().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0]["id"], ids[1].to_string());
        assert_eq!(state.memory.video_count().await, 1);

        let req = test::TestRequest::delete()
            .uri(&format!("/videos/{}", ids[0]))
            .insert_header((PARENT_PIN_HEADER, test_support::PIN))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
