use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::api::shared::{APIError, ResponseType};
use crate::services::Notice;

/// Failures of the backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<diesel_async::pooled_connection::deadpool::PoolError> for StoreError {
    fn from(e: diesel_async::pooled_connection::deadpool::PoolError) -> Self {
        StoreError::Pool(e.to_string())
    }
}

/// Failures of a user-facing operation. Each carries the alert title the
/// caller shows.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{title}: {message}")]
    Validation {
        title: &'static str,
        message: String,
    },

    #[error("{title}: {message}")]
    Unauthenticated {
        title: &'static str,
        message: String,
    },

    #[error("{title}: {message}")]
    Forbidden {
        title: &'static str,
        message: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{title}: {source}")]
    Store {
        title: &'static str,
        #[source]
        source: StoreError,
    },
}

impl AppError {
    pub fn validation(title: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            title,
            message: message.into(),
        }
    }

    pub fn notice(&self) -> Notice {
        match self {
            AppError::Validation { title, message }
            | AppError::Unauthenticated { title, message }
            | AppError::Forbidden { title, message } => Notice::new(*title, message.clone()),
            AppError::NotFound(message) => Notice::new("Not Found", message.clone()),
            AppError::Store { title, source } => Notice::new(*title, source.to_string()),
        }
    }
}

/// Attaches an alert title to a store failure.
pub trait StoreResultExt<T> {
    fn alert(self, title: &'static str) -> Result<T, AppError>;
}

impl<T> StoreResultExt<T> for Result<T, StoreError> {
    fn alert(self, title: &'static str) -> Result<T, AppError> {
        self.map_err(|source| {
            log::error!("{}: {}", title, source);
            AppError::Store { title, source }
        })
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let notice = self.notice();
        HttpResponse::build(self.status_code()).json(ResponseType::<()> {
            data: None,
            error: Some(APIError {
                cause: notice.title.clone(),
                message: notice.message.clone(),
            }),
            notice: Some(notice),
        })
    }
}
