use serde::Serialize;

use crate::services::Notice;

#[derive(Debug, Serialize)]
pub struct APIError {
    pub cause: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ResponseType<T = String> {
    pub data: Option<T>,
    pub error: Option<APIError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl<T> ResponseType<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            notice: None,
        }
    }

    pub fn with_notice(data: T, notice: Option<Notice>) -> Self {
        Self {
            data: Some(data),
            error: None,
            notice,
        }
    }
}
