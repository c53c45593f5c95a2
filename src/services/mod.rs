pub mod dashboard;
pub mod feed;
pub mod likes;
pub mod parent_gate;
pub mod playlist_state;
pub mod youtube;

use serde::{Deserialize, Serialize};

/// A user-visible alert: a short title and a message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}
