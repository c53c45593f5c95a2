//! Four-digit PIN in front of the parent screens. It keeps small children
//! out of the dashboard and nothing more: the code is compared in plain
//! text, never stored per user and never rate limited.

use crate::error::AppError;

pub const PIN_LEN: usize = 4;

pub fn is_pin_shaped(input: &str) -> bool {
    input.len() == PIN_LEN && input.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Clone)]
pub struct ParentGate {
    pin: String,
}

impl ParentGate {
    pub fn new(pin: impl Into<String>) -> Self {
        Self { pin: pin.into() }
    }

    /// Checks `input` against the configured PIN, ignoring surrounding
    /// whitespace.
    pub fn verify(&self, input: &str) -> Result<(), AppError> {
        let input = input.trim();
        if !is_pin_shaped(input) {
            return Err(AppError::validation("Parent Mode", "Enter the four-digit code."));
        }
        if input != self.pin {
            log::warn!("Rejected parent-mode PIN attempt");
            return Err(AppError::Forbidden {
                title: "Parent Mode",
                message: "Incorrect PIN".into(),
            });
        }
        Ok(())
    }
}
