//! User-visible notices (toasts).

use serde::{Deserialize, Serialize};

use crate::error::{FailureKind, HprError};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A short message shown to the user after an operation.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Set for error notices.
    #[serde(skip)]
    pub failure: Option<FailureKind>,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
            failure: None,
        }
    }

    pub fn error(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            failure: Some(kind),
        }
    }

    /// Builds an error notice from a failed operation.
    ///
    /// Validation errors always report as [`FailureKind::Validation`]
    /// regardless of `kind`.
    pub fn from_error(kind: FailureKind, context: &str, err: &HprError) -> Self {
        let kind = if err.is_validation() {
            FailureKind::Validation
        } else {
            kind
        };
        Self::error(kind, format!("{}: {}", context, err))
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}
