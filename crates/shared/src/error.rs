use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{EntityId, ViewSurface};

/// How a failure is recovered from. Nothing in the viewer is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// A display mutation could not be applied; skipped and logged.
    Policy,
    /// Bad path, missing file, failed load; shown to the user.
    UserInput,
    /// A dependent module is missing; the feature is treated as unavailable.
    Integration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub category: ErrorCategory,
    pub message: String,
}

impl ErrorReport {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("surface {0} is not available")]
    SurfaceUnavailable(ViewSurface),
    #[error("no surface named {0}")]
    UnknownSurface(ViewSurface),
    #[error("layout manager is not available")]
    LayoutUnavailable,
}

impl ViewError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Policy
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("entity {0} is not in the scene")]
    UnknownEntity(EntityId),
    #[error("entity {0} has no display properties")]
    NoDisplayProperties(EntityId),
}

impl SceneError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Policy
    }
}

impl From<ViewError> for ErrorReport {
    fn from(value: ViewError) -> Self {
        Self::new(value.category(), value.to_string())
    }
}

impl From<SceneError> for ErrorReport {
    fn from(value: SceneError) -> Self {
        Self::new(value.category(), value.to_string())
    }
}
