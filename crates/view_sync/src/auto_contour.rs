//! Automatic contouring entry point.
//!
//! Model inference is pluggable through [`SegmentationModel`]; the default
//! [`PlaceholderModel`] yields no segments, so the result is an empty but
//! valid segmentation.

use shared::{
    domain::{EntityId, EntityKind, ImageInfo, Segment},
    error::{ErrorCategory, SceneError},
};
use thiserror::Error;
use tracing::{debug, info};

use crate::{classifier::classify, host::SceneHost};

pub const DEFAULT_NAME_SUFFIX: &str = " - AutoContour";

#[derive(Debug, Error)]
pub enum AutoContourError {
    #[error("volume {0} is not in the scene")]
    UnknownVolume(EntityId),
    #[error("entity {0} is not a volume")]
    NotAVolume(EntityId),
    #[error("segmentation model failed: {0}")]
    Inference(#[source] anyhow::Error),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

impl AutoContourError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AutoContourError::UnknownVolume(_) | AutoContourError::NotAVolume(_) => {
                ErrorCategory::UserInput
            }
            AutoContourError::Inference(_) => ErrorCategory::Integration,
            AutoContourError::Scene(err) => err.category(),
        }
    }
}

pub trait SegmentationModel {
    fn infer(&self, image: &ImageInfo) -> anyhow::Result<Vec<Segment>>;
}

pub struct PlaceholderModel;

impl SegmentationModel for PlaceholderModel {
    fn infer(&self, image: &ImageInfo) -> anyhow::Result<Vec<Segment>> {
        debug!(voxels = image.voxel_count(), "placeholder model produces no segments");
        Ok(Vec::new())
    }
}

pub struct AutoContour<M = PlaceholderModel> {
    model: M,
    name_suffix: String,
}

impl Default for AutoContour<PlaceholderModel> {
    fn default() -> Self {
        Self::new(PlaceholderModel)
    }
}

impl<M: SegmentationModel> AutoContour<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            name_suffix: DEFAULT_NAME_SUFFIX.to_string(),
        }
    }

    pub fn with_name_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.name_suffix = suffix.into();
        self
    }

    /// Segments `volume_id` into a new segmentation entity.
    ///
    /// A volume without image data yields `Ok(None)` and leaves the scene untouched.
    pub fn run<S: SceneHost + ?Sized>(
        &self,
        scene: &mut S,
        volume_id: &EntityId,
    ) -> Result<Option<EntityId>, AutoContourError> {
        let volume = scene
            .entity(volume_id)
            .ok_or_else(|| AutoContourError::UnknownVolume(volume_id.clone()))?;
        if classify(volume) != EntityKind::Volume {
            return Err(AutoContourError::NotAVolume(volume_id.clone()));
        }
        let Some(image) = volume.image().filter(|image| !image.is_empty()) else {
            debug!(volume = %volume_id, "volume has no image data; nothing to contour");
            return Ok(None);
        };
        let name = format!("{}{}", volume.name(), self.name_suffix);

        let segments = self
            .model
            .infer(&image)
            .map_err(AutoContourError::Inference)?;
        let segment_count = segments.len();
        let segmentation_id = scene.add_segmentation(&name, segments)?;
        info!(
            volume = %volume_id,
            segmentation = %segmentation_id,
            segments = segment_count,
            "auto-contour segmentation created"
        );
        Ok(Some(segmentation_id))
    }
}

#[cfg(test)]
#[path = "tests/auto_contour_tests.rs"]
mod tests;
