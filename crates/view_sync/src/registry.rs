//! Facade over the host's fixed view set.
//!
//! Per-surface operations return `Result`; the fan-out operations fold every
//! surface's result into a [`FanOutReport`] so one unavailable view never
//! blocks the others.

use shared::{
    domain::{EntityId, SliceViewName, ViewLayout, ViewSurface},
    error::ViewError,
};
use tracing::{debug, warn};

use crate::host::ViewBackend;

pub const DEFAULT_FOREGROUND_OPACITY: f64 = 0.5;

#[derive(Debug, Default)]
pub struct FanOutReport {
    pub applied: Vec<ViewSurface>,
    pub failures: Vec<(ViewSurface, ViewError)>,
}

impl FanOutReport {
    pub fn record(&mut self, surface: ViewSurface, result: Result<(), ViewError>) {
        match result {
            Ok(()) => self.applied.push(surface),
            Err(err) => self.failures.push((surface, err)),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn merge(&mut self, other: FanOutReport) {
        self.applied.extend(other.applied);
        self.failures.extend(other.failures);
    }

    /// Logs each failed surface and moves on.
    pub fn log_failures(&self, operation: &str, entity: Option<&EntityId>) {
        for (surface, err) in &self.failures {
            warn!(
                operation,
                surface = %surface,
                entity = entity.map(EntityId::as_str).unwrap_or("-"),
                error = %err,
                "view update skipped"
            );
        }
    }
}

impl FromIterator<(ViewSurface, Result<(), ViewError>)> for FanOutReport {
    fn from_iter<I: IntoIterator<Item = (ViewSurface, Result<(), ViewError>)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(FanOutReport::default(), |mut report, (surface, result)| {
                report.record(surface, result);
                report
            })
    }
}

pub struct ViewRegistry<V> {
    backend: V,
}

impl<V: ViewBackend> ViewRegistry<V> {
    pub fn new(backend: V) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &V {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut V {
        &mut self.backend
    }

    pub fn into_backend(self) -> V {
        self.backend
    }

    pub fn slice_surfaces(&self) -> Vec<ViewSurface> {
        self.backend
            .slice_views()
            .into_iter()
            .map(ViewSurface::Slice)
            .collect()
    }

    pub fn set_background(&mut self, view: &SliceViewName, volume: &EntityId) -> Result<(), ViewError> {
        self.backend.set_background(view, volume)
    }

    pub fn set_foreground(
        &mut self,
        view: &SliceViewName,
        volume: &EntityId,
        opacity: f64,
    ) -> Result<(), ViewError> {
        self.backend
            .set_foreground(view, volume, opacity.clamp(0.0, 1.0))
    }

    pub fn set_plane_visible_in_3d(
        &mut self,
        view: &SliceViewName,
        visible: bool,
    ) -> Result<(), ViewError> {
        self.backend.set_plane_visible_in_3d(view, visible)
    }

    pub fn reset_camera(&mut self) -> Result<(), ViewError> {
        self.backend.reset_camera()
    }

    pub fn set_background_everywhere(&mut self, volume: &EntityId) -> FanOutReport {
        let views = self.backend.slice_views();
        views
            .into_iter()
            .map(|view| {
                let result = self.set_background(&view, volume);
                (ViewSurface::Slice(view), result)
            })
            .collect()
    }

    pub fn set_foreground_everywhere(&mut self, volume: &EntityId, opacity: f64) -> FanOutReport {
        let views = self.backend.slice_views();
        views
            .into_iter()
            .map(|view| {
                let result = self.set_foreground(&view, volume, opacity);
                (ViewSurface::Slice(view), result)
            })
            .collect()
    }

    /// Toggles the plane of every slice view in the layout.
    pub fn set_planes_visible_in_3d(&mut self, visible: bool) -> FanOutReport {
        let views = self.backend.slice_views();
        self.set_planes_for(views, visible)
    }

    /// Like [`Self::set_planes_visible_in_3d`], but also covers slice views the
    /// scene holds outside the current layout. Each view is touched once.
    pub fn set_all_scene_planes_visible_in_3d(&mut self, visible: bool) -> FanOutReport {
        let mut views = self.backend.slice_views();
        for view in self.backend.scene_slice_views() {
            if !views.contains(&view) {
                views.push(view);
            }
        }
        self.set_planes_for(views, visible)
    }

    fn set_planes_for(&mut self, views: Vec<SliceViewName>, visible: bool) -> FanOutReport {
        views
            .into_iter()
            .map(|view| {
                let result = self.set_plane_visible_in_3d(&view, visible);
                (ViewSurface::Slice(view), result)
            })
            .collect()
    }

    /// Switches the layout, returning the one it replaced when the host could report it.
    pub fn set_layout(&mut self, layout: ViewLayout) -> Result<Option<ViewLayout>, ViewError> {
        let previous = self.backend.layout().ok();
        self.backend.set_layout(layout)?;
        debug!(?previous, ?layout, "layout applied");
        Ok(previous)
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
