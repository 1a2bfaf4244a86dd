use std::collections::HashSet;

use serde::Serialize;
use shared::{
    domain::{EntityId, SliceViewName, ViewLayout, ViewSurface},
    error::ViewError,
};
use view_sync::ViewBackend;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SliceViewState {
    pub background: Option<EntityId>,
    pub foreground: Option<EntityId>,
    pub foreground_opacity: f64,
    pub plane_visible_in_3d: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub layout: Option<ViewLayout>,
    pub slices: Vec<(SliceViewName, SliceViewState)>,
    pub camera_resets: u32,
}

/// Slice views in layout order plus one 3-D view.
pub struct InMemoryViews {
    slices: Vec<(SliceViewName, SliceViewState)>,
    scene_only: Vec<(SliceViewName, SliceViewState)>,
    unavailable: HashSet<SliceViewName>,
    three_d_available: bool,
    layout: Option<ViewLayout>,
    camera_resets: u32,
}

impl Default for InMemoryViews {
    fn default() -> Self {
        Self::new(SliceViewName::defaults())
    }
}

impl InMemoryViews {
    pub fn new(slice_views: Vec<SliceViewName>) -> Self {
        Self {
            slices: slice_views
                .into_iter()
                .map(|name| (name, SliceViewState::default()))
                .collect(),
            scene_only: Vec::new(),
            unavailable: HashSet::new(),
            three_d_available: true,
            layout: Some(ViewLayout::Initial),
            camera_resets: 0,
        }
    }

    /// Adds a slice view that exists in the scene but is not part of the layout.
    pub fn with_scene_only_view(mut self, name: impl Into<String>) -> Self {
        self.scene_only
            .push((SliceViewName(name.into()), SliceViewState::default()));
        self
    }

    /// Marks a slice view as temporarily unable to accept updates.
    pub fn set_available(&mut self, view: &SliceViewName, available: bool) {
        if available {
            self.unavailable.remove(view);
        } else {
            self.unavailable.insert(view.clone());
        }
    }

    pub fn set_three_d_available(&mut self, available: bool) {
        self.three_d_available = available;
    }

    /// Simulates a host without a layout manager.
    pub fn without_layout_manager(mut self) -> Self {
        self.layout = None;
        self
    }

    pub fn slice(&self, view: &str) -> Option<&SliceViewState> {
        self.slices
            .iter()
            .chain(self.scene_only.iter())
            .find(|(name, _)| name.as_str() == view)
            .map(|(_, state)| state)
    }

    pub fn camera_resets(&self) -> u32 {
        self.camera_resets
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            layout: self.layout,
            slices: self.slices.clone(),
            camera_resets: self.camera_resets,
        }
    }

    fn slice_mut(&mut self, view: &SliceViewName) -> Result<&mut SliceViewState, ViewError> {
        if self.unavailable.contains(view) {
            return Err(ViewError::SurfaceUnavailable(ViewSurface::Slice(view.clone())));
        }
        self.slices
            .iter_mut()
            .chain(self.scene_only.iter_mut())
            .find(|(name, _)| name == view)
            .map(|(_, state)| state)
            .ok_or_else(|| ViewError::UnknownSurface(ViewSurface::Slice(view.clone())))
    }
}

impl ViewBackend for InMemoryViews {
    fn slice_views(&self) -> Vec<SliceViewName> {
        self.slices.iter().map(|(name, _)| name.clone()).collect()
    }

    fn scene_slice_views(&self) -> Vec<SliceViewName> {
        self.slices
            .iter()
            .chain(self.scene_only.iter())
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn set_background(&mut self, view: &SliceViewName, volume: &EntityId) -> Result<(), ViewError> {
        self.slice_mut(view)?.background = Some(volume.clone());
        Ok(())
    }

    fn set_foreground(
        &mut self,
        view: &SliceViewName,
        volume: &EntityId,
        opacity: f64,
    ) -> Result<(), ViewError> {
        let state = self.slice_mut(view)?;
        state.foreground = Some(volume.clone());
        state.foreground_opacity = opacity;
        Ok(())
    }

    fn set_plane_visible_in_3d(
        &mut self,
        view: &SliceViewName,
        visible: bool,
    ) -> Result<(), ViewError> {
        self.slice_mut(view)?.plane_visible_in_3d = visible;
        Ok(())
    }

    fn reset_camera(&mut self) -> Result<(), ViewError> {
        if !self.three_d_available {
            return Err(ViewError::SurfaceUnavailable(ViewSurface::ThreeD));
        }
        self.camera_resets += 1;
        Ok(())
    }

    fn layout(&self) -> Result<ViewLayout, ViewError> {
        self.layout.ok_or(ViewError::LayoutUnavailable)
    }

    fn set_layout(&mut self, layout: ViewLayout) -> Result<(), ViewError> {
        match self.layout.as_mut() {
            Some(current) => {
                *current = layout;
                Ok(())
            }
            None => Err(ViewError::LayoutUnavailable),
        }
    }
}

#[cfg(test)]
#[path = "tests/views_tests.rs"]
mod tests;
