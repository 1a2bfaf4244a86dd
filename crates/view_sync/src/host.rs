//! Interfaces the host application provides to the view policy.
//!
//! The scene owns every entity; the policy only ever looks entities up by id
//! and mutates their display properties in place.

use std::path::Path;

use crossbeam_channel::{Receiver, Sender};
use shared::{
    domain::{Capability, DisplayProperties, EntityId, ImageInfo, Segment, SliceViewName, ViewLayout},
    error::{SceneError, ViewError},
    protocol::SceneEvent,
};

pub trait SceneEntity {
    fn id(&self) -> &EntityId;
    fn name(&self) -> &str;
    fn has_capability(&self, capability: Capability) -> bool;
    /// Voxel data backing a volume, if any has been loaded.
    fn image(&self) -> Option<ImageInfo>;
}

pub trait SceneHost {
    fn entity(&self, id: &EntityId) -> Option<&dyn SceneEntity>;
    /// Every entity currently in the scene, in creation order.
    fn entity_ids(&self) -> Vec<EntityId>;
    fn display_properties_mut(
        &mut self,
        id: &EntityId,
    ) -> Result<&mut DisplayProperties, SceneError>;
    /// Adds a segmentation with default display properties and announces it.
    fn add_segmentation(
        &mut self,
        name: &str,
        segments: Vec<Segment>,
    ) -> Result<EntityId, SceneError>;
    fn subscribe(&mut self) -> Subscription;
}

/// Receiving end of the scene's creation notifications.
///
/// Dropping it unsubscribes: the host stops delivering to a disconnected
/// channel on its next broadcast.
#[derive(Debug)]
pub struct Subscription {
    events: Receiver<SceneEvent>,
}

impl Subscription {
    /// Creates the sender the host keeps and the subscription it hands out.
    pub fn channel() -> (Sender<SceneEvent>, Subscription) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (tx, Subscription { events: rx })
    }

    pub(crate) fn try_next(&self) -> Option<SceneEvent> {
        self.events.try_recv().ok()
    }
}

/// The host's fixed set of views, addressed by slice view name.
pub trait ViewBackend {
    /// Slice views known to the current layout.
    fn slice_views(&self) -> Vec<SliceViewName>;
    /// Slice views the scene holds, which may include views outside the layout.
    fn scene_slice_views(&self) -> Vec<SliceViewName> {
        self.slice_views()
    }
    fn set_background(&mut self, view: &SliceViewName, volume: &EntityId) -> Result<(), ViewError>;
    fn set_foreground(
        &mut self,
        view: &SliceViewName,
        volume: &EntityId,
        opacity: f64,
    ) -> Result<(), ViewError>;
    fn set_plane_visible_in_3d(&mut self, view: &SliceViewName, visible: bool)
        -> Result<(), ViewError>;
    fn reset_camera(&mut self) -> Result<(), ViewError>;
    fn layout(&self) -> Result<ViewLayout, ViewError>;
    fn set_layout(&mut self, layout: ViewLayout) -> Result<(), ViewError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedVolume {
    pub id: EntityId,
    pub name: String,
}

/// Reads a volume file into the scene. `Ok(None)` means the reader produced nothing.
pub trait VolumeLoader {
    fn load_volume(&mut self, path: &Path) -> anyhow::Result<Option<LoadedVolume>>;
}

/// Host module registry used for navigation and preloading.
pub trait ModuleCatalog {
    fn contains(&self, name: &str) -> bool;
    fn load(&mut self, name: &str) -> anyhow::Result<()>;
    fn select(&mut self, name: &str) -> anyhow::Result<()>;
}
