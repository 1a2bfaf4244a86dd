use std::{fs, path::Path};

use anyhow::{bail, Context};
use crossbeam_channel::Sender;
use serde::Serialize;
use shared::{
    domain::{Capability, DisplayProperties, EntityId, ImageInfo, Segment},
    error::SceneError,
    protocol::SceneEvent,
};
use tracing::debug;
use view_sync::{LoadedVolume, SceneEntity, SceneHost, Subscription, VolumeLoader};

pub const SUPPORTED_VOLUME_EXTENSIONS: &[&str] =
    &[".nii", ".nii.gz", ".nrrd", ".nhdr", ".mha", ".mhd"];

#[derive(Debug, Clone, Serialize)]
pub struct SceneNode {
    pub id: EntityId,
    pub name: String,
    pub capabilities: Vec<Capability>,
    pub image: Option<ImageInfo>,
    pub display: Option<DisplayProperties>,
    pub segments: Vec<Segment>,
}

impl SceneEntity for SceneNode {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    fn image(&self) -> Option<ImageInfo> {
        self.image
    }
}

#[derive(Default)]
pub struct InMemoryScene {
    nodes: Vec<SceneNode>,
    next_id: u64,
    subscribers: Vec<Sender<SceneEvent>>,
}

impl InMemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn node(&self, id: &EntityId) -> Option<&SceneNode> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn add_scalar_volume(&mut self, name: &str, image: Option<ImageInfo>) -> EntityId {
        self.insert(
            "Volume",
            name,
            vec![Capability::ScalarVolume, Capability::Volume],
            image,
            None,
        )
    }

    /// A volume that is not scalar-valued, such as a vector or diffusion volume.
    pub fn add_volume(&mut self, name: &str, image: Option<ImageInfo>) -> EntityId {
        self.insert("Volume", name, vec![Capability::Volume], image, None)
    }

    pub fn add_markup(&mut self, name: &str) -> EntityId {
        self.insert(
            "Markups",
            name,
            vec![Capability::Markups],
            None,
            Some(DisplayProperties::default()),
        )
    }

    /// A node the viewer has no policy for (transforms, tables, ...).
    pub fn add_other(&mut self, name: &str) -> EntityId {
        self.insert("Node", name, Vec::new(), None, None)
    }

    /// Delivers another creation notification for an existing node.
    pub fn renotify(&mut self, id: &EntityId) -> Result<(), SceneError> {
        if self.node(id).is_none() {
            return Err(SceneError::UnknownEntity(id.clone()));
        }
        self.broadcast(SceneEvent::EntityAdded {
            entity_id: id.clone(),
        });
        Ok(())
    }

    fn insert(
        &mut self,
        prefix: &str,
        name: &str,
        capabilities: Vec<Capability>,
        image: Option<ImageInfo>,
        display: Option<DisplayProperties>,
    ) -> EntityId {
        self.next_id += 1;
        let id = EntityId(format!("{prefix}{}", self.next_id));
        self.nodes.push(SceneNode {
            id: id.clone(),
            name: name.to_string(),
            capabilities,
            image,
            display,
            segments: Vec::new(),
        });
        debug!(entity = %id, name, "node added to scene");
        self.broadcast(SceneEvent::EntityAdded {
            entity_id: id.clone(),
        });
        id
    }

    fn broadcast(&mut self, event: SceneEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl SceneHost for InMemoryScene {
    fn entity(&self, id: &EntityId) -> Option<&dyn SceneEntity> {
        self.node(id).map(|node| node as &dyn SceneEntity)
    }

    fn entity_ids(&self) -> Vec<EntityId> {
        self.nodes.iter().map(|node| node.id.clone()).collect()
    }

    fn display_properties_mut(
        &mut self,
        id: &EntityId,
    ) -> Result<&mut DisplayProperties, SceneError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|node| &node.id == id)
            .ok_or_else(|| SceneError::UnknownEntity(id.clone()))?;
        node.display
            .as_mut()
            .ok_or_else(|| SceneError::NoDisplayProperties(id.clone()))
    }

    fn add_segmentation(
        &mut self,
        name: &str,
        segments: Vec<Segment>,
    ) -> Result<EntityId, SceneError> {
        self.next_id += 1;
        let id = EntityId(format!("Segmentation{}", self.next_id));
        self.nodes.push(SceneNode {
            id: id.clone(),
            name: name.to_string(),
            capabilities: vec![Capability::Segmentation],
            image: None,
            display: Some(DisplayProperties::default()),
            segments,
        });
        self.broadcast(SceneEvent::EntityAdded {
            entity_id: id.clone(),
        });
        Ok(id)
    }

    fn subscribe(&mut self) -> Subscription {
        let (tx, subscription) = Subscription::channel();
        self.subscribers.push(tx);
        subscription
    }
}

impl VolumeLoader for InMemoryScene {
    /// Registers the file as a scalar volume. Voxel decoding is left to real
    /// readers; the placeholder geometry is one voxel per byte.
    fn load_volume(&mut self, path: &Path) -> anyhow::Result<Option<LoadedVolume>> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .with_context(|| format!("'{}' has no file name", path.display()))?;
        let lower = file_name.to_ascii_lowercase();
        let Some(extension) = SUPPORTED_VOLUME_EXTENSIONS
            .iter()
            .find(|extension| lower.ends_with(*extension))
        else {
            bail!("unsupported volume format: {file_name}");
        };
        let metadata = fs::metadata(path)
            .with_context(|| format!("failed to read '{}'", path.display()))?;
        if metadata.len() == 0 {
            return Ok(None);
        }

        let name = &file_name[..file_name.len() - extension.len()];
        let voxels = usize::try_from(metadata.len()).context("volume too large")?;
        let image = ImageInfo {
            dimensions: [voxels, 1, 1],
        };
        let id = self.add_scalar_volume(name, Some(image));
        Ok(Some(LoadedVolume {
            id,
            name: name.to_string(),
        }))
    }
}

#[cfg(test)]
#[path = "tests/scene_tests.rs"]
mod tests;
