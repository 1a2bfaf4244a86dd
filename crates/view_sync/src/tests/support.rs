//! Recording fakes for the host traits.

use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

use anyhow::anyhow;
use crossbeam_channel::Sender;
use shared::{
    domain::{
        Capability, DisplayProperties, EntityId, ImageInfo, Segment, SliceViewName, ViewLayout,
        ViewSurface,
    },
    error::{SceneError, ViewError},
    protocol::SceneEvent,
};

use crate::host::{
    LoadedVolume, ModuleCatalog, SceneEntity, SceneHost, Subscription, ViewBackend, VolumeLoader,
};

pub struct FakeEntity {
    pub id: EntityId,
    pub name: String,
    pub capabilities: Vec<Capability>,
    pub image: Option<ImageInfo>,
    pub display: Option<DisplayProperties>,
    pub segments: Vec<Segment>,
}

impl FakeEntity {
    pub fn new(id: &str, capabilities: &[Capability]) -> Self {
        Self {
            id: EntityId::from(id),
            name: id.to_string(),
            capabilities: capabilities.to_vec(),
            image: None,
            display: None,
            segments: Vec::new(),
        }
    }

    pub fn volume(id: &str) -> Self {
        let mut entity = Self::new(id, &[Capability::ScalarVolume, Capability::Volume]);
        entity.image = Some(ImageInfo {
            dimensions: [4, 4, 4],
        });
        entity
    }

    pub fn segmentation(id: &str) -> Self {
        let mut entity = Self::new(id, &[Capability::Segmentation]);
        entity.display = Some(DisplayProperties::default());
        entity
    }

    pub fn markup(id: &str) -> Self {
        let mut entity = Self::new(id, &[Capability::Markups]);
        entity.display = Some(DisplayProperties::default());
        entity
    }

    pub fn without_image(mut self) -> Self {
        self.image = None;
        self
    }
}

impl SceneEntity for FakeEntity {
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
pub struct FakeScene {
    pub entities: Vec<FakeEntity>,
    subscribers: Vec<Sender<SceneEvent>>,
}

impl FakeScene {
    pub fn add(&mut self, entity: FakeEntity) -> EntityId {
        let id = entity.id.clone();
        self.entities.push(entity);
        self.announce(&id);
        id
    }

    /// Delivers a creation notification again without touching the scene.
    pub fn announce(&mut self, id: &EntityId) {
        let event = SceneEvent::EntityAdded {
            entity_id: id.clone(),
        };
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn get(&self, id: &str) -> &FakeEntity {
        self.entities
            .iter()
            .find(|entity| entity.id.as_str() == id)
            .expect("entity in fake scene")
    }
}

impl SceneHost for FakeScene {
    fn entity(&self, id: &EntityId) -> Option<&dyn SceneEntity> {
        self.entities
            .iter()
            .find(|entity| &entity.id == id)
            .map(|entity| entity as &dyn SceneEntity)
    }

    fn entity_ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(|entity| entity.id.clone()).collect()
    }

    fn display_properties_mut(
        &mut self,
        id: &EntityId,
    ) -> Result<&mut DisplayProperties, SceneError> {
        let entity = self
            .entities
            .iter_mut()
            .find(|entity| &entity.id == id)
            .ok_or_else(|| SceneError::UnknownEntity(id.clone()))?;
        entity
            .display
            .as_mut()
            .ok_or_else(|| SceneError::NoDisplayProperties(id.clone()))
    }

    fn add_segmentation(
        &mut self,
        name: &str,
        segments: Vec<Segment>,
    ) -> Result<EntityId, SceneError> {
        let id = format!("Segmentation{}", self.entities.len() + 1);
        let mut entity = FakeEntity::segmentation(&id);
        entity.name = name.to_string();
        entity.segments = segments;
        Ok(self.add(entity))
    }

    fn subscribe(&mut self) -> Subscription {
        let (tx, subscription) = Subscription::channel();
        self.subscribers.push(tx);
        subscription
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewCall {
    Background(SliceViewName, EntityId),
    Foreground(SliceViewName, EntityId, f64),
    PlaneVisible(SliceViewName, bool),
    ResetCamera,
    Layout(ViewLayout),
}

pub struct RecordingViews {
    pub views: Vec<SliceViewName>,
    pub extra_scene_views: Vec<SliceViewName>,
    pub unavailable: HashSet<SliceViewName>,
    pub camera_unavailable: bool,
    pub layout: ViewLayout,
    pub calls: Vec<ViewCall>,
}

impl Default for RecordingViews {
    fn default() -> Self {
        Self {
            views: SliceViewName::defaults(),
            extra_scene_views: Vec::new(),
            unavailable: HashSet::new(),
            camera_unavailable: false,
            layout: ViewLayout::Initial,
            calls: Vec::new(),
        }
    }
}

impl RecordingViews {
    pub fn camera_resets(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, ViewCall::ResetCamera))
            .count()
    }

    fn check(&self, view: &SliceViewName) -> Result<(), ViewError> {
        if self.unavailable.contains(view) {
            return Err(ViewError::SurfaceUnavailable(ViewSurface::Slice(view.clone())));
        }
        Ok(())
    }
}

impl ViewBackend for RecordingViews {
    fn slice_views(&self) -> Vec<SliceViewName> {
        self.views.clone()
    }

    fn scene_slice_views(&self) -> Vec<SliceViewName> {
        let mut views = self.views.clone();
        views.extend(self.extra_scene_views.iter().cloned());
        views
    }

    fn set_background(&mut self, view: &SliceViewName, volume: &EntityId) -> Result<(), ViewError> {
        self.check(view)?;
        self.calls
            .push(ViewCall::Background(view.clone(), volume.clone()));
        Ok(())
    }

    fn set_foreground(
        &mut self,
        view: &SliceViewName,
        volume: &EntityId,
        opacity: f64,
    ) -> Result<(), ViewError> {
        self.check(view)?;
        self.calls
            .push(ViewCall::Foreground(view.clone(), volume.clone(), opacity));
        Ok(())
    }

    fn set_plane_visible_in_3d(
        &mut self,
        view: &SliceViewName,
        visible: bool,
    ) -> Result<(), ViewError> {
        self.check(view)?;
        self.calls.push(ViewCall::PlaneVisible(view.clone(), visible));
        Ok(())
    }

    fn reset_camera(&mut self) -> Result<(), ViewError> {
        if self.camera_unavailable {
            return Err(ViewError::SurfaceUnavailable(ViewSurface::ThreeD));
        }
        self.calls.push(ViewCall::ResetCamera);
        Ok(())
    }

    fn layout(&self) -> Result<ViewLayout, ViewError> {
        Ok(self.layout)
    }

    fn set_layout(&mut self, layout: ViewLayout) -> Result<(), ViewError> {
        self.layout = layout;
        self.calls.push(ViewCall::Layout(layout));
        Ok(())
    }
}

pub enum LoaderOutcome {
    Loaded(&'static str),
    Nothing,
    Fail(&'static str),
}

pub struct FakeLoader {
    pub outcome: LoaderOutcome,
    pub requested: Vec<std::path::PathBuf>,
}

impl FakeLoader {
    pub fn new(outcome: LoaderOutcome) -> Self {
        Self {
            outcome,
            requested: Vec::new(),
        }
    }
}

impl VolumeLoader for FakeLoader {
    fn load_volume(&mut self, path: &Path) -> anyhow::Result<Option<LoadedVolume>> {
        self.requested.push(path.to_path_buf());
        match &self.outcome {
            LoaderOutcome::Loaded(name) => Ok(Some(LoadedVolume {
                id: EntityId::from("Volume1"),
                name: name.to_string(),
            })),
            LoaderOutcome::Nothing => Ok(None),
            LoaderOutcome::Fail(reason) => Err(anyhow!(reason.to_string())),
        }
    }
}

#[derive(Default)]
pub struct FakeCatalog {
    pub modules: HashMap<String, bool>,
    pub loaded: Vec<String>,
    pub selected: Vec<String>,
}

impl FakeCatalog {
    /// `broken` modules are listed but fail to load.
    pub fn with(modules: &[&str], broken: &[&str]) -> Self {
        let mut catalog = Self::default();
        for name in modules {
            catalog.modules.insert(name.to_string(), true);
        }
        for name in broken {
            catalog.modules.insert(name.to_string(), false);
        }
        catalog
    }
}

impl ModuleCatalog for FakeCatalog {
    fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    fn load(&mut self, name: &str) -> anyhow::Result<()> {
        match self.modules.get(name) {
            Some(true) => {
                self.loaded.push(name.to_string());
                Ok(())
            }
            _ => Err(anyhow!("module {name} could not be instantiated")),
        }
    }

    fn select(&mut self, name: &str) -> anyhow::Result<()> {
        self.load(name)?;
        self.selected.push(name.to_string());
        Ok(())
    }
}
