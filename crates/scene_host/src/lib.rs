//! In-memory host for the viewer: a scene that announces new entities, a
//! fixed set of slice views plus a 3-D view, and a module catalog.

mod modules;
mod scene;
mod views;

pub use modules::ModuleRegistry;
pub use scene::{InMemoryScene, SceneNode, SUPPORTED_VOLUME_EXTENSIONS};
pub use views::{InMemoryViews, SliceViewState, ViewSnapshot};
