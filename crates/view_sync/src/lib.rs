//! View synchronization policy for the volume viewer shell.
//!
//! New scene entities are classified and given a default place across the
//! slice views and the 3-D view: the first volume becomes the background of
//! every slice view, later volumes become half-opacity overlays, and
//! segmentations and markups are made visible.

pub mod auto_contour;
pub mod classifier;
pub mod host;
pub mod ledger;
pub mod reactor;
pub mod registry;
pub mod sequencer;
pub mod services;
pub mod settings;

#[cfg(test)]
#[path = "tests/support.rs"]
mod testing;

pub use auto_contour::{AutoContour, AutoContourError, PlaceholderModel, SegmentationModel};
pub use classifier::classify;
pub use host::{
    LoadedVolume, ModuleCatalog, SceneEntity, SceneHost, Subscription, ViewBackend, VolumeLoader,
};
pub use ledger::AssignmentLedger;
pub use reactor::{Reaction, ReactorState, SceneReactor};
pub use registry::{FanOutReport, ViewRegistry, DEFAULT_FOREGROUND_OPACITY};
pub use sequencer::{InitializationSequencer, StartupError, StartupReport};
pub use services::{
    load_volume_by_path, normalize_volume_path, preload_modules, select_module, LoadVolumeError,
    NavigationError,
};
pub use settings::{load_settings, Settings, SettingsError};
