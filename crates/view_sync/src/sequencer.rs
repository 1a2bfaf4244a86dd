//! One-shot startup pass run before the reactor starts listening, so entities
//! that predate the reactor get the same treatment as ones created after.

use shared::domain::{Capability, EntityId, EntityKind, ViewLayout};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    classifier::classify,
    host::{SceneHost, ViewBackend},
    reactor::{Reaction, ReactorState, SceneReactor},
    registry::FanOutReport,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StartupError {
    #[error("startup defaults must be applied before the reactor attaches")]
    AlreadyAttached,
}

#[derive(Debug, Default)]
pub struct StartupReport {
    pub planes: FanOutReport,
    pub startup_volume: Option<Reaction>,
    /// Layout in place before startup, when the host could report it.
    pub replaced_layout: Option<ViewLayout>,
    pub layout_applied: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct InitializationSequencer {
    layout: ViewLayout,
}

impl Default for InitializationSequencer {
    fn default() -> Self {
        Self {
            layout: ViewLayout::FourUp,
        }
    }
}

impl InitializationSequencer {
    pub fn new(layout: ViewLayout) -> Self {
        Self { layout }
    }

    pub fn run<S, V>(&self, scene: &S, reactor: &mut SceneReactor<V>) -> Result<StartupReport, StartupError>
    where
        S: SceneHost + ?Sized,
        V: ViewBackend,
    {
        if reactor.state() == ReactorState::Attached {
            return Err(StartupError::AlreadyAttached);
        }

        let mut report = StartupReport {
            planes: reactor
                .registry_mut()
                .set_all_scene_planes_visible_in_3d(true),
            ..StartupReport::default()
        };
        report.planes.log_failures("show_planes_in_3d", None);

        if let Some(volume_id) = first_volume(scene) {
            // Shares the ledger with the reactor, so this volume stays background
            // once notifications start flowing.
            report.startup_volume = Some(reactor.assign_volume(&volume_id));
        }

        match reactor.registry_mut().set_layout(self.layout) {
            Ok(previous) => {
                report.replaced_layout = previous;
                report.layout_applied = true;
            }
            Err(err) => warn!(layout = ?self.layout, error = %err, "startup layout skipped"),
        }

        info!(
            startup_volume = ?report.startup_volume,
            layout = ?self.layout,
            "startup view defaults applied"
        );
        Ok(report)
    }
}

/// First scalar volume in scene order, falling back to the first volume of any type.
fn first_volume<S: SceneHost + ?Sized>(scene: &S) -> Option<EntityId> {
    let ids = scene.entity_ids();
    let scalar = ids.iter().find(|id| {
        scene
            .entity(id)
            .is_some_and(|entity| entity.has_capability(Capability::ScalarVolume))
    });
    scalar
        .or_else(|| {
            ids.iter().find(|id| {
                scene
                    .entity(id)
                    .is_some_and(|entity| classify(entity) == EntityKind::Volume)
            })
        })
        .cloned()
}

#[cfg(test)]
#[path = "tests/sequencer_tests.rs"]
mod tests;
