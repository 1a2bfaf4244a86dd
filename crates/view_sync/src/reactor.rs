//! Scene event reactor: gives every new entity its default place in the views.

use shared::{
    domain::{DisplayRole, EntityId, EntityKind},
    error::SceneError,
    protocol::SceneEvent,
};
use tracing::{debug, info, warn};

use crate::{
    classifier::classify,
    host::{SceneHost, Subscription, ViewBackend},
    ledger::AssignmentLedger,
    registry::{FanOutReport, ViewRegistry, DEFAULT_FOREGROUND_OPACITY},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactorState {
    Detached,
    Attached,
}

/// What handling one notification did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    Background(EntityId),
    Foreground(EntityId),
    AlreadyAssigned(EntityId),
    SegmentationShown(EntityId),
    MarkupShown(EntityId),
    /// Not a kind the policy acts on.
    Ignored(EntityId),
    /// The entity could not be inspected or updated.
    Skipped(EntityId),
    /// Delivered while detached.
    Dropped,
}

pub struct SceneReactor<V> {
    registry: ViewRegistry<V>,
    ledger: AssignmentLedger,
    subscription: Option<Subscription>,
    foreground_opacity: f64,
}

impl<V: ViewBackend> SceneReactor<V> {
    pub fn new(backend: V) -> Self {
        Self {
            registry: ViewRegistry::new(backend),
            ledger: AssignmentLedger::new(),
            subscription: None,
            foreground_opacity: DEFAULT_FOREGROUND_OPACITY,
        }
    }

    pub fn with_foreground_opacity(mut self, opacity: f64) -> Self {
        self.foreground_opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn state(&self) -> ReactorState {
        if self.subscription.is_some() {
            ReactorState::Attached
        } else {
            ReactorState::Detached
        }
    }

    pub fn ledger(&self) -> &AssignmentLedger {
        &self.ledger
    }

    pub fn registry(&self) -> &ViewRegistry<V> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ViewRegistry<V> {
        &mut self.registry
    }

    pub fn attach<S: SceneHost + ?Sized>(&mut self, scene: &mut S) {
        if self.subscription.is_some() {
            debug!("reactor already attached");
            return;
        }
        self.subscription = Some(scene.subscribe());
        info!(
            assigned = self.ledger.len(),
            "reactor attached to scene notifications"
        );
    }

    /// Stops listening and discards the session's ledger. Safe to call when detached.
    pub fn detach(&mut self) {
        if self.subscription.take().is_some() {
            self.ledger = AssignmentLedger::new();
            info!("reactor detached from scene notifications");
        }
    }

    /// Handles every notification queued since the last call, in delivery order.
    pub fn process_pending<S: SceneHost + ?Sized>(&mut self, scene: &mut S) -> Vec<Reaction> {
        let mut reactions = Vec::new();
        loop {
            let Some(event) = self.next_event() else {
                break;
            };
            reactions.push(self.handle_event(scene, &event));
        }
        reactions
    }

    fn next_event(&self) -> Option<SceneEvent> {
        self.subscription.as_ref().and_then(Subscription::try_next)
    }

    pub fn handle_event<S: SceneHost + ?Sized>(&mut self, scene: &mut S, event: &SceneEvent) -> Reaction {
        if self.state() == ReactorState::Detached {
            debug!(entity = %event.entity_id(), "notification dropped while detached");
            return Reaction::Dropped;
        }
        match event {
            SceneEvent::EntityAdded { entity_id } => self.on_entity_added(scene, entity_id),
        }
    }

    fn on_entity_added<S: SceneHost + ?Sized>(&mut self, scene: &mut S, entity_id: &EntityId) -> Reaction {
        let Some(entity) = scene.entity(entity_id) else {
            warn!(entity = %entity_id, "added entity is no longer in the scene");
            return Reaction::Skipped(entity_id.clone());
        };
        let kind = classify(entity);
        debug!(entity = %entity_id, ?kind, "classified new entity");

        match kind {
            EntityKind::Volume => self.assign_volume(entity_id),
            EntityKind::Segmentation => match show_segmentation(scene, entity_id) {
                Ok(()) => Reaction::SegmentationShown(entity_id.clone()),
                Err(err) => skip(entity_id, err),
            },
            EntityKind::Markup => match show_markup(scene, entity_id) {
                Ok(()) => Reaction::MarkupShown(entity_id.clone()),
                Err(err) => skip(entity_id, err),
            },
            EntityKind::Other => Reaction::Ignored(entity_id.clone()),
        }
    }

    pub(crate) fn assign_volume(&mut self, entity_id: &EntityId) -> Reaction {
        match self.ledger.decide_volume_role(entity_id) {
            DisplayRole::Background => {
                self.show_as_background(entity_id);
                Reaction::Background(entity_id.clone())
            }
            DisplayRole::Foreground => {
                self.show_as_foreground(entity_id);
                Reaction::Foreground(entity_id.clone())
            }
            DisplayRole::Unassigned => {
                debug!(entity = %entity_id, "volume already has a role");
                Reaction::AlreadyAssigned(entity_id.clone())
            }
        }
    }

    fn show_as_background(&mut self, entity_id: &EntityId) {
        let mut report = self.registry.set_background_everywhere(entity_id);
        report.merge(self.registry.set_planes_visible_in_3d(true));
        report.log_failures("show_background", Some(entity_id));
        if let Err(err) = self.registry.reset_camera() {
            warn!(entity = %entity_id, error = %err, "3-D camera reset skipped");
        }
        info!(entity = %entity_id, surfaces = report.applied.len(), "volume shown as background");
    }

    fn show_as_foreground(&mut self, entity_id: &EntityId) {
        let report: FanOutReport = self
            .registry
            .set_foreground_everywhere(entity_id, self.foreground_opacity);
        report.log_failures("show_foreground", Some(entity_id));
        info!(
            entity = %entity_id,
            opacity = self.foreground_opacity,
            surfaces = report.applied.len(),
            "volume shown as foreground overlay"
        );
    }
}

fn show_segmentation<S: SceneHost + ?Sized>(scene: &mut S, entity_id: &EntityId) -> Result<(), SceneError> {
    scene.display_properties_mut(entity_id)?.show_everywhere();
    Ok(())
}

fn show_markup<S: SceneHost + ?Sized>(scene: &mut S, entity_id: &EntityId) -> Result<(), SceneError> {
    scene.display_properties_mut(entity_id)?.visible = true;
    Ok(())
}

fn skip(entity_id: &EntityId, err: SceneError) -> Reaction {
    warn!(entity = %entity_id, error = %err, "display defaults skipped");
    Reaction::Skipped(entity_id.clone())
}

#[cfg(test)]
#[path = "tests/reactor_tests.rs"]
mod tests;
