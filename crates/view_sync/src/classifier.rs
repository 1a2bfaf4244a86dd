use shared::domain::{Capability, EntityKind};

use crate::host::SceneEntity;

/// Resolves an entity's kind from its capabilities, preferring
/// Volume over Segmentation over Markup.
pub fn classify(entity: &dyn SceneEntity) -> EntityKind {
    if is_volume(entity) {
        EntityKind::Volume
    } else if entity.has_capability(Capability::Segmentation) {
        EntityKind::Segmentation
    } else if entity.has_capability(Capability::Markups) {
        EntityKind::Markup
    } else {
        EntityKind::Other
    }
}

fn is_volume(entity: &dyn SceneEntity) -> bool {
    entity.has_capability(Capability::ScalarVolume) || entity.has_capability(Capability::Volume)
}

#[cfg(test)]
#[path = "tests/classifier_tests.rs"]
mod tests;
