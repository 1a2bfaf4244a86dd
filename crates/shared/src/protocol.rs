use serde::{Deserialize, Serialize};

use crate::domain::EntityId;

/// Notification delivered by the host scene, once per mutation, in mutation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum SceneEvent {
    EntityAdded { entity_id: EntityId },
}

impl SceneEvent {
    pub fn entity_id(&self) -> &EntityId {
        match self {
            SceneEvent::EntityAdded { entity_id } => entity_id,
        }
    }
}
