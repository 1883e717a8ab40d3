//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Capability logic lives in the registry and systems, not components.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::enums::ItemTrait;
use crate::types::EntityHandle;

/// Cell an entity stands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPosition(pub IVec2);

/// Extra cells covered by a multi-tile entity, relative to its `GridPosition`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Footprint {
    pub offsets: Vec<IVec2>,
}

/// Health of a living thing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vitals {
    pub health: f32,
    pub max_health: f32,
    /// Accumulated brute damage.
    pub brute: f32,
    /// Accumulated burn damage.
    pub burn: f32,
}

/// Structural integrity of a non-living object.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Integrity {
    pub current: f32,
    pub max: f32,
}

/// Electronics that react to an EMP.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EmpReceiver {
    /// Number of pulses received over the entity's lifetime.
    pub pulses: u32,
    /// Strength of the most recent pulse.
    pub last_strength: i32,
    /// Seconds until the device works again (0 = operational).
    pub disabled_secs: f32,
}

/// Slots holding other entities (backpacks, lockers, crates).
#[derive(Debug, Clone, Default)]
pub struct ItemStorage {
    pub slots: Vec<Option<EntityHandle>>,
}

/// Marks an item as sitting inside a storage container.
#[derive(Debug, Clone, Copy)]
pub struct StoredIn {
    pub container: EntityHandle,
}

/// Powered machinery.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Machine {
    pub emp_resistant: bool,
}

/// Item metadata carried by pick-up-able things.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemAttributes {
    pub name: String,
    pub traits: Vec<ItemTrait>,
}
