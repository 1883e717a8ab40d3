//! Entity registry backed by the hecs world.
//!
//! Capabilities are components: `Vitals` (living), `Integrity` (damageable),
//! `EmpReceiver` (EMP-affectable), `ItemStorage` (holds other entities).

use glam::IVec2;
use hecs::{Entity, World};

use crate::components::*;
use crate::constants::EMP_DISABLE_SECS_PER_STRENGTH;
use crate::enums::{AttackKind, Capability, DamageKind, ItemTrait};
use crate::services::EntityRegistry;

/// Nesting limit when resolving an item's outermost container.
const MAX_STORAGE_DEPTH: usize = 16;

fn has_capability(world: &World, entity: Entity, capability: Capability) -> bool {
    let Ok(entity_ref) = world.entity(entity) else {
        return false;
    };
    match capability {
        Capability::Living => entity_ref.has::<Vitals>(),
        Capability::Damageable => entity_ref.has::<Integrity>(),
        Capability::EmpAffectable => entity_ref.has::<EmpReceiver>(),
    }
}

/// Whether a placed entity covers `cell` with its position or footprint.
fn covers(world: &World, entity: Entity, cell: IVec2) -> bool {
    let Ok(pos) = world.get::<&GridPosition>(entity) else {
        return false;
    };
    if pos.0 == cell {
        return true;
    }
    world
        .get::<&Footprint>(entity)
        .is_ok_and(|footprint| footprint.offsets.iter().any(|&o| pos.0 + o == cell))
}

/// Outermost container holding `item`, or None if the chain is broken.
pub fn root_container(world: &World, item: Entity) -> Option<Entity> {
    let mut current = item;
    for _ in 0..MAX_STORAGE_DEPTH {
        match world.get::<&StoredIn>(current) {
            Ok(stored) => current = stored.container,
            Err(_) => return world.contains(current).then_some(current),
        }
    }
    None
}

impl EntityRegistry for World {
    fn entities_at(
        &self,
        cell: IVec2,
        capability: Capability,
        include_stored: bool,
    ) -> Vec<Entity> {
        let mut found: Vec<Entity> = Vec::new();

        for (entity, _pos) in self.query::<&GridPosition>().iter() {
            if covers(self, entity, cell) && has_capability(self, entity, capability) {
                found.push(entity);
            }
        }

        if include_stored {
            for (entity, _stored) in self.query::<&StoredIn>().iter() {
                let Some(root) = root_container(self, entity) else {
                    continue;
                };
                if covers(self, root, cell) && has_capability(self, entity, capability) {
                    found.push(entity);
                }
            }
        }

        // Distinct, first occurrence wins.
        let mut seen = std::collections::HashSet::new();
        found.retain(|e| seen.insert(*e));
        found
    }

    fn apply_damage(
        &mut self,
        entity: Entity,
        sink: Capability,
        amount: i32,
        _attack: AttackKind,
        damage: DamageKind,
    ) -> bool {
        let amount = amount as f32;
        match sink {
            Capability::Living => match self.get::<&mut Vitals>(entity) {
                Ok(mut vitals) => {
                    vitals.health -= amount;
                    match damage {
                        DamageKind::Brute => vitals.brute += amount,
                        DamageKind::Burn => vitals.burn += amount,
                    }
                    true
                }
                Err(_) => false,
            },
            Capability::Damageable => match self.get::<&mut Integrity>(entity) {
                Ok(mut integrity) => {
                    integrity.current -= amount;
                    true
                }
                Err(_) => false,
            },
            Capability::EmpAffectable => false,
        }
    }

    fn on_emp(&mut self, entity: Entity, strength: i32) -> bool {
        match self.get::<&mut EmpReceiver>(entity) {
            Ok(mut receiver) => {
                receiver.pulses += 1;
                receiver.last_strength = strength;
                let disable = strength.max(0) as f32 * EMP_DISABLE_SECS_PER_STRENGTH;
                receiver.disabled_secs = receiver.disabled_secs.max(disable);
                true
            }
            Err(_) => false,
        }
    }

    fn contained_items(&self, entity: Entity) -> Vec<Entity> {
        self.get::<&ItemStorage>(entity)
            .map(|storage| storage.slots.iter().flatten().copied().collect())
            .unwrap_or_default()
    }

    fn is_emp_resistant(&self, entity: Entity) -> bool {
        if self
            .get::<&Machine>(entity)
            .is_ok_and(|machine| machine.emp_resistant)
        {
            return true;
        }
        self.get::<&ItemAttributes>(entity)
            .is_ok_and(|attributes| attributes.traits.contains(&ItemTrait::EmpResistant))
    }
}
