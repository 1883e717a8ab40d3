//! Cleanup system: removes objects whose integrity ran out.

use hecs::{Entity, World};

use blastwave_core::components::{GridPosition, Integrity};
use blastwave_core::services::EntityRegistry;

use blastwave_core::registry::root_container;
use crate::world_setup;

/// Despawn destroyed objects. Whatever they held falls onto the cell of the
/// outermost container. Living things are never removed here.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) -> usize {
    despawn_buffer.clear();

    for (entity, integrity) in world.query_mut::<&Integrity>() {
        if integrity.current <= 0.0 {
            despawn_buffer.push(entity);
        }
    }

    for i in 0..despawn_buffer.len() {
        let entity = despawn_buffer[i];
        let drop_cell = root_container(world, entity)
            .and_then(|root| world.get::<&GridPosition>(root).ok().map(|pos| pos.0));

        for item in world.contained_items(entity) {
            if despawn_buffer.contains(&item) {
                continue;
            }
            match drop_cell {
                Some(cell) => world_setup::place_item(world, item, cell),
                None => {
                    world_setup::take_out(world, item);
                }
            }
        }
        world_setup::take_out(world, entity);
    }

    let removed = despawn_buffer.len();
    for entity in despawn_buffer.drain(..) {
        tracing::debug!(target: "blastwave::cleanup", entity = entity.to_bits().get(), "object.destroyed");
        let _ = world.despawn(entity);
    }
    removed
}
