//! Entity spawn factories for populating a station.
//!
//! Creates crew, machines, containers and items with
//! appropriate component bundles.

use glam::IVec2;
use hecs::{Entity, World};

use blastwave_core::components::*;
use blastwave_core::enums::ItemTrait;

/// Integrity of a storage locker.
const LOCKER_INTEGRITY: f32 = 150.0;
/// Integrity of a carried bag.
const BAG_INTEGRITY: f32 = 40.0;
/// Integrity of a loose handheld item.
const ITEM_INTEGRITY: f32 = 25.0;
/// Slots in a locker or bag.
const STORAGE_SLOTS: usize = 8;

/// Spawn a crew member standing on `cell`.
pub fn spawn_crew(world: &mut World, cell: IVec2, health: f32) -> Entity {
    world.spawn((
        GridPosition(cell),
        Vitals {
            health,
            max_health: health,
            brute: 0.0,
            burn: 0.0,
        },
    ))
}

/// Spawn a powered machine (console, APC, vending machine) on `cell`.
pub fn spawn_machine(world: &mut World, cell: IVec2, integrity: f32, emp_resistant: bool) -> Entity {
    world.spawn((
        GridPosition(cell),
        Integrity {
            current: integrity,
            max: integrity,
        },
        EmpReceiver::default(),
        Machine { emp_resistant },
    ))
}

/// Spawn an empty locker on `cell`.
pub fn spawn_locker(world: &mut World, cell: IVec2) -> Entity {
    world.spawn((
        GridPosition(cell),
        Integrity {
            current: LOCKER_INTEGRITY,
            max: LOCKER_INTEGRITY,
        },
        ItemStorage {
            slots: vec![None; STORAGE_SLOTS],
        },
    ))
}

/// Spawn an empty bag, not yet placed anywhere.
pub fn spawn_bag(world: &mut World) -> Entity {
    world.spawn((
        Integrity {
            current: BAG_INTEGRITY,
            max: BAG_INTEGRITY,
        },
        ItemStorage {
            slots: vec![None; STORAGE_SLOTS],
        },
        ItemAttributes {
            name: "bag".to_string(),
            traits: Vec::new(),
        },
    ))
}

/// Spawn an electronic handheld item, not yet placed anywhere.
pub fn spawn_item(world: &mut World, name: &str, traits: Vec<ItemTrait>) -> Entity {
    world.spawn((
        Integrity {
            current: ITEM_INTEGRITY,
            max: ITEM_INTEGRITY,
        },
        EmpReceiver::default(),
        ItemAttributes {
            name: name.to_string(),
            traits,
        },
    ))
}

/// Put `item` into the first free slot of `container`.
///
/// The item loses any grid position it had. Returns false if the container
/// is gone, has no storage, or is full.
pub fn store_item(world: &mut World, container: Entity, item: Entity) -> bool {
    if container == item || !world.contains(item) {
        return false;
    }
    {
        let Ok(mut storage) = world.get::<&mut ItemStorage>(container) else {
            return false;
        };
        let Some(slot) = storage.slots.iter_mut().find(|slot| slot.is_none()) else {
            return false;
        };
        *slot = Some(item);
    }
    let _ = world.remove_one::<GridPosition>(item);
    world.insert_one(item, StoredIn { container }).is_ok()
}

/// Take `item` out of its container. Returns the container it was in.
pub fn take_out(world: &mut World, item: Entity) -> Option<Entity> {
    let stored = world.remove_one::<StoredIn>(item).ok()?;
    if let Ok(mut storage) = world.get::<&mut ItemStorage>(stored.container) {
        for slot in storage.slots.iter_mut() {
            if *slot == Some(item) {
                *slot = None;
            }
        }
    }
    Some(stored.container)
}

/// Drop `item` out of whatever holds it onto `cell`.
pub fn place_item(world: &mut World, item: Entity, cell: IVec2) {
    take_out(world, item);
    let _ = world.insert_one(item, GridPosition(cell));
}

/// A small test station: two crew, a console, and a locker with a radio.
pub fn setup_demo_station(world: &mut World, center: IVec2) -> Vec<Entity> {
    let crew_a = spawn_crew(world, center + IVec2::new(1, 0), 100.0);
    let crew_b = spawn_crew(world, center + IVec2::new(-2, 1), 100.0);
    let console = spawn_machine(world, center + IVec2::new(0, 2), 200.0, false);
    let locker = spawn_locker(world, center + IVec2::new(2, -1));
    let radio = spawn_item(world, "radio", Vec::new());
    store_item(world, locker, radio);
    vec![crew_a, crew_b, console, locker, radio]
}
