//! Effect dispatch: applies one cell's worth of a propagation to whatever
//! occupies it.
//!
//! Dispatch functions are stateless. Deduplication lives in [`EventDedup`],
//! which the propagation owns and passes in for every cell.

use std::collections::HashSet;

use glam::IVec2;
use hecs::Entity;

use blastwave_core::enums::{AttackKind, Capability, DamageKind};
use blastwave_core::events::EffectEvent;
use blastwave_core::services::{EntityRegistry, TileService};

/// Entities already affected by one propagation, per category.
#[derive(Debug, Clone, Default)]
pub struct EventDedup {
    living: HashSet<Entity>,
    objects: HashSet<Entity>,
    pulsed: HashSet<Entity>,
}

impl EventDedup {
    /// Distinct entities that took damage or a pulse.
    pub fn affected(&self) -> usize {
        let mut all: HashSet<Entity> = self.living.clone();
        all.extend(&self.objects);
        all.extend(&self.pulsed);
        all.len()
    }
}

/// Bomb damage to one cell: living entities, then objects, then the tile.
///
/// Each living entity and each object is damaged at most once per event,
/// no matter how many of the event's cells it covers. The tile is always
/// damaged.
pub fn dispatch_normal<R, T>(
    registry: &mut R,
    tiles: &mut T,
    cell: IVec2,
    amount: i32,
    dedup: &mut EventDedup,
    propagation_id: u32,
    events: &mut Vec<EffectEvent>,
) where
    R: EntityRegistry + ?Sized,
    T: TileService + ?Sized,
{
    let living = registry.entities_at(cell, Capability::Living, false);
    for &entity in &living {
        if !dedup.living.insert(entity) {
            continue;
        }
        if registry.apply_damage(
            entity,
            Capability::Living,
            amount,
            AttackKind::Bomb,
            DamageKind::Burn,
        ) {
            events.push(EffectEvent::Damaged {
                propagation_id,
                entity: entity.to_bits().get(),
                amount,
                living: true,
            });
        }
    }

    for entity in registry.entities_at(cell, Capability::Damageable, false) {
        // Living things were handled above.
        if living.contains(&entity) || dedup.living.contains(&entity) {
            continue;
        }
        if !dedup.objects.insert(entity) {
            continue;
        }
        if registry.apply_damage(
            entity,
            Capability::Damageable,
            amount,
            AttackKind::Bomb,
            DamageKind::Burn,
        ) {
            events.push(EffectEvent::Damaged {
                propagation_id,
                entity: entity.to_bits().get(),
                amount,
                living: false,
            });
        }
    }

    tiles.apply_tile_damage(cell, amount, AttackKind::Bomb);
    events.push(EffectEvent::TileDamaged {
        propagation_id,
        cell,
        amount,
    });
}

/// EMP one cell: damageable entities first, then living ones, stored items included.
pub fn dispatch_emp<R>(
    registry: &mut R,
    cell: IVec2,
    strength: i32,
    dedup: &mut EventDedup,
    propagation_id: u32,
    events: &mut Vec<EffectEvent>,
) where
    R: EntityRegistry + ?Sized,
{
    let mut targets = registry.entities_at(cell, Capability::Damageable, true);
    for entity in registry.entities_at(cell, Capability::Living, true) {
        if !targets.contains(&entity) {
            targets.push(entity);
        }
    }

    for entity in targets {
        emp_recursive(registry, entity, strength, dedup, propagation_id, events);
    }
}

/// Pulse everything an entity carries, then the entity itself.
///
/// Resistance only shields the entity's own handler. Contents of a
/// resistant container are still visited and judged on their own.
fn emp_recursive<R>(
    registry: &mut R,
    entity: Entity,
    strength: i32,
    dedup: &mut EventDedup,
    propagation_id: u32,
    events: &mut Vec<EffectEvent>,
) where
    R: EntityRegistry + ?Sized,
{
    if !dedup.pulsed.insert(entity) {
        return;
    }

    for item in registry.contained_items(entity) {
        emp_recursive(registry, item, strength, dedup, propagation_id, events);
    }

    if registry.is_emp_resistant(entity) {
        return;
    }
    if registry.on_emp(entity, strength) {
        events.push(EffectEvent::Pulsed {
            propagation_id,
            entity: entity.to_bits().get(),
            strength,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use blastwave_core::enums::OverlayKind;
    use hecs::World;

    /// Registry double that records every call it receives.
    #[derive(Default)]
    struct RecordingRegistry {
        occupants: HashMap<IVec2, Vec<(Entity, Vec<Capability>)>>,
        storage: HashMap<Entity, Vec<Entity>>,
        resistant: HashSet<Entity>,
        gone: HashSet<Entity>,
        damage_calls: Vec<(Entity, Capability, i32)>,
        emp_calls: Vec<(Entity, i32)>,
    }

    impl RecordingRegistry {
        fn place(&mut self, cell: IVec2, entity: Entity, caps: &[Capability]) {
            self.occupants
                .entry(cell)
                .or_default()
                .push((entity, caps.to_vec()));
        }
    }

    impl EntityRegistry for RecordingRegistry {
        fn entities_at(&self, cell: IVec2, capability: Capability, include_stored: bool) -> Vec<Entity> {
            let mut out = Vec::new();
            for (entity, caps) in self.occupants.get(&cell).into_iter().flatten() {
                if caps.contains(&capability) {
                    out.push(*entity);
                }
                if include_stored {
                    for item in self.storage.get(entity).into_iter().flatten() {
                        if !out.contains(item) {
                            out.push(*item);
                        }
                    }
                }
            }
            out
        }

        fn apply_damage(
            &mut self,
            entity: Entity,
            sink: Capability,
            amount: i32,
            _attack: AttackKind,
            _damage: DamageKind,
        ) -> bool {
            self.damage_calls.push((entity, sink, amount));
            !self.gone.contains(&entity)
        }

        fn on_emp(&mut self, entity: Entity, strength: i32) -> bool {
            self.emp_calls.push((entity, strength));
            !self.gone.contains(&entity)
        }

        fn contained_items(&self, entity: Entity) -> Vec<Entity> {
            self.storage.get(&entity).cloned().unwrap_or_default()
        }

        fn is_emp_resistant(&self, entity: Entity) -> bool {
            self.resistant.contains(&entity)
        }
    }

    #[derive(Default)]
    struct RecordingTiles {
        damaged: Vec<(IVec2, i32)>,
    }

    impl TileService for RecordingTiles {
        fn contains(&self, _cell: IVec2) -> bool {
            true
        }
        fn has_overlay(&self, _cell: IVec2, _kind: OverlayKind) -> bool {
            false
        }
        fn add_overlay(&mut self, _cell: IVec2, _kind: OverlayKind) {}
        fn remove_overlays_of_kind(&mut self, _cell: IVec2, _kind: OverlayKind) {}
        fn apply_tile_damage(&mut self, cell: IVec2, amount: i32, _attack: AttackKind) {
            self.damaged.push((cell, amount));
        }
        fn heat_atmosphere(&mut self, _cell: IVec2, _temperature: f32) {}
    }

    fn handles(n: usize) -> Vec<Entity> {
        let mut world = World::new();
        (0..n).map(|_| world.spawn(())).collect()
    }

    #[test]
    fn test_normal_order_living_objects_tile() {
        let h = handles(2);
        let (crew, crate_) = (h[0], h[1]);
        let cell = IVec2::new(1, 1);
        let mut registry = RecordingRegistry::default();
        registry.place(cell, crew, &[Capability::Living]);
        registry.place(cell, crate_, &[Capability::Damageable]);
        let mut tiles = RecordingTiles::default();
        let mut dedup = EventDedup::default();
        let mut events = Vec::new();

        dispatch_normal(&mut registry, &mut tiles, cell, 40, &mut dedup, 1, &mut events);

        assert_eq!(
            registry.damage_calls,
            vec![(crew, Capability::Living, 40), (crate_, Capability::Damageable, 40)]
        );
        assert_eq!(tiles.damaged, vec![(cell, 40)]);
        assert!(matches!(events[0], EffectEvent::Damaged { living: true, .. }));
        assert!(matches!(events[1], EffectEvent::Damaged { living: false, .. }));
        assert!(matches!(events[2], EffectEvent::TileDamaged { amount: 40, .. }));
    }

    #[test]
    fn test_multi_cell_entity_damaged_once_per_event() {
        let h = handles(1);
        let mech = h[0];
        let mut registry = RecordingRegistry::default();
        for cell in [IVec2::ZERO, IVec2::X, IVec2::Y] {
            registry.place(cell, mech, &[Capability::Damageable]);
        }
        let mut tiles = RecordingTiles::default();
        let mut dedup = EventDedup::default();
        let mut events = Vec::new();

        for (cell, amount) in [(IVec2::ZERO, 150), (IVec2::X, 120), (IVec2::Y, 120)] {
            dispatch_normal(&mut registry, &mut tiles, cell, amount, &mut dedup, 1, &mut events);
        }

        // First application wins.
        assert_eq!(registry.damage_calls, vec![(mech, Capability::Damageable, 150)]);
        assert_eq!(tiles.damaged.len(), 3);
        assert_eq!(dedup.affected(), 1);
    }

    #[test]
    fn test_living_damageable_entity_only_hit_as_living() {
        let h = handles(1);
        let borg = h[0];
        let mut registry = RecordingRegistry::default();
        registry.place(IVec2::ZERO, borg, &[Capability::Living, Capability::Damageable]);
        let mut tiles = RecordingTiles::default();
        let mut dedup = EventDedup::default();
        let mut events = Vec::new();

        dispatch_normal(&mut registry, &mut tiles, IVec2::ZERO, 10, &mut dedup, 1, &mut events);

        assert_eq!(registry.damage_calls, vec![(borg, Capability::Living, 10)]);
    }

    #[test]
    fn test_fresh_dedup_damages_again() {
        let h = handles(1);
        let mut registry = RecordingRegistry::default();
        registry.place(IVec2::ZERO, h[0], &[Capability::Living]);
        let mut tiles = RecordingTiles::default();
        let mut events = Vec::new();

        dispatch_normal(&mut registry, &mut tiles, IVec2::ZERO, 10, &mut EventDedup::default(), 1, &mut events);
        dispatch_normal(&mut registry, &mut tiles, IVec2::ZERO, 10, &mut EventDedup::default(), 2, &mut events);

        assert_eq!(registry.damage_calls.len(), 2);
    }

    #[test]
    fn test_stale_entity_is_skipped_without_event() {
        let h = handles(1);
        let mut registry = RecordingRegistry::default();
        registry.place(IVec2::ZERO, h[0], &[Capability::Living]);
        registry.gone.insert(h[0]);
        let mut tiles = RecordingTiles::default();
        let mut events = Vec::new();

        dispatch_normal(&mut registry, &mut tiles, IVec2::ZERO, 10, &mut EventDedup::default(), 1, &mut events);

        assert_eq!(registry.damage_calls.len(), 1);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], EffectEvent::TileDamaged { .. }));
    }

    #[test]
    fn test_emp_container_with_items_pulses_each_once() {
        let n = 3;
        let h = handles(n + 1);
        let locker = h[0];
        let items = h[1..].to_vec();
        let mut registry = RecordingRegistry::default();
        registry.place(IVec2::ZERO, locker, &[Capability::Damageable]);
        registry.storage.insert(locker, items.clone());
        let mut dedup = EventDedup::default();
        let mut events = Vec::new();

        dispatch_emp(&mut registry, IVec2::ZERO, 77, &mut dedup, 1, &mut events);

        assert_eq!(registry.emp_calls.len(), n + 1);
        assert!(registry.emp_calls.iter().all(|&(_, s)| s == 77));
        // Contents go first, the container last.
        assert_eq!(registry.emp_calls.last(), Some(&(locker, 77)));
        for item in items {
            assert!(registry.emp_calls.contains(&(item, 77)));
        }
    }

    #[test]
    fn test_emp_resistant_container_still_exposes_contents() {
        let h = handles(3);
        let (locker, radio, hardened) = (h[0], h[1], h[2]);
        let mut registry = RecordingRegistry::default();
        registry.place(IVec2::ZERO, locker, &[Capability::Damageable]);
        registry.storage.insert(locker, vec![radio, hardened]);
        registry.resistant.insert(locker);
        registry.resistant.insert(hardened);
        let mut events = Vec::new();

        dispatch_emp(&mut registry, IVec2::ZERO, 50, &mut EventDedup::default(), 1, &mut events);

        assert_eq!(registry.emp_calls, vec![(radio, 50)]);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_emp_nested_storage_recurses() {
        let h = handles(3);
        let (locker, bag, radio) = (h[0], h[1], h[2]);
        let mut registry = RecordingRegistry::default();
        registry.place(IVec2::ZERO, locker, &[Capability::Damageable]);
        registry.storage.insert(locker, vec![bag]);
        registry.storage.insert(bag, vec![radio]);

        dispatch_emp(&mut registry, IVec2::ZERO, 20, &mut EventDedup::default(), 1, &mut Vec::new());

        assert_eq!(registry.emp_calls, vec![(radio, 20), (bag, 20), (locker, 20)]);
    }

    #[test]
    fn test_emp_once_per_event_across_cells() {
        let h = handles(2);
        let (console, crew) = (h[0], h[1]);
        let mut registry = RecordingRegistry::default();
        for cell in [IVec2::ZERO, IVec2::X] {
            registry.place(cell, console, &[Capability::Damageable]);
        }
        registry.place(IVec2::X, crew, &[Capability::Living]);
        let mut dedup = EventDedup::default();
        let mut events = Vec::new();

        dispatch_emp(&mut registry, IVec2::ZERO, 100, &mut dedup, 1, &mut events);
        dispatch_emp(&mut registry, IVec2::X, 80, &mut dedup, 1, &mut events);

        assert_eq!(registry.emp_calls, vec![(console, 100), (crew, 80)]);
    }
}
