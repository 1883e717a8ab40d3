//! EMP recovery system: disabled devices come back online as time passes.

use hecs::World;

use blastwave_core::components::EmpReceiver;

/// Count every device's outage down by `dt` seconds.
/// Returns how many devices came back online this tick.
pub fn run(world: &mut World, dt: f32) -> usize {
    let mut recovered = 0;
    for (_entity, receiver) in world.query_mut::<&mut EmpReceiver>() {
        if receiver.disabled_secs <= 0.0 {
            continue;
        }
        receiver.disabled_secs = (receiver.disabled_secs - dt).max(0.0);
        if receiver.disabled_secs == 0.0 {
            recovered += 1;
        }
    }
    recovered
}
