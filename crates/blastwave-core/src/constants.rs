//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

// --- Propagation defaults ---

/// Default explosion damage.
pub const DEFAULT_DAMAGE: i32 = 150;

/// Default explosion radius (tiles).
pub const DEFAULT_RADIUS: f32 = 4.0;

/// Largest radius an event may request (tiles).
pub const MAX_RADIUS: f32 = 256.0;

/// Default shake distance multiplier (shake reaches `radius * this` tiles).
pub const DEFAULT_SHAKE_DISTANCE: f32 = 8.0;

/// Default damage floor widening the falloff denominator.
/// Keeps boundary cells of small explosions above zero damage.
pub const DEFAULT_MIN_DAMAGE: i32 = 2;

/// Longest an effect overlay stays on a cell (seconds, at the center).
pub const DEFAULT_MAX_EFFECT_DURATION: f32 = 0.25;

/// Shortest an effect overlay stays on a cell (seconds, at the edge).
pub const DEFAULT_MIN_EFFECT_DURATION: f32 = 0.05;

/// Unstable explosions miss their radius by up to this fraction.
pub const UNSTABLE_RADIUS_ERROR: f32 = 0.25;

/// Jagged shapes wobble their per-cell radius by up to this fraction.
pub const JAGGED_RADIUS_ERROR: f32 = 0.25;

// --- Feedback ---

/// Damage is divided by this to get camera shake intensity.
pub const SHAKE_DAMAGE_DIVISOR: i32 = 5;

// --- Atmosphere ---

/// Temperature (K) of the hotspot exposed on every unoccluded cell.
pub const EXPLOSION_HOTSPOT_TEMPERATURE: f32 = 1000.0;

// --- Occlusion ---

/// Ray sample spacing in tiles.
pub const OCCLUSION_SAMPLE_STEP: f32 = 0.25;

// --- Tile integrity ---

/// Integrity of a wall tile.
pub const WALL_INTEGRITY: f32 = 250.0;

/// Integrity of a window tile.
pub const WINDOW_INTEGRITY: f32 = 60.0;

/// Integrity of a door tile.
pub const DOOR_INTEGRITY: f32 = 200.0;

/// Integrity of a floor tile.
pub const FLOOR_INTEGRITY: f32 = 400.0;

// --- EMP ---

/// Seconds a device stays disabled per point of EMP strength.
pub const EMP_DISABLE_SECS_PER_STRENGTH: f32 = 0.1;
