// Hero progression constants

/// Raw XP granted by a unit instance, indexed by unit level 1-10 (slot 0 unused).
pub const RAW_XP_BY_UNIT_LEVEL: [f64; 11] = [
    0.0, 25.0, 40.0, 60.0, 85.0, 115.0, 150.0, 190.0, 235.0, 285.0, 340.0,
];

/// Cumulative effective XP needed to complete hero levels 1-5 (slot 0 is the origin).
pub const HERO_LEVEL_THRESHOLDS: [f64; 6] = [0.0, 200.0, 500.0, 900.0, 1400.0, 2000.0];

/// Fraction of raw XP converted to effective XP while at hero levels 1-5 (slot 0 unused).
pub const HERO_XP_GAIN: [f64; 6] = [0.0, 0.80, 0.70, 0.62, 0.55, 0.0];

pub const MAX_HERO_LEVEL: u32 = 5;
pub const MIN_UNIT_LEVEL: u32 = 1;
pub const MAX_UNIT_LEVEL: u32 = 10;

// Building constants
pub const MIN_MILITIA_COUNT: u8 = 1;
pub const MAX_MILITIA_COUNT: u8 = 8;

// Map display constants
/// Marker diameter in source-image pixels.
pub const MARKER_SIZE_PX: f64 = 30.0;
pub const DEFAULT_MAP_NAME: &str = "Concealed Hill";

// Front-end constants
pub const TICK_INTERVAL_MS: u64 = 100;
pub const LOG_PANE_LINES: usize = 200;
