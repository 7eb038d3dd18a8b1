/// Villain generation.  All randomness comes through the caller's RNG so a
/// seeded generator reproduces the same stream of villains.

use rand::Rng;

use crate::entities::{Villain, VillainKind};

pub const MIN_VILLAIN_SIZE: f32 = 45.0;
pub const MAX_VILLAIN_SIZE: f32 = 75.0;

/// Per-tick spawn probability at rate factor 1.0.
const SPAWN_SCALE: f64 = 0.025;
const MAX_RATE_FACTOR: f64 = 5.0;
const MAX_BASE_SPEED: f32 = 12.0;

// ── Difficulty curves ────────────────────────────────────────────────────────

/// Probability that a villain appears on a single tick at `level`.
pub fn spawn_chance(level: u32) -> f64 {
    let factor = (1.0 + level as f64 * 0.15).min(MAX_RATE_FACTOR);
    factor * SPAWN_SCALE
}

/// Fall speed before per-villain jitter.
pub fn base_speed(level: u32) -> f32 {
    (2.0 + level as f32 * 0.35).min(MAX_BASE_SPEED)
}

/// Upper bound of the random speed bonus added to `base_speed`.
pub fn speed_jitter(level: u32) -> f32 {
    level as f32 * 0.4
}

// ── Spawning ─────────────────────────────────────────────────────────────────

/// Build a villain just above the top edge, fully inside `[0, width]`.
pub fn spawn_villain(level: u32, width: f32, rng: &mut impl Rng) -> Villain {
    let size = rng.gen_range(MIN_VILLAIN_SIZE..=MAX_VILLAIN_SIZE);
    let half = size / 2.0;
    let x = if width > size {
        rng.gen_range(half..=width - half)
    } else {
        width / 2.0
    };
    let speed = base_speed(level) + rng.gen_range(0.0..=speed_jitter(level));
    let kind = if rng.gen_bool(0.5) {
        VillainKind::Spacecraft
    } else {
        VillainKind::Octopus
    };
    Villain {
        x,
        y: -half,
        size,
        speed,
        kind,
        eaten: false,
    }
}

/// Roll the per-tick spawn chance; on success return a new villain.
pub fn maybe_spawn(level: u32, width: f32, rng: &mut impl Rng) -> Option<Villain> {
    if rng.gen_bool(spawn_chance(level)) {
        Some(spawn_villain(level, width, rng))
    } else {
        None
    }
}
