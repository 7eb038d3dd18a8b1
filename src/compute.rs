/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `SessionState` (and, where needed, an RNG handle) and returns a brand-new
/// value.  Side effects are limited to the injected RNG.

use log::{debug, info};
use rand::Rng;

use crate::entities::{
    Hero, Playfield, SessionState, Villain, HERO_MAX_X, HERO_MIN_X, HERO_SIZE, HERO_Y_FRACTION,
    STARTING_LIVES,
};
use crate::spawner::maybe_spawn;

/// Villains whose centre drifts this far below the bottom edge are dropped
/// regardless of their `eaten` flag.
pub const CLEANUP_MARGIN: f32 = 100.0;

// ── Rules ────────────────────────────────────────────────────────────────────

/// Villains that must be eaten at `level` to reach the next one.
pub fn eats_needed(level: u32) -> u32 {
    10 + level.saturating_sub(1) * 2
}

/// Score for one villain eaten at `level`.
pub fn score_for(level: u32) -> u32 {
    level * 10
}

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Axis-aligned square given by its centre and side length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Square {
    pub cx: f32,
    pub cy: f32,
    pub side: f32,
}

impl Square {
    pub fn of_villain(v: &Villain) -> Self {
        Self {
            cx: v.x,
            cy: v.y,
            side: v.size,
        }
    }

    /// True when the interiors intersect; squares that only share an edge
    /// or a corner do not overlap.
    pub fn overlaps(&self, other: &Square) -> bool {
        let reach = (self.side + other.side) / 2.0;
        (self.cx - other.cx).abs() < reach && (self.cy - other.cy).abs() < reach
    }
}

/// The hero's bounding square in playfield units.
pub fn hero_square(state: &SessionState) -> Square {
    Square {
        cx: state.hero.x * state.playfield.width,
        cy: state.playfield.height * HERO_Y_FRACTION,
        side: HERO_SIZE,
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Fresh session: score 0, level 1, full lives, hero centred, no villains.
pub fn init_state(playfield: Playfield) -> SessionState {
    SessionState {
        hero: Hero::default(),
        villains: Vec::new(),
        score: 0,
        level: 1,
        lives: STARTING_LIVES,
        eaten: 0,
        frame: 0,
        playfield,
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Move the hero to normalized position `x`, clamped to the allowed band.
/// A NaN command leaves the hero where it is.
pub fn set_hero_x(state: &SessionState, x: f32) -> SessionState {
    if x.is_nan() {
        return state.clone();
    }
    SessionState {
        hero: Hero {
            x: x.clamp(HERO_MIN_X, HERO_MAX_X),
        },
        ..state.clone()
    }
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Result of one simulation step.
#[derive(Clone, Debug)]
pub struct TickOutcome {
    pub state: SessionState,
    /// Villains caught this tick; each one is an eat sound.
    pub eaten: u32,
    /// Villains that fell past the bottom this tick.
    pub missed: u32,
    pub leveled_up: bool,
    /// Lives reached zero on this tick.
    pub game_over: bool,
}

/// Advance the session by one fixed tick.
///
/// Order: spawn, advance, catch, miss, clean up.  Catches are resolved
/// before misses, so a villain that is both caught and past the bottom on
/// the same tick counts as caught.  At most one level-up happens per tick;
/// surplus eats carry over, capped one below the next threshold.
pub fn tick(state: &SessionState, rng: &mut impl Rng) -> TickOutcome {
    let Playfield { width, height } = state.playfield;
    let mut next = SessionState {
        frame: state.frame + 1,
        ..state.clone()
    };

    // ── 1. Spawn ─────────────────────────────────────────────────────────────
    if let Some(villain) = maybe_spawn(next.level, width, rng) {
        next.villains.push(villain);
    }

    // ── 2. Advance ───────────────────────────────────────────────────────────
    for villain in &mut next.villains {
        villain.y += villain.speed;
    }

    // ── 3. Catches ───────────────────────────────────────────────────────────
    let hero = hero_square(&next);
    let mut eaten = 0;
    let mut leveled_up = false;
    for villain in next.villains.iter_mut().filter(|v| !v.eaten) {
        if !hero.overlaps(&Square::of_villain(villain)) {
            continue;
        }
        villain.eaten = true;
        next.score += score_for(next.level);
        next.eaten += 1;
        eaten += 1;

        if !leveled_up && next.eaten >= eats_needed(next.level) {
            next.level += 1;
            next.eaten = 0;
            leveled_up = true;
            info!("level up: level={} score={}", next.level, next.score);
        } else if leveled_up {
            // Carry stops one short of the threshold; the next eat levels up.
            next.eaten = next.eaten.min(eats_needed(next.level) - 1);
        }
    }

    // ── 4. Misses ────────────────────────────────────────────────────────────
    let mut missed = 0;
    let mut game_over = false;
    for villain in next.villains.iter_mut().filter(|v| !v.eaten) {
        if villain.y - villain.size / 2.0 <= height {
            continue;
        }
        villain.eaten = true;
        next.lives = next.lives.saturating_sub(1);
        missed += 1;
        debug!("villain missed at x={:.1}, lives={}", villain.x, next.lives);

        if next.lives == 0 {
            game_over = true;
            break;
        }
    }

    // ── 5. Clean up ──────────────────────────────────────────────────────────
    next.villains.retain(|v| !v.eaten && v.y - height <= CLEANUP_MARGIN);

    if game_over {
        info!(
            "game over: score={} level={} frame={}",
            next.score, next.level, next.frame
        );
    }

    TickOutcome {
        state: next,
        eaten,
        missed,
        leveled_up,
        game_over,
    }
}
