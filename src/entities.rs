/// All game entity types — pure data, no logic.

/// Side length of the hero's bounding square, in playfield units.
pub const HERO_SIZE: f32 = 80.0;

/// The hero sits at this fraction of the playfield height.
pub const HERO_Y_FRACTION: f32 = 0.85;

/// Normalized horizontal limits for the hero's centre.
pub const HERO_MIN_X: f32 = 0.08;
pub const HERO_MAX_X: f32 = 0.92;

pub const STARTING_LIVES: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VillainKind {
    Spacecraft,
    Octopus,
}

/// Playfield size in abstract units (not terminal cells).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

// ── Hero & villain ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hero {
    /// Normalized horizontal centre in [HERO_MIN_X, HERO_MAX_X].
    pub x: f32,
}

impl Default for Hero {
    fn default() -> Self {
        Self { x: 0.5 }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Villain {
    /// Centre, in playfield units.
    pub x: f32,
    pub y: f32,
    /// Side length of the bounding square.
    pub size: f32,
    /// Downward distance travelled per tick.
    pub speed: f32,
    pub kind: VillainKind,
    /// Set once the villain is caught or missed; it is removed the same tick.
    pub eaten: bool,
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Everything that lives for one round of play.  Cloneable so the
/// simulation step can hand back a fresh copy.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub hero: Hero,
    pub villains: Vec<Villain>,
    pub score: u32,
    pub level: u32,
    pub lives: u32,
    /// Villains eaten since the last level-up.
    pub eaten: u32,
    pub frame: u64,
    pub playfield: Playfield,
}
