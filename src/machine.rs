//! Game flow: loading → menu → playing → game over.
//!
//! `Game` owns the session and the RNG and is driven by a single loop: it
//! receives commands, hero positions, asset reports and clock ticks between
//! frames, and queues audio cues for the front end to drain.

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, info, warn};
use rand::Rng;

use crate::compute::{self, TickOutcome};
use crate::config::GameConfig;
use crate::entities::{Playfield, SessionState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Menu,
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Restart,
    GoToMenu,
}

/// Fire-and-forget audio triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    MenuMusic,
    GameMusic,
    EatSound,
    StopMusic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetId {
    Hero,
    Spacecraft,
    Octopus,
}

impl AssetId {
    pub const ALL: [AssetId; 3] = [AssetId::Hero, AssetId::Spacecraft, AssetId::Octopus];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetStatus {
    Pending,
    Loaded,
    Failed,
}

// ── Loading ──────────────────────────────────────────────────────────────────

/// Tracks asset reports and the safety timeout for the loading screen.
#[derive(Clone, Debug)]
pub struct LoadingTracker {
    statuses: HashMap<AssetId, AssetStatus>,
    elapsed: Duration,
    timeout: Duration,
}

impl LoadingTracker {
    pub fn new(required: &[AssetId], timeout: Duration) -> Self {
        Self {
            statuses: required
                .iter()
                .map(|&id| (id, AssetStatus::Pending))
                .collect(),
            elapsed: Duration::ZERO,
            timeout,
        }
    }

    pub fn report(&mut self, id: AssetId, status: AssetStatus) {
        if status == AssetStatus::Failed {
            warn!("asset {:?} failed to load, using fallback", id);
        }
        self.statuses.insert(id, status);
    }

    pub fn advance(&mut self, elapsed: Duration) {
        self.elapsed = self.elapsed.saturating_add(elapsed);
    }

    pub fn status(&self, id: AssetId) -> AssetStatus {
        self.statuses
            .get(&id)
            .copied()
            .unwrap_or(AssetStatus::Pending)
    }

    /// Every required asset loaded successfully.  Failures never count.
    pub fn all_loaded(&self) -> bool {
        self.statuses.values().all(|&s| s == AssetStatus::Loaded)
    }

    pub fn timed_out(&self) -> bool {
        self.elapsed >= self.timeout
    }

    pub fn is_done(&self) -> bool {
        self.all_loaded() || self.timed_out()
    }
}

/// What happened during one `Game::tick`; the new state is in `Game::session`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    pub eaten: u32,
    pub missed: u32,
    pub leveled_up: bool,
    pub game_over: bool,
}

// ── Game ─────────────────────────────────────────────────────────────────────

pub struct Game<R: Rng> {
    phase: Phase,
    session: SessionState,
    playfield: Playfield,
    loading: LoadingTracker,
    cues: Vec<Cue>,
    rng: R,
}

impl<R: Rng> Game<R> {
    pub fn new(config: &GameConfig, rng: R) -> Self {
        let playfield = config.playfield();
        Self {
            phase: Phase::Loading,
            session: compute::init_state(playfield),
            playfield,
            loading: LoadingTracker::new(&AssetId::ALL, config.loading_timeout()),
            cues: Vec::new(),
            rng,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn playfield(&self) -> Playfield {
        self.playfield
    }

    /// Whether the front end should draw `id` with its fallback glyphs.
    pub fn fallback(&self, id: AssetId) -> bool {
        self.loading.status(id) != AssetStatus::Loaded
    }

    // ── Loading ──────────────────────────────────────────────────────────────

    pub fn report_asset(&mut self, id: AssetId, status: AssetStatus) {
        self.loading.report(id, status);
        self.finish_loading_if_done();
    }

    pub fn advance_clock(&mut self, elapsed: Duration) {
        if self.phase != Phase::Loading {
            return;
        }
        self.loading.advance(elapsed);
        self.finish_loading_if_done();
    }

    fn finish_loading_if_done(&mut self) {
        if self.phase == Phase::Loading && self.loading.is_done() {
            if !self.loading.all_loaded() {
                info!("loading timed out, continuing with fallback visuals");
            }
            self.enter_menu();
        }
    }

    // ── Commands ─────────────────────────────────────────────────────────────

    /// Apply a player command.  Returns `false` when the command does not
    /// apply to the current phase; nothing changes in that case.
    pub fn command(&mut self, command: Command) -> bool {
        match (self.phase, command) {
            (Phase::Menu, Command::Start) | (Phase::GameOver, Command::Restart) => {
                self.start_session();
                true
            }
            (Phase::Playing | Phase::GameOver, Command::GoToMenu) => {
                self.session = compute::init_state(self.playfield);
                self.enter_menu();
                true
            }
            (phase, command) => {
                debug!("ignoring {:?} in {:?}", command, phase);
                false
            }
        }
    }

    /// Input between ticks: move the hero to normalized position `x`.
    pub fn set_hero_x(&mut self, x: f32) {
        if self.phase == Phase::Playing {
            self.session = compute::set_hero_x(&self.session, x);
        }
    }

    /// Run one simulation step if a session is in play.
    pub fn tick(&mut self) -> Option<TickReport> {
        if self.phase != Phase::Playing {
            return None;
        }
        let TickOutcome {
            state,
            eaten,
            missed,
            leveled_up,
            game_over,
        } = compute::tick(&self.session, &mut self.rng);
        self.session = state;
        self.cues
            .extend(std::iter::repeat(Cue::EatSound).take(eaten as usize));
        if game_over {
            self.transition(Phase::GameOver);
            self.cues.push(Cue::StopMusic);
        }
        Some(TickReport {
            eaten,
            missed,
            leveled_up,
            game_over,
        })
    }

    /// Take every cue queued since the last call, oldest first.
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    // ── Transitions ──────────────────────────────────────────────────────────

    fn start_session(&mut self) {
        self.session = compute::init_state(self.playfield);
        self.transition(Phase::Playing);
        self.cues.push(Cue::GameMusic);
    }

    fn enter_menu(&mut self) {
        self.transition(Phase::Menu);
        self.cues.push(Cue::MenuMusic);
    }

    fn transition(&mut self, to: Phase) {
        info!("phase {:?} -> {:?}", self.phase, to);
        self.phase = to;
    }
}
