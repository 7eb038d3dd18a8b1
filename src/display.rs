/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game.  No game logic is performed; this module only translates state
/// into terminal commands, scaling playfield units to character cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use catch_game::compute::eats_needed;
use catch_game::entities::{SessionState, Villain, VillainKind, HERO_Y_FRACTION};
use catch_game::machine::{AssetId, Phase};

use crate::assets::Sprites;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LEVEL: Color = Color::Green;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_PROGRESS: Color = Color::Cyan;
const C_HERO: Color = Color::White;
const C_VILLAIN_SPACECRAFT: Color = Color::Green;
const C_VILLAIN_OCTOPUS: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;

/// Everything the renderer needs for one frame.
pub struct View<'a> {
    pub phase: Phase,
    pub session: &'a SessionState,
    pub sprites: &'a Sprites,
    /// Per-asset fallback flags, in `AssetId::ALL` order.
    pub fallback: [bool; 3],
    pub best: u32,
    pub cols: u16,
    pub rows: u16,
}

impl View<'_> {
    fn sprite(&self, id: AssetId) -> &str {
        let i = AssetId::ALL.iter().position(|&a| a == id).unwrap_or(0);
        self.sprites.get(id, self.fallback[i])
    }

    fn inner_cols(&self) -> f32 {
        self.cols.saturating_sub(2).max(1) as f32
    }

    fn inner_rows(&self) -> f32 {
        self.rows.saturating_sub(4).max(1) as f32
    }

    /// Playfield x (units) → terminal column.
    fn col(&self, x: f32) -> i32 {
        1 + (x / self.session.playfield.width * self.inner_cols()) as i32
    }

    /// Playfield y (units) → terminal row; rows 2 .. rows-3 are the play area.
    fn row(&self, y: f32) -> i32 {
        2 + (y / self.session.playfield.height * self.inner_rows()).floor() as i32
    }
}

/// Terminal column → normalized hero position.
pub fn column_to_x(column: u16, cols: u16) -> f32 {
    let inner = cols.saturating_sub(2).max(1) as f32;
    (column as f32 - 1.0) / inner
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, view: &View) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    match view.phase {
        Phase::Loading => draw_loading(out, view)?,
        Phase::Menu => draw_menu(out, view)?,
        Phase::Playing | Phase::GameOver => {
            draw_border(out, view)?;
            draw_hud(out, view)?;
            for villain in &view.session.villains {
                draw_villain(out, view, villain)?;
            }
            draw_hero(out, view)?;
            draw_controls_hint(out, view)?;
            if view.phase == Phase::GameOver {
                draw_game_over(out, view)?;
            }
        }
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn print_centered<W: Write>(
    out: &mut W,
    view: &View,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = (view.cols / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

// ── Loading & menu ────────────────────────────────────────────────────────────

fn draw_loading<W: Write>(out: &mut W, view: &View) -> std::io::Result<()> {
    let cy = view.rows / 2;
    print_centered(out, view, cy.saturating_sub(1), "Loading...", Color::Cyan)?;
    let ready = view.fallback.iter().filter(|&&f| !f).count();
    let line = format!("sprites {}/{}", ready, view.fallback.len());
    print_centered(out, view, cy + 1, &line, C_HINT)?;
    Ok(())
}

fn draw_menu<W: Write>(out: &mut W, view: &View) -> std::io::Result<()> {
    let cy = view.rows / 2;

    print_centered(out, view, cy.saturating_sub(5), "★  CATCH  THEM  ALL  ★", Color::Cyan)?;
    if view.best > 0 {
        let best = format!("Best Score: {}", view.best);
        print_centered(out, view, cy.saturating_sub(4), &best, Color::Yellow)?;
    }

    let legend = format!(
        "Catch {} and {} before they hit the ground",
        view.sprite(AssetId::Spacecraft),
        view.sprite(AssetId::Octopus)
    );
    print_centered(out, view, cy.saturating_sub(1), &legend, Color::White)?;
    print_centered(out, view, cy, "Three misses and it's over.", C_HINT)?;

    print_centered(out, view, cy + 3, "ENTER : Start   Q : Quit", Color::White)?;
    print_centered(
        out,
        view,
        cy + 5,
        "← → / A D : Move   Mouse drag : Move   M : Menu",
        C_HINT,
    )?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &View) -> std::io::Result<()> {
    let w = view.cols as usize;
    let h = view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1 — top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2 — bottom bar
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, view: &View) -> std::io::Result<()> {
    let s = view.session;

    // Score and best — left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    if view.best > 0 {
        out.queue(Print(format!("Score:{:>6}  Hi:{:>6}", s.score, view.best.max(s.score))))?;
    } else {
        out.queue(Print(format!("Score:{:>6}", s.score)))?;
    }

    // Level and progress — centre
    let level_str = format!("[ LEVEL {} ]", s.level);
    let progress = format!(" {}/{}", s.eaten, eats_needed(s.level));
    let width = (level_str.len() + progress.len()) as u16;
    out.queue(cursor::MoveTo((view.cols / 2).saturating_sub(width / 2), 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(&level_str))?;
    out.queue(style::SetForegroundColor(C_HUD_PROGRESS))?;
    out.queue(Print(&progress))?;

    // Lives — right
    let lives_str = format!("Lives:{}", "♥".repeat(s.lives as usize));
    let rx = view
        .cols
        .saturating_sub(lives_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// Print `sprite` centred on `(col, row)` if that row is inside the play area.
fn draw_sprite<W: Write>(
    out: &mut W,
    view: &View,
    col: i32,
    row: i32,
    sprite: &str,
    color: Color,
) -> std::io::Result<()> {
    let play_bottom = view.rows as i32 - 2; // bottom border row
    if row < 2 || row >= play_bottom {
        return Ok(());
    }
    let half = sprite.chars().count() as i32 / 2;
    let max_col = (view.cols as i32 - 1 - sprite.chars().count() as i32).max(1);
    let lx = (col - half).clamp(1, max_col);
    out.queue(cursor::MoveTo(lx as u16, row as u16))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(sprite))?;
    Ok(())
}

fn draw_hero<W: Write>(out: &mut W, view: &View) -> std::io::Result<()> {
    let s = view.session;
    let col = view.col(s.hero.x * s.playfield.width);
    let row = view.row(s.playfield.height * HERO_Y_FRACTION);
    draw_sprite(out, view, col, row, view.sprite(AssetId::Hero), C_HERO)
}

fn draw_villain<W: Write>(out: &mut W, view: &View, villain: &Villain) -> std::io::Result<()> {
    let (id, color) = match villain.kind {
        VillainKind::Spacecraft => (AssetId::Spacecraft, C_VILLAIN_SPACECRAFT),
        VillainKind::Octopus => (AssetId::Octopus, C_VILLAIN_OCTOPUS),
    };
    let col = view.col(villain.x);
    let row = view.row(villain.y);
    draw_sprite(out, view, col, row, view.sprite(id), color)
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &View) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D / Mouse : Move   M : Menu   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, view: &View) -> std::io::Result<()> {
    let s = view.session;
    let new_best = s.score >= view.best && s.score > 0;
    let score_line = format!("Final Score: {:>6}  (level {})", s.score, s.level);
    let best_line = if new_best {
        format!("★ NEW BEST: {:>6} ★", s.score)
    } else {
        format!("Best Score:  {:>6}", view.best)
    };

    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (&score_line, Color::Yellow),
        (&best_line, if new_best { Color::Yellow } else { Color::DarkGrey }),
        ("R - Play Again  M - Menu  Q - Quit", Color::White),
    ];

    let start_row = (view.rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        print_centered(out, view, start_row + i as u16, msg, *color)?;
    }

    Ok(())
}
