mod assets;
mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    style::Print,
    terminal, ExecutableCommand, QueueableCommand,
};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use catch_game::config::GameConfig;
use catch_game::machine::{AssetId, Command, Cue, Game, Phase};

use assets::Sprites;
use display::View;

/// Normalized distance the hero moves per arrow-key press or repeat.
const KEY_STEP: f32 = 0.04;

#[derive(Parser, Debug)]
#[command(name = "catch_game", about = "Catch the falling villains before they land")]
struct Cli {
    /// TOML config file; built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for the villain RNG (overrides the config seed).
    #[arg(long)]
    seed: Option<u64>,
    /// Where log output goes; the terminal itself is busy drawing the game.
    #[arg(long, default_value = "catch_game.log")]
    log_file: PathBuf,
}

// ── Logging ───────────────────────────────────────────────────────────────────

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

// ── High-score persistence ────────────────────────────────────────────────────

fn high_score_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".catch_game_score")
}

fn load_high_score() -> u32 {
    std::fs::read_to_string(high_score_path())
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn save_high_score(score: u32) {
    let _ = std::fs::write(high_score_path(), score.to_string());
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// What the loop should do after an input event.
enum Flow {
    Continue,
    Quit,
}

fn handle_key(game: &mut Game<StdRng>, key: KeyEvent) -> Flow {
    if key.kind == KeyEventKind::Release {
        return Flow::Continue;
    }
    let hero_x = game.session().hero.x;
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Flow::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Flow::Quit;
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            let command = match game.phase() {
                Phase::GameOver => Command::Restart,
                _ => Command::Start,
            };
            game.command(command);
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            game.command(Command::Restart);
        }
        KeyCode::Char('m') | KeyCode::Char('M') => {
            game.command(Command::GoToMenu);
        }
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
            game.set_hero_x(hero_x - KEY_STEP);
        }
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
            game.set_hero_x(hero_x + KEY_STEP);
        }
        _ => {}
    }
    Flow::Continue
}

fn handle_mouse(game: &mut Game<StdRng>, mouse: MouseEvent, cols: u16) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => {
            game.set_hero_x(display::column_to_x(mouse.column, cols));
        }
        _ => {}
    }
}

// ── Audio cues ────────────────────────────────────────────────────────────────

/// No music backend in a terminal: eat sounds ring the bell, the rest is logged.
fn play_cue<W: Write>(out: &mut W, cue: Cue, bell: bool) {
    match cue {
        Cue::EatSound if bell => {
            let _ = out.queue(Print('\x07'));
        }
        Cue::EatSound => {}
        other => debug!("cue {:?}", other),
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

fn run<W: Write>(
    out: &mut W,
    config: &GameConfig,
    game: &mut Game<StdRng>,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let frame = config.frame_duration();
    let assets = assets::spawn_loader(config.display.assets_dir.clone());
    let mut sprites = Sprites::default();
    let mut best = load_high_score();
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        let (cols, rows) = terminal::size()?;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let flow = match ev {
                Event::Key(key) => handle_key(game, key),
                Event::Mouse(mouse) => {
                    handle_mouse(game, mouse, cols);
                    Flow::Continue
                }
                _ => Flow::Continue,
            };
            if let Flow::Quit = flow {
                return Ok(());
            }
        }

        // ── Asset reports ─────────────────────────────────────────────────────
        while let Ok(report) = assets.try_recv() {
            let (id, status) = sprites.accept(report);
            game.report_asset(id, status);
        }

        game.advance_clock(frame_start - last);
        last = frame_start;

        if let Some(report) = game.tick() {
            if report.game_over && game.session().score > best {
                best = game.session().score;
                save_high_score(best);
                info!("new best score {}", best);
            }
        }

        for cue in game.drain_cues() {
            play_cue(out, cue, config.display.bell_on_eat);
        }

        let fallback = AssetId::ALL.map(|id| game.fallback(id));
        let view = View {
            phase: game.phase(),
            session: game.session(),
            sprites: &sprites,
            fallback,
            best,
            cols,
            rows,
        };
        display::render(out, &view)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            std::thread::sleep(frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    init_logging(&cli.log_file)?;

    let rng = match config.seed {
        Some(seed) => {
            info!("using seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    let mut game = Game::new(&config, rng);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &config, &mut game, &rx);

    // Always restore the terminal
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.context("terminal I/O failed")
}
