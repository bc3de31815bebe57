mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use wave_shooter::config::Rules;
use wave_shooter::entities::InputState;
use wave_shooter::error::ConfigError;
use wave_shooter::session::{Control, Session};
use wave_shooter::stage::Canvas;

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "wave_shooter", about = "Wave-based arcade shooter for the terminal")]
struct Cli {
    /// Target ticks per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Seed for enemy placement; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Hit points at the start of a run
    #[arg(long, default_value_t = 3)]
    lives: i32,

    /// Write tracing output to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn rules(&self) -> Result<Rules, ConfigError> {
        let rules = Rules {
            tick_hz: self.fps,
            player_hp: self.lives,
            ..Rules::default()
        };
        rules.validate()?;
        Ok(rules)
    }
}

/// Logging goes to a file only; stdout belongs to the game picture.
fn init_tracing(path: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ── Held-key input ────────────────────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms at
/// 30 FPS) is always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

fn held_input(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> InputState {
    InputState {
        left: any_held(
            key_frame,
            &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
            frame,
        ),
        right: any_held(
            key_frame,
            &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
            frame,
        ),
        fire: is_held(key_frame, &KeyCode::Char(' '), frame),
        confirm: is_held(key_frame, &KeyCode::Enter, frame),
        cancel: is_held(key_frame, &KeyCode::Esc, frame),
    }
}

/// Ctrl-C and Q close the window from any screen.
fn is_close_request(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the session asks to exit or the window is closed.
///
/// Input model: instead of acting on each key event individually, we keep a
/// `key_frame` map that records the frame number of the last press/repeat
/// event for every key, and each tick hands the session the set of keys
/// that are still "fresh". Terminals with keyboard enhancement also send
/// release events, which drop a key immediately.
fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    rules: Rules,
    rng: &mut StdRng,
) -> anyhow::Result<()> {
    let tick = Duration::from_secs_f64(rules.tick_seconds());
    let mut canvas = Canvas::new();
    let mut session = Session::open(rules, &mut canvas);

    let clock = Instant::now();
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(event) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = event else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    if is_close_request(code, modifiers) {
                        tracing::info!("window closed");
                        return Ok(());
                    }
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let input = held_input(&key_frame, frame);
        let now = clock.elapsed().as_secs_f64();
        if session.update(&mut canvas, &input, now, rng) == Control::Exit {
            tracing::info!(high_score = session.high_score(), "exit requested");
            return Ok(());
        }

        display::render(out, &canvas, session.rules())?;

        let elapsed = frame_start.elapsed();
        if elapsed < tick {
            thread::sleep(tick - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let rules = cli.rules().context("invalid game settings")?;
    init_tracing(cli.log_file.as_deref())?;

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

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

    let result = game_loop(&mut out, &rx, rules, &mut rng);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
