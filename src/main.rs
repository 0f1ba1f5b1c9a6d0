mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, IsTerminal, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::filter::EnvFilter;

use display::Viewport;
use starfall::assets::{AssetLoader, LoadEvent};
use starfall::clock::{Clock, MonotonicClock};
use starfall::input::{InputSnapshot, Key};
use starfall::{GameConfig, GameError, GamePhase, Simulation};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "starfall", about = "Terminal arcade shoot-'em-up")]
struct Args {
    /// TOML file overriding the built-in tunables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for enemy placement; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Where log output goes (the terminal is busy drawing)
    #[arg(long, default_value = "starfall.log")]
    log_file: PathBuf,

    /// Force the debug HUD and debug-level logging
    #[arg(long)]
    debug: bool,
}

// ── Held-key tracking ─────────────────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so 8 frames at 60 FPS (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// Maps each held key to the frame it was last seen (press or repeat).
#[derive(Default)]
struct HeldKeys {
    last_seen: HashMap<Key, u64>,
}

impl HeldKeys {
    fn press(&mut self, key: Key, frame: u64) {
        self.last_seen.insert(key, frame);
    }

    fn release(&mut self, key: Key) {
        self.last_seen.remove(&key);
    }

    fn clear(&mut self) {
        self.last_seen.clear();
    }

    /// Fold every still-fresh key into `input`.
    fn apply(&self, input: &mut InputSnapshot, frame: u64) {
        for key in [Key::Left, Key::A, Key::Right, Key::D, Key::Space, Key::W, Key::Escape] {
            let held = self
                .last_seen
                .get(&key)
                .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
                .unwrap_or(false);
            if held {
                input.press(key);
            } else {
                input.release(key);
            }
        }
    }
}

// ── Application context ───────────────────────────────────────────────────────

/// Everything the host threads through a frame.
struct App {
    sim: Simulation,
    clock: MonotonicClock,
    input: InputSnapshot,
    held: HeldKeys,
    viewport: Viewport,
    loader: Option<mpsc::Receiver<LoadEvent>>,
    load_percent: u8,
    frame: u64,
    start_requested: bool,
    quit: bool,
}

impl App {
    fn new(cfg: GameConfig, rng: StdRng, term: (u16, u16)) -> Self {
        let viewport = Viewport::fit(term.0, term.1, cfg.screen.width, cfg.screen.height);
        let loader = AssetLoader::from_config(&cfg.assets);
        tracing::info!(assets = loader.total(), "loading assets");
        Self {
            sim: Simulation::new(cfg, rng),
            clock: MonotonicClock::new(),
            input: InputSnapshot::new(),
            held: HeldKeys::default(),
            viewport,
            loader: Some(loader.start_loading()),
            load_percent: 0,
            frame: 0,
            start_requested: false,
            quit: false,
        }
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        let cfg = self.sim.config();
        let vp = Viewport::fit(cols, rows, cfg.screen.width, cfg.screen.height);
        if vp != self.viewport {
            tracing::debug!(cols = vp.cols, rows = vp.rows, "viewport resized");
            self.viewport = vp;
        }
    }

    fn handle_event(&mut self, ev: Event) {
        match ev {
            Event::Key(KeyEvent { code, kind, modifiers, .. }) => {
                let key = Key::from_key_code(code);
                match kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        if kind == KeyEventKind::Press {
                            tracing::debug!(?code, "key pressed");
                        }
                        if let Some(k) = key {
                            self.held.press(k, self.frame);
                        }
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') => self.quit = true,
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                self.quit = true
                            }
                            KeyCode::Enter | KeyCode::Char(' ') => self.start_requested = true,
                            _ => {}
                        }
                    }
                    KeyEventKind::Release => {
                        if let Some(k) = key {
                            self.held.release(k);
                        }
                    }
                }
            }
            Event::Mouse(MouseEvent { kind, column, row, .. }) => {
                let (x, y) = self.viewport.to_field(column, row);
                self.input.set_pointer(x, y);
                match kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        self.input.set_pointer_pressed(true);
                        self.start_requested = true;
                    }
                    MouseEventKind::Up(MouseButton::Left) => self.input.set_pointer_pressed(false),
                    _ => {}
                }
            }
            Event::Resize(cols, rows) => self.resize(cols, rows),
            _ => {}
        }
    }

    fn poll_loader(&mut self) {
        let Some(rx) = &self.loader else { return };
        loop {
            match rx.try_recv() {
                Ok(LoadEvent::Progress(pct)) => self.load_percent = pct,
                Ok(LoadEvent::Complete(assets)) => {
                    tracing::info!(loaded = assets.len(), "assets ready");
                    self.finish_loading();
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => return,
                Err(mpsc::TryRecvError::Disconnected) => {
                    tracing::error!("asset loader stopped without completing");
                    self.finish_loading();
                    return;
                }
            }
        }
    }

    fn finish_loading(&mut self) {
        self.loader = None;
        self.load_percent = 100;
        self.sim.on_assets_loaded();
    }

    /// The key that started the run must not carry into the first frame as
    /// a shot.
    fn begin_play(&mut self, now: f64) {
        self.sim.start_game(now);
        self.held.clear();
        self.held.apply(&mut self.input, self.frame);
    }

    /// One host frame: input, lifecycle, simulation, draw.
    fn step<W: Write>(&mut self, out: &mut W) {
        self.frame += 1;
        self.held.apply(&mut self.input, self.frame);
        let now = self.clock.now_ms();

        match self.sim.phase() {
            GamePhase::Loading => self.poll_loader(),
            GamePhase::StartScreen if self.start_requested => self.begin_play(now),
            GamePhase::Playing => {
                let sim = &mut self.sim;
                let input = &self.input;
                if panic::catch_unwind(AssertUnwindSafe(|| sim.tick(input, now))).is_err() {
                    tracing::error!(frame = self.frame, "frame aborted by a fault");
                }
            }
            _ => {}
        }
        self.start_requested = false;

        let drawn = match self.sim.phase() {
            GamePhase::Loading => display::render_loading(out, &self.viewport, self.load_percent),
            GamePhase::StartScreen => display::render_start_screen(out, &self.viewport),
            _ => display::render(out, &self.sim.view(), &self.viewport),
        };
        if let Err(e) = drawn {
            tracing::error!("render failed: {e}");
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

fn run<W: Write>(out: &mut W, app: &mut App, rx: &mpsc::Receiver<Event>, fps: u32) {
    let frame_budget = Duration::from_secs_f64(1.0 / fps as f64);

    while !app.quit {
        let frame_start = Instant::now();

        // Drain all pending input events (non-blocking)
        while let Ok(ev) = rx.try_recv() {
            app.handle_event(ev);
        }
        if app.quit {
            break;
        }

        app.step(out);

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            thread::sleep(frame_budget - elapsed);
        }
    }
}

// ── Start-up ──────────────────────────────────────────────────────────────────

fn init_logging(path: &Path, debug: bool) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file: {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(debug))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    // Default hook would scribble over the alternate screen
    panic::set_hook(Box::new(|info| tracing::error!("panic: {info}")));
    Ok(())
}

/// `RUST_LOG` wins when set; otherwise `debug` or `info`.
fn log_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }))
}

/// The terminal is the only drawing surface; without it nothing starts.
fn check_surface() -> Result<(u16, u16), GameError> {
    if !std::io::stdout().is_terminal() {
        return Err(GameError::MissingSurface("interactive terminal on stdout"));
    }
    let (cols, rows) = terminal::size()?;
    if cols == 0 || rows == 0 {
        return Err(GameError::MissingSurface("non-empty terminal window"));
    }
    Ok((cols, rows))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut cfg =
        GameConfig::load_or_default(args.config.as_deref()).map_err(GameError::Config)?;
    if args.debug {
        cfg.debug = true;
    }
    init_logging(&args.log_file, cfg.debug)?;

    let term = check_surface().context("cannot start game")?;
    tracing::info!(cols = term.0, rows = term.1, "terminal ready");

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let fps = cfg.fps;
    let mut app = App::new(cfg, rng, term);

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to HOLD_WINDOW.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    run(&mut out, &mut app, &rx, fps);
    tracing::info!(score = app.sim.hud().score, phase = %app.sim.phase(), "exiting");

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_key_expires_after_window() {
        let mut held = HeldKeys::default();
        let mut input = InputSnapshot::new();
        held.press(Key::Left, 10);

        held.apply(&mut input, 10 + HOLD_WINDOW);
        assert!(input.left());

        held.apply(&mut input, 11 + HOLD_WINDOW);
        assert!(!input.left());
    }

    #[test]
    fn start_key_is_not_held_into_play() {
        let mut app = App::new(GameConfig::default(), StdRng::seed_from_u64(1), (120, 40));
        app.sim.on_assets_loaded();
        app.handle_event(Event::Key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE)));
        let mut buf: Vec<u8> = Vec::new();

        app.step(&mut buf);
        assert_eq!(app.sim.phase(), GamePhase::Playing);
        assert!(!app.input.fire());

        app.step(&mut buf);
        assert!(!app.input.fire());
        assert!(app.sim.bullets().is_empty());
    }

    #[test]
    fn rust_log_overrides_default_level() {
        std::env::set_var("RUST_LOG", "trace");
        assert_eq!(log_filter(false).to_string(), "trace");
        std::env::remove_var("RUST_LOG");
        assert_eq!(log_filter(false).to_string(), "info");
        assert_eq!(log_filter(true).to_string(), "debug");
    }

    #[test]
    fn release_drops_key_immediately() {
        let mut held = HeldKeys::default();
        let mut input = InputSnapshot::new();
        held.press(Key::Space, 1);
        held.release(Key::Space);
        held.apply(&mut input, 1);
        assert!(!input.fire());
    }
}
