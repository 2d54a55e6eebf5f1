mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dino_stopper::config::GameConfig;
use dino_stopper::error::GameError;
use dino_stopper::session::{GameEvent, Session};
use dino_stopper::storage::{load_high_score, save_high_score, FileStore};

use display::Layout;

#[derive(Parser, Debug)]
#[command(name = "dino_stopper", about = "Stop the dinosaurs before they cross the field")]
struct Args {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs here (filtered by RUST_LOG).  No file, no logs.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// High-score store.  Defaults to ~/.dino_stopper.toml.
    #[arg(long)]
    store: Option<PathBuf>,
}

fn default_store_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".dino_stopper.toml")
}

/// The terminal is in raw mode while playing, so logs go to a file.
fn init_logging(path: &Path) -> Result<(), GameError> {
    let file = File::create(path).map_err(|source| GameError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn is_quit(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    high_score: u64,
) -> std::io::Result<MenuResult> {
    let (width, height) = terminal::size()?;
    display::render_menu(out, &Layout::new(width, height, config.viewport), high_score)?;

    // Block until the user makes a choice
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent { code, modifiers, kind: KeyEventKind::Press, .. })) => {
                if is_quit(code, modifiers) {
                    return Ok(MenuResult::Quit);
                }
                if matches!(code, KeyCode::Enter | KeyCode::Char(' ')) {
                    return Ok(MenuResult::Start);
                }
            }
            Ok(Event::Resize(width, height)) => {
                display::render_menu(out, &Layout::new(width, height, config.viewport), high_score)?;
            }
            Ok(_) => {}
            Err(_) => return Ok(MenuResult::Quit),
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut Session,
    rx: &mpsc::Receiver<Event>,
    store: &mut FileStore,
    frame: Duration,
) -> std::io::Result<bool> {
    let mut rng = thread_rng();
    let (width, height) = terminal::size()?;
    let mut layout = Layout::new(width, height, *session.viewport());
    let mut paused = false;
    let mut clock = FrameClock::new(Instant::now());

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, modifiers, kind: KeyEventKind::Press, .. }) => {
                    if is_quit(code, modifiers) {
                        return Ok(true);
                    }
                    match code {
                        KeyCode::Char('p') | KeyCode::Char('P') if session.state().is_running() => {
                            paused = !paused;
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') if !session.state().is_running() => {
                            session.restart();
                            paused = false;
                        }
                        KeyCode::Char('m') | KeyCode::Char('M') if !session.state().is_running() => {
                            return Ok(false);
                        }
                        _ => {}
                    }
                }
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    column,
                    row,
                    ..
                }) if !paused => {
                    if let Some((x, y)) = layout.to_world(column, row) {
                        session.pointer_down(x, y);
                    }
                }
                Event::Resize(w, h) => {
                    layout = Layout::new(w, h, *session.viewport());
                }
                _ => {}
            }
        }

        // Paused time does not count towards spawns or escapes.
        let dt_ms = clock.take_ms(Instant::now());
        if !paused {
            for ev in session.tick(dt_ms, &mut rng) {
                handle_event(&ev, store);
            }
        }

        display::render(out, session, &layout, paused)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            std::thread::sleep(frame - elapsed);
        }
    }
}

/// Hands out elapsed wall time in whole milliseconds.  The sub-millisecond
/// remainder stays on the clock for the next frame.
struct FrameClock {
    last: Instant,
}

impl FrameClock {
    fn new(now: Instant) -> Self {
        Self { last: now }
    }

    fn take_ms(&mut self, now: Instant) -> u64 {
        let ms = now.saturating_duration_since(self.last).as_millis() as u64;
        self.last += Duration::from_millis(ms);
        ms
    }
}

fn handle_event(ev: &GameEvent, store: &mut FileStore) {
    match ev {
        GameEvent::NewHighScore(score) => {
            if let Err(e) = save_high_score(store, *score) {
                warn!(error = %e, "could not save high score");
            }
        }
        GameEvent::LevelUp { level } => info!(level, "level up"),
        GameEvent::GameOver(reason) => info!(?reason, "game over"),
        _ => {}
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let mut store = FileStore::open(args.store.clone().unwrap_or_else(default_store_path))?;
    info!(store = %store.path().display(), "starting");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(EnableMouseCapture)?;
    out.execute(cursor::Hide)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, &config, &mut store);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.map_err(Into::into)
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    store: &mut FileStore,
) -> std::io::Result<()> {
    let frame = Duration::from_millis(config.frame_ms);

    loop {
        let high_score = load_high_score(store);
        match show_menu(out, rx, config, high_score)? {
            MenuResult::Quit => break,
            MenuResult::Start => {
                let mut session = Session::new(config, high_score);
                session.start();
                if game_loop(out, &mut session, rx, store, frame)? {
                    break;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_clock_carries_sub_millisecond_remainder() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(t0);
        let frame = Duration::from_micros(33_700);
        let total: u64 = (1..=30).map(|i| clock.take_ms(t0 + frame * i)).sum();
        // 30 frames of 33.7ms is 1011ms; truncating each frame would give 990.
        assert_eq!(total, 1011);
    }

    #[test]
    fn frame_clock_never_goes_backwards() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(t0 + Duration::from_millis(5));
        assert_eq!(clock.take_ms(t0), 0);
        assert_eq!(clock.take_ms(t0 + Duration::from_millis(12)), 7);
    }
}
