mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use log::{debug, info, warn};
use rand::thread_rng;

use alien_shooter::compute::Session;
use alien_shooter::config::GameConfig;
use alien_shooter::entities::GameStatus;
use alien_shooter::events::GameEvent;
use alien_shooter::geometry::PlayArea;
use alien_shooter::upgrades::{Progress, UpgradeKind};

use display::Screen;

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

const CONFIG_FILE: &str = "alien_shooter.toml";

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

/// Keys toggling the passive slots, in slot order.
const PASSIVE_KEYS: [char; 4] = ['z', 'x', 'c', 'v'];

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

// ── Persistence ───────────────────────────────────────────────────────────────

fn progress_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".alien_shooter_progress.json")
}

fn load_config() -> GameConfig {
    if !std::path::Path::new(CONFIG_FILE).exists() {
        return GameConfig::default();
    }
    match GameConfig::load_from_file(CONFIG_FILE) {
        Ok(config) => {
            info!("loaded {}", CONFIG_FILE);
            config
        }
        Err(e) => {
            warn!("ignoring {}: {}", CONFIG_FILE, e);
            GameConfig::default()
        }
    }
}

fn load_progress() -> Progress {
    Progress::load(progress_path()).unwrap_or_else(|e| {
        warn!("could not read progress, starting fresh: {}", e);
        Progress::default()
    })
}

fn save_progress(progress: &Progress) {
    if let Err(e) = progress.save(progress_path()) {
        warn!("could not save progress: {}", e);
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

/// Title screen doubling as the upgrade shop.  Digits buy upgrades.
fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    progress: &mut Progress,
    config: &GameConfig,
) -> std::io::Result<MenuResult> {
    let mut message = String::new();
    loop {
        draw_menu(out, progress, config, &message)?;

        // Block until the user makes a choice
        let Ok(event) = rx.recv() else {
            return Ok(MenuResult::Quit);
        };
        let Event::Key(KeyEvent { code, kind, .. }) = event else {
            continue;
        };
        if kind == KeyEventKind::Release {
            continue;
        }
        match code {
            KeyCode::Enter | KeyCode::Char(' ') => return Ok(MenuResult::Start),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                return Ok(MenuResult::Quit);
            }
            KeyCode::Char(c @ '1'..='8') => {
                let index = c as usize - '1' as usize;
                let kind = UpgradeKind::ALL[index];
                message = match progress.purchase(kind, config) {
                    Ok(cost) => {
                        save_progress(progress);
                        format!("Bought {} for {} credits", kind.label(), cost)
                    }
                    Err(e) => e.to_string(),
                };
            }
            _ => {}
        }
    }
}

fn draw_menu<W: Write>(
    out: &mut W,
    progress: &Progress,
    config: &GameConfig,
    message: &str,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;
    let left = cx.saturating_sub(22);

    let title = "★  ALIEN  SHOOTER  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(9),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    let bank = format!("Credits: {}", progress.credits);
    out.queue(cursor::MoveTo(
        cx.saturating_sub(bank.chars().count() as u16 / 2),
        cy.saturating_sub(7),
    ))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(&bank))?;

    out.queue(cursor::MoveTo(left, cy.saturating_sub(5)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Upgrades:"))?;

    for (i, kind) in UpgradeKind::ALL.iter().enumerate() {
        let row = cy.saturating_sub(4) + i as u16;
        let level = progress.upgrades.level(*kind);
        let max = Progress::max_level(*kind, config);
        let price = if level >= max {
            "MAX".to_string()
        } else {
            format!("{} cr", progress.cost(*kind, config))
        };
        out.queue(cursor::MoveTo(left, row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", i + 1)))?;
        out.queue(style::SetForegroundColor(Color::Green))?;
        out.queue(Print(format!("{:<13}", kind.label())))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(" lv {:>2}/{:<2}  {}", level, max, price)))?;
    }

    if !message.is_empty() {
        out.queue(cursor::MoveTo(left, cy + 5))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(message))?;
    }

    let hints = [
        "ENTER : Start   Q : Quit",
        "← → / A D / mouse drag : Move   SPACE : Shoot",
        "E (hold) : Charge   1-3 : Toggle active   Z X C V : Toggle passive",
    ];
    for (i, hint) in hints.iter().enumerate() {
        out.queue(cursor::MoveTo(left, cy + 7 + i as u16))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(*hint))?;
    }

    out.queue(style::ResetColor)?;
    out.flush()
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu.
///
/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key.  Each frame we check which keys are
/// still "fresh" (within `HOLD_WINDOW` frames) and feed the held state to the
/// session, so Space, E and a direction can all be held together.  One-shot
/// keys (slot toggles, quit) act on the press itself.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut Session,
    rx: &mpsc::Receiver<Event>,
    progress: &mut Progress,
) -> std::io::Result<bool> {
    let mut rng = thread_rng();

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut was_charging = false;
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(event) = rx.try_recv() {
            match event {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code, frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(true);
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(true);
                            }
                            KeyCode::Char('r') | KeyCode::Char('R')
                                if session.status() == GameStatus::GameOver =>
                            {
                                return Ok(false);
                            }
                            KeyCode::Char(c @ '1'..='3') => {
                                let index = c as usize - '1' as usize;
                                if let Err(e) = session.toggle_active_ability(index) {
                                    debug!("active slot {} not toggled: {}", index + 1, e);
                                }
                            }
                            KeyCode::Char(c) => {
                                let lower = c.to_ascii_lowercase();
                                if let Some(i) = PASSIVE_KEYS.iter().position(|&k| k == lower) {
                                    if let Err(e) = session.toggle_passive_ability(i) {
                                        debug!("passive slot {} not toggled: {}", i + 1, e);
                                    }
                                }
                            }
                            _ => {}
                        }
                    }
                    // Repeat: refresh timestamp so key stays "held"
                    KeyEventKind::Repeat => {
                        key_frame.insert(code, frame);
                    }
                    // Release: remove key immediately (keyboard-enhancement path)
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Mouse(MouseEvent { kind, column, .. }) => match kind {
                    MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => {
                        session.set_destination_from_pointer(column as f32 + 0.5);
                    }
                    MouseEventKind::Up(MouseButton::Left) => session.release_pointer(),
                    _ => {}
                },
                _ => {}
            }
        }

        // ── Apply held-key state every frame ──────────────────────────────────
        if session.status() == GameStatus::Playing {
            let left = any_held(
                &key_frame,
                &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
                frame,
            );
            let right = any_held(
                &key_frame,
                &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
                frame,
            );
            let shoot = is_held(&key_frame, &KeyCode::Char(' '), frame);
            let charge = any_held(&key_frame, &[KeyCode::Char('e'), KeyCode::Char('E')], frame);

            session.set_moving_left(left);
            session.set_moving_right(right);

            // The ship gates its own fire rate; holding Space just keeps asking.
            if shoot {
                session.fire_bullet();
            }

            if charge && !was_charging {
                session.start_ability_charge();
            } else if !charge && was_charging {
                session.stop_ability_charge();
            }
            was_charging = charge;
        }

        let now = Instant::now();
        let dt = now.duration_since(last_tick).as_secs_f32();
        last_tick = now;

        for event in session.tick(dt, &mut rng) {
            if let GameEvent::SessionEnded { credits_earned } = event {
                progress.deposit(credits_earned);
                save_progress(progress);
            }
        }

        let (width, height) = terminal::size()?;
        let screen = Screen { width, height, bank: progress.credits };
        display::render(out, session, &screen)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = load_config();
    let mut progress = load_progress();

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
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
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, &config, &mut progress);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    progress: &mut Progress,
) -> std::io::Result<()> {
    loop {
        match show_menu(out, rx, progress, config)? {
            MenuResult::Quit => break,
            MenuResult::Start => {
                let (width, height) = terminal::size()?;
                // Inside the border: columns 1..width-1, rows 2..height-2.
                let area = PlayArea::new(
                    1.0,
                    2.0,
                    width.saturating_sub(2) as f32,
                    height.saturating_sub(4) as f32,
                );
                let mut session = Session::new(config.clone(), &progress.snapshot(), area);
                let quit = game_loop(out, &mut session, rx, progress)?;

                // Quitting mid-run still banks what was earned so far
                if session.status() == GameStatus::Playing {
                    progress.deposit(session.credits_earned());
                    save_progress(progress);
                }

                if quit {
                    break;
                }
            }
        }
    }
    Ok(())
}
