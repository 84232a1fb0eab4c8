//! Rendering layer: all terminal output for a running session lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! session.  No game logic is performed; world coordinates are rounded onto
//! terminal cells and drawn.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use alien_shooter::abilities::Ability;
use alien_shooter::aliens::{Alien, AlienKind};
use alien_shooter::compute::Session;
use alien_shooter::entities::{Entity, GameStatus};
use alien_shooter::powerup::{PowerUp, PowerUpKind};
use alien_shooter::slots::Slot;
use alien_shooter::stats::StatKind;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_CREDITS: Color = Color::Yellow;
const C_HUD_HP: Color = Color::Red;
const C_HUD_STATS: Color = Color::Grey;
const C_SHIP: Color = Color::White;
const C_SCOUT: Color = Color::Green;
const C_GRUNT: Color = Color::Red;
const C_BRUTE: Color = Color::Magenta;
const C_BULLET: Color = Color::Cyan;
const C_POWERUP_STAT: Color = Color::Yellow;
const C_POWERUP_ABILITY: Color = Color::Cyan;
const C_SLOT_ACTIVE: Color = Color::Cyan;
const C_SLOT_PASSIVE: Color = Color::Green;
const C_SLOT_OFF: Color = Color::DarkGrey;
const C_CHARGE: Color = Color::Yellow;

/// Terminal size plus the banked credits shown on the game-over screen.
pub struct Screen {
    pub width: u16,
    pub height: u16,
    pub bank: u64,
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, session: &Session, screen: &Screen) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, screen)?;
    draw_hud(out, session, screen)?;

    for alien in session.aliens() {
        draw_alien(out, alien, screen)?;
    }
    for powerup in session.powerups() {
        draw_powerup(out, powerup, screen)?;
    }
    for bullet in session.bullets() {
        draw_sprite(out, &bullet.entity, &["║"], C_BULLET, screen)?;
    }

    draw_sprite(out, &session.ship().entity, &["  ▲  ", "/███\\"], C_SHIP, screen)?;
    draw_slots(out, session, screen)?;

    if session.status() == GameStatus::GameOver {
        draw_game_over(out, session, screen)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, screen.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, screen: &Screen) -> std::io::Result<()> {
    let w = screen.width as usize;
    let h = screen.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1: top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2: bottom bar
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(screen.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, session: &Session, screen: &Screen) -> std::io::Result<()> {
    let ship = session.ship();

    // Hit points and credits: left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HP))?;
    out.queue(Print(format!("HP:{:>3}  ", ship.hit_points().max(0))))?;
    out.queue(style::SetForegroundColor(C_HUD_CREDITS))?;
    out.queue(Print(format!("Credits:{:>5}", session.credits_earned())))?;

    // Level: centre
    let level_str = format!("[ LEVEL {} ]", session.level());
    let lx = (screen.width / 2).saturating_sub(level_str.len() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(&level_str))?;

    // Remaining stats: right-aligned
    let stats_str = format!(
        "TH:{} FP:{} FR:{}",
        ship.stat(StatKind::Thrust),
        ship.stat(StatKind::FirePower),
        ship.stat(StatKind::FireRate),
    );
    let rx = screen
        .width
        .saturating_sub(stats_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_STATS))?;
    out.queue(Print(&stats_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// Draw `rows` centred on the entity, skipping rows outside the play area.
fn draw_sprite<W: Write>(
    out: &mut W,
    entity: &Entity,
    rows: &[&str],
    color: Color,
    screen: &Screen,
) -> std::io::Result<()> {
    let rect = entity.rect();
    let play_top = 2.0;
    let play_bottom = screen.height.saturating_sub(2) as f32;
    out.queue(style::SetForegroundColor(color))?;
    for (i, row) in rows.iter().enumerate() {
        let y = (rect.top() + i as f32).floor();
        if y < play_top || y >= play_bottom {
            continue;
        }
        let width = row.chars().count() as f32;
        let x = (entity.pos.x - width / 2.0).round().max(1.0);
        out.queue(cursor::MoveTo(x as u16, y as u16))?;
        out.queue(Print(*row))?;
    }
    Ok(())
}

fn draw_alien<W: Write>(out: &mut W, alien: &Alien, screen: &Screen) -> std::io::Result<()> {
    let (rows, color) = match alien.kind {
        AlienKind::Scout => (["«▼»", "╚═╝"], C_SCOUT),
        AlienKind::Grunt => (["(◎)", "╰─╯"], C_GRUNT),
        AlienKind::Brute => (["╔═▼═╗", "╚╦═╦╝"], C_BRUTE),
    };
    draw_sprite(out, &alien.entity, &rows, color, screen)
}

/// Symbols:
///   ♥ Hit Points, » Thrust, ✦ Fire Power, ! Fire Rate, ◆ any ability
fn draw_powerup<W: Write>(out: &mut W, powerup: &PowerUp, screen: &Screen) -> std::io::Result<()> {
    let (symbol, color) = match powerup.kind {
        PowerUpKind::ImproveStat { stat, .. } => {
            let symbol = match stat {
                StatKind::HitPoints => "♥",
                StatKind::Thrust => "»",
                StatKind::FirePower => "✦",
                StatKind::FireRate => "!",
            };
            (symbol, C_POWERUP_STAT)
        }
        PowerUpKind::AddAbility(_) => ("◆", C_POWERUP_ABILITY),
    };
    draw_sprite(out, &powerup.entity, &[symbol], color, screen)
}

// ── Ability slots and charge (last row) ───────────────────────────────────────

fn slot_label(slot: &Slot) -> String {
    if slot.is_locked() {
        return "[ ### ]".to_string();
    }
    match slot.ability() {
        None => "[     ]".to_string(),
        Some(ability) if ability.is_active() => format!("[{:^5}]", short_name(ability)),
        Some(ability) => format!("[{:<3.3}{:>2}]", short_name(ability), ability.level()),
    }
}

fn short_name(ability: &Ability) -> String {
    ability.name().chars().take(5).collect()
}

fn draw_slots<W: Write>(out: &mut W, session: &Session, screen: &Screen) -> std::io::Result<()> {
    let ship = session.ship();
    out.queue(cursor::MoveTo(1, screen.height.saturating_sub(1)))?;

    for slot in ship.active_slots() {
        let color = if slot.is_enabled() { C_SLOT_ACTIVE } else { C_SLOT_OFF };
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(slot_label(slot)))?;
    }
    out.queue(Print(" "))?;
    for slot in ship.passive_slots() {
        let color = if slot.is_enabled() { C_SLOT_PASSIVE } else { C_SLOT_OFF };
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(slot_label(slot)))?;
    }

    if let Some(progress) = ship.charge_progress() {
        let filled = (progress * 10.0).round() as usize;
        out.queue(style::SetForegroundColor(C_CHARGE))?;
        out.queue(Print(format!(" {}{}", "█".repeat(filled), "░".repeat(10 - filled.min(10)))))?;
    }
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, session: &Session, screen: &Screen) -> std::io::Result<()> {
    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
    ];
    let earned_line = format!("Credits earned: {:>6}", session.credits_earned());
    let bank_line = format!("Bank:           {:>6}", screen.bank);
    let hint = "R - Back to Menu  Q - Quit";

    let cx = screen.width / 2;
    let total_rows = lines.len() + 3;
    let start_row = (screen.height / 2).saturating_sub(total_rows as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    let rows: [(&str, Color); 3] = [
        (earned_line.as_str(), Color::Yellow),
        (bank_line.as_str(), Color::DarkGrey),
        (hint, Color::White),
    ];
    for (i, (msg, color)) in rows.iter().enumerate() {
        let row = start_row + lines.len() as u16 + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
