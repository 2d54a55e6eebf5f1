//! Rendering layer: all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! session.  No game logic is performed; this module only translates state
//! into terminal commands, and terminal cells back into world coordinates.

use std::io::Write;
use std::ops::{Range, RangeInclusive};

use crossterm::{
    cursor,
    style::{self, Attribute, Color, Print},
    terminal,
    QueueableCommand,
};
use dino_stopper::collision::{creature_bounds, Bounds};
use dino_stopper::effects::{Effect, EffectKind};
use dino_stopper::entities::{Creature, CreatureKind, GameStatus, Viewport};
use dino_stopper::session::{GameSummary, Session};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkGreen;
const C_HUD_SCORE: Color = Color::Green;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_LEVEL: Color = Color::Cyan;
const C_HUD_COMBO: Color = Color::DarkYellow;
const C_WARNING: Color = Color::Red;
const C_HURT: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;

// ── World ↔ terminal mapping ─────────────────────────────────────────────────

/// Maps the world's pixel space onto the play area inside the border
/// (columns `1..width-1`, rows `2..height-2`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub width: u16,
    pub height: u16,
    viewport: Viewport,
}

impl Layout {
    pub fn new(width: u16, height: u16, viewport: Viewport) -> Self {
        Self { width, height, viewport }
    }

    fn play_cols(&self) -> f32 {
        f32::from(self.width.saturating_sub(2).max(1))
    }

    fn play_rows(&self) -> f32 {
        f32::from(self.height.saturating_sub(4).max(1))
    }

    /// Terminal cell for a world point, or `None` when it is off the field.
    pub fn to_cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        let col = (x / self.viewport.width * self.play_cols()).floor();
        let row = (y / self.viewport.height * self.play_rows()).floor();
        if col < 0.0 || row < 0.0 || col >= self.play_cols() || row >= self.play_rows() {
            return None;
        }
        Some((col as u16 + 1, row as u16 + 2))
    }

    /// World point at the centre of a terminal cell, or `None` outside the
    /// play area.
    pub fn to_world(&self, col: u16, row: u16) -> Option<(f32, f32)> {
        if col < 1 || row < 2 {
            return None;
        }
        let c = f32::from(col - 1);
        let r = f32::from(row - 2);
        if c >= self.play_cols() || r >= self.play_rows() {
            return None;
        }
        Some((
            (c + 0.5) / self.play_cols() * self.viewport.width,
            (r + 0.5) / self.play_rows() * self.viewport.height,
        ))
    }

    /// Columns and rows of the play-area cells whose centres lie inside
    /// `bounds`.  A click on any of them lands inside the box.
    pub fn covered_cells(&self, bounds: &Bounds) -> Option<(RangeInclusive<u16>, RangeInclusive<u16>)> {
        let right = bounds.left + bounds.width;
        let bottom = bounds.top + bounds.height;
        let cols = centre_span(
            1..self.width.saturating_sub(1),
            |col| self.to_world(col, 2).map(|(x, _)| x),
            bounds.left,
            right,
        )?;
        let rows = centre_span(
            2..self.height.saturating_sub(2),
            |row| self.to_world(1, row).map(|(_, y)| y),
            bounds.top,
            bottom,
        )?;
        Some((cols, rows))
    }
}

/// Contiguous run of cells whose centre coordinate is within `lo..=hi`.
fn centre_span(
    cells: Range<u16>,
    centre: impl Fn(u16) -> Option<f32>,
    lo: f32,
    hi: f32,
) -> Option<RangeInclusive<u16>> {
    let mut inside = cells.filter(|&cell| centre(cell).is_some_and(|v| v >= lo && v <= hi));
    let first = inside.next()?;
    let last = inside.last().unwrap_or(first);
    Some(first..=last)
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    session: &Session,
    layout: &Layout,
    paused: bool,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, layout)?;
    draw_hud(out, session, layout)?;

    for (_, effect) in session.effects().iter() {
        draw_effect(out, effect, session.now_ms(), layout)?;
    }
    for (_, creature) in session.creatures().iter() {
        draw_creature(out, creature, layout)?;
    }

    draw_controls_hint(out, layout)?;

    if session.state().status == GameStatus::GameOver {
        draw_game_over(out, &session.summary(), layout)?;
    } else if paused {
        draw_centered(out, layout, &[("── PAUSED ──", Color::White), ("P - Resume", C_HINT)])?;
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, layout.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

/// Title screen.
pub fn render_menu<W: Write>(out: &mut W, layout: &Layout, high_score: u64) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let best = format!("RECORD: {}", high_score);
    draw_centered(
        out,
        layout,
        &[
            ("~~  DINO  STOPPER  ~~", Color::Green),
            ("", Color::Reset),
            (&best, Color::Yellow),
            ("", Color::Reset),
            ("Click the dinosaurs before they cross the field.", Color::White),
            ("Three escapes and the game is over,", Color::DarkGrey),
            ("and so it is when the field fills up.", Color::DarkGrey),
            ("", Color::Reset),
            ("ENTER / SPACE : Start   Q : Quit", Color::Cyan),
        ],
    )?;
    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, layout: &Layout) -> std::io::Result<()> {
    let w = layout.width as usize;
    let h = layout.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(layout.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, session: &Session, layout: &Layout) -> std::io::Result<()> {
    let state = session.state();

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {:>7}", state.score)))?;

    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(format!("  Level {}", state.level)))?;

    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(format!("  {}", "♥".repeat(state.lives as usize))))?;

    if state.combo > 1 {
        out.queue(style::SetForegroundColor(C_HUD_COMBO))?;
        out.queue(Print(format!("  COMBO x{}", state.combo)))?;
    }

    // Creature counter, right-aligned
    let active = session.creatures().active_count();
    let counter = format!("DINO: {}/{}", active, state.max_concurrent);
    let rx = layout.width.saturating_sub(counter.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_WARNING))?;
    out.queue(Print(&counter))?;

    if state.status == GameStatus::Running && active + 1 >= state.max_concurrent {
        let warning = "!! TOO MANY DINOS !!";
        let wx = (layout.width / 2).saturating_sub(warning.len() as u16 / 2);
        out.queue(cursor::MoveTo(wx, 2))?;
        out.queue(style::SetAttribute(Attribute::SlowBlink))?;
        out.queue(Print(warning))?;
        out.queue(style::SetAttribute(Attribute::Reset))?;
    }

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn creature_color(kind: CreatureKind) -> Color {
    match kind {
        CreatureKind::Alanqa => Color::Magenta,
        CreatureKind::Baryonyx => Color::DarkCyan,
        CreatureKind::Carnotaurus => Color::Red,
        CreatureKind::Oviraptor => Color::Yellow,
        CreatureKind::Styracosaurus => Color::Green,
    }
}

/// Two-row sprite, facing the direction of travel.
fn creature_sprite(kind: CreatureKind, facing_right: bool) -> [&'static str; 2] {
    match (kind, facing_right) {
        (CreatureKind::Alanqa, true) => ["\\_ _/>", "  v   "],
        (CreatureKind::Alanqa, false) => ["<\\_ _/", "   v  "],
        (CreatureKind::Styracosaurus, true) => [" __^^>", "/|__|\\"],
        (CreatureKind::Styracosaurus, false) => ["<^^__ ", "/|__|\\"],
        (_, true) => ["  __o>", "_/  \\ "],
        (_, false) => ["<o__  ", " /  \\_"],
    }
}

/// Where each sprite line goes as `(column, row, text)`.  Lines sit on the
/// bottom rows of the cells the hitbox covers and are clipped to its width.
fn sprite_placement(creature: &Creature, layout: &Layout) -> Vec<(u16, u16, &'static str)> {
    let Some((cols, rows)) = layout.covered_cells(&creature_bounds(creature)) else {
        return Vec::new();
    };
    let span = usize::from(cols.end() - cols.start()) + 1;
    let lines = creature_sprite(creature.kind, creature.direction > 0);

    let mut placed = Vec::with_capacity(lines.len());
    for (&line, row) in lines.iter().rev().zip(rows.rev()) {
        let (col, text) = if line.len() <= span {
            (cols.start() + ((span - line.len()) / 2) as u16, line)
        } else {
            let skip = (line.len() - span) / 2;
            (*cols.start(), &line[skip..skip + span])
        };
        placed.push((col, row, text));
    }
    placed
}

fn draw_creature<W: Write>(out: &mut W, creature: &Creature, layout: &Layout) -> std::io::Result<()> {
    let color = if creature.hurt { C_HURT } else { creature_color(creature.kind) };
    out.queue(style::SetForegroundColor(color))?;
    for (col, row, text) in sprite_placement(creature, layout) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print(text))?;
    }
    Ok(())
}

fn draw_effect<W: Write>(
    out: &mut W,
    effect: &Effect,
    now_ms: u64,
    layout: &Layout,
) -> std::io::Result<()> {
    let Some((col, row)) = layout.to_cell(effect.position.x, effect.position.y) else {
        return Ok(());
    };
    let fading = effect.progress(now_ms) > 0.5;
    let (glyph, color) = match effect.kind {
        EffectKind::Explosion if fading => ("·", Color::DarkRed),
        EffectKind::Explosion => ("✸", Color::Red),
        EffectKind::MuzzleFlash => ("+", Color::Yellow),
        EffectKind::Celebration if fading => ("LEVEL UP", Color::DarkYellow),
        EffectKind::Celebration => ("★ LEVEL UP! ★", Color::Yellow),
    };
    let col = col.saturating_sub(glyph.chars().count() as u16 / 2).max(1);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, layout: &Layout) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, layout.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("CLICK : Stop dino   P : Pause   Q : Quit"))?;
    Ok(())
}

// ── Overlays ─────────────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    summary: &GameSummary,
    layout: &Layout,
) -> std::io::Result<()> {
    let score_line = format!("Final Score: {}", summary.final_score);
    let record_line = if summary.new_high_score {
        "★ NEW RECORD! ★".to_string()
    } else {
        format!("Record: {}", summary.previous_high_score)
    };
    let level_line = format!("Level reached: {}", summary.level);
    let kills_line = format!("Dinos stopped: {}", summary.kills);
    let combo_line = format!("Best combo: x{}", summary.max_combo);
    let lives_line = format!("Lives lost: {}", summary.lives_lost);
    let time_line = format!("Time: {}s", summary.duration_ms / 1000);

    draw_centered(
        out,
        layout,
        &[
            ("╔══════════════════╗", Color::Red),
            ("║    GAME  OVER    ║", Color::Red),
            ("╚══════════════════╝", Color::Red),
            (&score_line, Color::Yellow),
            (&record_line, Color::Yellow),
            (&level_line, Color::White),
            (&kills_line, Color::White),
            (&combo_line, Color::White),
            (&lives_line, Color::White),
            (&time_line, Color::White),
            ("R - Play Again  M - Menu  Q - Quit", Color::Cyan),
        ],
    )
}

fn draw_centered<W: Write>(
    out: &mut W,
    layout: &Layout,
    lines: &[(&str, Color)],
) -> std::io::Result<()> {
    let cx = layout.width / 2;
    let start_row = (layout.height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
