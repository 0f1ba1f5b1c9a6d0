/// Rendering layer — all terminal output lives here.
///
/// Each function receives a mutable writer, the current viewport and an
/// immutable view of the game.  No game logic is performed; this module
/// only maps field coordinates to cells and queues terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use starfall::entities::{Bullet, Enemy, Player};
use starfall::hud::Hud;
use starfall::{FrameView, GamePhase};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_SKY_TOP: (u8, u8, u8) = (0x00, 0x04, 0x28);
const C_SKY_BOTTOM: (u8, u8, u8) = (0x00, 0x4e, 0x92);
const C_STAR: Color = Color::White;
const C_HUD: Color = Color::Rgb { r: 0x00, g: 0xff, b: 0x88 };
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

const STAR_COUNT: u32 = 50;

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f64 = 2.0;

/// Share of the terminal the play field may occupy.
const FIT_FRACTION: f64 = 0.9;

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Where the play field sits on the terminal, and how big a cell is in
/// field units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub col: u16,
    pub row: u16,
    pub cols: u16,
    pub rows: u16,
    field_width: f64,
    field_height: f64,
}

impl Viewport {
    /// Largest field-shaped area within 90% of the terminal, centred.
    pub fn fit(term_cols: u16, term_rows: u16, field_width: f64, field_height: f64) -> Self {
        let max_cols = (term_cols as f64 * FIT_FRACTION).floor();
        let max_rows = (term_rows as f64 * FIT_FRACTION).floor();

        let mut cols = max_cols;
        let mut rows = cols * field_height / (field_width * CELL_ASPECT);
        if rows > max_rows {
            rows = max_rows;
            cols = rows * field_width * CELL_ASPECT / field_height;
        }

        let cols = (cols.floor() as u16).max(1);
        let rows = (rows.floor() as u16).max(1);
        Self {
            col: term_cols.saturating_sub(cols) / 2,
            row: term_rows.saturating_sub(rows) / 2,
            cols,
            rows,
            field_width,
            field_height,
        }
    }

    /// Cell under a field point, or `None` when it lies outside the field.
    pub fn to_cell(&self, x: f64, y: f64) -> Option<(u16, u16)> {
        if x < 0.0 || y < 0.0 || x >= self.field_width || y >= self.field_height {
            return None;
        }
        let c = (x / self.field_width * self.cols as f64).floor() as u16;
        let r = (y / self.field_height * self.rows as f64).floor() as u16;
        Some((self.col + c.min(self.cols - 1), self.row + r.min(self.rows - 1)))
    }

    /// Field point under a terminal cell, for pointer tracking.
    pub fn to_field(&self, col: u16, row: u16) -> (f64, f64) {
        let c = col.saturating_sub(self.col) as f64 + 0.5;
        let r = row.saturating_sub(self.row) as f64 + 0.5;
        (
            c / self.cols as f64 * self.field_width,
            r / self.rows as f64 * self.field_height,
        )
    }

    /// Cell span (first col, last col, first row, last row) of a box,
    /// clipped to the field.  At least one cell when any part is visible.
    fn span(&self, x: f64, y: f64, w: f64, h: f64) -> Option<(u16, u16, u16, u16)> {
        if x + w <= 0.0 || y + h <= 0.0 || x >= self.field_width || y >= self.field_height {
            return None;
        }
        let cols = self.cols as f64;
        let rows = self.rows as f64;
        let c0 = (x.max(0.0) / self.field_width * cols).floor();
        let r0 = (y.max(0.0) / self.field_height * rows).floor();
        let c1 = ((x + w).min(self.field_width) / self.field_width * cols).ceil() - 1.0;
        let r1 = ((y + h).min(self.field_height) / self.field_height * rows).ceil() - 1.0;
        Some((
            self.col + c0 as u16,
            self.col + c1.max(c0) as u16,
            self.row + r0 as u16,
            self.row + r1.max(r0) as u16,
        ))
    }
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one in-game frame (playing, paused or game over).
pub fn render<W: Write>(out: &mut W, view: &FrameView, vp: &Viewport) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_background(out, vp, view.star_phase)?;

    for enemy in view.enemies {
        draw_enemy(out, enemy, vp)?;
    }
    for bullet in view.bullets {
        draw_bullet(out, bullet, vp)?;
    }
    if let Some(player) = view.player {
        draw_player(out, player, vp)?;
    }

    draw_hud(out, &view.hud, vp, view.field_width, view.field_height)?;

    match view.hud.phase {
        GamePhase::Paused => draw_paused(out, vp)?,
        GamePhase::GameOver => draw_game_over(out, &view.hud, vp)?,
        _ => {}
    }

    finish(out, vp)
}

/// Loading screen with a percentage readout.
pub fn render_loading<W: Write>(out: &mut W, vp: &Viewport, percent: u8) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    draw_background(out, vp, 0)?;
    let lines: &[(&str, Color)] = &[("LOADING", C_HUD)];
    draw_centered(out, vp, lines)?;
    let pct = format!("{percent}%");
    let cx = vp.col + vp.cols / 2;
    let cy = vp.row + vp.rows / 2 + 1;
    out.queue(cursor::MoveTo(cx.saturating_sub(pct.len() as u16 / 2), cy))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(pct))?;
    finish(out, vp)
}

pub fn render_start_screen<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    draw_background(out, vp, 0)?;
    let lines: &[(&str, Color)] = &[
        ("★  STARFALL  ★", Color::Cyan),
        ("", C_HINT),
        ("← → / A D : Move", C_HINT),
        ("SPACE / W : Shoot", C_HINT),
        ("ESC : Pause   Q : Quit", C_HINT),
        ("", C_HINT),
        ("[ ENTER or click to start ]", Color::Yellow),
    ];
    draw_centered(out, vp, lines)?;
    finish(out, vp)
}

// ── Backdrop ──────────────────────────────────────────────────────────────────

fn lerp_channel(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t).round() as u8
}

/// Two-stop vertical gradient plus a drifting star field.
fn draw_background<W: Write>(out: &mut W, vp: &Viewport, star_phase: u32) -> std::io::Result<()> {
    let blank = " ".repeat(vp.cols as usize);
    for r in 0..vp.rows {
        let t = if vp.rows > 1 {
            r as f64 / (vp.rows - 1) as f64
        } else {
            0.0
        };
        let bg = Color::Rgb {
            r: lerp_channel(C_SKY_TOP.0, C_SKY_BOTTOM.0, t),
            g: lerp_channel(C_SKY_TOP.1, C_SKY_BOTTOM.1, t),
            b: lerp_channel(C_SKY_TOP.2, C_SKY_BOTTOM.2, t),
        };
        out.queue(cursor::MoveTo(vp.col, vp.row + r))?;
        out.queue(style::SetBackgroundColor(bg))?;
        out.queue(Print(&blank))?;
    }
    out.queue(style::ResetColor)?;

    out.queue(style::SetForegroundColor(C_STAR))?;
    for i in 0..STAR_COUNT {
        let x = (i as f64 * 73.0 + star_phase as f64 * 0.1) % vp.field_width;
        let y = (i as f64 * 37.0) % vp.field_height;
        let glyph = match i % 3 {
            0 => "·",
            1 => "•",
            _ => "*",
        };
        if let Some((c, r)) = vp.to_cell(x, y) {
            out.queue(cursor::MoveTo(c, r))?;
            out.queue(Print(glyph))?;
        }
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, p: &Player, vp: &Viewport) -> std::io::Result<()> {
    // Upward triangle: apex on the top row, widening to a flat base.
    //     ▲
    //    / \
    //   /___\
    let Some((c0, c1, r0, r1)) = vp.span(p.x, p.y, p.width, p.height) else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    draw_triangle(out, c0, c1, r0, r1, true)
}

fn draw_enemy<W: Write>(out: &mut W, e: &Enemy, vp: &Viewport) -> std::io::Result<()> {
    // Downward triangle, apex on the bottom row.
    let Some((c0, c1, r0, r1)) = vp.span(e.x, e.y, e.width, e.height) else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(C_ENEMY))?;
    draw_triangle(out, c0, c1, r0, r1, false)
}

fn draw_triangle<W: Write>(
    out: &mut W,
    c0: u16,
    c1: u16,
    r0: u16,
    r1: u16,
    pointing_up: bool,
) -> std::io::Result<()> {
    let mid = c0 + (c1 - c0) / 2;
    let rows = r1 - r0 + 1;
    let half = (c1 - c0) / 2;

    if rows == 1 || half == 0 {
        out.queue(cursor::MoveTo(mid, r0))?;
        out.queue(Print(if pointing_up { "▲" } else { "▼" }))?;
        return Ok(());
    }

    for k in 0..rows {
        // k = 0 is the apex row
        let row = if pointing_up { r0 + k } else { r1 - k };
        let spread = (half as u32 * k as u32 / (rows - 1) as u32) as u16;
        if k == 0 {
            out.queue(cursor::MoveTo(mid, row))?;
            out.queue(Print(if pointing_up { "▲" } else { "▼" }))?;
            continue;
        }
        let base = k == rows - 1;
        let (left, right) = if pointing_up { ("/", "\\") } else { ("\\", "/") };
        let fill = if base && pointing_up { "_" } else if base { "‾" } else { " " };
        let inner = (spread * 2).saturating_sub(1) as usize;
        out.queue(cursor::MoveTo(mid - spread, row))?;
        out.queue(Print(format!("{left}{}{right}", fill.repeat(inner))))?;
    }
    Ok(())
}

fn draw_bullet<W: Write>(out: &mut W, b: &Bullet, vp: &Viewport) -> std::io::Result<()> {
    let Some((c0, c1, r0, r1)) = vp.span(b.x, b.y, b.width, b.height) else {
        return Ok(());
    };
    let color = if b.is_player_bullet {
        C_BULLET_PLAYER
    } else {
        C_BULLET_ENEMY
    };
    out.queue(style::SetForegroundColor(color))?;
    let bar = "█".repeat((c1 - c0 + 1) as usize);
    for r in r0..=r1 {
        out.queue(cursor::MoveTo(c0, r))?;
        out.queue(Print(&bar))?;
    }
    Ok(())
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    hud: &Hud,
    vp: &Viewport,
    field_width: f64,
    field_height: f64,
) -> std::io::Result<()> {
    let top = vp.row.saturating_sub(1);

    out.queue(cursor::MoveTo(vp.col, top))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {:>6}", hud.score)))?;

    let lives_text = format!("Lives: {}", "♥".repeat(hud.lives as usize));
    let lx = (vp.col + vp.cols).saturating_sub(lives_text.chars().count() as u16);
    out.queue(cursor::MoveTo(lx, top))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_text))?;

    if hud.debug {
        let lines = [
            format!("FPS: {}", hud.fps),
            format!("State: {}", hud.phase),
            format!("Field: {field_width}x{field_height}"),
            format!("Enemies: {}  Bullets: {}", hud.enemy_count, hud.bullet_count),
        ];
        out.queue(style::SetForegroundColor(C_HUD))?;
        for (i, line) in lines.iter().enumerate() {
            out.queue(cursor::MoveTo(vp.col + 1, vp.row + i as u16))?;
            out.queue(Print(line))?;
        }
    }
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_paused<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    let lines: &[(&str, Color)] = &[
        ("╔══════════════════╗", Color::Cyan),
        ("║      PAUSED      ║", Color::Cyan),
        ("╚══════════════════╝", Color::Cyan),
        ("Q - Quit", Color::White),
    ];
    draw_centered(out, vp, lines)
}

fn draw_game_over<W: Write>(out: &mut W, hud: &Hud, vp: &Viewport) -> std::io::Result<()> {
    let score_line = format!("Final Score: {}", hud.score);
    let lines: &[(&str, Color)] = &[
        ("╔══════════════════╗", Color::Red),
        ("║    GAME  OVER    ║", Color::Red),
        ("╚══════════════════╝", Color::Red),
        (&score_line, Color::Yellow),
        ("Q - Quit", Color::White),
    ];
    draw_centered(out, vp, lines)
}

fn draw_centered<W: Write>(out: &mut W, vp: &Viewport, lines: &[(&str, Color)]) -> std::io::Result<()> {
    let cx = vp.col + vp.cols / 2;
    let start_row = (vp.row + vp.rows / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}

fn finish<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    // Park cursor below the field and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, vp.row + vp.rows))?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use starfall::{GameConfig, Simulation};

    #[test]
    fn fit_is_limited_by_height_on_wide_terminals() {
        // 800x600 field → 2.667 cols per row
        let vp = Viewport::fit(200, 50, 800.0, 600.0);
        assert_eq!(vp.rows, 45);
        assert_eq!(vp.cols, 120);
        assert_eq!(vp.col, 40);
        assert_eq!(vp.row, 2);
    }

    #[test]
    fn fit_is_limited_by_width_on_narrow_terminals() {
        let vp = Viewport::fit(80, 60, 800.0, 600.0);
        assert_eq!(vp.cols, 72);
        assert_eq!(vp.rows, 27);
    }

    #[test]
    fn to_cell_maps_corners_and_rejects_outside() {
        let vp = Viewport::fit(200, 50, 800.0, 600.0);
        assert_eq!(vp.to_cell(0.0, 0.0), Some((vp.col, vp.row)));
        assert_eq!(
            vp.to_cell(799.9, 599.9),
            Some((vp.col + vp.cols - 1, vp.row + vp.rows - 1))
        );
        assert_eq!(vp.to_cell(-1.0, 10.0), None);
        assert_eq!(vp.to_cell(10.0, 600.0), None);
    }

    #[test]
    fn to_field_round_trips_cell_centre() {
        let vp = Viewport::fit(200, 50, 800.0, 600.0);
        let (x, y) = vp.to_field(vp.col + 10, vp.row + 5);
        assert_eq!(vp.to_cell(x, y), Some((vp.col + 10, vp.row + 5)));
    }

    #[test]
    fn render_writes_hud_text() {
        let mut sim = Simulation::with_seed(GameConfig::default(), 1);
        sim.on_assets_loaded();
        sim.start_game(0.0);
        let vp = Viewport::fit(120, 40, 800.0, 600.0);
        let mut buf: Vec<u8> = Vec::new();
        render(&mut buf, &sim.view(), &vp).unwrap();
        let text = String::from_utf8_lossy(&buf);
        assert!(text.contains("Score:"));
        assert!(text.contains("State: playing"));
        assert!(text.contains("▲"));
    }

    #[test]
    fn render_shows_game_over_overlay() {
        let mut sim = Simulation::with_seed(GameConfig::default(), 1);
        sim.start_game(0.0);
        let mut view = sim.view();
        view.hud.lives = 0;
        view.hud.phase = GamePhase::GameOver;
        let vp = Viewport::fit(120, 40, 800.0, 600.0);
        let mut buf: Vec<u8> = Vec::new();
        render(&mut buf, &view, &vp).unwrap();
        assert!(String::from_utf8_lossy(&buf).contains("GAME  OVER"));
    }
}
