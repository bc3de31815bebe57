/// Rendering layer: all terminal I/O lives here.
///
/// Each call receives a mutable writer and an immutable view of the canvas
/// the game core drew into. No game logic is performed; playfield
/// coordinates are scaled onto whatever terminal size is current.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use wave_shooter::config::Rules;
use wave_shooter::entities::EnemyKind;
use wave_shooter::stage::{Canvas, Placed, SpriteKind, TextField};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_HP: Color = Color::Red;
const C_HUD_WAVE: Color = Color::White;
const C_HUD_SCORE: Color = Color::Yellow;
const C_PLAYER: Color = Color::White;
const C_ENEMY_NORMAL: Color = Color::Green;
const C_ENEMY_FAST: Color = Color::Magenta;
const C_ENEMY_TANK: Color = Color::DarkYellow;
const C_ENEMY_BOSS: Color = Color::Red;
const C_BULLET: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;
const C_TITLE: Color = Color::Cyan;
const C_BUTTON: Color = Color::White;
const C_BANNER: Color = Color::Red;

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, canvas: &Canvas, rules: &Rules) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    if canvas.buttons_visible() {
        draw_start_screen(out, canvas, width, height)?;
    } else {
        draw_border(out, width, height)?;
        for placed in canvas.sprites() {
            draw_sprite(out, placed, rules, width, height)?;
        }
        draw_hud(out, canvas, width)?;
        if let Some(banner) = canvas.text(TextField::Banner) {
            print_centered(out, height / 2, banner, C_BANNER, width)?;
        }
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn print_at<W: Write>(out: &mut W, col: u16, row: u16, text: &str, color: Color) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn print_centered<W: Write>(out: &mut W, row: u16, text: &str, color: Color, width: u16) -> std::io::Result<()> {
    let col = (width / 2).saturating_sub(text.chars().count() as u16 / 2);
    print_at(out, col, row, text, color)
}

// ── Start screen ──────────────────────────────────────────────────────────────

fn draw_start_screen<W: Write>(out: &mut W, canvas: &Canvas, width: u16, height: u16) -> std::io::Result<()> {
    let cy = height / 2;

    if let Some(title) = canvas.text(TextField::Title) {
        print_centered(out, cy.saturating_sub(5), &format!("★  {}  ★", title.to_uppercase()), C_TITLE, width)?;
    }

    // High score, top right
    if let Some(best) = canvas.text(TextField::HighScore) {
        let col = width.saturating_sub(best.chars().count() as u16 + 1);
        print_at(out, col, 0, best, C_HUD_SCORE)?;
    }

    print_centered(out, cy.saturating_sub(1), "[  Start  (Enter)  ]", C_BUTTON, width)?;
    print_centered(out, cy + 1, "[  Exit   (Esc)    ]", C_BUTTON, width)?;

    if let Some(hint) = canvas.text(TextField::Controls) {
        print_centered(out, height.saturating_sub(2), hint, C_HINT, width)?;
    }
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;
    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1: top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-1: bottom bar
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..height.saturating_sub(1) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, canvas: &Canvas, width: u16) -> std::io::Result<()> {
    if let Some(hp) = canvas.text(TextField::Hp) {
        print_at(out, 1, 0, hp, C_HUD_HP)?;
    }
    if let Some(wave) = canvas.text(TextField::Wave) {
        print_centered(out, 0, wave, C_HUD_WAVE, width)?;
    }
    if let Some(score) = canvas.text(TextField::Score) {
        let col = width.saturating_sub(score.chars().count() as u16 + 1);
        print_at(out, col, 0, score, C_HUD_SCORE)?;
    }
    Ok(())
}

// ── Sprites ───────────────────────────────────────────────────────────────────

fn glyph(placed: &Placed) -> (&'static str, Color) {
    let odd = placed.sprite.frame % 2 == 1;
    match placed.sprite.kind {
        SpriteKind::Player => (if odd { "/△\\" } else { "/▲\\" }, C_PLAYER),
        SpriteKind::Bullet => ("║", C_BULLET),
        SpriteKind::Enemy(EnemyKind::Normal) => ("«▼»", C_ENEMY_NORMAL),
        SpriteKind::Enemy(EnemyKind::Fast) => (if odd { ">◆<" } else { "<◆>" }, C_ENEMY_FAST),
        SpriteKind::Enemy(EnemyKind::Tank) => ("[■]", C_ENEMY_TANK),
        SpriteKind::Enemy(EnemyKind::Boss) => (if odd { ">(◉)<" } else { "<(◎)>" }, C_ENEMY_BOSS),
    }
}

/// Scales a playfield position into the bordered area (rows 2..h-1).
/// `None` when the sprite is outside the playfield.
fn to_cell(placed: &Placed, rules: &Rules, width: u16, height: u16) -> Option<(u16, u16)> {
    let pos = placed.pos;
    if pos.x < 0.0 || pos.x > rules.width || pos.y < 0.0 || pos.y > rules.height {
        return None;
    }
    let inner_w = width.saturating_sub(2).max(1) as f32;
    let inner_h = height.saturating_sub(3).max(1) as f32;
    let col = 1 + ((pos.x / rules.width) * (inner_w - 1.0)).round() as u16;
    let row = 2 + ((pos.y / rules.height) * (inner_h - 1.0)).round() as u16;
    Some((col, row))
}

fn draw_sprite<W: Write>(
    out: &mut W,
    placed: &Placed,
    rules: &Rules,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let Some((col, row)) = to_cell(placed, rules, width, height) else {
        return Ok(());
    };
    let (text, color) = glyph(placed);
    let half = text.chars().count() as u16 / 2;
    let col = col.saturating_sub(half).max(1);
    print_at(out, col, row, text, color)
}
