pub mod game;
pub mod home;
pub mod tabs;

use ratatui::prelude::*;

use crate::app::{App, Tab};
use cellcade::games::GameKind;

pub const KEY_COLOR: Color = Color::Rgb(80, 200, 255);
pub const DIM: Color = Color::Rgb(140, 140, 140);
pub const ACCENT: Color = Color::Rgb(255, 220, 80);
pub const PANEL_BG: Color = Color::Rgb(15, 15, 25);

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),   // Content
        ])
        .split(frame.area());

    tabs::render_tabs(frame, app, chunks[0]);

    match app.current_tab {
        Tab::Home => home::render_home(
            frame,
            chunks[1],
            app.selected_game,
            app.show_high_scores,
            &app.best_scores,
        ),
        Tab::Game(_) => {
            if let Some(view) = app.view.as_mut() {
                game::render_game(frame, chunks[1], view, app.show_debug);
            }
        }
    }
}

/// One `keys  description` row of a controls panel.
pub fn key_hint(keys: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("    {:<17}", keys), Style::default().fg(KEY_COLOR)),
        Span::styled(desc.to_string(), Style::default().fg(DIM)),
    ])
}

pub fn controls(kind: GameKind) -> &'static [(&'static str, &'static str)] {
    match kind {
        GameKind::GuessTheNumber => &[
            ("0-9", "Type a guess"),
            ("Enter", "Submit guess"),
            ("Backspace", "Erase digit"),
            ("E / N / H", "Difficulty, next round"),
            ("R / F5", "New round"),
        ],
        GameKind::TicTacToe => &[
            ("1-9", "Place mark"),
            ("Click", "Place mark"),
            ("R / F5", "Restart"),
        ],
        GameKind::Snake => &[
            ("↑ ↓ ← → / WASD", "Steer"),
            ("F3", "Single step"),
            ("R / F5", "Restart"),
        ],
        GameKind::Pacman => &[
            ("↑ ↓ ← → / WASD", "Move"),
            ("F3", "Single step"),
            ("R / F5", "Restart"),
        ],
        GameKind::FlappyBird => &[
            ("Space / ↑ / W", "Flap"),
            ("Click", "Flap"),
            ("F3", "Single step"),
            ("R / F5", "Restart"),
        ],
        GameKind::RockPaperScissors => &[
            ("R / P / S", "Rock / Paper / Scissors"),
            ("1 / 2 / 3", "Rock / Paper / Scissors"),
            ("N / Space", "Next round"),
            ("F5", "Reset tallies"),
        ],
    }
}

/// A centered rectangle of at most `w` x `h` inside `area`.
pub fn centered(area: Rect, w: u16, h: u16) -> Rect {
    let w = w.min(area.width);
    let h = h.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}
