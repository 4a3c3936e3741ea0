//! Maps the raw character codes a module reports per board cell to the
//! visual categories the board renderer draws.
//!
//! Each game has a closed set of codes. `0`, space, anything outside
//! `0..=255` and anything a game does not define all read as [`Cell::Empty`].

use log::trace;
use ratatui::style::{Color, Modifier, Style};

use crate::games::GameKind;

const BACKGROUND: Color = Color::Rgb(12, 12, 22);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Wall,
    Pellet,
    PowerPellet,
    Pacman,
    Ghost,
    SnakeBody,
    Food,
    Pipe,
    Bird,
    MarkX,
    MarkO,
}

/// Classifies `code` for `kind`. Pure and total: never panics, and unknown
/// codes degrade to [`Cell::Empty`].
pub fn classify(kind: GameKind, code: i32) -> Cell {
    let Ok(byte) = u8::try_from(code) else {
        return Cell::Empty;
    };
    match (kind, byte) {
        (_, 0 | b' ') => Cell::Empty,

        (GameKind::Snake, b'S') => Cell::SnakeBody,
        (GameKind::Snake, b'F') => Cell::Food,

        (GameKind::Pacman, b'#') => Cell::Wall,
        (GameKind::Pacman, b'.') => Cell::Pellet,
        (GameKind::Pacman, b'o') => Cell::PowerPellet,
        (GameKind::Pacman, b'P') => Cell::Pacman,
        (GameKind::Pacman, b'G') => Cell::Ghost,

        (GameKind::FlappyBird, b'#') => Cell::Pipe,
        (GameKind::FlappyBird, b'B') => Cell::Bird,

        (GameKind::TicTacToe, b'X') => Cell::MarkX,
        (GameKind::TicTacToe, b'O') => Cell::MarkO,

        _ => {
            trace!("{}: unknown cell code {} ({:?})", kind.module_name(), code, byte as char);
            Cell::Empty
        }
    }
}

impl Cell {
    /// Two-column glyph used on grid boards.
    pub fn glyph(self) -> &'static str {
        match self {
            Cell::Empty => "  ",
            Cell::Wall => "██",
            Cell::Pellet => " ·",
            Cell::PowerPellet => " ●",
            Cell::Pacman => "ᗧ ",
            Cell::Ghost => "ᗣ ",
            Cell::SnakeBody => "▓▓",
            Cell::Food => "◆ ",
            Cell::Pipe => "██",
            Cell::Bird => "🐦",
            Cell::MarkX => "X",
            Cell::MarkO => "O",
        }
    }

    pub fn style(self) -> Style {
        let base = Style::default().bg(BACKGROUND);
        match self {
            Cell::Empty => base,
            Cell::Wall => base.fg(Color::Rgb(40, 70, 200)),
            Cell::Pellet => base.fg(Color::Rgb(255, 210, 120)),
            Cell::PowerPellet => base
                .fg(Color::Rgb(255, 210, 120))
                .add_modifier(Modifier::BOLD),
            Cell::Pacman => base
                .fg(Color::Rgb(255, 230, 40))
                .add_modifier(Modifier::BOLD),
            Cell::Ghost => base
                .fg(Color::Rgb(255, 90, 90))
                .add_modifier(Modifier::BOLD),
            Cell::SnakeBody => base.fg(Color::Rgb(60, 220, 130)),
            Cell::Food => base
                .fg(Color::Rgb(245, 160, 30))
                .add_modifier(Modifier::BOLD),
            Cell::Pipe => base.fg(Color::Rgb(70, 190, 70)),
            Cell::Bird => base,
            Cell::MarkX => base
                .fg(Color::Rgb(255, 110, 110))
                .add_modifier(Modifier::BOLD),
            Cell::MarkO => base
                .fg(Color::Rgb(110, 170, 255))
                .add_modifier(Modifier::BOLD),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_codes_are_empty_everywhere() {
        for kind in GameKind::all() {
            assert_eq!(classify(*kind, 0), Cell::Empty);
            assert_eq!(classify(*kind, 32), Cell::Empty);
            assert_eq!(classify(*kind, -1), Cell::Empty);
            assert_eq!(classify(*kind, 256), Cell::Empty);
        }
    }

    #[test]
    fn same_code_means_different_things_per_game() {
        assert_eq!(classify(GameKind::Pacman, '#' as i32), Cell::Wall);
        assert_eq!(classify(GameKind::FlappyBird, '#' as i32), Cell::Pipe);
        assert_eq!(classify(GameKind::Snake, '#' as i32), Cell::Empty);
    }

    #[test]
    fn pacman_codes() {
        let codes = ['.', 'o', 'P', 'G'].map(|c| classify(GameKind::Pacman, c as i32));
        assert_eq!(codes, [Cell::Pellet, Cell::PowerPellet, Cell::Pacman, Cell::Ghost]);
    }
}
