pub mod flappy;
pub mod guess;
pub mod pacman;
pub mod rps;
pub mod snake;
pub mod tictactoe;

use ratatui::style::Color;

use crate::module::GameModule;

/// The bundled games. Each one is reached only through its module export
/// table; this type carries the per-game wiring the shell needs around it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameKind {
    GuessTheNumber,
    TicTacToe,
    Snake,
    Pacman,
    FlappyBird,
    RockPaperScissors,
}

impl GameKind {
    pub fn all() -> &'static [GameKind] {
        &[
            GameKind::GuessTheNumber,
            GameKind::TicTacToe,
            GameKind::Snake,
            GameKind::Pacman,
            GameKind::FlappyBird,
            GameKind::RockPaperScissors,
        ]
    }

    /// Registry key for the module.
    pub fn module_name(self) -> &'static str {
        match self {
            GameKind::GuessTheNumber => "GuessTheNumber",
            GameKind::TicTacToe => "TicTacToe",
            GameKind::Snake => "Snake",
            GameKind::Pacman => "Pacman",
            GameKind::FlappyBird => "FlappyBird",
            GameKind::RockPaperScissors => "RockPaperScissors",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            GameKind::GuessTheNumber => "Guess The Number",
            GameKind::TicTacToe => "Tic Tac Toe",
            GameKind::Snake => "Snake",
            GameKind::Pacman => "Pacman",
            GameKind::FlappyBird => "Flappy Bird",
            GameKind::RockPaperScissors => "Rock Paper Scissors",
        }
    }

    pub fn short_title(self) -> &'static str {
        match self {
            GameKind::GuessTheNumber => "Guess",
            GameKind::TicTacToe => "TicTacToe",
            GameKind::RockPaperScissors => "RPS",
            GameKind::FlappyBird => "Flappy",
            other => other.title(),
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            GameKind::GuessTheNumber => "🔢",
            GameKind::TicTacToe => "❌",
            GameKind::Snake => "🐍",
            GameKind::Pacman => "👻",
            GameKind::FlappyBird => "🐦",
            GameKind::RockPaperScissors => "✊",
        }
    }

    pub fn tagline(self) -> &'static str {
        match self {
            GameKind::GuessTheNumber => "Find the secret\nin few tries!",
            GameKind::TicTacToe => "Three in a row\nfor two players!",
            GameKind::Snake => "Eat, grow and\ndon't bite yourself!",
            GameKind::Pacman => "Clear the maze,\ndodge the ghosts!",
            GameKind::FlappyBird => "Flap through\nthe pipes!",
            GameKind::RockPaperScissors => "Outguess the\ncomputer!",
        }
    }

    pub fn color(self) -> Color {
        match self {
            GameKind::GuessTheNumber => Color::Rgb(80, 160, 255),
            GameKind::TicTacToe => Color::Rgb(80, 220, 120),
            GameKind::Snake => Color::Rgb(80, 220, 80),
            GameKind::Pacman => Color::Rgb(255, 220, 60),
            GameKind::FlappyBird => Color::Rgb(255, 160, 60),
            GameKind::RockPaperScissors => Color::Rgb(200, 120, 255),
        }
    }

    /// Persisted best-score key.
    /// Key under which the best score is saved. Games that report no score,
    /// or never end, keep none.
    pub fn score_key(self) -> Option<&'static str> {
        match self {
            GameKind::Snake => Some("snake_best"),
            GameKind::Pacman => Some("pacman_best"),
            GameKind::FlappyBird => Some("flappy_best"),
            GameKind::GuessTheNumber | GameKind::TicTacToe | GameKind::RockPaperScissors => None,
        }
    }

    /// Minimum time between simulation steps; `None` steps every frame.
    pub fn default_tick_ms(self) -> Option<u64> {
        match self {
            GameKind::Snake => Some(120),
            GameKind::Pacman => Some(100),
            GameKind::FlappyBird => Some(50),
            _ => None,
        }
    }

    /// Board size assumed when the module does not export its dimensions.
    pub fn fallback_size(self) -> (i32, i32) {
        match self {
            GameKind::Snake => (20, 20),
            GameKind::Pacman => (19, 21),
            GameKind::FlappyBird => (28, 20),
            GameKind::TicTacToe => (3, 3),
            GameKind::GuessTheNumber | GameKind::RockPaperScissors => (0, 0),
        }
    }

    /// Number of stat slots the view reads back each frame.
    pub fn stat_slots(self) -> usize {
        match self {
            GameKind::TicTacToe => 2,
            GameKind::RockPaperScissors => rps::STAT_SLOTS,
            GameKind::GuessTheNumber => guess::STAT_SLOTS,
            _ => 0,
        }
    }

    pub fn instantiate(self) -> Box<dyn GameModule> {
        match self {
            GameKind::GuessTheNumber => Box::new(guess::GuessTheNumber::new()),
            GameKind::TicTacToe => Box::new(tictactoe::TicTacToe::new()),
            GameKind::Snake => Box::new(snake::Snake::new()),
            GameKind::Pacman => Box::new(pacman::Pacman::new()),
            GameKind::FlappyBird => Box::new(flappy::FlappyBird::new()),
            GameKind::RockPaperScissors => Box::new(rps::RockPaperScissors::new()),
        }
    }

    /// Looks a game up by module name or title, ignoring case and spacing.
    pub fn from_name(name: &str) -> Option<GameKind> {
        let wanted: String = name
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        GameKind::all().iter().copied().find(|kind| {
            kind.module_name().eq_ignore_ascii_case(&wanted)
                || kind.short_title().eq_ignore_ascii_case(&wanted)
        })
    }
}
