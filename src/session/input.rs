use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::games::{guess, rps, GameKind};

/// Something the player asked a session to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Forwarded to the module's `set_input`.
    Code(i32),
    /// Forwarded to the module's `set_option`; takes effect on restart.
    Option(i32),
    /// Start a fresh round. Accepted in every phase.
    Restart,
    /// Advance the simulation by exactly one tick.
    Step,
}

// 0=Up, 1=Right, 2=Down, 3=Left
fn direction(code: KeyCode) -> Option<i32> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(0),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(1),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(2),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(3),
        _ => None,
    }
}

/// Maps a key press to an action for `kind`.
///
/// Guess-the-Number digit entry is text editing and is handled by the view;
/// only its difficulty keys are mapped here.
pub fn key_action(kind: GameKind, key: KeyEvent) -> Option<Action> {
    if !key.modifiers.difference(KeyModifiers::SHIFT).is_empty() {
        return None;
    }
    match key.code {
        KeyCode::F(5) => return Some(Action::Restart),
        KeyCode::F(3) => return Some(Action::Step),
        // `r` is rock in RPS, whatever the case.
        KeyCode::Char('r') | KeyCode::Char('R') if kind != GameKind::RockPaperScissors => {
            return Some(Action::Restart)
        }
        _ => {}
    }

    match kind {
        GameKind::Snake | GameKind::Pacman => direction(key.code).map(Action::Code),
        GameKind::FlappyBird => match key.code {
            KeyCode::Char(' ') | KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                Some(Action::Code(0))
            }
            _ => None,
        },
        GameKind::TicTacToe => match key.code {
            KeyCode::Char(c @ '1'..='9') => Some(Action::Code(c as i32 - '1' as i32)),
            _ => None,
        },
        GameKind::RockPaperScissors => match key.code {
            KeyCode::Char('r' | 'R' | '1') => Some(Action::Code(rps::ROCK)),
            KeyCode::Char('p' | 'P' | '2') => Some(Action::Code(rps::PAPER)),
            KeyCode::Char('s' | 'S' | '3') => Some(Action::Code(rps::SCISSORS)),
            KeyCode::Char('n' | 'N' | ' ') => Some(Action::Code(rps::NEW_ROUND)),
            _ => None,
        },
        GameKind::GuessTheNumber => match key.code {
            KeyCode::Char('e') => Some(Action::Option(guess::EASY)),
            KeyCode::Char('n') => Some(Action::Option(guess::NORMAL)),
            KeyCode::Char('h') => Some(Action::Option(guess::HARD)),
            _ => None,
        },
    }
}

/// Maps a primary pointer press to an action. `cell` is the board cell under
/// the pointer, if any.
pub fn pointer_action(kind: GameKind, cell: Option<usize>) -> Option<Action> {
    match kind {
        GameKind::FlappyBird => Some(Action::Code(0)),
        GameKind::TicTacToe => cell.map(|i| Action::Code(i as i32)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_wasd_agree() {
        for (arrow, letter, dir) in [
            (KeyCode::Up, 'w', 0),
            (KeyCode::Right, 'd', 1),
            (KeyCode::Down, 's', 2),
            (KeyCode::Left, 'a', 3),
        ] {
            assert_eq!(key_action(GameKind::Snake, press(arrow)), Some(Action::Code(dir)));
            assert_eq!(
                key_action(GameKind::Pacman, press(KeyCode::Char(letter))),
                Some(Action::Code(dir))
            );
        }
    }

    #[test]
    fn r_is_rock_only_in_rps() {
        assert_eq!(
            key_action(GameKind::RockPaperScissors, press(KeyCode::Char('r'))),
            Some(Action::Code(rps::ROCK))
        );
        assert_eq!(
            key_action(GameKind::RockPaperScissors, KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT)),
            Some(Action::Code(rps::ROCK))
        );
        assert_eq!(key_action(GameKind::Snake, press(KeyCode::Char('r'))), Some(Action::Restart));
        assert_eq!(key_action(GameKind::Snake, press(KeyCode::Char('R'))), Some(Action::Restart));
        assert_eq!(
            key_action(GameKind::RockPaperScissors, press(KeyCode::F(5))),
            Some(Action::Restart)
        );
    }

    #[test]
    fn number_keys_pick_cells() {
        assert_eq!(key_action(GameKind::TicTacToe, press(KeyCode::Char('1'))), Some(Action::Code(0)));
        assert_eq!(key_action(GameKind::TicTacToe, press(KeyCode::Char('9'))), Some(Action::Code(8)));
        assert_eq!(key_action(GameKind::TicTacToe, press(KeyCode::Char('0'))), None);
    }

    #[test]
    fn control_chords_are_not_game_input() {
        let ctrl_w = KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL);
        assert_eq!(key_action(GameKind::Snake, ctrl_w), None);
    }

    #[test]
    fn pointer_flaps_anywhere() {
        assert_eq!(pointer_action(GameKind::FlappyBird, None), Some(Action::Code(0)));
        assert_eq!(pointer_action(GameKind::TicTacToe, None), None);
        assert_eq!(pointer_action(GameKind::TicTacToe, Some(4)), Some(Action::Code(4)));
        assert_eq!(pointer_action(GameKind::Snake, Some(4)), None);
    }
}
