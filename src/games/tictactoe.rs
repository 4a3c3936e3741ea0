use crate::error::ModuleFault;
use crate::module::{Capabilities, GameModule, Op};

const EMPTY: u8 = b' ';
const DRAW: u8 = b'D';

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Stat slot holding the player to move, as a character code.
pub const STAT_CURRENT_PLAYER: i32 = 0;
/// Stat slot holding `X`, `O`, `D` for a draw, or 0 while undecided.
pub const STAT_WINNER: i32 = 1;

/// Two players alternate on one board. Purely input-driven: no tick.
pub struct TicTacToe {
    board: [u8; 9],
    current: u8,
    moves: u32,
}

impl TicTacToe {
    pub fn new() -> Self {
        Self {
            board: [EMPTY; 9],
            current: b'X',
            moves: 0,
        }
    }

    fn winner(&self) -> u8 {
        for [a, b, c] in LINES {
            let mark = self.board[a];
            if mark != EMPTY && mark == self.board[b] && mark == self.board[c] {
                return mark;
            }
        }
        if self.moves == 9 {
            return DRAW;
        }
        0
    }

    fn make_move(&mut self, index: i32) -> bool {
        let Some(slot) = usize::try_from(index).ok().filter(|i| *i < 9) else {
            return false;
        };
        if self.winner() != 0 || self.board[slot] != EMPTY {
            return false;
        }
        self.board[slot] = self.current;
        self.moves += 1;
        if self.winner() == 0 {
            self.current = if self.current == b'X' { b'O' } else { b'X' };
        }
        true
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl GameModule for TicTacToe {
    fn capabilities(&self) -> Capabilities {
        Capabilities::of(&[
            Op::Start,
            Op::Reset,
            Op::SetInput,
            Op::Width,
            Op::Height,
            Op::Cell,
            Op::GameOver,
            Op::Stat,
        ])
    }

    fn start(&mut self) -> Result<(), ModuleFault> {
        *self = Self::new();
        Ok(())
    }

    fn reset(&mut self) -> Result<(), ModuleFault> {
        self.start()
    }

    /// Places the current player's mark on cell `index` (0..9, row-major).
    /// Occupied cells and moves after the game is decided are ignored.
    fn set_input(&mut self, index: i32) -> Result<(), ModuleFault> {
        self.make_move(index);
        Ok(())
    }

    fn width(&mut self) -> Result<i32, ModuleFault> {
        Ok(3)
    }

    fn height(&mut self) -> Result<i32, ModuleFault> {
        Ok(3)
    }

    fn cell(&mut self, index: i32) -> Result<i32, ModuleFault> {
        match usize::try_from(index).ok().and_then(|i| self.board.get(i)) {
            Some(&c) => Ok(c as i32),
            None => Ok(-1),
        }
    }

    fn is_game_over(&mut self) -> Result<i32, ModuleFault> {
        Ok((self.winner() != 0) as i32)
    }

    fn stat(&mut self, slot: i32) -> Result<i32, ModuleFault> {
        match slot {
            STAT_CURRENT_PLAYER => Ok(self.current as i32),
            STAT_WINNER => Ok(self.winner() as i32),
            _ => Ok(0),
        }
    }
}
