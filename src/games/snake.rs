use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ModuleFault;
use crate::module::{Capabilities, GameModule, Op};

const WIDTH: usize = 20;
const HEIGHT: usize = 20;
const CELLS: usize = WIDTH * HEIGHT;

const EMPTY: u8 = b' ';
const BODY: u8 = b'S';
const FOOD: u8 = b'F';

// 0=Up, 1=Right, 2=Down, 3=Left
const UP: i32 = 0;
const RIGHT: i32 = 1;

pub struct Snake {
    board: [u8; CELLS],
    // Tail at the front, head at the back.
    body: VecDeque<usize>,
    dir: i32,
    // Direction of the last completed move.
    heading: i32,
    score: i32,
    moves: u32,
    game_over: bool,
    rng: StdRng,
}

impl Snake {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut s = Self {
            board: [EMPTY; CELLS],
            body: VecDeque::with_capacity(CELLS),
            dir: RIGHT,
            heading: RIGHT,
            score: 0,
            moves: 0,
            game_over: false,
            rng,
        };
        s.restart();
        s
    }

    fn restart(&mut self) {
        self.board = [EMPTY; CELLS];
        self.body.clear();
        self.game_over = false;
        self.score = 0;
        self.moves = 0;
        self.dir = RIGHT;
        self.heading = RIGHT;

        // Length 3, horizontal, centred, heading right.
        let row = HEIGHT / 2;
        let col = WIDTH / 2;
        for c in col - 1..=col + 1 {
            let idx = row * WIDTH + c;
            self.body.push_back(idx);
            self.board[idx] = BODY;
        }
        self.spawn_food();
    }

    fn spawn_food(&mut self) {
        for _ in 0..2000 {
            let idx = self.rng.gen_range(0..CELLS);
            if self.board[idx] == EMPTY {
                self.board[idx] = FOOD;
                return;
            }
        }
        if let Some(idx) = self.board.iter().position(|&c| c == EMPTY) {
            self.board[idx] = FOOD;
        }
    }

    fn step(&mut self) -> i32 {
        if self.game_over {
            return 0;
        }
        self.moves += 1;

        let Some(&head) = self.body.back() else {
            self.game_over = true;
            return 0;
        };
        let (mut row, mut col) = ((head / WIDTH) as i32, (head % WIDTH) as i32);
        match self.dir {
            UP => row -= 1,
            RIGHT => col += 1,
            2 => row += 1,
            _ => col -= 1,
        }
        if row < 0 || row >= HEIGHT as i32 || col < 0 || col >= WIDTH as i32 {
            self.game_over = true;
            return 0;
        }

        let next = row as usize * WIDTH + col as usize;
        let ate = self.board[next] == FOOD;
        // Moving into the cell the tail is about to vacate is allowed.
        let tail = self.body.front().copied();
        if self.board[next] == BODY && Some(next) != tail {
            self.game_over = true;
            return 0;
        }

        if ate {
            self.score += 1;
        } else if let Some(tail) = self.body.pop_front() {
            self.board[tail] = EMPTY;
        }
        self.body.push_back(next);
        self.board[next] = BODY;
        self.heading = self.dir;

        if ate {
            self.spawn_food();
        }
        1
    }
}

impl Default for Snake {
    fn default() -> Self {
        Self::new()
    }
}

impl GameModule for Snake {
    fn capabilities(&self) -> Capabilities {
        Capabilities::of(&[
            Op::Start,
            Op::Reset,
            Op::SetInput,
            Op::Tick,
            Op::Update,
            Op::Width,
            Op::Height,
            Op::Cell,
            Op::Score,
            Op::GameOver,
        ])
    }

    fn start(&mut self) -> Result<(), ModuleFault> {
        self.restart();
        Ok(())
    }

    fn reset(&mut self) -> Result<(), ModuleFault> {
        self.restart();
        Ok(())
    }

    fn set_input(&mut self, dir: i32) -> Result<(), ModuleFault> {
        if !(0..=3).contains(&dir) {
            return Ok(());
        }
        // No reversing straight into the neck.
        if (self.heading - dir).abs() == 2 {
            return Ok(());
        }
        self.dir = dir;
        Ok(())
    }

    fn tick(&mut self) -> Result<i32, ModuleFault> {
        Ok(self.step())
    }

    fn update(&mut self) -> Result<i32, ModuleFault> {
        Ok(self.step())
    }

    fn width(&mut self) -> Result<i32, ModuleFault> {
        Ok(WIDTH as i32)
    }

    fn height(&mut self) -> Result<i32, ModuleFault> {
        Ok(HEIGHT as i32)
    }

    fn cell(&mut self, index: i32) -> Result<i32, ModuleFault> {
        match usize::try_from(index).ok().and_then(|i| self.board.get(i)) {
            Some(&c) => Ok(c as i32),
            None => Ok(-1),
        }
    }

    fn score(&mut self) -> Result<i32, ModuleFault> {
        Ok(self.score)
    }

    fn is_game_over(&mut self) -> Result<i32, ModuleFault> {
        Ok(self.game_over as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(s: &Snake, code: u8) -> usize {
        s.board.iter().filter(|&&c| c == code).count()
    }

    #[test]
    fn starts_with_three_segments_and_one_food() {
        let s = Snake::with_seed(7);
        assert_eq!(count(&s, BODY), 3);
        assert_eq!(count(&s, FOOD), 1);
        assert!(!s.game_over);
    }

    #[test]
    fn reversing_is_ignored() {
        let mut s = Snake::with_seed(7);
        s.set_input(3).unwrap();
        assert_eq!(s.dir, RIGHT);
        s.set_input(UP).unwrap();
        assert_eq!(s.dir, UP);
    }

    #[test]
    fn two_turns_between_moves_cannot_reverse() {
        let mut s = Snake::with_seed(7);
        s.board.iter_mut().filter(|c| **c == FOOD).for_each(|c| *c = EMPTY);
        // Heading right: up then left before the next move would hit the neck.
        s.set_input(UP).unwrap();
        s.set_input(3).unwrap();
        assert_eq!(s.dir, UP);
        assert_eq!(s.tick().unwrap(), 1);
        assert!(!s.game_over);

        s.set_input(3).unwrap();
        assert_eq!(s.dir, 3);
        assert_eq!(s.tick().unwrap(), 1);
        assert!(!s.game_over);
    }

    #[test]
    fn running_into_the_wall_ends_the_game() {
        let mut s = Snake::with_seed(7);
        // Clear food so the snake cannot grow on the way.
        s.board.iter_mut().filter(|c| **c == FOOD).for_each(|c| *c = EMPTY);
        let mut alive = 1;
        for _ in 0..WIDTH {
            alive = s.tick().unwrap();
            if alive == 0 {
                break;
            }
        }
        assert_eq!(alive, 0);
        assert_eq!(s.is_game_over().unwrap(), 1);
        assert_eq!(s.tick().unwrap(), 0);
    }

    #[test]
    fn eating_food_grows_and_scores() {
        let mut s = Snake::with_seed(7);
        s.board.iter_mut().filter(|c| **c == FOOD).for_each(|c| *c = EMPTY);
        let head = *s.body.back().unwrap();
        s.board[head + 1] = FOOD;
        assert_eq!(s.tick().unwrap(), 1);
        assert_eq!(s.score, 1);
        assert_eq!(count(&s, BODY), 4);
        assert_eq!(count(&s, FOOD), 1);
    }

    #[test]
    fn out_of_range_cell_reads_negative() {
        let mut s = Snake::with_seed(7);
        assert_eq!(s.cell(-1).unwrap(), -1);
        assert_eq!(s.cell(CELLS as i32).unwrap(), -1);
    }
}
