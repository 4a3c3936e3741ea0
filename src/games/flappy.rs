use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ModuleFault;
use crate::module::{Capabilities, GameModule, Op};

const WIDTH: i32 = 28;
const HEIGHT: i32 = 20;
const PIPE_GAP: i32 = 5;
const PIPE_SPACING: i32 = 12;
const BIRD_X: i32 = 6;
const FLAP_VELOCITY: i32 = -3;
const TERMINAL_VELOCITY: i32 = 3;

const BIRD: u8 = b'B';
const PIPE: u8 = b'#';
const SKY: u8 = b' ';

#[derive(Clone, Copy, Debug)]
struct Pipe {
    x: i32,
    /// Top row of the gap, inclusive.
    gap_y: i32,
}

impl Pipe {
    fn blocks(&self, y: i32) -> bool {
        y < self.gap_y || y >= self.gap_y + PIPE_GAP
    }
}

pub struct FlappyBird {
    bird_y: i32,
    bird_vy: i32,
    pipes: Vec<Pipe>,
    score: i32,
    tick: u64,
    game_over: bool,
    rng: StdRng,
}

impl FlappyBird {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut f = Self {
            bird_y: HEIGHT / 2,
            bird_vy: 0,
            pipes: Vec::new(),
            score: 0,
            tick: 0,
            game_over: false,
            rng,
        };
        f.restart();
        f
    }

    fn gap(&mut self) -> i32 {
        self.rng.gen_range(2..=HEIGHT - PIPE_GAP - 2)
    }

    fn restart(&mut self) {
        self.game_over = false;
        self.score = 0;
        self.tick = 0;
        self.bird_y = HEIGHT / 2;
        self.bird_vy = 0;
        self.pipes.clear();
        let start_x = WIDTH + 8;
        for i in 0..3 {
            let gap_y = self.gap();
            self.pipes.push(Pipe { x: start_x + i * PIPE_SPACING, gap_y });
        }
    }

    fn add_pipe_right(&mut self) {
        let right = self.pipes.iter().map(|p| p.x).max().unwrap_or(WIDTH).max(WIDTH);
        let gap_y = self.gap();
        self.pipes.push(Pipe { x: right + PIPE_SPACING, gap_y });
    }

    fn step(&mut self) -> i32 {
        if self.game_over {
            return 0;
        }
        self.tick += 1;

        self.bird_vy = (self.bird_vy + 1).min(TERMINAL_VELOCITY);
        self.bird_y += self.bird_vy;
        if self.bird_y < 0 || self.bird_y >= HEIGHT {
            self.game_over = true;
            return 0;
        }

        // Pipes scroll every other tick.
        let scrolled = self.tick % 2 == 0;
        if scrolled {
            self.pipes.iter_mut().for_each(|p| p.x -= 1);
        }
        if self.pipes.first().is_some_and(|p| p.x < -1) {
            self.pipes.remove(0);
        }
        if self.pipes.last().map_or(true, |p| p.x < WIDTH) {
            self.add_pipe_right();
        }

        for p in &self.pipes {
            if p.x == BIRD_X && p.blocks(self.bird_y) {
                self.game_over = true;
                return 0;
            }
            if p.x == BIRD_X - 1 && scrolled {
                self.score += 1;
            }
        }
        1
    }
}

impl Default for FlappyBird {
    fn default() -> Self {
        Self::new()
    }
}

impl GameModule for FlappyBird {
    fn capabilities(&self) -> Capabilities {
        Capabilities::of(&[
            Op::Start,
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

    /// Any input is a flap.
    fn set_input(&mut self, _code: i32) -> Result<(), ModuleFault> {
        if !self.game_over {
            self.bird_vy = FLAP_VELOCITY;
        }
        Ok(())
    }

    fn tick(&mut self) -> Result<i32, ModuleFault> {
        Ok(self.step())
    }

    fn update(&mut self) -> Result<i32, ModuleFault> {
        Ok(self.step())
    }

    fn width(&mut self) -> Result<i32, ModuleFault> {
        Ok(WIDTH)
    }

    fn height(&mut self) -> Result<i32, ModuleFault> {
        Ok(HEIGHT)
    }

    fn cell(&mut self, index: i32) -> Result<i32, ModuleFault> {
        if index < 0 || index >= WIDTH * HEIGHT {
            return Ok(0);
        }
        let (x, y) = (index % WIDTH, index / WIDTH);
        if x == BIRD_X && y == self.bird_y {
            return Ok(BIRD as i32);
        }
        let code = match self.pipes.iter().find(|p| p.x == x) {
            Some(p) if p.blocks(y) => PIPE,
            _ => SKY,
        };
        Ok(code as i32)
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

    #[test]
    fn falling_without_flapping_hits_the_ground() {
        let mut f = FlappyBird::with_seed(3);
        let mut ticks = 0;
        while f.tick().unwrap() == 1 {
            ticks += 1;
            assert!(ticks < 50);
        }
        assert_eq!(f.is_game_over().unwrap(), 1);
        assert!(f.bird_y >= HEIGHT);
    }

    #[test]
    fn flap_sets_upward_velocity() {
        let mut f = FlappyBird::with_seed(3);
        f.set_input(0).unwrap();
        f.tick().unwrap();
        assert_eq!(f.bird_vy, FLAP_VELOCITY + 1);
        assert_eq!(f.bird_y, HEIGHT / 2 + FLAP_VELOCITY + 1);
    }

    #[test]
    fn bird_is_drawn_at_its_column() {
        let mut f = FlappyBird::with_seed(3);
        let at = f.bird_y * WIDTH + BIRD_X;
        assert_eq!(f.cell(at).unwrap(), BIRD as i32);
        assert_eq!(f.cell(-5).unwrap(), 0);
    }

    #[test]
    fn passing_a_pipe_scores() {
        let mut f = FlappyBird::with_seed(3);
        f.pipes = vec![Pipe { x: BIRD_X, gap_y: 0 }];
        f.bird_y = 2;
        f.bird_vy = -1;
        // Tick 1: no scroll, bird stays inside the gap.
        assert_eq!(f.tick().unwrap(), 1);
        // Tick 2: pipe scrolls past the bird's column.
        f.bird_vy = -1;
        assert_eq!(f.tick().unwrap(), 1);
        assert_eq!(f.score, 1);
    }
}
