use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ModuleFault;
use crate::module::{Capabilities, GameModule, Op};

const WIDTH: i32 = 19;
const HEIGHT: i32 = 21;

const WALL: u8 = b'#';
const PELLET: u8 = b'.';
const POWER: u8 = b'o';
const EMPTY: u8 = b' ';
const PACMAN: u8 = b'P';
const GHOST: u8 = b'G';

const PELLET_POINTS: i32 = 10;
const POWER_POINTS: i32 = 50;
// Ghost wandering is reproducible between rounds.
const GHOST_SEED: u64 = 12345;

#[derive(Clone, Copy)]
struct Actor {
    x: i32,
    y: i32,
    dir: i32,
}

pub struct Pacman {
    maze: Vec<u8>,
    pacman: Actor,
    ghosts: Vec<Actor>,
    score: i32,
    game_over: bool,
    rng: StdRng,
}

fn idx(x: i32, y: i32) -> usize {
    (y * WIDTH + x) as usize
}

fn offset(dir: i32) -> (i32, i32) {
    match dir {
        0 => (0, -1),
        1 => (1, 0),
        2 => (0, 1),
        _ => (-1, 0),
    }
}

impl Pacman {
    pub fn new() -> Self {
        let mut p = Self {
            maze: vec![PELLET; (WIDTH * HEIGHT) as usize],
            pacman: Actor { x: 1, y: 1, dir: 1 },
            ghosts: Vec::new(),
            score: 0,
            game_over: false,
            rng: StdRng::seed_from_u64(GHOST_SEED),
        };
        p.restart();
        p
    }

    fn seed_maze(&mut self) {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let border = x == 0 || y == 0 || x == WIDTH - 1 || y == HEIGHT - 1;
                self.maze[idx(x, y)] = if border { WALL } else { PELLET };
            }
        }
        for x in 3..WIDTH - 3 {
            self.maze[idx(x, 3)] = WALL;
            self.maze[idx(x, HEIGHT - 4)] = WALL;
        }
        for y in 5..HEIGHT - 5 {
            self.maze[idx(3, y)] = WALL;
            self.maze[idx(WIDTH - 4, y)] = WALL;
        }
        // Passages through the inner walls.
        self.maze[idx(5, 3)] = PELLET;
        self.maze[idx(WIDTH - 6, 3)] = PELLET;
        self.maze[idx(3, 7)] = PELLET;
        self.maze[idx(WIDTH - 4, 9)] = PELLET;

        for (x, y) in [(1, HEIGHT - 2), (WIDTH - 2, 1)] {
            self.maze[idx(x, y)] = POWER;
        }
    }

    fn restart(&mut self) {
        self.seed_maze();
        self.pacman = Actor { x: 1, y: 1, dir: 1 };
        self.maze[idx(1, 1)] = EMPTY;
        self.ghosts = vec![
            Actor { x: WIDTH - 2, y: 1, dir: 3 },
            Actor { x: 1, y: HEIGHT - 2, dir: 1 },
            Actor { x: WIDTH - 2, y: HEIGHT - 2, dir: 0 },
        ];
        self.score = 0;
        self.game_over = false;
        self.rng = StdRng::seed_from_u64(GHOST_SEED);
    }

    fn is_wall(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= WIDTH || y >= HEIGHT {
            return true;
        }
        self.maze[idx(x, y)] == WALL
    }

    fn try_move(&self, actor: &mut Actor, dir: i32) -> bool {
        let (dx, dy) = offset(dir);
        let (nx, ny) = (actor.x + dx, actor.y + dy);
        if self.is_wall(nx, ny) {
            return false;
        }
        actor.x = nx;
        actor.y = ny;
        true
    }

    fn step_pacman(&mut self) {
        let mut pac = self.pacman;
        let dir = pac.dir;
        if self.try_move(&mut pac, dir) {
            let cell = &mut self.maze[idx(pac.x, pac.y)];
            match *cell {
                PELLET => self.score += PELLET_POINTS,
                POWER => self.score += POWER_POINTS,
                _ => {}
            }
            if *cell != WALL {
                *cell = EMPTY;
            }
        }
        self.pacman = pac;
    }

    fn step_ghosts(&mut self) {
        let mut ghosts = std::mem::take(&mut self.ghosts);
        for g in ghosts.iter_mut() {
            let dir = g.dir;
            if self.try_move(g, dir) {
                continue;
            }
            // Blocked: pick another direction, avoiding a straight reversal first.
            let back = (g.dir + 2) % 4;
            let mut nd = self.rng.gen_range(0..4);
            if nd == back {
                nd = (nd + 1) % 4;
            }
            let mut tries = 0;
            while tries < 4 && !self.try_move(g, nd) {
                nd = self.rng.gen_range(0..4);
                tries += 1;
            }
            g.dir = nd;
        }
        self.ghosts = ghosts;
    }

    fn caught(&self) -> bool {
        self.ghosts
            .iter()
            .any(|g| g.x == self.pacman.x && g.y == self.pacman.y)
    }

    fn cleared(&self) -> bool {
        !self.maze.iter().any(|&c| c == PELLET || c == POWER)
    }

    fn step(&mut self) -> i32 {
        if self.game_over {
            return 0;
        }
        self.step_pacman();
        if self.caught() {
            self.game_over = true;
            return 0;
        }
        self.step_ghosts();
        if self.caught() || self.cleared() {
            self.game_over = true;
        }
        (!self.game_over) as i32
    }
}

impl Default for Pacman {
    fn default() -> Self {
        Self::new()
    }
}

impl GameModule for Pacman {
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

    fn set_input(&mut self, dir: i32) -> Result<(), ModuleFault> {
        if (0..=3).contains(&dir) {
            self.pacman.dir = dir;
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
        if x == self.pacman.x && y == self.pacman.y {
            return Ok(PACMAN as i32);
        }
        if self.ghosts.iter().any(|g| g.x == x && g.y == y) {
            return Ok(GHOST as i32);
        }
        Ok(self.maze[index as usize] as i32)
    }

    fn score(&mut self) -> Result<i32, ModuleFault> {
        Ok(self.score)
    }

    fn is_game_over(&mut self) -> Result<i32, ModuleFault> {
        Ok(self.game_over as i32)
    }
}
