use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ModuleFault;
use crate::module::{Capabilities, GameModule, Op};

pub const EASY: i32 = 10;
pub const NORMAL: i32 = 100;
pub const HARD: i32 = 1000;

// Stat slots.
pub const STAT_LAST_GUESS: i32 = 0;
/// `last guess - secret`; only meaningful once a guess was made.
pub const STAT_DELTA: i32 = 1;
pub const STAT_ATTEMPTS: i32 = 2;
pub const STAT_MAX: i32 = 3;
pub const STAT_SLOTS: usize = 4;

pub struct GuessTheNumber {
    max: i32,
    pending_max: i32,
    secret: i32,
    attempts: i32,
    last_guess: i32,
    delta: i32,
    solved: bool,
    rng: StdRng,
}

impl GuessTheNumber {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut g = Self {
            max: NORMAL,
            pending_max: NORMAL,
            secret: 1,
            attempts: 0,
            last_guess: 0,
            delta: 0,
            solved: false,
            rng,
        };
        g.restart();
        g
    }

    fn restart(&mut self) {
        self.max = self.pending_max;
        self.secret = self.rng.gen_range(1..=self.max);
        self.attempts = 0;
        self.last_guess = 0;
        self.delta = 0;
        self.solved = false;
    }
}

impl Default for GuessTheNumber {
    fn default() -> Self {
        Self::new()
    }
}

impl GameModule for GuessTheNumber {
    fn capabilities(&self) -> Capabilities {
        Capabilities::of(&[Op::Start, Op::SetInput, Op::SetOption, Op::GameOver, Op::Stat])
    }

    fn start(&mut self) -> Result<(), ModuleFault> {
        self.restart();
        Ok(())
    }

    /// Upper bound of the secret for the next round.
    fn set_option(&mut self, max: i32) -> Result<(), ModuleFault> {
        if max >= 1 {
            self.pending_max = max;
        }
        Ok(())
    }

    /// Submits a guess. Out-of-range guesses do not count as attempts.
    fn set_input(&mut self, guess: i32) -> Result<(), ModuleFault> {
        if self.solved || guess < 1 || guess > self.max {
            return Ok(());
        }
        self.attempts += 1;
        self.last_guess = guess;
        self.delta = guess - self.secret;
        self.solved = self.delta == 0;
        Ok(())
    }

    fn is_game_over(&mut self) -> Result<i32, ModuleFault> {
        Ok(self.solved as i32)
    }

    fn stat(&mut self, slot: i32) -> Result<i32, ModuleFault> {
        Ok(match slot {
            STAT_LAST_GUESS => self.last_guess,
            STAT_DELTA => self.delta,
            STAT_ATTEMPTS => self.attempts,
            STAT_MAX => self.max,
            _ => 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_search_always_finds_the_secret() {
        let mut g = GuessTheNumber::with_seed(42);
        let (mut lo, mut hi) = (1, NORMAL);
        while g.is_game_over().unwrap() == 0 {
            let mid = (lo + hi) / 2;
            g.set_input(mid).unwrap();
            let delta = g.stat(STAT_DELTA).unwrap();
            if delta < 0 {
                lo = mid + 1;
            } else if delta > 0 {
                hi = mid - 1;
            }
        }
        assert!(g.stat(STAT_ATTEMPTS).unwrap() <= 7);
        assert_eq!(g.stat(STAT_DELTA).unwrap(), 0);
    }

    #[test]
    fn out_of_range_guess_is_ignored() {
        let mut g = GuessTheNumber::with_seed(1);
        g.set_input(0).unwrap();
        g.set_input(NORMAL + 1).unwrap();
        assert_eq!(g.stat(STAT_ATTEMPTS).unwrap(), 0);
    }

    #[test]
    fn difficulty_applies_on_next_start() {
        let mut g = GuessTheNumber::with_seed(1);
        g.set_option(EASY).unwrap();
        assert_eq!(g.stat(STAT_MAX).unwrap(), NORMAL);
        g.start().unwrap();
        assert_eq!(g.stat(STAT_MAX).unwrap(), EASY);
        assert!((1..=EASY).contains(&g.secret));
    }
}
