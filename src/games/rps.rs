use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ModuleFault;
use crate::module::{Capabilities, GameModule, Op};

pub const ROCK: i32 = 0;
pub const PAPER: i32 = 1;
pub const SCISSORS: i32 = 2;
/// Input code that clears the shown result and starts the next round.
pub const NEW_ROUND: i32 = 3;

pub const NO_RESULT: i32 = -1;
pub const TIE: i32 = 0;
pub const PLAYER_WINS: i32 = 1;
pub const COMPUTER_WINS: i32 = 2;

// Stat slots.
pub const STAT_PLAYER_CHOICE: i32 = 0;
pub const STAT_COMPUTER_CHOICE: i32 = 1;
pub const STAT_RESULT: i32 = 2;
pub const STAT_PLAYER_WINS: i32 = 3;
pub const STAT_COMPUTER_WINS: i32 = 4;
pub const STAT_TIES: i32 = 5;
pub const STAT_TOTAL: i32 = 6;
pub const STAT_SLOTS: usize = 7;

pub fn judge(player: i32, computer: i32) -> i32 {
    if player == computer {
        TIE
    } else if (player + 3 - computer) % 3 == 1 {
        // Paper beats rock, scissors beat paper, rock beats scissors.
        PLAYER_WINS
    } else {
        COMPUTER_WINS
    }
}

/// Endless best-of-many against a random opponent; the score is the
/// player's win count.
pub struct RockPaperScissors {
    player_choice: i32,
    computer_choice: i32,
    result: i32,
    player_wins: i32,
    computer_wins: i32,
    ties: i32,
    showing_result: bool,
    rng: StdRng,
}

impl RockPaperScissors {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            player_choice: -1,
            computer_choice: -1,
            result: NO_RESULT,
            player_wins: 0,
            computer_wins: 0,
            ties: 0,
            showing_result: false,
            rng,
        }
    }

    fn new_round(&mut self) {
        self.player_choice = -1;
        self.computer_choice = -1;
        self.result = NO_RESULT;
        self.showing_result = false;
    }

    fn choose(&mut self, choice: i32) {
        if self.showing_result {
            return;
        }
        self.player_choice = choice;
        self.computer_choice = self.rng.gen_range(ROCK..=SCISSORS);
        self.result = judge(self.player_choice, self.computer_choice);
        match self.result {
            TIE => self.ties += 1,
            PLAYER_WINS => self.player_wins += 1,
            _ => self.computer_wins += 1,
        }
        self.showing_result = true;
    }
}

impl Default for RockPaperScissors {
    fn default() -> Self {
        Self::new()
    }
}

impl GameModule for RockPaperScissors {
    fn capabilities(&self) -> Capabilities {
        Capabilities::of(&[Op::Start, Op::SetInput, Op::Score, Op::GameOver, Op::Stat])
    }

    fn start(&mut self) -> Result<(), ModuleFault> {
        self.new_round();
        self.player_wins = 0;
        self.computer_wins = 0;
        self.ties = 0;
        Ok(())
    }

    fn set_input(&mut self, code: i32) -> Result<(), ModuleFault> {
        match code {
            ROCK | PAPER | SCISSORS => self.choose(code),
            NEW_ROUND => self.new_round(),
            _ => {}
        }
        Ok(())
    }

    fn score(&mut self) -> Result<i32, ModuleFault> {
        Ok(self.player_wins)
    }

    fn is_game_over(&mut self) -> Result<i32, ModuleFault> {
        Ok(0)
    }

    fn stat(&mut self, slot: i32) -> Result<i32, ModuleFault> {
        Ok(match slot {
            STAT_PLAYER_CHOICE => self.player_choice,
            STAT_COMPUTER_CHOICE => self.computer_choice,
            STAT_RESULT => self.result,
            STAT_PLAYER_WINS => self.player_wins,
            STAT_COMPUTER_WINS => self.computer_wins,
            STAT_TIES => self.ties,
            STAT_TOTAL => self.player_wins + self.computer_wins + self.ties,
            _ => 0,
        })
    }
}
