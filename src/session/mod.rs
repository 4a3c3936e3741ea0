pub mod input;
pub mod ticker;

use log::{debug, error, info, warn};

use crate::error::{ModuleFault, SessionError};
use crate::games::GameKind;
use crate::module::{ModuleHandle, Op};

pub use input::Action;
pub use ticker::{FrameTicker, Reschedule, Throttle};

/// Largest board edge accepted from a module.
pub const MAX_BOARD_EDGE: i32 = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Starting,
    Running,
    GameOver,
    Errored,
}

/// What one frame or input did to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Not running; nothing was called.
    Idle,
    Continue,
    /// The game just ended. `improved` is set when `score` beats the best
    /// the session was created with and should be persisted.
    Finished { score: i32, improved: bool },
    /// A module fault stopped the session.
    Halt,
}

impl FrameOutcome {
    pub fn keeps_running(self) -> bool {
        self == FrameOutcome::Continue
    }
}

/// Per-game wiring the controller needs around a module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionProfile {
    pub tick_ms: Option<u64>,
    pub fallback_width: i32,
    pub fallback_height: i32,
    pub stat_slots: usize,
}

impl SessionProfile {
    pub fn for_game(kind: GameKind, tick_ms: Option<u64>) -> Self {
        let (fallback_width, fallback_height) = kind.fallback_size();
        Self {
            tick_ms,
            fallback_width,
            fallback_height,
            stat_slots: kind.stat_slots(),
        }
    }
}

/// The last successfully read view of a module.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub board: Vec<u8>,
    pub width: usize,
    pub height: usize,
    pub score: i32,
    pub best_score: i32,
    pub game_over: bool,
    pub stats: Vec<i32>,
    pub last_error: Option<SessionError>,
}

impl SessionState {
    pub fn cell(&self, x: usize, y: usize) -> u8 {
        if x >= self.width {
            return 0;
        }
        self.board.get(y * self.width + x).copied().unwrap_or(0)
    }

    pub fn stat(&self, slot: usize) -> i32 {
        self.stats.get(slot).copied().unwrap_or(0)
    }
}

struct Snapshot {
    width: usize,
    height: usize,
    board: Vec<u8>,
    score: i32,
    game_over: bool,
    stats: Vec<i32>,
}

/// Drives one mounted game module: start and restart, input dispatch, the
/// throttled advance-and-read step, and terminal state.
///
/// Module faults never escape: they land in [`SessionState::last_error`]
/// and move the session to [`Phase::Errored`].
pub struct Session {
    module: ModuleHandle,
    profile: SessionProfile,
    state: SessionState,
    phase: Phase,
    throttle: Throttle,
    stored_best: i32,
    steps: u64,
    reads: u64,
}

impl Session {
    pub fn new(module: ModuleHandle, profile: SessionProfile, best_score: i32) -> Self {
        let best = best_score.max(0);
        let throttle = Throttle::new(profile.tick_ms);
        Self {
            module,
            profile,
            state: SessionState {
                best_score: best,
                ..SessionState::default()
            },
            phase: Phase::Starting,
            throttle,
            stored_best: best,
            steps: 0,
            reads: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn module(&self) -> &ModuleHandle {
        &self.module
    }

    pub fn profile(&self) -> &SessionProfile {
        &self.profile
    }

    /// Simulation steps taken since the last start.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Successful state reads since the last start.
    pub fn reads(&self) -> u64 {
        self.reads
    }

    /// Starts a fresh round from any phase.
    ///
    /// Uses `start`, or `reset` when the module has no `start`. A module with
    /// neither stays in [`Phase::Starting`] with a recorded error.
    pub fn start(&mut self) -> FrameOutcome {
        self.phase = Phase::Starting;
        let caps = self.module.capabilities();
        let op = if caps.has(Op::Start) {
            Op::Start
        } else if caps.has(Op::Reset) {
            Op::Reset
        } else {
            let err = SessionError::MissingOperation(Op::Start);
            error!("{}: {}", self.module.name(), err);
            self.state.last_error = Some(err);
            return FrameOutcome::Idle;
        };

        let started = {
            let mut module = self.module.borrow_mut();
            match op {
                Op::Start => module.start(),
                _ => module.reset(),
            }
        };
        if let Err(fault) = started {
            return self.fail(fault);
        }

        self.state.score = 0;
        self.state.game_over = false;
        self.state.last_error = None;
        self.throttle.reset();
        self.steps = 0;
        self.reads = 0;
        self.phase = Phase::Running;
        info!("{}: session started via {}", self.module.name(), op);
        self.refresh()
    }

    /// Passes `option` to `set_option`, then starts a fresh round.
    ///
    /// Accepted in every phase, like a plain restart.
    pub fn start_with_option(&mut self, option: i32) -> FrameOutcome {
        if self.module.capabilities().has(Op::SetOption) {
            let applied = self.module.borrow_mut().set_option(option);
            if let Err(fault) = applied {
                return self.fail(fault);
            }
        } else {
            debug!("{}: ignoring option {}, no {}", self.module.name(), option, Op::SetOption);
        }
        self.start()
    }

    /// One scheduled frame: advance when the throttle allows, then read.
    pub fn frame(&mut self, now_ms: u64) -> FrameOutcome {
        if self.phase != Phase::Running {
            return FrameOutcome::Idle;
        }
        if self.throttle.ready(now_ms) {
            if let Err(fault) = self.advance() {
                return self.fail(fault);
            }
        }
        self.refresh()
    }

    pub fn input(&mut self, action: Action) -> FrameOutcome {
        match action {
            Action::Restart => self.start(),
            Action::Option(value) => {
                if self.phase != Phase::Running {
                    return FrameOutcome::Idle;
                }
                if !self.module.capabilities().has(Op::SetOption) {
                    debug!("{}: ignoring option {}, no {}", self.module.name(), value, Op::SetOption);
                    return FrameOutcome::Idle;
                }
                let applied = self.module.borrow_mut().set_option(value);
                match applied {
                    Ok(()) => FrameOutcome::Idle,
                    Err(fault) => self.fail(fault),
                }
            }
            Action::Code(code) => {
                if self.phase != Phase::Running {
                    return FrameOutcome::Idle;
                }
                if !self.module.capabilities().has(Op::SetInput) {
                    debug!("{}: dropping input {}, no {}", self.module.name(), code, Op::SetInput);
                    return FrameOutcome::Idle;
                }
                let sent = self.module.borrow_mut().set_input(code);
                if let Err(fault) = sent {
                    return self.fail(fault);
                }
                self.refresh()
            }
            Action::Step => {
                if self.phase != Phase::Running {
                    return FrameOutcome::Idle;
                }
                if let Err(fault) = self.advance() {
                    return self.fail(fault);
                }
                self.refresh()
            }
        }
    }

    fn advance(&mut self) -> Result<(), ModuleFault> {
        let caps = self.module.capabilities();
        let mut module = self.module.borrow_mut();
        if caps.has(Op::Update) {
            module.update()?;
        } else if caps.has(Op::Tick) {
            module.tick()?;
        } else {
            return Ok(());
        }
        self.steps += 1;
        Ok(())
    }

    fn read(&self) -> Result<Snapshot, ModuleFault> {
        let caps = self.module.capabilities();
        let mut module = self.module.borrow_mut();

        let width = if caps.has(Op::Width) {
            module.width()?
        } else {
            self.profile.fallback_width
        };
        let height = if caps.has(Op::Height) {
            module.height()?
        } else {
            self.profile.fallback_height
        };
        if !(0..=MAX_BOARD_EDGE).contains(&width) || !(0..=MAX_BOARD_EDGE).contains(&height) {
            return Err(ModuleFault::Trap(format!("unusable board size {}x{}", width, height)));
        }
        let (width, height) = (width as usize, height as usize);

        let len = width * height;
        let mut board = vec![0u8; len];
        if caps.has(Op::Cell) {
            for (i, slot) in board.iter_mut().enumerate() {
                let code = module.cell(i as i32)?;
                *slot = u8::try_from(code).unwrap_or(0);
            }
        }

        let score = if caps.has(Op::Score) {
            module.score()?
        } else {
            self.state.score
        };
        let game_over = caps.has(Op::GameOver) && module.is_game_over()? != 0;

        let mut stats = Vec::with_capacity(self.profile.stat_slots);
        if caps.has(Op::Stat) {
            for slot in 0..self.profile.stat_slots {
                stats.push(module.stat(slot as i32)?);
            }
        }

        Ok(Snapshot {
            width,
            height,
            board,
            score,
            game_over,
            stats,
        })
    }

    /// Reads the module and commits the snapshot only if every call worked.
    fn refresh(&mut self) -> FrameOutcome {
        let snapshot = match self.read() {
            Ok(snapshot) => snapshot,
            Err(fault) => return self.fail(fault),
        };
        self.reads += 1;

        let state = &mut self.state;
        state.width = snapshot.width;
        state.height = snapshot.height;
        state.board = snapshot.board;
        state.stats = snapshot.stats;
        if snapshot.score < state.score {
            warn!(
                "{}: score went backwards ({} -> {}), keeping {}",
                self.module.name(),
                state.score,
                snapshot.score,
                state.score
            );
        } else {
            state.score = snapshot.score;
        }
        state.best_score = state.best_score.max(state.score);

        if !snapshot.game_over {
            return FrameOutcome::Continue;
        }

        state.game_over = true;
        self.phase = Phase::GameOver;
        let score = state.score;
        let improved = score > self.stored_best;
        if improved {
            self.stored_best = score;
        }
        info!(
            "{}: game over, score {} (best {})",
            self.module.name(),
            score,
            state.best_score
        );
        FrameOutcome::Finished { score, improved }
    }

    fn fail(&mut self, fault: ModuleFault) -> FrameOutcome {
        error!("{}: {}", self.module.name(), fault);
        self.state.last_error = Some(SessionError::StateRead(fault));
        self.phase = Phase::Errored;
        FrameOutcome::Halt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{Capabilities, GameModule};

    /// Counts up one point per tick and ends at `end`.
    struct Counter {
        ticks: i32,
        end: i32,
    }

    impl GameModule for Counter {
        fn capabilities(&self) -> Capabilities {
            Capabilities::of(&[Op::Reset, Op::Tick, Op::Width, Op::Height, Op::Cell, Op::Score, Op::GameOver])
        }

        fn reset(&mut self) -> Result<(), ModuleFault> {
            self.ticks = 0;
            Ok(())
        }

        fn tick(&mut self) -> Result<i32, ModuleFault> {
            self.ticks += 1;
            Ok(1)
        }

        fn width(&mut self) -> Result<i32, ModuleFault> {
            Ok(2)
        }

        fn height(&mut self) -> Result<i32, ModuleFault> {
            Ok(1)
        }

        fn cell(&mut self, index: i32) -> Result<i32, ModuleFault> {
            Ok(if index == 0 { 'S' as i32 } else { 999 })
        }

        fn score(&mut self) -> Result<i32, ModuleFault> {
            Ok(self.ticks)
        }

        fn is_game_over(&mut self) -> Result<i32, ModuleFault> {
            Ok((self.ticks >= self.end) as i32)
        }
    }

    fn session(end: i32, tick_ms: Option<u64>) -> Session {
        let handle = ModuleHandle::new("Counter", Box::new(Counter { ticks: 0, end }));
        let profile = SessionProfile {
            tick_ms,
            fallback_width: 0,
            fallback_height: 0,
            stat_slots: 0,
        };
        Session::new(handle, profile, 2)
    }

    #[test]
    fn reset_stands_in_for_start() {
        let mut s = session(10, None);
        assert_eq!(s.phase(), Phase::Starting);
        assert_eq!(s.start(), FrameOutcome::Continue);
        assert_eq!(s.phase(), Phase::Running);
        assert_eq!(s.state().board, vec![b'S', 0]);
    }

    #[test]
    fn nothing_happens_before_start() {
        let mut s = session(10, None);
        assert_eq!(s.frame(0), FrameOutcome::Idle);
        assert_eq!(s.input(Action::Code(1)), FrameOutcome::Idle);
        assert!(s.state().board.is_empty());
    }

    #[test]
    fn throttle_gates_ticks_not_reads() {
        let mut s = session(100, Some(100));
        s.start();
        s.frame(0);
        s.frame(16);
        s.frame(32);
        assert_eq!(s.steps(), 1);
        assert_eq!(s.reads(), 4);
        s.frame(100);
        assert_eq!(s.state().score, 2);
    }

    #[test]
    fn game_over_reports_improvement_once() {
        let mut s = session(3, None);
        s.start();
        assert_eq!(s.frame(0), FrameOutcome::Continue);
        assert_eq!(s.frame(1), FrameOutcome::Continue);
        assert_eq!(s.frame(2), FrameOutcome::Finished { score: 3, improved: true });
        assert_eq!(s.frame(3), FrameOutcome::Idle);
        assert_eq!(s.state().best_score, 3);

        s.input(Action::Restart);
        for t in 0..3 {
            s.frame(t);
        }
        assert_eq!(s.phase(), Phase::GameOver);
        assert_eq!(s.state().best_score, 3);
    }

    #[test]
    fn module_without_start_or_reset_stays_starting() {
        struct Inert;
        impl GameModule for Inert {
            fn capabilities(&self) -> Capabilities {
                Capabilities::of(&[Op::Tick])
            }
        }
        let handle = ModuleHandle::new("Inert", Box::new(Inert));
        let mut s = Session::new(handle, SessionProfile::for_game(GameKind::Snake, None), 0);
        assert_eq!(s.start(), FrameOutcome::Idle);
        assert_eq!(s.phase(), Phase::Starting);
        assert_eq!(
            s.state().last_error,
            Some(SessionError::MissingOperation(Op::Start))
        );
        assert_eq!(s.frame(0), FrameOutcome::Idle);
    }
}
