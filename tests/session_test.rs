use std::cell::RefCell;
use std::rc::Rc;

use futures::executor::block_on;

use cellcade::error::{ModuleFault, SessionError};
use cellcade::games::{tictactoe, GameKind};
use cellcade::module::{Capabilities, GameModule, ModuleHandle, ModuleRegistry, Op};
use cellcade::scores::BestScores;
use cellcade::session::{
    Action, FrameOutcome, FrameTicker, Phase, Reschedule, Session, SessionProfile,
};

#[derive(Default)]
struct Calls {
    starts: u32,
    steps: u32,
    /// Full reads completed after at least one step.
    stepped_reads: u32,
    options: Vec<i32>,
}

/// A 2x2 module driven by a script, recording what the controller calls.
struct Scripted {
    calls: Rc<RefCell<Calls>>,
    step_op: Op,
    scores: Vec<i32>,
    over_at: Option<u32>,
    cell_fails_at: Option<u32>,
    takes_options: bool,
}

impl Scripted {
    fn new(step_op: Op) -> (Self, Rc<RefCell<Calls>>) {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let module = Self {
            calls: calls.clone(),
            step_op,
            scores: vec![0],
            over_at: None,
            cell_fails_at: None,
            takes_options: false,
        };
        (module, calls)
    }

    fn steps(&self) -> u32 {
        self.calls.borrow().steps
    }

    fn step(&mut self) -> Result<i32, ModuleFault> {
        self.calls.borrow_mut().steps += 1;
        Ok(1)
    }
}

impl GameModule for Scripted {
    fn capabilities(&self) -> Capabilities {
        let caps = Capabilities::of(&[Op::Start, Op::Width, Op::Height, Op::Cell, Op::Score, Op::GameOver])
            .with(self.step_op);
        if self.takes_options {
            caps.with(Op::SetOption)
        } else {
            caps
        }
    }

    fn set_option(&mut self, value: i32) -> Result<(), ModuleFault> {
        self.calls.borrow_mut().options.push(value);
        Ok(())
    }

    fn start(&mut self) -> Result<(), ModuleFault> {
        let mut calls = self.calls.borrow_mut();
        calls.starts += 1;
        calls.steps = 0;
        calls.stepped_reads = 0;
        Ok(())
    }

    fn tick(&mut self) -> Result<i32, ModuleFault> {
        self.step()
    }

    fn update(&mut self) -> Result<i32, ModuleFault> {
        self.step()
    }

    fn width(&mut self) -> Result<i32, ModuleFault> {
        Ok(2)
    }

    fn height(&mut self) -> Result<i32, ModuleFault> {
        Ok(2)
    }

    fn cell(&mut self, index: i32) -> Result<i32, ModuleFault> {
        if Some(self.steps()) == self.cell_fails_at {
            return Err(ModuleFault::Trap("cell read out of bounds".into()));
        }
        Ok(if index as u32 == self.steps() % 4 { 'S' as i32 } else { 0 })
    }

    fn score(&mut self) -> Result<i32, ModuleFault> {
        let steps = self.steps();
        if steps > 0 {
            self.calls.borrow_mut().stepped_reads += 1;
        }
        let idx = (steps as usize).min(self.scores.len() - 1);
        Ok(self.scores[idx])
    }

    fn is_game_over(&mut self) -> Result<i32, ModuleFault> {
        Ok(self.over_at.is_some_and(|at| self.steps() >= at) as i32)
    }
}

fn profile() -> SessionProfile {
    SessionProfile {
        tick_ms: None,
        fallback_width: 0,
        fallback_height: 0,
        stat_slots: 0,
    }
}

fn session_for(module: Scripted, best: i32) -> Session {
    Session::new(ModuleHandle::new("Scripted", Box::new(module)), profile(), best)
}

/// Fires `frames` scheduled frames the way the app's frame loop does.
fn run(session: &mut Session, ticker: &mut FrameTicker, frames: u64) -> Vec<FrameOutcome> {
    let mut outcomes = Vec::new();
    for t in 0..frames {
        ticker.fire(|| {
            let outcome = session.frame(t * 16);
            outcomes.push(outcome);
            if outcome.keeps_running() {
                Reschedule::Again
            } else {
                Reschedule::Stop
            }
        });
    }
    outcomes
}

fn load(kind: GameKind) -> Session {
    let mut registry = ModuleRegistry::builtin();
    let handle = block_on(registry.load(kind.module_name())).unwrap();
    Session::new(handle, SessionProfile::for_game(kind, kind.default_tick_ms()), 0)
}

#[test]
fn board_length_matches_dimensions_for_every_game() {
    for kind in GameKind::all() {
        let mut session = load(*kind);
        session.start();
        assert_eq!(session.phase(), Phase::Running, "{:?}", kind);
        for t in 0..60u64 {
            if t % 7 == 0 {
                session.input(Action::Code((t / 7 % 4) as i32));
            }
            let outcome = session.frame(t * 40);
            assert_ne!(outcome, FrameOutcome::Halt, "{:?}", kind);
            let state = session.state();
            assert_eq!(state.board.len(), state.width * state.height, "{:?}", kind);
            if session.phase() != Phase::Running {
                break;
            }
        }
    }
}

#[test]
fn score_never_decreases_and_best_tracks_it() {
    let (mut module, _) = Scripted::new(Op::Tick);
    module.scores = vec![0, 5, 3, 8, 2];
    let mut session = session_for(module, 6);
    session.start();

    let mut seen = vec![session.state().score];
    for t in 0..4 {
        session.frame(t);
        let state = session.state();
        assert!(state.best_score >= state.score);
        seen.push(state.score);
    }
    assert_eq!(seen, vec![0, 5, 5, 8, 8]);
    assert_eq!(session.state().best_score, 8);
}

#[test]
fn two_tictactoe_moves_alternate_players() {
    let mut session = load(GameKind::TicTacToe);
    session.start();

    session.input(Action::Code(0));
    session.input(Action::Code(4));

    let state = session.state();
    assert_eq!((state.width, state.height), (3, 3));
    assert_eq!(state.board[0], b'X');
    assert_eq!(state.board[4], b'O');
    assert_eq!(state.board.iter().filter(|c| **c == b' ').count(), 7);
    assert_eq!(state.stat(tictactoe::STAT_CURRENT_PLAYER as usize), 'X' as i32);
    assert!(!state.game_over);
    assert_eq!(session.phase(), Phase::Running);
}

#[test]
fn game_over_stops_updates_and_persists_only_improvements() {
    for (stored, expect_improved) in [(50, false), (10, true)] {
        let mut best = BestScores::in_memory();
        best.record("scripted_best", stored);

        let (mut module, calls) = Scripted::new(Op::Update);
        module.scores = vec![0, 10, 20, 30];
        module.over_at = Some(3);
        let mut session = session_for(module, best.get("scripted_best"));
        session.start();

        let mut ticker = FrameTicker::new();
        ticker.schedule();
        let outcomes = run(&mut session, &mut ticker, 10);

        assert_eq!(
            outcomes.last(),
            Some(&FrameOutcome::Finished { score: 30, improved: expect_improved })
        );
        assert_eq!(outcomes.len(), 3);
        assert!(!ticker.is_scheduled());
        assert_eq!(calls.borrow().steps, 3);

        assert_eq!(session.frame(1_000), FrameOutcome::Idle);
        assert_eq!(session.input(Action::Step), FrameOutcome::Idle);
        assert_eq!(calls.borrow().steps, 3);
        assert_eq!(session.state().score, 30);
        assert_eq!(session.phase(), Phase::GameOver);

        if let Some(FrameOutcome::Finished { score, improved: true }) = outcomes.last().copied() {
            assert!(best.record("scripted_best", score));
        }
        assert_eq!(best.get("scripted_best"), stored.max(30));
        assert_eq!(session.state().best_score, stored.max(30));
    }
}

#[test]
fn failing_cell_read_halts_after_four_good_reads() {
    let (mut module, calls) = Scripted::new(Op::Tick);
    module.scores = vec![0, 1, 2, 3, 4, 5];
    module.cell_fails_at = Some(5);
    let mut session = session_for(module, 0);
    session.start();

    let mut ticker = FrameTicker::new();
    ticker.schedule();
    let outcomes = run(&mut session, &mut ticker, 20);

    assert_eq!(outcomes.len(), 5);
    assert_eq!(outcomes.last(), Some(&FrameOutcome::Halt));
    assert_eq!(calls.borrow().stepped_reads, 4);
    assert_eq!(calls.borrow().steps, 5);
    assert_eq!(ticker.fired(), 5);
    assert!(!ticker.is_scheduled());
    assert_eq!(session.phase(), Phase::Errored);
    assert!(matches!(
        session.state().last_error,
        Some(SessionError::StateRead(ModuleFault::Trap(_)))
    ));
    // The failed read did not overwrite the last good snapshot.
    assert_eq!(session.state().score, 4);
    assert_eq!(session.state().board.len(), 4);

    // Input other than restart is ignored while errored.
    assert_eq!(session.input(Action::Code(2)), FrameOutcome::Idle);
    assert_eq!(session.input(Action::Step), FrameOutcome::Idle);

    assert_eq!(session.input(Action::Restart), FrameOutcome::Continue);
    assert_eq!(session.phase(), Phase::Running);
    assert_eq!(session.state().last_error, None);
    assert_eq!(session.state().score, 0);
    assert_eq!(calls.borrow().starts, 2);
    assert!(ticker.schedule());
}

#[test]
fn restarting_twice_equals_restarting_once() {
    let mut session = load(GameKind::TicTacToe);
    session.start();
    for cell in [0, 3, 1, 4, 2] {
        session.input(Action::Code(cell));
    }
    assert_eq!(session.phase(), Phase::GameOver);

    session.input(Action::Restart);
    let once = session.state().clone();
    session.input(Action::Restart);
    let twice = session.state().clone();

    assert_eq!(once, twice);
    assert_eq!(twice.score, 0);
    assert!(!twice.game_over);
    assert!(twice.board.iter().all(|c| *c == b' '));
    assert_eq!(session.phase(), Phase::Running);
}

#[test]
fn pacman_restart_returns_to_the_same_start_layout() {
    let mut session = load(GameKind::Pacman);
    session.start();
    let fresh = session.state().clone();

    session.input(Action::Code(3));
    for t in 0..30 {
        session.frame(t * 100);
    }
    session.input(Action::Restart);
    session.input(Action::Restart);

    assert_eq!(session.state().board, fresh.board);
    assert_eq!(session.state().score, 0);
    assert!(!session.state().game_over);
}

#[test]
fn manual_step_advances_input_driven_tick_games() {
    let (module, calls) = Scripted::new(Op::Tick);
    let mut session = session_for(module, 0);
    session.input(Action::Step);
    assert_eq!(calls.borrow().steps, 0, "not started yet");

    session.start();
    session.input(Action::Step);
    session.input(Action::Step);
    assert_eq!(calls.borrow().steps, 2);
    assert_eq!(session.steps(), 2);
}

#[test]
fn missing_input_capability_is_ignored() {
    let (module, _) = Scripted::new(Op::Tick);
    let mut session = session_for(module, 0);
    session.start();
    assert_eq!(session.input(Action::Code(1)), FrameOutcome::Idle);
    assert_eq!(session.input(Action::Option(10)), FrameOutcome::Idle);
    assert_eq!(session.phase(), Phase::Running);
}

#[test]
fn options_only_reach_a_running_round() {
    let (mut module, calls) = Scripted::new(Op::Tick);
    module.takes_options = true;
    module.over_at = Some(0);
    let mut session = session_for(module, 0);
    session.start();
    assert_eq!(session.phase(), Phase::GameOver);
    assert_eq!(session.input(Action::Option(10)), FrameOutcome::Idle);
    assert!(calls.borrow().options.is_empty());

    // A restart carrying the option applies it before starting.
    session.start_with_option(20);
    assert_eq!(calls.borrow().options, vec![20]);
    assert_eq!(calls.borrow().starts, 2);

    let (mut module, calls) = Scripted::new(Op::Tick);
    module.takes_options = true;
    module.cell_fails_at = Some(0);
    let mut session = session_for(module, 0);
    session.start();
    assert_eq!(session.phase(), Phase::Errored);
    assert_eq!(session.input(Action::Option(10)), FrameOutcome::Idle);
    assert!(calls.borrow().options.is_empty());
    assert!(matches!(
        session.state().last_error,
        Some(SessionError::StateRead(ModuleFault::Trap(_)))
    ));

    let (mut module, calls) = Scripted::new(Op::Tick);
    module.takes_options = true;
    let mut session = session_for(module, 0);
    assert_eq!(session.input(Action::Option(5)), FrameOutcome::Idle);
    session.start();
    assert_eq!(session.input(Action::Option(5)), FrameOutcome::Idle);
    assert_eq!(calls.borrow().options, vec![5]);
}
