use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use futures::FutureExt;
use log::{debug, info};

use cellcade::config::ArcadeConfig;
use cellcade::error::LoadError;
use cellcade::games::GameKind;
use cellcade::module::{LoadFuture, ModuleRegistry};
use cellcade::scores::BestScores;
use cellcade::session::input::{key_action, pointer_action};
use cellcade::session::{Action, FrameOutcome, FrameTicker, Phase, Reschedule, Session, SessionProfile};

use crate::ui::game::BoardLayout;

// Enough digits for the hardest range.
const MAX_GUESS_DIGITS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Home,
    Game(GameKind),
}

impl Tab {
    pub fn all() -> Vec<Tab> {
        std::iter::once(Tab::Home)
            .chain(GameKind::all().iter().copied().map(Tab::Game))
            .collect()
    }

    pub fn title(&self) -> String {
        match self {
            Tab::Home => " Home ".to_string(),
            Tab::Game(kind) => format!(" {} ", kind.short_title()),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Home => 0,
            Tab::Game(kind) => {
                1 + GameKind::all()
                    .iter()
                    .position(|k| k == kind)
                    .unwrap_or(0)
            }
        }
    }
}

/// One mounted game tab: its pending load, then its session and frame task.
pub struct GameView {
    pub kind: GameKind,
    load: Option<LoadFuture>,
    pub session: Option<Session>,
    ticker: FrameTicker,
    pub load_error: Option<LoadError>,
    /// Where the board was last drawn, for pointer hits.
    pub layout: Option<BoardLayout>,
    pub guess_buffer: String,
    /// Option chosen outside a running round, applied by the next restart.
    pub pending_option: Option<i32>,
    pub new_best: bool,
}

impl GameView {
    pub fn mount(kind: GameKind, registry: &mut ModuleRegistry) -> Self {
        debug!("mounting {}", kind.module_name());
        Self {
            kind,
            load: Some(registry.load(kind.module_name())),
            session: None,
            ticker: FrameTicker::new(),
            load_error: None,
            layout: None,
            guess_buffer: String::new(),
            pending_option: None,
            new_best: false,
        }
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_scheduled()
    }

    pub fn unmount(&mut self) {
        if self.ticker.cancel() {
            debug!("unmounted {}", self.kind.module_name());
        }
        self.load = None;
        self.session = None;
    }

    fn poll_load(&mut self, scores: &BestScores, config: &ArcadeConfig) {
        let Some(load) = &self.load else { return };
        let Some(result) = load.clone().now_or_never() else {
            return;
        };
        self.load = None;
        match result {
            Ok(handle) => {
                let profile = SessionProfile::for_game(self.kind, config.tick_interval(self.kind));
                let best = self.kind.score_key().map_or(0, |key| scores.get(key));
                let mut session = Session::new(handle, profile, best);
                session.start();
                if session.phase() == Phase::Running {
                    self.ticker.schedule();
                }
                self.session = Some(session);
            }
            Err(err) => self.load_error = Some(err),
        }
    }

    pub fn on_tick(&mut self, now_ms: u64, scores: &mut BestScores, config: &ArcadeConfig) {
        self.poll_load(scores, config);

        let mut outcome = FrameOutcome::Idle;
        if let Some(session) = self.session.as_mut() {
            self.ticker.fire(|| {
                outcome = session.frame(now_ms);
                if outcome.keeps_running() {
                    Reschedule::Again
                } else {
                    Reschedule::Stop
                }
            });
        }
        self.settle(outcome, scores);
    }

    fn settle(&mut self, outcome: FrameOutcome, scores: &mut BestScores) {
        if let FrameOutcome::Finished { score, improved } = outcome {
            if let (true, Some(key)) = (improved, self.kind.score_key()) {
                self.new_best = scores.record(key, score);
            }
        }
    }

    fn retry(&mut self, registry: &mut ModuleRegistry) {
        info!("retrying {}", self.kind.module_name());
        self.load_error = None;
        self.load = Some(registry.load(self.kind.module_name()));
    }

    pub fn dispatch(&mut self, action: Action, scores: &mut BestScores) {
        let Some(session) = self.session.as_mut() else { return };
        let outcome = match action {
            Action::Option(value) if session.phase() != Phase::Running => {
                self.pending_option = Some(value);
                FrameOutcome::Idle
            }
            Action::Restart => match self.pending_option.take() {
                Some(value) => session.start_with_option(value),
                None => session.input(action),
            },
            _ => session.input(action),
        };
        if action == Action::Restart {
            self.new_best = false;
            self.guess_buffer.clear();
            if session.phase() == Phase::Running {
                self.ticker.schedule();
            }
        }
        self.settle(outcome, scores);
    }

    pub fn on_key(&mut self, key: KeyEvent, registry: &mut ModuleRegistry, scores: &mut BestScores) {
        if self.load_error.is_some() {
            if matches!(key.code, KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::F(5)) {
                self.retry(registry);
            }
            return;
        }
        let Some(phase) = self.session.as_ref().map(Session::phase) else {
            return;
        };

        if key.code == KeyCode::Enter && phase == Phase::GameOver {
            self.dispatch(Action::Restart, scores);
            return;
        }
        if self.kind == GameKind::GuessTheNumber && phase == Phase::Running && self.edit_guess(key, scores) {
            return;
        }
        if let Some(action) = key_action(self.kind, key) {
            self.dispatch(action, scores);
        }
    }

    /// Digit entry for Guess the Number. Returns true if the key was used.
    fn edit_guess(&mut self, key: KeyEvent, scores: &mut BestScores) -> bool {
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if self.guess_buffer.len() < MAX_GUESS_DIGITS {
                    self.guess_buffer.push(c);
                }
                true
            }
            KeyCode::Backspace => {
                self.guess_buffer.pop();
                true
            }
            KeyCode::Enter => {
                if let Ok(value) = self.guess_buffer.parse::<i32>() {
                    self.dispatch(Action::Code(value), scores);
                }
                self.guess_buffer.clear();
                true
            }
            _ => false,
        }
    }

    pub fn on_pointer(&mut self, column: u16, row: u16, scores: &mut BestScores) {
        let cell = self.layout.as_ref().and_then(|layout| layout.hit(column, row));
        if let Some(action) = pointer_action(self.kind, cell) {
            self.dispatch(action, scores);
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub current_tab: Tab,
    pub selected_game: usize,
    pub show_high_scores: bool,
    pub show_debug: bool,
    pub registry: ModuleRegistry,
    pub best_scores: BestScores,
    pub config: ArcadeConfig,
    pub view: Option<GameView>,
    started: Instant,
}

impl App {
    pub fn new(config: ArcadeConfig, best_scores: BestScores) -> Self {
        Self {
            should_quit: false,
            current_tab: Tab::Home,
            selected_game: 0,
            show_high_scores: false,
            show_debug: false,
            registry: ModuleRegistry::builtin(),
            best_scores,
            config,
            view: None,
            started: Instant::now(),
        }
    }

    pub fn on_tick(&mut self) {
        let now_ms = self.started.elapsed().as_millis() as u64;
        if let Some(view) = self.view.as_mut() {
            view.on_tick(now_ms, &mut self.best_scores, &self.config);
        }
    }

    /// Switches tabs, tearing the old game view down first.
    pub fn open(&mut self, tab: Tab) {
        if tab == self.current_tab {
            return;
        }
        if let Some(mut old) = self.view.take() {
            old.unmount();
        }
        self.current_tab = tab;
        if let Tab::Game(kind) = tab {
            self.view = Some(GameView::mount(kind, &mut self.registry));
        }
    }

    pub fn shutdown(&mut self) {
        if let Some(mut view) = self.view.take() {
            view.unmount();
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Global keys
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                if matches!(self.current_tab, Tab::Home) {
                    self.should_quit = true;
                    return;
                }
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.prev_tab();
                } else {
                    self.next_tab();
                }
                return;
            }
            KeyCode::BackTab => {
                self.prev_tab();
                return;
            }
            KeyCode::Esc => {
                if !matches!(self.current_tab, Tab::Home) {
                    self.open(Tab::Home);
                    return;
                }
            }
            KeyCode::F(2) => {
                self.show_debug = !self.show_debug;
                return;
            }
            _ => {}
        }

        if matches!(self.current_tab, Tab::Home) {
            self.on_home_key(key);
            return;
        }

        if let Some(view) = self.view.as_mut() {
            view.on_key(key, &mut self.registry, &mut self.best_scores);
        }
    }

    fn on_home_key(&mut self, key: KeyEvent) {
        if !key.modifiers.is_empty() {
            return;
        }
        let games = GameKind::all();
        // Tiles are laid out in rows of three.
        let per_row = 3;
        match key.code {
            KeyCode::Char(c @ '1'..='6') => {
                let idx = c as usize - '1' as usize;
                self.selected_game = idx;
                self.open(Tab::Game(games[idx]));
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                self.show_high_scores = !self.show_high_scores;
            }
            KeyCode::Right => self.selected_game = (self.selected_game + 1) % games.len(),
            KeyCode::Left => self.selected_game = (self.selected_game + games.len() - 1) % games.len(),
            KeyCode::Down | KeyCode::Up => {
                self.selected_game = (self.selected_game + per_row) % games.len();
            }
            KeyCode::Enter => {
                if let Some(kind) = games.get(self.selected_game) {
                    self.open(Tab::Game(*kind));
                }
            }
            _ => {}
        }
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        if let Some(view) = self.view.as_mut() {
            view.on_pointer(mouse.column, mouse.row, &mut self.best_scores);
        }
    }

    fn next_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.open(tabs[(idx + 1) % tabs.len()]);
    }

    fn prev_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.open(tabs[(idx + tabs.len() - 1) % tabs.len()]);
    }
}
