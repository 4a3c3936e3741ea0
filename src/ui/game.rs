use ratatui::prelude::*;
use ratatui::widgets::*;

use cellcade::cell::classify;
use cellcade::error::SessionError;
use cellcade::games::{guess, rps, tictactoe, GameKind};
use cellcade::module::Op;
use cellcade::session::{Phase, Session, SessionState};

use crate::app::GameView;
use crate::ui::{centered, controls, key_hint, ACCENT, DIM, PANEL_BG};

const TTT_CELL_W: u16 = 9;
const TTT_CELL_H: u16 = 5;
const ERROR_COLOR: Color = Color::Rgb(255, 100, 100);

/// Screen placement of a drawn board, used to map pointer presses to cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardLayout {
    pub x: u16,
    pub y: u16,
    pub cols: usize,
    pub rows: usize,
    pub cell_w: u16,
    pub cell_h: u16,
}

impl BoardLayout {
    pub fn hit(&self, column: u16, row: u16) -> Option<usize> {
        if column < self.x || row < self.y || self.cell_w == 0 || self.cell_h == 0 {
            return None;
        }
        let cx = ((column - self.x) / self.cell_w) as usize;
        let cy = ((row - self.y) / self.cell_h) as usize;
        if cx >= self.cols || cy >= self.rows {
            return None;
        }
        Some(cy * self.cols + cx)
    }
}

pub fn render_game(frame: &mut Frame, area: Rect, view: &mut GameView, show_debug: bool) {
    let kind = view.kind;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // HUD
            Constraint::Min(0),   // Board + controls
        ])
        .split(area);
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(40)])
        .split(chunks[1]);

    render_controls(frame, body[1], kind);

    let board_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(kind.color()))
        .title(format!(" {} {} ", kind.icon(), kind.title()))
        .title_style(Style::default().fg(kind.color()).add_modifier(Modifier::BOLD));
    let board_area = board_block.inner(body[0]);
    frame.render_widget(board_block, body[0]);

    view.layout = None;

    if let Some(err) = &view.load_error {
        render_hud(frame, chunks[0], kind, None, false);
        render_notice(
            frame,
            board_area,
            "⚠ Load failed",
            &err.to_string(),
            "Press R to retry",
        );
        return;
    }

    let Some(session) = view.session.as_ref() else {
        render_hud(frame, chunks[0], kind, None, false);
        let text = Paragraph::new(Span::styled(
            format!("Loading {}…", kind.title()),
            Style::default().fg(DIM),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(text, centered(board_area, board_area.width, 1));
        return;
    };

    render_hud(frame, chunks[0], kind, Some(session), view.new_best);

    let layout = match kind {
        GameKind::Snake | GameKind::Pacman | GameKind::FlappyBird => {
            Some(render_grid(frame, board_area, kind, session.state()))
        }
        GameKind::TicTacToe => Some(render_tictactoe(frame, board_area, session.state())),
        GameKind::GuessTheNumber => {
            render_guess(frame, board_area, session.state(), &view.guess_buffer, view.pending_option);
            None
        }
        GameKind::RockPaperScissors => {
            render_rps(frame, board_area, session.state());
            None
        }
    };

    match (session.phase(), &session.state().last_error) {
        (Phase::Errored, Some(err)) | (Phase::Starting, Some(err)) => {
            let title = match err {
                SessionError::MissingOperation(_) => "⚠ Cannot start",
                SessionError::StateRead(_) => "⚠ Game stopped",
            };
            let hint = if kind == GameKind::RockPaperScissors {
                "Press F5 to retry"
            } else {
                "Press R to retry"
            };
            render_notice(frame, board_area, title, &err.to_string(), hint);
        }
        (Phase::GameOver, _) if kind.stat_slots() == 0 => {
            render_notice(
                frame,
                board_area,
                "GAME OVER",
                &format!("Score {}", session.state().score),
                "Enter / R to play again",
            );
        }
        _ => {}
    }

    if show_debug {
        render_debug(frame, board_area, session, view.is_ticking());
    }

    view.layout = layout;
}

fn render_hud(frame: &mut Frame, area: Rect, kind: GameKind, session: Option<&Session>, new_best: bool) {
    let label = Style::default().fg(DIM);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

    let mut spans = Vec::new();
    if let Some(session) = session {
        let state = session.state();
        let caps = session.module().capabilities();
        if caps.has(Op::Score) {
            spans.push(Span::styled(" Score ", label));
            spans.push(Span::styled(state.score.to_string(), value));
            spans.push(Span::styled("   Best ", label));
            spans.push(Span::styled(state.best_score.to_string(), value));
        }
        if kind == GameKind::GuessTheNumber {
            spans.push(Span::styled(" Attempts ", label));
            spans.push(Span::styled(state.stat(guess::STAT_ATTEMPTS as usize).to_string(), value));
            spans.push(Span::styled("   Range ", label));
            spans.push(Span::styled(format!("1-{}", state.stat(guess::STAT_MAX as usize)), value));
        }
        spans.push(Span::styled("   ", label));
        spans.push(status_span(kind, session));
        if new_best {
            spans.push(Span::styled(
                "   🏆 NEW BEST!",
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ));
        }
    }

    let hud = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 150, 200))),
    );
    frame.render_widget(hud, area);
}

fn mark_name(code: i32) -> &'static str {
    match u8::try_from(code) {
        Ok(b'X') => "X",
        Ok(b'O') => "O",
        _ => "?",
    }
}

fn status_span(kind: GameKind, session: &Session) -> Span<'static> {
    let state = session.state();
    let (text, color) = match (kind, session.phase()) {
        (_, Phase::Errored) => ("Error".to_string(), ERROR_COLOR),
        (_, Phase::Starting) => ("Starting".to_string(), DIM),
        (GameKind::TicTacToe, _) => match u8::try_from(state.stat(tictactoe::STAT_WINNER as usize)) {
            Ok(b'D') => ("Draw!".to_string(), ACCENT),
            Ok(b'X') | Ok(b'O') => (
                format!("{} wins!", mark_name(state.stat(tictactoe::STAT_WINNER as usize))),
                ACCENT,
            ),
            _ => (
                format!("{} to move", mark_name(state.stat(tictactoe::STAT_CURRENT_PLAYER as usize))),
                Color::White,
            ),
        },
        (GameKind::GuessTheNumber, Phase::GameOver) => ("Solved!".to_string(), ACCENT),
        (_, Phase::GameOver) => ("Game over".to_string(), ERROR_COLOR),
        (_, Phase::Running) => ("Playing".to_string(), Color::Rgb(80, 220, 120)),
    };
    Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD))
}

fn render_controls(frame: &mut Frame, area: Rect, kind: GameKind) {
    let mut lines = vec![Line::from("")];
    lines.extend(controls(kind).iter().map(|(keys, desc)| key_hint(keys, desc)));
    lines.push(Line::from(""));
    lines.push(key_hint("F2", "Debug overlay"));
    lines.push(key_hint("Esc", "Back to Home"));

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(50, 100, 140)))
            .title(" ⌨ Controls ")
            .title_style(Style::default().fg(kind.color()).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(panel, area);
}

/// Draws a character grid two columns per cell.
fn render_grid(frame: &mut Frame, area: Rect, kind: GameKind, state: &SessionState) -> BoardLayout {
    let w = (state.width as u16 * 2).min(area.width);
    let h = (state.height as u16).min(area.height);
    let board = centered(area, w, h);

    let lines: Vec<Line> = (0..state.height)
        .map(|y| {
            Line::from(
                (0..state.width)
                    .map(|x| {
                        let cell = classify(kind, i32::from(state.cell(x, y)));
                        Span::styled(cell.glyph(), cell.style())
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), board);

    BoardLayout {
        x: board.x,
        y: board.y,
        cols: state.width,
        rows: state.height,
        cell_w: 2,
        cell_h: 1,
    }
}

fn render_tictactoe(frame: &mut Frame, area: Rect, state: &SessionState) -> BoardLayout {
    let cols = state.width.max(1);
    let rows = state.height.max(1);
    let board = centered(area, TTT_CELL_W * cols as u16, TTT_CELL_H * rows as u16);

    for y in 0..rows {
        for x in 0..cols {
            let rect = Rect::new(
                board.x + x as u16 * TTT_CELL_W,
                board.y + y as u16 * TTT_CELL_H,
                TTT_CELL_W,
                TTT_CELL_H,
            )
            .intersection(board);
            let cell = classify(GameKind::TicTacToe, i32::from(state.cell(x, y)));
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Rgb(60, 60, 90)));
            let inner = block.inner(rect);
            frame.render_widget(block, rect);

            let content = if cell.is_empty() {
                Span::styled(
                    (y * cols + x + 1).to_string(),
                    Style::default().fg(Color::Rgb(60, 60, 80)),
                )
            } else {
                Span::styled(cell.glyph(), cell.style().bg(Color::Reset))
            };
            frame.render_widget(
                Paragraph::new(content).alignment(Alignment::Center),
                centered(inner, inner.width, 1),
            );
        }
    }

    BoardLayout {
        x: board.x,
        y: board.y,
        cols,
        rows,
        cell_w: TTT_CELL_W,
        cell_h: TTT_CELL_H,
    }
}

fn render_guess(frame: &mut Frame, area: Rect, state: &SessionState, buffer: &str, pending: Option<i32>) {
    let max = state.stat(guess::STAT_MAX as usize);
    let attempts = state.stat(guess::STAT_ATTEMPTS as usize);
    let last = state.stat(guess::STAT_LAST_GUESS as usize);
    let delta = state.stat(guess::STAT_DELTA as usize);

    let feedback = if state.game_over {
        Span::styled(
            format!("🎉 {} is right! Found in {} tries.", last, attempts),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )
    } else if attempts == 0 {
        Span::styled("Make your first guess.", Style::default().fg(DIM))
    } else if delta > 0 {
        Span::styled(format!("{} is too high ↓", last), Style::default().fg(ERROR_COLOR))
    } else {
        Span::styled(format!("{} is too low ↑", last), Style::default().fg(Color::Rgb(110, 170, 255)))
    };

    let entry = format!("{:_<width$}", buffer, width = max.to_string().len());
    let lines = vec![
        Line::from(Span::styled(
            format!("I'm thinking of a number from 1 to {}", max),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Your guess: [ ", Style::default().fg(DIM)),
            Span::styled(entry, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
            Span::styled(" ]", Style::default().fg(DIM)),
        ]),
        Line::from(""),
        Line::from(feedback),
        Line::from(""),
        Line::from(Span::styled(
            if state.game_over { "Enter / R for a new number" } else { "" },
            Style::default().fg(DIM),
        )),
        Line::from(Span::styled(
            pending.map(|max| format!("Next round: 1 to {}", max)).unwrap_or_default(),
            Style::default().fg(DIM),
        )),
    ];
    let h = lines.len() as u16;
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        centered(area, area.width, h),
    );
}

fn choice(code: i32) -> &'static str {
    match code {
        rps::ROCK => "✊ Rock",
        rps::PAPER => "✋ Paper",
        rps::SCISSORS => "✌ Scissors",
        _ => "…",
    }
}

fn render_rps(frame: &mut Frame, area: Rect, state: &SessionState) {
    let result = state.stat(rps::STAT_RESULT as usize);
    let showing = result != rps::NO_RESULT;

    let (verdict, color) = match result {
        rps::PLAYER_WINS => ("You win!", Color::Rgb(80, 220, 120)),
        rps::COMPUTER_WINS => ("Computer wins", ERROR_COLOR),
        rps::TIE => ("Tie", ACCENT),
        _ => ("Choose rock, paper or scissors", DIM),
    };

    let bold = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let mut lines = vec![];
    if showing {
        lines.push(Line::from(vec![
            Span::styled("You  ", Style::default().fg(DIM)),
            Span::styled(choice(state.stat(rps::STAT_PLAYER_CHOICE as usize)), bold),
            Span::styled("    vs    ", Style::default().fg(DIM)),
            Span::styled(choice(state.stat(rps::STAT_COMPUTER_CHOICE as usize)), bold),
            Span::styled("  CPU", Style::default().fg(DIM)),
        ]));
    } else {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        verdict,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(
            "Wins {}   Losses {}   Ties {}   Rounds {}",
            state.stat(rps::STAT_PLAYER_WINS as usize),
            state.stat(rps::STAT_COMPUTER_WINS as usize),
            state.stat(rps::STAT_TIES as usize),
            state.stat(rps::STAT_TOTAL as usize),
        ),
        Style::default().fg(DIM),
    )));
    if showing {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("N for the next round", Style::default().fg(DIM))));
    }

    let h = lines.len() as u16;
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        centered(area, area.width, h),
    );
}

fn render_notice(frame: &mut Frame, area: Rect, title: &str, detail: &str, hint: &str) {
    let w = (detail.chars().count().max(hint.len()) as u16 + 6).max(28);
    let rect = centered(area, w, 6);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(ERROR_COLOR))
        .title(format!(" {} ", title))
        .title_style(Style::default().fg(ERROR_COLOR).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(PANEL_BG));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(detail.to_string(), Style::default().fg(Color::White))),
        Line::from(Span::styled(hint.to_string(), Style::default().fg(ACCENT))),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn render_debug(frame: &mut Frame, area: Rect, session: &Session, ticking: bool) {
    let state = session.state();
    let occupied = state.board.iter().filter(|c| **c != 0 && **c != b' ').count();
    let tick = match session.profile().tick_ms {
        Some(ms) => format!("{}ms", ms),
        None => "every frame".to_string(),
    };
    let lines = vec![
        Line::from(format!(" {}x{} board, {} non-empty", state.width, state.height, occupied)),
        Line::from(format!(" phase {:?}, ticker {}", session.phase(), if ticking { "on" } else { "off" })),
        Line::from(format!(" steps {}, reads {}, tick {}", session.steps(), session.reads(), tick)),
        Line::from(format!(" exports {:?}", session.module().capabilities())),
    ];
    let w = 48.min(area.width);
    let rect = Rect::new(area.x + area.width.saturating_sub(w), area.y, w, 6.min(area.height));
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(DIM).bg(PANEL_BG))
            .block(Block::default().borders(Borders::ALL).title(" debug ")),
        rect,
    );
}
