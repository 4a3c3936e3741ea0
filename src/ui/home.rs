use ratatui::prelude::*;
use ratatui::widgets::*;

use cellcade::games::GameKind;
use cellcade::scores::BestScores;

use crate::ui::{centered, controls, key_hint, ACCENT, KEY_COLOR, PANEL_BG};

const BANNER: &str = r#"
 ╔═══════════════════════════════════════════════════════════════════════════╗
 ║   ██████╗ ███████╗ ██╗      ██╗       ██████╗  █████╗  ██████╗  ███████╗  ║
 ║  ██╔════╝ ██╔════╝ ██║      ██║      ██╔════╝ ██╔══██╗ ██╔══██╗ ██╔════╝  ║
 ║  ██║      █████╗   ██║      ██║      ██║      ███████║ ██║  ██║ █████╗    ║
 ║  ██║      ██╔══╝   ██║      ██║      ██║      ██╔══██║ ██║  ██║ ██╔══╝    ║
 ║  ╚██████╗ ███████╗ ███████╗ ███████╗ ╚██████╗ ██║  ██║ ██████╔╝ ███████╗  ║
 ║   ╚═════╝ ╚══════╝ ╚══════╝ ╚══════╝  ╚═════╝ ╚═╝  ╚═╝ ╚═════╝  ╚══════╝  ║
 ╚═══════════════════════════════════════════════════════════════════════════╝"#;

const TILES_PER_ROW: usize = 3;

fn dimmed(c: Color) -> Color {
    match c {
        Color::Rgb(r, g, b) => Color::Rgb(r / 2, g / 2, b / 2),
        other => other,
    }
}

fn render_game_tile(frame: &mut Frame, area: Rect, key: usize, kind: GameKind, selected: bool) {
    let border_color = if selected { ACCENT } else { dimmed(kind.color()) };
    let border_type = if selected { BorderType::Double } else { BorderType::Rounded };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 { return; }

    let name_color = if selected { Color::Rgb(255, 255, 255) } else { kind.color() };
    let desc_color = if selected { Color::Rgb(180, 180, 200) } else { Color::Rgb(120, 120, 140) };

    let mut lines = vec![Line::from(vec![
        Span::styled(format!("[{}] ", key), Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
        Span::styled(format!("{} ", kind.icon()), Style::default()),
        Span::styled(kind.title(), Style::default().fg(name_color).add_modifier(Modifier::BOLD)),
    ])];
    lines.extend(
        kind.tagline()
            .split('\n')
            .map(|l| Line::from(Span::styled(l, Style::default().fg(desc_color)))),
    );
    if selected {
        lines.push(Line::from(Span::styled(
            "▶ Enter to play",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn game_controls(kind: GameKind) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {} {}", kind.icon(), kind.title()),
            Style::default().fg(kind.color()).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("  {}", kind.tagline().replace('\n', " ")),
            Style::default().fg(Color::Rgb(100, 100, 120)),
        )),
        Line::from(""),
    ];
    lines.extend(controls(kind).iter().map(|(keys, desc)| key_hint(keys, desc)));
    lines
}

pub fn render_home(frame: &mut Frame, area: Rect, selected_game: usize, show_high_scores: bool, best: &BestScores) {
    let games = GameKind::all();
    let selected_kind = games[selected_game.min(games.len() - 1)];

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),  // Banner
            Constraint::Length(2),  // Subtitle
            Constraint::Length(12), // Game tiles
            Constraint::Min(10),    // Controls area
            Constraint::Length(2),  // Footer
        ])
        .split(area);

    let banner = Paragraph::new(BANNER)
        .style(Style::default().fg(KEY_COLOR))
        .alignment(Alignment::Center);
    frame.render_widget(banner, chunks[0]);

    let subtitle = Paragraph::new(Line::from(Span::styled(
        "  ⚡ Six games, one grid ⚡  ",
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD | Modifier::ITALIC),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(subtitle, chunks[1]);

    let games_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
        .title(" 🎮 Games  ↑↓←→ Select, Enter to Play ")
        .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD));
    let games_inner = games_block.inner(chunks[2]);
    frame.render_widget(games_block, chunks[2]);

    let rows = games.len().div_ceil(TILES_PER_ROW);
    let tile_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(games_inner);

    for (row_idx, row_area) in tile_rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, TILES_PER_ROW as u32); TILES_PER_ROW])
            .split(*row_area);
        for (col_idx, tile_area) in cols.iter().enumerate() {
            let idx = row_idx * TILES_PER_ROW + col_idx;
            if let Some(kind) = games.get(idx) {
                render_game_tile(frame, *tile_area, idx + 1, *kind, idx == selected_game);
            }
        }
    }

    let ctrl_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[3]);

    let section = |title: &'static str| {
        Line::from(Span::styled(title, Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)))
    };
    let controls = Paragraph::new(vec![
        Line::from(""),
        section("  🔧 Navigation"),
        key_hint("Tab / Shift+Tab", "Switch tabs"),
        key_hint("1-6", "Launch game"),
        key_hint("↑ ↓ ← →", "Select game"),
        key_hint("Enter", "Play selected"),
        key_hint("Esc", "Return to Home"),
        key_hint("q / Ctrl+C", "Quit"),
        Line::from(""),
        section("  🎮 Common"),
        key_hint("R / F5", "Restart game"),
        key_hint("F2", "Debug overlay"),
        key_hint("F3", "Single step"),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
            .title(" ⌨ Navigation Control ")
            .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(controls, ctrl_cols[0]);

    let game_ctrl = Paragraph::new(game_controls(selected_kind)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(50, 100, 140)))
            .title(format!(" 🎮 {} Control ", selected_kind.title()))
            .title_style(Style::default().fg(selected_kind.color()).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(game_ctrl, ctrl_cols[1]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("  🦀 ", Style::default().fg(Color::Rgb(255, 100, 50))),
        Span::styled(
            concat!("v", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Rgb(80, 80, 100)),
        ),
        Span::styled("  │  ", Style::default().fg(Color::Rgb(40, 40, 60))),
        Span::styled("H", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
        Span::styled(" Best Scores", Style::default().fg(Color::Rgb(100, 100, 130))),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[4]);

    if show_high_scores {
        render_best_scores_overlay(frame, area, best);
    }
}

fn render_best_scores_overlay(frame: &mut Frame, area: Rect, best: &BestScores) {
    let overlay_area = centered(area.inner(Margin::new(2, 2)), 44, 12);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Rgb(255, 200, 80)))
        .title(" 🏆 Best Scores ")
        .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(PANEL_BG));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let mut lines = vec![Line::from("")];
    for kind in GameKind::all() {
        let Some(key) = kind.score_key() else { continue };
        let score = best.get(key);
        let value = if score > 0 {
            Span::styled(
                format!("{:>6}", score),
                Style::default().fg(Color::Rgb(255, 215, 0)).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled("     -", Style::default().fg(Color::Rgb(60, 60, 80)))
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", kind.icon()), Style::default()),
            Span::styled(
                format!("{:<22}", kind.title()),
                Style::default().fg(kind.color()).add_modifier(Modifier::BOLD),
            ),
            value,
        ]));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(vec![
        Span::styled("  Press ", Style::default().fg(Color::Rgb(80, 80, 100))),
        Span::styled("H", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
        Span::styled(" to close", Style::default().fg(Color::Rgb(80, 80, 100))),
    ]));

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(PANEL_BG)), inner);
}
