mod app;
mod event;
mod ui;

use std::fs::File;
use std::io;
use std::path::Path;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info, warn};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use app::{App, Tab};
use cellcade::config::{beside_executable, ArcadeConfig, Cli};
use cellcade::games::GameKind;
use cellcade::scores::BestScores;
use event::{Event, EventHandler};

/// Logs go to a file so they never land on the alternate screen.
fn init_logging(path: &Path, verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));
    match File::create(path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => {
            eprintln!("cellcade: cannot open log file {}: {}", path.display(), e);
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let log_path = cli.log.clone().unwrap_or_else(|| beside_executable("cellcade.log"));
    init_logging(&log_path, cli.verbose);

    let config = match ArcadeConfig::load(cli.config.as_deref()) {
        Ok(config) => config.with_cli(&cli),
        Err(e) => {
            error!("{}", e);
            eprintln!("cellcade: {}", e);
            std::process::exit(2);
        }
    };
    let best_scores = BestScores::load(cli.scores.as_deref());
    info!("starting, frame period {}ms", config.frame_ms());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let event_handler = EventHandler::new(config.frame_ms());
    let mut app = App::new(config, best_scores);
    if let Some(name) = cli.game.as_deref() {
        match GameKind::from_name(name) {
            Some(kind) => app.open(Tab::Game(kind)),
            None => warn!("unknown game `{}`, opening home", name),
        }
    }

    // Main loop
    let result = loop {
        if let Err(e) = terminal.draw(|frame| ui::render(frame, &mut app)) {
            break Err(e);
        }

        match event_handler.next() {
            Ok(Event::Tick) => app.on_tick(),
            Ok(Event::Key(key)) => app.on_key(key),
            Ok(Event::Mouse(mouse)) => app.on_mouse(mouse),
            Err(e) => break Err(e),
        }

        if app.should_quit {
            break Ok(());
        }
    };
    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    info!("bye");

    result
}
