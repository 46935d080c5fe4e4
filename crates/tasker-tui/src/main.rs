use std::io;

use anyhow::{anyhow, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tasker_service::BlockingHttpService;
use tasker_tui::app::{App, AppConfig};
use tasker_tui::config::Config;
use tasker_tui::logging;
use tracing::info;

fn main() -> Result<()> {
    let config = Config::parse();
    logging::init(&config.log_file)?;

    let initial_route = config.initial_route()?;
    let server_url = config.server_url();
    info!(server_url, route = %initial_route, "starting tasker");

    let service = match config.token.clone() {
        Some(token) => BlockingHttpService::with_token(server_url, token),
        None => BlockingHttpService::new(server_url),
    }
    .map_err(|e| anyhow!("failed to create client: {e}"))?;

    let app_config = AppConfig {
        initial_route,
        edit_rules: config.edit_rules(),
        ..AppConfig::default()
    };

    run_tui(service, app_config)
}

fn run_tui(service: BlockingHttpService, config: AppConfig) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, service, config);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:#}");
    }

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    service: BlockingHttpService,
    config: AppConfig,
) -> Result<()> {
    let mut app = App::new(service, config)?;

    while !app.should_quit() {
        terminal.draw(|frame| app.render(frame))?;

        if let Event::Key(key) = event::read()? {
            // Ctrl+C always quits
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }
            // q quits unless a form or overlay has the keyboard
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q')) && !app.is_modal() {
                break;
            }
            app.handle_key(key);
        }
    }

    info!("exiting");
    Ok(())
}
