//! Terminal UI for coleta that lets users filter collection points by item and contact them.

mod app;
mod config;
mod effects;
mod input;
mod location;
mod logging;
mod tasks;
mod ui;

use std::{io, sync::Arc, time::Duration as StdDuration};

use anyhow::Result;
use coleta_core::service::ColetaService;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::info;

use crate::app::App;
use crate::effects::Followup;
use crate::input::Action;
use crate::location::ConfiguredLocation;
use crate::tasks::{Tasks, Update};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    logging::init(&config.log)?;

    // HTTP + service setup
    let client = Client::builder()
        .user_agent(config.api.user_agent.as_str())
        .build()?;
    let backend = coleta_provider_http::backend(client, &config.api.base_url);
    let location = Arc::new(ConfiguredLocation::from_config(&config.location));
    let service = Arc::new(ColetaService::new(backend, location));
    info!(origin = service.origin(), "starting coleta");

    let (updates_tx, updates_rx) = mpsc::unbounded_channel();
    let tasks = Tasks::new(service, updates_tx);

    // App state
    let mut app = App::new(&config);
    tasks.start_discovery(app.discovery.activate());

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app, &tasks, updates_rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    tasks: &Tasks,
    mut updates: UnboundedReceiver<Update>,
) -> Result<()> {
    loop {
        // Apply finished fetches one at a time before drawing
        while let Ok(update) = updates.try_recv() {
            app.apply(update);
        }

        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (small timeout so finished fetches show up promptly)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match input::handle_key_event(key, &mut app) {
                Action::Quit => break,
                Action::None => {}
                Action::ToggleCategory(id) => {
                    let issued = app.discovery.toggle(id);
                    tasks.query_points(issued);
                }
                Action::Dispatch(intent) => match effects::dispatch(intent, &mut app) {
                    Followup::Quit => break,
                    Followup::None => {}
                    Followup::LoadDetail(request) => tasks.load_detail(request),
                },
            }
        }
    }

    Ok(())
}
