use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent, KeyCode};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::{prelude::CrosstermBackend, Frame, Terminal};
use status_panel::render::{render, Node, RenderBackend, TuiBackend};
use status_panel::{PanelConfig, PanelRegistry, RawPanelConfig, StatusPanel};
use std::{
    io,
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Endpoint serving the shipment list as JSON
    #[clap(long, env = "PARCELTRACK_ENDPOINT")]
    endpoint: Option<String>,

    /// Poll cadence in minutes
    #[clap(long)]
    poll_interval_minutes: Option<f64>,
}

enum Event<I> {
    Input(I),
    Tick,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Cli::parse();

    // Configuration is validated before the panel enters its lifecycle;
    // a missing endpoint fails here, ahead of any network activity.
    let config = PanelConfig::try_from(RawPanelConfig {
        endpoint: args.endpoint,
        poll_interval_minutes: args.poll_interval_minutes,
    })?;

    let mut registry = PanelRegistry::new();
    registry.register("shipments", StatusPanel::new(config))?;
    registry.attach_all();

    let state = registry
        .get("shipments")
        .expect("panel should be registered")
        .state_handle();

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Set up event polling.
    let (tx, rx) = mpsc::channel();
    let tick_rate = Duration::from_millis(200);

    // Event polling thread.
    thread::spawn(move || {
        let mut last_tick = Instant::now();
        loop {
            let timeout = tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_secs(0));

            if event::poll(timeout).expect("should be able to poll for terminal events") {
                if let CEvent::Key(key) =
                    event::read().expect("should be able to read an event after a successful poll")
                {
                    tx.send(Event::Input(key))
                        .expect("should be able to send the key event via channel");
                }
            }

            if last_tick.elapsed() >= tick_rate && tx.send(Event::Tick).is_ok() {
                last_tick = Instant::now();
            }
        }
    });

    // Run app.
    loop {
        // Poll events.
        match rx.recv()? {
            Event::Input(event) => match event.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                _ => (),
            },
            Event::Tick => (),
        }

        // Regenerate the render tree from the current panel state.
        let snapshot = state
            .lock()
            .expect("should be able to lock panel state")
            .clone();
        let tree = render(&snapshot);

        terminal.draw(|frame| ui(frame, &tree))?;
    }

    // Clean up terminal.
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    terminal.clear()?;

    Ok(())
}

fn ui(frame: &mut Frame, tree: &Node) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(tree.title().unwrap_or_default().to_string());
    let content = Paragraph::new(TuiBackend.render(tree))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(content, frame.area());
}
