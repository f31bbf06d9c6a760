mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::{ENV_API_URL, ENV_BRACKET_JSON, ENV_LOG, ENV_TOURNAMENT};
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use anyhow::Context;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::error;
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};
use wrestling_api::{Analysis, client};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_cli_args()? {
        return Ok(());
    }

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(log::LevelFilter::Trace)?;
    tui_logger::set_default_level(log::LevelFilter::Info);

    let app = App::new();
    let source = app.settings.source.clone();
    let startup = app.startup_request();
    let app = Arc::new(Mutex::new(app));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(source, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(
        terminal,
        app,
        ui_event_rx,
        network_req_tx,
        network_resp_rx,
        startup,
    )
    .await;

    input_handler.abort();
    network_task.abort();

    Ok(())
}

/// Returns `Ok(true)` when the arguments were handled and the process should exit.
fn handle_cli_args() -> anyhow::Result<bool> {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return Ok(false);
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            Ok(true)
        }
        "-V" | "--version" => {
            println!("matbracket {}", env!("CARGO_PKG_VERSION"));
            Ok(true)
        }
        "--json" => {
            let Some(path) = args.next() else {
                eprintln!("--json needs a file argument\n\n{}", usage_text());
                std::process::exit(2);
            };
            print_analysis(&path)?;
            Ok(true)
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

/// Analyse a snapshot without starting the terminal UI.
fn print_analysis(path: &str) -> anyhow::Result<()> {
    let payload = client::load_bracket_file(path)
        .with_context(|| format!("loading bracket snapshot {path}"))?;
    let analysis = Analysis::from_value(Some(&payload));
    let out = serde_json::to_string_pretty(&analysis.to_json())?;
    println!("{out}");
    Ok(())
}

fn usage_text() -> String {
    format!(
        "matbracket - wrestling tournament bracket viewer

Usage:
  matbracket
  matbracket --json <FILE>
  matbracket --help
  matbracket --version

Environment:
  {ENV_API_URL:<24} Base URL of the bracket API (unset: bundled demo bracket)
  {ENV_BRACKET_JSON:<24} Path to a local bracket snapshot; overrides the API
  {ENV_TOURNAMENT:<24} Tournament id to open on startup
  {ENV_LOG:<24} Log level: error, warn, info, debug or trace"
    )
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
    startup: NetworkRequest,
) {
    let mut loading = LoadingState::default();
    let mut startup = Some(startup);

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw =
                    handle_ui_event(ui_event, &app, &network_requests, &mut startup).await;
                if should_redraw && !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw = handle_network_response(response, &app, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
    startup: &mut Option<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            if let Some(request) = startup.take() {
                let _ = network_requests.send(request).await;
            }
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Resize => true,
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        NetworkResponse::TournamentsLoaded { tournaments } => {
            let mut guard = app.lock().await;
            guard.on_tournaments_loaded(tournaments);
        }
        NetworkResponse::BracketLoaded { tournament_id, payload } => {
            let mut guard = app.lock().await;
            guard.on_bracket_loaded(tournament_id, payload);
        }
        NetworkResponse::Error { message } => {
            error!("Network error: {message}");
            let mut guard = app.lock().await;
            guard.on_error(message);
        }
    }
    !loading.is_loading
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        let Ok(event) = tokio::task::spawn_blocking(crossterm_event::read).await else {
            break;
        };
        let ui_event = match event {
            Ok(Event::Key(key_event)) => Some(UiEvent::KeyPressed(key_event)),
            Ok(Event::Resize(_, _)) => Some(UiEvent::Resize),
            _ => None,
        };

        if let Some(ui_event) = ui_event
            && ui_events.send(ui_event).await.is_err()
        {
            break;
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
