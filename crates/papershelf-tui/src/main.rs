use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use papershelf_core::config_file;
use papershelf_core::{CatalogBackend, ClientConfig, HttpCatalog, Session};

mod action;
mod app;
mod backend;
mod input;
mod model;
mod theme;
mod tui_event;
mod view;

use app::App;

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "PAPERSHELF_LOG";
const DEFAULT_FPS: u32 = 10;

/// Papershelf: browse, search and upload papers in a catalog service.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Catalog service base URL (overrides PAPERSHELF_URL and the config file)
    #[arg(long)]
    url: Option<String>,

    /// Color theme: hacker (default) or modern
    #[arg(long)]
    theme: Option<String>,

    /// Frames per second for redraws
    #[arg(long)]
    fps: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let _log_guard = init_logging();

    // Resolve config from CLI flags > env vars > config file > defaults
    let file_config = config_file::load_config();
    let client_config = ClientConfig::resolve(
        args.url,
        std::env::var(papershelf_core::URL_ENV).ok(),
        &file_config,
    )?;
    let display = file_config.display.clone().unwrap_or_default();
    let theme_name = args
        .theme
        .or(display.theme)
        .unwrap_or_else(|| "hacker".to_string());
    let fps = args.fps.or(display.fps).unwrap_or(DEFAULT_FPS).clamp(1, 60);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        catalog = %client_config.base_url,
        "papershelf starting"
    );
    let catalog: Arc<dyn CatalogBackend> = Arc::new(HttpCatalog::new(&client_config)?);

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let backend_terminal = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_terminal)?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let mut app = App::new(Session::new(), &theme_name);
    app.catalog_url = client_config.base_url.clone();

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<tui_event::BackendCommand>();
    let cancel = CancellationToken::new();
    app.backend_cmd_tx = Some(cmd_tx);

    tokio::spawn(backend::run(catalog, cmd_rx, event_tx, cancel.clone()));

    // Also handle Ctrl+C at the OS level for clean shutdown
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    app.start();

    let tick_rate = Duration::from_millis(1000 / fps as u64);

    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            maybe_event = event_rx.recv() => {
                if let Some(backend_event) = maybe_event {
                    app.handle_backend_event(backend_event);
                    // Drain any additional queued backend events
                    while let Ok(evt) = event_rx.try_recv() {
                        app.handle_backend_event(evt);
                    }
                }
            }
            _ = cancel.cancelled() => {
                app.should_quit = true;
            }
            _ = async {
                if event::poll(tick_rate).unwrap_or(false)
                    && let Ok(evt) = event::read()
                {
                    let action = input::map_event(&evt, app.input_mode);
                    app.update(action);
                }
            } => {}
        }

        app.update(action::Action::Tick);

        if app.should_quit {
            cancel.cancel();
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    tracing::info!("papershelf exiting");

    Ok(())
}

/// Directory for rolling log files: `<data_dir>/papershelf/logs`.
fn log_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("papershelf").join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("papershelf").join("logs"))
}

/// Log to a daily file; the terminal belongs to the UI. The guard must live
/// until exit so buffered lines are flushed.
fn init_logging() -> tracing_appender::non_blocking::WorkerGuard {
    let dir = log_dir();
    let file_appender = tracing_appender::rolling::daily(&dir, "papershelf.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("papershelf=info"));
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    prune_old_logs(&dir);
    guard
}

/// Remove rolled-over log files from previous days.
fn prune_old_logs(dir: &std::path::Path) {
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with("papershelf.log.") && !name.ends_with(&today) {
            let _ = std::fs::remove_file(entry.path());
        }
    }
}
