//! Lenddesk - a terminal dashboard for lending platform customers.
//!
//! Fetches the customer list once, caches it locally, and offers a
//! keyboard-driven login, filterable paginated table and detail view.

mod app;
mod ui;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lenddesk_core::{ApiClient, Config, LoadState, Loader, SessionGate, Storage};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

const LOG_FILE_PREFIX: &str = "lenddesk.log";

const USAGE: &str = "\
Usage: lenddesk [COMMAND]

Commands:
  (none)            Run the dashboard
  --dump-users      Print cached users as JSON, fetching them first if needed
  --login <email>   Log in without starting the dashboard
  --logout          Clear the saved session
  --reset           Delete all locally stored data
  --help            Show this message";

/// What the binary was asked to do.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Tui,
    DumpUsers,
    Login(String),
    Logout,
    Reset,
    Help,
}

fn parse_args(args: &[String]) -> Result<Command> {
    let Some(first) = args.get(1) else {
        return Ok(Command::Tui);
    };

    match first.as_str() {
        "--dump-users" => Ok(Command::DumpUsers),
        "--logout" => Ok(Command::Logout),
        "--reset" => Ok(Command::Reset),
        "--help" | "-h" => Ok(Command::Help),
        "--login" => {
            let email = args
                .get(2)
                .filter(|e| !e.trim().is_empty())
                .ok_or_else(|| anyhow::anyhow!("--login requires an email address"))?;
            Ok(Command::Login(email.clone()))
        }
        other => anyhow::bail!("Unknown argument: {}\n\n{}", other, USAGE),
    }
}

/// Logging for one-shot commands goes to stderr
fn init_stderr_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// The dashboard owns the terminal, so its logs go to a daily file.
/// The returned guard flushes the writer on drop.
fn init_file_tracing(log_dir: PathBuf) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().collect();
    let command = parse_args(&args)?;

    if command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = Config::load().context("Failed to load configuration")?;
    let data_dir = config.data_dir()?;

    if command == Command::Tui {
        let _guard = init_file_tracing(config.log_dir()?);
        let storage = Storage::open(data_dir.clone())
            .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;
        return run_tui(config, storage).await;
    }

    init_stderr_tracing();
    let storage = Storage::open(data_dir.clone())
        .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;

    match command {
        Command::DumpUsers => dump_users(&config, &storage).await,
        Command::Login(email) => login(config, &storage, &email).await,
        Command::Logout => {
            SessionGate::from_storage(&storage).logout(&storage);
            eprintln!("Logged out.");
            Ok(())
        }
        Command::Reset => {
            storage
                .clear_all()
                .context("Failed to delete stored data")?;
            eprintln!("Deleted all stored data in {}", data_dir.display());
            Ok(())
        }
        Command::Tui | Command::Help => Ok(()),
    }
}

/// Fetch users if the cache is empty. Errors only when nothing is cached
/// afterwards.
async fn ensure_users(config: &Config, storage: &Storage) -> Result<()> {
    let client = ApiClient::new(config.api_url())?;
    let mut rng = StdRng::from_entropy();
    let mut loader = Loader::new();

    if !storage.has_users() {
        eprintln!("Fetching users from {}...", client.users_url());
    }

    match loader.bootstrap(storage, &client, &mut rng).await {
        LoadState::Ready => Ok(()),
        state => anyhow::bail!("Could not fetch users (loader state: {:?})", state),
    }
}

/// Print cached users to stdout as pretty JSON
async fn dump_users(config: &Config, storage: &Storage) -> Result<()> {
    ensure_users(config, storage).await?;

    let users = storage.get_users();
    let json = serde_json::to_string_pretty(&users)?;
    println!("{}", json);

    eprintln!("{} users exported.", users.len());
    Ok(())
}

/// Log in from the command line, prompting for the password
async fn login(mut config: Config, storage: &Storage, email: &str) -> Result<()> {
    ensure_users(&config, storage).await?;

    print!("Password for {}: ", email);
    io::stdout().flush()?;
    let password = rpassword::read_password().context("Failed to read password")?;

    let mut session = SessionGate::from_storage(storage);
    let user = session.attempt_login(storage, email, &password)?;

    config.last_email = Some(user.email.clone());
    config.save()?;

    eprintln!("Logged in as {} ({})", user.username, user.organization);
    Ok(())
}

async fn run_tui(config: Config, storage: Storage) -> Result<()> {
    info!("Lenddesk starting");

    let config_path = Config::config_path()?;
    let mut app = App::new(config, config_path, storage)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Fetch users in the background when nothing is cached
    app.start_initial_load();

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("Lenddesk shutting down");
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return Ok(());
                }

                if handle_input(app, key)? {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
