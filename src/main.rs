//! JobTok - terminal client for the JobTok short-video job feed
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! jobtok
//!
//! # CLI mode (for automation)
//! jobtok feed --limit 10
//! jobtok submissions 3Fq9xYb2 --json
//! jobtok open 3Fq9xYb2 --player mpv
//! ```

use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableFocusChange, EnableFocusChange, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tokio::sync::oneshot;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use jobtok::app::{App, AppAction};
use jobtok::cli::{self, Cli, Command, ExitCode, Output};
use jobtok::commands;
use jobtok::config::Config;
use jobtok::feed::{FeedSource, FeedSpec};
use jobtok::models::VideoPost;
use jobtok::player::{LocalPlayer, PlayerError, PlayerType};
use jobtok::ui;

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

type FetchResult = anyhow::Result<Vec<VideoPost>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let guard = init_logging();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    info!("jobtok v{} starting", env!("CARGO_PKG_VERSION"));

    if cli.is_cli_mode() {
        let exit_code = run_cli(cli, &config).await;
        // Flush the log writer before exiting
        drop(guard);
        std::process::exit(exit_code.into());
    }

    let source = cli.source.clone().or_else(|| config.feed_source());
    run_tui(config, source).await
}

/// Daily-rolling file log; the terminal belongs to the TUI
fn init_logging() -> Option<WorkerGuard> {
    let log_dir = Config::log_dir();
    if std::fs::create_dir_all(&log_dir).is_err() {
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, "jobtok.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jobtok=debug"));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .ok()?;
    Some(guard)
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli, config: &Config) -> ExitCode {
    let output = Output::new(&cli);
    let source = cli.source.clone().or_else(|| config.feed_source());

    let Some(command) = cli.command else {
        return ExitCode::Success;
    };

    // Everything but `select` reads the feed
    let source = match (&command, source) {
        (Command::Select(_), _) => String::new(),
        (_, Some(source)) => source,
        (_, None) => {
            return output.error(
                "No feed source configured (use --source, JOBTOK_SOURCE or config.toml)",
                ExitCode::InvalidArgs,
            )
        }
    };

    match command {
        Command::Feed(cmd) => commands::feed_cmd(cmd, &source, &output).await,

        Command::Submissions(cmd) => {
            if let Err(e) = cli::validate_id(&cmd.video_id) {
                return output.error(e, ExitCode::InvalidArgs);
            }
            commands::submissions_cmd(cmd, &source, &output).await
        }

        Command::Profile(cmd) => {
            if let Err(e) = cli::validate_id(&cmd.user_id) {
                return output.error(e, ExitCode::InvalidArgs);
            }
            commands::profile_cmd(cmd, &source, &output).await
        }

        Command::Select(cmd) => commands::select_cmd(cmd, config, &output),

        Command::Open(cmd) => {
            if let Err(e) = cli::validate_id(&cmd.video_id) {
                return output.error(e, ExitCode::InvalidArgs);
            }
            commands::open_cmd(cmd, &source, config, &output).await
        }
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableFocusChange, LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_tui(config: Config, source: Option<String>) -> Result<()> {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableFocusChange, LeaveAlternateScreen);
        default_hook(info);
    }));

    let mut terminal = init_terminal()?;
    let mut app = App::from_config(&config);

    let result = run_event_loop(&mut terminal, &mut app, &config, source).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// Fetch the feed off the UI thread
fn spawn_fetch(source: &str) -> oneshot::Receiver<FetchResult> {
    let spec = FeedSpec::parse(source);
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let _ = tx.send(spec.fetch().await);
    });
    rx
}

/// Launch the external player without blocking the UI
fn spawn_player(player_type: PlayerType, uri: String) -> oneshot::Receiver<Result<(), PlayerError>> {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let player = LocalPlayer::new(player_type);
        let _ = tx.send(player.play_and_wait(&uri, true).await);
    });
    rx
}

/// Main event loop - handles input, updates state, renders UI
async fn run_event_loop(
    terminal: &mut Tui,
    app: &mut App,
    config: &Config,
    source: Option<String>,
) -> Result<()> {
    let tick_rate = config.tick_rate();
    let player_type = match config.player.as_deref().map(str::parse::<PlayerType>) {
        Some(Ok(p)) => p,
        Some(Err(e)) => {
            warn!(error = %e, "falling back to default player");
            PlayerType::default()
        }
        None => PlayerType::default(),
    };

    let size = terminal.size()?;
    app.resize(ui::page_height(Rect::new(0, 0, size.width, size.height)));

    let mut fetch_rx = match source.as_deref() {
        Some(source) => Some(spawn_fetch(source)),
        None => {
            app.load_failed("No feed source configured (use --source, JOBTOK_SOURCE or config.toml)");
            None
        }
    };
    let mut player_rx: Option<oneshot::Receiver<Result<(), PlayerError>>> = None;
    let mut last_tick = Instant::now();

    while app.running {
        terminal.draw(|frame| ui::render(frame, app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                // Only handle key press events (ignore releases on Windows)
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key);
                }
                Event::FocusGained => app.set_terminal_focus(true),
                Event::FocusLost => app.set_terminal_focus(false),
                Event::Resize(width, height) => {
                    app.resize(ui::page_height(Rect::new(0, 0, width, height)));
                }
                _ => {}
            }
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= tick_rate {
            app.tick(elapsed.min(Duration::from_secs(1)));
            last_tick = Instant::now();
        }

        if let Some(mut rx) = fetch_rx.take() {
            match rx.try_recv() {
                Ok(Ok(posts)) => app.load_posts(posts),
                Ok(Err(e)) => {
                    error!(error = %e, "feed fetch failed");
                    app.load_failed(format!("Failed to load feed: {:#}", e));
                }
                Err(oneshot::error::TryRecvError::Empty) => fetch_rx = Some(rx),
                Err(oneshot::error::TryRecvError::Closed) => {
                    app.load_failed("Feed task failed");
                }
            }
        }

        if let Some(mut rx) = player_rx.take() {
            match rx.try_recv() {
                Ok(Ok(())) => app.status = Some(format!("{} closed", player_type)),
                Ok(Err(e)) => app.set_error(e.to_string()),
                Err(oneshot::error::TryRecvError::Empty) => player_rx = Some(rx),
                Err(oneshot::error::TryRecvError::Closed) => {}
            }
        }

        match app.take_action() {
            Some(AppAction::Refresh) => match source.as_deref() {
                Some(source) => fetch_rx = Some(spawn_fetch(source)),
                None => app.load_failed("No feed source configured"),
            },
            Some(AppAction::OpenExternal(post)) => {
                info!(video = %post.id, "opening in external player");
                app.status = Some(format!("Opening {} in {}...", post.handle(), player_type));
                player_rx = Some(spawn_player(player_type, post.uri));
            }
            None => {}
        }
    }

    Ok(())
}
