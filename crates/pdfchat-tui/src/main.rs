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
use tokio_util::sync::CancellationToken;

use pdfchat_core::{ChatHistoryStore, Generator, OpenAiChat, SessionController};
use pdfchat_pdf_mupdf::MupdfBackend;

mod action;
mod app;
mod input;
mod logging;
mod theme;
mod view;

use app::App;

/// pdfchat: ask questions about PDF documents from the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Chat history file (overrides config and PDFCHAT_HISTORY_FILE)
    #[arg(long)]
    history_file: Option<PathBuf>,

    /// Chat-completion model identifier
    #[arg(long)]
    model: Option<String>,

    /// OpenAI-compatible API base URL
    #[arg(long)]
    api_base: Option<String>,

    /// Color theme: hacker (default) or modern
    #[arg(long)]
    theme: Option<String>,

    /// Directory for log files
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let _log_guard = logging::init(args.log_dir.clone().unwrap_or_else(logging::log_dir))?;

    // Resolve config from CLI flags > env vars > config files > defaults
    let mut config = pdfchat_core::config_file::resolve_config();
    if let Some(path) = args.history_file {
        config.history_path = path;
    }
    if let Some(model) = args.model {
        config.model = model;
    }
    if let Some(base) = args.api_base {
        config.api_base = base;
    }
    if let Some(theme) = args.theme {
        config.theme = theme;
    }
    tracing::info!(?config, "starting pdfchat");

    let model = OpenAiChat::with_timeout(
        config.api_base.clone(),
        config.api_key.clone(),
        config.model.clone(),
        config.request_timeout,
    )?;
    let controller = SessionController::new(
        ChatHistoryStore::new(&config.history_path),
        Generator::new(Arc::new(model)),
        Arc::new(MupdfBackend::new()),
    );
    let mut app = App::new(controller, theme::Theme::by_name(&config.theme));

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

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    // Raw mode delivers Ctrl+C as a key event; this catches SIGINT sent from
    // outside the terminal.
    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    let result = run(&mut terminal, &mut app, &cancel).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    tracing::info!("pdfchat exiting");
    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| app.view(f))?;

        if event::poll(tick_rate)? {
            let evt = event::read()?;
            let action = input::map_event(&evt, &app.input_mode);
            if let Some(cmd) = app.update(action) {
                // One step at a time: show the busy overlay, then wait for
                // the controller before reading more input.
                app.begin(&cmd);
                terminal.draw(|f| app.view(f))?;
                app.run_command(cmd).await;
            }
        }

        app.update(action::Action::Tick);

        if app.should_quit || cancel.is_cancelled() {
            return Ok(());
        }
    }
}
