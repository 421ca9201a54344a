//! Command line entry point and terminal loop.
//!
//! This module is the thin integration layer between the conda-browse library
//! and the terminal. It parses arguments, owns the terminal and runs the event
//! loop; all browsing logic lives in the library.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │  input thread            │  ← crossterm::event::read
//! └──────────────────────────┘
//!              │ mpsc
//!              ▼
//! ┌──────────────────────────┐      ┌──────────────────────────┐
//! │  UI loop (select!)       │ ───▶ │  worker tasks            │
//! │  handle_event + render   │ ◀─── │  gateway / downloads     │
//! └──────────────────────────┘ mpsc └──────────────────────────┘
//! ```
//!
//! # Event Mapping
//!
//! - `Key` → [`map_key_event`] in the current input mode
//! - `Paste` → `Event::Paste`
//! - `Resize` → `Event::Resize`
//! - tick timer → `Event::Tick` (notification expiry)
//! - worker responses → `Event::WorkerResponse`

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use conda_browse::app::map_key_event;
use conda_browse::gateway::RepodataGateway;
use conda_browse::worker::{CatalogWorker, WorkerResponse};
use conda_browse::{handle_event, Action, Config, ControllerState, Event, Platform, Result};
use crossterm::event::{self as term, DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};

const TICK: Duration = Duration::from_millis(250);
const INPUT_POLL: Duration = Duration::from_millis(50);

type Tui = Terminal<CrosstermBackend<Stdout>>;
type Worker = CatalogWorker<RepodataGateway>;

/// Terminal browser for conda channel metadata.
#[derive(Debug, Parser)]
#[command(name = "conda-browse", version, about)]
struct Cli {
    /// Channel to browse.
    #[arg(short, long, default_value = conda_browse::DEFAULT_CHANNEL)]
    channel: String,

    /// Platform subdir to include (repeatable). Defaults to this machine's
    /// platform plus noarch.
    #[arg(short, long = "platform", value_name = "SUBDIR")]
    platforms: Vec<String>,

    /// Built-in theme name or path to a TOML theme file.
    #[arg(long)]
    theme: Option<String>,

    /// Directory downloads are written to.
    #[arg(long, value_name = "DIR")]
    download_dir: Option<PathBuf>,

    /// Log filter written to the log file (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn into_config(self) -> Result<Config> {
        let platforms = self
            .platforms
            .iter()
            .map(|name| name.parse::<Platform>())
            .collect::<Result<Vec<_>>>()?;

        let defaults = Config::default();
        Ok(Config {
            channel: self.channel,
            platforms,
            trace_level: self.log_level,
            theme_name: self.theme.unwrap_or(defaults.theme_name),
            download_dir: self.download_dir.unwrap_or(defaults.download_dir),
            download_timeout: defaults.download_timeout,
        })
    }
}

fn main() -> ExitCode {
    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    conda_browse::observability::init_tracing(&config);

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "exiting with error");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<()> {
    let gateway = RepodataGateway::new(config.download_timeout)?;
    let worker = Arc::new(CatalogWorker::new(gateway, config.download_timeout)?);
    let (state, actions) = conda_browse::initialize(&config);

    let mut terminal = setup_terminal()?;
    install_panic_hook();

    let result = event_loop(&mut terminal, state, actions, &worker).await;

    restore_terminal()?;
    terminal.show_cursor()?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableBracketedPaste) {
        let _ = disable_raw_mode();
        return Err(e.into());
    }
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen)?;
    Ok(())
}

/// Restores the terminal before the default hook prints the panic, so the
/// message is readable and the shell is usable afterwards.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableBracketedPaste,
            LeaveAlternateScreen,
            crossterm::cursor::Show
        );
        original_hook(info);
    }));
}

/// Reads terminal events on a dedicated thread. The thread ends when the UI loop
/// drops the receiver or reading fails.
fn spawn_input_reader(events: UnboundedSender<term::Event>) {
    std::thread::spawn(move || loop {
        match term::poll(INPUT_POLL) {
            Ok(false) => {
                if events.is_closed() {
                    break;
                }
            }
            Ok(true) => match term::read() {
                Ok(event) => {
                    if events.send(event).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to read terminal event");
                    break;
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "failed to poll terminal events");
                break;
            }
        }
    });
}

fn translate(event: term::Event, state: &ControllerState) -> Option<Event> {
    match event {
        term::Event::Key(key) => map_key_event(&key, state.input_mode()),
        term::Event::Paste(text) => Some(Event::Paste(text)),
        term::Event::Resize(width, height) => Some(Event::Resize { width, height }),
        _ => None,
    }
}

/// Executes actions, returning `true` when the loop should stop.
#[tracing::instrument(skip_all, fields(count = actions.len()))]
fn execute_actions(actions: Vec<Action>, worker: &Arc<Worker>, responses: &UnboundedSender<WorkerResponse>) -> bool {
    let mut quit = false;
    for action in actions {
        match action {
            Action::Quit => quit = true,
            Action::PostToWorker(message) => {
                tracing::debug!(ticket = ?message.ticket(), "posting to worker");
                worker.dispatch(message, responses.clone());
            }
        }
    }
    quit
}

async fn event_loop(
    terminal: &mut Tui,
    mut state: ControllerState,
    initial: Vec<Action>,
    worker: &Arc<Worker>,
) -> Result<()> {
    let (response_tx, mut response_rx) = mpsc::unbounded_channel::<WorkerResponse>();
    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    spawn_input_reader(input_tx);

    let mut tick = tokio::time::interval(TICK);
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    execute_actions(initial, worker, &response_tx);
    let size = terminal.size()?;
    let (_, actions) = handle_event(
        &mut state,
        &Event::Resize {
            width: size.width,
            height: size.height,
        },
    )?;
    execute_actions(actions, worker, &response_tx);

    let mut redraw = true;
    loop {
        if redraw {
            terminal.draw(|frame| conda_browse::ui::render(frame, &state))?;
            redraw = false;
        }

        let event = tokio::select! {
            Some(input) = input_rx.recv() => match translate(input, &state) {
                Some(event) => event,
                None => continue,
            },
            Some(response) = response_rx.recv() => Event::WorkerResponse(response),
            _ = tick.tick() => Event::Tick,
        };

        let (needs_redraw, actions) = handle_event(&mut state, &event)?;
        redraw |= needs_redraw;
        if execute_actions(actions, worker, &response_tx) || state.should_quit {
            tracing::info!("quitting");
            return Ok(());
        }
    }
}
