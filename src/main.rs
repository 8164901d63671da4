//! Terminal front-end and entry point.
//!
//! This binary is the thin runtime around the library: it reads line commands
//! from stdin, feeds events to [`handle_event`], executes the returned actions,
//! and prints the view model after every visible change.
//!
//! # Architecture
//!
//! Everything funnels into one channel consumed by the main loop:
//!
//! ```text
//! ┌──────────────┐
//! │ stdin reader │──Line──────────┐
//! └──────────────┘                ▼
//! ┌──────────────┐          ┌───────────┐      ┌─────────┐
//! │ catalog      │─Internal→│ main loop │─────→│ AppState│
//! │ worker       │          └───────────┘      └─────────┘
//! └──────────────┘                ▲
//! ┌──────────────┐                │
//! │ debounce     │──Internal──────┘
//! │ timers       │
//! └──────────────┘
//! ```
//!
//! Internal messages carry the generation of the state that produced them.
//! When rendering panics, the whole state is rebuilt under a new generation,
//! and anything still in flight for the old one is dropped.

#![allow(clippy::multiple_crate_versions)]

use cinematch::catalog::TmdbClient;
use cinematch::infrastructure::{default_config_path, store_path};
use cinematch::observability::init_tracing;
use cinematch::storage::{JsonFileStore, KeyValueStore, MemoryStore};
use cinematch::ui::{self, parse_command, Command, HELP};
use cinematch::worker::{CatalogWorker, WorkerHandle};
use cinematch::{handle_event, initialize, Action, AppState, Config, Event};
use clap::Parser;
use std::io::{self, Write};
use std::ops::ControlFlow;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

/// Browse TMDB movies from the terminal.
#[derive(Parser, Debug)]
#[command(name = "cinematch", version)]
struct Args {
    /// Configuration file. Defaults to `<config dir>/cinematch/config.toml`.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// TMDB v4 read access token.
    #[arg(long, env = "TMDB_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Directory for the favorites store.
    #[arg(long, env = "CINEMATCH_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level (`trace`, `debug`, `info`, `warn`, `error`).
    #[arg(long)]
    trace_level: Option<String>,

    /// Export spans as OTLP JSON lines to this file.
    #[arg(long)]
    trace_file: Option<PathBuf>,

    /// Keep favorites in memory only.
    #[arg(long)]
    ephemeral: bool,
}

enum LoopMessage {
    Line(String),
    Internal { generation: u64, event: Event },
    InputClosed,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("cinematch: {e}");
            return ExitCode::FAILURE;
        }
    };
    let _tracing = init_tracing(&config);

    match run(config, args.ephemeral) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "cinematch stopped");
            eprintln!("cinematch: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> cinematch::Result<Config> {
    let path = args.config.clone().unwrap_or_else(default_config_path);
    let mut config = Config::load(&path)?;

    if let Some(token) = &args.api_token {
        config.api_token = Some(token.clone());
    }
    if let Some(dir) = &args.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if let Some(level) = &args.trace_level {
        config.trace_level = Some(level.clone());
    }
    if let Some(file) = &args.trace_file {
        config.trace_file = Some(file.clone());
    }
    Ok(config)
}

fn run(config: Config, ephemeral: bool) -> cinematch::Result<()> {
    let (sender, receiver) = mpsc::channel();
    spawn_input_reader(sender.clone())?;

    let mut runtime = Runtime::start(config, ephemeral, sender)?;
    runtime.draw();

    for message in receiver {
        let flow = match message {
            LoopMessage::Line(line) => runtime.command(&line),
            LoopMessage::Internal { generation, event } if generation == runtime.generation => {
                runtime.dispatch(&event)
            }
            LoopMessage::Internal { generation, .. } => {
                tracing::debug!(generation, "discarding message from a previous state");
                ControlFlow::Continue(())
            }
            LoopMessage::InputClosed => ControlFlow::Break(()),
        };
        if flow.is_break() {
            break;
        }
    }

    tracing::debug!("event loop finished");
    Ok(())
}

fn spawn_input_reader(sender: Sender<LoopMessage>) -> io::Result<()> {
    thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in io::stdin().lines() {
                match line {
                    Ok(line) => {
                        if sender.send(LoopMessage::Line(line)).is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "stdin read failed");
                        break;
                    }
                }
            }
            let _ = sender.send(LoopMessage::InputClosed);
        })?;
    Ok(())
}

fn spawn_worker(
    config: &Config,
    sender: Sender<LoopMessage>,
    generation: u64,
) -> cinematch::Result<WorkerHandle> {
    let client = TmdbClient::new(config.tmdb_settings()?);
    CatalogWorker::new(Box::new(client)).spawn(move |response| {
        let _ = sender.send(LoopMessage::Internal {
            generation,
            event: Event::WorkerResponse(response),
        });
    })
}

fn open_store(config: &Config, ephemeral: bool) -> Box<dyn KeyValueStore> {
    if ephemeral {
        return Box::new(MemoryStore::default());
    }
    JsonFileStore::open_or_memory(store_path(&config.data_dir()))
}

/// Owns the application state and everything that talks to it.
struct Runtime {
    config: Config,
    ephemeral: bool,
    state: AppState,
    worker: WorkerHandle,
    sender: Sender<LoopMessage>,
    generation: u64,
}

impl Runtime {
    fn start(config: Config, ephemeral: bool, sender: Sender<LoopMessage>) -> cinematch::Result<Self> {
        let worker = spawn_worker(&config, sender.clone(), 0)?;
        let state = initialize(&config, open_store(&config, ephemeral));
        let mut runtime = Self {
            config,
            ephemeral,
            state,
            worker,
            sender,
            generation: 0,
        };
        let actions = runtime.state.start();
        let _ = runtime.execute(actions);
        Ok(runtime)
    }

    fn command(&mut self, line: &str) -> ControlFlow<()> {
        match parse_command(line) {
            Ok(Command::Dispatch(event)) => self.dispatch(&event),
            Ok(Command::Shuffle) => self.dispatch(&Event::Shuffle {
                roll: rand::random::<u64>(),
            }),
            Ok(Command::Help) => {
                let vm = self.state.compute_viewmodel(chrono::Local::now().naive_local());
                let years = &vm.year_options;
                let span = match (years.get(1), years.last()) {
                    (Some(newest), Some(oldest)) => format!("años: {newest}–{oldest}"),
                    _ => String::new(),
                };
                prompt(&format!("{HELP}\n{span}\n> "));
                ControlFlow::Continue(())
            }
            Ok(Command::Nothing) => {
                self.draw();
                ControlFlow::Continue(())
            }
            Err(e) => {
                prompt(&format!("{e}\n> "));
                ControlFlow::Continue(())
            }
        }
    }

    fn dispatch(&mut self, event: &Event) -> ControlFlow<()> {
        match handle_event(&mut self.state, event) {
            Ok((should_render, actions)) => {
                tracing::debug!(action_count = actions.len(), should_render, "event handled");
                let flow = self.execute(actions);
                if should_render && flow.is_continue() {
                    self.draw();
                }
                flow
            }
            Err(e) => {
                tracing::warn!(error = %e, "error handling event");
                ControlFlow::Continue(())
            }
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(count = actions.len()))]
    fn execute(&mut self, actions: Vec<Action>) -> ControlFlow<()> {
        for action in actions {
            match action {
                Action::PostToWorker(message) => {
                    if let Err(e) = self.worker.post(message) {
                        tracing::error!(error = %e, "failed to post to worker");
                    }
                }
                Action::ScheduleDebounce { token, delay } => {
                    self.schedule(Event::DebounceElapsed { token }, delay);
                }
                Action::Quit => return ControlFlow::Break(()),
            }
        }
        ControlFlow::Continue(())
    }

    fn schedule(&self, event: Event, delay: Duration) {
        let sender = self.sender.clone();
        let generation = self.generation;
        let spawned = thread::Builder::new()
            .name("debounce".to_string())
            .spawn(move || {
                thread::sleep(delay);
                let _ = sender.send(LoopMessage::Internal { generation, event });
            });
        if let Err(e) = spawned {
            tracing::error!(error = %e, "failed to start debounce timer");
        }
    }

    /// Prints the current view model.
    ///
    /// A panic while building or printing the frame rebuilds the whole state.
    fn draw(&mut self) {
        let now = chrono::Local::now().naive_local();
        let state = &self.state;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> io::Result<()> {
            let vm = state.compute_viewmodel(now);
            let mut out = io::stdout().lock();
            writeln!(out)?;
            ui::render(&vm, &mut out)?;
            write!(out, "> ")?;
            out.flush()
        }));

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "render failed"),
            Err(_) => {
                tracing::error!("render panicked, reloading");
                if let Err(e) = self.reload() {
                    tracing::error!(error = %e, "reload failed");
                }
            }
        }
    }

    /// Replaces the state and worker with fresh ones and starts over.
    fn reload(&mut self) -> cinematch::Result<()> {
        self.generation += 1;
        self.worker = spawn_worker(&self.config, self.sender.clone(), self.generation)?;
        self.state = initialize(&self.config, open_store(&self.config, self.ephemeral));
        let actions = self.state.start();
        let _ = self.execute(actions);
        prompt("Algo salió mal. Recargando...\n> ");
        Ok(())
    }
}

fn prompt(text: &str) {
    let mut out = io::stdout().lock();
    let _ = write!(out, "{text}");
    let _ = out.flush();
}
