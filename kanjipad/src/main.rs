use std::io::{self, BufRead};
use std::path::PathBuf;
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::{select, unbounded, Receiver, Sender};
use kanjipad_core::engine::line_or_error;
use kanjipad_core::{Config, EngineCommand, EngineSession, Error};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod app;
mod commands;

use app::{App, Flow};

#[derive(Parser, Debug)]
#[command(name = "kanjipad")]
#[command(about = "Handwriting pad for Japanese kanji, driven by kpengine")]
#[command(version)]
struct Cli {
    /// Recognition data file passed on to the engine
    #[arg(short = 'f', long = "data-file")]
    data_file: Option<PathBuf>,

    /// Engine executable (default: ./kpengine, then the install location)
    #[arg(long)]
    engine: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// File that saved samples are appended to
    #[arg(long)]
    samples: Option<PathBuf>,

    /// More logging on stderr (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Configuration file (if any) with the command-line flags on top.
    fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_toml(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => Config::default(),
        };
        if let Some(path) = &self.data_file {
            config.data_file = Some(path.clone());
        }
        if let Some(path) = &self.engine {
            config.engine_path = Some(path.clone());
        }
        if let Some(path) = &self.samples {
            config.samples_path = path.clone();
        }
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Forward input lines to the dispatch loop until EOF or a read error.
///
/// Bytes that are not UTF-8 are replaced, so a garbled line becomes an
/// unknown command rather than the end of input.
fn forward_lines<R: BufRead>(mut input: R, tx: &Sender<String>) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match input.read_until(b'\n', &mut buf) {
            Ok(0) => return,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\n', '\r']).to_string();
                if tx.send(line).is_err() {
                    return;
                }
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                warn!(%err, "cannot read commands");
                return;
            }
        }
    }
}

/// Read stdin on its own thread. The channel closes at EOF.
fn spawn_input_thread() -> Result<Receiver<String>> {
    let (tx, rx) = unbounded();
    thread::Builder::new()
        .name("stdin".into())
        .spawn(move || forward_lines(io::stdin().lock(), &tx))
        .context("spawning input thread")?;
    Ok(rx)
}

fn run(config: Config) -> Result<()> {
    let command = EngineCommand::resolve(config.engine_path.as_deref(), config.data_file.as_deref());
    let engine = EngineSession::start(&command)?;
    let engine_rx = engine.messages().clone();
    let input_rx = spawn_input_thread()?;

    let mut app = App::new(engine, config, io::stdout());
    app.render()?;

    loop {
        select! {
            recv(input_rx) -> line => match line {
                Ok(line) => match commands::parse(&line) {
                    Ok(command) => {
                        if app.handle_command(command)? == Flow::Quit {
                            break;
                        }
                    }
                    Err(err) => app.report(&err)?,
                },
                Err(_) => {
                    debug!("stdin closed");
                    break;
                }
            },
            recv(engine_rx) -> message => {
                let line = match message {
                    Ok(message) => line_or_error(message)?,
                    Err(_) => return Err(Error::EngineClosed.into()),
                };
                app.handle_engine_line(line)?;
            }
        }
    }
    info!("exiting");
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = cli.config().and_then(run);
    if let Err(err) = result {
        eprintln!("kanjipad: {:#}", err);
        std::process::exit(1);
    }
}
