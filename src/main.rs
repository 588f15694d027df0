//! Console runner for the strongbox controller.
//!
//! Reads keypad keys from stdin, prints display messages to stdout and keeps
//! the lock state in a file.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufReader};
use std::path::PathBuf;
use strongbox::config::SafeConfig;
use strongbox::console::{ConsoleDisplay, ConsoleInput, LoggingServo};
use strongbox::controller::{SafeController, ServoActuator};
use strongbox::machine::AccessStateMachine;
use strongbox::store::FileStore;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Keypad-gated lock controller
#[derive(Parser, Debug)]
#[command(name = "strongbox")]
#[command(about = "Run the lock controller against the terminal")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// State file, overriding `storage.path`
    #[arg(short, long)]
    state: Option<PathBuf>,

    /// Print the transition log as JSON on exit
    #[arg(long)]
    dump_history: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SafeConfig::load(path)?,
        None => SafeConfig::default(),
    };
    if let Some(state) = args.state {
        config.storage.path = state;
    }

    let defaults = config
        .factory_state()
        .context("factory code in configuration")?;
    let store = FileStore::new(&config.storage.path, config.storage.format, defaults);
    let machine = AccessStateMachine::new(store, config.machine_options());

    let actuator = ServoActuator::new(
        LoggingServo,
        config.actuator.lock_angle,
        config.actuator.unlock_angle,
    );
    let mut display = ConsoleDisplay::new(io::stdout(), config.device_label.clone());
    display.banner();

    let mut controller = SafeController::boot(machine, actuator, display);
    let mut input = ConsoleInput::new(BufReader::new(io::stdin()), config.keypad.clone());
    controller.run(&mut input);

    if args.dump_history {
        println!("{}", controller.machine().history().to_json()?);
    }

    Ok(())
}
