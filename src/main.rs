//! `pocket-writer`: Edit a document or chat on an emulated pocket display.

use anyhow::Context;
use clap::{Parser, Subcommand};
use pocket_writer::actor::{run_chat, run_editor, ScriptedSource};
use pocket_writer::session::LoadStatus;
use pocket_writer::{ChatSession, Config, EditSession, Engine, LoopExit, Profile};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "pocket-writer", about = "Pocket word processor", version)]
struct Cli {
    /// JSON config file (missing file means defaults)
    #[arg(short, long, global = true, env = "POCKET_WRITER_CONFIG")]
    config: Option<PathBuf>,

    /// Display geometry preset: oled, gfx-hat or sharp
    #[arg(short, long, global = true)]
    profile: Option<Profile>,

    /// Write logs to this file (RUST_LOG overrides the level)
    #[arg(long, global = true)]
    log: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a file for editing, creating it on save if it does not exist
    Edit {
        /// Document to edit
        file: PathBuf,
    },
    /// Start an empty document that replaces FILE on save
    New {
        /// Where to save
        file: PathBuf,
    },
    /// Chat with a local echo responder
    Chat {
        /// Delay between reply words in milliseconds
        #[arg(long, default_value = "80")]
        pace: u64,
    },
    /// Write the effective config to a file
    InitConfig {
        /// Destination path
        path: PathBuf,
    },
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pocket_writer=info".into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(profile) = cli.profile {
        (config.line_width, config.viewport_height) = profile.grid();
    }
    config.validate()?;
    Ok(config)
}

fn edit(config: &Config, file: PathBuf, fresh: bool) -> anyhow::Result<()> {
    let mut session = EditSession::new(config);
    let status = if fresh {
        session.new_document(&file)?;
        LoadStatus::Created
    } else {
        session.open(&file)?
    };

    let exit = {
        let engine = Engine::start(config.line_width, config.viewport_height)
            .context("setting up terminal")?;
        run_editor(&mut session, engine.inputs(), config.buffer_interval(), engine.renderer())?
    };

    if let LoadStatus::Failed(e) = &status {
        eprintln!("warning: could not load {}: {e}", file.display());
    }
    match exit {
        LoopExit::Saved => println!("saved {}", file.display()),
        LoopExit::Discarded => println!("discarded changes to {}", file.display()),
        LoopExit::Left | LoopExit::InputClosed => {
            session.cancel();
            println!("input closed, changes to {} discarded", file.display());
        }
    }
    Ok(())
}

fn chat(config: &Config, pace: Duration) -> anyhow::Result<()> {
    let mut chat = ChatSession::new(config);
    {
        let engine = Engine::start(config.line_width, config.viewport_height)
            .context("setting up terminal")?;
        run_chat(
            &mut chat,
            engine.inputs(),
            config.buffer_interval(),
            engine.renderer(),
            |prompt| ScriptedSource::echo(prompt).with_delay(pace),
        )?;
    }
    print!("{}", chat.transcript());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log {
        init_logging(path)?;
    }
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Edit { file } => edit(&config, file, false),
        Commands::New { file } => edit(&config, file, true),
        Commands::Chat { pace } => chat(&config, Duration::from_millis(pace)),
        Commands::InitConfig { path } => {
            config
                .save(&path)
                .with_context(|| format!("writing config {}", path.display()))?;
            println!("wrote {}", path.display());
            Ok(())
        }
    }
}
