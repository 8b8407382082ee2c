//! Dosconf - DOSBox configuration editor and launcher
//!
//! Command-line front end over the config document library.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dosconf::app::DosconfApp;
use dosconf::core::config::AppConfig;
use dosconf::core::parser::ParseOptions;
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dosconf", version, about = "Edit DOSBox configs and launch games")]
struct Cli {
    /// Use this application config file instead of the default one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ignore stray lines before the first section instead of failing
    #[arg(long, global = true)]
    lenient: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List registered games
    Games,
    /// Register a game whose config lives in DIR
    Add { name: String, dir: PathBuf },
    /// Print a config as it would be saved
    Show { target: String },
    /// Print every known setting with its typed value
    Settings {
        target: String,
        #[arg(long)]
        json: bool,
    },
    /// Print one value
    Get {
        target: String,
        section: String,
        key: String,
    },
    /// Change one value
    Set {
        target: String,
        section: String,
        key: String,
        value: String,
    },
    /// Remove one value
    Unset {
        target: String,
        section: String,
        key: String,
    },
    /// Print the [autoexec] script, or replace it with --set FILE (`-` for stdin)
    Autoexec {
        target: String,
        #[arg(long = "set", value_name = "FILE")]
        source: Option<PathBuf>,
    },
    /// Restore a game's config from the base template
    Reset { name: String },
    /// Delete a game's config and drop it from the library
    Remove { name: String },
    /// Start DOSBox with a game's config
    Launch { name: String },
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load().unwrap_or_default(),
    };

    let mut app = DosconfApp::new(config)?;
    if cli.lenient {
        app.parse_options = ParseOptions::lenient();
    }

    match cli.command {
        Command::Games => {
            for line in app.list_games() {
                println!("{}", line);
            }
        }
        Command::Add { name, dir } => {
            let path = app.add_game(&name, dir)?;
            println!("{}", path.display());
        }
        Command::Show { target } => print!("{}", app.show(&target)?),
        Command::Settings { target, json } => {
            let out = app.show_settings(&target, json)?;
            if json {
                println!("{}", out);
            } else {
                print!("{}", out);
            }
        }
        Command::Get {
            target,
            section,
            key,
        } => println!("{}", app.get(&target, &section, &key)?),
        Command::Set {
            target,
            section,
            key,
            value,
        } => app.set(&target, &section, &key, &value)?,
        Command::Unset {
            target,
            section,
            key,
        } => {
            if !app.unset(&target, &section, &key)? {
                tracing::warn!("[{}] {} was not set", section, key);
            }
        }
        Command::Autoexec { target, source } => match source {
            Some(source) => app.set_autoexec(&target, &source)?,
            None => println!("{}", app.autoexec(&target)?),
        },
        Command::Reset { name } => {
            let path = app.reset(&name)?;
            println!("{}", path.display());
        }
        Command::Remove { name } => app.remove(&name)?,
        Command::Launch { name } => app.launch(&name)?,
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let level = match cli.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(level)
        .init();

    if let Err(e) = run(cli) {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}
