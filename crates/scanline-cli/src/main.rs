//! scanline CLI: viewfinder inspection and scripted session replay.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use scanline::replay::{run_replay, ReplayScript};
use scanline::{ConfigError, Resolution, ScanConfig, ViewfinderGeometry};
use serde::Serialize;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("failed to load {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[cfg(not(feature = "tracing"))]
    #[error(transparent)]
    Logger(#[from] log::SetLoggerError),
    #[cfg(feature = "tracing")]
    #[error(transparent)]
    Tracing(#[from] tracing_subscriber::util::TryInitError),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "scanline")]
#[command(about = "Inspect viewfinder geometry and replay barcode scan sessions")]
#[command(version)]
struct Cli {
    /// Log level (off, error, warn, info, debug, trace). `RUST_LOG` directives
    /// are applied on top.
    #[arg(long, global = true, default_value = "info")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the viewfinder rect and laser line for a screen size as JSON.
    Viewfinder {
        /// Screen width in pixels.
        #[arg(long)]
        width: u32,
        /// Screen height in pixels.
        #[arg(long)]
        height: u32,
        /// Scanner config (JSON). Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run a session replay script and print the report as JSON.
    Replay {
        /// Replay script (JSON).
        script: PathBuf,
        /// Scanner config (JSON). Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write the report here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct ViewfinderReport {
    screen: Resolution,
    #[serde(flatten)]
    geometry: ViewfinderGeometry,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    init_logging(cli.log_level)?;

    match cli.command {
        Commands::Viewfinder {
            width,
            height,
            config,
        } => run_viewfinder(Resolution::new(width, height), config.as_deref()),
        Commands::Replay {
            script,
            config,
            output,
        } => run_replay_cmd(&script, config.as_deref(), output.as_deref()),
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(level: LevelFilter) -> CliResult<()> {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init()?;
    Ok(())
}

#[cfg(feature = "tracing")]
fn init_logging(level: LevelFilter) -> CliResult<()> {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .finish()
        .try_init()?;
    Ok(())
}

fn load_config(path: Option<&Path>) -> CliResult<ScanConfig> {
    match path {
        Some(path) => ScanConfig::load_json(path).map_err(|source| CliError::Load {
            path: path.to_path_buf(),
            source,
        }),
        None => Ok(ScanConfig::default()),
    }
}

fn run_viewfinder(screen: Resolution, config: Option<&Path>) -> CliResult<()> {
    let config = load_config(config)?;
    let geometry = ViewfinderGeometry::for_screen(screen, &config.framing);
    let report = ViewfinderReport { screen, geometry };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_replay_cmd(script: &Path, config: Option<&Path>, output: Option<&Path>) -> CliResult<()> {
    let config = load_config(config)?;
    let loaded = ReplayScript::load_json(script).map_err(|source| CliError::Load {
        path: script.to_path_buf(),
        source,
    })?;
    info!(
        "replaying {} events from {}",
        loaded.events.len(),
        script.display()
    );

    let report = run_replay(&loaded, &config);

    match output {
        Some(path) => {
            report.write_json(path).map_err(|source| CliError::Write {
                path: path.to_path_buf(),
                source,
            })?;
            info!("report written to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}
