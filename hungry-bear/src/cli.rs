//! Command-line arguments and config-file loading.

use std::fs;
use std::path::{Path, PathBuf};

use bear_sim::SimConfig;
use serde::Deserialize;
use thiserror::Error;

/// Config file looked for in the working directory when none is named.
pub const DEFAULT_CONFIG_PATH: &str = "hungry-bear.toml";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("unknown argument: {0}")]
    UnknownArgument(String),

    #[error("{0} expects a value")]
    MissingValue(&'static str),

    #[error("invalid seed {0:?}")]
    InvalidSeed(String),

    #[error("failed to read config {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Parsed command line.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Args {
    pub config_path: Option<PathBuf>,
    pub seed: Option<u64>,
    pub help: bool,
}

pub fn parse_args<I>(args: I) -> Result<Args, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut out = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => {
                let path = args.next().ok_or(CliError::MissingValue("--config"))?;
                out.config_path = Some(path.into());
            }
            "-s" | "--seed" => {
                let raw = args.next().ok_or(CliError::MissingValue("--seed"))?;
                let seed = raw.parse().map_err(|_| CliError::InvalidSeed(raw))?;
                out.seed = Some(seed);
            }
            "-h" | "--help" => out.help = true,
            _ => return Err(CliError::UnknownArgument(arg)),
        }
    }
    Ok(out)
}

pub fn print_help() {
    println!("hungry-bear - a bear walks to the honey, over and over");
    println!();
    println!("USAGE:");
    println!("    hungry-bear [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <FILE>     Configuration file (default: {DEFAULT_CONFIG_PATH})");
    println!("    -s, --seed <N>          Seed the scenario generator");
    println!("    -h, --help              Print help information");
    println!();
    println!("OUTPUT:");
    println!("    One JSON line with the cell legend, then one JSON line per frame:");
    println!("    an array of rows, each an array of cell codes.");
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    simulation: SimConfig,
}

/// Parse the TOML config format: simulation settings under `[simulation]`.
pub fn parse_config(text: &str) -> Result<SimConfig, toml::de::Error> {
    toml::from_str::<FileConfig>(text).map(|f| f.simulation)
}

fn read_config(path: &Path) -> Result<SimConfig, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text).map_err(|source| CliError::ParseConfig {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve the effective configuration.
///
/// A named file must load. Without one, [`DEFAULT_CONFIG_PATH`] is used if it
/// exists, else built-in defaults. `--seed` overrides the file.
pub fn load_config(args: &Args) -> Result<SimConfig, CliError> {
    let mut config = match &args.config_path {
        Some(path) => {
            let cfg = read_config(path)?;
            log::info!("Loaded config from {}", path.display());
            cfg
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            let cfg = read_config(Path::new(DEFAULT_CONFIG_PATH))?;
            log::info!("Loaded config from {DEFAULT_CONFIG_PATH}");
            cfg
        }
        None => SimConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    Ok(config)
}
