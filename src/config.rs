//! Configuration management for robot-cmd.
//!
//! Handles:
//! - Command-line argument parsing
//! - Optional TOML config file discovery and loading
//! - Merging the two (command-line flags win)

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::parser::ParseOptions;

/// Name of the project-local config file looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "robot-cmd.toml";

/// Nesting limit used when neither the command line nor the config file sets
/// one
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Command-line arguments for robot-cmd
#[derive(Debug, Parser)]
#[command(name = "robot-cmd")]
#[command(about = "Parse robot command files and replay them")]
#[command(version)]
pub struct Args {
    /// Command file to read; stdin is used when omitted
    pub input: Option<PathBuf>,

    #[arg(long, value_enum, help = "What to print (trace, counts, program)")]
    pub emit: Option<Emit>,

    #[arg(long, value_enum, help = "Output format (text, json)")]
    pub format: Option<OutputFormat>,

    #[arg(long, help = "Maximum number of nested REPEAT blocks [default: 1000]")]
    pub max_depth: Option<usize>,

    #[arg(long, help = "Config file (defaults to ./robot-cmd.toml, then the user config dir)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Log level (trace, debug, info, warn, error)")]
    pub log_level: Option<String>,
}

/// What the binary prints after a successful parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emit {
    /// Every robot call, in order
    #[default]
    Trace,
    /// Number of calls per capability
    Counts,
    /// The parsed program itself
    Program,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Config file contents (all keys optional)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub max_depth: Option<usize>,
    pub emit: Option<Emit>,
    pub format: Option<OutputFormat>,
    pub log_level: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

/// Combined configuration from all sources
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Input file, `None` for stdin
    pub input: Option<PathBuf>,
    pub emit: Emit,
    pub format: OutputFormat,
    /// Nesting limit from the command line or config file; `None` falls back
    /// to [`DEFAULT_MAX_DEPTH`]
    pub max_depth: Option<usize>,
    /// Explicit log filter; `RUST_LOG` applies when unset
    pub log_level: Option<String>,
    /// Config file that was loaded, if any
    pub config_file: Option<PathBuf>,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        // An explicit --config must exist; discovered files are optional
        let config_file = args
            .config
            .or_else(|| default_config_paths().into_iter().find(|p| p.is_file()));

        let file = match &config_file {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        Ok(Config {
            input: args.input,
            emit: args.emit.or(file.emit).unwrap_or_default(),
            format: args.format.or(file.format).unwrap_or_default(),
            max_depth: args.max_depth.or(file.max_depth),
            log_level: args.log_level.or(file.log_level),
            config_file,
        })
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            max_depth: Some(self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH)),
        }
    }
}

/// Config file locations searched when `--config` is not given, in order
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(PROJECT_CONFIG_FILE)];

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("robot-cmd").join("config.toml"));
    }

    paths
}
