use crate::error::{LoadError, Result};
use clap::{Parser, ValueEnum};
use release_rules::{Level, RunnerConfig};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MinLevel {
    Info,
    Warning,
    Error,
}

impl From<MinLevel> for Level {
    fn from(level: MinLevel) -> Self {
        match level {
            MinLevel::Info => Level::Info,
            MinLevel::Warning => Level::Warning,
            MinLevel::Error => Level::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Release Checker - validate the metadata of a classical music release
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Root folder of the release
    pub root: PathBuf,

    /// Reference release (JSON) to compare titles and years against
    #[arg(short, long)]
    pub reference: Option<PathBuf>,

    /// Only show issues at or above this level
    #[arg(long, value_enum, default_value_t = MinLevel::Info)]
    pub min_level: MinLevel,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// JSON object mapping rule ids to score weights
    #[arg(short, long)]
    pub weights: Option<PathBuf>,

    /// Skip a rule by id (repeatable)
    #[arg(short, long = "disable", value_name = "RULE_ID")]
    pub disable: Vec<String>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Checker configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    pub reference: Option<PathBuf>,
    pub min_level: Level,
    pub format: OutputFormat,
    pub runner: RunnerConfig,
    pub verbose: bool,
}

impl Config {
    /// Build the configuration, loading and validating rule weights
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let weights = match &args.weights {
            Some(path) => load_weights(path)?,
            None => BTreeMap::new(),
        };
        let runner = RunnerConfig::new(weights, args.disable.into_iter().collect());
        runner.validate()?;

        Ok(Self {
            root: args.root,
            reference: args.reference,
            min_level: args.min_level.into(),
            format: args.format,
            runner,
            verbose: args.verbose,
        })
    }

    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "release_checker=debug,release_rules=debug"
        } else {
            "release_checker=info,release_rules=info"
        }
    }
}

fn load_weights(path: &Path) -> Result<BTreeMap<String, f64>> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::ReadFile {
        what: "weights",
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Parse {
        what: "weights",
        path: path.to_path_buf(),
        source,
    })
}
