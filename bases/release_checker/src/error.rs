//! Errors raised while preparing a check: loading the release, the
//! reference or the rule configuration.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("release root {} is not readable", path.display())]
    UnreadableRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("release root {} is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    #[error("failed to walk {}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("no audio files found under {}", path.display())]
    NoAudioFiles { path: PathBuf },

    #[error("failed to read {what} file {}", path.display())]
    ReadFile {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {what} file {}", path.display())]
    Parse {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("tag reading task failed")]
    Task(#[from] tokio::task::JoinError),

    #[error("invalid rule configuration")]
    Config(#[from] release_rules::ConfigError),
}

pub type Result<T> = std::result::Result<T, LoadError>;
