//! Style rules for classical releases.
//!
//! Rules are plain functions declared inside a `rule_host!` block (see the
//! modules under [`rules`]); the [`registry`] collects them and the
//! [`Runner`] applies them to a release, producing a [`Report`].

mod config;
mod host;
pub mod registry;
mod report;
pub mod rules;
mod runner;

pub use config::{ConfigError, RunnerConfig};
pub use release_model::{Level, Release, RuleMetadata, RuleResult, Track, ValidationIssue};
pub use report::{improvement_score, Report};
pub use runner::{validate, Runner};
