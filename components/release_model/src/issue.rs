use crate::primitives::Position;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown level: {0} (expected info, warning or error)")]
pub struct LevelError(pub String);

/// Severity of a finding, ordered Info < Warning < Error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "info" => Ok(Level::Info),
            "warning" | "warn" => Ok(Level::Warning),
            "error" => Ok(Level::Error),
            _ => Err(LevelError(s.to_string())),
        }
    }
}

/// One finding produced by a rule.
///
/// `position` is `None` for findings about the release as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub level: Level,
    pub position: Option<Position>,
    pub rule_id: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn release(level: Level, rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            position: None,
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }

    pub fn track(
        level: Level,
        position: Position,
        rule_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            position: Some(position),
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = self.level.as_str().to_uppercase();
        match self.position {
            Some(position) => write!(f, "{level} [{}] {position}: {}", self.rule_id, self.message),
            None => write!(f, "{level} [{}] release: {}", self.rule_id, self.message),
        }
    }
}

/// Static description of a rule: identity, default severity and score weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RuleMetadata {
    pub id: &'static str,
    pub name: &'static str,
    pub level: Level,
    pub weight: f64,
}

impl RuleMetadata {
    pub const fn new(id: &'static str, name: &'static str, level: Level) -> Self {
        Self {
            id,
            name,
            level,
            weight: 1.0,
        }
    }

    pub const fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn release_issue(&self, level: Level, message: impl Into<String>) -> ValidationIssue {
        ValidationIssue::release(level, self.id, message)
    }

    pub fn track_issue(
        &self,
        level: Level,
        position: Position,
        message: impl Into<String>,
    ) -> ValidationIssue {
        ValidationIssue::track(level, position, self.id, message)
    }
}

/// Outcome of one rule invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleResult {
    pub metadata: RuleMetadata,
    pub issues: Vec<ValidationIssue>,
    /// The rule panicked; its result carries a single diagnostic and counts as passed
    pub faulted: bool,
}

impl RuleResult {
    pub fn pass(metadata: RuleMetadata) -> Self {
        Self {
            metadata,
            issues: Vec::new(),
            faulted: false,
        }
    }

    pub fn new(metadata: RuleMetadata, issues: Vec<ValidationIssue>) -> Self {
        Self {
            metadata,
            issues,
            faulted: false,
        }
    }

    pub fn fault(metadata: RuleMetadata, position: Option<Position>, reason: &str) -> Self {
        let message = format!("rule {} failed internally: {reason}", metadata.id);
        let issue = match position {
            Some(position) => metadata.track_issue(Level::Warning, position, message),
            None => metadata.release_issue(Level::Warning, message),
        };
        Self {
            metadata,
            issues: vec![issue],
            faulted: true,
        }
    }

    /// True when nothing was found, or when the rule faulted
    pub fn passed(&self) -> bool {
        self.faulted || self.issues.is_empty()
    }

    pub fn id(&self) -> &'static str {
        self.metadata.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const META: RuleMetadata = RuleMetadata::new("2.3.12", "PathLength", Level::Error);

    #[test]
    fn levels_order_by_severity() {
        assert!(Level::Info < Level::Warning);
        assert!(Level::Warning < Level::Error);
        assert_eq!("WARNING".parse::<Level>(), Ok(Level::Warning));
        assert_matches!("fatal".parse::<Level>(), Err(LevelError(s)) if s == "fatal");
    }

    #[test]
    fn issue_display_names_scope() {
        let track = META.track_issue(Level::Error, Position::new(1, 2), "too long");
        assert_eq!(track.to_string(), "ERROR [2.3.12] disc 1 track 2: too long");
        assert_eq!(track.position, Some(Position::new(1, 2)));

        let release = META.release_issue(Level::Info, "note");
        assert_eq!(release.to_string(), "INFO [2.3.12] release: note");
        assert_eq!(release.position, None);
    }

    #[test]
    fn metadata_weight_defaults_to_one() {
        assert_eq!(META.weight, 1.0);
        assert_eq!(META.with_weight(2.5).weight, 2.5);
    }

    #[test]
    fn faulted_result_counts_as_passed() {
        let result = RuleResult::fault(META, None, "boom");
        assert!(result.passed());
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].level, Level::Warning);
        assert_eq!(result.issues[0].message, "rule 2.3.12 failed internally: boom");

        let failed = RuleResult::new(META, vec![META.release_issue(Level::Error, "x")]);
        assert!(!failed.passed());
        assert!(RuleResult::pass(META).passed());
    }

    #[test]
    fn issues_serialize_level_lowercase() {
        let issue = META.release_issue(Level::Warning, "m");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["level"], "warning");
        assert!(json["position"].is_null());
    }
}
