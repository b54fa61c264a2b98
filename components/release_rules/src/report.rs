use release_model::{Level, RuleResult, ValidationIssue};
use serde::Serialize;
use std::cmp::Reverse;
use std::fmt;

/// Outcome of validating one release
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Release-scope issues first, then by disc, track, severity (highest
    /// first) and rule id
    pub issues: Vec<ValidationIssue>,
    #[serde(skip)]
    pub results: Vec<RuleResult>,
    /// Weighted share of passing rules, in `[0, 1]`
    pub score: f64,
}

impl Report {
    pub fn new(results: Vec<RuleResult>, score: f64) -> Self {
        let mut issues: Vec<ValidationIssue> = results
            .iter()
            .flat_map(|result| result.issues.iter().cloned())
            .collect();
        sort_issues(&mut issues);
        Self {
            issues,
            results,
            score,
        }
    }

    pub fn count(&self, level: Level) -> usize {
        self.issues.iter().filter(|issue| issue.level == level).count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(Level::Error) > 0
    }

    /// Copy keeping only issues at or above `min_level`; the score is unchanged
    pub fn filtered(&self, min_level: Level) -> Report {
        Report {
            issues: self
                .issues
                .iter()
                .filter(|issue| issue.level >= min_level)
                .cloned()
                .collect(),
            results: self.results.clone(),
            score: self.score,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for issue in &self.issues {
            writeln!(f, "{issue}")?;
        }
        write!(
            f,
            "{} error(s), {} warning(s), {} info; score {:.2}",
            self.count(Level::Error),
            self.count(Level::Warning),
            self.count(Level::Info),
            self.score
        )
    }
}

fn sort_issues(issues: &mut [ValidationIssue]) {
    issues.sort_by(|a, b| {
        (a.position, Reverse(a.level), &a.rule_id).cmp(&(b.position, Reverse(b.level), &b.rule_id))
    });
}

/// `1 - failed weight / total weight`, clamped to `[0, 1]`.
///
/// Each item is a rule's weight and whether it passed. With no rules the
/// score is 1.0.
pub fn improvement_score(outcomes: impl IntoIterator<Item = (f64, bool)>) -> f64 {
    let (total, failed) = outcomes
        .into_iter()
        .fold((0.0, 0.0), |(total, failed), (weight, passed)| {
            (total + weight, if passed { failed } else { failed + weight })
        });
    if total <= 0.0 {
        return 1.0;
    }
    (1.0 - failed / total).clamp(0.0, 1.0)
}
