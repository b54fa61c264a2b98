use crate::config::RunnerConfig;
use crate::registry;
use crate::report::{improvement_score, Report};
use release_model::{Release, RuleResult};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Runs every enabled rule over a release
#[derive(Debug, Clone, Default)]
pub struct Runner {
    config: RunnerConfig,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Validate `actual`, comparing against `reference` where rules need it.
    ///
    /// Release rules run once; track rules run once per track, paired with
    /// the reference track at the same disc and track number.
    pub fn run(&self, actual: &Release, reference: Option<&Release>) -> Report {
        let mut results = Vec::new();
        // rule id -> (weight, passed), seeded so rules with no invocation count as passed
        let mut outcomes: BTreeMap<&'static str, (f64, bool)> = BTreeMap::new();

        let release_rules = registry::release_rules()
            .iter()
            .filter(|rule| self.config.is_enabled(rule.id()));
        for rule in release_rules {
            outcomes.insert(rule.id(), (self.config.weight_for(&rule.metadata), true));
            let result = self.weighted(rule.check(actual, reference));
            debug!(rule = rule.id(), issues = result.issues.len(), "Checked release");
            record(&mut outcomes, &result);
            results.push(result);
        }

        let track_rules: Vec<_> = registry::track_rules()
            .iter()
            .filter(|rule| self.config.is_enabled(rule.id()))
            .collect();
        for rule in &track_rules {
            outcomes.insert(rule.id(), (self.config.weight_for(&rule.metadata), true));
        }
        for track in &actual.tracks {
            let reference_track = reference.and_then(|r| r.track_at(track.position()));
            for rule in &track_rules {
                let result =
                    self.weighted(rule.check(track, reference_track, actual, reference));
                debug!(
                    rule = rule.id(),
                    position = %track.position(),
                    issues = result.issues.len(),
                    "Checked track"
                );
                record(&mut outcomes, &result);
                results.push(result);
            }
        }

        let score = improvement_score(outcomes.into_values());
        let report = Report::new(results, score);
        info!(
            root = %actual.root_path,
            tracks = actual.track_count(),
            issues = report.issues.len(),
            errors = report.count(release_model::Level::Error),
            score = report.score,
            "Validated release"
        );
        report
    }

    fn weighted(&self, mut result: RuleResult) -> RuleResult {
        result.metadata.weight = self.config.weight_for(&result.metadata);
        result
    }
}

fn record(outcomes: &mut BTreeMap<&'static str, (f64, bool)>, result: &RuleResult) {
    if let Some((_, passed)) = outcomes.get_mut(result.id()) {
        *passed &= result.passed();
    }
}

/// Validate with the default configuration
pub fn validate(actual: &Release, reference: Option<&Release>) -> Report {
    Runner::default().run(actual, reference)
}
