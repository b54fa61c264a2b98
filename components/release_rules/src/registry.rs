use crate::rules;
use once_cell::sync::Lazy;
use release_model::{Position, Release, RuleMetadata, RuleResult, Track};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

pub type ReleaseCheck = fn(&Release, Option<&Release>) -> RuleResult;
pub type TrackCheck = fn(&Track, Option<&Track>, &Release, Option<&Release>) -> RuleResult;

// ============================================================================
// Rule wrappers
// ============================================================================

/// A rule that looks at the release as a whole
#[derive(Clone, Copy)]
pub struct ReleaseRule {
    pub metadata: RuleMetadata,
    check: ReleaseCheck,
}

impl ReleaseRule {
    pub const fn new(metadata: RuleMetadata, check: ReleaseCheck) -> Self {
        Self { metadata, check }
    }

    pub fn id(&self) -> &'static str {
        self.metadata.id
    }

    /// Run the rule. A panic inside the rule becomes a fault result.
    pub fn check(&self, actual: &Release, reference: Option<&Release>) -> RuleResult {
        guarded(self.metadata, None, || (self.check)(actual, reference))
    }
}

impl fmt::Debug for ReleaseRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseRule")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// A rule that looks at one track, with the whole release as context
#[derive(Clone, Copy)]
pub struct TrackRule {
    pub metadata: RuleMetadata,
    check: TrackCheck,
}

impl TrackRule {
    pub const fn new(metadata: RuleMetadata, check: TrackCheck) -> Self {
        Self { metadata, check }
    }

    pub fn id(&self) -> &'static str {
        self.metadata.id
    }

    pub fn check(
        &self,
        actual_track: &Track,
        reference_track: Option<&Track>,
        actual: &Release,
        reference: Option<&Release>,
    ) -> RuleResult {
        guarded(self.metadata, Some(actual_track.position()), || {
            (self.check)(actual_track, reference_track, actual, reference)
        })
    }
}

impl fmt::Debug for TrackRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackRule")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

fn guarded(
    metadata: RuleMetadata,
    position: Option<Position>,
    run: impl FnOnce() -> RuleResult,
) -> RuleResult {
    match panic::catch_unwind(AssertUnwindSafe(run)) {
        Ok(result) => result,
        Err(payload) => {
            let reason = panic_reason(payload.as_ref());
            warn!(rule = metadata.id, %reason, "Rule failed internally");
            RuleResult::fault(metadata, position, &reason)
        }
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ============================================================================
// Discovery
// ============================================================================

struct Host {
    name: &'static str,
    release: fn() -> Vec<ReleaseRule>,
    track: fn() -> Vec<TrackRule>,
}

const HOSTS: &[Host] = &[
    Host {
        name: "release",
        release: rules::release::release_rules,
        track: rules::release::track_rules,
    },
    Host {
        name: "track",
        release: rules::track::release_rules,
        track: rules::track::track_rules,
    },
    Host {
        name: "classical",
        release: rules::classical::release_rules,
        track: rules::classical::track_rules,
    },
];

static RELEASE_RULES: Lazy<Vec<ReleaseRule>> = Lazy::new(|| {
    HOSTS
        .iter()
        .flat_map(|host| {
            let found = (host.release)();
            debug!(host = host.name, count = found.len(), "Collected release rules");
            found
        })
        .collect()
});

static TRACK_RULES: Lazy<Vec<TrackRule>> = Lazy::new(|| {
    HOSTS
        .iter()
        .flat_map(|host| {
            let found = (host.track)();
            debug!(host = host.name, count = found.len(), "Collected track rules");
            found
        })
        .collect()
});

/// Every release-scope rule, in declaration order
pub fn release_rules() -> &'static [ReleaseRule] {
    &RELEASE_RULES
}

/// Every track-scope rule, in declaration order
pub fn track_rules() -> &'static [TrackRule] {
    &TRACK_RULES
}

pub fn all_metadata() -> Vec<RuleMetadata> {
    release_rules()
        .iter()
        .map(|rule| rule.metadata)
        .chain(track_rules().iter().map(|rule| rule.metadata))
        .collect()
}

pub fn find(id: &str) -> Option<RuleMetadata> {
    all_metadata().into_iter().find(|metadata| metadata.id == id)
}

/// Ids declared by more than one rule
pub fn duplicate_ids() -> Vec<&'static str> {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for metadata in all_metadata() {
        *counts.entry(metadata.id).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(id, _)| id)
        .collect()
}

/// Ids that are empty or contain whitespace
pub fn invalid_ids() -> Vec<&'static str> {
    all_metadata()
        .into_iter()
        .map(|metadata| metadata.id)
        .filter(|id| id.is_empty() || id.chars().any(char::is_whitespace))
        .collect()
}
