use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Primitive Types (newtype pattern)
// ============================================================================

/// Disc number within a release, starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct DiscNumber(pub u32);

impl DiscNumber {
    pub const FIRST: DiscNumber = DiscNumber(1);

    pub fn new(number: u32) -> Self {
        Self(number)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Default for DiscNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for DiscNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Track number within a disc, starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TrackNumber(pub u32);

impl TrackNumber {
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TrackNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Year of release; 0 means unknown
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Hash, PartialOrd, Ord,
)]
#[serde(transparent)]
pub struct Year(pub u32);

impl Year {
    pub const UNKNOWN: Year = Year(0);

    pub fn new(year: u32) -> Self {
        Self(year)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn is_known(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a track sits in a release: disc first, then track number.
///
/// Ordering follows disc then track, which is the canonical listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash, PartialOrd, Ord)]
pub struct Position {
    pub disc: DiscNumber,
    pub track: TrackNumber,
}

impl Position {
    pub fn new(disc: u32, track: u32) -> Self {
        Self {
            disc: DiscNumber(disc),
            track: TrackNumber(track),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "disc {} track {}", self.disc, self.track)
    }
}
