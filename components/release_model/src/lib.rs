//! Domain model of a classical release: tracks, artists, editions, and the
//! findings rules report about them.

mod artist;
mod issue;
mod primitives;
mod release;

pub use artist::{normalize_name, Artist, ArtistRole};
pub use issue::{Level, LevelError, RuleMetadata, RuleResult, ValidationIssue};
pub use primitives::{DiscNumber, Position, TrackNumber, Year};
pub use release::{is_audio_extension, Edition, Release, Track, TrackFile, AUDIO_EXTENSIONS};
