use once_cell::sync::Lazy;
use regex::Regex;

static TRACK_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)[\s\-_\.]+(.*)$").expect("track prefix pattern is valid"));

/// A file name split into its leading track number and the rest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackFilename<'a> {
    pub number: u32,
    pub title: &'a str,
}

/// Split "01 - Aria" into track number 1 and title "Aria".
///
/// Expects a basename without directory and extension.
pub fn parse_track_filename(stem: &str) -> Option<TrackFilename<'_>> {
    let captures = TRACK_PREFIX.captures(stem)?;
    let number = captures.get(1)?.as_str().parse().ok()?;
    let title = captures.get(2).map_or("", |m| m.as_str());
    Some(TrackFilename { number, title })
}

pub fn has_track_number_prefix(stem: &str) -> bool {
    TRACK_PREFIX.is_match(stem)
}

/// Everything before the first digit, or `None` when the name has no digit
pub fn prefix_before_first_digit(name: &str) -> Option<&str> {
    name.find(|c: char| c.is_ascii_digit()).map(|index| &name[..index])
}
