use crate::artist::{normalize_name, Artist};
use crate::primitives::{DiscNumber, Position, TrackNumber, Year};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// File extensions of the audio formats a release may hold
pub const AUDIO_EXTENSIONS: &[&str] = &[
    "flac", "mp3", "m4a", "aac", "alac", "wav", "ape", "wv", "ogg", "opus",
];

/// An audio file, addressed relative to the release root with `/` separators
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackFile {
    pub path: String,
}

impl TrackFile {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The basename, with any directory prefix such as `CD1/` removed
    pub fn file_name(&self) -> &str {
        self.path
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or(&self.path)
    }

    /// The basename without its audio extension
    pub fn stem(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(dot) if dot > 0 && is_audio_extension(&name[dot + 1..]) => &name[..dot],
            _ => name,
        }
    }
}

/// Case-insensitive membership in [`AUDIO_EXTENSIONS`]
pub fn is_audio_extension(extension: &str) -> bool {
    AUDIO_EXTENSIONS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(extension))
}

/// Label, catalog number and year of a specific edition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edition {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub catalog_number: Option<String>,
    #[serde(default)]
    pub year: Option<Year>,
}

impl Edition {
    pub fn new(
        label: impl Into<String>,
        catalog_number: impl Into<String>,
        year: u32,
    ) -> Self {
        Self {
            label: Some(label.into()),
            catalog_number: Some(catalog_number.into()),
            year: Some(Year::new(year)),
        }
    }

    /// Names of the fields that are absent or blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.label.as_deref().map_or(true, |l| l.trim().is_empty()) {
            missing.push("label");
        }
        if self
            .catalog_number
            .as_deref()
            .map_or(true, |c| c.trim().is_empty())
        {
            missing.push("catalog number");
        }
        if !self.year.is_some_and(|y| y.is_known()) {
            missing.push("release year");
        }
        missing
    }
}

/// One audio track of a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub disc: DiscNumber,
    pub number: TrackNumber,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    pub file: TrackFile,
}

impl Track {
    pub fn new(disc: u32, number: u32, title: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            disc: DiscNumber::new(disc),
            number: TrackNumber::new(number),
            title: title.into(),
            artists: Vec::new(),
            file: TrackFile::new(file),
        }
    }

    pub fn with_artist(mut self, artist: Artist) -> Self {
        self.artists.push(artist);
        self
    }

    pub fn with_artists(mut self, artists: impl IntoIterator<Item = Artist>) -> Self {
        self.artists.extend(artists);
        self
    }

    pub fn position(&self) -> Position {
        Position {
            disc: self.disc,
            track: self.number,
        }
    }

    pub fn file_name(&self) -> &str {
        self.file.file_name()
    }

    pub fn composers(&self) -> impl Iterator<Item = &Artist> {
        self.artists.iter().filter(|a| a.is_composer())
    }

    pub fn performers(&self) -> impl Iterator<Item = &Artist> {
        self.artists.iter().filter(|a| a.is_performer())
    }

    pub fn has_performer(&self) -> bool {
        self.performers().next().is_some()
    }
}

/// A release (torrent): one root folder holding the audio files of one
/// publication, possibly spread over several discs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub root_path: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub original_year: Year,
    #[serde(default)]
    pub edition: Option<Edition>,
    #[serde(default)]
    pub album_artists: Option<Vec<String>>,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl Release {
    pub fn new(root_path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            root_path: root_path.into(),
            title: title.into(),
            original_year: Year::UNKNOWN,
            edition: None,
            album_artists: None,
            tracks: Vec::new(),
        }
    }

    pub fn with_year(mut self, year: u32) -> Self {
        self.original_year = Year::new(year);
        self
    }

    pub fn with_edition(mut self, edition: Edition) -> Self {
        self.edition = Some(edition);
        self
    }

    pub fn with_album_artists<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.album_artists = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_track(mut self, track: Track) -> Self {
        self.tracks.push(track);
        self
    }

    /// Last component of the root path
    pub fn folder_name(&self) -> &str {
        let trimmed = self.root_path.trim_end_matches(|c: char| c == '/' || c == '\\');
        trimmed
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or(trimmed)
    }

    /// Root path and file path joined with `/`
    pub fn full_path(&self, track: &Track) -> String {
        let root = self.root_path.trim_end_matches(|c: char| c == '/' || c == '\\');
        let file = track.file.path().trim_start_matches(|c: char| c == '/' || c == '\\');
        if root.is_empty() {
            file.to_string()
        } else {
            format!("{root}/{file}")
        }
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Distinct disc numbers in ascending order
    pub fn discs(&self) -> Vec<DiscNumber> {
        self.tracks
            .iter()
            .map(|t| t.disc)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn tracks_on(&self, disc: DiscNumber) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(move |t| t.disc == disc)
    }

    pub fn track_at(&self, position: Position) -> Option<&Track> {
        self.tracks.iter().find(|t| t.position() == position)
    }

    /// Composer names across all tracks, compared case-insensitively.
    /// The first spelling seen is kept; order follows normalised name.
    pub fn distinct_composers(&self) -> Vec<&str> {
        let mut seen: BTreeMap<String, &str> = BTreeMap::new();
        for composer in self.tracks.iter().flat_map(|t| t.composers()) {
            seen.entry(normalize_name(&composer.name))
                .or_insert(composer.name.as_str());
        }
        seen.into_values().collect()
    }

    pub fn is_multi_composer(&self) -> bool {
        self.distinct_composers().len() > 1
    }

    /// Positions used by more than one track
    pub fn duplicate_positions(&self) -> Vec<Position> {
        let mut counts: BTreeMap<Position, usize> = BTreeMap::new();
        for track in &self.tracks {
            *counts.entry(track.position()).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(position, _)| position)
            .collect()
    }
}
