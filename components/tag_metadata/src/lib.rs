use lofty::{Accessor, ItemKey, LoftyError, Probe, Tag, TaggedFileExt};
use release_model::is_audio_extension;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TagError {
    #[error("Failed to read tags from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: LoftyError,
    },

    #[error("{}: missing {field} tag", path.display())]
    MissingField { path: PathBuf, field: &'static str },
}

/// Tags of one audio file as written, before any interpretation.
///
/// Multi-valued fields collect every value of the tag, with values
/// separated by `;` split apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagRecord {
    pub file_path: PathBuf,
    pub title: Option<String>,
    pub artists: Vec<String>,
    pub album: Option<String>,
    pub album_artists: Vec<String>,
    pub composers: Vec<String>,
    pub conductors: Vec<String>,
    pub arrangers: Vec<String>,
    pub year: Option<u32>,
    pub track_number: Option<u32>,
    pub disc_number: Option<u32>,
    pub label: Option<String>,
    pub catalog_number: Option<String>,
}

impl TagRecord {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            ..Self::default()
        }
    }

    /// Required tags that are absent or blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let blank = |value: &Option<String>| value.as_deref().map_or(true, |v| v.trim().is_empty());
        let mut missing = Vec::new();
        if blank(&self.title) {
            missing.push("TITLE");
        }
        if self.artists.is_empty() {
            missing.push("ARTIST");
        }
        if blank(&self.album) {
            missing.push("ALBUM");
        }
        if self.composers.is_empty() {
            missing.push("COMPOSER");
        }
        if self.year.is_none() {
            missing.push("YEAR");
        }
        if self.track_number.is_none() {
            missing.push("TRACKNUMBER");
        }
        missing
    }

    /// Fails on the first required tag that is missing
    pub fn validate(&self) -> Result<(), TagError> {
        match self.missing_fields().first() {
            None => Ok(()),
            Some(&field) => Err(TagError::MissingField {
                path: self.file_path.clone(),
                field,
            }),
        }
    }
}

pub fn is_audio_file(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(is_audio_extension)
}

/// Read the tags of an audio file. A file without any tag yields an empty record.
pub fn read_tags(path: impl AsRef<Path>) -> Result<TagRecord, TagError> {
    let path = path.as_ref();
    let read_error = |source: LoftyError| TagError::Read {
        path: path.to_path_buf(),
        source,
    };

    let tagged_file = Probe::open(path)
        .map_err(read_error)?
        .read()
        .map_err(read_error)?;

    let mut record = TagRecord::new(path);
    if let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
        fill_record(&mut record, tag);
    }
    Ok(record)
}

fn fill_record(record: &mut TagRecord, tag: &Tag) {
    record.title = tag.title().map(|s| s.trim().to_string());
    record.album = tag.album().map(|s| s.trim().to_string());
    record.artists = values(tag, &ItemKey::TrackArtist);
    record.album_artists = values(tag, &ItemKey::AlbumArtist);
    record.composers = values(tag, &ItemKey::Composer);
    record.conductors = values(tag, &ItemKey::Conductor);
    record.arrangers = values(tag, &ItemKey::Arranger);
    record.year = tag.year();
    record.track_number = tag.track();
    record.disc_number = tag.disk();
    record.label = tag.get_string(&ItemKey::Label).map(|s| s.trim().to_string());
    record.catalog_number = tag
        .get_string(&ItemKey::CatalogNumber)
        .map(|s| s.trim().to_string());
}

fn values(tag: &Tag, key: &ItemKey) -> Vec<String> {
    split_values(tag.get_strings(key))
}

fn split_values<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    raw.flat_map(|value| value.split(';'))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}
