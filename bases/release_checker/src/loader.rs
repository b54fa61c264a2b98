//! Builds a [`Release`] from the audio files under a release folder.

use crate::error::{LoadError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use release_model::{normalize_name, Artist, Edition, Release, Track, Year};
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use tag_metadata::{is_audio_file, read_tags, TagRecord};
use title_text::parse_track_filename;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

static DISC_FOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:cd|disc|disk)\s*0*(\d+)\b").expect("disc folder pattern is valid")
});

const ENSEMBLE_WORDS: &[&str] = &[
    "orchestra",
    "orchestre",
    "orchester",
    "orquesta",
    "ensemble",
    "choir",
    "chorus",
    "chor",
    "coro",
    "quartet",
    "quintet",
    "trio",
    "consort",
    "players",
    "philharmoni",
    "symphony",
    "sinfonia",
    "camerata",
    "collegium",
    "academy",
    "akademie",
    "cappella",
    "capella",
    "singers",
    "band",
];

/// Read every audio file under `root` and assemble the release
pub async fn load_release(root: &Path) -> Result<Release> {
    let files = audio_files(root)?;
    if files.is_empty() {
        return Err(LoadError::NoAudioFiles {
            path: root.to_path_buf(),
        });
    }
    info!("Reading tags of {} files under {}", files.len(), root.display());

    let records = read_all(files).await?;
    Ok(assemble_release(root, &records))
}

fn audio_files(root: &Path) -> Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(root).map_err(|source| LoadError::UnreadableRoot {
        path: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(LoadError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|source| LoadError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && is_audio_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Tags are read on the blocking pool. Unreadable files keep their place
/// with an empty record so the naming rules still see them.
async fn read_all(files: Vec<PathBuf>) -> Result<Vec<TagRecord>> {
    let mut tasks = JoinSet::new();
    for (index, path) in files.into_iter().enumerate() {
        tasks.spawn_blocking(move || {
            let record = read_tags(&path).unwrap_or_else(|error| {
                warn!("{error}");
                TagRecord::new(path.clone())
            });
            if let Err(error) = record.validate() {
                debug!("{error}");
            }
            (index, record)
        });
    }

    let mut records = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        records.push(joined?);
    }
    records.sort_by_key(|(index, _)| *index);
    Ok(records.into_iter().map(|(_, record)| record).collect())
}

/// Fold per-file tags into one release. Album-wide values (title, year,
/// label, catalog number, album artists) take the most common tag value.
pub fn assemble_release(root: &Path, records: &[TagRecord]) -> Release {
    let root_path = root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());
    let title = most_common(records.iter().filter_map(|r| r.album.clone())).unwrap_or_default();
    let year = most_common(records.iter().filter_map(|r| r.year));

    let mut release = Release::new(root_path, title);
    if let Some(year) = year {
        release = release.with_year(year);
    }

    let label = most_common(records.iter().filter_map(|r| r.label.clone()));
    let catalog_number = most_common(records.iter().filter_map(|r| r.catalog_number.clone()));
    if label.is_some() || catalog_number.is_some() {
        release = release.with_edition(Edition {
            label,
            catalog_number,
            year: year.map(Year::new),
        });
    }

    if let Some(album_artists) = most_common(
        records
            .iter()
            .map(|r| r.album_artists.clone())
            .filter(|artists| !artists.is_empty()),
    ) {
        release = release.with_album_artists(album_artists);
    }

    records
        .iter()
        .enumerate()
        .fold(release, |release, (index, record)| {
            release.with_track(track_from_tags(root, index, record))
        })
}

/// One track from its tags. Missing numbers fall back to the file name
/// prefix, then to the listing order; missing discs to a "CD 2" style
/// folder, then to disc 1.
pub fn track_from_tags(root: &Path, index: usize, record: &TagRecord) -> Track {
    let relative = record.file_path.strip_prefix(root).unwrap_or(&record.file_path);
    let file = slash_path(relative);

    let stem = relative
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let number = record
        .track_number
        .or_else(|| parse_track_filename(&stem).map(|parsed| parsed.number))
        .unwrap_or(index as u32 + 1);
    let disc = record
        .disc_number
        .or_else(|| disc_from_folder(relative))
        .unwrap_or(1);

    let title = record.title.clone().unwrap_or_default();
    Track::new(disc, number, title, file).with_artists(artists(record))
}

fn artists(record: &TagRecord) -> Vec<Artist> {
    let mut artists: Vec<Artist> = record
        .composers
        .iter()
        .map(|name| Artist::composer(name.as_str()))
        .chain(record.conductors.iter().map(|name| Artist::conductor(name.as_str())))
        .chain(record.arrangers.iter().map(|name| Artist::arranger(name.as_str())))
        .collect();

    for name in &record.artists {
        let normalized = normalize_name(name);
        if artists.iter().any(|known| known.normalized_name() == normalized) {
            continue;
        }
        artists.push(if is_ensemble(name) {
            Artist::ensemble(name.as_str())
        } else {
            Artist::soloist(name.as_str())
        });
    }
    artists
}

fn is_ensemble(name: &str) -> bool {
    let lowered = name.to_lowercase();
    ENSEMBLE_WORDS.iter().any(|word| lowered.contains(word))
}

fn disc_from_folder(relative: &Path) -> Option<u32> {
    relative.parent()?.components().rev().find_map(|component| match component {
        Component::Normal(name) => DISC_FOLDER
            .captures(&name.to_string_lossy())
            .and_then(|captures| captures[1].parse().ok()),
        _ => None,
    })
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

// Ties go to the smallest value
fn most_common<T: Ord>(values: impl IntoIterator<Item = T>) -> Option<T> {
    let mut counts = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0usize) += 1;
    }
    counts
        .into_iter()
        .rev()
        .max_by_key(|(_, count)| *count)
        .map(|(value, _)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use release_model::{ArtistRole, Position};

    const ROOT: &str = "/music/Bach - Cantatas [1999] [FLAC]";

    fn record(file: &str) -> TagRecord {
        TagRecord {
            title: Some("Aria".into()),
            album: Some("Cantatas".into()),
            composers: vec!["Johann Sebastian Bach".into()],
            artists: vec!["Bach Collegium Japan".into()],
            year: Some(1999),
            ..TagRecord::new(Path::new(ROOT).join(file))
        }
    }

    fn roles(track: &Track) -> Vec<(&str, ArtistRole)> {
        track
            .artists
            .iter()
            .map(|artist| (artist.name.as_str(), artist.role))
            .collect()
    }

    #[test]
    fn artists_get_roles() {
        let tags = TagRecord {
            artists: vec![
                "Masaaki Suzuki".into(),
                "Bach Collegium Japan".into(),
                "Johann Sebastian Bach".into(),
            ],
            conductors: vec!["Masaaki Suzuki".into()],
            ..record("01 Aria.flac")
        };
        let track = track_from_tags(Path::new(ROOT), 0, &tags);
        assert_eq!(
            roles(&track),
            vec![
                ("Johann Sebastian Bach", ArtistRole::Composer),
                ("Masaaki Suzuki", ArtistRole::Conductor),
                ("Bach Collegium Japan", ArtistRole::Ensemble),
            ]
        );

        let tags = TagRecord {
            artists: vec!["Glenn Gould".into()],
            ..record("01 Aria.flac")
        };
        let track = track_from_tags(Path::new(ROOT), 0, &tags);
        assert_eq!(roles(&track)[1], ("Glenn Gould", ArtistRole::Soloist));
    }

    #[test]
    fn numbers_fall_back_to_file_name_then_order() {
        let root = Path::new(ROOT);
        let tagged = TagRecord {
            track_number: Some(7),
            disc_number: Some(2),
            ..record("01 Aria.flac")
        };
        assert_eq!(track_from_tags(root, 0, &tagged).position(), Position::new(2, 7));

        let from_name = track_from_tags(root, 0, &record("CD2/05 - Aria.flac"));
        assert_eq!(from_name.position(), Position::new(2, 5));
        assert_eq!(from_name.file.path(), "CD2/05 - Aria.flac");

        let from_order = track_from_tags(root, 3, &record("Aria.flac"));
        assert_eq!(from_order.position(), Position::new(1, 4));
    }

    #[test]
    fn disc_folders() {
        assert_eq!(disc_from_folder(Path::new("CD1/01.flac")), Some(1));
        assert_eq!(disc_from_folder(Path::new("Disc 02/01.flac")), Some(2));
        assert_eq!(disc_from_folder(Path::new("disk3/scans/01.flac")), Some(3));
        assert_eq!(disc_from_folder(Path::new("Cantatas/01.flac")), None);
        assert_eq!(disc_from_folder(Path::new("01.flac")), None);
    }

    #[test]
    fn release_takes_most_common_album_values() {
        let records = vec![
            TagRecord {
                label: Some("test label".into()),
                catalog_number: Some("BIS-CD-1031".into()),
                album_artists: vec!["Bach Collegium Japan".into()],
                ..record("01 Aria.flac")
            },
            TagRecord {
                album: Some("Cantata".into()),
                label: Some("test label".into()),
                album_artists: vec!["Bach Collegium Japan".into()],
                ..record("02 Aria.flac")
            },
            TagRecord {
                year: Some(2000),
                ..record("03 Aria.flac")
            },
        ];
        let release = assemble_release(Path::new(ROOT), &records);

        assert_eq!(release.root_path, "Bach - Cantatas [1999] [FLAC]");
        assert_eq!(release.title, "Cantatas");
        assert_eq!(release.original_year, Year::new(1999));
        assert_eq!(
            release.edition,
            Some(Edition::new("test label", "BIS-CD-1031", 1999))
        );
        assert_eq!(
            release.album_artists,
            Some(vec!["Bach Collegium Japan".to_string()])
        );
        assert_eq!(release.track_count(), 3);
        assert_eq!(release.tracks[2].file.path(), "03 Aria.flac");
    }

    #[test]
    fn untagged_release_has_no_edition() {
        let records = vec![TagRecord::new(Path::new(ROOT).join("01 Aria.flac"))];
        let release = assemble_release(Path::new(ROOT), &records);
        assert_eq!(release.title, "");
        assert_eq!(release.edition, None);
        assert_eq!(release.album_artists, None);
        assert!(!release.original_year.is_known());
        assert_eq!(release.tracks[0].position(), Position::new(1, 1));
    }

    #[test]
    fn most_common_breaks_ties_low() {
        assert_eq!(most_common([3, 1, 3, 1, 2]), Some(1));
        assert_eq!(most_common([2, 2, 1]), Some(2));
        assert_eq!(most_common(Vec::<u32>::new()), None);
    }

    #[tokio::test]
    async fn empty_folder_has_no_audio() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cover.jpg"), b"jpeg").unwrap();
        assert_matches!(
            load_release(dir.path()).await,
            Err(LoadError::NoAudioFiles { .. })
        );
    }

    #[tokio::test]
    async fn missing_root_is_an_error() {
        assert_matches!(
            load_release(Path::new("/nonexistent/release")).await,
            Err(LoadError::UnreadableRoot { .. })
        );
    }

    #[tokio::test]
    async fn unreadable_files_are_kept_in_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("CD2")).unwrap();
        std::fs::write(dir.path().join("02 - Gigue.flac"), b"not audio").unwrap();
        std::fs::write(dir.path().join("01 - Prelude.flac"), b"not audio").unwrap();
        std::fs::write(dir.path().join("CD2/03 - Sarabande.mp3"), b"not audio").unwrap();

        let release = load_release(dir.path()).await.unwrap();
        let files: Vec<_> = release.tracks.iter().map(|t| t.file.path()).collect();
        assert_eq!(
            files,
            vec!["01 - Prelude.flac", "02 - Gigue.flac", "CD2/03 - Sarabande.mp3"]
        );
        assert_eq!(release.tracks[2].position(), Position::new(2, 3));
        assert!(release.tracks.iter().all(|t| t.title.is_empty()));
    }
}
