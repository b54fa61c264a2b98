//! Rules about one track's file and tags.

use crate::host::rule_host;
use release_model::{Level, Position, Release, RuleResult, Track};
use title_text::{
    capitalization, composer_last_name, has_track_number_prefix, parse_track_filename,
    prefix_before_first_digit,
};

/// Longest accepted root-plus-file path, in characters
pub const MAX_PATH_LENGTH: usize = 180;

rule_host! {
    /// Root path plus file path fits in 180 characters
    #[rule(PATH_LENGTH, id = "2.3.12", name = "PathLength", level = Error)]
    fn path_length(
        track: &Track,
        _reference_track: Option<&Track>,
        release: &Release,
        _reference: Option<&Release>,
    ) -> RuleResult {
        let path = release.full_path(track);
        let length = path.chars().count();
        if length <= MAX_PATH_LENGTH {
            return RuleResult::pass(PATH_LENGTH);
        }
        RuleResult::new(
            PATH_LENGTH,
            vec![PATH_LENGTH.track_issue(
                Level::Error,
                track.position(),
                format!("path is {length} characters, more than {MAX_PATH_LENGTH}: {path}"),
            )],
        )
    }

    /// File names start with the track number, unless the release has a single track
    #[rule(TRACK_NUMBERS_IN_FILENAMES, id = "2.3.13", name = "TrackNumbersInFilenames", level = Error)]
    fn track_numbers_in_filenames(
        track: &Track,
        _reference_track: Option<&Track>,
        release: &Release,
        _reference: Option<&Release>,
    ) -> RuleResult {
        if release.track_count() <= 1 || has_track_number_prefix(track.file_name()) {
            return RuleResult::pass(TRACK_NUMBERS_IN_FILENAMES);
        }
        RuleResult::new(
            TRACK_NUMBERS_IN_FILENAMES,
            vec![TRACK_NUMBERS_IN_FILENAMES.track_issue(
                Level::Error,
                track.position(),
                format!("file name '{}' does not start with a track number", track.file_name()),
            )],
        )
    }

    /// The title part of the file name is in Title Case
    #[rule(FILENAME_CAPITALIZATION, id = "2.3.11.1", name = "FilenameCapitalization", level = Error)]
    fn filename_capitalization(
        track: &Track,
        _reference_track: Option<&Track>,
        _release: &Release,
        _reference: Option<&Release>,
    ) -> RuleResult {
        let stem = track.file.stem();
        let title = parse_track_filename(stem).map_or(stem, |parsed| parsed.title);
        if title.trim().is_empty() {
            return RuleResult::pass(FILENAME_CAPITALIZATION);
        }
        match capitalization::check(title) {
            Ok(()) => RuleResult::pass(FILENAME_CAPITALIZATION),
            Err(err) => RuleResult::new(
                FILENAME_CAPITALIZATION,
                vec![FILENAME_CAPITALIZATION.track_issue(
                    Level::Error,
                    track.position(),
                    format!("file name '{}': {err} (at '{}')", track.file_name(), err.word),
                )],
            ),
        }
    }

    /// On multi-composer releases the artist must not precede the track number.
    ///
    /// "Bach - 01 - Prelude.flac" sorts by composer instead of by track.
    #[rule(ARTIST_POSITION, id = "2.3.14.1", name = "ArtistPositionInFilename", level = Error)]
    fn artist_position_in_filename(
        track: &Track,
        _reference_track: Option<&Track>,
        release: &Release,
        _reference: Option<&Release>,
    ) -> RuleResult {
        if !release.is_multi_composer() {
            return RuleResult::pass(ARTIST_POSITION);
        }
        let Some(prefix) = prefix_before_first_digit(track.file.stem()) else {
            return RuleResult::pass(ARTIST_POSITION);
        };
        let prefix = prefix.to_lowercase();
        if prefix.trim().is_empty() {
            return RuleResult::pass(ARTIST_POSITION);
        }

        let misplaced = track.artists.iter().find(|artist| {
            let full = artist.normalized_name();
            let last = composer_last_name(&artist.name).to_lowercase();
            (!full.is_empty() && prefix.contains(&full)) || (!last.is_empty() && prefix.contains(&last))
        });

        let issues = misplaced
            .map(|artist| {
                ARTIST_POSITION.track_issue(
                    Level::Error,
                    track.position(),
                    format!(
                        "file name '{}' puts artist '{}' before the track number",
                        track.file_name(),
                        artist.name
                    ),
                )
            })
            .into_iter()
            .collect();
        RuleResult::new(ARTIST_POSITION, issues)
    }

    /// File names sort in track order on every disc.
    ///
    /// Only the first divergence in the release is reported, on the track
    /// that should have been at that place.
    #[rule(FILENAME_SORTING_ORDER, id = "2.3.14", name = "FilenameSortingOrder", level = Error)]
    fn filename_sorting_order(
        track: &Track,
        _reference_track: Option<&Track>,
        release: &Release,
        _reference: Option<&Release>,
    ) -> RuleResult {
        match first_sort_divergence(release) {
            Some(divergence) if divergence.position == track.position() => RuleResult::new(
                FILENAME_SORTING_ORDER,
                vec![FILENAME_SORTING_ORDER.track_issue(
                    Level::Error,
                    track.position(),
                    format!(
                        "file '{}' of track {} sorts after '{}'; file names must sort in track order",
                        track.file_name(),
                        track.number,
                        divergence.sorted_first
                    ),
                )],
            ),
            _ => RuleResult::pass(FILENAME_SORTING_ORDER),
        }
    }

    /// Title, artists and a performer are tagged.
    ///
    /// The performer is only demanded of single-track releases and of
    /// tracks that lack a title.
    #[rule(REQUIRED_TRACK_TAGS, id = "2.3.16.4-track", name = "RequiredTrackTags", level = Error, weight = 2.0)]
    fn required_track_tags(
        track: &Track,
        _reference_track: Option<&Track>,
        release: &Release,
        _reference: Option<&Release>,
    ) -> RuleResult {
        let position = track.position();
        let title_missing = track.title.trim().is_empty();
        let mut issues = Vec::new();

        if title_missing {
            issues.push(REQUIRED_TRACK_TAGS.track_issue(Level::Error, position, "track title is missing"));
        }
        if track.artists.is_empty() {
            issues.push(REQUIRED_TRACK_TAGS.track_issue(Level::Error, position, "track has no artists"));
        } else if !track.has_performer() && (release.track_count() == 1 || title_missing) {
            issues.push(REQUIRED_TRACK_TAGS.track_issue(Level::Error, position, "track has no performer"));
        }

        RuleResult::new(REQUIRED_TRACK_TAGS, issues)
    }
}

struct SortDivergence<'a> {
    /// Track that belongs at the diverging place
    position: Position,
    /// File name that sorts there instead
    sorted_first: &'a str,
}

fn first_sort_divergence(release: &Release) -> Option<SortDivergence<'_>> {
    for disc in release.discs() {
        let mut by_number: Vec<&Track> = release.tracks_on(disc).collect();
        by_number.sort_by_key(|t| t.number);
        let mut by_name = by_number.clone();
        by_name.sort_by(|a, b| a.file_name().cmp(b.file_name()));

        let divergence = by_number
            .iter()
            .copied()
            .zip(by_name.iter().copied())
            .find(|(expected, found)| expected.position() != found.position());
        if let Some((expected, found)) = divergence {
            return Some(SortDivergence {
                position: expected.position(),
                sorted_first: found.file_name(),
            });
        }
    }
    None
}
