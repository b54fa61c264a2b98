//! Rules about the release as a whole: folder name, album title, disc
//! numbering and album-level tags.

use crate::host::rule_host;
use once_cell::sync::Lazy;
use regex::Regex;
use release_model::{normalize_name, Artist, ArtistRole, DiscNumber, Level, Release, RuleResult};
use std::collections::{BTreeMap, BTreeSet};
use title_text::{
    core_work, key_phrase, normalize_title, title_distance, MATCH_THRESHOLD,
    MINOR_DIFFERENCE_THRESHOLD,
};

static BRACKETED_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[(\d{4})\]|\((\d{4})\)").expect("bracketed year pattern is valid")
});
static DASHED_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-\s*(\d{4})\b").expect("dashed year pattern is valid"));
static FOLDER_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:FLAC|MP3|AAC|ALAC|WAV|APE|WV)\b").expect("format pattern is valid")
});
static REQUEST_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\[req\]").expect("request tag pattern is valid"));
static REQUEST_VARIANT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\[request(?:ed)?\]|\(req(?:uest)?\)").expect("request variant pattern is valid")
});

const VARIOUS_ARTISTS: &str = "various artists";

rule_host! {
    /// Folder name reads "Artist - Title [Year] [Format]".
    ///
    /// A missing separator or year is a warning, as is a year that
    /// disagrees with the release year. A missing format is informational.
    #[rule(FOLDER_NAME_FORMAT, id = "2.3.2", name = "FolderNameFormat", level = Warning)]
    fn folder_name_format(actual: &Release, _reference: Option<&Release>) -> RuleResult {
        let folder = actual.folder_name();
        let mut issues = Vec::new();

        if !folder.contains(" - ") {
            issues.push(FOLDER_NAME_FORMAT.release_issue(
                Level::Warning,
                format!("folder name '{folder}' should separate artist and title with ' - '"),
            ));
        }

        match folder_year(folder) {
            None => issues.push(FOLDER_NAME_FORMAT.release_issue(
                Level::Warning,
                format!("folder name '{folder}' should contain the year, e.g. [2013]"),
            )),
            Some(year) if actual.original_year.is_known() && year != actual.original_year.value() => {
                issues.push(FOLDER_NAME_FORMAT.release_issue(
                    Level::Warning,
                    format!(
                        "folder year {year} does not match release year {}",
                        actual.original_year
                    ),
                ))
            }
            Some(_) => {}
        }

        if !FOLDER_FORMAT.is_match(folder) {
            issues.push(FOLDER_NAME_FORMAT.release_issue(
                Level::Info,
                format!("folder name '{folder}' should name the format, e.g. [FLAC]"),
            ));
        }

        RuleResult::new(FOLDER_NAME_FORMAT, issues)
    }

    /// Request markers do not belong in the album title or folder name.
    ///
    /// `[REQ]` is an error; the longer variants are warnings.
    #[rule(NO_REQUEST_TAG, id = "2.3.5", name = "NoRequestTagInTitle", level = Error)]
    fn no_request_tag_in_title(actual: &Release, _reference: Option<&Release>) -> RuleResult {
        let mut issues = Vec::new();
        for (field, text) in [("album title", actual.title.as_str()), ("folder name", actual.folder_name())] {
            if let Some(tag) = REQUEST_TAG.find(text) {
                issues.push(NO_REQUEST_TAG.release_issue(
                    Level::Error,
                    format!("{field} '{text}' contains request tag {}", tag.as_str()),
                ));
            } else if let Some(tag) = REQUEST_VARIANT.find(text) {
                issues.push(NO_REQUEST_TAG.release_issue(
                    Level::Warning,
                    format!("{field} '{text}' contains request tag {}", tag.as_str()),
                ));
            }
        }
        RuleResult::new(NO_REQUEST_TAG, issues)
    }

    /// Album title agrees with the reference title.
    ///
    /// Passes silently without a reference.
    #[rule(ALBUM_TITLE_ACCURACY, id = "2.3.6", name = "AlbumTitleAccuracy", level = Error)]
    fn album_title_accuracy(actual: &Release, reference: Option<&Release>) -> RuleResult {
        let Some(reference) = reference else {
            return RuleResult::pass(ALBUM_TITLE_ACCURACY);
        };
        if actual.title.trim().is_empty() || reference.title.trim().is_empty() {
            return RuleResult::pass(ALBUM_TITLE_ACCURACY);
        }

        let issues = compare_titles(&actual.title, &reference.title)
            .map(|(level, message)| ALBUM_TITLE_ACCURACY.release_issue(level, message))
            .into_iter()
            .collect();
        RuleResult::new(ALBUM_TITLE_ACCURACY, issues)
    }

    /// Discs are numbered 1..N without holes and each disc's tracks start at 1.
    ///
    /// Two tracks at the same disc and track number are an error on any
    /// release, single-disc ones included.
    #[rule(MULTI_DISC_NUMBERING, id = "2.3.15", name = "MultiDiscTrackNumbering", level = Error)]
    fn multi_disc_track_numbering(actual: &Release, _reference: Option<&Release>) -> RuleResult {
        let mut issues: Vec<_> = actual
            .duplicate_positions()
            .into_iter()
            .map(|position| {
                MULTI_DISC_NUMBERING.track_issue(
                    Level::Error,
                    position,
                    format!("{position} is used by more than one track"),
                )
            })
            .collect();

        let discs = actual.discs();
        let Some(&last) = discs.last() else {
            return RuleResult::new(MULTI_DISC_NUMBERING, issues);
        };
        if discs.len() <= 1 {
            return RuleResult::new(MULTI_DISC_NUMBERING, issues);
        }

        for number in 1..last.value() {
            if !discs.contains(&DiscNumber::new(number)) {
                issues.push(MULTI_DISC_NUMBERING.release_issue(
                    Level::Error,
                    format!("missing disc {number} (discs run to {last})"),
                ));
            }
        }

        for disc in discs {
            let mut numbers: Vec<u32> = actual.tracks_on(disc).map(|t| t.number.value()).collect();
            numbers.sort_unstable();
            numbers.dedup();
            match numbers.first() {
                Some(&first) if first != 1 => {
                    issues.push(MULTI_DISC_NUMBERING.release_issue(
                        Level::Error,
                        format!("disc {disc} must start at 1 (first track is {first})"),
                    ));
                    continue;
                }
                _ => {}
            }
            let expected: Vec<u32> = (1..=numbers.len() as u32).collect();
            if numbers != expected {
                issues.push(MULTI_DISC_NUMBERING.release_issue(
                    Level::Warning,
                    format!("disc {disc} track numbers have gaps: {numbers:?}"),
                ));
            }
        }

        RuleResult::new(MULTI_DISC_NUMBERING, issues)
    }

    /// Album title and original year are tagged
    #[rule(REQUIRED_ALBUM_TAGS, id = "2.3.16.4-album", name = "RequiredAlbumTags", level = Error, weight = 2.0)]
    fn required_album_tags(actual: &Release, _reference: Option<&Release>) -> RuleResult {
        let mut issues = Vec::new();
        if actual.title.trim().is_empty() {
            issues.push(REQUIRED_ALBUM_TAGS.release_issue(Level::Error, "album title is missing"));
        }
        if !actual.original_year.is_known() {
            issues.push(
                REQUIRED_ALBUM_TAGS.release_issue(Level::Warning, "original release year is missing"),
            );
        }
        RuleResult::new(REQUIRED_ALBUM_TAGS, issues)
    }

    /// Album artists must be credited on some track.
    ///
    /// Without album artists the rule only suggests one: the dominant
    /// performer, the lead ensemble of a single-track release, or the main
    /// ensemble of a release with many composers.
    #[rule(ALBUM_ARTIST_TAG, id = "2.3.7", name = "AlbumArtistTag", level = Info)]
    fn album_artist_tag(actual: &Release, _reference: Option<&Release>) -> RuleResult {
        let album_artists = actual.album_artists.as_deref().unwrap_or_default();
        if album_artists.is_empty() {
            let issues = album_artist_suggestion(actual)
                .map(|message| ALBUM_ARTIST_TAG.release_issue(Level::Info, message))
                .into_iter()
                .collect();
            return RuleResult::new(ALBUM_ARTIST_TAG, issues);
        }

        let credited: BTreeSet<String> = actual
            .tracks
            .iter()
            .flat_map(|t| &t.artists)
            .map(Artist::normalized_name)
            .collect();

        let issues = album_artists
            .iter()
            .filter(|name| {
                let normalized = normalize_name(name);
                !normalized.is_empty() && normalized != VARIOUS_ARTISTS && !credited.contains(&normalized)
            })
            .map(|name| {
                ALBUM_ARTIST_TAG.release_issue(
                    Level::Error,
                    format!("album artist '{name}' must appear in at least one track's ARTISTs"),
                )
            })
            .collect();
        RuleResult::new(ALBUM_ARTIST_TAG, issues)
    }
}

// "[2013]" or "(2013)" wins over "- 2013", which also matches catalog ranges
fn folder_year(folder: &str) -> Option<u32> {
    BRACKETED_YEAR
        .captures(folder)
        .or_else(|| DASHED_YEAR.captures(folder))?
        .iter()
        .skip(1)
        .flatten()
        .next()?
        .as_str()
        .parse()
        .ok()
}

fn compare_titles(actual: &str, expected: &str) -> Option<(Level, String)> {
    let normalized_actual = normalize_title(actual);
    let normalized_expected = normalize_title(expected);
    if normalized_actual == normalized_expected {
        return None;
    }

    let actual_key = key_phrase(actual);
    let expected_key = key_phrase(expected);

    if let (Some(core), Some(expected_core)) =
        (core_work(&normalized_actual), core_work(&normalized_expected))
    {
        if core == expected_core {
            if normalized_actual == core {
                return None;
            }
            if let (Some(a), Some(e)) = (actual_key, expected_key) {
                if !a.has_mode() && e.has_mode() && a.same_tonic(&e) {
                    return Some((
                        Level::Warning,
                        format!("album title '{actual}' leaves out the mode of '{expected}'"),
                    ));
                }
            }
        }
    }

    if let (Some(a), Some(e)) = (actual_key, expected_key) {
        if a.has_mode() && e.has_mode() && a != e {
            return Some((
                Level::Error,
                format!("album title '{actual}' is in {a} but the reference '{expected}' is in {e}"),
            ));
        }
    }

    let distance = title_distance(actual, expected);
    if distance <= MATCH_THRESHOLD {
        None
    } else if distance <= MINOR_DIFFERENCE_THRESHOLD {
        Some((
            Level::Warning,
            format!("album title '{actual}' has minor differences from reference '{expected}' (distance {distance})"),
        ))
    } else {
        Some((
            Level::Error,
            format!("album title '{actual}' does not match reference '{expected}' (distance {distance})"),
        ))
    }
}

fn album_artist_suggestion(release: &Release) -> Option<String> {
    if release.title.to_lowercase().contains(VARIOUS_ARTISTS) {
        return Some("album title mentions Various Artists; set the album artist to Various Artists".to_string());
    }

    let composers = release.distinct_composers().len();
    if composers > 3 {
        let leaders = |a: &Artist| matches!(a.role, ArtistRole::Ensemble | ArtistRole::Conductor);
        return Some(match dominant_artist(release, leaders) {
            Some(name) => format!("{composers} composers on this release; consider '{name}' as album artist"),
            None => format!("{composers} composers on this release; consider setting an album artist"),
        });
    }

    if let [track] = release.tracks.as_slice() {
        let has_soloist = track.artists.iter().any(|a| a.role == ArtistRole::Soloist);
        return track
            .artists
            .iter()
            .find(|a| matches!(a.role, ArtistRole::Ensemble | ArtistRole::Conductor))
            .filter(|_| !has_soloist)
            .map(|a| format!("consider '{}' as album artist", a.name));
    }

    dominant_artist(release, Artist::is_performer)
        .map(|name| format!("'{name}' performs on most tracks; consider it as album artist"))
}

/// Artist credited on more than half of the tracks, among those `pick` accepts
fn dominant_artist(release: &Release, pick: impl Fn(&Artist) -> bool) -> Option<String> {
    let mut counts: BTreeMap<String, (&str, usize)> = BTreeMap::new();
    for track in &release.tracks {
        let on_track: BTreeMap<String, &str> = track
            .artists
            .iter()
            .filter(|a| pick(*a))
            .map(|a| (a.normalized_name(), a.name.as_str()))
            .collect();
        for (key, name) in on_track {
            counts.entry(key).or_insert((name, 0)).1 += 1;
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (name, count) in counts.into_values() {
        if count * 2 > release.track_count() && best.map_or(true, |(_, c)| count > c) {
            best = Some((name, count));
        }
    }
    best.map(|(name, _)| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use release_model::{Position, Track};
    use rstest::rstest;

    fn release(root: &str) -> Release {
        Release::new(root, "Frohlocket").with_year(2013)
    }

    fn levels(result: &RuleResult) -> Vec<Level> {
        result.issues.iter().map(|i| i.level).collect()
    }

    #[rstest]
    #[case("Mendelssohn - Frohlocket [2013] [FLAC]", vec![])]
    #[case("Mendelssohn - Frohlocket (2013) [flac]", vec![])]
    #[case("Mendelssohn - Frohlocket - 2013 FLAC", vec![])]
    #[case("Mendelssohn Frohlocket [2013] [FLAC]", vec![Level::Warning])]
    #[case("Mendelssohn - Frohlocket [FLAC]", vec![Level::Warning])]
    #[case("Mendelssohn - Frohlocket [2012] [FLAC]", vec![Level::Warning])]
    #[case("Mendelssohn - Frohlocket [2013]", vec![Level::Info])]
    #[case("Bach - Concertos BWV 1052-1058 [2013] [FLAC]", vec![])]
    #[case("Bach - Concertos BWV 1052-1058 (2013) [FLAC]", vec![])]
    fn folder_names(#[case] root: &str, #[case] expected: Vec<Level>) {
        let result = folder_name_format(&release(root), None);
        assert_eq!(levels(&result), expected, "{:?}", result.issues);
    }

    #[test]
    fn folder_year_is_not_checked_against_unknown_release_year() {
        let release = Release::new("Bach - Mass [1999] [FLAC]", "Mass");
        assert!(folder_name_format(&release, None).passed());
    }

    #[rstest]
    #[case("Foo [REQ] [2013] [FLAC]", vec![Level::Error])]
    #[case("Foo [req]", vec![Level::Error])]
    #[case("Foo [REQUEST] [2013] [FLAC]", vec![Level::Warning])]
    #[case("Foo [REQUESTED]", vec![Level::Warning])]
    #[case("Foo (REQ)", vec![Level::Warning])]
    #[case("Foo (Request)", vec![Level::Warning])]
    #[case("Requiem", vec![])]
    fn request_tags(#[case] title: &str, #[case] expected: Vec<Level>) {
        let release = Release::new("Folder - Clean [2013] [FLAC]", title);
        assert_eq!(levels(&no_request_tag_in_title(&release, None)), expected);
    }

    #[test]
    fn request_tag_in_folder_name_is_reported() {
        let release = Release::new("Foo - Bar [REQ]", "Bar");
        let result = no_request_tag_in_title(&release, None);
        assert_eq!(levels(&result), vec![Level::Error]);
        assert!(result.issues[0].message.contains("folder name"));
    }

    #[rstest]
    #[case("Goldberg Variations", "Goldberg Variations", vec![])]
    #[case("Goldberg Variations", "Bach: Goldberg Variations [Remastered]", vec![])]
    #[case("Goldberg Variation", "Goldberg Variations", vec![])]
    #[case("Symphony No. 5", "Symphony No. 5 in C minor, Op. 67", vec![])]
    #[case("Symphony No. 5 in C", "Symphony No. 5 in C minor", vec![Level::Warning])]
    #[case("Mass in B minor", "Mass in C minor", vec![Level::Error])]
    #[case("Goldberg Variations BWV", "Goldberg Variations, BWV 988", vec![Level::Warning])]
    #[case("The Art of Fugue", "Goldberg Variations", vec![Level::Error])]
    fn album_titles(#[case] actual: &str, #[case] expected: &str, #[case] levels_expected: Vec<Level>) {
        let actual = Release::new("root", actual);
        let reference = Release::new("root", expected);
        let result = album_title_accuracy(&actual, Some(&reference));
        assert_eq!(levels(&result), levels_expected, "{:?}", result.issues);
    }

    #[test]
    fn album_title_needs_reference() {
        let actual = Release::new("root", "Completely Different");
        assert!(album_title_accuracy(&actual, None).passed());
        let blank = Release::new("root", "");
        assert!(album_title_accuracy(&actual, Some(&blank)).passed());
    }

    fn numbered(positions: &[(u32, u32)]) -> Release {
        positions.iter().fold(Release::new("root", "t"), |release, &(disc, number)| {
            release.with_track(Track::new(disc, number, "T", format!("{number:02} T.flac")))
        })
    }

    #[test]
    fn disc_must_start_at_one() {
        let result = multi_disc_track_numbering(&numbered(&[(1, 1), (1, 2), (2, 3), (2, 4)]), None);
        assert_eq!(levels(&result), vec![Level::Error]);
        assert_eq!(result.issues[0].message, "disc 2 must start at 1 (first track is 3)");
    }

    #[test]
    fn missing_disc_is_an_error() {
        let result = multi_disc_track_numbering(&numbered(&[(1, 1), (1, 2), (3, 1)]), None);
        assert_eq!(levels(&result), vec![Level::Error]);
        assert_eq!(result.issues[0].message, "missing disc 2 (discs run to 3)");
    }

    #[test]
    fn gap_within_disc_is_a_warning() {
        let result = multi_disc_track_numbering(&numbered(&[(1, 1), (1, 3), (2, 1)]), None);
        assert_eq!(levels(&result), vec![Level::Warning]);
    }

    #[test]
    fn single_disc_is_exempt() {
        assert!(multi_disc_track_numbering(&numbered(&[(1, 2), (1, 5)]), None).passed());
    }

    #[test]
    fn duplicate_positions_are_errors() {
        let result = multi_disc_track_numbering(&numbered(&[(1, 1), (1, 1), (1, 2)]), None);
        assert_eq!(levels(&result), vec![Level::Error]);
        assert_eq!(result.issues[0].position, Some(Position::new(1, 1)));

        let result =
            multi_disc_track_numbering(&numbered(&[(1, 1), (1, 2), (2, 1), (2, 2), (2, 2)]), None);
        assert_eq!(levels(&result), vec![Level::Error]);
        assert_eq!(result.issues[0].position, Some(Position::new(2, 2)));
    }

    #[test]
    fn album_title_and_year_are_required() {
        let result = required_album_tags(&Release::new("root", " "), None);
        assert_eq!(levels(&result), vec![Level::Error, Level::Warning]);
        assert!(required_album_tags(&release("root"), None).passed());
    }

    fn orchestral_track(number: u32, ensemble: &str) -> Track {
        Track::new(1, number, "Allegro", format!("{number:02} Allegro.flac"))
            .with_artist(Artist::composer("Ludwig van Beethoven"))
            .with_artist(Artist::ensemble(ensemble))
    }

    #[test]
    fn album_artist_must_be_credited() {
        let release = release("root")
            .with_album_artists(["Berliner Philharmoniker", "Various Artists"])
            .with_track(orchestral_track(1, "berliner  philharmoniker"));
        assert!(album_artist_tag(&release, None).passed());

        let release = release.with_album_artists(["Wiener Philharmoniker"]);
        let result = album_artist_tag(&release, None);
        assert_eq!(levels(&result), vec![Level::Error]);
        assert!(result.issues[0].message.contains("must appear in at least one track's ARTISTs"));
    }

    #[test]
    fn album_artist_suggests_dominant_performer() {
        let release = release("root")
            .with_track(orchestral_track(1, "Berliner Philharmoniker"))
            .with_track(orchestral_track(2, "Berliner Philharmoniker"))
            .with_track(orchestral_track(3, "Wiener Philharmoniker"));
        let result = album_artist_tag(&release, None);
        assert_eq!(levels(&result), vec![Level::Info]);
        assert!(result.issues[0].message.contains("Berliner Philharmoniker"));
    }

    #[test]
    fn no_suggestion_without_dominant_performer() {
        let release = release("root")
            .with_track(orchestral_track(1, "Berliner Philharmoniker"))
            .with_track(orchestral_track(2, "Wiener Philharmoniker"));
        assert!(album_artist_tag(&release, None).passed());
    }

    #[test]
    fn single_track_suggestion_needs_ensemble_without_soloist() {
        let with_ensemble = release("root").with_track(orchestral_track(1, "RIAS Kammerchor"));
        assert_eq!(levels(&album_artist_tag(&with_ensemble, None)), vec![Level::Info]);

        let with_soloist = release("root").with_track(
            orchestral_track(1, "RIAS Kammerchor").with_artist(Artist::soloist("Glenn Gould")),
        );
        assert!(album_artist_tag(&with_soloist, None).passed());
    }

    #[test]
    fn many_composers_get_generic_notice() {
        let release = ["Bach", "Handel", "Vivaldi", "Telemann"]
            .iter()
            .enumerate()
            .fold(release("root"), |release, (index, composer)| {
                release.with_track(
                    Track::new(1, index as u32 + 1, "Aria", "x.flac")
                        .with_artist(Artist::composer(*composer))
                        .with_artist(Artist::soloist(format!("Singer {index}"))),
                )
            });
        let result = album_artist_tag(&release, None);
        assert_eq!(levels(&result), vec![Level::Info]);
        assert!(result.issues[0].message.starts_with("4 composers"));
    }

    #[test]
    fn various_artists_title_is_noted() {
        let release = Release::new("root", "Various Artists - Baroque Hits");
        assert_eq!(levels(&album_artist_tag(&release, None)), vec![Level::Info]);
    }
}
