//! Conventions specific to classical releases: composer credits and
//! edition details.

use crate::host::rule_host;
use release_model::{normalize_name, Level, Release, RuleResult, Track};
use title_text::{composer_identifiable, composer_last_name, Identifiability};

rule_host! {
    /// Label, catalog number and release year identify the edition
    #[rule(CATALOG_INFORMATION, id = "classical.catalog_comment", name = "CatalogInformation", level = Info)]
    fn catalog_information(actual: &Release, _reference: Option<&Release>) -> RuleResult {
        let missing = match &actual.edition {
            None => vec!["label", "catalog number", "release year"],
            Some(edition) => edition.missing_fields(),
        };
        if missing.is_empty() {
            return RuleResult::pass(CATALOG_INFORMATION);
        }
        RuleResult::new(
            CATALOG_INFORMATION,
            vec![CATALOG_INFORMATION.release_issue(
                Level::Info,
                format!("edition is missing {}; add them to identify the release", missing.join(", ")),
            )],
        )
    }

    /// Every track credits a composer by an identifiable name.
    ///
    /// "Bach" alone is an error; names that do not read as given name (or
    /// initial) followed by last name are warnings.
    #[rule(COMPOSER_TAG, id = "classical.composer", name = "ComposerTag", level = Error)]
    fn composer_tag(
        track: &Track,
        _reference_track: Option<&Track>,
        _release: &Release,
        _reference: Option<&Release>,
    ) -> RuleResult {
        let position = track.position();
        let mut composers = track.composers().peekable();
        if composers.peek().is_none() {
            return RuleResult::new(
                COMPOSER_TAG,
                vec![COMPOSER_TAG.track_issue(Level::Error, position, "track has no composer")],
            );
        }

        let issues = composers
            .filter_map(|composer| match composer_identifiable(&composer.name) {
                Identifiability::Identifiable => None,
                Identifiability::Ambiguous => Some(COMPOSER_TAG.track_issue(
                    Level::Error,
                    position,
                    format!("composer '{}' is a single word; use the full name", composer.name),
                )),
                Identifiability::Unconventional => Some(COMPOSER_TAG.track_issue(
                    Level::Warning,
                    position,
                    format!(
                        "composer '{}' does not read as first name followed by last name",
                        composer.name
                    ),
                )),
            })
            .collect();
        RuleResult::new(COMPOSER_TAG, issues)
    }

    /// Track titles do not start with the composer ("Bach: Goldberg Variations")
    #[rule(COMPOSER_IN_TRACK_TITLE, id = "classical.track_title", name = "ComposerInTrackTitle", level = Error)]
    fn composer_in_track_title(
        track: &Track,
        _reference_track: Option<&Track>,
        _release: &Release,
        _reference: Option<&Release>,
    ) -> RuleResult {
        let title = track.title.trim();
        let lowered = title.to_lowercase();

        let found = track.composers().find_map(|composer| {
            let full = normalize_name(&composer.name);
            let last = composer_last_name(&composer.name).to_lowercase();
            [full, last]
                .into_iter()
                .filter(|name| !name.is_empty())
                .find(|name| starts_with_credit(&lowered, name))
        });

        match found {
            None => RuleResult::pass(COMPOSER_IN_TRACK_TITLE),
            Some(name) => RuleResult::new(
                COMPOSER_IN_TRACK_TITLE,
                vec![COMPOSER_IN_TRACK_TITLE.track_issue(
                    Level::Error,
                    track.position(),
                    format!("track title '{title}' starts with composer '{name}'; the composer belongs in the COMPOSER tag"),
                )],
            ),
        }
    }
}

// "bach: ..." or "bach - ..."
fn starts_with_credit(title: &str, name: &str) -> bool {
    title.strip_prefix(name).is_some_and(|rest| {
        rest.starts_with(':') || rest.starts_with(" -") || rest.starts_with(" –")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use release_model::{Artist, Edition};

    fn single(track: Track) -> Release {
        Release::new("root", "t").with_track(track)
    }

    fn composed_by(name: &str) -> Track {
        Track::new(1, 1, "Aria", "01 Aria.flac").with_artist(Artist::composer(name))
    }

    #[test]
    fn catalog_information_lists_missing_fields() {
        let bare = Release::new("root", "t");
        let result = catalog_information(&bare, None);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].level, Level::Info);
        assert!(result.issues[0].message.contains("label, catalog number, release year"));

        let partial = bare.clone().with_edition(Edition {
            label: Some("test label".into()),
            ..Edition::default()
        });
        let result = catalog_information(&partial, None);
        assert!(result.issues[0].message.contains("catalog number, release year"));

        let complete = bare.with_edition(Edition::new("test label", "HMC902170", 2013));
        assert!(catalog_information(&complete, None).passed());
    }

    #[test]
    fn composer_is_required() {
        let release = single(Track::new(1, 1, "Aria", "01 Aria.flac").with_artist(Artist::soloist("Glenn Gould")));
        let result = composer_tag(&release.tracks[0], None, &release, None);
        assert_matches!(result.issues.as_slice(), [issue] if issue.level == Level::Error);
    }

    #[test]
    fn composer_names_graded() {
        for (name, expected) in [
            ("Johann Sebastian Bach", None),
            ("J.S. Bach", None),
            ("Mendelssohn", Some(Level::Error)),
            ("bach johann", Some(Level::Warning)),
        ] {
            let release = single(composed_by(name));
            let result = composer_tag(&release.tracks[0], None, &release, None);
            assert_eq!(result.issues.first().map(|i| i.level), expected, "{name}");
        }
    }

    #[test]
    fn composer_prefix_in_title() {
        let track = Track::new(1, 1, "Bach: Goldberg Variations", "01.flac")
            .with_artist(Artist::composer("Johann Sebastian Bach"));
        let release = single(track);
        let result = composer_in_track_title(&release.tracks[0], None, &release, None);
        assert_eq!(result.issues.len(), 1);
        assert!(result.issues[0].message.contains("'bach'"));

        let track = Track::new(1, 1, "Johann Sebastian Bach - Aria", "01.flac")
            .with_artist(Artist::composer("Johann Sebastian Bach"));
        let release = single(track);
        assert!(!composer_in_track_title(&release.tracks[0], None, &release, None).passed());
    }

    #[test]
    fn composer_name_inside_title_is_fine() {
        let track = Track::new(1, 1, "Bachianas Brasileiras: Aria", "01.flac")
            .with_artist(Artist::composer("Johann Sebastian Bach"));
        let release = single(track);
        assert!(composer_in_track_title(&release.tracks[0], None, &release, None).passed());
    }
}
