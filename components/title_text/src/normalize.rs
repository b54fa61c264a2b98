use music_primitives::Key;
use once_cell::sync::Lazy;
use regex::Regex;

/// Titles this close (edit distance of normalized forms) are the same title
pub const MATCH_THRESHOLD: usize = 3;
/// Up to this distance the titles differ only in details
pub const MINOR_DIFFERENCE_THRESHOLD: usize = 10;

static BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]*\]").expect("bracket pattern is valid"));

static COMPOSER_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\p{L}[\p{L}.'’]*\s*(?:-|:|–)\s+").expect("composer prefix pattern is valid")
});

static CORE_WORK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\p{L}+ no\.? ?\d+").expect("core work pattern is valid"));

static KEY_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b[Ii]n ([A-Ga-g])(#|♯|♭|(?i:-flat|-sharp| flat| sharp)|b)?(?: ((?i:major|minor)))?(?:[^\p{L}]|$)",
    )
        .expect("key phrase pattern is valid")
});

/// Canonical form for fuzzy comparison.
///
/// Lower-cases, drops `[...]` segments, drops a leading one-word
/// "Composer -" or "Composer:" prefix and collapses whitespace.
///
/// ```
/// # use title_text::normalize_title;
/// assert_eq!(
///     normalize_title("Bach: Goldberg  Variations [Remastered]"),
///     "goldberg variations"
/// );
/// ```
pub fn normalize_title(title: &str) -> String {
    let lowered = title.to_lowercase();
    let unbracketed = BRACKETED.replace_all(&lowered, " ");
    let without_composer = COMPOSER_PREFIX.replace(unbracketed.trim(), "");
    without_composer.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Levenshtein distance between the normalized titles
pub fn title_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(&normalize_title(a), &normalize_title(b))
}

pub fn titles_match(a: &str, b: &str) -> bool {
    title_distance(a, b) <= MATCH_THRESHOLD
}

/// Leading "Word No. N" of a normalized title, e.g. "symphony no. 5"
pub fn core_work(normalized: &str) -> Option<&str> {
    CORE_WORK.find(normalized).map(|m| m.as_str())
}

/// Key named by an "in <key> [major|minor]" phrase.
///
/// A lower-case letter only names a key when an accidental or a mode
/// follows it, so "in a Garden" is not A.
pub fn key_phrase(title: &str) -> Option<Key> {
    KEY_PHRASE.captures_iter(title).find_map(|captures| {
        let letter = captures.get(1)?.as_str();
        let accidental = captures.get(2).map_or("", |m| m.as_str());
        let mode = captures.get(3).map(|m| m.as_str());
        if letter.chars().all(char::is_lowercase) && accidental.is_empty() && mode.is_none() {
            return None;
        }
        let spelled = match mode {
            Some(mode) => format!("{letter}{accidental} {mode}"),
            None => format!("{letter}{accidental}"),
        };
        Key::parse(&spelled.to_lowercase()).ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use music_primitives::{Mode, PitchClass};
    use rstest::rstest;

    #[rstest]
    #[case("Goldberg Variations", "goldberg variations")]
    #[case("  Goldberg   Variations ", "goldberg variations")]
    #[case("Goldberg Variations [Remastered 2015]", "goldberg variations")]
    #[case("Bach - Goldberg Variations", "goldberg variations")]
    #[case("Symphony No. 5: Allegro", "symphony no. 5: allegro")]
    fn normalization(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(normalize_title(title), expected);
    }

    #[test]
    fn fuzzy_matching_uses_threshold() {
        assert!(titles_match("Goldberg Variations", "Goldberg Variation"));
        assert!(!titles_match("Goldberg Variations", "Art of Fugue"));
        assert_eq!(title_distance("Mass", "[Live] mass"), 0);
    }

    #[test]
    fn core_work_prefix() {
        assert_eq!(core_work("symphony no. 5 in c minor"), Some("symphony no. 5"));
        assert_eq!(core_work("symphony no 9"), Some("symphony no 9"));
        assert_eq!(core_work("goldberg variations"), None);
    }

    #[rstest]
    #[case("Symphony No. 5 in C minor", PitchClass::C, Some(Mode::Minor))]
    #[case("Sonata in E-flat major, Op. 81a", PitchClass::DSharp, Some(Mode::Major))]
    #[case("Prelude in F#", PitchClass::FSharp, None)]
    #[case("Mass in B minor", PitchClass::B, Some(Mode::Minor))]
    #[case("Concerto in D", PitchClass::D, None)]
    fn key_phrases(#[case] title: &str, #[case] pitch: PitchClass, #[case] mode: Option<Mode>) {
        let key = key_phrase(title).unwrap();
        assert_eq!(key.pitch(), pitch);
        assert_eq!(key.mode(), mode);
    }

    #[test]
    fn words_starting_with_key_letters_are_not_keys() {
        assert_eq!(key_phrase("Variations in Bach's Style"), None);
        assert_eq!(key_phrase("Goldberg Variations"), None);
    }

    #[test]
    fn article_a_is_not_a_key() {
        assert_eq!(key_phrase("Dances in a Garden"), None);
        assert_eq!(key_phrase("Dances in a Garden in D major"), Key::parse("D major").ok());
        assert_eq!(key_phrase("Sonata in a minor"), Key::parse("A minor").ok());
        assert_eq!(key_phrase("Sonata in A"), Key::parse("A").ok());
    }
}
