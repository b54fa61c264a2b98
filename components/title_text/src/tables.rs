use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

static DEFAULT_TABLES: Lazy<TextTables> = Lazy::new(TextTables::default);

/// Word lists the text predicates consult.
///
/// Kept as data so a table file can replace the built-in lists:
///
/// ```
/// # use title_text::TextTables;
/// let tables = TextTables::global();
/// assert!(tables.is_catalog("BWV"));
/// assert!(tables.is_small_word("of"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextTables {
    /// Always accepted as written
    pub acronyms: BTreeSet<String>,
    /// Catalog abbreviations, matched case-sensitively
    pub catalog_tokens: BTreeSet<String>,
    /// Lower case when not first or last in a segment
    pub small_words: BTreeSet<String>,
    /// Words after which a lower-case word is accepted ("con brio")
    pub continuation_words: BTreeSet<String>,
    /// Accepted in lower case anywhere ("D minor", "E-flat")
    pub mode_words: BTreeSet<String>,
    /// Name particles skipped when looking for a last name
    pub particles: BTreeSet<String>,
    /// Longest all-caps word accepted as an abbreviation (RIAS, HMC)
    pub max_bare_acronym_len: usize,
}

fn set(words: &[&str]) -> BTreeSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for TextTables {
    fn default() -> Self {
        Self {
            acronyms: set(&[
                "LSO", "BBC", "CD", "SACD", "LP", "EP", "DVD", "BD", "UHD", "WEB", "USA",
            ]),
            catalog_tokens: set(&[
                "Op.", "No.", "Hob.", "Wq.", "K.", "D.", "S.", "L.", "P.", "BWV", "KV", "RV",
                "HWV", "TWV",
            ]),
            small_words: set(&[
                "a", "an", "the", "and", "but", "or", "nor", "as", "at", "by", "for", "so",
                "yet", "in", "of", "on", "per", "to", "up", "via", "vs", "vs.", "von", "van",
                "und", "de", "di", "da", "del", "der", "la", "le", "les", "du", "des", "el", "y",
                "con", "non", "troppo",
            ]),
            continuation_words: set(&[
                "con", "per", "da", "di", "del", "de", "der", "von", "van", "y",
            ]),
            mode_words: set(&["major", "minor", "flat", "sharp"]),
            particles: set(&[
                "van", "von", "de", "der", "den", "da", "di", "del", "della", "du", "des", "le",
                "la", "ten", "ter", "zu", "y",
            ]),
            max_bare_acronym_len: 4,
        }
    }
}

impl TextTables {
    /// The built-in tables
    pub fn global() -> &'static TextTables {
        &DEFAULT_TABLES
    }

    /// Acronyms: the fixed list, all-caps words containing `&` ("R&B"),
    /// dotted all-caps words ("U.S.A.") and short all-caps words ("RIAS").
    pub fn is_acronym(&self, word: &str) -> bool {
        if self.acronyms.contains(word) {
            return true;
        }
        if !is_all_upper(word) {
            return false;
        }
        if word.contains('&') {
            return true;
        }
        if word.contains('.') {
            return word.chars().filter(|c| *c != '.').count() > 1;
        }
        let letters = word.chars().count();
        word.chars().all(char::is_alphabetic)
            && (2..=self.max_bare_acronym_len).contains(&letters)
    }

    pub fn is_catalog(&self, word: &str) -> bool {
        self.catalog_tokens.contains(word)
    }

    pub fn is_small_word(&self, word: &str) -> bool {
        self.small_words.contains(&word.to_lowercase())
    }

    pub fn is_continuation(&self, word: &str) -> bool {
        self.continuation_words.contains(&word.to_lowercase())
    }

    pub fn is_mode_word(&self, word: &str) -> bool {
        self.mode_words.contains(&word.to_lowercase())
    }

    pub fn is_particle(&self, word: &str) -> bool {
        self.particles.contains(&word.to_lowercase())
    }
}

/// Upper-case roman numeral letters only ("IV", "XII")
pub fn is_roman_numeral(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| "IVXLCDM".contains(c))
}

/// A bare key letter such as "D", "F#" or "Bb"
pub fn is_key_letter(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some('A'..='G') => {}
        _ => return false,
    }
    matches!(
        (chars.next(), chars.next()),
        (None, None) | (Some('#' | 'b' | '♯' | '♭'), None)
    )
}

/// Has at least one letter and no lower-case letters
pub fn is_all_upper(word: &str) -> bool {
    let mut letters = word.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(|c| c.is_uppercase())
}
