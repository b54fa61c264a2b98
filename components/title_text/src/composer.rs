use crate::tables::TextTables;
use once_cell::sync::Lazy;
use regex::Regex;

static PARENTHESIZED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^)]*\)").expect("parenthesis pattern is valid"));
static INITIAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\p{Lu}\.").expect("initial pattern is valid"));
static NAME_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\p{Lu}[\p{L}'’-]*$").expect("name word pattern is valid")
});
static LAST_NAME_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\p{Ll}{1,3}['’])?\p{Lu}[\p{L}'’-]*$").expect("last name pattern is valid")
});
static INITIAL_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\p{Lu}\.$").expect("initial word pattern is valid"));

/// How well a composer credit identifies one person
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identifiability {
    /// "Johann Sebastian Bach", "J.S. Bach", "Bach, Johann Sebastian"
    Identifiable,
    /// A single word such as "Bach"
    Ambiguous,
    /// Not "first name or initial, then last name"
    Unconventional,
}

/// Last name of a composer credit.
///
/// ```
/// # use title_text::composer_last_name;
/// assert_eq!(composer_last_name("Ludwig van Beethoven"), "Beethoven");
/// assert_eq!(composer_last_name("Bach, Johann Sebastian"), "Bach");
/// assert_eq!(composer_last_name("J.S. Bach"), "Bach");
/// ```
pub fn composer_last_name(name: &str) -> String {
    let tables = TextTables::global();
    let surname_part = match name.split_once(',') {
        Some((before, _)) => before,
        None => name,
    };
    let cleaned = PARENTHESIZED.replace_all(surname_part, " ");
    let cleaned = INITIAL.replace_all(&cleaned, " ");

    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    tokens
        .iter()
        .rev()
        .find(|token| !tables.is_particle(token))
        .or(tokens.last())
        .map(|token| token.to_string())
        .unwrap_or_default()
}

pub fn composer_identifiable(name: &str) -> Identifiability {
    let name = name.trim();
    if !name.contains(' ') && !name.contains('.') {
        return Identifiability::Ambiguous;
    }

    // "Bach, Johann Sebastian" reads as "Johann Sebastian Bach"
    let ordered = match name.split_once(',') {
        Some((last, first)) => format!("{} {}", first.trim(), last.trim()),
        None => name.to_string(),
    };

    let tokens: Vec<&str> = ordered
        .split_whitespace()
        .flat_map(|word| word.split_inclusive('.'))
        .filter(|part| !part.is_empty())
        .collect();

    match tokens.as_slice() {
        [first, middle @ .., last] if is_given_name(first) && is_last_name(last) => {
            if middle.iter().all(|m| is_given_name(m) || TextTables::global().is_particle(m)) {
                Identifiability::Identifiable
            } else {
                Identifiability::Unconventional
            }
        }
        _ => Identifiability::Unconventional,
    }
}

fn is_given_name(token: &str) -> bool {
    INITIAL_WORD.is_match(token) || NAME_WORD.is_match(token)
}

fn is_last_name(token: &str) -> bool {
    !INITIAL_WORD.is_match(token) && LAST_NAME_WORD.is_match(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Johann Sebastian Bach", "Bach")]
    #[case("Felix Mendelssohn", "Mendelssohn")]
    #[case("C.P.E. Bach", "Bach")]
    #[case("Ludwig van Beethoven", "Beethoven")]
    #[case("Tomás Luis (de) Victoria", "Victoria")]
    #[case("Vivaldi", "Vivaldi")]
    #[case("", "")]
    fn last_names(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(composer_last_name(name), expected);
    }

    #[rstest]
    #[case("Johann Sebastian Bach", Identifiability::Identifiable)]
    #[case("J.S. Bach", Identifiability::Identifiable)]
    #[case("J. S. Bach", Identifiability::Identifiable)]
    #[case("Bach, Johann Sebastian", Identifiability::Identifiable)]
    #[case("Ludwig van Beethoven", Identifiability::Identifiable)]
    #[case("Nikolai Rimsky-Korsakov", Identifiability::Identifiable)]
    #[case("Vincent d'Indy", Identifiability::Identifiable)]
    #[case("Mendelssohn", Identifiability::Ambiguous)]
    #[case("bach", Identifiability::Ambiguous)]
    #[case("bach johann", Identifiability::Unconventional)]
    #[case("Bach.", Identifiability::Unconventional)]
    fn identifiability(#[case] name: &str, #[case] expected: Identifiability) {
        assert_eq!(composer_identifiable(name), expected);
    }
}
