//! Text helpers shared by the release rules: Title Case classification,
//! title normalization and fuzzy matching, file name parsing and composer
//! name heuristics.

pub mod capitalization;
mod composer;
mod filename;
mod normalize;
mod tables;

pub use capitalization::CaseError;
pub use composer::{composer_identifiable, composer_last_name, Identifiability};
pub use filename::{
    has_track_number_prefix, parse_track_filename, prefix_before_first_digit, TrackFilename,
};
pub use normalize::{
    core_work, key_phrase, normalize_title, title_distance, titles_match, MATCH_THRESHOLD,
    MINOR_DIFFERENCE_THRESHOLD,
};
pub use tables::{is_key_letter, is_roman_numeral, TextTables};
