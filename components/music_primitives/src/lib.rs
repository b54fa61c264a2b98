mod key;

pub use key::{Key, KeyError, Mode, PitchClass};
