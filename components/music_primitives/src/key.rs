use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Invalid key notation: {0}")]
    InvalidNotation(String),

    #[error("Unknown pitch class: {0}")]
    UnknownPitchClass(String),
}

/// Musical pitch class (0-11, where 0 = C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PitchClass {
    C = 0,
    CSharp = 1, // C# / Db
    D = 2,
    DSharp = 3, // D# / Eb
    E = 4,
    F = 5,
    FSharp = 6, // F# / Gb
    G = 7,
    GSharp = 8, // G# / Ab
    A = 9,
    ASharp = 10, // A# / Bb
    B = 11,
}

impl FromStr for PitchClass {
    type Err = KeyError;

    /// Parse a note letter with an optional accidental.
    ///
    /// Accepts the spellings found in classical titles: `Eb`, `E♭`,
    /// `E-flat`, `E flat`, `F#`, `F♯`, `F-sharp`. The letter may be lower case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let letter = chars
            .next()
            .ok_or_else(|| KeyError::UnknownPitchClass(s.to_string()))?;

        let natural: u8 = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(KeyError::UnknownPitchClass(s.to_string())),
        };

        let accidental = chars
            .as_str()
            .trim_start_matches(|c: char| c == '-' || c == ' ')
            .to_lowercase();

        let pitch = match accidental.as_str() {
            "" | "natural" => natural,
            "#" | "♯" | "sharp" => (natural + 1) % 12,
            "b" | "♭" | "flat" => (natural + 11) % 12,
            _ => return Err(KeyError::UnknownPitchClass(s.to_string())),
        };

        Ok(PitchClass::from_number(pitch))
    }
}

impl PitchClass {
    fn from_number(n: u8) -> Self {
        match n % 12 {
            0 => PitchClass::C,
            1 => PitchClass::CSharp,
            2 => PitchClass::D,
            3 => PitchClass::DSharp,
            4 => PitchClass::E,
            5 => PitchClass::F,
            6 => PitchClass::FSharp,
            7 => PitchClass::G,
            8 => PitchClass::GSharp,
            9 => PitchClass::A,
            10 => PitchClass::ASharp,
            _ => PitchClass::B,
        }
    }

    /// Get as flat notation (e.g., "Db")
    pub fn as_flat(&self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::CSharp => "Db",
            PitchClass::D => "D",
            PitchClass::DSharp => "Eb",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "Gb",
            PitchClass::G => "G",
            PitchClass::GSharp => "Ab",
            PitchClass::A => "A",
            PitchClass::ASharp => "Bb",
            PitchClass::B => "B",
        }
    }
}

/// Musical mode (Major or Minor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Major,
    Minor,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Major => "major",
            Mode::Minor => "minor",
        }
    }
}

impl FromStr for Mode {
    type Err = KeyError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "major" | "maj" | "dur" => Ok(Mode::Major),
            "minor" | "min" | "moll" => Ok(Mode::Minor),
            _ => Err(Self::Err::InvalidNotation(format!("Unknown mode: {}", s))),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of a classical work as written in its title.
///
/// The mode is optional because titles often say "in D" and leave the mode
/// implied. Two keys are equal when pitch class and mode agree, so
/// "E-flat major" and "Eb major" compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    pitch: PitchClass,
    mode: Option<Mode>,
}

impl Key {
    pub fn new(pitch: PitchClass, mode: Option<Mode>) -> Self {
        Self { pitch, mode }
    }

    /// Parse a key such as "E-flat major", "F# minor", "Bb" or "c minor"
    ///
    /// # Examples
    /// ```
    /// # use music_primitives::{Key, KeyError, Mode, PitchClass};
    /// let key = Key::parse("E-flat major")?;
    /// assert_eq!(key.pitch(), PitchClass::DSharp);
    /// assert_eq!(key.mode(), Some(Mode::Major));
    ///
    /// let key = Key::parse("D")?;
    /// assert_eq!(key.mode(), None);
    /// # Ok::<(), KeyError>(())
    /// ```
    pub fn parse(s: &str) -> Result<Self, KeyError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(KeyError::InvalidNotation(s.to_string()));
        }

        // The mode, when present, is always the last word
        if let Some((pitch, mode)) = s.rsplit_once(' ') {
            if let Ok(mode) = Mode::from_str(mode) {
                let pitch = PitchClass::from_str(pitch)?;
                return Ok(Self::new(pitch, Some(mode)));
            }
        }

        let pitch = PitchClass::from_str(s).map_err(|_| KeyError::InvalidNotation(s.to_string()))?;
        Ok(Self::new(pitch, None))
    }

    pub fn pitch(&self) -> PitchClass {
        self.pitch
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn has_mode(&self) -> bool {
        self.mode.is_some()
    }

    /// Same pitch class, ignoring the mode
    pub fn same_tonic(&self, other: &Key) -> bool {
        self.pitch == other.pitch
    }
}

impl FromStr for Key {
    type Err = KeyError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Key::parse(s)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            Some(mode) => write!(f, "{} {}", self.pitch.as_flat(), mode),
            None => write!(f, "{}", self.pitch.as_flat()),
        }
    }
}

// Serialize as title notation
impl Serialize for Key {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Key::parse(&s).map_err(serde::de::Error::custom)
    }
}
