use serde::{Deserialize, Serialize};
use std::fmt;

/// What an artist contributed to a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtistRole {
    Composer,
    Soloist,
    Ensemble,
    Conductor,
    Arranger,
    Other,
}

impl ArtistRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtistRole::Composer => "composer",
            ArtistRole::Soloist => "soloist",
            ArtistRole::Ensemble => "ensemble",
            ArtistRole::Conductor => "conductor",
            ArtistRole::Arranger => "arranger",
            ArtistRole::Other => "other",
        }
    }

    /// Everyone except composers and arrangers performs
    pub fn is_performer(&self) -> bool {
        !matches!(self, ArtistRole::Composer | ArtistRole::Arranger)
    }
}

impl fmt::Display for ArtistRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An artist credited on a track. Value object: equal by name and role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
    pub role: ArtistRole,
}

impl Artist {
    pub fn new(name: impl Into<String>, role: ArtistRole) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }

    pub fn composer(name: impl Into<String>) -> Self {
        Self::new(name, ArtistRole::Composer)
    }

    pub fn soloist(name: impl Into<String>) -> Self {
        Self::new(name, ArtistRole::Soloist)
    }

    pub fn ensemble(name: impl Into<String>) -> Self {
        Self::new(name, ArtistRole::Ensemble)
    }

    pub fn conductor(name: impl Into<String>) -> Self {
        Self::new(name, ArtistRole::Conductor)
    }

    pub fn arranger(name: impl Into<String>) -> Self {
        Self::new(name, ArtistRole::Arranger)
    }

    pub fn is_composer(&self) -> bool {
        self.role == ArtistRole::Composer
    }

    pub fn is_performer(&self) -> bool {
        self.role.is_performer()
    }

    /// Lower-cased name with whitespace runs collapsed, for comparisons
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

impl fmt::Display for Artist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.role)
    }
}

/// Case-insensitive, whitespace-normalised form of a name
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
