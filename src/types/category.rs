use std::{fmt, str::FromStr};

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Functional category of a public space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FunctionalType {
    Multifunctional,
    Event,
    Educational,
    Sports,
}

impl FunctionalType {
    pub fn to_str(&self) -> &'static str {
        match self {
            FunctionalType::Multifunctional => "Multifunctional",
            FunctionalType::Event => "Event",
            FunctionalType::Educational => "Educational",
            FunctionalType::Sports => "Sports",
        }
    }

    /// Label used for this category in the source site layers.
    pub fn source_label(&self) -> &'static str {
        match self {
            FunctionalType::Multifunctional => "Многофункциональное",
            FunctionalType::Event => "Событийное",
            FunctionalType::Educational => "Учебное",
            FunctionalType::Sports => "Спортивное",
        }
    }

    /// All four categories, in report order.
    pub fn all() -> [FunctionalType; 4] {
        [
            FunctionalType::Multifunctional,
            FunctionalType::Event,
            FunctionalType::Educational,
            FunctionalType::Sports,
        ]
    }
}

impl fmt::Display for FunctionalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.to_str()) }
}

impl FromStr for FunctionalType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Ok(match s {
            "Multifunctional" | "multifunctional" | "Многофункциональное" => FunctionalType::Multifunctional,
            "Event" | "event" | "Событийное" => FunctionalType::Event,
            "Educational" | "educational" | "Учебное" => FunctionalType::Educational,
            "Sports" | "sports" | "Спортивное" => FunctionalType::Sports,
            _ => bail!("[types] Unknown functional type: {s:?}"),
        })
    }
}

/// Size bucket of a site, controlling which travel budgets count toward accessibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaType {
    Small,
    Medium,
    Large,
}

impl AreaType {
    pub fn to_str(&self) -> &'static str {
        match self {
            AreaType::Small => "small",
            AreaType::Medium => "medium",
            AreaType::Large => "large",
        }
    }
}

impl fmt::Display for AreaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.to_str()) }
}

impl FromStr for AreaType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "small" => AreaType::Small,
            "medium" => AreaType::Medium,
            "large" => AreaType::Large,
            other => bail!("[types] Unknown area type: {other:?}"),
        })
    }
}

/// Whether a site already operates as a public space or is only a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExistenceState {
    Existing,
    #[default]
    Potential,
}

impl ExistenceState {
    pub fn to_str(&self) -> &'static str {
        match self {
            ExistenceState::Existing => "existing",
            ExistenceState::Potential => "potential",
        }
    }

    #[inline] pub fn is_existing(&self) -> bool { matches!(self, ExistenceState::Existing) }
}

impl fmt::Display for ExistenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.to_str()) }
}

impl FromStr for ExistenceState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Ok(match s {
            "existing" | "Existing" | "существующее" => ExistenceState::Existing,
            "potential" | "Potential" | "потенциальное" => ExistenceState::Potential,
            _ => bail!("[types] Unknown existence state: {s:?}"),
        })
    }
}
