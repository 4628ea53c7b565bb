use std::fmt;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// One of the three travel-time budgets, in minutes.
///
/// Ordered by duration, so `TravelTime::Five < TravelTime::Twenty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum TravelTime {
    Five,
    Ten,
    Twenty,
}

impl TravelTime {
    /// Budget length in minutes.
    #[inline]
    pub fn minutes(&self) -> u32 {
        match self {
            TravelTime::Five => 5,
            TravelTime::Ten => 10,
            TravelTime::Twenty => 20,
        }
    }

    pub fn from_minutes(minutes: u32) -> Result<Self> {
        Ok(match minutes {
            5 => TravelTime::Five,
            10 => TravelTime::Ten,
            20 => TravelTime::Twenty,
            _ => bail!("[types] Unsupported travel time budget: {minutes} minutes"),
        })
    }

    /// All budgets, shortest first.
    pub fn all() -> [TravelTime; 3] { [TravelTime::Five, TravelTime::Ten, TravelTime::Twenty] }
}

impl fmt::Display for TravelTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{} min", self.minutes()) }
}

impl From<TravelTime> for u32 {
    fn from(time: TravelTime) -> Self { time.minutes() }
}

impl TryFrom<u32> for TravelTime {
    type Error = anyhow::Error;

    fn try_from(minutes: u32) -> Result<Self> { TravelTime::from_minutes(minutes) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_minutes() {
        assert!(TravelTime::Five < TravelTime::Ten);
        assert!(TravelTime::Ten < TravelTime::Twenty);
        assert_eq!(TravelTime::all().map(|t| t.minutes()), [5, 10, 20]);
    }

    #[test]
    fn from_minutes_rejects_other_budgets() {
        assert_eq!(TravelTime::from_minutes(10).unwrap(), TravelTime::Ten);
        assert!(TravelTime::from_minutes(15).is_err());
    }

    #[test]
    fn serializes_as_minutes() {
        assert_eq!(serde_json::to_string(&TravelTime::Twenty).unwrap(), "20");
        assert_eq!(serde_json::from_str::<TravelTime>("5").unwrap(), TravelTime::Five);
        assert!(serde_json::from_str::<TravelTime>("7").is_err());
    }
}
