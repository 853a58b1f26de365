//! Purchase frequency definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// How often a simulated purchase occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every calendar day
    Daily,
    /// Every 7 days
    #[default]
    Weekly,
    /// Every 14 days
    Biweekly,
    /// Same day each month, clamped to shorter months
    Monthly,
}

impl Frequency {
    /// Get all available frequencies.
    pub fn all() -> &'static [Frequency] {
        &[
            Frequency::Daily,
            Frequency::Weekly,
            Frequency::Biweekly,
            Frequency::Monthly,
        ]
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Frequency {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" | "1d" | "day" => Ok(Frequency::Daily),
            "weekly" | "1w" | "week" => Ok(Frequency::Weekly),
            "biweekly" | "2w" => Ok(Frequency::Biweekly),
            "monthly" | "1m" | "month" => Ok(Frequency::Monthly),
            _ => Err(ConfigError::InvalidFrequency(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_parse() {
        assert_eq!(Frequency::from_str("daily").unwrap(), Frequency::Daily);
        assert_eq!(Frequency::from_str("Weekly").unwrap(), Frequency::Weekly);
        assert_eq!(Frequency::from_str("2w").unwrap(), Frequency::Biweekly);
        assert_eq!(Frequency::from_str("monthly").unwrap(), Frequency::Monthly);
        assert!(Frequency::from_str("fortnightly").is_err());
    }

    #[test]
    fn test_frequency_display() {
        assert_eq!(Frequency::Biweekly.to_string(), "biweekly");
        assert_eq!(Frequency::Monthly.to_string(), "monthly");
    }

    #[test]
    fn test_frequency_serde() {
        let json = serde_json::to_string(&Frequency::Biweekly).unwrap();
        assert_eq!(json, "\"biweekly\"");
    }
}
