use crate::error::ScorecardError;
use serde::{Deserialize, Serialize};

pub const MIN_SCORE: u8 = 0;
pub const MAX_SCORE: u8 = 5;

/// Scale version written to the store alongside every save.
pub const CURRENT_SCALE_VERSION: i64 = ScaleVersion::Unified as i64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreLevel {
    pub value: u8,
    pub label: String,
}

/// Score scales that have been stored over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScaleVersion {
    /// `{0, 2, 3, 4}`: minimal, basic, good, extensive.
    Legacy = 1,
    /// `{1..5}`.
    FivePoint = 2,
    /// `{0..5}`, the only scale accepted for edits and imports.
    Unified = 3,
}

impl ScaleVersion {
    pub fn from_stored(raw: i64) -> Option<Self> {
        match raw {
            1 => Some(ScaleVersion::Legacy),
            2 => Some(ScaleVersion::FivePoint),
            3 => Some(ScaleVersion::Unified),
            _ => None,
        }
    }
}

pub fn label_for(value: u8) -> &'static str {
    match value {
        0 => "Minimal/None",
        1 => "None",
        2 => "Basic",
        3 => "Good",
        4 => "Very Good",
        5 => "World Class",
        _ => "Unknown",
    }
}

pub fn score_levels() -> Vec<ScoreLevel> {
    (MIN_SCORE..=MAX_SCORE)
        .map(|value| ScoreLevel {
            value,
            label: label_for(value).to_string(),
        })
        .collect()
}

pub fn is_in_domain(value: u8) -> bool {
    (MIN_SCORE..=MAX_SCORE).contains(&value)
}

pub fn validate_score(value: i64) -> Result<u8, ScorecardError> {
    if value < MIN_SCORE as i64 || value > MAX_SCORE as i64 {
        return Err(ScorecardError::InvalidValue {
            value,
            min: MIN_SCORE,
            max: MAX_SCORE,
        });
    }
    Ok(value as u8)
}

/// Maps a value stored under `from` onto the unified scale.
///
/// Legacy → five-point lifts `0` to `1` and `4` to `5`; five-point → unified
/// keeps every value. Anything still outside the domain is clamped.
pub fn migrate_value(from: ScaleVersion, value: u8) -> u8 {
    let mut migrated = value;

    if from < ScaleVersion::FivePoint {
        migrated = match migrated {
            0 => 1,
            4 => 5,
            other => other,
        };
    }

    migrated.clamp(MIN_SCORE, MAX_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_against_unified_domain() {
        assert_eq!(validate_score(0).unwrap(), 0);
        assert_eq!(validate_score(5).unwrap(), 5);
        assert!(matches!(
            validate_score(6),
            Err(ScorecardError::InvalidValue { value: 6, .. })
        ));
        assert!(validate_score(-1).is_err());
    }

    #[test]
    fn legacy_values_are_lifted_once() {
        assert_eq!(migrate_value(ScaleVersion::Legacy, 0), 1);
        assert_eq!(migrate_value(ScaleVersion::Legacy, 2), 2);
        assert_eq!(migrate_value(ScaleVersion::Legacy, 3), 3);
        assert_eq!(migrate_value(ScaleVersion::Legacy, 4), 5);
        assert_eq!(migrate_value(ScaleVersion::FivePoint, 4), 4);
        assert_eq!(migrate_value(ScaleVersion::Unified, 0), 0);
    }

    #[test]
    fn levels_cover_the_whole_domain_in_order() {
        let levels = score_levels();
        assert_eq!(levels.len(), 6);
        assert_eq!(levels[0].label, "Minimal/None");
        assert_eq!(levels[5].label, "World Class");
    }

    #[test]
    fn unknown_stored_versions_are_not_guessed() {
        assert_eq!(ScaleVersion::from_stored(2), Some(ScaleVersion::FivePoint));
        assert_eq!(ScaleVersion::from_stored(9), None);
    }
}
