//! Stress level value object (1 to 10 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Self-reported stress on the canonical 1-10 scale.
///
/// The public translate request reports stress on a 1-5 scale; it is
/// converted once, at the boundary, through [`StressLevel::from_wire_scale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StressLevel(u8);

impl StressLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Levels at or above this value always carry a crisis-resource safety note.
    pub const SAFETY_NOTE_THRESHOLD: u8 = 8;

    pub const WIRE_MIN: u8 = 1;
    pub const WIRE_MAX: u8 = 5;

    /// Creates a StressLevel, returning error if out of range.
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::out_of_range(
                "stressLevel",
                Self::MIN as i64,
                Self::MAX as i64,
                value as i64,
            ))
        }
    }

    /// Converts a 1-5 wire value onto the canonical scale (1 -> 2, 5 -> 10).
    pub fn from_wire_scale(value: u8) -> Result<Self, ValidationError> {
        if !(Self::WIRE_MIN..=Self::WIRE_MAX).contains(&value) {
            return Err(ValidationError::out_of_range(
                "stressLevel",
                Self::WIRE_MIN as i64,
                Self::WIRE_MAX as i64,
                value as i64,
            ));
        }
        Self::new(value * 2)
    }

    /// Returns the numeric value.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Returns true when responses must include a safety note.
    pub fn requires_safety_note(&self) -> bool {
        self.0 >= Self::SAFETY_NOTE_THRESHOLD
    }
}

impl TryFrom<u8> for StressLevel {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StressLevel> for u8 {
    fn from(level: StressLevel) -> Self {
        level.0
    }
}

impl fmt::Display for StressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}
