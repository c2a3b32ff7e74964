//! Length units for real-world measurements.
//!
//! Calibration and measurement values can be expressed in feet, meters,
//! yards, or inches. Conversions go through meters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const METERS_PER_FOOT: f64 = 0.3048;

/// Unit of a real-world length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Feet,
    Meters,
    Yards,
    Inches,
}

impl LengthUnit {
    /// Meters in one of this unit.
    pub fn meters(&self) -> f64 {
        match self {
            Self::Feet => METERS_PER_FOOT,
            Self::Meters => 1.0,
            Self::Yards => METERS_PER_FOOT * 3.0,
            Self::Inches => METERS_PER_FOOT / 12.0,
        }
    }

    /// Convert `value` expressed in this unit into `target`.
    pub fn convert(&self, value: f64, target: LengthUnit) -> f64 {
        if *self == target {
            return value;
        }
        value * self.meters() / target.meters()
    }

    /// Short suffix used in labels.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::Feet => "ft",
            Self::Meters => "m",
            Self::Yards => "yd",
            Self::Inches => "in",
        }
    }

    pub fn all() -> &'static [LengthUnit] {
        &[Self::Feet, Self::Meters, Self::Yards, Self::Inches]
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Feet => write!(f, "feet"),
            Self::Meters => write!(f, "meters"),
            Self::Yards => write!(f, "yards"),
            Self::Inches => write!(f, "inches"),
        }
    }
}

impl FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ft" | "foot" | "feet" => Ok(Self::Feet),
            "m" | "meter" | "meters" | "metre" | "metres" => Ok(Self::Meters),
            "yd" | "yard" | "yards" => Ok(Self::Yards),
            "in" | "inch" | "inches" => Ok(Self::Inches),
            _ => Err(format!("Unknown length unit: {}", s)),
        }
    }
}

/// Format a length for overlay labels, e.g. `10 ft` or `3.25 m`.
pub fn format_length(value: f64, unit: LengthUnit) -> String {
    if value.fract() == 0.0 {
        format!("{} {}", value as i64, unit.abbreviation())
    } else {
        format!("{:.2} {}", value, unit.abbreviation())
    }
}
