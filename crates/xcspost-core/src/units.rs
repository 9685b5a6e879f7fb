//! Unit conversion utilities
//!
//! Handles conversion between Metric (mm) and Imperial (inch) lengths and
//! between the per-minute/per-second feed rate units a CAM source may emit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MM_PER_INCH: f64 = 25.4;

/// Measurement system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    /// Metric system (mm)
    #[default]
    Metric,
    /// Imperial system (inches)
    Imperial,
}

impl MeasurementSystem {
    /// The G-Code word selecting this system
    pub fn units_code(self) -> &'static str {
        match self {
            Self::Metric => "G21",
            Self::Imperial => "G20",
        }
    }

    /// Default number of output decimals for this system
    pub fn default_precision(self) -> usize {
        match self {
            Self::Metric => 3,
            Self::Imperial => 4,
        }
    }
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "Metric"),
            Self::Imperial => write!(f, "Imperial"),
        }
    }
}

impl FromStr for MeasurementSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "mm" => Ok(Self::Metric),
            "imperial" | "inch" | "in" => Ok(Self::Imperial),
            _ => Err(format!("Unknown measurement system: {}", s)),
        }
    }
}

/// Feed rate units selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FeedRateUnits {
    /// Millimeters per minute
    #[default]
    MmPerMin,
    /// Millimeters per second
    MmPerSec,
    /// Inches per minute
    InPerMin,
    /// Inches per second
    InPerSec,
}

impl fmt::Display for FeedRateUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MmPerMin => write!(f, "mm/min"),
            Self::MmPerSec => write!(f, "mm/sec"),
            Self::InPerMin => write!(f, "in/min"),
            Self::InPerSec => write!(f, "in/sec"),
        }
    }
}

impl FromStr for FeedRateUnits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(' ', "").as_str() {
            "mm/min" | "mm_per_min" => Ok(Self::MmPerMin),
            "mm/s" | "mm/sec" | "mm_per_sec" => Ok(Self::MmPerSec),
            "in/min" | "in_per_min" => Ok(Self::InPerMin),
            "in/s" | "in/sec" | "in_per_sec" => Ok(Self::InPerSec),
            _ => Err(format!("Unknown feed rate units: {}", s)),
        }
    }
}

impl FeedRateUnits {
    fn to_mm_per_min_factor(self) -> f64 {
        match self {
            Self::MmPerMin => 1.0,
            Self::MmPerSec => 60.0,
            Self::InPerMin => MM_PER_INCH,
            Self::InPerSec => MM_PER_INCH * 60.0,
        }
    }
}

/// Convert a length between measurement systems
pub fn convert_length(value: f64, from: MeasurementSystem, to: MeasurementSystem) -> f64 {
    match (from, to) {
        (MeasurementSystem::Metric, MeasurementSystem::Imperial) => value / MM_PER_INCH,
        (MeasurementSystem::Imperial, MeasurementSystem::Metric) => value * MM_PER_INCH,
        _ => value,
    }
}

/// Convert a feed rate between feed rate units
pub fn convert_feed_rate(value: f64, from: FeedRateUnits, to: FeedRateUnits) -> f64 {
    if from == to {
        return value;
    }
    value * from.to_mm_per_min_factor() / to.to_mm_per_min_factor()
}

/// Get the unit label for the given system ("mm" or "in")
pub fn get_unit_label(system: MeasurementSystem) -> &'static str {
    match system {
        MeasurementSystem::Metric => "mm",
        MeasurementSystem::Imperial => "in",
    }
}

/// Format a value with a fixed number of decimals, never printing `-0`.
pub fn format_fixed(value: f64, precision: usize) -> String {
    let text = format!("{:.*}", precision, value);
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_string()
    } else {
        text
    }
}
