//! Error handling for xcspost
//!
//! Provides the error types shared by every layer of the post processor:
//! - G-Code errors (reading command text)
//! - Geometry errors (arcs that cannot be linearized or encoded)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// G-Code error type
///
/// Represents errors raised while turning G-Code text into motion commands.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GcodeError {
    /// Invalid G-Code syntax
    #[error("Invalid syntax at line {line_number}: {reason}")]
    InvalidSyntax {
        /// The line number where the syntax error occurred.
        line_number: u32,
        /// The reason for the syntax error.
        reason: String,
    },

    /// Word letter that is not part of the supported axis set
    #[error("Unknown G-Code word at line {line_number}: {code}")]
    UnknownCode {
        /// The line number where the unknown word was found.
        line_number: u32,
        /// The unknown word.
        code: String,
    },

    /// Invalid parameter value
    #[error("Invalid parameter '{param}' at line {line_number}: {reason}")]
    InvalidParameter {
        /// The line number where the invalid parameter was found.
        line_number: u32,
        /// The parameter name.
        param: String,
        /// The reason the parameter is invalid.
        reason: String,
    },
}

/// Geometry error type
///
/// Raised for degenerate or inconsistent input geometry. These are never
/// clamped or guessed around; the caller decides what to do.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Arc radius is zero or not a finite number
    #[error("Invalid input geometry: arc radius {radius} is degenerate")]
    DegenerateRadius {
        /// The computed radius.
        radius: f64,
    },

    /// Chord tolerance is too large for the arc radius (acos domain)
    #[error("Invalid input geometry: chord error {chord_error} exceeds the diameter of radius {radius}")]
    ChordErrorOutOfDomain {
        /// The arc radius.
        radius: f64,
        /// The requested chord error.
        chord_error: f64,
    },

    /// Any other non-finite intermediate value
    #[error("Invalid input geometry: {reason}")]
    NonFinite {
        /// What went wrong.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gcode_error_display() {
        let err = GcodeError::InvalidSyntax {
            line_number: 12,
            reason: "dangling word".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid syntax at line 12: dangling word");

        let err = GcodeError::UnknownCode {
            line_number: 3,
            code: "E5".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown G-Code word at line 3: E5");
    }

    #[test]
    fn test_geometry_error_display() {
        let err = GeometryError::DegenerateRadius { radius: 0.0 };
        assert_eq!(
            err.to_string(),
            "Invalid input geometry: arc radius 0 is degenerate"
        );
    }
}
