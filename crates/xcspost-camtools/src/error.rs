//! Error types for the transcoding engine.

use thiserror::Error;

use xcspost_core::GeometryError;

/// Errors that can occur while transcoding motion commands.
#[derive(Error, Debug)]
pub enum TranscodeError {
    /// No tracked path drew anything, so there is nothing to place.
    #[error("no cuttable geometry found")]
    NoCuttableGeometry,

    /// An arc could not be linearized or encoded.
    #[error(transparent)]
    InvalidGeometry(#[from] GeometryError),
}

/// Result type alias for transcoding operations.
pub type TranscodeResult<T> = Result<T, TranscodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcode_error_display() {
        assert_eq!(
            TranscodeError::NoCuttableGeometry.to_string(),
            "no cuttable geometry found"
        );

        let err: TranscodeError = GeometryError::DegenerateRadius { radius: 0.0 }.into();
        assert!(matches!(err, TranscodeError::InvalidGeometry(_)));
        assert!(err.to_string().starts_with("Invalid input geometry"));
    }
}
