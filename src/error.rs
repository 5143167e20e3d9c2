//! Error types for the Kohonen vector quantizer.

use thiserror::Error;

/// The main error type for quantizer operations.
#[derive(Error, Debug)]
pub enum KohonenError {
    /// Invalid network or training configuration.
    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    /// A vector's width disagrees with the width the network expects.
    #[error("Dimension mismatch: expected {expected} components, got {actual}")]
    DimensionMismatch {
        /// The width the network or layer was configured with.
        expected: usize,
        /// The width of the vector that was passed in.
        actual: usize,
    },

    /// Training or normalization was invoked without any samples.
    #[error("Empty training set")]
    EmptyTrainingSet,

    /// A sample contains a non-finite component.
    #[error("Invalid sample: {0}")]
    InvalidSample(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error while encoding or writing an image.
    #[error("Image error: {0}")]
    Image(String),

    /// Malformed textual input.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type alias for quantizer operations.
pub type Result<T> = std::result::Result<T, KohonenError>;

impl From<image::ImageError> for KohonenError {
    fn from(err: image::ImageError) -> Self {
        KohonenError::Image(err.to_string())
    }
}

/// Returns `DimensionMismatch` unless `actual == expected`.
#[inline]
pub(crate) fn check_width(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(KohonenError::DimensionMismatch { expected, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_width() {
        assert!(check_width(3, 3).is_ok());
        match check_width(2, 3) {
            Err(KohonenError::DimensionMismatch { expected, actual }) => {
                assert_eq!(expected, 2);
                assert_eq!(actual, 3);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_display() {
        let err = KohonenError::DimensionMismatch { expected: 2, actual: 5 };
        assert_eq!(err.to_string(), "Dimension mismatch: expected 2 components, got 5");
        assert_eq!(KohonenError::EmptyTrainingSet.to_string(), "Empty training set");
    }
}
