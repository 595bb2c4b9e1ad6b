use thiserror::Error;

/// Result type alias for raw track operations
pub type Result<T> = std::result::Result<T, TrackError>;

/// Errors that can occur when building or persisting raw tracks
///
/// Decoding never produces these: a missing header, a missing data block and
/// a CRC mismatch are all ordinary outcomes reported on [`crate::Sector`].
#[derive(Debug, Error)]
pub enum TrackError {
    /// I/O error occurred while reading or writing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unrecognized track archive
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Archive version this library does not know how to read or write
    #[error("Unsupported archive version: {0}")]
    UnsupportedVersion(u8),

    /// Parse error at specific offset
    #[error("Parse error at offset {offset}: {message}")]
    ParseError {
        /// Byte offset where error occurred
        offset: usize,
        /// Error message
        message: String,
    },

    /// Formatted layout does not fit on the track
    #[error("Track overflow: layout needs {required} bytes but track is {length} bytes")]
    TrackOverflow {
        /// Bytes needed by the layout
        required: usize,
        /// Track length in bytes
        length: usize,
    },

    /// Position outside the track
    #[error("Invalid position {position} (track length: {length})")]
    InvalidPosition {
        /// Requested position
        position: usize,
        /// Track length in bytes
        length: usize,
    },
}

impl TrackError {
    /// Create a parse error with context
    pub fn parse<S: Into<String>>(offset: usize, message: S) -> Self {
        TrackError::ParseError {
            offset,
            message: message.into(),
        }
    }

    /// Create an invalid format error
    pub fn invalid_format<S: Into<String>>(message: S) -> Self {
        TrackError::InvalidFormat(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TrackError::TrackOverflow {
            required: 7000,
            length: 6250,
        };
        assert_eq!(
            err.to_string(),
            "Track overflow: layout needs 7000 bytes but track is 6250 bytes"
        );
    }

    #[test]
    fn test_parse_error() {
        let err = TrackError::parse(9, "IDAM list is not ascending");
        assert_eq!(
            err.to_string(),
            "Parse error at offset 9: IDAM list is not ascending"
        );
    }

    #[test]
    fn test_unsupported_version() {
        assert_eq!(
            TrackError::UnsupportedVersion(7).to_string(),
            "Unsupported archive version: 7"
        );
    }
}
