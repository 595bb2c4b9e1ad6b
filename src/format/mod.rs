/// MFM track format constants and layouts

/// Format constants
pub mod constants;
/// Track layout types
pub mod spec;

pub use constants::*;
pub use spec::TrackLayout;

/// Check whether `bytes` start with the raw track archive signature
pub fn is_track_archive(bytes: &[u8]) -> bool {
    bytes.starts_with(TRACK_ARCHIVE_SIGNATURE)
}
