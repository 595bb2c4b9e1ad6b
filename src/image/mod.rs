/// Raw track data structures

/// Builder for laying out formatted tracks
pub mod builder;
/// Sector decoding and lookup
pub mod decode;
/// WD2793 read-track quirk
pub mod quirk;
/// Decoded sector records
pub mod sector;
/// Raw track storage
pub mod track;

pub use builder::{SectorTemplate, TrackBuilder};
pub use sector::{DataBlock, Sector, SectorId};
pub use track::RawTrack;

use crate::error::Result;
use std::path::Path;

impl RawTrack {
    /// Open a raw track archive from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        crate::io::read_track_file(path)
    }

    /// Save the track to disk as a raw track archive
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        crate::io::write_track_file(self, path)
    }

    /// Create a new builder for laying out formatted tracks
    pub fn builder() -> TrackBuilder {
        TrackBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_open() {
        let track = RawTrack::builder().format(0, 0).build().unwrap();
        let path = std::env::temp_dir().join(format!("rawtrack-test-{}.trk", std::process::id()));

        track.save(&path).unwrap();
        let restored = RawTrack::open(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(restored, track);
    }

    #[test]
    fn test_open_missing_file() {
        let result = RawTrack::open("/nonexistent/track.trk");
        assert!(matches!(result, Err(crate::TrackError::Io(_))));
    }
}
