/// I/O operations for persisting raw tracks and sector records

/// Reader implementation for track archives
pub mod reader;
/// Writer implementation for track archives
pub mod writer;

pub use reader::{read_sector, read_track, read_track_file};
pub use writer::{write_sector, write_track, write_track_file, write_track_version};
