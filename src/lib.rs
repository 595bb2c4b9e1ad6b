/*!
# rawtrack

A Rust library modelling the raw bytes of one revolution of an MFM floppy
track and decoding them into sectors exactly the way a WD2793 floppy disk
controller does, failure modes included.

## Features

- Circular raw track buffer with an ordered index of sector header (IDAM) positions
- Sector decoding with header and data CRC checks and the controller's data mark search window
- Lookup of all sectors, a sector by number, or whatever header comes next
- Emulation of the WD2793 read-track misread of the first sync byte
- Versioned, bit-exact track archives
- Track builder for formatted and deliberately malformed (copy protected) tracks

## Quick Start

```rust,no_run
use rawtrack::{RawTrack, SectorId, SectorTemplate, TrackLayout};

// Lay out an 8 sector track followed by a sector with a bad data CRC
let layout = TrackLayout { sectors_per_track: 8, ..TrackLayout::msx_double_density() };
let mut track = RawTrack::builder()
    .layout(layout)
    .format(0, 0)
    .sector(SectorTemplate::new(SectorId::new(0, 0, 9, 2)).bad_data_crc())
    .build()?;

// Decode a sector the way a read-sector command would
if let Some(sector) = track.decode_sector(1) {
    println!("{} data at {:?}", sector.id, sector.data_offset());
}

// Decode whatever header passes under the head next
let next = track.decode_next_sector(1000);

// Before handing the track to a read-track command
track.apply_wd2793_read_track_quirk();

// Persist and restore
track.save("track.trk")?;
let restored = RawTrack::open("track.trk")?;
# Ok::<(), rawtrack::TrackError>(())
```

## Modules

- `crc`: CRC-16/CCITT engine with sync preamble seeding
- `image`: Raw track store, decoded sector records and the track builder
- `format`: MFM constants and track layouts
- `fdc`: WD2793 status register mapping
- `io`: Track archive reader and writer
- `map`: Track map visualization
- `error`: Error types and Result alias
*/

#![warn(missing_docs)]

/// CRC-16/CCITT engine
pub mod crc;
/// Error types and Result alias
pub mod error;
/// FDC (Floppy Disk Controller) status codes
pub mod fdc;
/// MFM format constants and track layouts
pub mod format;
/// Core track data structures (RawTrack, Sector)
pub mod image;
/// I/O operations for persisting tracks
pub mod io;
/// Track map visualization
pub mod map;

// Re-export common types
pub use crc::Crc16;
pub use error::{Result, TrackError};
pub use fdc::Wd2793Status;
pub use format::{TrackLayout, STANDARD_TRACK_SIZE};
pub use image::{DataBlock, RawTrack, Sector, SectorId, SectorTemplate, TrackBuilder};
