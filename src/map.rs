/// Raw track map visualization

use crate::format::constants::{HEADER_LENGTH, SYNC_COUNT};
use crate::image::RawTrack;
use std::fmt::Write;

/// ANSI color codes for track map
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BRIGHT_WHITE: &str = "\x1b[97m";
    pub const DARK_WHITE: &str = "\x1b[37m";
    pub const BRIGHT_CYAN: &str = "\x1b[96m";
    pub const BRIGHT_RED: &str = "\x1b[91m";
    pub const BRIGHT_YELLOW: &str = "\x1b[93m";
    pub const BRIGHT_MAGENTA: &str = "\x1b[95m";
}

/// Bytes represented by one map cell
pub const BYTES_PER_CELL: usize = 16;

/// Cells per map row
pub const CELLS_PER_ROW: usize = 64;

/// What a region of the track holds, in increasing order of display priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Region {
    /// Gap or unformatted bytes
    Gap,
    /// Data block with a good CRC
    Data,
    /// Header with a good CRC and a data block
    Header,
    /// Header with a good CRC but no data block
    HeaderOnly,
    /// Data block with a deleted data mark
    Deleted,
    /// Header or data block with a bad CRC
    Error,
}

impl Region {
    fn glyph(self) -> (&'static str, &'static str) {
        match self {
            Region::Gap => (colors::DARK_WHITE, "\u{00B7}"),
            Region::Data => (colors::BRIGHT_WHITE, "\u{2593}"),
            Region::Header => (colors::BRIGHT_CYAN, "\u{2588}"),
            Region::HeaderOnly => (colors::BRIGHT_MAGENTA, "\u{2588}"),
            Region::Deleted => (colors::BRIGHT_YELLOW, "\u{2593}"),
            Region::Error => (colors::BRIGHT_RED, "\u{2593}"),
        }
    }
}

/// Classify every byte of the track
pub fn classify(track: &RawTrack) -> Vec<Region> {
    let mut regions = vec![Region::Gap; track.len()];
    let mut mark = |start: isize, len: usize, region: Region| {
        for i in 0..len as isize {
            let pos = track.wrap_index(start + i);
            regions[pos] = regions[pos].max(region);
        }
    };

    for &offset in track.idam_offsets() {
        let Some(sector) = track.decode_sector_at(offset) else {
            continue;
        };
        let header_start = offset as isize - SYNC_COUNT as isize;
        let header_len = SYNC_COUNT + HEADER_LENGTH;

        match sector.data {
            _ if sector.header_crc_error => mark(header_start, header_len, Region::Error),
            None => mark(header_start, header_len, Region::HeaderOnly),
            Some(data) => {
                mark(header_start, header_len, Region::Header);
                let region = if data.crc_error {
                    Region::Error
                } else if data.deleted {
                    Region::Deleted
                } else {
                    Region::Data
                };
                let data_start = data.offset as isize - SYNC_COUNT as isize - 1;
                mark(data_start, SYNC_COUNT + 1 + sector.size_bytes() + 2, region);
            }
        }
    }

    regions
}

/// Render the track map as a string
pub fn render_track_map(track: &RawTrack) -> String {
    let regions = classify(track);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "=== Track Map ({} bytes, {} per cell) ===",
        track.len(),
        BYTES_PER_CELL
    );
    let _ = writeln!(
        out,
        "Legend: {}Header{} {}Header only{} {}Data{} {}Deleted{} {}CRC error{}",
        colors::BRIGHT_CYAN, colors::RESET,
        colors::BRIGHT_MAGENTA, colors::RESET,
        colors::BRIGHT_WHITE, colors::RESET,
        colors::BRIGHT_YELLOW, colors::RESET,
        colors::BRIGHT_RED, colors::RESET
    );

    for (row, row_regions) in regions.chunks(BYTES_PER_CELL * CELLS_PER_ROW).enumerate() {
        let _ = write!(out, "{:05} ", row * BYTES_PER_CELL * CELLS_PER_ROW);
        for cell in row_regions.chunks(BYTES_PER_CELL) {
            let region = cell.iter().copied().max().unwrap_or(Region::Gap);
            let (color, glyph) = region.glyph();
            let _ = write!(out, "{}{}{}", color, glyph, colors::RESET);
        }
        out.push('\n');
    }

    out
}

/// Draw a visual map of the track to stdout
pub fn draw_track_map(track: &RawTrack) {
    print!("{}", render_track_map(track));
}
