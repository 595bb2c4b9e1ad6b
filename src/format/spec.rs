/// Track layout specifications and presets

use crate::format::constants::*;

/// Geometry of a formatted MFM track (IBM System 34 layout)
///
/// ```text
/// gap4a | sync | C2 C2 C2 FC | gap1 |
///   ( sync | A1 A1 A1 FE | C H R N | CRC | gap2 |
///     sync | A1 A1 A1 FB | payload | CRC | gap3 ) * sectors_per_track
/// | gap4b (rest of track)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackLayout {
    /// Total raw track length in bytes
    pub track_length: usize,
    /// Sectors per track
    pub sectors_per_track: u8,
    /// Size code shared by all sectors
    pub size_code: u8,
    /// First sector number (usually 1)
    pub first_sector_id: u8,
    /// Interleave factor (1 = no interleave)
    pub interleave: u8,
    /// Gap before the index mark
    pub gap4a: usize,
    /// Gap after the index mark
    pub gap1: usize,
    /// Gap between a header and its data block
    pub gap2: usize,
    /// Gap after each data block
    pub gap3: usize,
    /// Zero bytes written before each run of sync bytes
    pub sync_length: usize,
    /// Payload byte for freshly formatted sectors
    pub filler_byte: u8,
}

impl TrackLayout {
    /// Create a layout with standard double density gaps
    pub fn new(track_length: usize, sectors_per_track: u8, size_code: u8) -> Self {
        Self {
            track_length,
            sectors_per_track,
            size_code,
            first_sector_id: 1,
            interleave: 1,
            gap4a: 80,
            gap1: 50,
            gap2: 22,
            gap3: 84,
            sync_length: 12,
            filler_byte: 0xE5,
        }
    }

    /// MSX double density track (9 sectors of 512 bytes in 6250 bytes)
    pub fn msx_double_density() -> Self {
        Self::new(STANDARD_TRACK_SIZE, 9, 2)
    }

    /// PC high density track (18 sectors of 512 bytes in 12500 bytes)
    pub fn pc_high_density() -> Self {
        Self {
            gap3: 101,
            ..Self::new(HIGH_DENSITY_TRACK_SIZE, 18, 2)
        }
    }

    /// Set the interleave factor
    pub fn with_interleave(mut self, interleave: u8) -> Self {
        self.interleave = interleave;
        self
    }

    /// Payload length of each sector in bytes
    pub fn sector_size(&self) -> usize {
        size_code_to_bytes(self.size_code)
    }

    /// Bytes taken by the index mark area (gap4a, sync, mark, gap1)
    pub fn preamble_bytes(&self) -> usize {
        self.gap4a + self.sync_length + SYNC_COUNT + 1 + self.gap1
    }

    /// Bytes taken by one sector, including its trailing gap3
    pub fn bytes_per_sector(&self) -> usize {
        let mark = self.sync_length + SYNC_COUNT + 1;
        mark + 4 + 2 + self.gap2 + mark + self.sector_size() + 2 + self.gap3
    }

    /// Bytes needed for the whole layout, excluding gap4b
    pub fn bytes_required(&self) -> usize {
        self.preamble_bytes() + self.sectors_per_track as usize * self.bytes_per_sector()
    }

    /// Check if the layout fits in the track length
    pub fn fits(&self) -> bool {
        self.bytes_required() <= self.track_length
    }

    /// Sector numbers in physical order, honouring the interleave
    pub fn sector_order(&self) -> Vec<u8> {
        let count = self.sectors_per_track as usize;
        let mut slots: Vec<Option<u8>> = vec![None; count];
        let step = self.interleave.max(1) as usize;
        let mut pos = 0;

        for i in 0..count {
            while slots[pos].is_some() {
                pos = (pos + 1) % count;
            }
            slots[pos] = Some(self.first_sector_id.wrapping_add(i as u8));
            pos = (pos + step) % count;
        }

        slots.into_iter().flatten().collect()
    }
}

impl Default for TrackLayout {
    fn default() -> Self {
        Self::msx_double_density()
    }
}
