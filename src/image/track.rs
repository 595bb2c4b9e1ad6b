/// Raw track storage

use crate::crc::Crc16;
use crate::format::constants::{GAP_BYTE, STANDARD_TRACK_SIZE};

/// The raw content of one revolution of a track
///
/// Bytes are addressed circularly: every position is reduced modulo the track
/// length, so reading past the end continues at the start. Alongside the
/// bytes the track keeps the ascending list of positions where a sector header
/// (IDAM, the `0xFE` mark byte) starts. That list is only changed by
/// [`RawTrack::write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTrack {
    /// Header mark positions, strictly ascending, all below `data.len()`
    pub(crate) idam: Vec<usize>,
    /// Raw track bytes
    pub(crate) data: Vec<u8>,
}

impl RawTrack {
    /// Create a track of `length` bytes filled with the gap byte
    pub fn new(length: usize) -> Self {
        let mut track = Self {
            idam: Vec::new(),
            data: Vec::new(),
        };
        track.reset(length);
        track
    }

    /// Discard all content and resize to `length` gap bytes
    pub fn reset(&mut self, length: usize) {
        debug_assert!(length > 0, "track length must be nonzero");
        self.idam.clear();
        self.data.clear();
        self.data.resize(length, GAP_BYTE);
    }

    /// Track length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the track has no bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Header mark positions in ascending order
    pub fn idam_offsets(&self) -> &[usize] {
        &self.idam
    }

    /// Raw track bytes
    pub fn raw_data(&self) -> &[u8] {
        &self.data
    }

    /// Reduce any position, including negative ones, into `[0, len)`
    #[inline]
    pub fn wrap_index(&self, position: isize) -> usize {
        position.rem_euclid(self.data.len() as isize) as usize
    }

    /// Read the byte at `position`
    #[inline]
    pub fn read(&self, position: isize) -> u8 {
        self.data[self.wrap_index(position)]
    }

    /// Store `value` at `position` and set or clear its header mark
    pub fn write(&mut self, position: isize, value: u8, marks_header: bool) {
        let i = self.wrap_index(position);
        match self.idam.binary_search(&i) {
            Ok(found) if !marks_header => {
                self.idam.remove(found);
            }
            Err(insert_at) if marks_header => {
                self.idam.insert(insert_at, i);
            }
            _ => {}
        }
        self.data[i] = value;
        debug_assert!(self.idam.windows(2).all(|w| w[0] < w[1]));
    }

    /// Copy `destination.len()` bytes starting at `position`
    pub fn read_block(&self, position: isize, destination: &mut [u8]) {
        for (i, byte) in destination.iter_mut().enumerate() {
            *byte = self.read(position + i as isize);
        }
    }

    /// Store `source` starting at `position`, clearing header marks in the span
    pub fn write_block(&mut self, position: isize, source: &[u8]) {
        for (i, &byte) in source.iter().enumerate() {
            self.write(position + i as isize, byte, false);
        }
    }

    /// Fold `length` bytes starting at `position` into `crc`
    ///
    /// The span is handed to the engine as linear slices: up to the end of the
    /// buffer, then from its start. A span no longer than the track takes at
    /// most two slices; a longer one (a large size code on a short track)
    /// keeps going round.
    pub fn update_crc(&self, crc: &mut Crc16, position: isize, length: usize) {
        let mut start = self.wrap_index(position);
        let mut remaining = length;
        while remaining > 0 {
            let chunk = remaining.min(self.data.len() - start);
            crc.update_slice(&self.data[start..start + chunk]);
            remaining -= chunk;
            start = 0;
        }
    }

    /// CRC of `length` bytes starting at `position`, from a fresh engine
    pub fn calc_crc(&self, position: isize, length: usize) -> u16 {
        let mut crc = Crc16::new();
        self.update_crc(&mut crc, position, length);
        crc.value()
    }
}

impl Default for RawTrack {
    fn default() -> Self {
        Self::new(STANDARD_TRACK_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_track() {
        let track = RawTrack::new(100);
        assert_eq!(track.len(), 100);
        assert!(!track.is_empty());
        assert!(track.idam_offsets().is_empty());
        assert!(track.raw_data().iter().all(|&b| b == GAP_BYTE));
    }

    #[test]
    fn test_default_track() {
        assert_eq!(RawTrack::default().len(), STANDARD_TRACK_SIZE);
    }

    #[test]
    fn test_reset() {
        let mut track = RawTrack::new(100);
        track.write(10, 0xFE, true);
        track.reset(50);
        assert_eq!(track.len(), 50);
        assert!(track.idam_offsets().is_empty());
        assert_eq!(track.read(10), GAP_BYTE);
    }

    #[test]
    fn test_wrap_index() {
        let track = RawTrack::new(100);
        assert_eq!(track.wrap_index(0), 0);
        assert_eq!(track.wrap_index(99), 99);
        assert_eq!(track.wrap_index(100), 0);
        assert_eq!(track.wrap_index(250), 50);
        assert_eq!(track.wrap_index(-1), 99);
        assert_eq!(track.wrap_index(-201), 99);
    }

    #[test]
    fn test_write_wraps() {
        let mut track = RawTrack::new(100);
        track.write(105, 0x12, false);
        assert_eq!(track.read(5), 0x12);
        track.write(-3, 0x34, false);
        assert_eq!(track.read(97), 0x34);
        assert_eq!(track.read(-3), 0x34);
    }

    #[test]
    fn test_idam_insert_sorted() {
        let mut track = RawTrack::new(100);
        track.write(50, 0xFE, true);
        track.write(10, 0xFE, true);
        track.write(90, 0xFE, true);
        track.write(10, 0xFE, true);
        assert_eq!(track.idam_offsets(), &[10, 50, 90]);
    }

    #[test]
    fn test_idam_remove() {
        let mut track = RawTrack::new(100);
        track.write(10, 0xFE, true);
        track.write(50, 0xFE, true);
        track.write(10, 0x00, false);
        assert_eq!(track.idam_offsets(), &[50]);
        // removing an absent mark is harmless
        track.write(20, 0x00, false);
        assert_eq!(track.idam_offsets(), &[50]);
    }

    #[test]
    fn test_idam_wrapped_position() {
        let mut track = RawTrack::new(100);
        track.write(-1, 0xFE, true);
        track.write(130, 0xFE, true);
        assert_eq!(track.idam_offsets(), &[30, 99]);
    }

    #[test]
    fn test_block_wraparound() {
        let mut track = RawTrack::new(10);
        track.write_block(8, &[1, 2, 3, 4]);
        assert_eq!(track.raw_data(), &[3, 4, 0x4E, 0x4E, 0x4E, 0x4E, 0x4E, 0x4E, 1, 2]);

        let mut buf = [0u8; 4];
        track.read_block(8, &mut buf);
        assert_eq!(buf, [1, 2, 3, 4]);
    }

    #[test]
    fn test_write_block_clears_marks() {
        let mut track = RawTrack::new(10);
        track.write(3, 0xFE, true);
        track.write_block(2, &[0, 0]);
        assert!(track.idam_offsets().is_empty());
    }

    #[test]
    fn test_crc_across_wrap() {
        let mut track = RawTrack::new(16);
        for i in 0..16 {
            track.write(i, (i * 7) as u8, false);
        }

        let mut linear = Crc16::new();
        for i in 12..20 {
            linear.update(track.read(i));
        }

        assert_eq!(track.calc_crc(12, 8), linear.value());
        assert_eq!(track.calc_crc(-4, 8), linear.value());
    }

    #[test]
    fn test_update_crc_continues() {
        let mut track = RawTrack::new(16);
        track.write_block(0, b"123456789");

        let mut crc = Crc16::new();
        track.update_crc(&mut crc, 0, 4);
        track.update_crc(&mut crc, 4, 5);
        assert_eq!(crc.value(), 0x29B1);
    }
}
