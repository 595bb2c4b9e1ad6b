/// WD2793 read-track misread emulation
///
/// On a real WD2793 the read-track command never returns the first of the
/// three `A1` sync bytes in front of an address mark as `A1`. The 2nd and 3rd
/// come through fine. Roughly half the time the first one reads as `0x14`,
/// about a third of the time as `0xC2`, and the rest as assorted other values
/// (`00`, `02`, `F8`, `FC`), which tend to settle on `14` or `C2` when the
/// track is read again.
///
/// `0x4489`, the missing-clock encoding of `A1`, shifted left by one bit is
/// `0x8912`, whose data bits decode to `0x14`. That may be part of the story.
///
/// Only `0x14` is produced here. There is no known rule for when the hardware
/// returns `0xC2` instead, so the alternation is not modelled. That is enough
/// for protection checks that locate the first `A1` in a read-track dump and
/// sum the bytes after it: they need the first `A1` to be anything else.

use crate::format::constants::*;
use crate::image::track::RawTrack;

impl RawTrack {
    /// Replace the first sync byte of every header and data mark with the
    /// value the read-track command returns for it
    ///
    /// Meant to be run on a copy of the track handed to a read-track command.
    /// Only positions that still hold the full `A1 A1 A1` + mark pattern are
    /// touched, so a second call changes nothing. Returns the number of bytes
    /// replaced.
    pub fn apply_wd2793_read_track_quirk(&mut self) -> usize {
        let mut patched = 0;

        // writes below never change the header index
        for i in self.idam.clone() {
            let idx = i as isize;
            if !self.has_sync_before(idx) || self.read(idx) != ID_ADDRESS_MARK {
                continue;
            }
            self.write(idx - SYNC_COUNT as isize, READ_TRACK_QUIRK_BYTE, false);
            patched += 1;

            let Some(data_offset) = self.decode_sector_at(i).and_then(|s| s.data_offset()) else {
                continue;
            };
            // data offset is one past the mark byte
            let mark = data_offset as isize - 1;
            if self.has_sync_before(mark) {
                self.write(mark - SYNC_COUNT as isize, READ_TRACK_QUIRK_BYTE, false);
                patched += 1;
            }
        }

        log::debug!("Read-track quirk replaced {} sync bytes", patched);
        patched
    }

    fn has_sync_before(&self, mark: isize) -> bool {
        (1..=SYNC_COUNT as isize).all(|j| self.read(mark - j) == SYNC_BYTE)
    }
}
