/// Sector decoding over a raw track
///
/// All functions here are read-only and never fail: a position without a
/// header mark, a header without a data block, and a CRC mismatch are all
/// states a real disk can be in, and are reported as such.

use crate::crc::Crc16;
use crate::format::constants::*;
use crate::image::sector::{DataBlock, Sector, SectorId};
use crate::image::track::RawTrack;

impl RawTrack {
    /// Decode the sector whose header mark is at `header_offset`
    ///
    /// Returns `None` if the byte there is not an ID address mark. Otherwise
    /// the header fields are returned even when their CRC is wrong; the data
    /// block is only searched for behind a valid header, within the same
    /// 43-byte window the WD2793 waits before giving up.
    pub fn decode_sector_at(&self, header_offset: usize) -> Option<Sector> {
        let idx = header_offset as isize;
        if self.read(idx) != ID_ADDRESS_MARK {
            return None;
        }

        let id = SectorId::new(
            self.read(idx + 1),
            self.read(idx + 2),
            self.read(idx + 3),
            self.read(idx + 4),
        );

        let mut crc = Crc16::with_preamble(&HEADER_PREAMBLE);
        self.update_crc(&mut crc, idx + 1, 4);
        let header_crc_error = self.read_crc(idx + 5) != crc.value();

        let data = if header_crc_error {
            log::trace!("Header CRC error at {}: {}", header_offset, id);
            None
        } else {
            self.find_data_block(idx + HEADER_LENGTH as isize, id.size_bytes())
        };

        Some(Sector {
            header_offset: self.wrap_index(idx),
            id,
            header_crc_error,
            data,
        })
    }

    /// Decode every complete sector, in ascending header position
    ///
    /// Headers without a data block are left out.
    pub fn decode_all(&self) -> Vec<Sector> {
        self.idam
            .iter()
            .filter_map(|&i| self.decode_sector_at(i))
            .filter(Sector::is_complete)
            .collect()
    }

    /// Find the first complete sector with sector number `sector_number`
    ///
    /// The match is on the header field alone, so a sector whose header CRC is
    /// bad can still be selected, as on the real controller.
    pub fn decode_sector(&self, sector_number: u8) -> Option<Sector> {
        self.idam
            .iter()
            .filter_map(|&i| self.decode_sector_at(i))
            .find(|s| s.id.sector == sector_number && s.is_complete())
    }

    /// Find the first header at or after `from_position`, wrapping round
    ///
    /// Any header with a valid mark byte qualifies, whatever its CRC state and
    /// whether or not it has a data block.
    pub fn decode_next_sector(&self, from_position: usize) -> Option<Sector> {
        let split = self.idam.partition_point(|&i| i < from_position);
        let (before, after) = self.idam.split_at(split);
        after
            .iter()
            .chain(before)
            .find_map(|&i| self.decode_sector_at(i))
    }

    fn read_crc(&self, position: isize) -> u16 {
        u16::from_be_bytes([self.read(position), self.read(position + 1)])
    }

    fn find_data_block(&self, start: isize, size: usize) -> Option<DataBlock> {
        for pos in (0..DATA_MARK_SEARCH_WINDOW as isize).map(|i| start + i) {
            let synced = (0..SYNC_COUNT as isize).all(|j| self.read(pos + j) == SYNC_BYTE);
            if !synced {
                continue;
            }

            let mark = self.read(pos + SYNC_COUNT as isize);
            let deleted = match mark {
                DATA_MARK => false,
                DELETED_DATA_MARK => true,
                _ => continue,
            };

            let data_pos = pos + SYNC_COUNT as isize + 1;
            let mut crc = Crc16::with_preamble(&DATA_PREAMBLE);
            crc.update(mark);
            self.update_crc(&mut crc, data_pos, size);
            let crc_error = self.read_crc(data_pos + size as isize) != crc.value();
            if crc_error {
                log::trace!("Data CRC error at {}", self.wrap_index(data_pos));
            }

            return Some(DataBlock {
                offset: self.wrap_index(data_pos),
                deleted,
                crc_error,
            });
        }

        log::trace!("No data mark within {} bytes of {}", DATA_MARK_SEARCH_WINDOW, self.wrap_index(start));
        None
    }
}
