/// Decoded sector records

use crate::fdc::Wd2793Status;
use crate::format::constants::size_code_to_bytes;

/// Sector ID (CHRN) as recorded in a sector header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SectorId {
    /// C - Cylinder/Track number
    pub track: u8,
    /// H - Head/Side number
    pub head: u8,
    /// R - Sector number
    pub sector: u8,
    /// N - Size code, stored as read (only the low three bits select the size)
    pub size_code: u8,
}

impl SectorId {
    /// Create a new sector ID
    pub fn new(track: u8, head: u8, sector: u8, size_code: u8) -> Self {
        Self {
            track,
            head,
            sector,
            size_code,
        }
    }

    /// Payload length in bytes implied by the size code
    pub fn size_bytes(&self) -> usize {
        size_code_to_bytes(self.size_code)
    }
}

impl std::fmt::Display for SectorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[C:{} H:{} R:{} N:{}]",
            self.track, self.head, self.sector, self.size_code
        )
    }
}

/// Location and state of a data block found after a header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataBlock {
    /// Track position of the first payload byte
    pub offset: usize,
    /// Block was introduced by a deleted data mark
    pub deleted: bool,
    /// Recorded data CRC does not match the payload
    pub crc_error: bool,
}

/// A sector as the controller sees it on the raw track
///
/// Produced by the decode functions on [`crate::RawTrack`]; never stored in
/// the track itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sector {
    /// Track position of the ID address mark byte
    pub header_offset: usize,
    /// Header fields
    pub id: SectorId,
    /// Recorded header CRC does not match the header fields
    pub header_crc_error: bool,
    /// Data block, absent when none was found after the header
    pub data: Option<DataBlock>,
}

impl Sector {
    /// Track position of the first payload byte, if a data block was found
    pub fn data_offset(&self) -> Option<usize> {
        self.data.map(|d| d.offset)
    }

    /// Check if the header has both a header and a data block
    pub fn is_complete(&self) -> bool {
        self.data.is_some()
    }

    /// Check if the data CRC failed
    ///
    /// Also true when no data block exists, as there is nothing valid to read.
    pub fn data_crc_error(&self) -> bool {
        self.data.map_or(true, |d| d.crc_error)
    }

    /// Check if the data block carries a deleted data mark
    pub fn is_deleted(&self) -> bool {
        self.data.is_some_and(|d| d.deleted)
    }

    /// Payload length in bytes implied by the header size code
    pub fn size_bytes(&self) -> usize {
        self.id.size_bytes()
    }

    /// Check if this sector has any CRC errors
    pub fn has_error(&self) -> bool {
        self.header_crc_error || self.data_crc_error()
    }

    /// Status a WD2793 read-sector command reports after transferring this sector
    pub fn read_status(&self) -> Wd2793Status {
        let mut status = 0;
        if self.header_crc_error {
            status |= Wd2793Status::CRC_ERROR;
        }
        match self.data {
            None => status |= Wd2793Status::RECORD_NOT_FOUND,
            Some(data) => {
                if data.crc_error {
                    status |= Wd2793Status::CRC_ERROR;
                }
                if data.deleted {
                    status |= Wd2793Status::RECORD_TYPE;
                }
            }
        }
        Wd2793Status::new(status)
    }
}
