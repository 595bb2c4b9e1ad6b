/// MFM track byte values and geometry constants

/// Track length used by archives that predate explicit lengths (double density, 300 rpm)
pub const STANDARD_TRACK_SIZE: usize = 6250;

/// Track length of a high density track (500 kbit/s, 300 rpm)
pub const HIGH_DENSITY_TRACK_SIZE: usize = 12500;

/// Gap filler byte; also the content of a freshly reset track
pub const GAP_BYTE: u8 = 0x4E;

/// Sync byte written before every address mark (missing clock pattern 0x4489)
pub const SYNC_BYTE: u8 = 0xA1;

/// Sync byte written before the index address mark (missing clock pattern 0x5224)
pub const INDEX_SYNC_BYTE: u8 = 0xC2;

/// Index address mark
pub const INDEX_MARK: u8 = 0xFC;

/// ID address mark, starts a sector header
pub const ID_ADDRESS_MARK: u8 = 0xFE;

/// Data address mark
pub const DATA_MARK: u8 = 0xFB;

/// Deleted data address mark
pub const DELETED_DATA_MARK: u8 = 0xF8;

/// Number of sync bytes preceding an address mark
pub const SYNC_COUNT: usize = 3;

/// Value the WD2793 read-track command returns for the first sync byte of a mark
pub const READ_TRACK_QUIRK_BYTE: u8 = 0x14;

/// Byte positions after the header CRC in which the data mark search must start
pub const DATA_MARK_SEARCH_WINDOW: usize = 43;

/// Length of a sector header: mark, C, H, R, N and two CRC bytes
pub const HEADER_LENGTH: usize = 7;

/// Preamble folded into the header CRC
pub const HEADER_PREAMBLE: [u8; 4] = [SYNC_BYTE, SYNC_BYTE, SYNC_BYTE, ID_ADDRESS_MARK];

/// Preamble folded into the data CRC before the mark byte
pub const DATA_PREAMBLE: [u8; 3] = [SYNC_BYTE, SYNC_BYTE, SYNC_BYTE];

/// Raw track archive signature
pub const TRACK_ARCHIVE_SIGNATURE: &[u8; 8] = b"RAWTRACK";

/// Archive version written by this library
///
/// Version 1 had no length field; those tracks are always
/// [`STANDARD_TRACK_SIZE`] bytes. Version 2 stores the length explicitly.
pub const TRACK_ARCHIVE_VERSION: u8 = 2;

/// Size of a persisted sector record
pub const SECTOR_RECORD_SIZE: usize = 13;

/// Convert a size code to the payload length the controller transfers
///
/// Only the low three bits are significant, as on the WD2793.
#[inline]
pub fn size_code_to_bytes(size_code: u8) -> usize {
    128 << (size_code & 7)
}

/// Convert a payload length to its size code
#[inline]
pub fn bytes_to_size_code(bytes: usize) -> Option<u8> {
    match bytes {
        128 => Some(0),
        256 => Some(1),
        512 => Some(2),
        1024 => Some(3),
        2048 => Some(4),
        4096 => Some(5),
        8192 => Some(6),
        16384 => Some(7),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_code_to_bytes() {
        assert_eq!(size_code_to_bytes(0), 128);
        assert_eq!(size_code_to_bytes(1), 256);
        assert_eq!(size_code_to_bytes(2), 512);
        assert_eq!(size_code_to_bytes(3), 1024);
        assert_eq!(size_code_to_bytes(7), 16384);
    }

    #[test]
    fn test_size_code_masks_high_bits() {
        assert_eq!(size_code_to_bytes(8), 128);
        assert_eq!(size_code_to_bytes(0xFA), 512);
    }

    #[test]
    fn test_bytes_to_size_code() {
        assert_eq!(bytes_to_size_code(128), Some(0));
        assert_eq!(bytes_to_size_code(512), Some(2));
        assert_eq!(bytes_to_size_code(16384), Some(7));
        assert_eq!(bytes_to_size_code(32768), None);
        assert_eq!(bytes_to_size_code(500), None);
    }

    #[test]
    fn test_round_trip_conversion() {
        for size_code in 0..=7 {
            let bytes = size_code_to_bytes(size_code);
            assert_eq!(bytes_to_size_code(bytes), Some(size_code));
        }
    }
}
