/// Raw track archive reader

use crate::error::{Result, TrackError};
use crate::format::constants::*;
use crate::image::{DataBlock, RawTrack, Sector, SectorId};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Read a raw track archive from disk
pub fn read_track_file<P: AsRef<Path>>(path: P) -> Result<RawTrack> {
    let mut file = BufReader::new(File::open(path)?);
    read_track(&mut file)
}

/// Read a raw track archive
///
/// Version 1 archives carry no length; their track is always
/// [`STANDARD_TRACK_SIZE`] bytes whatever follows.
pub fn read_track<R: Read>(reader: &mut R) -> Result<RawTrack> {
    let mut magic = [0u8; 8];
    reader.read_exact(&mut magic)?;
    if &magic != TRACK_ARCHIVE_SIGNATURE {
        return Err(TrackError::invalid_format("Not a raw track archive"));
    }

    let version = read_u8(reader)?;
    let idam = read_idam_list(reader)?;
    let length = match version {
        1 => STANDARD_TRACK_SIZE,
        2 => read_u32(reader)? as usize,
        v => return Err(TrackError::UnsupportedVersion(v)),
    };

    log::debug!(
        "Reading v{} track archive: {} bytes, {} headers",
        version,
        length,
        idam.len()
    );

    validate_idam(&idam, length)?;

    let mut data = Vec::new();
    reader.take(length as u64).read_to_end(&mut data)?;
    if data.len() != length {
        return Err(TrackError::parse(
            data.len(),
            format!("Track data truncated (expected {} bytes)", length),
        ));
    }

    Ok(RawTrack { idam, data })
}

/// Read a persisted sector record
pub fn read_sector<R: Read>(reader: &mut R) -> Result<Sector> {
    let mut record = [0u8; SECTOR_RECORD_SIZE];
    reader.read_exact(&mut record)?;

    let header_offset = u32::from_le_bytes([record[0], record[1], record[2], record[3]]) as usize;
    let id = SectorId::new(record[4], record[5], record[6], record[7]);
    let flags = record[8];
    let data_offset = u32::from_le_bytes([record[9], record[10], record[11], record[12]]) as usize;

    if flags & !SECTOR_FLAGS_MASK != 0 {
        return Err(TrackError::parse(8, format!("Unknown sector flags 0x{:02X}", flags)));
    }

    let data = if flags & SECTOR_FLAG_HAS_DATA != 0 {
        Some(DataBlock {
            offset: data_offset,
            deleted: flags & SECTOR_FLAG_DELETED != 0,
            crc_error: flags & SECTOR_FLAG_DATA_CRC != 0,
        })
    } else if flags & (SECTOR_FLAG_DELETED | SECTOR_FLAG_DATA_CRC) != 0 || data_offset != 0 {
        return Err(TrackError::parse(8, "Data block fields set without a data block"));
    } else {
        None
    };

    Ok(Sector {
        header_offset,
        id,
        header_crc_error: flags & SECTOR_FLAG_HEADER_CRC != 0,
        data,
    })
}

pub(crate) const SECTOR_FLAG_HEADER_CRC: u8 = 0x01;
pub(crate) const SECTOR_FLAG_HAS_DATA: u8 = 0x02;
pub(crate) const SECTOR_FLAG_DELETED: u8 = 0x04;
pub(crate) const SECTOR_FLAG_DATA_CRC: u8 = 0x08;
const SECTOR_FLAGS_MASK: u8 = 0x0F;

fn read_idam_list<R: Read>(reader: &mut R) -> Result<Vec<usize>> {
    let count = read_u32(reader)? as usize;
    // count is untrusted; let the entries themselves grow the list
    let mut idam = Vec::with_capacity(count.min(64));
    for _ in 0..count {
        idam.push(read_u32(reader)? as usize);
    }
    Ok(idam)
}

fn validate_idam(idam: &[usize], length: usize) -> Result<()> {
    if length == 0 {
        return Err(TrackError::invalid_format("Track length is zero"));
    }
    if let Some(i) = idam.windows(2).position(|w| w[0] >= w[1]) {
        return Err(TrackError::invalid_format(format!(
            "IDAM list not strictly ascending at entry {}",
            i + 1
        )));
    }
    if let Some(&last) = idam.last() {
        if last >= length {
            return Err(TrackError::InvalidPosition {
                position: last,
                length,
            });
        }
    }
    Ok(())
}

fn read_u8<R: Read>(reader: &mut R) -> Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive(version: u8, idam: &[u32], length: Option<u32>, data: &[u8]) -> Vec<u8> {
        let mut out = TRACK_ARCHIVE_SIGNATURE.to_vec();
        out.push(version);
        out.extend_from_slice(&(idam.len() as u32).to_le_bytes());
        for i in idam {
            out.extend_from_slice(&i.to_le_bytes());
        }
        if let Some(length) = length {
            out.extend_from_slice(&length.to_le_bytes());
        }
        out.extend_from_slice(data);
        out
    }

    #[test]
    fn test_read_v2() {
        let bytes = archive(2, &[1, 5], Some(8), &[0, 0xFE, 2, 3, 4, 0xFE, 6, 7]);
        let track = read_track(&mut bytes.as_slice()).unwrap();
        assert_eq!(track.len(), 8);
        assert_eq!(track.idam_offsets(), &[1, 5]);
        assert_eq!(track.read(5), 0xFE);
    }

    #[test]
    fn test_read_v1_forces_standard_length() {
        let data = vec![0xAB; STANDARD_TRACK_SIZE];
        let bytes = archive(1, &[100], None, &data);
        let track = read_track(&mut bytes.as_slice()).unwrap();
        assert_eq!(track.len(), STANDARD_TRACK_SIZE);
        assert_eq!(track.idam_offsets(), &[100]);
        assert!(track.raw_data().iter().all(|&b| b == 0xAB));
    }

    #[test]
    fn test_read_bad_magic() {
        let mut bytes = archive(2, &[], Some(4), &[0; 4]);
        bytes[0] = b'X';
        let result = read_track(&mut bytes.as_slice());
        assert!(matches!(result, Err(TrackError::InvalidFormat(_))));
    }

    #[test]
    fn test_read_unknown_version() {
        let bytes = archive(3, &[], Some(4), &[0; 4]);
        let result = read_track(&mut bytes.as_slice());
        assert!(matches!(result, Err(TrackError::UnsupportedVersion(3))));
    }

    #[test]
    fn test_read_truncated() {
        let bytes = archive(2, &[], Some(100), &[0; 40]);
        let result = read_track(&mut bytes.as_slice());
        assert!(matches!(result, Err(TrackError::ParseError { offset: 40, .. })));
    }

    #[test]
    fn test_read_rejects_bad_idam() {
        let bytes = archive(2, &[5, 5], Some(8), &[0; 8]);
        assert!(read_track(&mut bytes.as_slice()).is_err());

        let bytes = archive(2, &[9], Some(8), &[0; 8]);
        let result = read_track(&mut bytes.as_slice());
        assert!(matches!(result, Err(TrackError::InvalidPosition { position: 9, length: 8 })));

        let bytes = archive(2, &[], Some(0), &[]);
        assert!(read_track(&mut bytes.as_slice()).is_err());
    }

    #[test]
    fn test_read_sector_record() {
        let mut record = Vec::new();
        record.extend_from_slice(&100u32.to_le_bytes());
        record.extend_from_slice(&[1, 0, 3, 2]);
        record.push(SECTOR_FLAG_HAS_DATA | SECTOR_FLAG_DELETED);
        record.extend_from_slice(&145u32.to_le_bytes());

        let sector = read_sector(&mut record.as_slice()).unwrap();
        assert_eq!(sector.header_offset, 100);
        assert_eq!(sector.id, SectorId::new(1, 0, 3, 2));
        assert_eq!(sector.data_offset(), Some(145));
        assert!(sector.is_deleted());
        assert!(!sector.has_error());
    }

    #[test]
    fn test_read_sector_record_inconsistent() {
        let mut record = vec![0u8; SECTOR_RECORD_SIZE];
        record[8] = SECTOR_FLAG_DELETED;
        assert!(read_sector(&mut record.as_slice()).is_err());

        record[8] = 0x80;
        assert!(read_sector(&mut record.as_slice()).is_err());
    }
}
