/// Raw track archive writer

use crate::error::{Result, TrackError};
use crate::format::constants::*;
use crate::image::{RawTrack, Sector};
use crate::io::reader::{
    SECTOR_FLAG_DATA_CRC, SECTOR_FLAG_DELETED, SECTOR_FLAG_HAS_DATA, SECTOR_FLAG_HEADER_CRC,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a raw track archive to disk
pub fn write_track_file<P: AsRef<Path>>(track: &RawTrack, path: P) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_track(&mut file, track)?;
    file.flush()?;
    Ok(())
}

/// Write a raw track archive in the current version
pub fn write_track<W: Write>(writer: &mut W, track: &RawTrack) -> Result<()> {
    write_track_version(writer, track, TRACK_ARCHIVE_VERSION)
}

/// Write a raw track archive in a specific version
///
/// Version 1 has no length field and can only hold
/// [`STANDARD_TRACK_SIZE`] byte tracks.
pub fn write_track_version<W: Write>(writer: &mut W, track: &RawTrack, version: u8) -> Result<()> {
    match version {
        1 if track.len() != STANDARD_TRACK_SIZE => {
            return Err(TrackError::invalid_format(format!(
                "Version 1 archives hold {} byte tracks, not {}",
                STANDARD_TRACK_SIZE,
                track.len()
            )));
        }
        1 | 2 => {}
        v => return Err(TrackError::UnsupportedVersion(v)),
    }

    log::debug!(
        "Writing v{} track archive: {} bytes, {} headers",
        version,
        track.len(),
        track.idam.len()
    );

    writer.write_all(TRACK_ARCHIVE_SIGNATURE)?;
    writer.write_all(&[version])?;

    writer.write_all(&to_u32(track.idam.len())?.to_le_bytes())?;
    for &i in &track.idam {
        writer.write_all(&to_u32(i)?.to_le_bytes())?;
    }

    if version >= 2 {
        writer.write_all(&to_u32(track.len())?.to_le_bytes())?;
    }

    writer.write_all(&track.data)?;
    Ok(())
}

/// Write a sector record
pub fn write_sector<W: Write>(writer: &mut W, sector: &Sector) -> Result<()> {
    let mut record = [0u8; SECTOR_RECORD_SIZE];
    record[0..4].copy_from_slice(&to_u32(sector.header_offset)?.to_le_bytes());
    record[4] = sector.id.track;
    record[5] = sector.id.head;
    record[6] = sector.id.sector;
    record[7] = sector.id.size_code;

    let mut flags = 0;
    if sector.header_crc_error {
        flags |= SECTOR_FLAG_HEADER_CRC;
    }
    if let Some(data) = sector.data {
        flags |= SECTOR_FLAG_HAS_DATA;
        if data.deleted {
            flags |= SECTOR_FLAG_DELETED;
        }
        if data.crc_error {
            flags |= SECTOR_FLAG_DATA_CRC;
        }
        record[9..13].copy_from_slice(&to_u32(data.offset)?.to_le_bytes());
    }
    record[8] = flags;

    writer.write_all(&record)?;
    Ok(())
}

fn to_u32(value: usize) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| TrackError::invalid_format(format!("Value {} does not fit in 32 bits", value)))
}
