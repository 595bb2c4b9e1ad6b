/// Builder for laying out formatted raw tracks

use crate::crc::Crc16;
use crate::error::{Result, TrackError};
use crate::format::constants::*;
use crate::format::TrackLayout;
use crate::image::{RawTrack, SectorId};

/// One sector to be written by [`TrackBuilder`]
///
/// Besides normal sectors this can describe the malformed ones copy
/// protections rely on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorTemplate {
    /// Header fields
    pub id: SectorId,
    /// Payload, padded with the layout filler or cut to the size code length
    pub payload: Vec<u8>,
    /// Write a deleted data mark instead of a normal one
    pub deleted: bool,
    /// Write a wrong header CRC
    pub bad_header_crc: bool,
    /// Write a wrong data CRC
    pub bad_data_crc: bool,
    /// Write the header only, leaving gap where the data block would be
    pub header_only: bool,
}

impl SectorTemplate {
    /// Create a template with an empty payload (filled at build time)
    pub fn new(id: SectorId) -> Self {
        Self::with_payload(id, Vec::new())
    }

    /// Create a template with specific payload
    pub fn with_payload(id: SectorId, payload: Vec<u8>) -> Self {
        Self {
            id,
            payload,
            deleted: false,
            bad_header_crc: false,
            bad_data_crc: false,
            header_only: false,
        }
    }

    /// Use a deleted data mark
    pub fn deleted(mut self) -> Self {
        self.deleted = true;
        self
    }

    /// Corrupt the header CRC
    pub fn bad_header_crc(mut self) -> Self {
        self.bad_header_crc = true;
        self
    }

    /// Corrupt the data CRC
    pub fn bad_data_crc(mut self) -> Self {
        self.bad_data_crc = true;
        self
    }

    /// Leave out the data block
    pub fn header_only(mut self) -> Self {
        self.header_only = true;
        self
    }
}

/// Builder for constructing raw tracks
pub struct TrackBuilder {
    layout: TrackLayout,
    sectors: Vec<SectorTemplate>,
}

impl TrackBuilder {
    /// Create a new builder with the MSX double density layout and no sectors
    pub fn new() -> Self {
        Self {
            layout: TrackLayout::msx_double_density(),
            sectors: Vec::new(),
        }
    }

    /// Set the track layout
    pub fn layout(mut self, layout: TrackLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the raw track length
    pub fn track_length(mut self, track_length: usize) -> Self {
        self.layout.track_length = track_length;
        self
    }

    /// Set the gap between header and data block
    pub fn gap2(mut self, gap2: usize) -> Self {
        self.layout.gap2 = gap2;
        self
    }

    /// Set the gap after each data block
    pub fn gap3(mut self, gap3: usize) -> Self {
        self.layout.gap3 = gap3;
        self
    }

    /// Append a sector
    pub fn sector(mut self, sector: SectorTemplate) -> Self {
        self.sectors.push(sector);
        self
    }

    /// Append the full set of sectors the layout describes for `track`/`head`
    pub fn format(mut self, track: u8, head: u8) -> Self {
        for sector in self.layout.sector_order() {
            let id = SectorId::new(track, head, sector, self.layout.size_code);
            self.sectors.push(SectorTemplate::new(id));
        }
        self
    }

    /// Bytes the track content will occupy
    pub fn bytes_required(&self) -> usize {
        let mark = self.layout.sync_length + SYNC_COUNT + 1;
        let sectors: usize = self
            .sectors
            .iter()
            .map(|s| {
                let header = mark + 4 + 2 + self.layout.gap2;
                let data = if s.header_only {
                    0
                } else {
                    mark + s.id.size_bytes() + 2
                };
                header + data + self.layout.gap3
            })
            .sum();
        self.layout.preamble_bytes() + sectors
    }

    /// Build the track
    pub fn build(self) -> Result<RawTrack> {
        let length = self.layout.track_length;
        let required = self.bytes_required();
        if length == 0 || required > length {
            return Err(TrackError::TrackOverflow { required, length });
        }

        let mut writer = TrackWriter {
            track: RawTrack::new(length),
            pos: 0,
        };
        let layout = &self.layout;

        writer.fill(GAP_BYTE, layout.gap4a);
        writer.fill(0x00, layout.sync_length);
        writer.fill(INDEX_SYNC_BYTE, SYNC_COUNT);
        writer.put(INDEX_MARK);
        writer.fill(GAP_BYTE, layout.gap1);

        for sector in &self.sectors {
            writer.fill(0x00, layout.sync_length);
            writer.fill(SYNC_BYTE, SYNC_COUNT);
            writer.put_idam();
            let id = sector.id;
            writer.put_slice(&[id.track, id.head, id.sector, id.size_code]);
            let mut crc = Crc16::with_preamble(&HEADER_PREAMBLE);
            crc.update_slice(&[id.track, id.head, id.sector, id.size_code]);
            writer.put_crc(crc.value(), sector.bad_header_crc);
            writer.fill(GAP_BYTE, layout.gap2);

            if !sector.header_only {
                let mark = if sector.deleted {
                    DELETED_DATA_MARK
                } else {
                    DATA_MARK
                };
                writer.fill(0x00, layout.sync_length);
                writer.fill(SYNC_BYTE, SYNC_COUNT);
                writer.put(mark);

                let mut payload = sector.payload.clone();
                payload.resize(id.size_bytes(), layout.filler_byte);
                writer.put_slice(&payload);

                let mut crc = Crc16::with_preamble(&DATA_PREAMBLE);
                crc.update(mark);
                crc.update_slice(&payload);
                writer.put_crc(crc.value(), sector.bad_data_crc);
            }

            writer.fill(GAP_BYTE, layout.gap3);
        }

        log::debug!(
            "Built {} byte track with {} sectors ({} bytes used)",
            length,
            self.sectors.len(),
            writer.pos
        );

        Ok(writer.track)
    }
}

impl Default for TrackBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Sequential writer over a track
struct TrackWriter {
    track: RawTrack,
    pos: usize,
}

impl TrackWriter {
    fn put(&mut self, value: u8) {
        self.track.write(self.pos as isize, value, false);
        self.pos += 1;
    }

    fn put_idam(&mut self) {
        self.track.write(self.pos as isize, ID_ADDRESS_MARK, true);
        self.pos += 1;
    }

    fn put_slice(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.put(b);
        }
    }

    fn fill(&mut self, value: u8, count: usize) {
        for _ in 0..count {
            self.put(value);
        }
    }

    fn put_crc(&mut self, crc: u16, corrupt: bool) {
        let crc = if corrupt { !crc } else { crc };
        self.put_slice(&crc.to_be_bytes());
    }
}
