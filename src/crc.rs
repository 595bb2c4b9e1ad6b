/// CRC-16/CCITT as written by MFM floppy controllers
///
/// Polynomial 0x1021, initial value 0xFFFF, MSB first, no final xor. The
/// three sync bytes and the mark byte that precede a header or data block are
/// part of the checksum, so [`Crc16::with_preamble`] can seed the remainder
/// without those bytes being read back from the track.

const POLY: u16 = 0x1021;

const TABLE: [u16; 256] = build_table();

const fn build_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u16) << 8;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLY
            } else {
                crc << 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

#[inline]
const fn fold(crc: u16, byte: u8) -> u16 {
    (crc << 8) ^ TABLE[((crc >> 8) as u8 ^ byte) as usize]
}

/// Running CRC remainder
///
/// A plain value: copy it, feed it in pieces, read it whenever. Folding a
/// byte sequence in two consecutive calls gives the same result as folding it
/// in one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc16 {
    crc: u16,
}

impl Crc16 {
    /// Create an engine with the standard initial remainder
    pub const fn new() -> Self {
        Self { crc: 0xFFFF }
    }

    /// Create an engine that has already processed `preamble`
    pub const fn with_preamble(preamble: &[u8]) -> Self {
        let mut crc = 0xFFFF;
        let mut i = 0;
        while i < preamble.len() {
            crc = fold(crc, preamble[i]);
            i += 1;
        }
        Self { crc }
    }

    /// Fold a single byte
    #[inline]
    pub fn update(&mut self, byte: u8) {
        self.crc = fold(self.crc, byte);
    }

    /// Fold a run of bytes
    pub fn update_slice(&mut self, bytes: &[u8]) {
        self.crc = bytes.iter().fold(self.crc, |crc, &b| fold(crc, b));
    }

    /// Current remainder
    #[inline]
    pub fn value(&self) -> u16 {
        self.crc
    }
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}
