/// Floppy Disk Controller (FDC) status register definitions
///
/// Based on the WD2793 type II (read/write sector) status register used by
/// MSX disk interfaces.

use std::fmt;

/// WD2793 status register after a type II command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Wd2793Status(pub u8);

impl Wd2793Status {
    /// Record Type (RT) - Bit 5
    /// Set when the sector was written with a deleted data mark
    pub const RECORD_TYPE: u8 = 0x20;

    /// Record Not Found (RNF) - Bit 4
    /// Set if the requested sector or its data mark cannot be found
    pub const RECORD_NOT_FOUND: u8 = 0x10;

    /// CRC Error - Bit 3
    /// Set when a CRC error occurs in either the ID field or data field
    pub const CRC_ERROR: u8 = 0x08;

    /// Create a new Wd2793Status from a raw byte
    #[inline]
    pub fn new(value: u8) -> Self {
        Wd2793Status(value)
    }

    /// Check if deleted data mark bit is set
    #[inline]
    pub fn is_deleted(&self) -> bool {
        (self.0 & Self::RECORD_TYPE) != 0
    }

    /// Check if record not found bit is set
    #[inline]
    pub fn record_not_found(&self) -> bool {
        (self.0 & Self::RECORD_NOT_FOUND) != 0
    }

    /// Check if CRC error bit is set
    #[inline]
    pub fn crc_error(&self) -> bool {
        (self.0 & Self::CRC_ERROR) != 0
    }

    /// Check if any error flag is set (excluding record type)
    #[inline]
    pub fn has_error(&self) -> bool {
        (self.0 & !Self::RECORD_TYPE) != 0
    }
}

impl fmt::Display for Wd2793Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            write!(f, "OK")?;
        } else {
            let mut flags = Vec::new();
            if self.is_deleted() {
                flags.push("RT");
            }
            if self.record_not_found() {
                flags.push("RNF");
            }
            if self.crc_error() {
                flags.push("CRC");
            }
            write!(f, "{}", flags.join("|"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_flags() {
        let st = Wd2793Status(Wd2793Status::CRC_ERROR | Wd2793Status::RECORD_TYPE);
        assert!(st.crc_error());
        assert!(st.is_deleted());
        assert!(!st.record_not_found());
        assert!(st.has_error());
    }

    #[test]
    fn test_deleted_is_not_error() {
        let st = Wd2793Status(Wd2793Status::RECORD_TYPE);
        assert!(st.is_deleted());
        assert!(!st.has_error());
    }

    #[test]
    fn test_status_display() {
        let st = Wd2793Status(Wd2793Status::RECORD_TYPE | Wd2793Status::CRC_ERROR);
        assert_eq!(st.to_string(), "RT|CRC");
        assert_eq!(Wd2793Status::default().to_string(), "OK");
        assert_eq!(Wd2793Status(Wd2793Status::RECORD_NOT_FOUND).to_string(), "RNF");
    }
}
