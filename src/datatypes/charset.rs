// ABOUTME: Character sets selectable by the SMS data-coding-scheme octet
// ABOUTME: Decoding degrades to Unknown on a malformed DCS instead of failing the record

use std::fmt;

/// Character set of an SMS payload, selected by the data-coding-scheme octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    /// GSM 03.38 7-bit default alphabet, bit-packed into octets.
    #[default]
    Gsm7,
    /// Big-endian UTF-16 (UCS-2 on the wire), two octets per code unit.
    Utf16,
    /// 8-bit user-defined data, returned raw.
    EightBit,
    /// The DCS octet was not one of the three known values. No safe body
    /// decoding exists, so the record keeps its already-decoded fields and
    /// the body stays empty.
    Unknown,
}

impl Charset {
    /// Map a data-coding-scheme octet to a charset. Never fails.
    pub fn from_dcs(dcs: u8) -> Charset {
        match dcs {
            0x00 => Charset::Gsm7,
            0x04 => Charset::EightBit,
            0x08 => Charset::Utf16,
            _ => Charset::Unknown,
        }
    }

    /// The data-coding-scheme octet for an encodable charset.
    pub fn to_dcs(self) -> u8 {
        match self {
            Charset::Gsm7 => 0x00,
            Charset::EightBit => 0x04,
            Charset::Utf16 => 0x08,
            Charset::Unknown => 0x00,
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Charset::Gsm7 => "gsm7",
            Charset::Utf16 => "utf16-be",
            Charset::EightBit => "8-bit",
            Charset::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_dcs_values_round_trip() {
        for charset in [Charset::Gsm7, Charset::EightBit, Charset::Utf16] {
            assert_eq!(Charset::from_dcs(charset.to_dcs()), charset);
        }
    }

    #[test]
    fn malformed_dcs_degrades_to_unknown() {
        assert_eq!(Charset::from_dcs(0xF5), Charset::Unknown);
    }
}
