// ABOUTME: Decoded short-message records with optional header and multipart reassembly info
// ABOUTME: A multipart record holds only its own slice; reassembly across parts is the caller's job

use crate::datatypes::{Charset, MessageStatus, SmsTimestamp, TypeOfNumber};

/// Optional User Data Header carried inside the message payload.
///
/// Only the first information element is retained; the concatenation element
/// (IEI 0x00 or 0x08) is additionally parsed into [`MultipartInfo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDataHeader {
    pub iei: u8,
    pub ie_data: Vec<u8>,
}

/// Reassembly coordinates of one part of a concatenated message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultipartInfo {
    /// Reference shared by every part of the same message (8-bit for IEI 0x00,
    /// 16-bit for IEI 0x08). Collisions between unrelated messages only
    /// degrade reassembly, never corrupt data.
    pub reference: u16,
    /// 1-based index of this part.
    pub part_index: u8,
    pub part_count: u8,
}

/// One decoded short message as stored on the modem.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SmsRecord {
    /// Storage index, usable with the delete operation.
    pub index: u32,
    pub status: MessageStatus,
    /// Sender (or recipient, for outgoing records) phone number. International
    /// numbers carry a synthesized leading `+`.
    pub number: String,
    pub number_type: TypeOfNumber,
    pub timestamp: SmsTimestamp,
    pub charset: Charset,
    /// Decoded text; empty when the charset is unknown or the payload is
    /// 8-bit binary.
    pub body: String,
    /// The raw hexadecimal user data as received, kept for callers needing
    /// full fidelity.
    pub raw_body: String,
    pub header: Option<UserDataHeader>,
    pub multipart: Option<MultipartInfo>,
}

impl SmsRecord {
    /// True when this record is one slice of a concatenated message.
    pub fn is_part(&self) -> bool {
        self.multipart.is_some()
    }
}
