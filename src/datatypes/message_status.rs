// ABOUTME: SMS storage status filter used by AT+CMGL listings in PDU mode
// ABOUTME: Numeric wire values per GSM 07.05 (text-mode listings use strings instead)

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Filter for listing stored messages, and the status reported per record.
#[derive(TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageStatus {
    #[default]
    Unread = 0,
    Read = 1,
    Unsent = 2,
    Sent = 3,
    All = 4,
}
