// ABOUTME: Call forwarding reasons and per-class settings for AT+CCFC
// ABOUTME: Wire values follow GSM 07.07 section 7.10

use num_enum::IntoPrimitive;

/// Why a call should be (or is being) forwarded.
#[derive(IntoPrimitive)]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardingReason {
    Unconditional = 0,
    Busy = 1,
    NoReply = 2,
    NotReachable = 3,
    AllCalls = 4,
    AllConditional = 5,
}

/// One forwarding rule as reported by a `+CCFC:` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardingSetting {
    pub enabled: bool,
    /// Bearer class bitmask (1 voice, 2 data, 4 fax).
    pub class: u32,
    /// Forward-to number, present only when forwarding is enabled.
    pub number: Option<String>,
}
