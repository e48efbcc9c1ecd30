// ABOUTME: Call lifecycle states mapped from the AT+CLCC status digit
// ABOUTME: NoCall is synthesized when the modem reports no +CLCC line at all

use num_enum::TryFromPrimitive;
use std::fmt;

/// State of the current (single) call slot.
///
/// Wire values 0..=5 are the `<stat>` field of a `+CLCC:` response; the modem
/// never transmits [`CallState::NoCall`], it is what the absence of a `+CLCC:`
/// line means.
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Active = 0,
    Held = 1,
    Dialing = 2,
    Alerting = 3,
    Incoming = 4,
    Waiting = 5,
    NoCall = 6,
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallState::Active => "active",
            CallState::Held => "held",
            CallState::Dialing => "dialing",
            CallState::Alerting => "alerting",
            CallState::Incoming => "incoming",
            CallState::Waiting => "waiting",
            CallState::NoCall => "no call",
        };
        f.write_str(name)
    }
}
