// ABOUTME: SIM credential states reported by AT+CPIN? and their protocol-boundary parsing
// ABOUTME: Parse-don't-validate: the raw token is converted once, call sites match on the enum

use std::fmt;

/// The SIM's current credential requirement.
///
/// Queried fresh before every dependent operation and never cached across a
/// session: the physical SIM can change state out of band (a wrong entry
/// elsewhere turns a PIN requirement into a PUK requirement).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialState {
    /// No credential outstanding; the SIM is usable.
    Ready,
    NeedPin,
    NeedPuk,
    NeedPin2,
    NeedPuk2,
    /// The modem answered but the token was not recognized. Treated as a
    /// fatal session-start condition, distinct from a legitimate state.
    Unknown,
}

impl CredentialState {
    /// Parse the payload of a `+CPIN: <token>` response line.
    pub fn from_cpin_token(token: &str) -> CredentialState {
        // Order matters: "SIM PIN" is a prefix of "SIM PIN2".
        match token.trim() {
            "READY" => CredentialState::Ready,
            "SIM PIN2" => CredentialState::NeedPin2,
            "SIM PUK2" => CredentialState::NeedPuk2,
            "SIM PIN" => CredentialState::NeedPin,
            "SIM PUK" => CredentialState::NeedPuk,
            _ => CredentialState::Unknown,
        }
    }
}

impl fmt::Display for CredentialState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CredentialState::Ready => "ready",
            CredentialState::NeedPin => "PIN required",
            CredentialState::NeedPuk => "PUK required",
            CredentialState::NeedPin2 => "PIN2 required",
            CredentialState::NeedPuk2 => "PUK2 required",
            CredentialState::Unknown => "unknown",
        };
        f.write_str(name)
    }
}
