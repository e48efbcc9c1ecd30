// ABOUTME: Error types for modem operations, distinguishing transient from fatal failures
// ABOUTME: Timeouts are retryable, explicit modem rejections and credential failures are not

use crate::datatypes::CredentialState;
use std::io;
use thiserror::Error;

/// Error type for modem operations.
///
/// The taxonomy deliberately separates a silent modem ([`ModemError::Timeout`],
/// potentially transient, safe to retry) from an explicit rejection
/// ([`ModemError::Rejected`], not safe to blindly retry). Malformed but
/// otherwise useful responses are not errors at all: the affected field is
/// returned as a sentinel/default and logged at warning level.
#[derive(Debug, Error)]
pub enum ModemError {
    /// No matching response line arrived within the timeout budget.
    #[error("modem did not answer within the timeout budget")]
    Timeout,

    /// The modem answered with its error token (e.g. `ERROR`).
    #[error("modem rejected the command")]
    Rejected,

    /// A submitted PIN/PUK was rejected. Fatal to session start: retrying a
    /// rejected credential risks locking the SIM.
    #[error("SIM rejected the supplied credential for state {0:?}")]
    CredentialRejected(CredentialState),

    /// `AT+CPIN?` answered with a token this driver does not recognize.
    /// Continuing would silently skip required authentication.
    #[error("unrecognized SIM credential state: {0:?}")]
    UnknownCredentialState(String),

    /// The requested wake trigger set is not usable (empty, or a too-short
    /// timer as the only escape from low-power mode).
    #[error("invalid low-power wake triggers: {0}")]
    InvalidTriggers(&'static str),

    /// The message cannot be encoded as a PDU (e.g. phone number too long).
    #[error("message cannot be encoded: {0}")]
    Unencodable(&'static str),

    /// The serial port could not be opened or configured.
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// I/O failure on the byte channel. Fatal to the session.
    #[error("channel error: {0}")]
    Channel(#[from] io::Error),
}

/// Result type alias for modem operations.
pub type Result<T> = std::result::Result<T, ModemError>;

impl ModemError {
    /// True for failures that a caller may reasonably retry.
    ///
    /// An explicit `ERROR` from the modem is not a transient condition and is
    /// excluded on purpose.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ModemError::Timeout)
    }
}
