// ABOUTME: Crate root for the TC35 GSM modem driver: channel, engine, datatypes, PDU codec, session
// ABOUTME: Re-exports the session API and the standalone codec entry points

//! Driver for Siemens TC35/TC35i class GSM modules over a serial AT-command
//! link: session management with SIM credential handling, SMS in PDU mode
//! (encode, decode, multipart), voice call control, phonebook and call
//! forwarding access, and a low-power sleep mode with selectable wake
//! triggers.
//!
//! Everything is single-threaded and blocking; a [`Session`] owns its channel
//! exclusively and speaks strict request-then-response.
//!
//! # Examples
//!
//! ```rust,no_run
//! use tc35::{Credentials, SerialConfig, Session, StartOutcome};
//!
//! fn main() -> tc35::Result<()> {
//!     let config = SerialConfig::new("/dev/ttyUSB0");
//!     let mut session = Session::open(&config)?;
//!     match session.start(&Credentials::default().pin("1234"))? {
//!         StartOutcome::Ready => {}
//!         StartOutcome::AwaitingCredential(state) => {
//!             eprintln!("SIM still locked: {state}");
//!             return Ok(());
//!         }
//!     }
//!
//!     println!("operator: {}", session.operator_name()?);
//!     session.send_sms("+33601020304", "Hello from Rust")?;
//!     Ok(())
//! }
//! ```
//!
//! The PDU codec is pure and usable without any hardware:
//!
//! ```rust
//! let parts = tc35::pdu::encode_sms_submit("+33601020304", "Hi", 0x2A).unwrap();
//! assert!(parts[0].hex.starts_with("00012A"));
//! ```

pub mod channel;
pub mod datatypes;
pub mod engine;
pub mod error;
pub mod pdu;
pub mod session;

#[cfg(test)]
mod tests;

pub use channel::{ByteChannel, SerialChannel, SerialConfig};
pub use datatypes::{
    CallState, Charset, CredentialState, ForwardingReason, ForwardingSetting, MessageStatus,
    PhonebookEntry, SmsRecord, WakeReason, WakeTriggers,
};
pub use error::{ModemError, Result};
pub use session::{Credentials, Session, StartOutcome};
