// ABOUTME: Modem session: start sequence, credential chain and the shared exchange helpers
// ABOUTME: Operation groups (info, sms, call, phonebook, forwarding, power) extend Session from sibling files

//! Session layer over the command/response engine.
//!
//! A [`Session`] owns the engine exclusively; there is no global state and no
//! background thread. Opening a session runs the start sequence: echo off,
//! verbose result codes, the SIM credential chain, then silencing every
//! unsolicited notification source so responses stay attributable to their
//! commands.

mod call;
mod forwarding;
mod info;
mod phonebook;
mod power;
mod sms;

use crate::channel::{ByteChannel, SerialChannel, SerialConfig};
use crate::datatypes::CredentialState;
use crate::engine::{Engine, Outcome, Request};
use crate::error::{ModemError, Result};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// SIM credentials the caller is willing to submit.
///
/// Only the credential matching the state the SIM actually reports is ever
/// sent; supplying all four costs nothing when the SIM asks for none.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub pin: Option<String>,
    pub puk: Option<String>,
    pub pin2: Option<String>,
    pub puk2: Option<String>,
}

impl Credentials {
    pub fn pin(mut self, pin: impl Into<String>) -> Self {
        self.pin = Some(pin.into());
        self
    }

    pub fn puk(mut self, puk: impl Into<String>) -> Self {
        self.puk = Some(puk.into());
        self
    }

    pub fn pin2(mut self, pin2: impl Into<String>) -> Self {
        self.pin2 = Some(pin2.into());
        self
    }

    pub fn puk2(mut self, puk2: impl Into<String>) -> Self {
        self.puk2 = Some(puk2.into());
        self
    }

    fn for_state(&self, state: CredentialState) -> Option<&str> {
        match state {
            CredentialState::NeedPin => self.pin.as_deref(),
            CredentialState::NeedPuk => self.puk.as_deref(),
            CredentialState::NeedPin2 => self.pin2.as_deref(),
            CredentialState::NeedPuk2 => self.puk2.as_deref(),
            CredentialState::Ready | CredentialState::Unknown => None,
        }
    }
}

/// Result of the start sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The SIM is unlocked; every operation is available.
    Ready,
    /// The SIM wants a credential the caller did not supply. The session is
    /// usable for operations that do not need the SIM (alive check, hardware
    /// queries); callers wanting full service should reopen with the
    /// credential filled in.
    AwaitingCredential(CredentialState),
}

/// Extra budget for credential submission; PUK verification can take the SIM
/// several seconds.
const CREDENTIAL_EXTRA: Duration = Duration::from_secs(10);

/// Upper bound on credential chain rounds. The longest legitimate chain is
/// PUK2 -> PIN2 -> PUK -> PIN -> READY; anything longer means the SIM is
/// reporting states in a loop.
const MAX_CREDENTIAL_ROUNDS: u32 = 8;

/// An open modem session.
pub struct Session<C: ByteChannel> {
    engine: Engine<C>,
    reference: u8,
}

impl Session<SerialChannel> {
    /// Open the serial port and construct a session. The start sequence is a
    /// separate step so tests and callers can script it.
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let channel = SerialChannel::open(config)?;
        Ok(Session::with_channel(channel, config.read_timeout))
    }
}

impl<C: ByteChannel> Session<C> {
    pub fn with_channel(channel: C, base_timeout: Duration) -> Self {
        // The multipart reference only needs to differ between consecutive
        // messages; seeding from the clock avoids always starting at zero.
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_millis() as u8)
            .unwrap_or(0);
        Session {
            engine: Engine::new(channel, base_timeout),
            reference: seed,
        }
    }

    /// Run the start sequence: `ATE0`, `ATV1`, the credential chain, then
    /// disable unsolicited notifications.
    pub fn start(&mut self, credentials: &Credentials) -> Result<StartOutcome> {
        // Echo and verbose mode are best-effort: a modem already configured
        // this way may answer oddly to the echo toggle itself.
        self.quiet_command("ATE0")?;
        self.quiet_command("ATV1")?;

        let outcome = self.unlock_sim(credentials)?;
        if outcome == StartOutcome::Ready {
            self.disable_unsolicited()?;
        }
        Ok(outcome)
    }

    fn unlock_sim(&mut self, credentials: &Credentials) -> Result<StartOutcome> {
        for _ in 0..MAX_CREDENTIAL_ROUNDS {
            let state = self.credential_state()?;
            tracing::debug!(%state, "SIM credential state");
            match state {
                CredentialState::Ready => return Ok(StartOutcome::Ready),
                CredentialState::Unknown => unreachable!("mapped in credential_state"),
                needed => {
                    let Some(value) = credentials.for_state(needed) else {
                        tracing::warn!(state = %needed, "credential not supplied, SIM stays locked");
                        return Ok(StartOutcome::AwaitingCredential(needed));
                    };
                    self.submit_credential(needed, value)?;
                }
            }
        }
        tracing::warn!("credential chain did not converge");
        Err(ModemError::Rejected)
    }

    /// Query the SIM's current credential requirement. Always asked fresh,
    /// never cached: the state can change out of band.
    pub fn credential_state(&mut self) -> Result<CredentialState> {
        let line = self.single_line("AT+CPIN?", "+CPIN: ")?;
        let token = line.trim_start_matches("+CPIN: ");
        match CredentialState::from_cpin_token(token) {
            CredentialState::Unknown => {
                Err(ModemError::UnknownCredentialState(token.to_owned()))
            }
            state => Ok(state),
        }
    }

    fn submit_credential(&mut self, state: CredentialState, value: &str) -> Result<()> {
        let request = Request::new(format!("AT+CPIN={value}")).extra_timeout(CREDENTIAL_EXTRA);
        match self.engine.send_and_await_token(&request)? {
            Outcome::Success => Ok(()),
            // Never retried: a second wrong submission burns another attempt
            // toward a SIM lockout.
            Outcome::ErrorToken => Err(ModemError::CredentialRejected(state)),
            Outcome::Timeout => Err(ModemError::Timeout),
        }
    }

    /// Silence every unsolicited notification source. Responses must stay
    /// attributable to the command that caused them; the only place
    /// unsolicited lines are welcome is the low-power wait.
    pub(crate) fn disable_unsolicited(&mut self) -> Result<()> {
        self.quiet_command("AT+CLIP=0")?;
        self.quiet_command("AT+CNMI=0,0")?;
        self.quiet_command("AT^SCTM=0")?;
        self.quiet_command("AT+CALA=\"\"")?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn set_reference(&mut self, reference: u8) {
        self.reference = reference;
    }

    /// Next multipart reference, a wrapping counter per session.
    pub(crate) fn next_reference(&mut self) -> u8 {
        self.reference = self.reference.wrapping_add(1);
        self.reference
    }

    pub(crate) fn engine(&mut self) -> &mut Engine<C> {
        &mut self.engine
    }

    /// Send a command expecting a bare `OK`; map the outcome to the error
    /// taxonomy.
    pub(crate) fn simple_command(&mut self, command: &str) -> Result<()> {
        self.simple_request(&Request::new(command))
    }

    pub(crate) fn simple_request(&mut self, request: &Request) -> Result<()> {
        match self.engine.send_and_await_token(request)? {
            Outcome::Success => Ok(()),
            Outcome::ErrorToken => Err(ModemError::Rejected),
            Outcome::Timeout => Err(ModemError::Timeout),
        }
    }

    /// Send a command whose failure is tolerable; log and move on.
    pub(crate) fn quiet_command(&mut self, command: &str) -> Result<()> {
        match self.engine.send_and_await_token(&Request::new(command))? {
            Outcome::Success => {}
            outcome => tracing::warn!(command, ?outcome, "setup command not confirmed"),
        }
        Ok(())
    }

    /// Send a query answered by one line containing `marker` followed by a
    /// trailing `OK`, and drain that token before returning the line.
    pub(crate) fn single_line(&mut self, command: &str, marker: &str) -> Result<String> {
        let request = Request::new(command);
        match self.engine.send_and_await_line_containing(&request, marker)? {
            Some(line) => {
                self.engine.drain_token()?;
                Ok(line)
            }
            None => Err(ModemError::Timeout),
        }
    }

    /// Send a query and collect its informative lines up to the final `OK`.
    pub(crate) fn collect_lines(&mut self, request: &Request) -> Result<Vec<String>> {
        match self.engine.send_and_collect_until(request)? {
            (Outcome::Success, lines) => Ok(lines),
            (Outcome::ErrorToken, _) => Err(ModemError::Rejected),
            (Outcome::Timeout, _) => Err(ModemError::Timeout),
        }
    }
}
