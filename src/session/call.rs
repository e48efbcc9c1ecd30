// ABOUTME: Voice call control: state query, dial, redial, pick up, hang up, duration counters

use super::Session;
use crate::channel::ByteChannel;
use crate::datatypes::CallState;
use crate::engine::Request;
use crate::error::{ModemError, Result};
use std::time::Duration;

/// Call setup can outlast the base budget while the network alerts the
/// remote party.
const DIAL_EXTRA: Duration = Duration::from_secs(10);

impl<C: ByteChannel> Session<C> {
    /// Current call state and the remote number, if any.
    ///
    /// The modem reports nothing at all when no call exists; that absence is
    /// mapped to [`CallState::NoCall`] with an empty number.
    pub fn call_state(&mut self) -> Result<(CallState, String)> {
        let lines = self.collect_lines(&Request::new("AT+CLCC"))?;
        let Some(line) = lines.iter().find(|l| l.starts_with("+CLCC: ")) else {
            return Ok((CallState::NoCall, String::new()));
        };

        let fields: Vec<&str> = line.trim_start_matches("+CLCC: ").split(',').collect();
        let state = fields
            .get(2)
            .and_then(|v| v.trim().parse::<u8>().ok())
            .and_then(|v| CallState::try_from(v).ok());
        let Some(state) = state else {
            tracing::warn!(%line, "unparseable +CLCC status field");
            return Ok((CallState::NoCall, String::new()));
        };
        let number = fields
            .get(5)
            .map(|v| v.trim().trim_matches('"').to_owned())
            .unwrap_or_default();
        Ok((state, number))
    }

    /// Dial `number` as a voice call. Any call in progress is hung up first;
    /// the modem cannot hold a second call slot.
    pub fn dial(&mut self, number: &str) -> Result<()> {
        self.hang_up()?;
        self.simple_request(&Request::new(format!("ATD{number};")).extra_timeout(DIAL_EXTRA))
    }

    /// Redial the last dialed number.
    pub fn redial(&mut self) -> Result<()> {
        self.hang_up()?;
        self.simple_request(&Request::new("ATDL;").extra_timeout(DIAL_EXTRA))
    }

    /// Answer an incoming call.
    pub fn pick_up(&mut self) -> Result<()> {
        self.simple_request(&Request::new("ATA").extra_timeout(DIAL_EXTRA))
    }

    /// End the current call. `AT+CHUP` only terminates calls in defined
    /// states; `ATH` is the blunt fallback that also aborts call setup.
    pub fn hang_up(&mut self) -> Result<()> {
        match self.simple_command("AT+CHUP") {
            Ok(()) => Ok(()),
            Err(e) if e.is_retryable() || matches!(e, ModemError::Rejected) => {
                tracing::debug!("AT+CHUP not accepted, falling back to ATH");
                self.simple_command("ATH")
            }
            Err(e) => Err(e),
        }
    }

    /// Duration of the last call in seconds, or `None` when the counter line
    /// cannot be parsed.
    pub fn last_call_duration_secs(&mut self) -> Result<Option<u32>> {
        let line = self.single_line("AT^SLCD", "^SLCD: ")?;
        Ok(parse_duration(&line, "^SLCD: "))
    }

    /// Accumulated duration of all calls in seconds.
    pub fn total_call_duration_secs(&mut self) -> Result<Option<u32>> {
        let line = self.single_line("AT^STCD", "^STCD: ")?;
        Ok(parse_duration(&line, "^STCD: "))
    }
}

/// Parse an `hh:mm:ss` duration counter line.
fn parse_duration(line: &str, prefix: &str) -> Option<u32> {
    let parts: Vec<u32> = line
        .trim_start_matches(prefix)
        .trim()
        .split(':')
        .filter_map(|p| p.parse().ok())
        .collect();
    match parts.as_slice() {
        [h, m, s] => Some(h * 3600 + m * 60 + s),
        _ => {
            tracing::warn!(%line, "unparseable call duration counter");
            None
        }
    }
}
