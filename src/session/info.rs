// ABOUTME: Identity, network and clock queries: alive check, IMEI/IMSI, signal, operator, CCLK

use super::Session;
use crate::channel::ByteChannel;
use crate::engine::Request;
use crate::error::{ModemError, Result};
use chrono::NaiveDateTime;

/// RSSI value the modem reports when the signal is unknown or undetectable.
const RSSI_UNKNOWN: i32 = 99;

impl<C: ByteChannel> Session<C> {
    /// True when the modem answers `AT` with `OK`. Swallows timeouts and
    /// rejections; transport failures still propagate.
    pub fn is_alive(&mut self) -> Result<bool> {
        match self.simple_command("AT") {
            Ok(()) => Ok(true),
            Err(ModemError::Timeout | ModemError::Rejected) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn manufacturer(&mut self) -> Result<String> {
        self.bare_query("AT+CGMI")
    }

    pub fn model(&mut self) -> Result<String> {
        self.bare_query("AT+CGMM")
    }

    pub fn revision(&mut self) -> Result<String> {
        self.bare_query("AT+CGMR")
    }

    pub fn imei(&mut self) -> Result<String> {
        self.bare_query("AT+CGSN")
    }

    pub fn imsi(&mut self) -> Result<String> {
        self.bare_query("AT+CIMI")
    }

    /// Restore the manufacturer configuration profile.
    pub fn reset_to_factory(&mut self) -> Result<()> {
        self.simple_command("AT&F0")
    }

    /// Received signal strength in dBm, or `None` when the modem reports it
    /// as unknown.
    pub fn signal_strength_dbm(&mut self) -> Result<Option<i32>> {
        let line = self.single_line("AT+CSQ", "+CSQ: ")?;
        let rssi = line
            .trim_start_matches("+CSQ: ")
            .split(',')
            .next()
            .and_then(|v| v.trim().parse::<i32>().ok());
        match rssi {
            Some(v) if v >= 0 && v != RSSI_UNKNOWN => Ok(Some(2 * v - 113)),
            Some(_) => Ok(None),
            None => {
                tracing::warn!(%line, "unparseable +CSQ response");
                Ok(None)
            }
        }
    }

    /// Name of the currently registered network operator. An empty string
    /// means the modem is not registered or answered malformed.
    pub fn operator_name(&mut self) -> Result<String> {
        // Select long alphanumeric format first; a modem that rejects the
        // selection still answers the query in whatever format it has.
        self.quiet_command("AT+COPS=3,0")?;
        let line = self.single_line("AT+COPS?", "+COPS: ")?;
        match quoted_field(&line) {
            Some(name) => Ok(name),
            None => {
                tracing::warn!(%line, "no operator name in +COPS response");
                Ok(String::new())
            }
        }
    }

    /// The operator name table stored on the module, as (numeric, name) pairs.
    pub fn stored_operators(&mut self) -> Result<Vec<(String, String)>> {
        let lines = self.collect_lines(&Request::new("AT+COPN"))?;
        let mut operators = Vec::with_capacity(lines.len());
        for line in &lines {
            let mut quoted = line.split('"').skip(1).step_by(2);
            match (quoted.next(), quoted.next()) {
                (Some(code), Some(name)) => {
                    operators.push((code.to_owned(), name.to_owned()));
                }
                _ => tracing::warn!(%line, "skipping malformed +COPN line"),
            }
        }
        Ok(operators)
    }

    /// The modem's clock in its native `yy/MM/dd,hh:mm:ss` form.
    pub fn clock(&mut self) -> Result<String> {
        let line = self.single_line("AT+CCLK?", "+CCLK: ")?;
        match quoted_field(&line) {
            Some(stamp) => Ok(stamp),
            None => {
                tracing::warn!(%line, "no timestamp in +CCLK response");
                Ok(String::new())
            }
        }
    }

    /// Set the modem's clock. `stamp` must be `yy/MM/dd,hh:mm:ss`.
    pub fn set_clock(&mut self, stamp: &str) -> Result<()> {
        self.simple_command(&format!("AT+CCLK=\"{stamp}\""))
    }

    /// The modem clock parsed for arithmetic; the wake alarm is computed
    /// against this, never against the host clock.
    pub(crate) fn modem_datetime(&mut self) -> Result<NaiveDateTime> {
        let stamp = self.clock()?;
        // A zone suffix (e.g. "+04") may trail the seconds; ignore it.
        let head = stamp.get(..17).unwrap_or(&stamp);
        NaiveDateTime::parse_from_str(head, "%y/%m/%d,%H:%M:%S").map_err(|e| {
            tracing::warn!(%stamp, error = %e, "unparseable modem clock");
            ModemError::Rejected
        })
    }

    /// Temperature state per `AT^SCTM?`: -1 below range, 0 normal, 1 above.
    /// `None` when the response cannot be parsed.
    pub fn temperature_status(&mut self) -> Result<Option<i8>> {
        let line = self.single_line("AT^SCTM?", "^SCTM: ")?;
        let status = line
            .trim_start_matches("^SCTM: ")
            .split(',')
            .nth(1)
            .and_then(|v| v.trim().parse::<i8>().ok());
        if status.is_none() {
            tracing::warn!(%line, "unparseable ^SCTM response");
        }
        Ok(status)
    }

    /// Query answered by one informative line with no prefix of its own
    /// (identity commands echo just the value).
    fn bare_query(&mut self, command: &str) -> Result<String> {
        let lines = self.collect_lines(&Request::new(command))?;
        match lines.into_iter().next() {
            Some(line) => Ok(line),
            None => {
                tracing::warn!(command, "no informative line before OK");
                Ok(String::new())
            }
        }
    }
}

/// First double-quoted field of a response line.
fn quoted_field(line: &str) -> Option<String> {
    let mut parts = line.split('"');
    parts.next()?;
    parts.next().map(str::to_owned)
}
