// ABOUTME: Call forwarding rules over AT+CCFC: query per reason, register, erase

use super::Session;
use crate::channel::ByteChannel;
use crate::datatypes::{ForwardingReason, ForwardingSetting, TypeOfNumber};
use crate::engine::Request;
use crate::error::Result;
use std::time::Duration;

/// Forwarding changes round-trip to the network, not just the modem.
const NETWORK_EXTRA: Duration = Duration::from_secs(10);

impl<C: ByteChannel> Session<C> {
    /// Current forwarding rules for `reason`, one line per bearer class.
    pub fn forwarding_status(&mut self, reason: ForwardingReason) -> Result<Vec<ForwardingSetting>> {
        let command = format!("AT+CCFC={},2", u8::from(reason));
        let lines = self.collect_lines(&Request::new(command).extra_timeout(NETWORK_EXTRA))?;
        let mut settings = Vec::with_capacity(lines.len());
        for line in &lines {
            match parse_ccfc(line) {
                Some(setting) => settings.push(setting),
                None => tracing::warn!(%line, "skipping malformed +CCFC line"),
            }
        }
        Ok(settings)
    }

    /// Register forwarding of `reason` calls to `number`.
    pub fn enable_forwarding(&mut self, reason: ForwardingReason, number: &str) -> Result<()> {
        let ton = TypeOfNumber::for_number(number);
        let digits = number.strip_prefix('+').unwrap_or(number);
        let command = format!(
            "AT+CCFC={},3,\"{digits}\",{}",
            u8::from(reason),
            u8::from(ton)
        );
        self.simple_request(&Request::new(command).extra_timeout(NETWORK_EXTRA))
    }

    /// Erase the forwarding rule for `reason`.
    pub fn disable_forwarding(&mut self, reason: ForwardingReason) -> Result<()> {
        let command = format!("AT+CCFC={},4", u8::from(reason));
        self.simple_request(&Request::new(command).extra_timeout(NETWORK_EXTRA))
    }
}

/// Parse `+CCFC: <status>,<class>[,"<number>",<type>]`.
fn parse_ccfc(line: &str) -> Option<ForwardingSetting> {
    let mut fields = line.trim_start_matches("+CCFC: ").split(',');
    let enabled = fields.next()?.trim().parse::<u8>().ok()? == 1;
    let class = fields.next()?.trim().parse().ok()?;
    let number = fields.next().map(|v| {
        let digits = v.trim().trim_matches('"');
        let ton = fields
            .next()
            .and_then(|t| t.trim().parse::<u8>().ok())
            .map(TypeOfNumber::from)
            .unwrap_or_default();
        if ton.is_international() && !digits.starts_with('+') {
            format!("+{digits}")
        } else {
            digits.to_owned()
        }
    });
    Some(ForwardingSetting {
        enabled,
        class,
        number,
    })
}
