// ABOUTME: SMS operations in PDU mode: send (with multipart split), list/decode, delete

use super::Session;
use crate::channel::ByteChannel;
use crate::datatypes::{MessageStatus, SmsRecord};
use crate::engine::Request;
use crate::error::Result;
use crate::pdu::{decode_sms_deliver, encode_sms_submit};
use std::time::Duration;

/// Submitting to the network can take several seconds on a weak signal.
const SEND_EXTRA: Duration = Duration::from_secs(10);

impl<C: ByteChannel> Session<C> {
    /// Send `text` to `recipient`, splitting into concatenated parts when it
    /// exceeds a single PDU. Returns the number of parts submitted.
    ///
    /// Parts are submitted in order; a failure mid-way leaves earlier parts
    /// already accepted by the network, which the error does not undo.
    pub fn send_sms(&mut self, recipient: &str, text: &str) -> Result<usize> {
        self.simple_command("AT+CMGF=0")?;
        let reference = self.next_reference();
        let parts = encode_sms_submit(recipient, text, reference)?;
        let count = parts.len();
        for part in parts {
            tracing::debug!(
                part = part.part_index,
                of = part.part_count,
                octets = part.submit_length,
                "submitting SMS part"
            );
            let mut payload = part.hex.into_bytes();
            payload.push(0x1A); // Ctrl-Z terminates the PDU entry
            let request = Request::new(format!("AT+CMGS={}", part.submit_length))
                .payload(payload)
                .extra_timeout(SEND_EXTRA);
            self.simple_request(&request)?;
        }
        Ok(count)
    }

    /// List stored messages matching `filter` and decode each PDU.
    ///
    /// The listing alternates `+CMGL:` header lines with raw PDU hex lines; a
    /// pair that fails to parse is logged and skipped, never fatal to the
    /// rest of the listing.
    pub fn receive_sms(&mut self, filter: MessageStatus) -> Result<Vec<SmsRecord>> {
        self.simple_command("AT+CMGF=0")?;
        let command = format!("AT+CMGL={}", u8::from(filter));
        let lines = self.collect_lines(&Request::new(command))?;

        let mut records = Vec::new();
        let mut lines = lines.into_iter().peekable();
        while let Some(line) = lines.next() {
            if !line.starts_with("+CMGL: ") {
                continue;
            }
            let Some(pdu) = lines.peek().filter(|l| !l.starts_with("+CMGL: ")) else {
                tracing::warn!(header = %line, "listing header without a PDU line");
                continue;
            };
            match decode_sms_deliver(pdu) {
                Some(mut record) => {
                    let (index, status) = parse_listing_header(&line);
                    record.index = index;
                    record.status = status;
                    records.push(record);
                }
                None => tracing::warn!(header = %line, "skipping undecodable PDU"),
            }
            lines.next();
        }
        Ok(records)
    }

    /// Delete the stored message at `index` (from [`SmsRecord::index`]).
    pub fn delete_sms(&mut self, index: u32) -> Result<()> {
        self.simple_command(&format!("AT+CMGD={index}"))
    }
}

/// Parse `+CMGL: <index>,<stat>,,<length>`; missing fields degrade to
/// defaults rather than dropping the already-decoded record.
fn parse_listing_header(line: &str) -> (u32, MessageStatus) {
    let mut fields = line.trim_start_matches("+CMGL: ").split(',');
    let index = fields.next().and_then(|v| v.trim().parse().ok());
    let status = fields
        .next()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .and_then(|v| MessageStatus::try_from(v).ok());
    if index.is_none() || status.is_none() {
        tracing::warn!(%line, "malformed +CMGL header, using defaults");
    }
    (index.unwrap_or(0), status.unwrap_or_default())
}
