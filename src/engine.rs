// ABOUTME: Command/response engine framing AT exchanges over the byte channel
// ABOUTME: Three wait shapes (token, collect-until, line-containing) plus the explicit trailing-token drain

use crate::channel::{ByteChannel, LineFramer};
use crate::error::Result;
use std::thread;
use std::time::{Duration, Instant};

/// Default completion token sent by the modem.
pub const TOKEN_OK: &str = "OK";
/// Default rejection token sent by the modem.
pub const TOKEN_ERROR: &str = "ERROR";

/// Interval between polls of the channel when no bytes are buffered.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Pause between the command line and a raw trailing payload. The modem needs
/// a moment to raise its data prompt before the payload may follow.
const PAYLOAD_DELAY: Duration = Duration::from_millis(100);

/// One command exchange, constructed per call and consumed once.
#[derive(Debug, Clone)]
pub struct Request {
    command: String,
    /// Raw bytes written after the command line, with no terminator appended.
    /// This is how an SMS body followed by the Ctrl-Z control byte is sent
    /// once the modem signals readiness.
    payload: Option<Vec<u8>>,
    success_token: String,
    error_token: String,
    extra_timeout: Duration,
}

impl Request {
    pub fn new(command: impl Into<String>) -> Self {
        Request {
            command: command.into(),
            payload: None,
            success_token: TOKEN_OK.to_owned(),
            error_token: TOKEN_ERROR.to_owned(),
            extra_timeout: Duration::ZERO,
        }
    }

    pub fn payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn success_token(mut self, token: impl Into<String>) -> Self {
        self.success_token = token.into();
        self
    }

    pub fn extra_timeout(mut self, extra: Duration) -> Self {
        self.extra_timeout = extra;
        self
    }
}

/// How an exchange ended.
///
/// A non-responsive modem and an explicit error token are both failures, but
/// they are distinguishable on purpose: callers may retry on [`Outcome::Timeout`],
/// never on [`Outcome::ErrorToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A line containing the success token arrived.
    Success,
    /// The modem answered with the exact error token.
    ErrorToken,
    /// The timeout budget elapsed with neither token seen.
    Timeout,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }
}

/// The command/response engine.
///
/// Single-threaded, blocking, strictly request-then-response; the channel is a
/// shared resource and concurrent calls must be serialized by the caller.
///
/// Every exchange flushes stale unread bytes first, writes the command line,
/// then polls whole lines under a budget of `base_timeout` plus the request's
/// extra timeout. Queries that answer with one informative line followed by a
/// bare `OK` must drain that trailing token via [`Engine::drain_token`] before
/// the engine is reused, or a later unrelated exchange will match it.
pub struct Engine<C: ByteChannel> {
    channel: C,
    framer: LineFramer,
    base_timeout: Duration,
}

impl<C: ByteChannel> Engine<C> {
    pub fn new(channel: C, base_timeout: Duration) -> Self {
        Engine {
            channel,
            framer: LineFramer::new(),
            base_timeout,
        }
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Send `request` and wait for its success or error token.
    pub fn send_and_await_token(&mut self, request: &Request) -> Result<Outcome> {
        self.send(request)?;
        self.await_token(
            &request.success_token,
            &request.error_token,
            request.extra_timeout,
        )
    }

    /// Send `request` and accumulate every non-matching non-empty line until
    /// the success token is seen. An error token yields the lines collected so
    /// far with [`Outcome::ErrorToken`].
    ///
    /// Each line gets a fresh timeout budget, so a long listing is not cut off
    /// by the budget of the first line.
    pub fn send_and_collect_until(&mut self, request: &Request) -> Result<(Outcome, Vec<String>)> {
        self.send(request)?;
        let mut lines = Vec::new();
        loop {
            match self.next_nonempty_line(request.extra_timeout)? {
                None => return Ok((Outcome::Timeout, lines)),
                Some(line) if line.contains(&request.success_token) => {
                    return Ok((Outcome::Success, lines));
                }
                Some(line) if line == request.error_token => {
                    return Ok((Outcome::ErrorToken, lines));
                }
                Some(line) => lines.push(line),
            }
        }
    }

    /// Send `request` and return the first line containing `content`.
    ///
    /// `None` means timeout or an explicit error token; per the degradation
    /// policy the caller treats both as "no data".
    pub fn send_and_await_line_containing(
        &mut self,
        request: &Request,
        content: &str,
    ) -> Result<Option<String>> {
        self.send(request)?;
        let deadline = self.deadline(request.extra_timeout);
        loop {
            match self.poll_line_until(deadline)? {
                None => return Ok(None),
                Some(line) if !line.is_empty() && line.contains(content) => {
                    return Ok(Some(line));
                }
                Some(line) if line == request.error_token => return Ok(None),
                Some(_) => {}
            }
        }
    }

    /// Wait for a success/error token without sending anything.
    ///
    /// This is the second half of the two-step drain contract: after a
    /// single-line query, the trailing `OK` is still on the wire and must be
    /// consumed here before the engine is reused.
    pub fn drain_token(&mut self) -> Result<Outcome> {
        self.await_token(TOKEN_OK, TOKEN_ERROR, Duration::ZERO)
    }

    /// Block with no ceiling until any non-empty line arrives.
    ///
    /// Used by the low-power wait only; callers needing an upper bound must
    /// impose one externally (the wake condition is the sole escape).
    pub fn await_line_forever(&mut self) -> Result<String> {
        loop {
            self.fill_framer()?;
            while let Some(line) = self.framer.next_line() {
                if !line.is_empty() {
                    tracing::debug!(line = %line, "wake line received");
                    return Ok(line);
                }
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn send(&mut self, request: &Request) -> Result<()> {
        // Stale bytes from a previous exchange must never leak into this one.
        self.channel.clear_input()?;
        self.framer.clear();

        tracing::trace!(command = %request.command, "sending command");
        let mut line = request.command.clone().into_bytes();
        line.extend_from_slice(b"\r\n");
        self.channel.write_bytes(&line)?;

        if let Some(payload) = &request.payload {
            thread::sleep(PAYLOAD_DELAY);
            self.channel.write_bytes(payload)?;
        }
        Ok(())
    }

    fn await_token(&mut self, success: &str, error: &str, extra: Duration) -> Result<Outcome> {
        let deadline = self.deadline(extra);
        loop {
            match self.poll_line_until(deadline)? {
                None => return Ok(Outcome::Timeout),
                Some(line) if line.contains(success) => return Ok(Outcome::Success),
                Some(line) if line == error => return Ok(Outcome::ErrorToken),
                Some(_) => {}
            }
        }
    }

    fn next_nonempty_line(&mut self, extra: Duration) -> Result<Option<String>> {
        let deadline = self.deadline(extra);
        loop {
            match self.poll_line_until(deadline)? {
                None => return Ok(None),
                Some(line) if line.is_empty() => {}
                Some(line) => return Ok(Some(line)),
            }
        }
    }

    fn deadline(&self, extra: Duration) -> Instant {
        Instant::now() + self.base_timeout + extra
    }

    /// Pop the next framed line, polling the channel until `deadline`.
    fn poll_line_until(&mut self, deadline: Instant) -> Result<Option<String>> {
        loop {
            self.fill_framer()?;
            if let Some(line) = self.framer.next_line() {
                tracing::trace!(line = %line, "line received");
                return Ok(Some(line));
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn fill_framer(&mut self) -> Result<()> {
        let mut scratch = [0u8; 256];
        while self.channel.bytes_available()? > 0 {
            let n = self.channel.read_bytes(&mut scratch)?;
            if n == 0 {
                break;
            }
            self.framer.push(&scratch[..n]);
        }
        Ok(())
    }
}
