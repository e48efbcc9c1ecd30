// ABOUTME: Byte channel abstraction over the modem's serial link plus the CRLF line framer
// ABOUTME: Provides a blocking serialport-backed implementation and the seam used by scripted tests

use crate::error::Result;
use std::io::{Read, Write};
use std::time::Duration;

/// A duplex byte stream to the modem.
///
/// Any reliable byte stream with a configurable read timeout works: USB CDC,
/// RS-232, Bluetooth SPP. The engine only needs a non-blocking readable-byte
/// count, bounded reads, writes, and a way to discard stale input.
pub trait ByteChannel {
    /// Number of bytes readable without blocking.
    fn bytes_available(&mut self) -> Result<usize>;

    /// Read up to `buf.len()` bytes. May return fewer than requested,
    /// including zero, without blocking past the configured read timeout.
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write `data`, returning the number of bytes written.
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize>;

    /// Discard all unread input. A previous caller's trailing data must never
    /// leak into the next exchange.
    fn clear_input(&mut self) -> Result<()>;
}

/// Serial port settings for the modem link.
///
/// Defaults match the TC35 factory configuration: 115200 baud, 8N1.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub port: String,
    pub baud_rate: u32,
    pub parity: serialport::Parity,
    pub stop_bits: serialport::StopBits,
    pub data_bits: serialport::DataBits,
    /// Read timeout of the underlying port; also the base timeout budget for
    /// every command/response exchange.
    pub read_timeout: Duration,
}

impl SerialConfig {
    pub fn new(port: impl Into<String>) -> Self {
        SerialConfig {
            port: port.into(),
            baud_rate: 115_200,
            parity: serialport::Parity::None,
            stop_bits: serialport::StopBits::One,
            data_bits: serialport::DataBits::Eight,
            read_timeout: Duration::from_secs(2),
        }
    }

    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }
}

/// Blocking serial port channel backed by the `serialport` crate.
pub struct SerialChannel {
    port: Box<dyn serialport::SerialPort>,
}

impl SerialChannel {
    /// Open the configured port. Failure here is fatal to the whole session.
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let port = serialport::new(&config.port, config.baud_rate)
            .parity(config.parity)
            .stop_bits(config.stop_bits)
            .data_bits(config.data_bits)
            .timeout(config.read_timeout)
            .open()?;
        Ok(SerialChannel { port })
    }
}

impl ByteChannel for SerialChannel {
    fn bytes_available(&mut self) -> Result<usize> {
        Ok(self.port.bytes_to_read()? as usize)
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            // A read timeout with nothing buffered is an expected condition.
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<usize> {
        let n = self.port.write(data)?;
        self.port.flush()?;
        Ok(n)
    }

    fn clear_input(&mut self) -> Result<()> {
        self.port.clear(serialport::ClearBuffer::Input)?;
        Ok(())
    }
}

/// Splits the incoming byte stream into CRLF-terminated lines.
///
/// A trailing partial line (e.g. the `> ` data prompt, which carries no
/// terminator) stays buffered until more bytes arrive or the framer is
/// cleared together with the channel's stale input.
#[derive(Debug, Default)]
pub struct LineFramer {
    buf: Vec<u8>,
}

impl LineFramer {
    pub fn new() -> Self {
        LineFramer::default()
    }

    /// Feed raw bytes from the channel.
    pub fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Pop the next complete line, without its CRLF terminator.
    ///
    /// Non-UTF-8 bytes are replaced rather than dropped so a single mangled
    /// character cannot hide an otherwise matchable token.
    pub fn next_line(&mut self) -> Option<String> {
        let pos = self.buf.windows(2).position(|w| w == b"\r\n")?;
        let line: Vec<u8> = self.buf.drain(..pos + 2).take(pos).collect();
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    /// Drop everything buffered, including any partial line.
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}
