// ABOUTME: Service-center timestamp with signed quarter-hour timezone offset
// ABOUTME: Decoded from the 7 nibble-swapped octets of an SMS-DELIVER PDU

use std::fmt;

/// Timestamp attached to a received message by the service center.
///
/// Fields are kept as the two-digit values the wire carries; the year is
/// relative to 2000. The zone offset is stored in quarter hours, signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SmsTimestamp {
    pub year: u8,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Offset from UTC in quarter hours, negative for western zones.
    pub zone_quarter_hours: i8,
}

impl SmsTimestamp {
    /// Zone offset in minutes.
    pub fn zone_offset_minutes(&self) -> i32 {
        i32::from(self.zone_quarter_hours) * 15
    }
}

impl fmt::Display for SmsTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.zone_quarter_hours < 0 { '-' } else { '+' };
        let quarters = self.zone_quarter_hours.unsigned_abs();
        write!(
            f,
            "{:02}/{:02}/{:02} {:02}:{:02}:{:02} GMT{}{}:{:02}",
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            sign,
            quarters / 4,
            (quarters % 4) * 15,
        )
    }
}
