// ABOUTME: Wake trigger selection and wake reason classification for low-power mode
// ABOUTME: Trigger validation happens before any command reaches the channel

use crate::error::{ModemError, Result};

/// Minimum timer when the timer is the only selected trigger. A shorter lone
/// timer could be missed while the sleep command is still in flight, leaving
/// a blocking sleep with no escape.
pub const MIN_LONE_TIMER_SECS: u32 = 10;

/// Which events may wake the modem from low-power mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct WakeTriggers {
    /// Wake after this many seconds, armed on the modem's own clock.
    pub timer_secs: Option<u32>,
    pub incoming_call: bool,
    pub incoming_sms: bool,
    pub temperature_warning: bool,
}

impl WakeTriggers {
    pub fn timer(secs: u32) -> Self {
        WakeTriggers {
            timer_secs: Some(secs),
            ..WakeTriggers::default()
        }
    }

    pub fn on_call(mut self) -> Self {
        self.incoming_call = true;
        self
    }

    pub fn on_sms(mut self) -> Self {
        self.incoming_sms = true;
        self
    }

    pub fn on_temperature(mut self) -> Self {
        self.temperature_warning = true;
        self
    }

    /// Reject unusable trigger sets before any command is sent.
    pub fn validate(&self) -> Result<()> {
        let has_event_trigger =
            self.incoming_call || self.incoming_sms || self.temperature_warning;
        match self.timer_secs {
            None if !has_event_trigger => {
                Err(ModemError::InvalidTriggers("no wake trigger selected"))
            }
            Some(secs) if !has_event_trigger && secs < MIN_LONE_TIMER_SECS => Err(
                ModemError::InvalidTriggers("lone wake timer below the 10 second minimum"),
            ),
            _ => Ok(()),
        }
    }
}

/// What actually woke the modem.
///
/// Modeled as a set of booleans since more than one trigger can coincide in
/// principle, though only the first observed line is classified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WakeReason {
    pub by_timer: bool,
    pub by_call: bool,
    pub by_sms: bool,
    pub by_temperature: bool,
}

impl WakeReason {
    /// Classify an unsolicited line by its first five characters.
    pub fn classify(line: &str) -> WakeReason {
        let mut reason = WakeReason::default();
        let prefix: String = line.chars().take(5).collect();
        match prefix.as_str() {
            "+CMTI" => reason.by_sms = true,
            "+CLIP" => reason.by_call = true,
            "+CALA" => reason.by_timer = true,
            "^SCTM" => reason.by_temperature = true,
            _ if line.starts_with("RING") => reason.by_call = true,
            _ => {}
        }
        reason
    }

    /// No known trigger matched the wake line.
    pub fn is_unknown(&self) -> bool {
        !(self.by_timer || self.by_call || self.by_sms || self.by_temperature)
    }
}
