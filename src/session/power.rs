// ABOUTME: Low-power sleep with wake triggers, plus reboot, switch-off and functionality level

use super::Session;
use crate::channel::ByteChannel;
use crate::datatypes::{WakeReason, WakeTriggers};
use crate::engine::Request;
use crate::error::Result;
use std::time::Duration;

/// A full restart takes several seconds before `^SYSSTART` appears.
const REBOOT_EXTRA: Duration = Duration::from_secs(15);

impl<C: ByteChannel> Session<C> {
    /// Enter low-power mode and block until one of `triggers` fires.
    ///
    /// The trigger set is validated before anything touches the channel.
    /// Only the selected unsolicited sources are enabled for the duration of
    /// the sleep; whatever happens, the no-unsolicited configuration is
    /// restored before returning.
    pub fn sleep(&mut self, triggers: WakeTriggers) -> Result<WakeReason> {
        triggers.validate()?;

        // Start from a clean slate so a stale source cannot fake a wake.
        self.disable_unsolicited()?;
        if let Err(e) = self.arm_triggers(&triggers) {
            let _ = self.disable_unsolicited();
            return Err(e);
        }
        if let Err(e) = self.simple_command("AT+CFUN=0") {
            let _ = self.disable_unsolicited();
            return Err(e);
        }

        // Unbounded on purpose: the wake condition is the only escape.
        let line = self.engine().await_line_forever()?;
        let reason = WakeReason::classify(&line);
        if reason.is_unknown() {
            tracing::warn!(%line, "woken by an unrecognized line");
        }

        self.disable_unsolicited()?;
        Ok(reason)
    }

    fn arm_triggers(&mut self, triggers: &WakeTriggers) -> Result<()> {
        if triggers.incoming_call {
            self.simple_command("AT+CLIP=1")?;
        }
        if triggers.incoming_sms {
            self.simple_command("AT+CNMI=1,1")?;
        }
        if triggers.temperature_warning {
            self.simple_command("AT^SCTM=1")?;
        }
        if let Some(secs) = triggers.timer_secs {
            // The alarm is armed on the modem's own clock; one extra second
            // covers the command round trip.
            let now = self.modem_datetime()?;
            let wake = now + chrono::Duration::seconds(i64::from(secs) + 1);
            let stamp = wake.format("%y/%m/%d,%H:%M:%S");
            self.simple_command(&format!("AT+CALA=\"{stamp}\""))?;
        }
        Ok(())
    }

    /// Restart the module. Blocks until it announces `^SYSSTART`; the session
    /// must then be started again (echo, credentials, notification config).
    pub fn reboot(&mut self) -> Result<()> {
        let request = Request::new("AT+CFUN=1,1")
            .success_token("^SYSSTART")
            .extra_timeout(REBOOT_EXTRA);
        self.simple_request(&request)
    }

    /// Power the module down. It confirms with `MS OFF` and stops responding;
    /// the session is unusable afterwards.
    pub fn switch_off(&mut self) -> Result<()> {
        let request = Request::new("AT^SMSO").success_token("MS OFF");
        self.simple_request(&request)?;
        // The final OK before power loss, best effort.
        let _ = self.engine().drain_token();
        Ok(())
    }

    /// Current functionality level per `AT+CFUN?`: 0 minimum (sleep), 1 full.
    pub fn functionality_level(&mut self) -> Result<Option<u8>> {
        let line = self.single_line("AT+CFUN?", "+CFUN: ")?;
        let level = line.trim_start_matches("+CFUN: ").trim().parse().ok();
        if level.is_none() {
            tracing::warn!(%line, "unparseable +CFUN response");
        }
        Ok(level)
    }
}
