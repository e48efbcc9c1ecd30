// ABOUTME: Scripted end-to-end session tests over an in-memory channel
// ABOUTME: The support module holds the ScriptedChannel shared with per-file unit tests

use crate::datatypes::{CallState, CredentialState, MessageStatus, WakeTriggers};
use crate::error::ModemError;
use crate::session::{Credentials, Session, StartOutcome};
use std::time::Duration;
use self::support::ScriptedChannel;

pub(crate) mod support {
    use crate::channel::ByteChannel;
    use crate::error::Result;
    use std::collections::VecDeque;

    /// An in-memory channel scripted with ordered write/response pairs.
    ///
    /// Every write must match the next expectation exactly; its response
    /// becomes readable afterwards. Out-of-order or surplus writes panic, so
    /// a passing test proves the exact command sequence on the wire.
    #[derive(Default)]
    pub(crate) struct ScriptedChannel {
        expectations: VecDeque<(Vec<u8>, Vec<u8>)>,
        pending: Vec<u8>,
    }

    impl ScriptedChannel {
        pub(crate) fn new() -> Self {
            ScriptedChannel::default()
        }

        pub(crate) fn expect(&mut self, write: impl AsRef<[u8]>, respond: impl AsRef<[u8]>) {
            self.expectations
                .push_back((write.as_ref().to_vec(), respond.as_ref().to_vec()));
        }

        /// True when every expected write has happened.
        pub(crate) fn is_exhausted(&self) -> bool {
            self.expectations.is_empty()
        }
    }

    impl ByteChannel for ScriptedChannel {
        fn bytes_available(&mut self) -> Result<usize> {
            Ok(self.pending.len())
        }

        fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize> {
            let n = buf.len().min(self.pending.len());
            buf[..n].copy_from_slice(&self.pending[..n]);
            self.pending.drain(..n);
            Ok(n)
        }

        fn write_bytes(&mut self, data: &[u8]) -> Result<usize> {
            let Some((expected, response)) = self.expectations.pop_front() else {
                panic!("unexpected write: {:?}", String::from_utf8_lossy(data));
            };
            assert_eq!(
                String::from_utf8_lossy(data),
                String::from_utf8_lossy(&expected),
                "write out of script order"
            );
            self.pending.extend_from_slice(&response);
            Ok(data.len())
        }

        fn clear_input(&mut self) -> Result<()> {
            self.pending.clear();
            Ok(())
        }
    }
}

fn session(channel: ScriptedChannel) -> Session<ScriptedChannel> {
    Session::with_channel(channel, Duration::from_millis(200))
}

fn expect_startup_prologue(channel: &mut ScriptedChannel) {
    channel.expect("ATE0\r\n", "OK\r\n");
    channel.expect("ATV1\r\n", "OK\r\n");
}

fn expect_no_unsolicited(channel: &mut ScriptedChannel) {
    channel.expect("AT+CLIP=0\r\n", "OK\r\n");
    channel.expect("AT+CNMI=0,0\r\n", "OK\r\n");
    channel.expect("AT^SCTM=0\r\n", "OK\r\n");
    channel.expect("AT+CALA=\"\"\r\n", "OK\r\n");
}

fn assert_exhausted(session: &mut Session<ScriptedChannel>) {
    assert!(session.engine().channel_mut().is_exhausted());
}

#[test]
fn start_unlocks_fully_locked_sim_in_order() {
    // A SIM at PUK2 walks down one state per accepted credential; each is
    // submitted exactly once and only after the state asking for it.
    let mut channel = ScriptedChannel::new();
    expect_startup_prologue(&mut channel);
    for (state, value) in [
        ("SIM PUK2", "87654321"),
        ("SIM PIN2", "4321"),
        ("SIM PUK", "12345678"),
        ("SIM PIN", "1234"),
    ] {
        channel.expect("AT+CPIN?\r\n", format!("+CPIN: {state}\r\nOK\r\n"));
        channel.expect(format!("AT+CPIN={value}\r\n"), "OK\r\n");
    }
    channel.expect("AT+CPIN?\r\n", "+CPIN: READY\r\nOK\r\n");
    expect_no_unsolicited(&mut channel);

    let credentials = Credentials::default()
        .pin("1234")
        .puk("12345678")
        .pin2("4321")
        .puk2("87654321");
    let mut session = session(channel);
    assert_eq!(session.start(&credentials).unwrap(), StartOutcome::Ready);
    assert_exhausted(&mut session);
}

#[test]
fn start_fails_fast_on_rejected_pin() {
    let mut channel = ScriptedChannel::new();
    expect_startup_prologue(&mut channel);
    channel.expect("AT+CPIN?\r\n", "+CPIN: SIM PIN\r\nOK\r\n");
    channel.expect("AT+CPIN=0000\r\n", "ERROR\r\n");

    let mut session = session(channel);
    let err = session
        .start(&Credentials::default().pin("0000"))
        .unwrap_err();
    assert!(matches!(
        err,
        ModemError::CredentialRejected(CredentialState::NeedPin)
    ));
    assert!(!err.is_retryable());
    // No resubmission, no further traffic after the rejection.
    assert_exhausted(&mut session);
}

#[test]
fn start_reports_missing_credential() {
    let mut channel = ScriptedChannel::new();
    expect_startup_prologue(&mut channel);
    channel.expect("AT+CPIN?\r\n", "+CPIN: SIM PUK\r\nOK\r\n");

    let mut session = session(channel);
    let outcome = session.start(&Credentials::default().pin("1234")).unwrap();
    assert_eq!(
        outcome,
        StartOutcome::AwaitingCredential(CredentialState::NeedPuk)
    );
    assert_exhausted(&mut session);
}

#[test]
fn start_rejects_unknown_credential_state() {
    let mut channel = ScriptedChannel::new();
    expect_startup_prologue(&mut channel);
    channel.expect("AT+CPIN?\r\n", "+CPIN: PH-NET PIN\r\nOK\r\n");

    let mut session = session(channel);
    let err = session.start(&Credentials::default()).unwrap_err();
    assert!(matches!(err, ModemError::UnknownCredentialState(token) if token == "PH-NET PIN"));
}

#[test]
fn send_sms_golden_exchange() {
    let mut channel = ScriptedChannel::new();
    channel.expect("AT+CMGF=0\r\n", "OK\r\n");
    channel.expect("AT+CMGS=15\r\n", "> ");
    channel.expect(
        "00012A0B913306010203F4000002C834\x1a",
        "+CMGS: 17\r\nOK\r\n",
    );

    let mut session = session(channel);
    session.set_reference(0x29); // next_reference yields 0x2A
    assert_eq!(session.send_sms("+33601020304", "Hi").unwrap(), 1);
    assert_exhausted(&mut session);
}

#[test]
fn receive_sms_decodes_listing() {
    let mut channel = ScriptedChannel::new();
    channel.expect("AT+CMGF=0\r\n", "OK\r\n");
    channel.expect(
        "AT+CMGL=4\r\n",
        "+CMGL: 3,1,,37\r\n\
         07913306000000F0040B913306010203F40000423070415003400AE8329BFD4697D9EC37\r\n\
         +CMGL: 7,0,,garbage\r\n\
         not a pdu line\r\n\
         OK\r\n",
    );

    let mut session = session(channel);
    let records = session.receive_sms(MessageStatus::All).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].index, 3);
    assert_eq!(records[0].status, MessageStatus::Read);
    assert_eq!(records[0].number, "+33601020304");
    assert_eq!(records[0].body, "hellohello");
}

#[test]
fn sleep_wakes_on_sms_and_restores_config() {
    let mut channel = ScriptedChannel::new();
    expect_no_unsolicited(&mut channel);
    channel.expect("AT+CNMI=1,1\r\n", "OK\r\n");
    channel.expect("AT+CFUN=0\r\n", "OK\r\n\r\n+CMTI: \"SM\",1\r\n");
    expect_no_unsolicited(&mut channel);

    let mut session = session(channel);
    let reason = session
        .sleep(WakeTriggers::default().on_sms())
        .unwrap();
    assert!(reason.by_sms);
    assert!(!reason.by_call);
    // Exhaustion proves the no-unsolicited config was restored after waking.
    assert_exhausted(&mut session);
}

#[test]
fn sleep_timer_armed_on_modem_clock() {
    let mut channel = ScriptedChannel::new();
    expect_no_unsolicited(&mut channel);
    channel.expect("AT+CCLK?\r\n", "+CCLK: \"24/03/07,14:05:30+04\"\r\nOK\r\n");
    // 30 seconds plus the one-second slack, from the modem's clock.
    channel.expect("AT+CALA=\"24/03/07,14:06:01\"\r\n", "OK\r\n");
    channel.expect(
        "AT+CFUN=0\r\n",
        "OK\r\n+CALA: \"24/03/07,14:06:01\"\r\n",
    );
    expect_no_unsolicited(&mut channel);

    let mut session = session(channel);
    let reason = session.sleep(WakeTriggers::timer(30)).unwrap();
    assert!(reason.by_timer);
    assert_exhausted(&mut session);
}

#[test]
fn sleep_with_short_lone_timer_touches_nothing() {
    // No expectations scripted: any write would panic.
    let mut session = session(ScriptedChannel::new());
    let err = session.sleep(WakeTriggers::timer(5)).unwrap_err();
    assert!(matches!(err, ModemError::InvalidTriggers(_)));
}

#[test]
fn dial_hangs_up_first() {
    let mut channel = ScriptedChannel::new();
    channel.expect("AT+CHUP\r\n", "OK\r\n");
    channel.expect("ATD0601020304;\r\n", "OK\r\n");

    let mut session = session(channel);
    session.dial("0601020304").unwrap();
    assert_exhausted(&mut session);
}

#[test]
fn hang_up_falls_back_to_ath() {
    let mut channel = ScriptedChannel::new();
    channel.expect("AT+CHUP\r\n", "ERROR\r\n");
    channel.expect("ATH\r\n", "OK\r\n");

    let mut session = session(channel);
    session.hang_up().unwrap();
    assert_exhausted(&mut session);
}

#[test]
fn call_state_parses_clcc_line() {
    let mut channel = ScriptedChannel::new();
    channel.expect(
        "AT+CLCC\r\n",
        "+CLCC: 1,1,4,0,0,\"+33601020304\",145\r\nOK\r\n",
    );

    let mut session = session(channel);
    let (state, number) = session.call_state().unwrap();
    assert_eq!(state, CallState::Incoming);
    assert_eq!(number, "+33601020304");
}

#[test]
fn absent_clcc_line_means_no_call() {
    let mut channel = ScriptedChannel::new();
    channel.expect("AT+CLCC\r\n", "OK\r\n");

    let mut session = session(channel);
    let (state, number) = session.call_state().unwrap();
    assert_eq!(state, CallState::NoCall);
    assert!(number.is_empty());
}

#[test]
fn signal_strength_converts_to_dbm() {
    let mut channel = ScriptedChannel::new();
    channel.expect("AT+CSQ\r\n", "+CSQ: 21,99\r\nOK\r\n");
    channel.expect("AT+CSQ\r\n", "+CSQ: 99,99\r\nOK\r\n");

    let mut session = session(channel);
    assert_eq!(session.signal_strength_dbm().unwrap(), Some(-71));
    assert_eq!(session.signal_strength_dbm().unwrap(), None);
}

#[test]
fn switch_off_awaits_ms_off_token() {
    let mut channel = ScriptedChannel::new();
    channel.expect("AT^SMSO\r\n", "MS OFF\r\nOK\r\n");

    let mut session = session(channel);
    session.switch_off().unwrap();
    assert_exhausted(&mut session);
}

#[test]
fn operator_name_extracted_from_cops() {
    let mut channel = ScriptedChannel::new();
    channel.expect("AT+COPS=3,0\r\n", "OK\r\n");
    channel.expect("AT+COPS?\r\n", "+COPS: 0,0,\"Orange F\"\r\nOK\r\n");

    let mut session = session(channel);
    assert_eq!(session.operator_name().unwrap(), "Orange F");
}
