mod call_state;
mod charset;
mod credential_state;
mod forwarding;
mod message_status;
mod phonebook;
mod sms;
mod timestamp;
mod type_of_number;
mod wake;

pub use call_state::CallState;
pub use charset::Charset;
pub use credential_state::CredentialState;
pub use forwarding::{ForwardingReason, ForwardingSetting};
pub use message_status::MessageStatus;
pub use phonebook::{PhonebookEntry, PhonebookRange};
pub use sms::{MultipartInfo, SmsRecord, UserDataHeader};
pub use timestamp::SmsTimestamp;
pub use type_of_number::TypeOfNumber;
pub use wake::{MIN_LONE_TIMER_SECS, WakeReason, WakeTriggers};
