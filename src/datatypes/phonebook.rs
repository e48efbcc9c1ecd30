// ABOUTME: Phonebook entries and the index/length capabilities reported by AT+CPBR=?

use crate::datatypes::TypeOfNumber;

/// One phonebook entry as stored on the SIM or in module memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhonebookEntry {
    pub index: u32,
    pub number: String,
    pub number_type: TypeOfNumber,
    pub name: String,
}

/// Capabilities of the selected phonebook storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhonebookRange {
    pub first_index: u32,
    pub last_index: u32,
    pub max_number_len: u32,
    pub max_name_len: u32,
}
