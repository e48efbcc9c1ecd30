// ABOUTME: Phonebook access over AT+CPBS/CPBR/CPBW: storage selection, range, read, write, delete

use super::Session;
use crate::channel::ByteChannel;
use crate::datatypes::{PhonebookEntry, PhonebookRange, TypeOfNumber};
use crate::engine::Request;
use crate::error::Result;

impl<C: ByteChannel> Session<C> {
    /// Select the phonebook storage (`"SM"` SIM, `"ME"` module memory,
    /// `"MC"`/`"RC"`/`"DC"` missed/received/dialed call lists).
    pub fn select_phonebook(&mut self, storage: &str) -> Result<()> {
        self.simple_command(&format!("AT+CPBS=\"{storage}\""))
    }

    /// Index range and field capacities of the selected storage.
    pub fn phonebook_range(&mut self) -> Result<Option<PhonebookRange>> {
        let line = self.single_line("AT+CPBR=?", "+CPBR: ")?;
        let range = parse_range(&line);
        if range.is_none() {
            tracing::warn!(%line, "unparseable +CPBR=? response");
        }
        Ok(range)
    }

    /// Read entries with indices in `first..=last`. Unused slots produce no
    /// line and are simply absent from the result.
    pub fn read_phonebook(&mut self, first: u32, last: u32) -> Result<Vec<PhonebookEntry>> {
        let lines = self.collect_lines(&Request::new(format!("AT+CPBR={first},{last}")))?;
        let mut entries = Vec::with_capacity(lines.len());
        for line in &lines {
            match parse_entry(line) {
                Some(entry) => entries.push(entry),
                None => tracing::warn!(%line, "skipping malformed +CPBR line"),
            }
        }
        Ok(entries)
    }

    /// Store an entry in the first free slot of the selected storage.
    pub fn add_phonebook_entry(&mut self, number: &str, name: &str) -> Result<()> {
        let ton = TypeOfNumber::for_number(number);
        let digits = number.strip_prefix('+').unwrap_or(number);
        self.simple_command(&format!(
            "AT+CPBW=,\"{digits}\",{},\"{name}\"",
            u8::from(ton)
        ))
    }

    /// Erase the entry at `index`.
    pub fn delete_phonebook_entry(&mut self, index: u32) -> Result<()> {
        self.simple_command(&format!("AT+CPBW={index}"))
    }
}

/// Parse `+CPBR: (<first>-<last>),<nlength>,<tlength>`.
fn parse_range(line: &str) -> Option<PhonebookRange> {
    let rest = line.trim_start_matches("+CPBR: ");
    let (bounds, tail) = rest.split_once(')')?;
    let (first, last) = bounds.trim_start_matches('(').split_once('-')?;
    let mut caps = tail.trim_start_matches(',').split(',');
    Some(PhonebookRange {
        first_index: first.trim().parse().ok()?,
        last_index: last.trim().parse().ok()?,
        max_number_len: caps.next()?.trim().parse().ok()?,
        max_name_len: caps.next()?.trim().parse().ok()?,
    })
}

/// Parse `+CPBR: <index>,"<number>",<type>,"<name>"`.
fn parse_entry(line: &str) -> Option<PhonebookEntry> {
    let rest = line.trim_start_matches("+CPBR: ");
    let (index, tail) = rest.split_once(',')?;
    let mut quoted = tail.split('"').skip(1).step_by(2);
    let number = quoted.next()?;
    let name = quoted.next().unwrap_or("");
    let ton = tail
        .split(',')
        .nth(1)
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(TypeOfNumber::from)
        .unwrap_or(TypeOfNumber::National);
    let number = if ton.is_international() {
        format!("+{number}")
    } else {
        number.to_owned()
    };
    Some(PhonebookEntry {
        index: index.trim().parse().ok()?,
        number,
        number_type: ton,
        name: name.to_owned(),
    })
}
