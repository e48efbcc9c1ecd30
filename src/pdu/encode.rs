// ABOUTME: SMS-SUBMIT PDU encoding: charset selection, multipart splitting and octet assembly
// ABOUTME: Pure functions, no I/O; deterministic given the caller-supplied reference id

use crate::datatypes::Charset;
use crate::error::Result;
use crate::pdu::{alphabet, number, septets};
use bytes::{BufMut, BytesMut};

/// SMS-SUBMIT first octet: message type 01, no validity period.
const FIRST_OCTET_SUBMIT: u8 = 0x01;
/// Set when the user data starts with a header.
const FIRST_OCTET_UDHI: u8 = 0x40;

/// A message longer than this many septets (or UCS-2 code units) is split
/// into concatenated parts.
const SINGLE_PART_SEPTETS: usize = 140;
const SINGLE_PART_UCS2_UNITS: usize = 70;

/// Per-part text capacity once the 6-octet concatenation header is present,
/// staying inside the 140-octet user-data ceiling.
const PART_SEPTETS: usize = 153;
const PART_UCS2_UNITS: usize = 67;

/// One encoded PDU ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPdu {
    /// Uppercase hexadecimal wire form, service-center prefix included.
    pub hex: String,
    /// The octet count for `AT+CMGS=<n>`: everything except the leading
    /// service-center length octet.
    pub submit_length: usize,
    pub charset: Charset,
    pub part_index: u8,
    pub part_count: u8,
}

/// Encode `text` to `recipient` as one or more SMS-SUBMIT PDUs.
///
/// The charset is a binary choice computed once for the whole message: 7-bit
/// iff every character exists in the alphabet tables, UTF-16BE otherwise.
/// `reference` becomes the TP message reference of every part and, for a
/// split message, the shared concatenation reference. Any source of distinct
/// 8-bit values per session is acceptable; a collision only degrades
/// reassembly on the receiving side.
pub fn encode_sms_submit(recipient: &str, text: &str, reference: u8) -> Result<Vec<EncodedPdu>> {
    if alphabet::is_encodable(text) {
        encode_gsm7(recipient, text, reference)
    } else {
        encode_ucs2(recipient, text, reference)
    }
}

fn encode_gsm7(recipient: &str, text: &str, reference: u8) -> Result<Vec<EncodedPdu>> {
    let chunks = split_gsm7(text);
    let part_count = chunks.len() as u8;
    let multipart = part_count > 1 || total_septets(text) > SINGLE_PART_SEPTETS;

    let mut parts = Vec::with_capacity(chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        let part_index = i as u8 + 1;
        let header = multipart.then(|| concat_header(reference, part_count, part_index));
        let (udl, user_data) = if let Some(header) = &header {
            // 6 header octets round up to 7 septets, so one fill bit aligns
            // the first text septet.
            let mut ud = header.clone();
            ud.extend_from_slice(&septets::pack_septets(chunk, 1));
            (7 + chunk.len(), ud)
        } else {
            (chunk.len(), septets::pack_septets(chunk, 0))
        };
        parts.push(assemble(
            recipient,
            Charset::Gsm7,
            header.is_some(),
            reference,
            udl,
            &user_data,
            part_index,
            part_count,
        )?);
    }
    Ok(parts)
}

fn encode_ucs2(recipient: &str, text: &str, reference: u8) -> Result<Vec<EncodedPdu>> {
    let units: Vec<u16> = text.encode_utf16().collect();
    let chunks = split_ucs2(&units);
    let part_count = chunks.len() as u8;
    let multipart = part_count > 1 || units.len() > SINGLE_PART_UCS2_UNITS;

    let mut parts = Vec::with_capacity(chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        let part_index = i as u8 + 1;
        let mut user_data = Vec::with_capacity(6 + chunk.len() * 2);
        if multipart {
            user_data.extend_from_slice(&concat_header(reference, part_count, part_index));
        }
        for unit in chunk.iter() {
            user_data.put_u16(*unit);
        }
        parts.push(assemble(
            recipient,
            Charset::Utf16,
            multipart,
            reference,
            user_data.len(),
            &user_data,
            part_index,
            part_count,
        )?);
    }
    Ok(parts)
}

/// The 6-octet concatenation header: UDHL, IEI 0x00, IE length 3, reference,
/// total parts, 1-based index.
fn concat_header(reference: u8, part_count: u8, part_index: u8) -> Vec<u8> {
    vec![0x05, 0x00, 0x03, reference, part_count, part_index]
}

#[allow(clippy::too_many_arguments)]
fn assemble(
    recipient: &str,
    charset: Charset,
    with_header: bool,
    reference: u8,
    udl: usize,
    user_data: &[u8],
    part_index: u8,
    part_count: u8,
) -> Result<EncodedPdu> {
    let (digit_count, number_type, digit_octets) = number::encode_number(recipient)?;

    let mut pdu = BytesMut::with_capacity(16 + user_data.len());
    // Service center: zero-length, use the one configured on the modem.
    pdu.put_u8(0x00);
    let mut first_octet = FIRST_OCTET_SUBMIT;
    if with_header {
        first_octet |= FIRST_OCTET_UDHI;
    }
    pdu.put_u8(first_octet);
    pdu.put_u8(reference);
    pdu.put_u8(digit_count);
    pdu.put_u8(number_type.into());
    pdu.put_slice(&digit_octets);
    pdu.put_u8(0x00); // protocol id
    pdu.put_u8(charset.to_dcs());
    pdu.put_u8(udl as u8);
    pdu.put_slice(user_data);

    Ok(EncodedPdu {
        submit_length: pdu.len() - 1,
        hex: hex::encode_upper(&pdu),
        charset,
        part_index,
        part_count,
    })
}

fn total_septets(text: &str) -> usize {
    text.chars()
        .filter_map(alphabet::char_septets)
        .map(|(_, ext)| if ext.is_some() { 2 } else { 1 })
        .sum()
}

/// Split 7-bit text into per-part septet streams.
///
/// Splitting happens on character boundaries: an escape septet and its
/// extension payload never land in different parts.
fn split_gsm7(text: &str) -> Vec<Vec<u8>> {
    if total_septets(text) <= SINGLE_PART_SEPTETS {
        let septets = alphabet::to_septets(text).unwrap_or_default();
        return vec![septets];
    }
    let mut parts: Vec<Vec<u8>> = Vec::new();
    let mut current: Vec<u8> = Vec::new();
    for c in text.chars() {
        let Some((first, second)) = alphabet::char_septets(c) else {
            continue;
        };
        let cost = if second.is_some() { 2 } else { 1 };
        if current.len() + cost > PART_SEPTETS {
            parts.push(std::mem::take(&mut current));
        }
        current.push(first);
        if let Some(second) = second {
            current.push(second);
        }
    }
    if !current.is_empty() || parts.is_empty() {
        parts.push(current);
    }
    parts
}

/// Split UCS-2 code units into per-part chunks, never separating a surrogate
/// pair.
fn split_ucs2(units: &[u16]) -> Vec<Vec<u16>> {
    if units.len() <= SINGLE_PART_UCS2_UNITS {
        return vec![units.to_vec()];
    }
    let mut parts = Vec::new();
    let mut start = 0;
    while start < units.len() {
        let mut end = (start + PART_UCS2_UNITS).min(units.len());
        if end < units.len() && (0xD800..0xDC00).contains(&units[end - 1]) {
            end -= 1;
        }
        parts.push(units[start..end].to_vec());
        start = end;
    }
    parts
}
