// ABOUTME: SMS-DELIVER PDU decoding with graceful degradation on malformed optional fields
// ABOUTME: Unparseable header/multipart info is omitted; an unknown charset stops body decoding only

use crate::datatypes::{Charset, MultipartInfo, SmsRecord, SmsTimestamp, TypeOfNumber, UserDataHeader};
use crate::pdu::{alphabet, number, septets};
use bytes::Buf;
use std::io::Cursor;

const UDHI_FLAG: u8 = 0x40;

/// Decode a received SMS-DELIVER PDU from its hexadecimal wire form.
///
/// `None` only when the structure is too damaged to locate the charset
/// (bad hex, truncation before the data-coding-scheme octet). Anything after
/// that degrades: a malformed header is omitted, an unknown charset leaves
/// the body empty with the raw payload preserved.
pub fn decode_sms_deliver(hex_pdu: &str) -> Option<SmsRecord> {
    let raw = hex::decode(hex_pdu.trim()).ok()?;
    let mut buf = Cursor::new(raw.as_slice());

    // Service center: length, then type + semi-octets. Parsed and ignored.
    let sca_len = checked_u8(&mut buf)? as usize;
    if buf.remaining() < sca_len {
        return None;
    }
    buf.advance(sca_len);

    let first_octet = checked_u8(&mut buf)?;
    let has_header = first_octet & UDHI_FLAG != 0;

    // Sender address: digit count, type octet, swapped digits.
    let digit_count = checked_u8(&mut buf)? as usize;
    let number_type = TypeOfNumber::from(checked_u8(&mut buf)?);
    let digit_octets = digit_count.div_ceil(2);
    if buf.remaining() < digit_octets {
        return None;
    }
    let sender = number::decode_number(
        &buf.chunk()[..digit_octets],
        digit_count,
        number_type,
    );
    buf.advance(digit_octets);

    let _protocol_id = checked_u8(&mut buf)?;
    let charset = Charset::from_dcs(checked_u8(&mut buf)?);
    let timestamp = decode_timestamp(&mut buf)?;
    let udl = checked_u8(&mut buf)? as usize;
    let user_data = buf.chunk().to_vec();

    let mut record = SmsRecord {
        number: sender,
        number_type,
        timestamp,
        charset,
        raw_body: hex::encode_upper(&user_data),
        ..SmsRecord::default()
    };

    let mut body_offset = 0;
    if has_header {
        match parse_header(&user_data) {
            Some((header, consumed)) => {
                record.multipart = parse_multipart(&header);
                record.header = Some(header);
                body_offset = consumed;
            }
            // Without a parseable header the body offset is unknowable;
            // keep the fields decoded so far and the raw payload.
            None => return Some(record),
        }
    }

    record.body = match charset {
        Charset::Gsm7 => decode_gsm7_body(&user_data, body_offset, udl).unwrap_or_default(),
        Charset::Utf16 => decode_ucs2_body(&user_data[body_offset..]),
        // 8-bit payloads stay raw; unknown charsets stop here.
        Charset::EightBit | Charset::Unknown => String::new(),
    };
    Some(record)
}

fn checked_u8(buf: &mut Cursor<&[u8]>) -> Option<u8> {
    buf.has_remaining().then(|| buf.get_u8())
}

/// Seven nibble-swapped octets: date, time, then the zone offset in quarter
/// hours whose sign lives in the top bit of the low nibble.
fn decode_timestamp(buf: &mut Cursor<&[u8]>) -> Option<SmsTimestamp> {
    if buf.remaining() < 7 {
        return None;
    }
    let swapped = |o: u8| (o & 0x0F) * 10 + (o >> 4);
    let mut field = || swapped(buf.get_u8());
    let (year, month, day, hour, minute, second) =
        (field(), field(), field(), field(), field(), field());
    let zone_octet = buf.get_u8();
    let negative = zone_octet & 0x08 != 0;
    let quarters = ((zone_octet & 0x07) * 10 + (zone_octet >> 4)) as i8;
    Some(SmsTimestamp {
        year,
        month,
        day,
        hour,
        minute,
        second,
        zone_quarter_hours: if negative { -quarters } else { quarters },
    })
}

/// Parse the User Data Header, returning the first information element and
/// the total octets consumed (UDHL octet included).
fn parse_header(user_data: &[u8]) -> Option<(UserDataHeader, usize)> {
    let udhl = *user_data.first()? as usize;
    let header = user_data.get(1..1 + udhl)?;
    let iei = *header.first()?;
    let ie_len = *header.get(1)? as usize;
    let ie_data = header.get(2..2 + ie_len)?.to_vec();
    Some((UserDataHeader { iei, ie_data }, 1 + udhl))
}

/// Extract multipart reassembly info from a concatenation element (IEI 0x00
/// with an 8-bit reference, IEI 0x08 with a 16-bit one). Anything else is
/// simply not multipart.
fn parse_multipart(header: &UserDataHeader) -> Option<MultipartInfo> {
    match (header.iei, header.ie_data.as_slice()) {
        (0x00, &[reference, part_count, part_index]) => Some(MultipartInfo {
            reference: u16::from(reference),
            part_count,
            part_index,
        }),
        (0x08, &[ref_high, ref_low, part_count, part_index]) => Some(MultipartInfo {
            reference: u16::from_be_bytes([ref_high, ref_low]),
            part_count,
            part_index,
        }),
        _ => None,
    }
}

fn decode_gsm7_body(user_data: &[u8], header_octets: usize, udl: usize) -> Option<String> {
    let (packed, count, fill_bits) = if header_octets > 0 {
        // UDL counts header septets too; the text is packed after the header
        // with fill bits up to the next septet boundary.
        let header_bits = header_octets * 8;
        let header_septets = header_bits.div_ceil(7);
        let fill = (header_septets * 7 - header_bits) as u8;
        (
            &user_data[header_octets..],
            udl.checked_sub(header_septets)?,
            fill,
        )
    } else {
        (user_data, udl, 0)
    };
    let unpacked = septets::unpack_septets(packed, count, fill_bits)?;
    Some(alphabet::from_septets(&unpacked))
}

fn decode_ucs2_body(payload: &[u8]) -> String {
    let units: Vec<u16> = payload
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::MessageStatus;

    // SMS-DELIVER from +33601020304, GSM 7-bit, body "hellohello",
    // sent 2024-03-07 14:05:30 GMT+1.
    const DELIVER_GSM7: &str =
        "07913306000000F0040B913306010203F40000423070415003400AE8329BFD4697D9EC37";

    #[test]
    fn decodes_plain_deliver() {
        let record = decode_sms_deliver(DELIVER_GSM7).unwrap();
        assert_eq!(record.number, "+33601020304");
        assert_eq!(record.number_type, TypeOfNumber::International);
        assert_eq!(record.charset, Charset::Gsm7);
        assert_eq!(record.body, "hellohello");
        assert_eq!(record.timestamp.year, 24);
        assert_eq!(record.timestamp.month, 3);
        assert_eq!(record.timestamp.day, 7);
        assert_eq!(record.timestamp.hour, 14);
        assert_eq!(record.timestamp.minute, 5);
        assert_eq!(record.timestamp.second, 30);
        assert_eq!(record.timestamp.zone_quarter_hours, 4);
        assert!(record.header.is_none());
        assert!(record.multipart.is_none());
        assert_eq!(record.status, MessageStatus::Unread);
    }

    #[test]
    fn negative_zone_offset() {
        // Quarters 22 west of UTC: tens nibble 2 with the sign bit (0x08)
        // set, units nibble 2 in the high position -> octet 0x2A.
        let mut raw = hex::decode(DELIVER_GSM7).unwrap();
        raw[25] = 0x2A; // zone octet, last of the seven timestamp octets
        let record = decode_sms_deliver(&hex::encode_upper(&raw)).unwrap();
        assert_eq!(record.timestamp.zone_quarter_hours, -22);
    }

    #[test]
    fn unknown_dcs_keeps_decoded_fields() {
        let mut raw = hex::decode(DELIVER_GSM7).unwrap();
        raw[18] = 0xF5; // DCS octet
        let record = decode_sms_deliver(&hex::encode_upper(&raw)).unwrap();
        assert_eq!(record.charset, Charset::Unknown);
        assert_eq!(record.number, "+33601020304");
        assert!(record.body.is_empty());
        assert!(!record.raw_body.is_empty());
    }

    #[test]
    fn truncated_pdu_is_rejected() {
        assert!(decode_sms_deliver(&DELIVER_GSM7[..20]).is_none());
        assert!(decode_sms_deliver("not hex at all").is_none());
    }

    #[test]
    fn ucs2_body_decodes() {
        // Same envelope, DCS 08, body "Vous" in UTF-16BE.
        let pdu =
            "07913306000000F0040B913306010203F4000842307041500340080056006F00750073";
        let record = decode_sms_deliver(pdu).unwrap();
        assert_eq!(record.charset, Charset::Utf16);
        assert_eq!(record.body, "Vous");
    }

    #[test]
    fn multipart_header_parsed() {
        // UDHI set, UDH 05 00 03 2A 02 01, then "ok" packed with one fill bit.
        let septets = alphabet::to_septets("ok").unwrap();
        let packed = septets::pack_septets(&septets, 1);
        let mut raw =
            hex::decode("07913306000000F0440B913306010203F400004230704150034009").unwrap();
        raw.extend_from_slice(&[0x05, 0x00, 0x03, 0x2A, 0x02, 0x01]);
        raw.extend_from_slice(&packed);
        let record = decode_sms_deliver(&hex::encode_upper(&raw)).unwrap();
        let multipart = record.multipart.unwrap();
        assert_eq!(multipart.reference, 0x2A);
        assert_eq!(multipart.part_count, 2);
        assert_eq!(multipart.part_index, 1);
        assert_eq!(record.body, "ok");
        assert_eq!(record.header.unwrap().iei, 0x00);
    }

    #[test]
    fn sixteen_bit_reference_parsed() {
        let header = UserDataHeader {
            iei: 0x08,
            ie_data: vec![0x01, 0x10, 0x03, 0x02],
        };
        let multipart = parse_multipart(&header).unwrap();
        assert_eq!(multipart.reference, 0x0110);
        assert_eq!(multipart.part_count, 3);
        assert_eq!(multipart.part_index, 2);
    }

    #[test]
    fn malformed_header_is_omitted_not_fatal() {
        // UDHI flag set but UDHL runs past the payload.
        let mut raw =
            hex::decode("07913306000000F0440B913306010203F4000042307041500340").unwrap();
        raw.extend_from_slice(&[0x02, 0xFF]); // UDL 2, then garbage "header"
        let record = decode_sms_deliver(&hex::encode_upper(&raw)).unwrap();
        assert!(record.header.is_none());
        assert!(record.body.is_empty());
        assert_eq!(record.number, "+33601020304");
    }
}
