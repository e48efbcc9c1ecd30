// ABOUTME: Semi-octet phone number encoding: digit pairs swapped, odd digit padded with 0xF
// ABOUTME: International numbers carry type octet 145 instead of a transmitted +

use crate::datatypes::TypeOfNumber;
use crate::error::{ModemError, Result};

/// Encode a phone number for a PDU address field.
///
/// Returns `(digit_count, type_octet_source, swapped_digit_octets)`. The
/// leading `+` is not transmitted; it selects [`TypeOfNumber::International`].
pub fn encode_number(number: &str) -> Result<(u8, TypeOfNumber, Vec<u8>)> {
    let number_type = TypeOfNumber::for_number(number);
    let digits = number.strip_prefix('+').unwrap_or(number);
    if digits.is_empty() || digits.len() > 20 {
        return Err(ModemError::Unencodable("phone number length out of range"));
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ModemError::Unencodable(
            "phone number contains non-digit characters",
        ));
    }
    Ok((digits.len() as u8, number_type, swap_digits(digits)))
}

/// Digit pairs swapped into semi-octets, trailing odd digit padded with 0xF.
fn swap_digits(digits: &str) -> Vec<u8> {
    let nibbles: Vec<u8> = digits.bytes().map(|b| b - b'0').collect();
    nibbles
        .chunks(2)
        .map(|pair| {
            let low = pair[0];
            let high = pair.get(1).copied().unwrap_or(0xF);
            (high << 4) | low
        })
        .collect()
}

/// Decode `digit_count` digits from swapped semi-octets, synthesizing the
/// leading `+` when the number type is international.
pub fn decode_number(octets: &[u8], digit_count: usize, number_type: TypeOfNumber) -> String {
    let mut number = String::with_capacity(digit_count + 1);
    if number_type.is_international() {
        number.push('+');
    }
    for &octet in octets {
        for nibble in [octet & 0x0F, octet >> 4] {
            if number.len() >= digit_count + usize::from(number_type.is_international()) {
                break;
            }
            // A nibble above 9 here is the 0xF pad of an odd-length number.
            if nibble <= 9 {
                number.push(char::from(b'0' + nibble));
            }
        }
    }
    number
}
