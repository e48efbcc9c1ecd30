// ABOUTME: Pure 7-bit packing and unpacking over explicit bit index arithmetic
// ABOUTME: Septets are placed LSB-first with no byte alignment between them

/// Pack a septet stream into octets with no padding slack between septets.
///
/// Septet `n` occupies bits spanning two consecutive octets whenever
/// `n mod 8 != 0`. `fill_bits` shifts the whole stream right; a User Data
/// Header occupying 48 bits needs one fill bit so the first text septet
/// starts on a septet boundary (bit 49).
pub fn pack_septets(septets: &[u8], fill_bits: u8) -> Vec<u8> {
    let total_bits = fill_bits as usize + septets.len() * 7;
    let mut octets = vec![0u8; total_bits.div_ceil(8)];
    let mut bit = fill_bits as usize;
    for &septet in septets {
        for offset in 0..7 {
            if septet >> offset & 1 == 1 {
                octets[bit / 8] |= 1 << (bit % 8);
            }
            bit += 1;
        }
    }
    octets
}

/// Unpack exactly `count` septets from a packed octet stream, using the same
/// sliding 7-bit window as [`pack_septets`].
///
/// Returns `None` when `octets` is too short for the declared count; the
/// caller treats the payload as malformed rather than reading padding.
pub fn unpack_septets(octets: &[u8], count: usize, fill_bits: u8) -> Option<Vec<u8>> {
    let needed_bits = fill_bits as usize + count * 7;
    if octets.len() * 8 < needed_bits {
        return None;
    }
    let mut septets = Vec::with_capacity(count);
    let mut bit = fill_bits as usize;
    for _ in 0..count {
        let mut septet = 0u8;
        for offset in 0..7 {
            if octets[bit / 8] >> (bit % 8) & 1 == 1 {
                septet |= 1 << offset;
            }
            bit += 1;
        }
        septets.push(septet);
    }
    Some(septets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdu::alphabet;

    #[test]
    fn packs_known_vector() {
        // "hellohello" is the canonical GSM packing example.
        let septets = alphabet::to_septets("hellohello").unwrap();
        let packed = pack_septets(&septets, 0);
        assert_eq!(
            packed,
            [0xE8, 0x32, 0x9B, 0xFD, 0x46, 0x97, 0xD9, 0xEC, 0x37]
        );
    }

    #[test]
    fn seven_septets_fit_seven_bytes_minus_one() {
        // 8 septets pack into exactly 7 octets; no slack.
        let septets = vec![0x7F; 8];
        assert_eq!(pack_septets(&septets, 0).len(), 7);
    }

    #[test]
    fn unpack_reverses_pack() {
        let septets = alphabet::to_septets("The quick brown fox").unwrap();
        let packed = pack_septets(&septets, 0);
        let unpacked = unpack_septets(&packed, septets.len(), 0).unwrap();
        assert_eq!(unpacked, septets);
    }

    #[test]
    fn unpack_respects_declared_count() {
        // 8 septets of packed data, but only 3 declared: the trailing bits
        // must not be decoded as padding characters.
        let septets = alphabet::to_septets("ABCDEFGH").unwrap();
        let packed = pack_septets(&septets, 0);
        let unpacked = unpack_septets(&packed, 3, 0).unwrap();
        assert_eq!(alphabet::from_septets(&unpacked), "ABC");
    }

    #[test]
    fn fill_bits_round_trip() {
        // One fill bit, as used after a 6-octet concatenation header.
        let septets = alphabet::to_septets("part text").unwrap();
        let packed = pack_septets(&septets, 1);
        let unpacked = unpack_septets(&packed, septets.len(), 1).unwrap();
        assert_eq!(unpacked, septets);
        // Bit 0 of the first octet is fill, not septet data.
        assert_eq!(packed[0] & 1, 0);
    }

    #[test]
    fn truncated_stream_is_rejected() {
        let septets = alphabet::to_septets("hello").unwrap();
        let packed = pack_septets(&septets, 0);
        assert!(unpack_septets(&packed[..packed.len() - 1], septets.len(), 0).is_none());
    }
}
