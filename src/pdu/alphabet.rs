// ABOUTME: GSM 03.38 7-bit default alphabet, base table plus escaped extension table
// ABOUTME: Extension characters cost two septets on the wire (escape 0x1B + payload)

/// Escape septet switching the next septet to the extension table for one
/// character only.
pub const ESCAPE: u8 = 0x1B;

/// Base table: septet value is the index. Index 0x1B is the escape and never
/// maps to a character.
const BASE: [char; 128] = [
    '@', '£', '$', '¥', 'è', 'é', 'ù', 'ì', 'ò', 'Ç', '\n', 'Ø', 'ø', '\r', 'Å', 'å', //
    'Δ', '_', 'Φ', 'Γ', 'Λ', 'Ω', 'Π', 'Ψ', 'Σ', 'Θ', 'Ξ', '\u{1b}', 'Æ', 'æ', 'ß', 'É', //
    ' ', '!', '"', '#', '¤', '%', '&', '\'', '(', ')', '*', '+', ',', '-', '.', '/', //
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', ':', ';', '<', '=', '>', '?', //
    '¡', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', //
    'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'Ä', 'Ö', 'Ñ', 'Ü', '§', //
    '¿', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', //
    'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'ä', 'ö', 'ñ', 'ü', 'à', //
];

/// Extension table, reached through [`ESCAPE`].
const EXTENSION: [(u8, char); 10] = [
    (0x0A, '\u{0C}'), // form feed
    (0x14, '^'),
    (0x28, '{'),
    (0x29, '}'),
    (0x2F, '\\'),
    (0x3C, '['),
    (0x3D, '~'),
    (0x3E, ']'),
    (0x40, '|'),
    (0x65, '€'),
];

fn base_septet(c: char) -> Option<u8> {
    if c == '\u{1b}' {
        return None;
    }
    BASE.iter().position(|&b| b == c).map(|i| i as u8)
}

fn extension_septet(c: char) -> Option<u8> {
    EXTENSION.iter().find(|&&(_, e)| e == c).map(|&(s, _)| s)
}

/// The septet(s) a character packs to: one for the base table, escape plus
/// payload for the extension table, `None` if the character has no 7-bit
/// representation at all.
pub fn char_septets(c: char) -> Option<(u8, Option<u8>)> {
    if let Some(s) = base_septet(c) {
        return Some((s, None));
    }
    extension_septet(c).map(|s| (ESCAPE, Some(s)))
}

/// A message is 7-bit-packable iff every character exists in the base or
/// extension table. Computed once per message, before any splitting.
pub fn is_encodable(text: &str) -> bool {
    text.chars().all(|c| char_septets(c).is_some())
}

/// Translate text to a septet stream. `None` if any character is outside both
/// tables (the caller then falls back to 16-bit encoding).
pub fn to_septets(text: &str) -> Option<Vec<u8>> {
    let mut septets = Vec::with_capacity(text.len());
    for c in text.chars() {
        let (first, second) = char_septets(c)?;
        septets.push(first);
        if let Some(second) = second {
            septets.push(second);
        }
    }
    Some(septets)
}

/// Map a septet stream back to text. An escape switches the next septet to
/// the extension table for one character; an unmapped extension septet decodes
/// to a space rather than failing the whole message.
pub fn from_septets(septets: &[u8]) -> String {
    let mut out = String::with_capacity(septets.len());
    let mut iter = septets.iter().copied();
    while let Some(s) = iter.next() {
        if s == ESCAPE {
            match iter.next() {
                Some(e) => out.push(
                    EXTENSION
                        .iter()
                        .find(|&&(v, _)| v == e)
                        .map(|&(_, c)| c)
                        .unwrap_or(' '),
                ),
                // Trailing escape with no payload septet.
                None => out.push(' '),
            }
        } else {
            out.push(BASE[(s & 0x7F) as usize]);
        }
    }
    out
}
