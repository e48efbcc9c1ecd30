// ABOUTME: Type-of-number octet for semi-octet phone numbers (145 international, 129 national)
// ABOUTME: International numbers are flagged here instead of transmitting the leading +

use num_enum::{FromPrimitive, IntoPrimitive};

/// The number-type octet transmitted alongside semi-octet phone digits.
///
/// A leading `+` is never sent on the wire; it is carried by
/// [`TypeOfNumber::International`] and synthesized again on decode.
#[derive(FromPrimitive, IntoPrimitive)]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeOfNumber {
    International = 145,
    #[default]
    National = 129,
}

impl TypeOfNumber {
    /// Pick the type for a number as the caller wrote it.
    pub fn for_number(number: &str) -> TypeOfNumber {
        if number.starts_with('+') {
            TypeOfNumber::International
        } else {
            TypeOfNumber::National
        }
    }

    pub fn is_international(self) -> bool {
        self == TypeOfNumber::International
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_prefix_selects_international() {
        assert_eq!(
            TypeOfNumber::for_number("+33601020304"),
            TypeOfNumber::International
        );
        assert_eq!(
            TypeOfNumber::for_number("0601020304"),
            TypeOfNumber::National
        );
    }

    #[test]
    fn unexpected_type_octet_falls_back_to_national() {
        assert_eq!(TypeOfNumber::from(0xD0u8), TypeOfNumber::National);
    }
}
