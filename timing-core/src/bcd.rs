//! Packed binary-coded decimal: the high nibble holds the tens digit and the
//! low nibble the units digit.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BcdError {
    /// Only 0..=99 fits in two decimal digits.
    OutOfRange(u8),
}

impl fmt::Display for BcdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange(value) => write!(f, "{value} does not fit in two BCD digits"),
        }
    }
}

/// Decode a packed BCD byte. Nibbles above 9 are not rejected here; check
/// them with [`is_valid`] first when the source is untrusted.
pub const fn decode(byte: u8) -> u8 {
    (byte >> 4) * 10 + (byte & 0x0F)
}

pub fn encode(value: u8) -> Result<u8, BcdError> {
    if value > 99 {
        return Err(BcdError::OutOfRange(value));
    }
    Ok(((value / 10) << 4) | (value % 10))
}

/// Both nibbles are decimal digits.
pub const fn is_valid(byte: u8) -> bool {
    (byte >> 4) <= 9 && (byte & 0x0F) <= 9
}
