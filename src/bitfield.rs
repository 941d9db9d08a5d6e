use anyhow::{Result, anyhow};

/// Conversion for values that are in range by construction,
/// such as a field that was already masked out of a byte.
pub trait AssertFrom<From>: Sized {
    fn assert_from(value: From) -> Self;
}

impl<T, From> AssertFrom<From> for T
where T: TryFrom<From>,
      <T as TryFrom<From>>::Error: std::fmt::Debug
{
    fn assert_from(value: From) -> Self {
        Self::try_from(value).expect("masked bitfield in range")
    }
}

/// Inclusive range of bit positions inside a byte, LSB = 0.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BitRange {
    pub lo: u8,
    pub hi: u8,
}

impl BitRange {
    pub const fn new(lo: u8, hi: u8) -> BitRange {
        BitRange { lo, hi }
    }

    pub const fn bit(pos: u8) -> BitRange {
        BitRange { lo: pos, hi: pos }
    }

    pub const fn mask(&self) -> u8 {
        let width = self.hi - self.lo + 1;
        if width >= 8 {
            0xFF
        } else {
            ((1u8 << width) - 1) << self.lo
        }
    }

    pub const fn extract(&self, byte: u8) -> u8 {
        (byte & self.mask()) >> self.lo
    }
}

/// An unsigned 3-bit field value, 0..=7.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Unsigned3(u8);

impl TryFrom<u8> for Unsigned3 {
    type Error = anyhow::Error;

    fn try_from(value: u8) -> Result<Unsigned3> {
        if value < 8 {
            Ok(Unsigned3(value))
        } else {
            Err(anyhow!("Invalid 3-bit value {}", value))
        }
    }
}

impl From<Unsigned3> for u8 {
    fn from(value: Unsigned3) -> u8 {
        value.0
    }
}
