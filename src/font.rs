//! Segment names and the segment pattern to glyph table.

use num_enum::TryFromPrimitive;

use crate::config::DecimalPointStyle;

pub const UNKNOWN_CHAR: &str = "?";

/// Bit 7 of a data byte.
pub const DP_MASK: u8 = 0b1000_0000;

#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum Segment {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    Dp = 7,
}

pub const SEGMENT_NAMES: [&str; 8] = ["a", "b", "c", "d", "e", "f", "g", "dp"];

impl Segment {
    pub fn name(&self) -> &'static str {
        SEGMENT_NAMES[*self as usize]
    }

    /// Segments lit by `byte`, in bit order.
    pub fn lit(byte: u8) -> impl Iterator<Item = Segment> {
        (0..8u8)
            .filter(move |i| byte >> i & 1 == 1)
            .filter_map(|i| Segment::try_from(i).ok())
    }
}

/// Patterns over bits a..g, `0bgfedcba`.
static FONT: [(u8, &str); 35] = [
    (0b0000000, " "),
    (0b0100000, "'"),
    (0b1000000, "-"),
    (0b0111111, "0"),
    (0b0000110, "1"),
    (0b1011011, "2"),
    (0b1001111, "3"),
    (0b1100110, "4"),
    (0b1101101, "5"),
    (0b1111101, "6"),
    (0b0000111, "7"),
    (0b1111111, "8"),
    (0b1101111, "9"),
    (0b1110111, "A"),
    (0b1111100, "b"),
    (0b0111001, "C"),
    (0b1011110, "d"),
    (0b1111001, "E"),
    (0b1110001, "F"),
    (0b1110110, "H"),
    (0b0110000, "I"),
    (0b0001110, "J"),
    (0b0111000, "L"),
    (0b1010100, "n"),
    (0b1011100, "o"),
    (0b1110011, "P"),
    (0b1010000, "r"),
    (0b1111000, "t"),
    (0b0111110, "U"),
    (0b0001111, "]"),
    (0b0001000, "_"),
    (0b1011000, "c"),
    (0b1110100, "h"),
    (0b0010000, "i"),
    (0b0011100, "u"),
];

/// Character shown for a 7-bit segment pattern, if the font has one.
pub fn lookup(pattern: u8) -> Option<&'static str> {
    FONT.iter()
        .find(|(bits, _)| *bits == pattern)
        .map(|(_, ch)| *ch)
}

/// Renders a whole data byte: the character for bits 0-6, then the
/// decimal point marker when bit 7 is set.
pub fn glyph(byte: u8, style: DecimalPointStyle) -> String {
    let mut glyph = String::from(lookup(byte & !DP_MASK).unwrap_or(UNKNOWN_CHAR));
    if byte & DP_MASK != 0 {
        glyph.push(style.marker());
    }
    glyph
}
