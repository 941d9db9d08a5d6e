//! Methods that provide some higher-level interpretation of decoded commands.

use crate::command::{self, Addressing, Direction, Switch};

/// Number of digit grids driven by the chip.
pub const DIGITS: u8 = 6;

impl command::Contrast {
    /// PWM duty ratio as `(numerator, 16)`.
    pub fn ratio(&self) -> (u8, u8) {
        match u8::from(self.0) {
            0 => (1, 16),
            1 => (2, 16),
            2 => (4, 16),
            n => (n + 7, 16),
        }
    }

    pub fn label(&self) -> &'static str {
        command::CONTRASTS[u8::from(self.0) as usize]
    }
}

impl command::DataCommand {
    /// Returns if the following data bytes are segment patterns for the display.
    pub fn is_display_write(&self) -> bool {
        self.direction == Direction::Write
    }

    pub fn auto_increments(&self) -> bool {
        self.addressing == Addressing::Auto
    }
}

impl command::DisplayCommand {
    pub fn is_lit(&self) -> bool {
        self.switch == Switch::On
    }
}

impl command::AddressCommand {
    /// Digit number, 1-based.
    pub fn digit(&self) -> u8 {
        u8::from(self.field) + 1
    }
}

/// Digit following `address` under auto-increment.
///
/// Wraps from the last grid back to the first. Addresses 7 and 8,
/// which an address command can select but the chip has no grid
/// for, wrap as well.
pub fn next_address(address: u8) -> u8 {
    if address >= DIGITS {
        1
    } else {
        address + 1
    }
}
