use num_enum::TryFromPrimitive;

use crate::bitfield::{AssertFrom, Unsigned3};

pub mod bits {
    use crate::bitfield::BitRange;

    pub const CLASS: BitRange = BitRange::new(6, 7);

    pub const DATA_RESERVED_LOW: BitRange = BitRange::bit(0);
    pub const DATA_DIRECTION: BitRange = BitRange::bit(1);
    pub const DATA_ADDRESSING: BitRange = BitRange::bit(2);
    pub const DATA_MODE: BitRange = BitRange::bit(3);
    pub const DATA_RESERVED_HIGH: BitRange = BitRange::new(4, 5);

    pub const DISPLAY_CONTRAST: BitRange = BitRange::new(0, 2);
    pub const DISPLAY_SWITCH: BitRange = BitRange::bit(3);
    pub const DISPLAY_RESERVED: BitRange = BitRange::new(4, 5);

    pub const ADDRESS_DIGIT: BitRange = BitRange::new(0, 2);
    pub const ADDRESS_RESERVED: BitRange = BitRange::new(3, 5);
}

/// Value of bits 6-7 of a command byte.
///
/// `0b00` is reserved by the chip and has no variant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum CommandClass {
    Data = 0b01,
    Display = 0b10,
    Address = 0b11,
}

impl CommandClass {
    pub fn of(byte: u8) -> Option<CommandClass> {
        CommandClass::try_from(bits::CLASS.extract(byte)).ok()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Data(DataCommand),
    Display(DisplayCommand),
    Address(AddressCommand),
}

impl Command {
    /// Decodes a command byte. Returns `None` for the reserved class.
    pub fn parse(byte: u8) -> Option<Command> {
        let command = match CommandClass::of(byte)? {
            CommandClass::Data => Command::Data(DataCommand::from_byte(byte)),
            CommandClass::Display => Command::Display(DisplayCommand::from_byte(byte)),
            CommandClass::Address => Command::Address(AddressCommand::from_byte(byte)),
        };
        Some(command)
    }

    pub fn class(&self) -> CommandClass {
        match self {
            Command::Data(_) => CommandClass::Data,
            Command::Display(_) => CommandClass::Display,
            Command::Address(_) => CommandClass::Address,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Write,
    /// Key scan read. Reported only.
    Read,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Addressing {
    Auto,
    Fixed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Test,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Switch {
    Off,
    On,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DataCommand {
    pub direction: Direction,
    pub addressing: Addressing,
    pub mode: Mode,
}

impl DataCommand {
    pub fn from_byte(byte: u8) -> DataCommand {
        let direction = match bits::DATA_DIRECTION.extract(byte) {
            0 => Direction::Write,
            _ => Direction::Read,
        };
        let addressing = match bits::DATA_ADDRESSING.extract(byte) {
            0 => Addressing::Auto,
            _ => Addressing::Fixed,
        };
        let mode = match bits::DATA_MODE.extract(byte) {
            0 => Mode::Normal,
            _ => Mode::Test,
        };
        DataCommand { direction, addressing, mode }
    }
}

/// PWM duty ratio labels indexed by the 3-bit contrast field.
pub const CONTRASTS: [&str; 8] = [
    "1/16", "2/16", "4/16", "10/16", "11/16", "12/16", "13/16", "14/16",
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Contrast(pub Unsigned3);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DisplayCommand {
    pub switch: Switch,
    pub contrast: Contrast,
}

impl DisplayCommand {
    pub fn from_byte(byte: u8) -> DisplayCommand {
        let switch = match bits::DISPLAY_SWITCH.extract(byte) {
            0 => Switch::Off,
            _ => Switch::On,
        };
        let contrast = Contrast(Unsigned3::assert_from(bits::DISPLAY_CONTRAST.extract(byte)));
        DisplayCommand { switch, contrast }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AddressCommand {
    /// Raw 3-bit field; the digit number is this plus one.
    pub field: Unsigned3,
}

impl AddressCommand {
    pub fn from_byte(byte: u8) -> AddressCommand {
        AddressCommand {
            field: Unsigned3::assert_from(bits::ADDRESS_DIGIT.extract(byte)),
        }
    }
}
