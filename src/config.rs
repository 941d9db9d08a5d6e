use std::str::FromStr;

use anyhow::{Result, anyhow};

/// How a set decimal point bit is rendered after a digit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DecimalPointStyle {
    #[default]
    Dot,
    Colon,
}

impl DecimalPointStyle {
    pub fn marker(&self) -> char {
        match self {
            DecimalPointStyle::Dot => '.',
            DecimalPointStyle::Colon => ':',
        }
    }
}

impl FromStr for DecimalPointStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<DecimalPointStyle> {
        match s {
            "Dot" => Ok(DecimalPointStyle::Dot),
            "Colon" => Ok(DecimalPointStyle::Colon),
            _ => Err(anyhow!("Invalid decimal point style {:?}", s)),
        }
    }
}

/// Option id of the decimal point style.
pub const DPOINT: &str = "dpoint";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    pub decimal_point: DecimalPointStyle,
}

impl Options {
    /// Applies one `id = value` option pair.
    pub fn set(&mut self, id: &str, value: &str) -> Result<()> {
        match id {
            DPOINT => {
                self.decimal_point = value.parse()?;
                Ok(())
            }
            _ => Err(anyhow!("Unknown option {:?}", id)),
        }
    }
}
