//! Register addressing.
//!
//! The machine has 16 registers. On the wire a register is written as
//! `index + 10`; the assembler and the decoder both go through
//! [`RegisterIndex::to_wire`] and [`RegisterIndex::from_wire`].

use std::fmt;
use serde::{Serialize, Deserialize};

/// Number of registers in the register file.
pub const REGISTER_COUNT: usize = 16;

/// Offset added to a register index when it is written into an image.
pub const REGISTER_WIRE_OFFSET: u8 = 10;

/// A validated register index in `0..16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegisterIndex(u8);

impl RegisterIndex {
    /// Register 0, the first interrupt argument.
    pub const R0: Self = Self(0);
    /// Register 1, the second interrupt argument.
    pub const R1: Self = Self(1);

    /// Create from a numeric index, rejecting values past the register file.
    pub fn new(index: usize) -> Option<Self> {
        if index < REGISTER_COUNT {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Parse source syntax: `R<n>` or a single letter `A`..`P`.
    ///
    /// A letter maps to `letter - 'A'`, so `A` and `R0` name the same register.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(digits) = text.strip_prefix('R').filter(|d| !d.is_empty()) {
            if !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            return digits.parse::<usize>().ok().and_then(Self::new);
        }

        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) if letter.is_ascii_uppercase() => {
                Self::new((letter as u8 - b'A') as usize)
            }
            _ => None,
        }
    }

    /// Decode a register byte read from an image.
    pub fn from_wire(byte: u8) -> Option<Self> {
        byte.checked_sub(REGISTER_WIRE_OFFSET)
            .and_then(|index| Self::new(index as usize))
    }

    /// The register byte as written into an image.
    #[inline]
    pub const fn to_wire(self) -> u8 {
        self.0 + REGISTER_WIRE_OFFSET
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RegisterIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// The value held by a register.
///
/// A register may hold an integer at one point and a string later; the tag
/// follows whatever was stored last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegisterValue {
    Integer(u16),
    Text(String),
}

impl RegisterValue {
    pub fn as_integer(&self) -> Option<u16> {
        match self {
            RegisterValue::Integer(value) => Some(*value),
            RegisterValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RegisterValue::Integer(_) => None,
            RegisterValue::Text(text) => Some(text),
        }
    }

    /// Name of the tag, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            RegisterValue::Integer(_) => "integer",
            RegisterValue::Text(_) => "string",
        }
    }
}

impl Default for RegisterValue {
    fn default() -> Self {
        RegisterValue::Integer(0)
    }
}

impl fmt::Display for RegisterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterValue::Integer(value) => write!(f, "{}", value),
            RegisterValue::Text(text) => write!(f, "{:?}", text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric() {
        assert_eq!(RegisterIndex::parse("R0"), Some(RegisterIndex::R0));
        assert_eq!(RegisterIndex::parse("R15").map(|r| r.index()), Some(15));
        assert_eq!(RegisterIndex::parse("R16"), None);
        assert_eq!(RegisterIndex::parse("R"), None);
        assert_eq!(RegisterIndex::parse("R-1"), None);
        assert_eq!(RegisterIndex::parse("Rx"), None);
    }

    #[test]
    fn test_parse_letters() {
        assert_eq!(RegisterIndex::parse("A"), Some(RegisterIndex::R0));
        assert_eq!(RegisterIndex::parse("B"), Some(RegisterIndex::R1));
        assert_eq!(RegisterIndex::parse("P").map(|r| r.index()), Some(15));
        assert_eq!(RegisterIndex::parse("Q"), None);
        assert_eq!(RegisterIndex::parse("a"), None);
        assert_eq!(RegisterIndex::parse("AB"), None);
    }

    #[test]
    fn test_wire_offset() {
        assert_eq!(RegisterIndex::R0.to_wire(), 0x0A);
        assert_eq!(RegisterIndex::from_wire(0x0A), Some(RegisterIndex::R0));
        assert_eq!(RegisterIndex::from_wire(25).map(|r| r.index()), Some(15));
        assert_eq!(RegisterIndex::from_wire(9), None);
        assert_eq!(RegisterIndex::from_wire(26), None);
    }

    #[test]
    fn test_value_tags() {
        let value = RegisterValue::Integer(7);
        assert_eq!(value.as_integer(), Some(7));
        assert_eq!(value.as_text(), None);

        let value = RegisterValue::Text("hi".into());
        assert_eq!(value.as_text(), Some("hi"));
        assert_eq!(value.kind(), "string");
        assert_eq!(RegisterValue::default(), RegisterValue::Integer(0));
    }
}
