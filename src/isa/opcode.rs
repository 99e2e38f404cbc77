//! Opcode catalog.
//!
//! Every instruction starts with one opcode byte. The operand bytes that
//! follow are described by the opcode's [`OperandShape`]; nothing else in
//! the crate hard-codes an operand width.

use std::fmt;
use serde::{Serialize, Deserialize};

/// One-byte instruction identifier.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// Stop the machine.
    Halt = 0x00,
    /// Reserved: integer add.
    Add = 0x01,
    /// Reserved: integer subtract.
    Sub = 0x02,
    /// Reserved: integer multiply.
    Mul = 0x03,
    /// Reserved: integer divide.
    Div = 0x04,
    /// Request an external service [u8 code]
    Interrupt = 0x05,
    /// Load a 16-bit integer into a register [reg, u16 BE]
    Set = 0x06,
    /// Load a string into a register [reg, bytes.., 0x00]
    SetString = 0x07,
    /// Reserved: query memory size.
    MemAmount = 0x08,
    /// Reserved: store a byte [u16 BE address, u8 value]
    MemSet = 0x09,
    /// Reserved: load from disk.
    LoadFromDisk = 0x0D,
    /// Reserved: select boot device.
    BootDevice = 0x0E,
    /// Reserved: conditional placeholder [u8 condition, u8 value]
    If = 0x0F,
    /// Reserved: section marker.
    Section = 0x10,
}

/// Layout of the operand bytes following an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperandShape {
    /// No operands.
    None,
    /// Register byte followed by a big-endian `u16`.
    RegisterU16,
    /// Register byte followed by a NUL-terminated byte string.
    RegisterCString,
    /// A single interrupt code byte (hexadecimal in source).
    InterruptCode,
    /// Big-endian `u16` address followed by a value byte.
    AddressByte,
    /// Condition byte followed by a value byte.
    ConditionByte,
}

impl OperandShape {
    /// Number of operand bytes, or `None` for variable-width shapes.
    pub const fn fixed_width(self) -> Option<usize> {
        match self {
            OperandShape::None => Some(0),
            OperandShape::RegisterU16 => Some(3),
            OperandShape::RegisterCString => None,
            OperandShape::InterruptCode => Some(1),
            OperandShape::AddressByte => Some(3),
            OperandShape::ConditionByte => Some(2),
        }
    }
}

/// One row of the ISA table.
#[derive(Debug, Clone, Copy)]
pub struct OpcodeInfo {
    pub opcode: Opcode,
    /// Canonical source mnemonic, also used by the disassembler.
    pub mnemonic: &'static str,
    /// Alternative spellings accepted by the assembler.
    pub aliases: &'static [&'static str],
    pub shape: OperandShape,
    /// Whether the engine gives the opcode any behavior.
    pub implemented: bool,
}

/// The ISA table.
pub static OPCODES: [OpcodeInfo; 14] = [
    OpcodeInfo { opcode: Opcode::Halt, mnemonic: "halt", aliases: &["hlt"], shape: OperandShape::None, implemented: true },
    OpcodeInfo { opcode: Opcode::Add, mnemonic: "add", aliases: &["addnum"], shape: OperandShape::None, implemented: false },
    OpcodeInfo { opcode: Opcode::Sub, mnemonic: "sub", aliases: &["subnum"], shape: OperandShape::None, implemented: false },
    OpcodeInfo { opcode: Opcode::Mul, mnemonic: "mul", aliases: &["mulnum"], shape: OperandShape::None, implemented: false },
    OpcodeInfo { opcode: Opcode::Div, mnemonic: "div", aliases: &["divnum"], shape: OperandShape::None, implemented: false },
    OpcodeInfo { opcode: Opcode::Interrupt, mnemonic: "int", aliases: &["interrupt"], shape: OperandShape::InterruptCode, implemented: true },
    OpcodeInfo { opcode: Opcode::Set, mnemonic: "set", aliases: &[], shape: OperandShape::RegisterU16, implemented: true },
    OpcodeInfo { opcode: Opcode::SetString, mnemonic: "set-string", aliases: &["setstr"], shape: OperandShape::RegisterCString, implemented: true },
    OpcodeInfo { opcode: Opcode::MemAmount, mnemonic: "mem-amount", aliases: &["memamount"], shape: OperandShape::None, implemented: false },
    OpcodeInfo { opcode: Opcode::MemSet, mnemonic: "mem-set", aliases: &["memset"], shape: OperandShape::AddressByte, implemented: false },
    OpcodeInfo { opcode: Opcode::LoadFromDisk, mnemonic: "load-from-disk", aliases: &["lfd"], shape: OperandShape::None, implemented: false },
    OpcodeInfo { opcode: Opcode::BootDevice, mnemonic: "boot-device", aliases: &["bootdev"], shape: OperandShape::None, implemented: false },
    OpcodeInfo { opcode: Opcode::If, mnemonic: "if", aliases: &[], shape: OperandShape::ConditionByte, implemented: false },
    OpcodeInfo { opcode: Opcode::Section, mnemonic: "section", aliases: &[], shape: OperandShape::None, implemented: false },
];

impl Opcode {
    /// The raw opcode byte.
    #[inline]
    pub const fn byte(self) -> u8 {
        self as u8
    }

    /// Look up an opcode by its byte value.
    pub fn from_byte(byte: u8) -> Option<Self> {
        OPCODES.iter().find(|entry| entry.opcode.byte() == byte).map(|entry| entry.opcode)
    }

    /// Look up an opcode by mnemonic or alias (case-insensitive).
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        OPCODES
            .iter()
            .find(|entry| {
                entry.mnemonic.eq_ignore_ascii_case(mnemonic)
                    || entry.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(mnemonic))
            })
            .map(|entry| entry.opcode)
    }

    /// The ISA table row for this opcode.
    pub fn info(self) -> &'static OpcodeInfo {
        let row = match self {
            Opcode::Halt => 0,
            Opcode::Add => 1,
            Opcode::Sub => 2,
            Opcode::Mul => 3,
            Opcode::Div => 4,
            Opcode::Interrupt => 5,
            Opcode::Set => 6,
            Opcode::SetString => 7,
            Opcode::MemAmount => 8,
            Opcode::MemSet => 9,
            Opcode::LoadFromDisk => 10,
            Opcode::BootDevice => 11,
            Opcode::If => 12,
            Opcode::Section => 13,
        };
        &OPCODES[row]
    }

    pub fn mnemonic(self) -> &'static str {
        self.info().mnemonic
    }

    pub fn shape(self) -> OperandShape {
        self.info().shape
    }

    pub fn is_implemented(self) -> bool {
        self.info().implemented
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_has_one_row_per_opcode() {
        let bytes: HashSet<u8> = OPCODES.iter().map(|e| e.opcode.byte()).collect();
        assert_eq!(bytes.len(), OPCODES.len());

        for entry in &OPCODES {
            assert_eq!(entry.opcode.info().opcode, entry.opcode);
        }
    }

    #[test]
    fn test_mnemonics_are_unique() {
        let mut seen = HashSet::new();
        for entry in &OPCODES {
            assert!(seen.insert(entry.mnemonic));
            for alias in entry.aliases {
                assert!(seen.insert(alias), "duplicate alias {}", alias);
            }
        }
    }

    #[test]
    fn test_byte_values() {
        assert_eq!(Opcode::Halt.byte(), 0x00);
        assert_eq!(Opcode::Interrupt.byte(), 0x05);
        assert_eq!(Opcode::Set.byte(), 0x06);
        assert_eq!(Opcode::SetString.byte(), 0x07);
        assert_eq!(Opcode::LoadFromDisk.byte(), 0x0D);
        assert_eq!(Opcode::Section.byte(), 0x10);
    }

    #[test]
    fn test_lookup() {
        assert_eq!(Opcode::from_mnemonic("set-string"), Some(Opcode::SetString));
        assert_eq!(Opcode::from_mnemonic("setstr"), Some(Opcode::SetString));
        assert_eq!(Opcode::from_mnemonic("INT"), Some(Opcode::Interrupt));
        assert_eq!(Opcode::from_mnemonic("jmp"), None);

        assert_eq!(Opcode::from_byte(0x0F), Some(Opcode::If));
        assert_eq!(Opcode::from_byte(0x0A), None);
        assert_eq!(Opcode::from_byte(0xFF), None);
    }

    #[test]
    fn test_only_strings_are_variable_width() {
        for entry in &OPCODES {
            let variable = entry.shape.fixed_width().is_none();
            assert_eq!(variable, entry.opcode == Opcode::SetString);
        }
    }

    #[test]
    fn test_implemented_opcodes() {
        let implemented: Vec<Opcode> = OPCODES
            .iter()
            .map(|entry| entry.opcode)
            .filter(|op| op.is_implemented())
            .collect();
        assert_eq!(implemented, vec![Opcode::Halt, Opcode::Interrupt, Opcode::Set, Opcode::SetString]);
    }
}
