//! Instruction encoding and decoding.
//!
//! An instruction is an opcode byte followed by the operand bytes its
//! [`OperandShape`] declares. Both directions read the shape from the ISA
//! table, so the assembler and the engine cannot disagree on a width.

use std::fmt;
use crate::isa::{Opcode, OperandShape, RegisterIndex};
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// A decoded SC instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// Stop the machine.
    Halt,

    /// reg := value
    Set { reg: RegisterIndex, value: u16 },

    /// reg := text
    SetString { reg: RegisterIndex, text: String },

    /// Call the interrupt service routine with `code`.
    Interrupt { code: u8 },

    /// Reserved: mem[address] := value
    MemSet { address: u16, value: u8 },

    /// Reserved conditional placeholder.
    If { condition: u8, value: u8 },

    /// Any other opcode; none of them take operands.
    Reserved(Opcode),
}

impl Instruction {
    /// The opcode this instruction encodes to.
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Halt => Opcode::Halt,
            Instruction::Set { .. } => Opcode::Set,
            Instruction::SetString { .. } => Opcode::SetString,
            Instruction::Interrupt { .. } => Opcode::Interrupt,
            Instruction::MemSet { .. } => Opcode::MemSet,
            Instruction::If { .. } => Opcode::If,
            Instruction::Reserved(op) => *op,
        }
    }

    /// Number of bytes the instruction occupies in an image.
    pub fn encoded_len(&self) -> usize {
        match self {
            Instruction::SetString { text, .. } => 1 + 1 + text.len() + 1,
            other => 1 + other.opcode().shape().fixed_width().unwrap_or(0),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.opcode();
        match self {
            Instruction::Halt | Instruction::Reserved(_) => write!(f, "{}", op),
            Instruction::Set { reg, value } => write!(f, "{} {} {}", op, reg, value),
            Instruction::SetString { reg, text } => write!(f, "{} {} \"{}\"", op, reg, text),
            Instruction::Interrupt { code } => write!(f, "{} {:02X}", op, code),
            Instruction::MemSet { address, value } => write!(f, "{} {} {}", op, address, value),
            Instruction::If { condition, value } => write!(f, "{} {} {}", op, condition, value),
        }
    }
}

/// Encode an instruction, appending its bytes to `out`.
///
/// `SetString` text is written verbatim; the assembler rejects embedded NULs
/// before they get here.
pub fn encode_into(instr: &Instruction, out: &mut Vec<u8>) {
    let op = instr.opcode();
    out.push(op.byte());

    match (op.shape(), instr) {
        (OperandShape::RegisterU16, Instruction::Set { reg, value }) => {
            out.push(reg.to_wire());
            out.extend_from_slice(&value.to_be_bytes());
        }
        (OperandShape::RegisterCString, Instruction::SetString { reg, text }) => {
            out.push(reg.to_wire());
            out.extend_from_slice(text.as_bytes());
            out.push(0);
        }
        (OperandShape::InterruptCode, Instruction::Interrupt { code }) => {
            out.push(*code);
        }
        (OperandShape::AddressByte, Instruction::MemSet { address, value }) => {
            out.extend_from_slice(&address.to_be_bytes());
            out.push(*value);
        }
        (OperandShape::ConditionByte, Instruction::If { condition, value }) => {
            out.push(*condition);
            out.push(*value);
        }
        _ => {}
    }
}

/// Encode an instruction to a fresh byte vector.
pub fn encode(instr: &Instruction) -> Vec<u8> {
    let mut out = Vec::with_capacity(instr.encoded_len());
    encode_into(instr, &mut out);
    out
}

/// Decode the instruction starting at `at`.
///
/// Returns the instruction and the number of bytes it occupies, so the
/// caller can advance past it. Never reads outside `bytes`.
pub fn decode(bytes: &[u8], at: usize) -> Result<(Instruction, usize), DecodeError> {
    let byte = *bytes.get(at).ok_or(DecodeError::EndOfInput { at })?;
    let op = Opcode::from_byte(byte)
        .ok_or(DecodeError::UnknownOpcode { opcode: byte, at })?;
    let start = at + 1;

    let instr = match op.shape() {
        OperandShape::None => match op {
            Opcode::Halt => Instruction::Halt,
            other => Instruction::Reserved(other),
        },
        OperandShape::RegisterU16 => {
            let operands = operands(bytes, op, at, 3)?;
            Instruction::Set {
                reg: register(operands[0], start)?,
                value: u16::from_be_bytes([operands[1], operands[2]]),
            }
        }
        OperandShape::RegisterCString => {
            let reg = register(operands(bytes, op, at, 1)?[0], start)?;
            let text_start = start + 1;
            let len = bytes[text_start..]
                .iter()
                .position(|&b| b == 0)
                .ok_or(DecodeError::UnterminatedString { at })?;
            let text = String::from_utf8_lossy(&bytes[text_start..text_start + len]).into_owned();
            return Ok((Instruction::SetString { reg, text }, 1 + 1 + len + 1));
        }
        OperandShape::InterruptCode => Instruction::Interrupt {
            code: operands(bytes, op, at, 1)?[0],
        },
        OperandShape::AddressByte => {
            let operands = operands(bytes, op, at, 3)?;
            Instruction::MemSet {
                address: u16::from_be_bytes([operands[0], operands[1]]),
                value: operands[2],
            }
        }
        OperandShape::ConditionByte => {
            let operands = operands(bytes, op, at, 2)?;
            Instruction::If { condition: operands[0], value: operands[1] }
        }
    };

    let len = 1 + op.shape().fixed_width().unwrap_or(0);
    Ok((instr, len))
}

/// Borrow the `count` operand bytes after the opcode at `at`.
fn operands(bytes: &[u8], opcode: Opcode, at: usize, count: usize) -> Result<&[u8], DecodeError> {
    bytes.get(at + 1..at + 1 + count)
        .ok_or(DecodeError::Truncated { opcode, at })
}

fn register(byte: u8, at: usize) -> Result<RegisterIndex, DecodeError> {
    RegisterIndex::from_wire(byte).ok_or(DecodeError::InvalidRegister { byte, at })
}

/// Errors that can occur during instruction decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unknown opcode 0x{opcode:02X} at 0x{at:04X}")]
    UnknownOpcode { opcode: u8, at: usize },

    #[error("invalid register byte 0x{byte:02X} at 0x{at:04X}")]
    InvalidRegister { byte: u8, at: usize },

    #[error("operands of `{opcode}` at 0x{at:04X} run past the end of memory")]
    Truncated { opcode: Opcode, at: usize },

    #[error("string at 0x{at:04X} has no terminator before the end of memory")]
    UnterminatedString { at: usize },

    #[error("no instruction at 0x{at:04X}: end of memory")]
    EndOfInput { at: usize },
}
