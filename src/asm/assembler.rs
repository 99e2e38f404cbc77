//! Assembler for SC programs.
//!
//! Syntax, one instruction per line:
//! ```text
//! # Comment (`;` works too)
//! set R0 640
//! set B 480
//! int 06
//! set-string A "hello"
//! mem-set 256 7
//! if 1 2
//! halt
//! ```
//!
//! `set` takes a register and a 16-bit value, decimal or `0x` hex. Letters
//! `A`..`P` name registers 0..15. Interrupt codes are always hexadecimal.
//! Everything after the register of a `set-string` is the quoted string.
//!
//! Assembly is best-effort: a bad line is reported and skipped, and the
//! rest of the file is still encoded.

use crate::asm::image::BinaryImage;
use crate::cpu::decode::Instruction;
use crate::isa::{Opcode, OperandShape, RegisterIndex};
use thiserror::Error;

/// Result of assembling a source file.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    /// Encoded program, without the lines that failed.
    pub image: BinaryImage,
    /// One entry per skipped line, in source order.
    pub diagnostics: Vec<AssemblerError>,
}

impl Assembly {
    /// True if every line assembled.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Assemble source code, collecting a diagnostic for every bad line.
pub fn assemble(source: &str) -> Assembly {
    let mut asm = Assembler::new();
    asm.assemble(source);
    Assembly {
        image: asm.output,
        diagnostics: asm.diagnostics,
    }
}

/// Assemble source code, failing on the first bad line.
pub fn assemble_strict(source: &str) -> Result<BinaryImage, AssemblerError> {
    let assembly = assemble(source);
    match assembly.diagnostics.into_iter().next() {
        Some(err) => Err(err),
        None => Ok(assembly.image),
    }
}

/// The assembler state.
struct Assembler {
    /// Output image.
    output: BinaryImage,
    /// Errors for skipped lines.
    diagnostics: Vec<AssemblerError>,
}

impl Assembler {
    fn new() -> Self {
        Self {
            output: BinaryImage::new(),
            diagnostics: Vec::new(),
        }
    }

    fn assemble(&mut self, source: &str) {
        for (line_num, line) in source.lines().enumerate() {
            self.process_line(line, line_num + 1);
        }
    }

    fn process_line(&mut self, line: &str, line_num: usize) {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            return;
        }

        // Nothing is emitted for a line until all of its operands parsed.
        match parse_instruction(line, line_num) {
            Ok(instr) => self.output.push(&instr),
            Err(e) => self.diagnostics.push(e),
        }
    }
}

/// Parse one non-blank, non-comment line.
fn parse_instruction(line: &str, line_num: usize) -> Result<Instruction, AssemblerError> {
    let fields = Fields::split(line, line_num);

    let op = Opcode::from_mnemonic(fields.mnemonic).ok_or_else(|| AssemblerError::UnknownMnemonic {
        line: line_num,
        text: line.to_string(),
        mnemonic: fields.mnemonic.to_string(),
    })?;

    let instr = match op.shape() {
        OperandShape::None => match op {
            Opcode::Halt => Instruction::Halt,
            other => Instruction::Reserved(other),
        },

        OperandShape::RegisterU16 => {
            let reg = fields.first(op, "a register and a value")?;
            let value = fields.second(op, "a register and a value")?;
            if value.starts_with('"') {
                return Err(AssemblerError::StringNotAllowed {
                    line: line_num,
                    text: line.to_string(),
                    mnemonic: fields.mnemonic.to_string(),
                });
            }
            Instruction::Set {
                reg: fields.register(reg)?,
                value: fields.number(value, u16::MAX as u64)? as u16,
            }
        }

        OperandShape::RegisterCString => {
            let reg = fields.first(op, "a register and a string")?;
            let value = fields.second(op, "a register and a string")?;
            let reg = fields.register(reg)?;
            let text = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .ok_or_else(|| AssemblerError::ExpectedString { line: line_num, text: line.to_string() })?;
            if text.contains('\0') {
                return Err(AssemblerError::NulInString { line: line_num, text: line.to_string() });
            }
            Instruction::SetString { reg, text: text.to_string() }
        }

        OperandShape::InterruptCode => {
            let code = fields.first(op, "an interrupt code")?;
            Instruction::Interrupt { code: fields.hex_byte(code)? }
        }

        OperandShape::AddressByte => {
            let address = fields.first(op, "an address and a value")?;
            let value = fields.second(op, "an address and a value")?;
            Instruction::MemSet {
                address: fields.number(address, u16::MAX as u64)? as u16,
                value: fields.number(value, u8::MAX as u64)? as u8,
            }
        }

        OperandShape::ConditionByte => {
            let condition = fields.first(op, "a condition and a value")?;
            let value = fields.second(op, "a condition and a value")?;
            Instruction::If {
                condition: fields.number(condition, u8::MAX as u64)? as u8,
                value: fields.number(value, u8::MAX as u64)? as u8,
            }
        }
    };

    Ok(instr)
}

/// A source line split into mnemonic, first operand and the rest.
struct Fields<'a> {
    line: &'a str,
    line_num: usize,
    mnemonic: &'a str,
    first: Option<&'a str>,
    rest: Option<&'a str>,
}

impl<'a> Fields<'a> {
    /// Split on whitespace at most twice; the third field keeps its spaces.
    fn split(line: &'a str, line_num: usize) -> Self {
        let mut remaining = line.trim();
        let mnemonic = next_field(&mut remaining).unwrap_or("");
        let first = next_field(&mut remaining);
        let rest = Some(remaining.trim()).filter(|r| !r.is_empty());

        Self { line, line_num, mnemonic, first, rest }
    }

    fn first(&self, op: Opcode, expected: &'static str) -> Result<&'a str, AssemblerError> {
        self.first.ok_or_else(|| self.missing(op, expected))
    }

    fn second(&self, op: Opcode, expected: &'static str) -> Result<&'a str, AssemblerError> {
        self.rest.ok_or_else(|| self.missing(op, expected))
    }

    fn missing(&self, op: Opcode, expected: &'static str) -> AssemblerError {
        AssemblerError::MissingOperand {
            line: self.line_num,
            text: self.line.to_string(),
            mnemonic: op.mnemonic(),
            expected,
        }
    }

    fn register(&self, text: &str) -> Result<RegisterIndex, AssemblerError> {
        RegisterIndex::parse(text).ok_or_else(|| AssemblerError::InvalidRegister {
            line: self.line_num,
            text: self.line.to_string(),
            register: text.to_string(),
        })
    }

    /// Unsigned decimal or `0x` hex literal no larger than `max`.
    fn number(&self, text: &str, max: u64) -> Result<u64, AssemblerError> {
        let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => text.parse::<u64>(),
        };
        self.in_range(text, parsed.ok(), max)
    }

    /// Hexadecimal byte, `0x` prefix optional.
    fn hex_byte(&self, text: &str) -> Result<u8, AssemblerError> {
        let digits = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")).unwrap_or(text);
        let parsed = u64::from_str_radix(digits, 16).ok();
        self.in_range(text, parsed, u8::MAX as u64).map(|v| v as u8)
    }

    fn in_range(&self, text: &str, parsed: Option<u64>, max: u64) -> Result<u64, AssemblerError> {
        match parsed {
            Some(value) if value <= max => Ok(value),
            Some(_) => Err(AssemblerError::ValueOutOfRange {
                line: self.line_num,
                text: self.line.to_string(),
                value: text.to_string(),
                max,
            }),
            None => Err(AssemblerError::InvalidNumber {
                line: self.line_num,
                text: self.line.to_string(),
                value: text.to_string(),
            }),
        }
    }
}

/// Take the next whitespace-delimited field off the front of `rest`.
fn next_field<'a>(rest: &mut &'a str) -> Option<&'a str> {
    let trimmed = rest.trim_start();
    if trimmed.is_empty() {
        *rest = trimmed;
        return None;
    }
    let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
    let (field, tail) = trimmed.split_at(end);
    *rest = tail;
    Some(field)
}

/// Errors that can occur during assembly.
///
/// Each carries the 1-based line number and the offending line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblerError {
    #[error("line {line}: unknown mnemonic `{mnemonic}`: {text}")]
    UnknownMnemonic { line: usize, text: String, mnemonic: String },

    #[error("line {line}: `{mnemonic}` requires {expected}: {text}")]
    MissingOperand { line: usize, text: String, mnemonic: &'static str, expected: &'static str },

    #[error("line {line}: invalid register `{register}` (use R0..R15 or A..P): {text}")]
    InvalidRegister { line: usize, text: String, register: String },

    #[error("line {line}: `{value}` is not a number: {text}")]
    InvalidNumber { line: usize, text: String, value: String },

    #[error("line {line}: value {value} out of range (max {max}): {text}")]
    ValueOutOfRange { line: usize, text: String, value: String, max: u64 },

    #[error("line {line}: `{mnemonic}` does not take strings, use `set-string`: {text}")]
    StringNotAllowed { line: usize, text: String, mnemonic: String },

    #[error("line {line}: expected a double-quoted string: {text}")]
    ExpectedString { line: usize, text: String },

    #[error("line {line}: strings may not contain NUL: {text}")]
    NulInString { line: usize, text: String },
}

impl AssemblerError {
    /// The 1-based source line the error refers to.
    pub fn line(&self) -> usize {
        match self {
            AssemblerError::UnknownMnemonic { line, .. }
            | AssemblerError::MissingOperand { line, .. }
            | AssemblerError::InvalidRegister { line, .. }
            | AssemblerError::InvalidNumber { line, .. }
            | AssemblerError::ValueOutOfRange { line, .. }
            | AssemblerError::StringNotAllowed { line, .. }
            | AssemblerError::ExpectedString { line, .. }
            | AssemblerError::NulInString { line, .. } => *line,
        }
    }
}
