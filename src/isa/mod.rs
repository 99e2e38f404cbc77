//! The SC instruction set.
//!
//! This module is the single source of truth shared by the assembler and the
//! execution engine:
//! - [`Opcode`] - The opcode byte catalog and its operand shapes
//! - [`RegisterIndex`] - Register addressing and its wire encoding
//! - [`RegisterValue`] - The tagged value a register holds
//! - [`InterruptCode`] - Services the machine can request from the outside

mod interrupt;
mod opcode;
mod register;

pub use interrupt::InterruptCode;
pub use opcode::{Opcode, OpcodeInfo, OperandShape, OPCODES};
pub use register::{RegisterIndex, RegisterValue, REGISTER_COUNT, REGISTER_WIRE_OFFSET};
