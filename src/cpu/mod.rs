//! Execution engine for the SC machine.
//!
//! This module implements the machine side of the ISA:
//! - A byte-addressable memory sized at load time
//! - 16 registers, each holding an integer or a string
//! - A fetch-decode-execute loop with an interrupt service routine
//! - Trace hooks for observing execution

pub mod memory;
pub mod registers;
pub mod decode;
pub mod execute;
pub mod trace;

pub use memory::{Memory, MemoryError};
pub use registers::Registers;
pub use decode::{Instruction, DecodeError};
pub use execute::{CpuError, Fault, Machine, MachineSnapshot, MachineState, Step};
pub use trace::{NullTrace, TraceMask, TraceSink, WriterTrace};
