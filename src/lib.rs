//! # SC Emulator
//!
//! Assembler and emulator for SC, a small byte-coded instruction set.
//!
//! An SC program is assembled line by line into a headerless binary image.
//! The machine loads the image into zeroed memory and runs a
//! fetch-decode-execute loop over it, asking a display surface to change
//! resolution or draw text through interrupts.

pub mod isa;
pub mod cpu;
pub mod asm;
pub mod display;

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use isa::{InterruptCode, Opcode, RegisterIndex, RegisterValue};
pub use cpu::{CpuError, Instruction, Machine, MachineSnapshot, MachineState, Memory, MemoryError, Registers};
pub use asm::{assemble, assemble_strict, disassemble, load_image, save_image, AssemblerError, BinaryImage};
pub use display::{ConsoleDisplay, DisplaySurface, RecordingDisplay, Resolution};

#[cfg(feature = "tui")]
pub use tui::TerminalDisplay;
