//! Assembler and disassembler for SC programs.
//!
//! This module provides:
//! - A line-oriented, best-effort assembler (text → binary image)
//! - Binary image file I/O
//! - A disassembler (binary image → readable text)

pub mod assembler;
pub mod disasm;
pub mod image;

pub use assembler::{assemble, assemble_strict, AssemblerError, Assembly};
pub use disasm::disassemble;
pub use image::{load_image, save_image, BinaryImage, ImageError};
