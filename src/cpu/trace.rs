//! Tracing hooks for the execution engine.
//!
//! The engine never prints. It reports what it does to a [`TraceSink`],
//! and only the events the sink asks for through its [`TraceMask`].
//! The default sink, [`NullTrace`], asks for nothing.

use std::io::Write;
use crate::cpu::decode::Instruction;
use crate::cpu::execute::Fault;
use crate::isa::{RegisterIndex, RegisterValue};

/// A set of trace events requested by a [`TraceSink`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TraceMask(u32);

impl std::ops::BitOr for TraceMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for TraceMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl TraceMask {
    /// No tracing.
    pub const NONE: Self = Self(0);
    /// Recoverable faults.
    ///
    /// Enables [`TraceSink::fault`].
    pub const FAULTS: Self = Self(1 << 0);
    /// Every interrupt raised.
    ///
    /// Enables [`TraceSink::interrupt`].
    pub const INTERRUPTS: Self = Self(1 << 1);
    /// Every register write.
    ///
    /// Enables [`TraceSink::register_write`].
    pub const REGISTERS: Self = Self(1 << 2);
    /// Every executed instruction.
    ///
    /// Enables [`TraceSink::instr`].
    pub const INSTR: Self = Self(1 << 3);
    /// The transition to halted.
    ///
    /// Enables [`TraceSink::halted`].
    pub const HALT: Self = Self(1 << 4);
    /// Everything.
    pub const ALL: Self = Self(0b1_1111);

    /// Returns `true` if this mask includes all bits in `other`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl Default for TraceMask {
    fn default() -> Self {
        TraceMask::NONE
    }
}

/// A trace sink that can receive engine events.
pub trait TraceSink {
    /// Returns the set of events the sink wants.
    fn mask(&self) -> TraceMask {
        TraceMask::NONE
    }

    /// Called for each executed instruction, before it takes effect.
    ///
    /// - `pc`: address of the opcode byte
    /// - `next_pc`: address of the following instruction
    fn instr(&mut self, _pc: usize, _next_pc: usize, _instr: &Instruction) {}

    /// Called after a register is written.
    fn register_write(&mut self, _reg: RegisterIndex, _value: &RegisterValue) {}

    /// Called when an `int` instruction is dispatched.
    fn interrupt(&mut self, _pc: usize, _code: u8) {}

    /// Called for each recoverable fault.
    fn fault(&mut self, _fault: &Fault) {}

    /// Called once, when the machine halts. `cycles` includes the
    /// instruction that halted it.
    fn halted(&mut self, _pc: usize, _cycles: u64) {}
}

/// Sink that requests no events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTrace;

impl TraceSink for NullTrace {}

/// Sink that writes one line per event to any [`Write`].
///
/// Write errors are ignored; tracing never stops the machine.
pub struct WriterTrace<W: Write> {
    out: W,
    mask: TraceMask,
}

impl<W: Write> WriterTrace<W> {
    pub fn new(out: W, mask: TraceMask) -> Self {
        Self { out, mask }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TraceSink for WriterTrace<W> {
    fn mask(&self) -> TraceMask {
        self.mask
    }

    fn instr(&mut self, pc: usize, next_pc: usize, instr: &Instruction) {
        let _ = writeln!(self.out, "[trace] {:04X}..{:04X}  {}", pc, next_pc, instr);
    }

    fn register_write(&mut self, reg: RegisterIndex, value: &RegisterValue) {
        let _ = writeln!(self.out, "[trace]   {} <- {}", reg, value);
    }

    fn interrupt(&mut self, pc: usize, code: u8) {
        let _ = writeln!(self.out, "[trace] {:04X}  interrupt 0x{:02X}", pc, code);
    }

    fn fault(&mut self, fault: &Fault) {
        let _ = writeln!(self.out, "[warn]  {}", fault);
    }

    fn halted(&mut self, pc: usize, cycles: u64) {
        let _ = writeln!(self.out, "[trace] halted at {:04X} after {} cycles", pc, cycles);
    }
}
