//! Execution engine for the SC machine.
//!
//! Implements the fetch-decode-execute cycle and the interrupt service
//! routine.

use std::fmt;
use crate::cpu::{Memory, Registers};
use crate::cpu::decode::{self, Instruction, DecodeError};
use crate::cpu::memory::MemoryError;
use crate::cpu::trace::{NullTrace, TraceMask, TraceSink};
use crate::display::{DisplaySurface, Resolution};
use crate::isa::{InterruptCode, Opcode, RegisterIndex, RegisterValue};
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Machine execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachineState {
    /// Fetching and executing instructions.
    Running,
    /// Stopped for good: `halt`, shutdown interrupt, quit request or a fatal error.
    Halted,
}

/// What a single [`Machine::step`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// An instruction was fetched and executed.
    Executed(Instruction),
    /// The display asked to quit; nothing was fetched.
    Quit,
}

/// A recoverable error, with the address of the instruction that raised it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub pc: usize,
    pub error: CpuError,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at 0x{:04X}: {}", self.pc, self.error)
    }
}

/// The SC machine.
///
/// Owns its memory, registers and program counter exclusively. The display
/// surface is handed in at construction and released when the machine halts.
pub struct Machine<D: DisplaySurface> {
    /// Register file.
    pub regs: Registers,
    /// Main memory.
    pub mem: Memory,
    /// Address of the next byte to fetch.
    pub pc: usize,
    /// Current execution state.
    pub state: MachineState,
    /// Instruction count.
    pub cycles: u64,
    display: D,
    trace: Box<dyn TraceSink>,
    trace_mask: TraceMask,
    faults: Vec<Fault>,
}

impl<D: DisplaySurface> Machine<D> {
    /// Create a machine over already-loaded memory.
    pub fn new(mem: Memory, display: D) -> Self {
        Self {
            regs: Registers::new(),
            mem,
            pc: 0,
            state: MachineState::Running,
            cycles: 0,
            display,
            trace: Box::new(NullTrace),
            trace_mask: TraceMask::NONE,
            faults: Vec::new(),
        }
    }

    /// Load `image` into a zeroed memory of `memory_size` bytes.
    pub fn load(image: &[u8], memory_size: usize, display: D) -> Result<Self, MemoryError> {
        let mem = Memory::with_image(image, memory_size)?;
        Ok(Self::new(mem, display))
    }

    /// Install a trace sink.
    pub fn with_trace(mut self, sink: impl TraceSink + 'static) -> Self {
        self.set_trace(Box::new(sink));
        self
    }

    fn set_trace(&mut self, sink: Box<dyn TraceSink>) {
        self.trace_mask = sink.mask();
        self.trace = sink;
    }

    /// Execute a single instruction.
    ///
    /// Fatal errors (bounds, decode) halt the machine before they are returned.
    pub fn step(&mut self) -> Result<Step, CpuError> {
        if self.state != MachineState::Running {
            return Err(CpuError::NotRunning);
        }

        if self.display.poll_quit() {
            self.halt();
            return Ok(Step::Quit);
        }

        let pc = self.pc;
        let result = self.fetch_decode(pc);
        let (instr, len) = match result {
            Ok(decoded) => decoded,
            Err(e) => {
                self.halt();
                return Err(e);
            }
        };

        self.pc = pc + len;
        if self.trace_mask.contains(TraceMask::INSTR) {
            self.trace.instr(pc, self.pc, &instr);
        }

        // Includes this instruction, so `halted` sees it.
        self.cycles += 1;
        self.execute(&instr, pc);

        Ok(Step::Executed(instr))
    }

    /// Run until halt or fatal error.
    ///
    /// Returns the number of instructions executed.
    pub fn run(&mut self) -> Result<u64, CpuError> {
        let start_cycles = self.cycles;

        while self.state == MachineState::Running {
            self.step()?;
        }

        Ok(self.cycles - start_cycles)
    }

    /// Run for at most `max_cycles` instructions.
    pub fn run_limited(&mut self, max_cycles: u64) -> Result<u64, CpuError> {
        let start_cycles = self.cycles;
        let limit = self.cycles.saturating_add(max_cycles);

        while self.state == MachineState::Running && self.cycles < limit {
            self.step()?;
        }

        Ok(self.cycles - start_cycles)
    }

    fn fetch_decode(&self, pc: usize) -> Result<(Instruction, usize), CpuError> {
        self.mem.read(pc)?;
        Ok(decode::decode(self.mem.as_slice(), pc)?)
    }

    /// Execute a decoded instruction. `pc` is its address.
    fn execute(&mut self, instr: &Instruction, pc: usize) {
        match instr {
            Instruction::Halt => self.halt(),

            Instruction::Set { reg, value } => {
                self.write_register(*reg, RegisterValue::Integer(*value));
            }

            Instruction::SetString { reg, text } => {
                self.write_register(*reg, RegisterValue::Text(text.clone()));
            }

            Instruction::Interrupt { code } => {
                if self.trace_mask.contains(TraceMask::INTERRUPTS) {
                    self.trace.interrupt(pc, *code);
                }
                if let Err(e) = self.service_interrupt(*code) {
                    self.record_fault(pc, e);
                }
            }

            // Operands were already consumed by width; nothing else to do.
            Instruction::MemSet { .. } | Instruction::If { .. } | Instruction::Reserved(_) => {
                self.record_fault(pc, CpuError::Unimplemented { opcode: instr.opcode() });
            }
        }
    }

    /// The interrupt service routine.
    fn service_interrupt(&mut self, code: u8) -> Result<(), CpuError> {
        match InterruptCode::from_byte(code) {
            Some(InterruptCode::Shutdown) => {
                self.halt();
            }
            Some(InterruptCode::SetResolution) => {
                let width = self.integer_arg(RegisterIndex::R0)?;
                let height = self.integer_arg(RegisterIndex::R1)?;
                let resolution = Resolution::validated(width as u32, height as u32);
                self.display.reinitialize(resolution);
            }
            Some(InterruptCode::PrintString) => {
                let text = match self.regs.get(RegisterIndex::R0) {
                    RegisterValue::Text(text) => text.clone(),
                    other => return Err(CpuError::RegisterType {
                        reg: RegisterIndex::R0,
                        expected: "string",
                        found: other.kind(),
                    }),
                };
                self.display.render_text(&text);
            }
            None => return Err(CpuError::UnknownInterrupt { code }),
        }
        Ok(())
    }

    fn integer_arg(&self, reg: RegisterIndex) -> Result<u16, CpuError> {
        match self.regs.get(reg) {
            RegisterValue::Integer(value) => Ok(*value),
            other => Err(CpuError::RegisterType {
                reg,
                expected: "integer",
                found: other.kind(),
            }),
        }
    }

    fn write_register(&mut self, reg: RegisterIndex, value: RegisterValue) {
        if self.trace_mask.contains(TraceMask::REGISTERS) {
            self.trace.register_write(reg, &value);
        }
        self.regs.set(reg, value);
    }

    fn record_fault(&mut self, pc: usize, error: CpuError) {
        let fault = Fault { pc, error };
        if self.trace_mask.contains(TraceMask::FAULTS) {
            self.trace.fault(&fault);
        }
        self.faults.push(fault);
    }

    /// Stop the machine and release the display. Idempotent.
    fn halt(&mut self) {
        if self.state == MachineState::Halted {
            return;
        }
        self.state = MachineState::Halted;
        if self.trace_mask.contains(TraceMask::HALT) {
            self.trace.halted(self.pc, self.cycles);
        }
        self.display.release();
    }

    /// Recoverable faults raised so far.
    pub fn faults(&self) -> &[Fault] {
        &self.faults
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Check if the machine is halted.
    pub fn is_halted(&self) -> bool {
        self.state == MachineState::Halted
    }

    /// Check if the machine is running.
    pub fn is_running(&self) -> bool {
        self.state == MachineState::Running
    }

    /// Serializable view of the machine state.
    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            state: self.state,
            pc: self.pc,
            cycles: self.cycles,
            memory_size: self.mem.len(),
            registers: self.regs.clone(),
            faults: self.faults.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl<D: DisplaySurface> fmt::Debug for Machine<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("state", &self.state)
            .field("pc", &self.pc)
            .field("cycles", &self.cycles)
            .field("regs", &self.regs)
            .field("mem", &self.mem)
            .finish()
    }
}

/// Machine state as written by `run --dump-state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    pub state: MachineState,
    pub pc: usize,
    pub cycles: u64,
    pub memory_size: usize,
    pub registers: Registers,
    pub faults: Vec<String>,
}

/// Errors that can occur during execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("machine is not running")]
    NotRunning,

    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("register {reg} holds a {found}, expected a {expected}")]
    RegisterType { reg: RegisterIndex, expected: &'static str, found: &'static str },

    #[error("unknown interrupt code 0x{code:02X}")]
    UnknownInterrupt { code: u8 },

    #[error("opcode `{opcode}` has no behavior; skipped")]
    Unimplemented { opcode: Opcode },
}

impl CpuError {
    /// Whether the error stops the machine.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CpuError::NotRunning | CpuError::Memory(_) | CpuError::Decode(_))
    }
}
