//! WebAssembly bindings for the SC emulator.
//!
//! This module provides JavaScript-friendly wrappers around the core emulator.
//! Output goes to a [`RecordingDisplay`] so the page can render it however
//! it likes.

use wasm_bindgen::prelude::*;
use crate::{Machine, RegisterIndex, RecordingDisplay};
use crate::asm::{assemble, assemble_strict, disassemble};
use crate::cpu::Step;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Default memory size for programs loaded from the page.
const DEFAULT_MEMORY: usize = 4096;

/// WebAssembly-friendly machine wrapper.
#[wasm_bindgen]
pub struct WasmMachine {
    machine: Machine<RecordingDisplay>,
    image: Vec<u8>,
    memory_size: usize,
}

#[wasm_bindgen]
impl WasmMachine {
    /// Create an empty machine with `memory_size` bytes of memory.
    #[wasm_bindgen(constructor)]
    pub fn new(memory_size: Option<usize>) -> Self {
        let memory_size = memory_size.unwrap_or(DEFAULT_MEMORY);
        Self {
            machine: Machine::new(crate::Memory::new(memory_size), RecordingDisplay::new()),
            image: Vec::new(),
            memory_size,
        }
    }

    /// Load a program from assembly source code. Returns the image size.
    #[wasm_bindgen]
    pub fn load_asm(&mut self, source: &str) -> Result<usize, JsError> {
        let image = assemble_strict(source)
            .map_err(|e| JsError::new(&e.to_string()))?;

        self.image = image.into_bytes();
        self.reset()?;
        Ok(self.image.len())
    }

    /// Step one instruction. Returns the executed instruction as text.
    #[wasm_bindgen]
    pub fn step(&mut self) -> Result<String, JsError> {
        match self.machine.step().map_err(|e| JsError::new(&e.to_string()))? {
            Step::Executed(instr) => Ok(instr.to_string()),
            Step::Quit => Ok(String::new()),
        }
    }

    /// Run until halt or max steps. Returns the cycle count.
    #[wasm_bindgen]
    pub fn run(&mut self, max_steps: u32) -> Result<u64, JsError> {
        self.machine
            .run_limited(max_steps as u64)
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(self.machine.cycles)
    }

    /// Reset to the initial state with the loaded program.
    #[wasm_bindgen]
    pub fn reset(&mut self) -> Result<(), JsError> {
        self.machine = Machine::load(&self.image, self.memory_size, RecordingDisplay::new())
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(())
    }

    #[wasm_bindgen]
    pub fn is_running(&self) -> bool {
        self.machine.is_running()
    }

    #[wasm_bindgen]
    pub fn is_halted(&self) -> bool {
        self.machine.is_halted()
    }

    #[wasm_bindgen]
    pub fn cycles(&self) -> u64 {
        self.machine.cycles
    }

    #[wasm_bindgen]
    pub fn pc(&self) -> usize {
        self.machine.pc
    }

    /// Register contents as text, or `undefined` for an index above 15.
    #[wasm_bindgen]
    pub fn register(&self, index: usize) -> Option<String> {
        let reg = RegisterIndex::new(index)?;
        Some(self.machine.regs.get(reg).to_string())
    }

    /// Every string printed so far.
    #[wasm_bindgen]
    pub fn output(&self) -> js_sys::Array {
        self.machine
            .display()
            .rendered_text()
            .into_iter()
            .map(JsValue::from_str)
            .collect()
    }

    /// Current display resolution as `WxH`.
    #[wasm_bindgen]
    pub fn resolution(&self) -> String {
        self.machine.display().surface().resolution().to_string()
    }

    /// Get state as string.
    #[wasm_bindgen]
    pub fn state(&self) -> String {
        format!("{:?}", self.machine.state)
    }

    /// Machine state as JSON.
    #[wasm_bindgen]
    pub fn snapshot_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.machine.snapshot())
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Disassembly of the loaded image.
    #[wasm_bindgen]
    pub fn disassemble(&self) -> String {
        disassemble(&self.image)
    }
}

impl Default for WasmMachine {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Assemble source code and return the image bytes.
///
/// Lines that fail to assemble are skipped, as on the command line.
#[wasm_bindgen]
pub fn wasm_assemble(source: &str) -> Vec<u8> {
    assemble(source).image.into_bytes()
}

/// Disassemble image bytes.
#[wasm_bindgen]
pub fn wasm_disassemble(image: &[u8]) -> String {
    disassemble(image)
}
