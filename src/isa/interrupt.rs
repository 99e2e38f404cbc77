//! Interrupt codes understood by the interrupt service routine.

use serde::{Serialize, Deserialize};

/// A service the program can request with `int`.
///
/// Registers 0 and 1 carry the arguments.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterruptCode {
    /// Stop the machine.
    Shutdown = 0x01,
    /// Reinitialize the display at (R0, R1).
    SetResolution = 0x06,
    /// Draw the string held in R0.
    PrintString = 0x07,
}

impl InterruptCode {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(InterruptCode::Shutdown),
            0x06 => Some(InterruptCode::SetResolution),
            0x07 => Some(InterruptCode::PrintString),
            _ => None,
        }
    }

    #[inline]
    pub const fn byte(self) -> u8 {
        self as u8
    }
}
