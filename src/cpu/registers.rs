//! The register file.
//!
//! Sixteen slots, each holding a [`RegisterValue`]. All slots start as the
//! integer zero.

use crate::isa::{RegisterIndex, RegisterValue, REGISTER_COUNT};
use serde::{Serialize, Deserialize};

/// The SC register file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    slots: Vec<RegisterValue>,
}

impl Registers {
    /// Create a register file with every register set to integer zero.
    pub fn new() -> Self {
        Self {
            slots: vec![RegisterValue::default(); REGISTER_COUNT],
        }
    }

    #[inline]
    pub fn get(&self, reg: RegisterIndex) -> &RegisterValue {
        &self.slots[reg.index()]
    }

    #[inline]
    pub fn set(&mut self, reg: RegisterIndex, value: RegisterValue) {
        self.slots[reg.index()] = value;
    }

    /// Iterate over `(index, value)` pairs in register order.
    pub fn iter(&self) -> impl Iterator<Item = (RegisterIndex, &RegisterValue)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, value)| RegisterIndex::new(i).map(|reg| (reg, value)))
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registers_start_at_zero() {
        let regs = Registers::new();
        assert_eq!(regs.iter().count(), REGISTER_COUNT);
        assert!(regs.iter().all(|(_, v)| *v == RegisterValue::Integer(0)));
    }

    #[test]
    fn test_tag_can_change() {
        let mut regs = Registers::new();
        let r3 = RegisterIndex::new(3).unwrap();

        regs.set(r3, RegisterValue::Integer(12));
        assert_eq!(regs.get(r3).as_integer(), Some(12));

        regs.set(r3, RegisterValue::Text("now a string".into()));
        assert_eq!(regs.get(r3).as_text(), Some("now a string"));
    }
}
