//! Machine memory.
//!
//! A flat, zero-initialized byte array whose size is chosen at load time.
//! The binary image is copied to address 0 and the rest stays zero.

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Byte-addressable machine memory.
#[derive(Clone, Serialize, Deserialize)]
pub struct Memory {
    bytes: Vec<u8>,
}

impl Memory {
    /// Create a zeroed memory of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self { bytes: vec![0; size] }
    }

    /// Create a memory of `size` bytes holding `image` at address 0.
    ///
    /// An image larger than `size` is an error; it is never truncated.
    pub fn with_image(image: &[u8], size: usize) -> Result<Self, MemoryError> {
        let mut mem = Self::new(size);
        mem.load_image(image)?;
        Ok(mem)
    }

    /// Copy an image to address 0, zeroing everything after it.
    pub fn load_image(&mut self, image: &[u8]) -> Result<(), MemoryError> {
        if image.len() > self.bytes.len() {
            return Err(MemoryError::ImageTooLarge {
                size: image.len(),
                available: self.bytes.len(),
            });
        }

        self.bytes[..image.len()].copy_from_slice(image);
        self.bytes[image.len()..].fill(0);
        Ok(())
    }

    /// Read one byte.
    #[inline]
    pub fn read(&self, addr: usize) -> Result<u8, MemoryError> {
        self.bytes.get(addr).copied().ok_or(MemoryError::AddressOutOfRange {
            addr,
            size: self.bytes.len(),
        })
    }

    /// The whole address space.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Size in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Only count non-zero bytes
        let non_zero = self.bytes.iter().filter(|b| **b != 0).count();

        f.debug_struct("Memory")
            .field("non_zero_bytes", &non_zero)
            .field("total_bytes", &self.bytes.len())
            .finish()
    }
}

/// Errors that can occur during memory operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// Address is outside the configured memory.
    #[error("memory address 0x{addr:04X} out of range (memory is {size} bytes)")]
    AddressOutOfRange { addr: usize, size: usize },

    /// Image is too large to fit in memory.
    #[error("image size {size} exceeds memory size {available}")]
    ImageTooLarge { size: usize, available: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_read() {
        let mem = Memory::with_image(&[0, 42], 16).unwrap();
        assert_eq!(mem.read(1).unwrap(), 42);
        assert_eq!(mem.read(15).unwrap(), 0);
    }

    #[test]
    fn test_memory_bounds() {
        let mem = Memory::new(4);
        assert!(mem.read(3).is_ok());
        assert_eq!(mem.read(4), Err(MemoryError::AddressOutOfRange { addr: 4, size: 4 }));
    }

    #[test]
    fn test_image_is_zero_padded() {
        let mem = Memory::with_image(&[1, 2, 3], 8).unwrap();
        assert_eq!(mem.as_slice(), &[1, 2, 3, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_image_exactly_fits() {
        let mem = Memory::with_image(&[9; 4], 4).unwrap();
        assert_eq!(mem.len(), 4);
    }

    #[test]
    fn test_oversized_image_is_rejected() {
        let err = Memory::with_image(&[0; 10], 9).unwrap_err();
        assert_eq!(err, MemoryError::ImageTooLarge { size: 10, available: 9 });
    }
}
