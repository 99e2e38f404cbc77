//! Binary image files.
//!
//! An image is the raw instruction stream and nothing else: no magic
//! number, no length prefix, no delimiters between instructions.

use std::path::Path;
use crate::cpu::decode::{encode_into, Instruction};
use thiserror::Error;

/// An encoded program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryImage {
    bytes: Vec<u8>,
}

impl BinaryImage {
    /// Create a new empty image.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Append an encoded instruction.
    pub fn push(&mut self, instr: &Instruction) {
        encode_into(instr, &mut self.bytes);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Get the number of bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Load an image from disk.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<BinaryImage, ImageError> {
    let path = path.as_ref();
    std::fs::read(path)
        .map(BinaryImage::from_bytes)
        .map_err(|e| ImageError::IoError(format!("{}: {}", path.display(), e)))
}

/// Save an image to disk.
pub fn save_image<P: AsRef<Path>>(path: P, image: &BinaryImage) -> Result<(), ImageError> {
    let path = path.as_ref();
    std::fs::write(path, image.as_bytes())
        .map_err(|e| ImageError::IoError(format!("{}: {}", path.display(), e)))
}

/// Errors that can occur while reading or writing images.
#[derive(Debug, Clone, Error)]
pub enum ImageError {
    #[error("I/O error: {0}")]
    IoError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::RegisterIndex;

    #[test]
    fn test_push_appends_without_delimiters() {
        let mut image = BinaryImage::new();
        image.push(&Instruction::Interrupt { code: 1 });
        image.push(&Instruction::Set { reg: RegisterIndex::R1, value: 2 });
        image.push(&Instruction::Halt);

        assert_eq!(image.as_bytes(), &[0x05, 0x01, 0x06, 0x0B, 0x00, 0x02, 0x00]);
        assert_eq!(image.len(), 7);
    }

    #[test]
    fn test_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("sc-image-test-{}.bin", std::process::id()));
        let image = BinaryImage::from_bytes(vec![0x06, 0x0A, 0x03, 0xE8, 0x00]);

        save_image(&path, &image).unwrap();
        let loaded = load_image(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, image);
    }

    #[test]
    fn test_missing_file() {
        let err = load_image("/definitely/not/here.bin").unwrap_err();
        assert!(err.to_string().contains("here.bin"));
    }
}
