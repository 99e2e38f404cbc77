//! Disassembler for SC images.
//!
//! Walks the image from offset 0, one instruction at a time, using the
//! operand widths from the ISA table. There is no way to resynchronize after
//! a byte that is not an opcode, so the listing stops there.

use crate::cpu::decode::{decode, Instruction, DecodeError};

/// Decode every instruction in an image.
///
/// Returns `(offset, length, instruction)` for each instruction, and the
/// error that stopped the walk if it did not reach the end cleanly.
pub fn decode_all(image: &[u8]) -> (Vec<(usize, usize, Instruction)>, Option<DecodeError>) {
    let mut out = Vec::new();
    let mut at = 0;

    while at < image.len() {
        match decode(image, at) {
            Ok((instr, len)) => {
                out.push((at, len, instr));
                at += len;
            }
            Err(e) => return (out, Some(e)),
        }
    }

    (out, None)
}

/// Disassemble an image to readable text.
pub fn disassemble(image: &[u8]) -> String {
    let mut output = String::new();
    output.push_str("; SC Disassembly\n");
    output.push_str("; --------------\n\n");

    let (instructions, error) = decode_all(image);
    for (at, len, instr) in &instructions {
        let raw: Vec<String> = image[*at..*at + len].iter().map(|b| format!("{:02X}", b)).collect();
        output.push_str(&format!("{:04X}: {:<28}; {}\n", at, instr.to_string(), raw.join(" ")));
    }

    if let Some(e) = error {
        output.push_str(&format!("; stopped: {}\n", e));
    }

    output
}
