//! Property tests for the encoding shared by the assembler and the machine.

use proptest::prelude::*;
use sc::display::RecordingDisplay;
use sc::{assemble, Machine, RegisterIndex, RegisterValue};

proptest! {
    #[test]
    fn set_round_trip(reg in 0usize..16, value in any::<u16>()) {
        let assembly = assemble(&format!("set R{reg} {value}\nhalt"));
        prop_assert!(assembly.is_clean());

        let [hi, lo] = value.to_be_bytes();
        prop_assert_eq!(assembly.image.as_bytes(), &[0x06, reg as u8 + 10, hi, lo, 0x00][..]);

        let mut m = Machine::load(assembly.image.as_bytes(), 16, RecordingDisplay::new()).unwrap();
        m.run().unwrap();
        let index = RegisterIndex::new(reg).unwrap();
        prop_assert_eq!(m.regs.get(index), &RegisterValue::Integer(value));
    }

    #[test]
    fn set_string_round_trip(reg in 0usize..16, text in "[^\\x00\\n\\r]{0,40}") {
        let assembly = assemble(&format!("set-string R{reg} \"{text}\""));
        prop_assert!(assembly.is_clean(), "{:?}", assembly.diagnostics);
        prop_assert_eq!(assembly.image.len(), 3 + text.len());

        let size = assembly.image.len() + 1;
        let mut m = Machine::load(assembly.image.as_bytes(), size, RecordingDisplay::new()).unwrap();
        m.step().unwrap();

        prop_assert_eq!(m.pc, 3 + text.len());
        let index = RegisterIndex::new(reg).unwrap();
        prop_assert_eq!(m.regs.get(index), &RegisterValue::Text(text.clone()));
    }

    #[test]
    fn register_aliases_agree(reg in 0u8..16, value in any::<u16>()) {
        let letter = (b'A' + reg) as char;
        let by_number = assemble(&format!("set R{reg} {value}"));
        let by_letter = assemble(&format!("set {letter} {value}"));

        prop_assert!(by_number.is_clean() && by_letter.is_clean());
        prop_assert_eq!(by_number.image, by_letter.image);
    }

    #[test]
    fn assembly_never_panics(source in "[ -~\\n]{0,200}") {
        let assembly = assemble(&source);
        let mut m = Machine::load(assembly.image.as_bytes(), assembly.image.len() + 1, RecordingDisplay::new()).unwrap();
        let _ = m.run_limited(1000);
    }
}
