//! End-to-end runs: assemble source, load it, run it against a recording display.

use sc::cpu::{CpuError, MemoryError, Step};
use sc::display::{DisplayEvent, RecordingDisplay};
use sc::{assemble, Machine, MachineState, RegisterIndex, RegisterValue, Resolution};

fn run_source(source: &str, memory_size: usize) -> Machine<RecordingDisplay> {
    let assembly = assemble(source);
    assert!(assembly.is_clean(), "diagnostics: {:?}", assembly.diagnostics);
    let mut machine = Machine::load(assembly.image.as_bytes(), memory_size, RecordingDisplay::new()).unwrap();
    machine.run().unwrap();
    machine
}

#[test]
fn set_then_halt() {
    let assembly = assemble("set R0 1000\nhalt");
    assert_eq!(assembly.image.as_bytes(), &[0x06, 0x0A, 0x03, 0xE8, 0x00]);

    let m = run_source("set R0 1000\nhalt", 64);
    assert_eq!(m.state, MachineState::Halted);
    assert_eq!(m.regs.get(RegisterIndex::R0), &RegisterValue::Integer(1000));
    assert_eq!(m.pc, 5);
    assert_eq!(m.cycles, 2);
}

#[test]
fn print_string() {
    let source = "set-string A \"hi\"\nint 07\nhalt";
    let assembly = assemble(source);
    assert_eq!(assembly.image.as_bytes(), &[0x07, 0x0A, 0x68, 0x69, 0x00, 0x05, 0x07, 0x00]);

    let m = run_source(source, 64);
    assert_eq!(m.display().rendered_text(), vec!["hi"]);
    assert_eq!(m.display().surface().lines().len(), 1);
    assert!(m.faults().is_empty());
    assert!(m.is_halted());
}

#[test]
fn set_resolution() {
    let m = run_source("set R0 640\nset R1 480\nint 06\nhalt", 64);

    let events = m.display().events();
    let reinits = events.iter().filter(|e| matches!(e, DisplayEvent::Reinitialize(_))).count();
    assert_eq!(reinits, 1);
    assert_eq!(m.display().resolutions(), vec![Resolution::new(640, 480)]);
    assert_eq!(events.last(), Some(&DisplayEvent::Release));
}

#[test]
fn resolution_out_of_range_falls_back() {
    for (w, h) in [(0, 0), (2000, 2000), (1921, 1080), (1920, 0)] {
        let m = run_source(&format!("set R0 {w}\nset R1 {h}\nint 06\nhalt"), 64);
        assert_eq!(m.display().resolutions(), vec![Resolution::DEFAULT], "{w}x{h}");
    }

    let m = run_source("set R0 800\nset R1 600\nint 06\nhalt", 64);
    assert_eq!(m.display().resolutions(), vec![Resolution::new(800, 600)]);

    let m = run_source("set R0 1920\nset R1 1080\nint 06\nhalt", 64);
    assert_eq!(m.display().resolutions(), vec![Resolution::MAX]);
}

#[test]
fn oversized_image_is_rejected() {
    let assembly = assemble("set-string A \"a long enough string\"\nhalt");
    let size = assembly.image.len() - 1;

    let err = Machine::load(assembly.image.as_bytes(), size, RecordingDisplay::new()).unwrap_err();
    assert_eq!(err, MemoryError::ImageTooLarge { size: size + 1, available: size });
}

#[test]
fn running_off_the_end_is_fatal() {
    let assembly = assemble("set R0 1");
    let mut m = Machine::load(assembly.image.as_bytes(), 4, RecordingDisplay::new()).unwrap();

    let err = m.run().unwrap_err();
    assert_eq!(err, CpuError::Memory(MemoryError::AddressOutOfRange { addr: 4, size: 4 }));
    assert!(err.is_fatal());
    assert!(m.is_halted());
    assert!(m.display().is_released());
}

#[test]
fn zeroed_memory_halts() {
    // Memory past the image is zero, and zero is `halt`.
    let m = run_source("set R2 7", 16);
    assert_eq!(m.regs.get(RegisterIndex::new(2).unwrap()), &RegisterValue::Integer(7));
    assert_eq!(m.pc, 5);
}

#[test]
fn print_integer_register_is_a_fault() {
    let m = run_source("set R0 5\nint 07\nset R1 9\nhalt", 64);

    assert!(m.display().rendered_text().is_empty());
    assert_eq!(m.faults().len(), 1);
    assert_eq!(m.faults()[0].pc, 4);
    assert_eq!(m.regs.get(RegisterIndex::R1), &RegisterValue::Integer(9));
}

#[test]
fn shutdown_interrupt_halts() {
    let m = run_source("int 01\nset R0 1\nhalt", 64);
    assert!(m.is_halted());
    assert_eq!(m.pc, 2);
    assert_eq!(m.regs.get(RegisterIndex::R0), &RegisterValue::Integer(0));
}

#[test]
fn reserved_opcodes_are_skipped() {
    let m = run_source("add\nmem-set 300 4\nif 1 0\nset R0 3\nhalt", 64);
    assert_eq!(m.regs.get(RegisterIndex::R0), &RegisterValue::Integer(3));
    assert_eq!(m.faults().len(), 3);
    assert_eq!(m.cycles, 5);
}

#[test]
fn quit_request_stops_before_fetch() {
    let image = assemble("set R0 1\nset R0 2\nhalt").image;
    let mut m = Machine::load(image.as_bytes(), 64, RecordingDisplay::quit_after(1)).unwrap();

    assert!(matches!(m.step().unwrap(), Step::Executed(_)));
    assert_eq!(m.step().unwrap(), Step::Quit);
    assert!(m.is_halted());
    assert_eq!(m.regs.get(RegisterIndex::R0), &RegisterValue::Integer(1));
    assert_eq!(m.step().unwrap_err(), CpuError::NotRunning);
}

#[test]
fn bad_lines_are_skipped() {
    let assembly = assemble("set R0 1\nbogus 1 2\nset R16 4\nset R0 70000\nhalt");
    assert_eq!(assembly.diagnostics.len(), 3);
    assert_eq!(assembly.image.as_bytes(), &[0x06, 0x0A, 0x00, 0x01, 0x00]);
}

#[test]
fn image_file_round_trip() {
    let path = std::env::temp_dir().join(format!("sc-scenario-{}.bin", std::process::id()));
    let image = assemble("set-string A \"hi\"\nint 07\nhalt").image;

    sc::save_image(&path, &image).unwrap();
    let loaded = sc::load_image(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, image);
    let mut m = Machine::load(loaded.as_bytes(), 32, RecordingDisplay::new()).unwrap();
    m.run().unwrap();
    assert_eq!(m.display().rendered_text(), vec!["hi"]);
}
