//! SC Emulator - CLI Entry Point
//!
//! Commands:
//! - `sc-emu asm <source> <output>` - Assemble to a binary image
//! - `sc-emu run <image> <memory_size>` - Run an image or ASM file
//! - `sc-emu disasm <image>` - Disassemble a binary image
//! - `sc-emu test` - Built-in self-test

use clap::{Parser, Subcommand};
use sc::{DisplaySurface, Machine};

#[derive(Parser)]
#[command(name = "sc-emu")]
#[command(author = "Yigit")]
#[command(version = "0.1.0")]
#[command(about = "Assembler and emulator for the SC byte-coded instruction set")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble source to a binary image
    Asm {
        /// Path to the source file
        source: String,
        /// Output image file
        output: String,
        /// Fail if any line could not be assembled
        #[arg(long)]
        strict: bool,
    },
    /// Run a program until it halts
    Run {
        /// Path to the image or ASM file to execute
        program: String,
        /// Memory size in bytes
        memory_size: usize,
        /// Show trace output on stderr
        #[arg(short, long)]
        trace: bool,
        /// Print output to stdout instead of the terminal display
        #[arg(long)]
        headless: bool,
        /// Keep the terminal display open after halt until a key is pressed
        #[arg(long)]
        hold: bool,
        /// Stop after this many instructions
        #[arg(short, long)]
        max_steps: Option<u64>,
        /// Write the final machine state as JSON
        #[arg(long)]
        dump_state: Option<String>,
    },
    /// Disassemble a binary image to readable text
    Disasm {
        /// Path to the image file
        image: String,
    },
    /// Run the built-in self-test
    Test,
}

/// Options for `run` that don't depend on the display.
struct RunOptions {
    trace: bool,
    max_steps: Option<u64>,
    dump_state: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Asm { source, output, strict }) => {
            assemble_file(&source, &output, strict);
        }
        Some(Commands::Run { program, memory_size, trace, headless, hold, max_steps, dump_state }) => {
            let options = RunOptions { trace, max_steps, dump_state };
            run_program(&program, memory_size, headless, hold, options);
        }
        Some(Commands::Disasm { image }) => {
            disassemble_file(&image);
        }
        Some(Commands::Test) => {
            run_self_test();
        }
        None => {
            println!("SC Emulator v0.1.0");
            println!("Assembler and emulator for the SC instruction set");
            println!();
            println!("Use --help for available commands");
            println!();
            print_opcode_table();
        }
    }
}

fn read_source(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("❌ Failed to read file: {}", e);
            std::process::exit(1);
        }
    }
}

/// Assemble `source`, printing one diagnostic per rejected line.
fn assemble_source(source: &str) -> sc::asm::Assembly {
    let assembly = sc::assemble(source);
    for diagnostic in &assembly.diagnostics {
        eprintln!("⚠️  {}", diagnostic);
    }
    assembly
}

fn assemble_file(source_path: &str, out_path: &str, strict: bool) {
    println!("📝 Assembling: {} → {}", source_path, out_path);

    let source = read_source(source_path);
    let assembly = assemble_source(&source);

    if strict && !assembly.is_clean() {
        eprintln!("❌ {} line(s) could not be assembled", assembly.diagnostics.len());
        std::process::exit(1);
    }

    println!("✓ Assembled {} bytes", assembly.image.len());

    if let Err(e) = sc::save_image(out_path, &assembly.image) {
        eprintln!("❌ Failed to save image: {}", e);
        std::process::exit(1);
    }

    println!("✓ Saved to {}", out_path);
}

fn load_program(path: &str) -> Vec<u8> {
    if path.ends_with(".asm") {
        let source = read_source(path);
        let assembly = assemble_source(&source);
        println!("📝 Assembled {} bytes", assembly.image.len());
        assembly.image.into_bytes()
    } else {
        match sc::load_image(path) {
            Ok(image) => {
                println!("📂 Loaded {} bytes", image.len());
                image.into_bytes()
            }
            Err(e) => {
                eprintln!("❌ Failed to load image: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn run_program(path: &str, memory_size: usize, headless: bool, hold: bool, options: RunOptions) {
    println!("🔧 Running: {}", path);

    let image = load_program(path);

    #[cfg(feature = "tui")]
    if !headless {
        match sc::TerminalDisplay::new(hold) {
            Ok(display) => {
                execute(&image, memory_size, display, options);
                return;
            }
            Err(e) => {
                eprintln!("⚠️  Terminal display unavailable ({}), falling back to console", e);
            }
        }
    }
    #[cfg(not(feature = "tui"))]
    let _ = (headless, hold);

    println!();
    println!("━━━ Output ━━━");
    execute(&image, memory_size, sc::ConsoleDisplay::new(std::io::stdout()), options);
}

fn execute<D: DisplaySurface>(image: &[u8], memory_size: usize, display: D, options: RunOptions) {
    use sc::cpu::{TraceMask, WriterTrace};

    let mut machine = match Machine::load(image, memory_size, display) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("❌ Failed to load program: {}", e);
            std::process::exit(1);
        }
    };

    if options.trace {
        machine = machine.with_trace(WriterTrace::new(std::io::stderr(), TraceMask::ALL));
    }

    let result = match options.max_steps {
        Some(max) => machine.run_limited(max),
        None => machine.run(),
    };

    let snapshot = machine.snapshot();
    let faults: Vec<String> = machine.faults().iter().map(|f| f.to_string()).collect();
    let running = machine.is_running();
    // Gives the terminal back before anything else is printed.
    drop(machine);

    println!();
    println!("━━━ Result ━━━");
    println!("Cycles: {}", snapshot.cycles);
    println!("State: {:?}", snapshot.state);
    println!("PC: 0x{:04X}", snapshot.pc);
    for (reg, value) in snapshot.registers.iter() {
        if *value != sc::RegisterValue::default() {
            println!("{:>4}: {}", reg.to_string(), value);
        }
    }

    for fault in &faults {
        eprintln!("⚠️  Fault {}", fault);
    }

    if let Some(path) = &options.dump_state {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    eprintln!("❌ Failed to write state: {}", e);
                    std::process::exit(1);
                }
                println!("✓ State written to {}", path);
            }
            Err(e) => {
                eprintln!("❌ Failed to serialize state: {}", e);
                std::process::exit(1);
            }
        }
    }

    if let Err(e) = result {
        eprintln!("❌ Machine error: {}", e);
        std::process::exit(1);
    }

    if running {
        if let Some(max) = options.max_steps {
            println!();
            println!("⚠️  Reached step limit ({}). Use --max-steps to increase.", max);
        }
    }
}

fn disassemble_file(image_path: &str) {
    println!("📖 Disassembling: {}", image_path);
    println!();

    let image = match sc::load_image(image_path) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("❌ Failed to load image: {}", e);
            std::process::exit(1);
        }
    };

    println!("{}", sc::disassemble(image.as_bytes()));
}

fn print_opcode_table() {
    use sc::isa::OPCODES;

    println!("━━━ Instruction Set ━━━");
    println!();
    for info in OPCODES.iter() {
        let aliases = if info.aliases.is_empty() {
            String::new()
        } else {
            format!(" ({})", info.aliases.join(", "))
        };
        let note = if info.opcode.is_implemented() { "" } else { "  [reserved]" };
        println!("  0x{:02X}  {}{}{}", info.opcode.byte(), info.mnemonic, aliases, note);
    }
}

fn run_self_test() {
    use sc::display::{DisplayEvent, RecordingDisplay};
    use sc::{assemble, Resolution};

    println!("━━━ SC Emulator Self-Test ━━━");
    println!();

    let mut passed = 0;
    let mut failed = 0;

    let mut check = |name: &str, ok: bool| {
        if ok {
            println!("{}... ✓", name);
            passed += 1;
        } else {
            println!("{}... ✗", name);
            failed += 1;
        }
    };

    // Test 1: set + halt
    let assembly = assemble("set R0 1000\nhalt");
    check("Encode set/halt", assembly.image.as_bytes() == [0x06, 0x0A, 0x03, 0xE8, 0x00]);
    let ok = Machine::load(assembly.image.as_bytes(), 64, RecordingDisplay::new())
        .ok()
        .map(|mut m| {
            let run = m.run();
            run.is_ok() && m.is_halted() && m.regs.get(sc::RegisterIndex::R0).as_integer() == Some(1000)
        })
        .unwrap_or(false);
    check("Run set/halt", ok);

    // Test 2: print string
    let assembly = assemble("set-string A \"hi\"\nint 07\nhalt");
    check(
        "Encode set-string/int",
        assembly.image.as_bytes() == [0x07, 0x0A, 0x68, 0x69, 0x00, 0x05, 0x07, 0x00],
    );
    let ok = Machine::load(assembly.image.as_bytes(), 64, RecordingDisplay::new())
        .ok()
        .map(|mut m| m.run().is_ok() && m.display().rendered_text() == ["hi"])
        .unwrap_or(false);
    check("Print string interrupt", ok);

    // Test 3: set resolution
    let assembly = assemble("set R0 640\nset R1 480\nint 06\nhalt");
    let ok = Machine::load(assembly.image.as_bytes(), 64, RecordingDisplay::new())
        .ok()
        .map(|mut m| {
            let run = m.run();
            let reinits = m
                .display()
                .events()
                .iter()
                .filter(|e| matches!(e, DisplayEvent::Reinitialize(_)))
                .count();
            run.is_ok() && reinits == 1 && m.display().resolutions() == [Resolution::new(640, 480)]
        })
        .unwrap_or(false);
    check("Set resolution interrupt", ok);

    // Test 4: oversized image
    let ok = Machine::load(&[0u8; 16], 8, RecordingDisplay::new()).is_err();
    check("Oversized image rejected", ok);

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Results: {} passed, {} failed", passed, failed);

    if failed == 0 {
        println!("✓ All tests passed!");
    } else {
        std::process::exit(1);
    }
}
