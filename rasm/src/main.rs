use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use rcpu::{constants, Engine, Memory, ProcessorState};

#[derive(Parser)]
#[command(name = "rasm", version, about = "RiSC-16 assembler and runner")]
struct Opts {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Assemble a source file into a flat big-endian binary image.
    Build {
        input: PathBuf,
        /// Output path; defaults to the input with a `.bin` extension.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the listing: addresses, encodings, source lines and
        /// the symbol table.
        #[arg(short, long)]
        listing: bool,
    },
    /// Assemble a source file and execute it until it halts.
    Run {
        input: PathBuf,
        /// Memory size in bytes; must be a power of two.
        #[arg(short, long, default_value_t = 65536)]
        memory: usize,
        /// Give up after this many executed instructions.
        #[arg(short, long, default_value_t = constants::DEFAULT_STEP_LIMIT)]
        limit: u64,
    },
}

fn main() -> Result<()> {
    match Opts::parse().command {
        Command::Build {
            input,
            output,
            listing,
        } => build(&input, output, listing),
        Command::Run {
            input,
            memory,
            limit,
        } => run(&input, memory, limit),
    }
}

fn load_assembly(input: &Path) -> Result<rasm::Assembly> {
    let source = fs::read_to_string(input)
        .with_context(|| format!("reading \"{}\" failed", input.display()))?;
    let assembly = rasm::assemble(&source);
    for warning in &assembly.warnings {
        eprintln!("{}", warning);
    }
    if let Some(error) = assembly.errors.first() {
        bail!("{}", error.detailed());
    }
    Ok(assembly)
}

fn build(input: &Path, output: Option<PathBuf>, listing: bool) -> Result<()> {
    let assembly = load_assembly(input)?;
    let program = assembly.to_program();

    let output = output.unwrap_or_else(|| input.with_extension("bin"));
    rimg::write_file(&output, &program)
        .with_context(|| format!("writing \"{}\" failed", output.display()))?;

    if listing {
        print_listing(&assembly);
    }
    Ok(())
}

fn print_listing(assembly: &rasm::Assembly) {
    let mut rows: Vec<(u16, u16, String)> = assembly
        .instructions
        .iter()
        .map(|record| {
            (
                record.address,
                record.instruction.encode(),
                record.instruction.to_string(),
            )
        })
        .chain(
            assembly
                .data
                .iter()
                .map(|record| (record.address, record.value, ".fill".to_owned())),
        )
        .collect();
    rows.sort_by_key(|row| row.0);

    for (address, word, text) in rows {
        println!("{:04x}  {:04x}  {}", address, word, text);
    }

    if !assembly.symbols.is_empty() {
        println!();
        for symbol in assembly.symbols.iter() {
            println!("{:04x}  {}", symbol.address, symbol.name);
        }
    }
}

fn run(input: &Path, memory_size: usize, limit: u64) -> Result<()> {
    if !memory_size.is_power_of_two() {
        bail!("memory size {} is not a power of two", memory_size);
    }

    let assembly = load_assembly(input)?;
    let program = assembly.to_program();

    let mut memory = Memory::new(memory_size);
    program
        .load(&mut memory)
        .context("loading the program failed")?;

    let mut engine = Engine::new(memory);
    let result = engine.run(ProcessorState::new(), limit);

    println!("{}", result.state);
    match result.fault {
        None => Ok(()),
        Some(fault) => bail!("execution stopped: {}", fault),
    }
}
