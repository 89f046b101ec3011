use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use clap_stdin::FileOrStdin;
use tracing_subscriber::EnvFilter;

use hlac::analyzer::SymbolTable;
use hlac::codegen::{BackendConfig, RecordingBackend};
use hlac::Program;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Emit {
    /// Mnemonic listing
    Listing,
    /// Backend operations as recorded
    Ops,
    /// Symbol tables
    Symbols,
}

#[derive(Parser)]
#[command(name = "hlac", version, about = "High-level assembly compiler")]
struct Cli {
    /// Source file, or - for stdin
    #[arg(default_value = "-")]
    input: FileOrStdin,

    /// Address of the first emitted byte, in hex
    #[arg(long, default_value = "1000", value_parser = parse_hex)]
    origin: u32,

    /// Bytes per variable
    #[arg(long, default_value_t = 2)]
    word_size: u32,

    #[arg(long, value_enum, default_value_t = Emit::Listing)]
    emit: Emit,

    /// -v for debug, -vv for trace logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_hex(s: &str) -> Result<u32, String> {
    let digits = s.trim_start_matches("0x").trim_start_matches('$');
    u32::from_str_radix(digits, 16).map_err(|e| format!("invalid address {s}: {e}"))
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_table(title: &str, table: &SymbolTable) {
    println!("{title}:");
    for symbol in table.iter() {
        println!("  ${:06x}  {:?}  {}", symbol.address, symbol.kind, symbol.name);
    }
}

fn print_symbols(program: &Program) {
    print_table("globals", &program.globals);
    for procedure in &program.procedures {
        print_table(&procedure.name, &procedure.locals);
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let source = match cli.input.contents() {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let mut backend = RecordingBackend::new(BackendConfig {
        origin: cli.origin,
        word_size: cli.word_size,
    });
    let program = match hlac::compile(&source, &mut backend) {
        Ok(program) => program,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    match cli.emit {
        Emit::Listing => print!("{backend}"),
        Emit::Ops => {
            for emitted in backend.emitted() {
                println!("${:06x}  {:?}", emitted.address, emitted.op);
            }
        }
        Emit::Symbols => print_symbols(&program),
    }
    ExitCode::SUCCESS
}
