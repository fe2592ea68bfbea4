//! Hack VM Translator CLI
//!
//! Usage:
//!     hack-vm-translator <file.vm | directory>
//!     hack-vm-translator --bootstrap never --annotate FibonacciElement/

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser as ClapParser, ValueEnum};
use hack_vm_translator::{
    Bootstrap, TranslateOptions, VMError, output_path, translate_directory, translate_file,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum BootstrapArg {
    /// Only for directories containing Sys.vm
    Auto,
    Always,
    Never,
}

impl From<BootstrapArg> for Bootstrap {
    fn from(arg: BootstrapArg) -> Self {
        match arg {
            BootstrapArg::Auto => Bootstrap::Auto,
            BootstrapArg::Always => Bootstrap::Always,
            BootstrapArg::Never => Bootstrap::Never,
        }
    }
}

#[derive(ClapParser, Debug)]
#[command(name = "hack-vm-translator")]
#[command(version)]
#[command(about = "Stack VM to Hack assembly translator")]
struct Args {
    /// Input .vm file or directory of .vm files
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output .asm file (defaults to Input.asm or dir/dir.asm)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// When to emit the Sys.init bootstrap
    #[arg(long, value_enum, default_value_t = BootstrapArg::Auto)]
    bootstrap: BootstrapArg,

    /// Precede each instruction's assembly with the VM instruction as a comment
    #[arg(long)]
    annotate: bool,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    // RUST_LOG wins; otherwise warn, or debug with --verbose
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<PathBuf, VMError> {
    let options = TranslateOptions {
        bootstrap: args.bootstrap.into(),
        annotate: args.annotate,
    };

    let input = args.input.as_path();
    let asm = if input.is_dir() {
        translate_directory(input, &options)?
    } else if input.extension().is_some_and(|ext| ext == "vm") {
        translate_file(input, &options)?
    } else {
        return Err(VMError::InvalidPath {
            path: input.display().to_string(),
        });
    };

    let output = args.output.clone().unwrap_or_else(|| output_path(input));
    write_output(&output, &asm)?;
    info!(lines = asm.lines().count(), "generated assembly");

    Ok(output)
}

fn write_output(path: &Path, asm: &str) -> Result<(), VMError> {
    fs::write(path, asm).map_err(|e| VMError::FileWrite {
        path: path.display().to_string(),
        source: e,
    })
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    if !args.input.exists() {
        eprintln!("Error: Path not found: {}", args.input.display());
        return ExitCode::from(2);
    }

    let start = Instant::now();
    match run(&args) {
        Ok(output) => {
            info!(
                elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                "translation finished"
            );
            println!("{}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
