use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tiny32_asm::{assemble, AsmError, InstructionSet, Variant};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Assemble a tiny32 source file into a hex memory image"
)]
struct Opts {
    /// Assembly source file
    #[arg(value_name = "SOURCE")]
    input: PathBuf,
    /// Memory image to write, one hex word per line
    #[arg(value_name = "IMAGE")]
    output: PathBuf,
    /// Built-in instruction set
    #[arg(long, value_enum, default_value_t = Variant::Basic)]
    isa: Variant,
    /// JSON instruction-set description (overrides --isa)
    #[arg(long, value_name = "FILE")]
    isa_file: Option<PathBuf>,
    /// Memory size in words (default: taken from the instruction set)
    #[arg(long)]
    capacity: Option<usize>,
}

fn load_isa(opts: &Opts) -> Result<InstructionSet> {
    let mut isa = match &opts.isa_file {
        Some(path) => InstructionSet::from_json_file(path)
            .with_context(|| format!("loading instruction set {}", path.display()))?,
        None => InstructionSet::variant(opts.isa),
    };
    if let Some(words) = opts.capacity {
        isa = isa.with_capacity(words);
    }
    isa.validate()?;
    Ok(isa)
}

fn run(opts: &Opts) -> Result<()> {
    let isa = load_isa(opts)?;
    let source = fs::read_to_string(&opts.input)
        .with_context(|| format!("reading {}", opts.input.display()))?;
    // nothing touches the output path unless assembly succeeded
    let image = assemble(&isa, &source)?;
    image
        .write_to_path(&opts.output)
        .with_context(|| format!("writing {}", opts.output.display()))?;
    tracing::info!(output = %opts.output.display(), "image written");
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opts = match Opts::try_parse() {
        Ok(opts) => opts,
        // usage errors exit 1 like assembly errors; --help/--version exit 0
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<AsmError>() {
                Some(asm) => eprintln!("Parse error: {asm}"),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
