use anyhow::Result;
use clap::{Parser, ValueEnum};

use std::path::PathBuf;

use tiny32_asm::{InstructionSet, Variant};
use tiny32_disasm::listing::render_text;
use tiny32_disasm::{listing, load_image};

#[derive(Parser, Debug)]
#[command(author, version, about = "tiny32 memory image disassembler", long_about = None)]
struct Cli {
    /// Hex memory image (one word per line)
    #[arg(value_name = "IMAGE")]
    input: PathBuf,
    /// Built-in instruction set the image was assembled for
    #[arg(long, value_enum, default_value_t = Variant::Basic)]
    isa: Variant,
    /// JSON instruction-set description (overrides --isa)
    #[arg(long, value_name = "FILE")]
    isa_file: Option<PathBuf>,
    /// Include the trailing all-zero padding
    #[arg(long)]
    all: bool,
    /// Output format: text or json
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write output to file instead of stdout
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let isa = match &cli.isa_file {
        Some(path) => InstructionSet::from_json_file(path)?,
        None => InstructionSet::variant(cli.isa),
    };
    let img = load_image(&cli.input)?;
    let len = if cli.all { img.words.len() } else { img.used_len() };
    let rows = listing(&isa, &img.words[..len]);

    let text = match cli.format {
        OutputFormat::Text => render_text(&rows),
        OutputFormat::Json => serde_json::to_string_pretty(&rows)? + "\n",
    };
    if let Some(path) = cli.out {
        std::fs::write(path, text)?;
    } else {
        print!("{text}");
    }
    Ok(())
}
