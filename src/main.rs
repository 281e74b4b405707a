use std::fs;
use std::path::PathBuf;

use clap::Parser;
use clap::ValueEnum;
use qrbits::helper;
use qrbits::qrcode::{encode_segment, Version};
use qrbits::segment::Segment;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogOutputFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Numeric,
    Alphanumeric,
    Byte,
}

/// Encodes one QR code data segment and prints its bits.
#[derive(Debug, Parser)]
#[clap(name = "qrbits", disable_version_flag = true)]
struct Args {
    /// Segment mode.
    #[clap(value_enum)]
    mode: Mode,

    /// Text to encode. Numeric mode accepts digits only, alphanumeric mode
    /// accepts 0-9, A-Z, space and $%*+-./:
    input: String,

    /// Symbol version (1-40) the count field is sized for.
    #[clap(short = 'v', long = "version", env = "QRBITS_VERSION", default_value_t = 1)]
    version: u8,

    /// Write an SVG rendering of the bits to this path.
    #[clap(long)]
    svg: Option<PathBuf>,

    /// Write a PNG rendering of the bits to this path.
    #[clap(long)]
    png: Option<PathBuf>,

    /// Bits per row in renderings (1-4096).
    #[clap(long, default_value_t = 8, value_parser = clap::value_parser!(u16).range(1..=4096))]
    columns: u16,

    /// Pixels per bit in PNG renderings (1-256).
    #[clap(long, default_value_t = 8, value_parser = clap::value_parser!(u32).range(1..=256))]
    scale: u32,

    #[clap(short = 'o', long = "output-format", default_value = "pretty")]
    output_format: Option<LogOutputFormat>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let pretty = matches!(args.output_format, Some(LogOutputFormat::Pretty));
    qrbits::logging::setup_logging("warn,qrbits=info", pretty);

    let version = Version::try_from(args.version)?;
    let segment = match args.mode {
        Mode::Numeric => Segment::from_numeric_text(&args.input)?,
        Mode::Alphanumeric => Segment::from_alphanumeric(&args.input)?,
        Mode::Byte => Segment::from_text(&args.input),
    };

    let encoded = encode_segment(&segment, version)?;
    tracing::info!(
        mode = %segment.mode(),
        version = version.value(),
        bits = encoded.bits(),
        "encoded input"
    );

    println!("bits: {}", encoded.bits());
    println!("hex:  {}", hex::encode(encoded.as_bytes()));
    println!();
    helper::print_bits(&encoded);

    if let Some(path) = &args.svg {
        fs::write(path, helper::to_svg_string(&encoded, usize::from(args.columns), 2))?;
        tracing::info!(path = %path.display(), "wrote svg");
    }
    if let Some(path) = &args.png {
        helper::save_image(&encoded, usize::from(args.columns), args.scale, path)?;
        tracing::info!(path = %path.display(), "wrote png");
    }

    Ok(())
}
