//! `vgm2wav`: render SN76489 VGM logs to WAV or raw PCM.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::LevelFilter;

use sn76489::export::{default_output_path, ExportConfig, ExportFormat};
use sn76489::vgm::{load_file, read_header, render_with};
use sn76489::{Sn76489, Sn76489Error};

/// Exit status when the arguments do not parse (matches clap)
const EXIT_USAGE: u8 = 2;

#[derive(Parser)]
#[command(name = "vgm2wav", version)]
#[command(about = "Render SN76489 VGM/VGZ logs to 16-bit PCM")]
struct Args {
    /// Input VGM or VGZ file
    input: PathBuf,

    /// Output file (default: input with the format's extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Wav)]
    format: Format,

    /// Duplicate the mono signal into two channels
    #[arg(long)]
    stereo: bool,

    /// Scale the output so its peak sits just below full scale
    #[arg(long)]
    normalize: bool,

    /// Fade out over the last SECS seconds
    #[arg(long, value_name = "SECS", default_value_t = 0.0)]
    fade_out: f32,

    /// Silence a channel in the mix (0-2 tone, 3 noise); repeatable
    #[arg(long, value_name = "CH", value_parser = clap::value_parser!(u8).range(0..=3))]
    mute: Vec<u8>,

    /// Print the parsed header as JSON and exit
    #[arg(long)]
    info: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// RIFF WAVE, 16-bit PCM
    Wav,
    /// Headerless 16-bit little-endian PCM
    Raw,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Wav => ExportFormat::Wav,
            Format::Raw => ExportFormat::Raw,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(args: Args) -> anyhow::Result<()> {
    if args.info {
        let header = read_header(&args.input)?;
        let json =
            serde_json::to_string_pretty(&header).context("failed to serialize VGM header")?;
        println!("{}", json);
        return Ok(());
    }

    let vgm = load_file(&args.input)?;

    let mut chip = Sn76489::new();
    for &channel in &args.mute {
        chip.set_channel_mute(usize::from(channel), true);
    }
    let output = render_with(&vgm, chip)?;

    let format = ExportFormat::from(args.format);
    let mut config = if args.stereo {
        ExportConfig::stereo()
    } else {
        ExportConfig::default()
    };
    config = config.normalize(args.normalize).fade_out(args.fade_out);

    let output_path = args
        .output
        .unwrap_or_else(|| default_output_path(&args.input, format));
    format.write(&output_path, &output.samples, &config)?;

    println!(
        "{} -> {} ({} samples, {:.2}s)",
        args.input.display(),
        output_path.display(),
        output.samples.len(),
        output.duration_seconds()
    );
    Ok(())
}

/// Map a failure to the process exit status for its error class
fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<Sn76489Error>())
        .map(Sn76489Error::exit_code)
        .unwrap_or(1)
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}
