//! Command-line front end for the movie encoder.
//!
//! Run with: `ledmovie <command>`

mod frames;
mod inspect;
mod logger;
mod output;

use std::{path::PathBuf, process::ExitCode};

use clap::{Args, Parser, Subcommand, ValueEnum};
use led_movie::{
    FrameEncoder, HlmOptions, MovieWriter, Rational, StreamInfo, panel_table::NAMED_PANELS,
};
use log::info;
use owo_colors::OwoColorize;

use crate::{frames::DecodedFrame, output::OutputFile};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(name = "ledmovie")]
#[command(about = "Encode PNG frame sequences into LED panel and TFT movies", long_about = None)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode PNG frames into a movie file
    Encode(EncodeArgs),
    /// Print the header of a movie file
    Inspect {
        /// Movie file to read
        file: PathBuf,
    },
    /// List the named panel configurations accepted by --hlm-scan
    Panels,
}

#[derive(Args)]
struct EncodeArgs {
    #[arg(long, default_value = "hlm")]
    format: Format,
    /// Scan depth (8, 16, 32) or a named panel configuration
    #[arg(long, default_value = "16")]
    hlm_scan: String,
    /// Bit positions for R0,G0,B0,R1,G1,B1, e.g. 0-5 or 2,1,0,5,4,3
    #[arg(long, default_value = "")]
    hlm_bits: String,
    /// Output offset as ox,oy
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    hlm_offset: String,
    /// Ask the player to loop the movie
    #[arg(long)]
    repeat: bool,
    /// Frame rate as N/D or N
    #[arg(long, default_value = "30/1", value_parser = parse_fps)]
    fps: Rational,
    /// Output movie file
    #[arg(short, long)]
    output: PathBuf,
    /// Input PNG frames in playback order
    #[arg(required = true)]
    frames: Vec<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Bit-plane frames for multiplexed LED panels
    Hlm,
    /// RGB565 frames for TFT LCDs
    Htl,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logger::init(cli.verbose) {
        eprintln!("{}", format!("Failed to install logger: {e}").red());
    }

    let result = match &cli.command {
        Commands::Encode(args) => encode(args),
        Commands::Inspect { file } => inspect::inspect(file),
        Commands::Panels => {
            list_panels();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("error: {e}").red());
            ExitCode::FAILURE
        }
    }
}

fn encode(args: &EncodeArgs) -> Result<(), BoxError> {
    let (first_path, rest) = args.frames.split_first().ok_or("no input frames")?;
    let first = frames::decode_file(first_path)?;
    let stream = StreamInfo::new(first.width, first.height, args.fps)
        .with_declared_frames(u32::try_from(args.frames.len())?);
    println!(
        "{}",
        format!(
            "Encoding {} frames of {}x{} into {}",
            args.frames.len(),
            first.width,
            first.height,
            args.output.display()
        )
        .cyan()
    );

    // Created on the first header byte, after the options have been validated.
    let sink = OutputFile::new(&args.output);
    let written = match args.format {
        Format::Hlm => {
            let mut options = HlmOptions::new(&args.hlm_scan, &args.hlm_bits, &args.hlm_offset);
            options.repeat = args.repeat;
            write_movie(
                MovieWriter::open_hlm(sink, &options, &stream)?,
                &first,
                rest,
            )?
        }
        Format::Htl => write_movie(MovieWriter::open_htl(sink, &stream)?, &first, rest)?,
    };

    println!(
        "{}",
        format!("Wrote {written} frames to {}", args.output.display()).green()
    );
    Ok(())
}

/// Stream every frame through `writer`. Decoding runs in parallel batches; records are
/// written in input order.
fn write_movie<E: FrameEncoder>(
    mut writer: MovieWriter<OutputFile, E>,
    first: &DecodedFrame,
    rest: &[PathBuf],
) -> Result<u32, BoxError> {
    writer.write_frame(&first.rgba)?;
    let batch_len = rayon::current_num_threads().max(1) * 2;
    for batch in rest.chunks(batch_len) {
        for frame in frames::decode_batch(batch)? {
            frame.check_size(first.width, first.height)?;
            writer.write_frame(&frame.rgba)?;
        }
        info!("{} frames written", writer.frame_count());
    }
    let written = writer.frame_count();
    writer.finish()?;
    Ok(written)
}

fn list_panels() {
    println!("{}", "Named panel configurations".cyan());
    for panel in &NAMED_PANELS {
        let wiring = if panel.turnback { "turnback" } else { "straight" };
        println!(
            "  {:<4} {}x{} modules of {:<8} {:>3}x{:<3} {}",
            panel.key,
            panel.module_columns,
            panel.module_rows,
            panel.class.name(),
            panel.width(),
            panel.height(),
            wiring.bright_black()
        );
    }
}

/// Parse `N/D` or a bare `N` (denominator 1).
fn parse_fps(text: &str) -> Result<Rational, String> {
    let (numerator, denominator) = text.split_once('/').unwrap_or((text, "1"));
    let numerator = parse_fps_part(numerator)?;
    let denominator = parse_fps_part(denominator)?;
    if numerator == 0 || denominator == 0 {
        return Err(format!("frame rate {text:?} must be positive"));
    }
    Ok(Rational::new(numerator, denominator))
}

fn parse_fps_part(part: &str) -> Result<u16, String> {
    part.trim()
        .parse()
        .map_err(|e| format!("bad frame rate part {part:?}: {e}"))
}
