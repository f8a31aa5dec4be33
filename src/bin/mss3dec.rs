//! mss3dec CLI - decodes MSS3 (MSA1) screen-capture packets.
//!
//! Every input file holds one packet: the 27-byte frame header followed by
//! the range coded payload, as extracted by a demuxer.

use clap::{Parser, Subcommand, ValueEnum};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use mss3dec_rs::{DecodeStatus, FrameDecoder, FrameHeader};

/// Decoder for MSS3 screen-capture video packets
#[derive(Parser)]
#[command(name = "mss3dec")]
#[command(version)]
#[command(about = "Decode MSS3 screen-capture packets to planar YUV", long_about = None)]
#[command(after_help = "EXAMPLES:
    mss3dec decode -W 1024 -H 768 -o video.yuv frames/*.bin
    mss3dec decode -W 640 -H 480 -o frame.pgm -f pgm frames/0000.bin
    mss3dec info frames/*.bin

Set RUST_LOG=debug to trace per-frame decoding.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode packets in order and write the resulting pictures
    ///
    /// A packet that fails to decode leaves the previous picture in place,
    /// which is written again; inter frames are skipped until the next
    /// keyframe.
    #[command(visible_alias = "d")]
    Decode {
        /// Frame width in pixels
        #[arg(short = 'W', long)]
        width: u32,

        /// Frame height in pixels
        #[arg(short = 'H', long)]
        height: u32,

        /// Output file path
        #[arg(short, long, help = "Path for the decoded output")]
        output: PathBuf,

        /// Output format: raw I420 (all frames appended) or one PGM per frame
        #[arg(short, long, default_value = "raw", value_enum)]
        format: OutputFormat,

        /// Packet files, in decoding order
        #[arg(required = true)]
        packets: Vec<PathBuf>,
    },

    /// Print the header fields of each packet
    #[command(visible_alias = "i")]
    Info {
        /// Packet files
        #[arg(required = true)]
        packets: Vec<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Raw planar YUV 4:2:0
    Raw,
    /// PGM with the chroma planes below the luma plane (pgmyuv)
    Pgm,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decode {
            width,
            height,
            output,
            format,
            packets,
        } => decode_packets(width, height, &output, format, &packets),
        Commands::Info { packets } => show_info(&packets),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn decode_packets(
    width: u32,
    height: u32,
    output: &Path,
    format: OutputFormat,
    packets: &[PathBuf],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut decoder = FrameDecoder::new(width, height)?;
    let mut raw_out = match format {
        OutputFormat::Raw => Some(BufWriter::new(File::create(output)?)),
        OutputFormat::Pgm => None,
    };

    let (mut decoded, mut repeated, mut failed) = (0usize, 0usize, 0usize);
    for (index, path) in packets.iter().enumerate() {
        let packet = fs::read(path)?;
        match decoder.decode_packet(&packet) {
            Ok(DecodeStatus::Decoded) => decoded += 1,
            Ok(DecodeStatus::Repeated) => repeated += 1,
            Err(e) => {
                log::warn!("{}: {}", path.display(), e);
                failed += 1;
            }
        }

        match raw_out.as_mut() {
            Some(out) => decoder.frame().write_i420(out)?,
            None => {
                let target = pgm_path(output, index, packets.len());
                let mut out = BufWriter::new(File::create(&target)?);
                decoder.frame().write_pgmyuv(&mut out)?;
                out.flush()?;
            }
        }
    }
    if let Some(mut out) = raw_out {
        out.flush()?;
    }

    println!(
        "Decoded {} packets ({}x{}): {} new, {} repeated, {} failed -> {:?}",
        packets.len(),
        width,
        height,
        decoded,
        repeated,
        failed,
        output
    );
    Ok(())
}

/// `out.pgm` for a single packet, `out_0000.pgm`, `out_0001.pgm`, ...
/// otherwise.
fn pgm_path(output: &Path, index: usize, count: usize) -> PathBuf {
    if count == 1 {
        return output.to_path_buf();
    }
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    output.with_file_name(format!("{}_{:04}.pgm", stem, index))
}

fn show_info(packets: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
    for path in packets {
        let packet = fs::read(path)?;
        match FrameHeader::parse(&packet) {
            Ok((header, payload)) => {
                let region = header.params.region;
                println!("{}:", path.display());
                println!(
                    "  Frame type: {:#x} ({})",
                    header.frame_type,
                    if header.is_keyframe() { "keyframe" } else { "inter" }
                );
                println!(
                    "  Region:     {}x{} at ({}, {})",
                    region.width, region.height, region.x, region.y
                );
                println!("  Quality:    {}", header.params.quality);
                println!("  Payload:    {} bytes", payload.len());
            }
            Err(e) => println!("{}: {}", path.display(), e),
        }
    }
    Ok(())
}
