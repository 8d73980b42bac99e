//! Texcodec CLI - Command-line tool for inspecting and decoding DDS textures.
//!
//! This is the main entry point for the texcodec command-line application.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use memmap2::Mmap;
use rayon::prelude::*;

use texcodec::dds::{check_all_fourcc_support, KNOWN_FOURCCS};
use texcodec::format::PixelFormatNegotiator;
use texcodec::prelude::*;

/// Texcodec - DDS texture inspection and decoding tool
#[derive(Parser)]
#[command(name = "texcodec")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    codec: CodecArgs,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Decoder configuration shared by every command.
#[derive(Args)]
struct CodecArgs {
    /// Keep S3TC (DXT1/3/5) blocks compressed
    #[arg(long, global = true, env = "TEXCODEC_S3TC")]
    s3tc: bool,

    /// Keep RGTC (ATI1/ATI2) blocks compressed
    #[arg(long, global = true, env = "TEXCODEC_RGTC")]
    rgtc: bool,

    /// Prefer red/red-green formats over luminance
    #[arg(long, global = true, env = "TEXCODEC_RG")]
    rg: bool,

    /// Prefer sRGB formats
    #[arg(long, global = true, env = "TEXCODEC_SRGB")]
    srgb: bool,
}

impl CodecArgs {
    fn options(&self) -> DecodeOptions {
        let mut compressions = Compressions::empty();
        compressions.set(Compressions::S3TC, self.s3tc);
        compressions.set(Compressions::RGTC, self.rgtc);
        DecodeOptions {
            compressions,
            rg_formats: self.rg,
            srgb: self.srgb,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show header information of DDS files
    Info {
        /// Input DDS files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Decode one level of a DDS file to PNG
    Decode {
        /// Input DDS file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Cube face
        #[arg(long, default_value_t = 0)]
        face: u32,

        /// Mip level
        #[arg(long, default_value_t = 0)]
        mip: u32,

        /// Volume slice
        #[arg(long, default_value_t = 0)]
        slice: u32,
    },

    /// Decode every DDS file matching a pattern and report failures
    Check {
        /// Glob pattern, e.g. "textures/**/*.dds"
        pattern: String,
    },

    /// List supported formats and native layouts
    Formats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = cli.codec.options();

    match cli.command {
        Commands::Info { inputs } => {
            cmd_info(&inputs, &options)?;
        }
        Commands::Decode {
            input,
            output,
            face,
            mip,
            slice,
        } => {
            cmd_decode(&input, &output, &options, face, mip, slice)?;
        }
        Commands::Check { pattern } => {
            cmd_check(&pattern, &options)?;
        }
        Commands::Formats => {
            cmd_formats()?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Map a file and hand its bytes to `f` as a named reader.
fn with_file<T>(path: &Path, f: impl FnOnce(&mut BinaryReader<'_>) -> T) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mmap = unsafe { Mmap::map(&file)? };
    let mut reader = BinaryReader::with_name(path.display().to_string(), &mmap);
    Ok(f(&mut reader))
}

fn cmd_info(inputs: &[PathBuf], options: &DecodeOptions) -> Result<()> {
    for input in inputs {
        let info = with_file(input, |reader| image_information(reader, options))??;

        println!("{}", info.name);
        println!("  format:     {} -> {}", info.format, info.decoded_format);
        println!("  size:       {}x{}x{}", info.width, info.height, info.depth);
        println!("  mip levels: {}", info.mip_count + 1);
        println!(
            "  faces:      {}{}",
            info.face_count,
            if info.is_cube_map() { " (cube map)" } else { "" }
        );
        println!("  plan:       {}", info.plan);
        println!("  data:       {} bytes", info.data_size);
        for warning in &info.warnings {
            println!("  warning:    {}", warning);
        }
    }

    Ok(())
}

fn cmd_decode(
    input: &Path,
    output: &Path,
    options: &DecodeOptions,
    face: u32,
    mip: u32,
    slice: u32,
) -> Result<()> {
    println!("Decoding: {} -> {}", input.display(), output.display());

    let start = Instant::now();
    let image = with_file(input, |reader| decode(reader, options))?
        .context("Failed to decode DDS file")?;
    let desc = image.desc().context("Decoder produced no image")?;
    let (width, height, _) = desc.level_dimensions(mip);

    let rgba = image
        .to_rgba8(face, mip, slice)
        .context("Failed to convert level to RGBA")?;
    let buffer = image::RgbaImage::from_raw(width, height, rgba)
        .context("Level data does not match its dimensions")?;

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    buffer.save(output).context("Failed to write PNG")?;

    println!(
        "Wrote {}x{} {} level in {:?}",
        width,
        height,
        desc.format,
        start.elapsed()
    );

    Ok(())
}

fn cmd_check(pattern: &str, options: &DecodeOptions) -> Result<()> {
    let paths: Vec<PathBuf> = glob::glob(pattern)
        .context("Invalid glob pattern")?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();

    println!("Checking {} files...", paths.len());

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let failures = Mutex::new(Vec::new());
    let warned = std::sync::atomic::AtomicUsize::new(0);

    paths.par_iter().for_each(|path| {
        let result = with_file(path, |reader| {
            let mut image = Image::new();
            decode_into(reader, options, &mut image)
        });

        match result {
            Ok(Ok(summary)) => {
                if !summary.warnings.is_empty() {
                    warned.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                }
            }
            Ok(Err(e)) => {
                if let Ok(mut failures) = failures.lock() {
                    failures.push(format!("[{:?}] {}", e.kind(), e));
                }
            }
            Err(e) => {
                if let Ok(mut failures) = failures.lock() {
                    failures.push(format!("[Io] {}: {:#}", path.display(), e));
                }
            }
        }

        pb.inc(1);
    });

    pb.finish_with_message("Done");

    let mut failures = failures.into_inner().unwrap_or_default();
    failures.sort();
    for failure in &failures {
        eprintln!("{}", failure);
    }

    println!(
        "Checked {} files in {:?}: {} failed, {} with warnings",
        paths.len(),
        start.elapsed(),
        failures.len(),
        warned.into_inner()
    );

    if !failures.is_empty() {
        anyhow::bail!("{} files failed to decode", failures.len());
    }

    Ok(())
}

fn cmd_formats() -> Result<()> {
    println!("Canonical formats:");
    for format in TextureFormat::ALL {
        let d = format.descriptor();
        println!(
            "  {:<18} channels={} bits={:<3} {}{}{}",
            d.name,
            d.channels,
            d.bits_per_texel,
            if d.compressed { "compressed " } else { "" },
            if d.srgb { "srgb " } else { "" },
            if d.depth { "depth" } else { "" },
        );
    }

    println!("\nFOURCC codes:");
    for &(fourcc, bits) in KNOWN_FOURCCS {
        let resolved = texcodec::dds::resolve_fourcc(fourcc, Default::default())?;
        println!("  {:<6} {:<18} {} bits", fourcc.to_string(), resolved.format, bits);
    }
    check_all_fourcc_support().context("FOURCC table is inconsistent")?;

    let negotiator = PixelFormatNegotiator::global();
    println!("\nNative layouts ({}):", negotiator.len());
    let mut layouts: Vec<_> = negotiator.layouts().collect();
    layouts.sort_by_key(|(masks, _)| (masks.bit_count(), masks.to_array()));
    for (masks, layout) in layouts {
        println!("  {}  {}", masks, layout);
    }

    Ok(())
}
