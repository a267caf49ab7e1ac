use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgAction, Parser, ValueEnum};
use tracing::level_filters::LevelFilter;

use pixel_invert::{BackendKind, CodecId, InvertConfig, PngCompression, PngFilter};

#[derive(Parser, Debug)]
#[command(name = "pixel-invert", version, about = "Invert the colours of an image")]
struct Cli {
    /// Input image (default: traffic_map_2020_12_01_03_40.png).
    input: Option<PathBuf>,

    /// Output image (default: inverted.png).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output codec (png, jpeg, bmp, ...). Guessed from the output extension when omitted.
    #[arg(long)]
    codec: Option<CodecId>,

    /// Codec library to use.
    #[arg(long, value_enum)]
    backend: Option<BackendChoice>,

    /// JSON config file; flags given on the command line override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fail instead of replacing an existing output file.
    #[arg(long)]
    no_overwrite: bool,

    /// Feed the decoder packets of at most this many bytes.
    #[arg(long)]
    packet_size: Option<usize>,

    /// Align frame rows to this many bytes.
    #[arg(long)]
    row_alignment: Option<usize>,

    /// PNG compression effort.
    #[arg(long, value_enum)]
    png_compression: Option<CompressionChoice>,

    /// PNG row filter.
    #[arg(long, value_enum)]
    png_filter: Option<FilterChoice>,

    /// More logging (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    Native,
    Ffmpeg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CompressionChoice {
    Fast,
    Default,
    Best,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FilterChoice {
    None,
    Sub,
    Up,
    Avg,
    Paeth,
    Adaptive,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = build_config(cli)?;
    tracing::debug!(?cfg, "resolved config");

    let report = pixel_invert::run(&cfg)
        .with_context(|| format!("invert '{}'", cfg.input.display()))?;
    tracing::info!(
        width = report.width,
        height = report.height,
        pixel_format = %report.pixel_format,
        codec = %report.output_codec,
        bytes = report.bytes_written,
        "done"
    );

    eprintln!("wrote {}", report.output.display());
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_config(cli: Cli) -> anyhow::Result<InvertConfig> {
    let mut cfg = match &cli.config {
        Some(path) => InvertConfig::from_path(path)?,
        None => InvertConfig::default(),
    };

    if let Some(input) = cli.input {
        cfg.input = input;
    }
    if let Some(output) = cli.output {
        cfg.output = output;
    }
    if let Some(codec) = cli.codec {
        cfg.codec = Some(codec);
    }
    if let Some(backend) = cli.backend {
        cfg.backend = match backend {
            BackendChoice::Native => BackendKind::Native,
            BackendChoice::Ffmpeg => BackendKind::Ffmpeg,
        };
    }
    if cli.no_overwrite {
        cfg.overwrite = false;
    }
    if let Some(n) = cli.packet_size {
        cfg.max_packet_size = Some(n);
    }
    if let Some(n) = cli.row_alignment {
        cfg.row_alignment = n;
    }
    if let Some(c) = cli.png_compression {
        cfg.png.compression = match c {
            CompressionChoice::Fast => PngCompression::Fast,
            CompressionChoice::Default => PngCompression::Default,
            CompressionChoice::Best => PngCompression::Best,
        };
    }
    if let Some(f) = cli.png_filter {
        cfg.png.filter = match f {
            FilterChoice::None => PngFilter::None,
            FilterChoice::Sub => PngFilter::Sub,
            FilterChoice::Up => PngFilter::Up,
            FilterChoice::Avg => PngFilter::Avg,
            FilterChoice::Paeth => PngFilter::Paeth,
            FilterChoice::Adaptive => PngFilter::Adaptive,
        };
    }

    cfg.validate()?;
    Ok(cfg)
}
