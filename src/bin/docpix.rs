//! CLI binary for docpix.
//!
//! A thin shim over the library crate: maps flags to the pipeline configs,
//! runs one pipeline, writes the artifacts and prints a summary.

use anyhow::{Context, Result};
use clap::{ArgGroup, Args, Parser, Subcommand};
use docpix::{
    bundle_artifacts, compress_image, convert_pdf, format_file_size, resize_image,
    CompressConfig, CompressFormat, ConversionProgressCallback, EngineConfig, Engines, InputFile,
    OutputArtifact, PdfToImageConfig, ProgressCallback, ProgressEvent, RasterFormat,
    ResampleFilter, ResizeConfig, UnsharpMask,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Live progress bar for PDF conversion. Starts as a spinner and switches to
/// a bar once the number of selected pages is known.
struct CliProgressCallback {
    bar: ProgressBar,
    started: Instant,
}

impl CliProgressCallback {
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            started: Instant::now(),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Rendering");
        self.bar.reset_eta();
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, document_pages: usize, selected_pages: usize) {
        self.activate_bar(selected_pages);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!(
                "Rendering {selected_pages} of {document_pages} pages…"
            ))
        ));
    }

    fn on_page_complete(&self, event: &ProgressEvent) {
        self.bar.println(format!(
            "  {} Page {:>3}  {}",
            green("✓"),
            event.page,
            dim(&format!("{:>3}%", event.percent)),
        ));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, artifacts: usize) {
        self.bar.finish_and_clear();
        if artifacts > 0 {
            eprintln!(
                "{} {} pages rendered in {:.1}s",
                green("✔"),
                bold(&artifacts.to_string()),
                self.started.elapsed().as_secs_f64()
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Every page as PNG at 150 DPI into ./out
  docpix pdf slides.pdf -o out

  # Pages 1 and 3-5 as JPEG at 300 DPI, bundled into one ZIP
  docpix pdf --pages 1,3-5 --dpi 300 --format jpg --zip report.pdf

  # Resize to 800 px wide, height follows the aspect ratio
  docpix resize --width 800 photo.jpg

  # Force an exact size without sharpening
  docpix resize --width 640 --height 480 --no-sharpen photo.png

  # Re-encode as JPEG at quality 0.6
  docpix compress --quality 0.6 photo.png

  # Machine-readable manifest of what was written
  docpix --json pdf deck.pdf -o out > manifest.json

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH    Path to the pdfium shared library
  DOCPIX_OUTPUT_DIR  Default output directory
  RUST_LOG           Overrides --verbose / --quiet log filtering

PDFIUM:
  PDF rendering needs the pdfium shared library. It is looked up in this
  order: --pdfium-lib, PDFIUM_LIB_PATH, the current directory, then the
  system library path. Resize and compress do not need it.
"#;

/// Convert PDF pages to images, resize images, and compress images.
#[derive(Parser, Debug)]
#[command(
    name = "docpix",
    version,
    about = "Convert PDF pages to images, resize images, and compress images",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory to write outputs into (created when missing).
    #[arg(short, long, global = true, env = "DOCPIX_OUTPUT_DIR", default_value = ".")]
    output: PathBuf,

    /// Path to the pdfium shared library.
    #[arg(long, global = true, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Print a JSON manifest of the written files to stdout.
    #[arg(long, global = true, env = "DOCPIX_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, global = true, env = "DOCPIX_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "DOCPIX_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "DOCPIX_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render PDF pages to PNG or JPEG images.
    Pdf(PdfArgs),
    /// Resize an image.
    Resize(ResizeArgs),
    /// Re-encode an image at a given quality and format.
    Compress(CompressArgs),
}

#[derive(Args, Debug)]
struct PdfArgs {
    /// PDF file to convert.
    input: PathBuf,

    /// Page selection: all, 5, 3-15, or 1,3,5-7.
    #[arg(long, env = "DOCPIX_PAGES", default_value = "all")]
    pages: String,

    /// Rendering resolution (96, 150 and 300 are typical).
    #[arg(long, env = "DOCPIX_DPI", default_value_t = 150,
          value_parser = clap::value_parser!(u32).range(1..))]
    dpi: u32,

    /// Image format for rendered pages.
    #[arg(long, value_enum, default_value = "png")]
    format: RasterFormatArg,

    /// JPEG quality in (0, 1].
    #[arg(long, default_value_t = 0.92)]
    jpeg_quality: f32,

    /// Write one ZIP archive instead of separate images when more than one
    /// page is rendered.
    #[arg(long)]
    zip: bool,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("size").required(true).multiple(true).args(["width", "height"])))]
struct ResizeArgs {
    /// Image file to resize.
    input: PathBuf,

    /// Target width in pixels.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    width: Option<u32>,

    /// Target height in pixels.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    height: Option<u32>,

    /// Resampling filter.
    #[arg(long, value_enum, default_value = "lanczos3")]
    filter: FilterArg,

    /// Unsharp-mask strength in percent.
    #[arg(long, default_value_t = 160.0)]
    sharpen_amount: f32,

    /// Unsharp-mask radius in pixels.
    #[arg(long, default_value_t = 0.6)]
    sharpen_radius: f32,

    /// Unsharp-mask threshold (0-255).
    #[arg(long, default_value_t = 2)]
    sharpen_threshold: u8,

    /// Skip post-resize sharpening.
    #[arg(long)]
    no_sharpen: bool,

    /// Quality for lossy output formats, in (0, 1].
    #[arg(long, default_value_t = 0.92)]
    quality: f32,
}

#[derive(Args, Debug)]
struct CompressArgs {
    /// Image file to compress.
    input: PathBuf,

    /// Quality in (0, 1]. Only JPEG output uses it.
    #[arg(long, env = "DOCPIX_QUALITY", default_value_t = 0.8)]
    quality: f32,

    /// Output format.
    #[arg(long, value_enum, default_value = "jpeg")]
    format: CompressFormatArg,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum RasterFormatArg {
    Jpg,
    Png,
}

impl From<RasterFormatArg> for RasterFormat {
    fn from(v: RasterFormatArg) -> Self {
        match v {
            RasterFormatArg::Jpg => RasterFormat::Jpg,
            RasterFormatArg::Png => RasterFormat::Png,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum CompressFormatArg {
    Jpeg,
    Webp,
    Png,
}

impl From<CompressFormatArg> for CompressFormat {
    fn from(v: CompressFormatArg) -> Self {
        match v {
            CompressFormatArg::Jpeg => CompressFormat::Jpeg,
            CompressFormatArg::Webp => CompressFormat::Webp,
            CompressFormatArg::Png => CompressFormat::Png,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FilterArg {
    Bilinear,
    CatmullRom,
    Mitchell,
    Lanczos3,
}

impl From<FilterArg> for ResampleFilter {
    fn from(v: FilterArg) -> Self {
        match v {
            FilterArg::Bilinear => ResampleFilter::Bilinear,
            FilterArg::CatmullRom => ResampleFilter::CatmullRom,
            FilterArg::Mitchell => ResampleFilter::Mitchell,
            FilterArg::Lanczos3 => ResampleFilter::Lanczos3,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar is the feedback while rendering; keep library INFO
    // logs out of its way.
    let show_progress = !cli.quiet
        && !cli.no_progress
        && !cli.json
        && matches!(cli.command, Command::Pdf(_));
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let engines = Engines::with_defaults(&EngineConfig {
        pdfium_library: cli.pdfium_lib.clone(),
    });

    match &cli.command {
        Command::Pdf(args) => run_pdf(&cli, args, &engines, show_progress).await,
        Command::Resize(args) => run_resize(&cli, args, &engines).await,
        Command::Compress(args) => run_compress(&cli, args, &engines).await,
    }
}

async fn run_pdf(cli: &Cli, args: &PdfArgs, engines: &Engines, show_progress: bool) -> Result<()> {
    let input = load_input(&args.input).await?;

    let mut builder = PdfToImageConfig::builder()
        .pages(args.pages.clone())
        .dpi(args.dpi)
        .format(args.format.into())
        .jpeg_quality(args.jpeg_quality);
    if show_progress {
        let cb: ProgressCallback = CliProgressCallback::new_dynamic();
        builder = builder.progress_callback(cb);
    }
    let config = builder.build().context("Invalid configuration")?;

    let result = convert_pdf(engines, &input, &config)
        .await
        .context("Conversion failed")?;

    if result.is_empty() {
        if !cli.quiet {
            eprintln!(
                "{} Nothing converted: '{}' selected no pages of {}",
                yellow("⚠"),
                args.pages,
                input.name()
            );
        }
        return Ok(());
    }

    let outputs = if args.zip && result.offers_archive() {
        let archive = bundle_artifacts(engines, &result.artifacts, &result.archive_name())
            .await
            .context("Failed to build archive")?;
        vec![archive]
    } else {
        result.artifacts.clone()
    };

    let written = write_all(&outputs, &cli.output).await?;

    if cli.json {
        let manifest = serde_json::json!({
            "source": result.source_name,
            "document_pages": result.document_pages,
            "pages": result.page_numbers(),
            "files": manifest_entries(&outputs, &written),
        });
        print_json(&manifest)?;
    } else if !cli.quiet {
        for (artifact, path) in outputs.iter().zip(&written) {
            eprintln!(
                "  {}  {}",
                bold(&path.display().to_string()),
                dim(&format_file_size(artifact.size()))
            );
        }
    }
    Ok(())
}

async fn run_resize(cli: &Cli, args: &ResizeArgs, engines: &Engines) -> Result<()> {
    let input = load_input(&args.input).await?;

    let sharpen = if args.no_sharpen {
        UnsharpMask::DISABLED
    } else {
        UnsharpMask {
            amount: args.sharpen_amount,
            radius: args.sharpen_radius,
            threshold: args.sharpen_threshold,
        }
    };
    let config = ResizeConfig::builder()
        .dimensions(args.width, args.height)
        .filter(args.filter.into())
        .sharpen(sharpen)
        .encode_quality(args.quality)
        .build()
        .context("Invalid configuration")?;

    let artifact = resize_image(engines, &input, &config)
        .await
        .context("Resize failed")?;
    let written = write_all(std::slice::from_ref(&artifact), &cli.output).await?;

    if cli.json {
        print_json(&serde_json::json!({
            "source": input.name(),
            "files": manifest_entries(std::slice::from_ref(&artifact), &written),
        }))?;
    } else if !cli.quiet {
        let (w, h) = artifact.dimensions().unwrap_or_default();
        eprintln!(
            "{} {} → {}  {}x{}  {}",
            green("✔"),
            input.name(),
            bold(&written[0].display().to_string()),
            w,
            h,
            dim(&format_file_size(artifact.size()))
        );
    }
    Ok(())
}

async fn run_compress(cli: &Cli, args: &CompressArgs, engines: &Engines) -> Result<()> {
    let input = load_input(&args.input).await?;

    let config = CompressConfig::builder()
        .quality(args.quality)
        .format(args.format.into())
        .build()
        .context("Invalid configuration")?;

    let artifact = compress_image(engines, &input, &config)
        .await
        .context("Compression failed")?;
    let written = write_all(std::slice::from_ref(&artifact), &cli.output).await?;

    if cli.json {
        print_json(&serde_json::json!({
            "source": input.name(),
            "files": manifest_entries(std::slice::from_ref(&artifact), &written),
        }))?;
    } else if !cli.quiet {
        let reduction = artifact.reduction_percent().unwrap_or(0.0);
        let change = if reduction >= 0.0 {
            green(&format!("-{reduction:.1}%"))
        } else {
            yellow(&format!("+{:.1}%", -reduction))
        };
        eprintln!(
            "{} {} → {}  {} → {}  {}",
            green("✔"),
            input.name(),
            bold(&written[0].display().to_string()),
            format_file_size(input.size()),
            format_file_size(artifact.size()),
            change
        );
    }
    Ok(())
}

async fn load_input(path: &Path) -> Result<InputFile> {
    InputFile::from_path(path)
        .await
        .with_context(|| format!("Failed to load {}", path.display()))
}

async fn write_all(artifacts: &[OutputArtifact], dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = artifact
            .write_to_dir(dir)
            .await
            .with_context(|| format!("Failed to save {}", artifact.filename))?;
        written.push(path);
    }
    Ok(written)
}

fn manifest_entries(artifacts: &[OutputArtifact], paths: &[PathBuf]) -> Vec<serde_json::Value> {
    artifacts
        .iter()
        .zip(paths)
        .map(|(artifact, path)| {
            serde_json::json!({
                "path": path,
                "size": artifact.size(),
                "artifact": artifact,
            })
        })
        .collect()
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialise manifest")?
    );
    Ok(())
}
