use clap::{Parser, Subcommand};
use pixelforge::imaging::{
    Anchor, PadColor, ProportionMode, ResampleFilter, RustBackend, TransformJob, TransformRequest,
    transform_file,
};
use pixelforge::resolution::{AspectRatio, Orientation, Resolution, ResolutionInfo};
use pixelforge::selection::{ResolutionSelector, parse_megapixel_label};
use pixelforge::{config, output, process};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pixelforge")]
#[command(about = "Target resolutions and anchor-aware resize, pad and crop")]
#[command(long_about = "\
Target resolutions and anchor-aware resize, pad and crop

Resolutions are realisations of a preset aspect ratio (1:1, 3:2, 4:3, 16:9,
16:10) whose sides are multiples of a step and whose area fits a megapixel
limit. One megapixel is 1024 x 1024 pixels.

Proportion modes:
  stretch   resample straight to the target, ignoring aspect ratio
  resize    fit inside the target (output may be smaller on one axis)
  pad       fit inside, fill the rest with --pad-color
  pad_edge  fit inside, fill the rest by replicating edge pixels
  crop      cover the target, trim the overflow on the --anchor side

Settings are read from pixelforge.toml when present; flags override them.
Run 'pixelforge gen-config' to generate a documented config file.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::CONFIG_FILE_NAME, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

/// Enumeration flags shared by `resolutions` and `info`.
#[derive(clap::Args, Clone)]
struct EnumerateArgs {
    /// Aspect ratio: 1:1, 3:2, 4:3, 16:9 or 16:10
    #[arg(long)]
    aspect_ratio: Option<AspectRatio>,
    /// landscape, portrait or square
    #[arg(long)]
    orientation: Option<Orientation>,
    /// Both sides must be multiples of this step
    #[arg(long)]
    divisible_by: Option<u32>,
    /// Megapixel limit, e.g. "4" or "4 MP"
    #[arg(long, value_parser = parse_megapixel_label)]
    max_megapixels: Option<f64>,
}

/// Transform flags shared by `resize` and `batch`.
#[derive(clap::Args, Clone, Default)]
struct TransformArgs {
    /// Target width
    #[arg(long)]
    width: Option<u32>,
    /// Target height
    #[arg(long)]
    height: Option<u32>,
    /// stretch, resize, pad, pad_edge or crop
    #[arg(long)]
    mode: Option<ProportionMode>,
    /// center, top, bottom, left or right
    #[arg(long)]
    anchor: Option<Anchor>,
    /// Reduce the target to multiples of this value (0 or 1 disables)
    #[arg(long)]
    divisible_by: Option<u32>,
    /// Pad fill as "r, g, b"
    #[arg(long)]
    pad_color: Option<PadColor>,
    /// nearest-exact, bilinear, bicubic or lanczos
    #[arg(long)]
    filter: Option<ResampleFilter>,
}

#[derive(Subcommand)]
enum Command {
    /// List every valid resolution for the given constraints
    Resolutions {
        #[command(flatten)]
        args: EnumerateArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show details for one resolution from the list
    Info {
        /// Resolution as WxH, e.g. 1536x1024
        resolution: String,
        #[command(flatten)]
        args: EnumerateArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Transform a single image to the target resolution
    Resize {
        input: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        args: TransformArgs,
        /// Grayscale mask transformed with identical geometry
        #[arg(long, requires = "mask_output")]
        mask: Option<PathBuf>,
        /// Where to write the transformed mask
        #[arg(long, requires = "mask")]
        mask_output: Option<PathBuf>,
    },
    /// Transform every image in a directory, writing PNGs
    Batch {
        input_dir: PathBuf,
        output_dir: PathBuf,
        #[command(flatten)]
        args: TransformArgs,
    },
    /// Print a stock pixelforge.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Resolutions { args, json } => {
            let config = config::load_config(&cli.config)?;
            let selector = build_selector(&config.resolution, &args)?;
            if json {
                let infos: Vec<ResolutionInfo> = selector
                    .choices()
                    .iter()
                    .filter_map(|c| c.resolution())
                    .map(|r| ResolutionInfo::new(r, selector.aspect(), selector.orientation()))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&infos)?);
            } else {
                output::print_resolution_list(
                    selector.aspect(),
                    selector.orientation(),
                    selector.divisible_by(),
                    selector.max_megapixels(),
                    selector.choices(),
                );
            }
        }
        Command::Info {
            resolution,
            args,
            json,
        } => {
            let config = config::load_config(&cli.config)?;
            let mut selector = build_selector(&config.resolution, &args)?;
            if !selector.select_label(&resolution)? {
                return Err(format!(
                    "{} is not a valid {} {} resolution for these constraints",
                    resolution,
                    selector.aspect(),
                    selector.orientation()
                )
                .into());
            }
            let info = selector
                .info()
                .ok_or("no resolution satisfies these constraints")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                output::print_resolution_info(&info);
            }
        }
        Command::Resize {
            input,
            output: output_path,
            args,
            mask,
            mask_output,
        } => {
            let config = config::load_config(&cli.config)?;
            let request = build_request(&config.resize, &args);
            let mut job = TransformJob::new(&input, &output_path);
            if let (Some(mask), Some(mask_output)) = (mask, mask_output) {
                job = job.with_mask(mask, mask_output);
            }
            let outcome = transform_file(&RustBackend::new(), &job, &request)?;
            output::print_transform_output(
                &input.display().to_string(),
                &output_path.display().to_string(),
                &request,
                &outcome,
            );
        }
        Command::Batch {
            input_dir,
            output_dir,
            args,
        } => {
            let config = config::load_config(&cli.config)?;
            let request = build_request(&config.resize, &args);
            init_thread_pool(&config.processing);
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_process_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = process::process_dir(&input_dir, &output_dir, &request, Some(tx));
            printer.join().ok();
            let summary = result?;
            println!("==> {}", summary);
            if summary.failed() > 0 {
                return Err(format!(
                    "{} of {} images failed",
                    summary.failed(),
                    summary.entries.len()
                )
                .into());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

fn build_selector(
    defaults: &config::ResolutionConfig,
    args: &EnumerateArgs,
) -> Result<ResolutionSelector, pixelforge::resolution::ResolutionError> {
    ResolutionSelector::new(
        args.aspect_ratio.unwrap_or(defaults.aspect_ratio),
        args.orientation.unwrap_or(defaults.orientation),
        args.divisible_by.unwrap_or(defaults.divisible_by),
        args.max_megapixels.unwrap_or(defaults.max_megapixels),
    )
}

fn build_request(defaults: &config::ResizeConfig, args: &TransformArgs) -> TransformRequest {
    let base = defaults.to_request();
    TransformRequest {
        target: Resolution::new(
            args.width.unwrap_or(base.target.width),
            args.height.unwrap_or(base.target.height),
        ),
        mode: args.mode.unwrap_or(base.mode),
        anchor: args.anchor.unwrap_or(base.anchor),
        divisible_by: args.divisible_by.unwrap_or(base.divisible_by),
        pad_color: args.pad_color.unwrap_or(base.pad_color),
        filter: args.filter.unwrap_or(base.filter),
    }
}
