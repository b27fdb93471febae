use clap::{Parser, Subcommand};
use image_intake::config::{self, IntakeConfig};
use image_intake::http::ReqwestFetcher;
use image_intake::output::{self, IntakeSummary};
use image_intake::types::ImageReference;
use image_intake::{link, pipeline, resolve};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "image-intake")]
#[command(about = "Resolve, fetch and normalize images for analysis")]
#[command(long_about = "\
Resolve, fetch and normalize images for analysis

Accepts a local path, a direct image URL, or an image-host share page.
Share pages (hosts containing the configured marker, imgur by default) are
resolved to the direct image through their twitter:image metadata.

Images larger than the size bound (2000 x 2000 by default) are scaled down
preserving aspect ratio, and optionally converted to grayscale.

Run 'image-intake gen-config' to print a documented config file.")]
#[command(version)]
struct Cli {
    /// Config file (TOML); stock defaults when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Overrides for the `[normalize]` config section.
#[derive(clap::Args, Clone)]
struct NormalizeArgs {
    /// Convert to single-channel grayscale
    #[arg(long)]
    grayscale: bool,

    /// Maximum width in pixels
    #[arg(long)]
    max_width: Option<u32>,

    /// Maximum height in pixels
    #[arg(long)]
    max_height: Option<u32>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the direct image URL behind a share URL
    Resolve {
        url: String,
    },
    /// Load, resize and optionally grayscale an image
    Load {
        /// Local path or http(s) URL
        reference: String,

        #[command(flatten)]
        normalize: NormalizeArgs,

        /// Write the normalized image here (format from extension)
        #[arg(long)]
        save: Option<PathBuf>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the overlay visualization link for board corners
    Link {
        #[arg(allow_negative_numbers = true)]
        x0: i64,
        #[arg(allow_negative_numbers = true)]
        y0: i64,
        #[arg(allow_negative_numbers = true)]
        x1: i64,
        #[arg(allow_negative_numbers = true)]
        y1: i64,
        url: String,
    },
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Resolve { url } => {
            let config = config::load_config(cli.config.as_deref())?;
            let fetcher = ReqwestFetcher::new(&config.http)?;
            println!("{}", resolve::resolve(&fetcher, &config, &url)?);
        }
        Command::Load {
            reference,
            normalize,
            save,
            json,
        } => {
            let mut config = config::load_config(cli.config.as_deref())?;
            apply_normalize_args(&mut config, &normalize)?;
            let fetcher = ReqwestFetcher::new(&config.http)?;
            let reference = ImageReference::parse(&reference);

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_event(&event) {
                        // Keep stdout clean for --json
                        if json {
                            eprintln!("{line}");
                        } else {
                            println!("{line}");
                        }
                    }
                }
            });
            let result = pipeline::load(&fetcher, &config, &reference, Some(&tx));
            drop(tx);
            printer
                .join()
                .map_err(|_| "event printer thread panicked")?;
            let intake = result?;

            let summary = IntakeSummary::from_intake(&intake);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                output::print_summary(&summary);
            }

            match (&intake.image, save) {
                (Some(img), Some(path)) => {
                    img.save(&path)?;
                    if !json {
                        println!("==> Saved {}", path.display());
                    }
                }
                (None, _) => std::process::exit(2),
                _ => {}
            }
        }
        Command::Link {
            x0,
            y0,
            x1,
            y1,
            url,
        } => {
            println!("{}", link::format_visualize_link((x0, y0, x1, y1), &url));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Fold command-line normalization flags into the loaded config.
fn apply_normalize_args(
    config: &mut IntakeConfig,
    args: &NormalizeArgs,
) -> Result<(), config::ConfigError> {
    if args.grayscale {
        config.normalize.grayscale = true;
    }
    if let Some(w) = args.max_width {
        config.normalize.max_width = w;
    }
    if let Some(h) = args.max_height {
        config.normalize.max_height = h;
    }
    config.validate()
}
