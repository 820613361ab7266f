#![deny(unsafe_code)]
//! CLI binary for the flowtex LIC renderer.
//!
//! Subcommands:
//! - `render <preset>`: run the LIC pipeline over a built-in vector field,
//!   write a grayscale PNG
//! - `list`: print available presets

mod error;
mod snapshot;

use clap::{Parser, Subcommand};
use error::CliError;
use flowtex_lic::{compute_lic_with_postprocessing, vfields, Execution, LicConfig};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "flowtex", about = "Line integral convolution flow-texture renderer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging (repeat for more detail).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a built-in vector field preset and write a PNG.
    Render {
        /// Preset name (see `flowtex list`).
        preset: String,

        /// Grid size; the domain is size x size cells.
        #[arg(short, long, default_value_t = 512)]
        size: usize,

        /// Streamline length in cells; defaults to the preset's suggestion.
        #[arg(long)]
        streamlength: Option<usize>,

        /// PRNG seed for the noise texture.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// LIC passes per refinement cycle.
        #[arg(long, default_value_t = 3)]
        passes: usize,

        /// Refinement cycles.
        #[arg(long, default_value_t = 3)]
        cycles: usize,

        /// Disable the per-cycle high-pass filter.
        #[arg(long)]
        no_highpass: bool,

        /// Gaussian sigma for the high-pass filter.
        #[arg(long, default_value_t = 3.0)]
        filter_sigma: f64,

        /// Disable the final adaptive equalization.
        #[arg(long)]
        no_equalize: bool,

        /// Open boundaries instead of periodic wrap-around.
        #[arg(long)]
        open_boundaries: bool,

        /// Run the reference serial backend instead of the parallel one.
        #[arg(long)]
        serial: bool,

        /// Output file path.
        #[arg(short, long, default_value = "lic.png")]
        output: PathBuf,
    },
    /// List available vector field presets.
    List,
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let presets = vfields::list_names();
            if cli.json {
                let info = serde_json::json!({ "presets": presets });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Presets:");
                for name in presets {
                    println!("  {name}");
                }
            }
        }
        Command::Render {
            preset,
            size,
            streamlength,
            seed,
            passes,
            cycles,
            no_highpass,
            filter_sigma,
            no_equalize,
            open_boundaries,
            serial,
            output,
        } => {
            let preset = vfields::from_name(&preset, size)?;
            let config = LicConfig {
                streamlength: Some(streamlength.unwrap_or(preset.streamlength)),
                seed,
                periodic: !open_boundaries,
                num_passes: passes,
                num_cycles: cycles,
                highpass: (!no_highpass).then_some(filter_sigma),
                equalize: !no_equalize,
                execution: if serial {
                    Execution::Serial
                } else {
                    Execution::Parallel
                },
            };

            let sfield = compute_lic_with_postprocessing(&preset.vfield, None, &config)?;
            snapshot::write_png(&sfield, &output)?;

            if cli.json {
                let info = serde_json::json!({
                    "preset": preset.name,
                    "size": size,
                    "streamlength": config.streamlength,
                    "seed": seed,
                    "passes": passes,
                    "cycles": cycles,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} at {size}x{size} -> {}",
                    preset.name,
                    output.display()
                );
            }
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if SimpleLogger::new().with_level(level).init().is_err() {
        eprintln!("warning: logger already initialized");
    }
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        process::exit(e.exit_code());
    }
}
