#![deny(unsafe_code)]
//! CLI binary for the synturb magnetic-field toolkit.
//!
//! Subcommands:
//! - `list` — print available field models
//! - `describe <field>` — print description, parameters, and schema
//! - `sample <field> --at x,y,z` — evaluate the field at positions
//! - `stats <field>` — aggregate statistics over a sampled cube
//! - `map <field>` — write a grayscale magnitude slice as PNG
//!
//! Logs go to stderr (`RUST_LOG` overrides the level) so `--json` output
//! on stdout stays machine-readable.

mod error;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use glam::DVec3;

use synturb_core::units::PARSEC;
use synturb_core::MagneticField;
use synturb_fields::snapshot::MagnitudeSlice;
use synturb_fields::{probe, snapshot, FieldKind};

use error::CliError;

#[derive(Parser)]
#[command(name = "synturb", about = "Turbulent magnetic field synthesis CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Raise log verbosity to debug (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Arguments shared by every subcommand that builds a field.
#[derive(Args)]
struct FieldArgs {
    /// Field name (e.g. "plane-wave").
    field: String,

    /// PRNG seed for deterministic construction.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Field parameters as a JSON string.
    #[arg(long, default_value = "{}")]
    params: String,
}

#[derive(Subcommand)]
enum Command {
    /// List available field models.
    List,
    /// Print a field's description, parameters, and parameter schema.
    Describe {
        #[command(flatten)]
        args: FieldArgs,
    },
    /// Evaluate the field at one or more positions.
    Sample {
        #[command(flatten)]
        args: FieldArgs,

        /// Position "x,y,z" in meters; repeatable.
        #[arg(long = "at", value_name = "X,Y,Z", required = true)]
        at: Vec<String>,
    },
    /// Aggregate field statistics over a sampled cube.
    Stats {
        #[command(flatten)]
        args: FieldArgs,

        /// Center of the sampling cube as "x,y,z" in meters.
        #[arg(long, value_name = "X,Y,Z", default_value = "0,0,0")]
        center: String,

        /// Half-extent of the sampling cube per axis, in meters.
        #[arg(long, default_value_t = 50.0 * PARSEC)]
        extent: f64,

        /// Number of sampled positions.
        #[arg(long, default_value_t = 10_000)]
        count: usize,
    },
    /// Write the field magnitude over a z-plane as a grayscale PNG.
    Map {
        #[command(flatten)]
        args: FieldArgs,

        /// Half-extent of the slice along x and y, in meters.
        #[arg(long, default_value_t = 50.0 * PARSEC)]
        extent: f64,

        /// Height of the slice plane, in meters.
        #[arg(long, default_value_t = 0.0)]
        z: f64,

        /// Image resolution per axis, in pixels.
        #[arg(long, default_value_t = 256)]
        resolution: u32,

        /// Output file path.
        #[arg(short, long, default_value = "field.png")]
        output: PathBuf,
    },
}

fn parse_position(text: &str) -> Result<DVec3, CliError> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != 3 {
        return Err(CliError::Input(format!(
            "invalid position {text:?}: expected x,y,z"
        )));
    }
    let mut coords = [0.0_f64; 3];
    for (slot, part) in coords.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse()
            .map_err(|e| CliError::Input(format!("invalid position {text:?}: {e}")))?;
    }
    Ok(DVec3::new(coords[0], coords[1], coords[2]))
}

fn build_field(args: &FieldArgs) -> Result<FieldKind, CliError> {
    let params: serde_json::Value = serde_json::from_str(&args.params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    Ok(FieldKind::from_name(&args.field, args.seed, &params)?)
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let fields = FieldKind::list_fields();
            if cli.json {
                let info = serde_json::json!({ "fields": fields });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Fields:");
                for name in fields {
                    println!("  {name}");
                }
            }
        }
        Command::Describe { args } => {
            let field = build_field(&args)?;
            if cli.json {
                let info = serde_json::json!({
                    "field": args.field,
                    "description": field.description(),
                    "params": field.params(),
                    "schema": field.param_schema(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{}", field.description());
                println!("parameters:");
                println!("{}", serde_json::to_string_pretty(&field.params())?);
                println!("schema:");
                println!("{}", serde_json::to_string_pretty(&field.param_schema())?);
            }
        }
        Command::Sample { args, at } => {
            let field = build_field(&args)?;
            let positions = at
                .iter()
                .map(|text| parse_position(text))
                .collect::<Result<Vec<_>, _>>()?;
            if cli.json {
                let samples: Vec<_> = positions
                    .iter()
                    .map(|&position| {
                        let b = probe::sample_or_zero(&field, position);
                        serde_json::json!({
                            "position": [position.x, position.y, position.z],
                            "field": [b.x, b.y, b.z],
                            "magnitude": b.length(),
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::Value::Array(samples))?
                );
            } else {
                for position in positions {
                    let b = probe::sample_or_zero(&field, position);
                    println!(
                        "B({:.6e}, {:.6e}, {:.6e}) = ({:.6e}, {:.6e}, {:.6e}) T  |B| = {:.6e} T",
                        position.x,
                        position.y,
                        position.z,
                        b.x,
                        b.y,
                        b.z,
                        b.length()
                    );
                }
            }
        }
        Command::Stats {
            args,
            center,
            extent,
            count,
        } => {
            let field = build_field(&args)?;
            let center = parse_position(&center)?;
            let stats = probe::collect_stats(&field, center, extent, count, args.seed);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats.to_json())?);
            } else {
                println!("{}", field.description());
                println!("samples:       {}", stats.samples);
                println!(
                    "mean:          ({:.6e}, {:.6e}, {:.6e}) T",
                    stats.mean.x, stats.mean.y, stats.mean.z
                );
                println!("rms:           {:.6e} T", stats.rms);
                println!("max magnitude: {:.6e} T", stats.max_magnitude);
            }
        }
        Command::Map {
            args,
            extent,
            z,
            resolution,
            output,
        } => {
            let field = build_field(&args)?;
            let slice = MagnitudeSlice {
                center: DVec3::new(0.0, 0.0, z),
                extent,
                resolution,
            };
            snapshot::write_magnitude_png(&field, &slice, &output)?;
            if cli.json {
                let info = serde_json::json!({
                    "field": args.field,
                    "extent": extent,
                    "z": z,
                    "resolution": resolution,
                    "seed": args.seed,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "mapped {} ({resolution}x{resolution}, extent {extent:.3e} m, \
                     z {z:.3e} m, seed {}) -> {}",
                    args.field,
                    args.seed,
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
