#![deny(unsafe_code)]
//! CLI binary for swatch.
//!
//! Subcommands:
//! - `render`: start the scene on the software backend, replay button
//!   presses, write a PNG
//! - `list`: print the controls and their colors

mod error;
mod snapshot;

use clap::{Parser, Subcommand};
use error::CliError;
use std::path::PathBuf;
use std::process;
use std::sync::Once;
use swatch_core::{App, AppConfig, Control, SoftwareBackend, Viewport};

#[derive(Parser)]
#[command(name = "swatch", about = "Render the swatch scene headlessly")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Raise the log level (-v debug, -vv trace). `RUST_LOG` wins when set.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the scene, replay presses in order and write a PNG snapshot.
    Render {
        /// Control to press (maroon, tosca, pastel, reset). Repeatable.
        #[arg(short, long = "press")]
        presses: Vec<String>,

        /// Surface width in pixels.
        #[arg(short = 'W', long, default_value_t = 640)]
        width: u32,

        /// Surface height in pixels.
        #[arg(short = 'H', long, default_value_t = 480)]
        height: u32,

        /// Output file path.
        #[arg(short, long, default_value = "swatch.png")]
        output: PathBuf,
    },
    /// List the controls and the colors they select.
    List,
}

static LOG_INIT: Once = Once::new();

fn init_logging(verbose: u8) {
    LOG_INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(match verbose {
                0 => log::LevelFilter::Warn,
                1 => log::LevelFilter::Debug,
                _ => log::LevelFilter::Trace,
            });
        }
        builder.init();
    });
}

/// Resolves `--press` values to controls, rejecting the first unknown name.
fn parse_presses(names: &[String]) -> Result<Vec<Control>, CliError> {
    names
        .iter()
        .map(|name| {
            Control::from_name(name).ok_or_else(|| {
                let known: Vec<&str> = Control::all().iter().map(|c| c.name()).collect();
                CliError::Input(format!(
                    "unknown control '{name}' (expected one of: {})",
                    known.join(", ")
                ))
            })
        })
        .collect()
}

/// Starts the scene at `width`x`height` and replays `presses`. The returned
/// backend handle holds the final frame.
fn render_scene(
    width: u32,
    height: u32,
    presses: &[Control],
) -> Result<(App<SoftwareBackend>, SoftwareBackend), CliError> {
    let backend = SoftwareBackend::new(width, height)
        .map_err(|e| CliError::Input(e.to_string()))?;
    let mut surface = backend.clone();
    let mut app = App::start(
        backend.clone(),
        &mut surface,
        Viewport::new(width, height),
        &AppConfig::default(),
    )?;
    for control in presses {
        app.press(*control);
    }
    Ok((app, backend))
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            if cli.json {
                let controls: Vec<_> = Control::all()
                    .iter()
                    .map(|c| {
                        serde_json::json!({
                            "name": c.name(),
                            "id": c.id(),
                            "hex": c.color().to_hex(),
                            "rgba": c.color().to_array(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&controls)?);
            } else {
                println!("Controls:");
                for c in Control::all() {
                    let [r, g, b, a] = c.color().to_array();
                    println!(
                        "  {:<7} {}  ({r}, {g}, {b}, {a})",
                        c.name(),
                        c.color().to_hex()
                    );
                }
            }
        }
        Command::Render {
            presses,
            width,
            height,
            output,
        } => {
            let controls = parse_presses(&presses)?;
            let (app, backend) = render_scene(width, height, &controls)?;

            snapshot::write_png(&backend, &output)?;

            if cli.json {
                let info = serde_json::json!({
                    "width": width,
                    "height": height,
                    "presses": controls,
                    "color": app.color().to_hex(),
                    "frames": app.frames(),
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {width}x{height} in {} after {} press(es) -> {}",
                    app.color().to_hex(),
                    controls.len(),
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        log::error!("{e}");
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
