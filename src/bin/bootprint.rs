//! Generates the bloody boot-print decal texture pair (right + mirrored left).
#![deny(warnings)]

use bootprint::{Emitter, SynthParams, Synthesizer};
use std::env;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

type Error = Box<dyn std::error::Error>;

#[derive(Debug)]
struct Args {
    output_dir: String,
    seed: Option<u64>,
    #[cfg(feature = "serde")]
    params_file: Option<String>,
}

impl Args {
    fn parse() -> Result<Args, Error> {
        let mut result = Args {
            output_dir: ".".to_string(),
            seed: None,
            #[cfg(feature = "serde")]
            params_file: None,
        };
        let mut usage = false;
        let mut args = env::args();
        let cmd = args.next().unwrap_or_else(|| "bootprint".to_string());
        while let Some(arg) = args.next() {
            match arg.as_ref() {
                "-h" => {
                    usage = true;
                    break;
                }
                "-o" => {
                    result.output_dir = args.next().ok_or("-o requires argument")?;
                }
                "-s" => {
                    let seed = args.next().ok_or("-s requires argument")?;
                    result.seed = Some(seed.parse()?);
                }
                "-c" => {
                    let file = args.next().ok_or("-c requires argument")?;
                    #[cfg(feature = "serde")]
                    {
                        result.params_file = Some(file);
                    }
                    #[cfg(not(feature = "serde"))]
                    {
                        let _ = file;
                        return Err("-c requires the 'serde' feature".into());
                    }
                }
                _ => return Err(format!("unexpected argument: {}", arg).into()),
            }
        }
        if usage {
            eprintln!("Generates the boot-print decal texture pair");
            eprintln!("\nUSAGE:");
            eprintln!("    {} [-o <dir>] [-s <seed>] [-c <params.json>]", cmd);
            eprintln!("\nARGS:");
            eprintln!("    -o <dir>          output directory (default: current directory)");
            eprintln!("    -s <seed>         override the splatter seed");
            eprintln!("    -c <params.json>  load synthesis parameters from a JSON file");
            std::process::exit(1);
        }
        Ok(result)
    }
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse()?;

    let mut params = SynthParams::default();
    #[cfg(feature = "serde")]
    if let Some(path) = &args.params_file {
        params = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    }
    if let Some(seed) = args.seed {
        params.seed = seed;
    }

    let synthesizer = Synthesizer::new(params)?;
    let right = synthesizer.synthesize();
    let report = Emitter::new(&args.output_dir).emit(&right)?;

    println!(
        "Created: {} ({} bytes)",
        report.right_path.display(),
        report.right_bytes
    );
    println!(
        "Created: {} ({} bytes)",
        report.left_path.display(),
        report.left_bytes
    );
    println!(
        "Texture size: {}x{}",
        synthesizer.params().width,
        synthesizer.params().height
    );
    Ok(())
}
