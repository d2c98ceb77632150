//! meshport - inspect and convert PLY / Wavefront OBJ geometry files

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use meshport_io::PlyFormat;
use meshport_tools::{convert, inspect, Result};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "meshport")]
#[command(about = "Inspect and convert PLY and OBJ geometry files")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the header and mesh counts of a file
    Inspect {
        /// Input .ply or .obj file
        file: PathBuf,

        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert between PLY and OBJ, or between PLY representations
    Convert {
        /// Input .ply or .obj file
        input: PathBuf,

        /// Output path; the extension selects the format
        output: PathBuf,

        /// PLY record representation
        #[arg(short, long, value_enum)]
        format: Option<Representation>,

        /// Replace an existing output file
        #[arg(long)]
        overwrite: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Representation {
    Ascii,
    Binary,
}

impl From<Representation> for PlyFormat {
    fn from(r: Representation) -> Self {
        match r {
            Representation::Ascii => PlyFormat::Ascii,
            Representation::Binary => PlyFormat::BinaryLittleEndian,
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Inspect { file, json } => {
            let summary = inspect(&file)?;
            if json {
                println!("{}", summary.to_json()?);
            } else {
                print!("{summary}");
            }
        }
        Commands::Convert {
            input,
            output,
            format,
            overwrite,
        } => {
            let written = convert(&input, &output, format.map(PlyFormat::from), overwrite)?;
            println!("{}", written.display());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
