//! pbsift: unwrap captured API responses, decode protobuf payloads without a
//! schema into editable JSON, and encode them back.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use pbsift_cli::commands::{decode, encode, lookup};
use pbsift_cli::config::{self, PbsiftConfig};
use pbsift_cli::exit::exit_code;
use pbsift_core::error::{PbsiftError, Result};

#[derive(Parser, Debug)]
#[command(name = "pbsift", version, about = "Schema-less protobuf capture decoder")]
struct Cli {
    /// YAML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Unwrap and decode a captured response into a JSON document.
    Decode {
        input: PathBuf,
        /// Defaults to `<input>.json`.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Encode a (possibly edited) JSON document back to protobuf bytes.
    Encode {
        input: PathBuf,
        /// Defaults to `<input stem>.bin`.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Summarize a saved user-lookup response.
    Lookup { input: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let cfg = match cli.config.as_deref().map(config::load_from_file).transpose() {
        Ok(cfg) => cfg.unwrap_or_default(),
        Err(e) => return fail(&e),
    };
    init_logging(&cfg);

    match run(cli.command, &cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

fn init_logging(cfg: &PbsiftConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log.level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Command, cfg: &PbsiftConfig) -> Result<()> {
    match command {
        Command::Decode { input, output } => {
            let outcome = decode::run(&input, output.as_deref(), cfg)?;
            println!("{}", outcome.output.display());
        }
        Command::Encode { input, output } => {
            let written = encode::run(&input, output.as_deref(), cfg)?;
            println!("{}", written.display());
        }
        Command::Lookup { input } => {
            print!("{}", lookup::run(&input)?);
        }
    }
    Ok(())
}

fn fail(e: &PbsiftError) -> ExitCode {
    eprintln!("error: {e}");
    ExitCode::from(exit_code(e.code()))
}
