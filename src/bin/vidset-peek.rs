use std::io::{Write, stdout};

use clap::Parser;
use colored::Colorize;
use vidset::{FfmpegLogLevel, TarDataset, VidsetError};

const CLI_AFTER_HELP: &str = "Examples:\n  vidset-peek testoutput.tar\n  vidset-peek https://storage.example.com/shards/shard-000000.tar -n 5\n  vidset-peek testoutput.tar --field clip.mp4 --log-level quiet --verbose";

#[derive(Debug, Parser)]
#[command(
    name = "vidset-peek",
    version,
    about = "Inspect the first samples of a tar-sharded video dataset",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Archive location: a local tar path or an http(s) URL.
    input: String,

    /// Field holding the video payload.
    #[arg(long, default_value = "mp4")]
    field: String,

    /// Number of samples to inspect.
    #[arg(long, short = 'n', default_value_t = 3)]
    samples: usize,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long, default_value = "error")]
    log_level: String,

    /// Show additional logging output.
    #[arg(long)]
    verbose: bool,
}

fn run() -> Result<(), VidsetError> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "warn" }),
    )
    .init();

    let level: FfmpegLogLevel = cli.log_level.parse()?;
    vidset::set_ffmpeg_log_level(level);

    let dataset = TarDataset::open(&cli.input)?;
    let mut out = stdout().lock();
    let written = vidset::peek(&dataset, &cli.field, cli.samples, &mut out)?;
    out.flush()?;

    eprintln!(
        "{} {} sample(s) from {}",
        "inspected".green().bold(),
        written,
        cli.input.cyan(),
    );
    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
