//! FFmpeg log level control.
//!
//! FFmpeg writes its own diagnostics to stderr, independently of the Rust
//! [`log`](https://crates.io/crates/log) crate. Decoding partially-written
//! shards can be noisy, so the peek tool (and any embedder) can tune that
//! output here without importing `ffmpeg-next` directly. Rust-side logging
//! is configured separately, through a `log` subscriber such as
//! `env_logger`.

use std::str::FromStr;

use ffmpeg_next::util::log::Level;

use crate::error::VidsetError;

/// FFmpeg internal log verbosity, most quiet to most verbose.
///
/// Maps directly to FFmpeg's `AV_LOG_*` constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FfmpegLogLevel {
    /// Print nothing at all.
    Quiet,
    /// Only unrecoverable conditions that abort the process.
    Panic,
    /// Unrecoverable errors; the context becomes invalid.
    Fatal,
    /// Recoverable errors.
    Error,
    /// Warnings (FFmpeg's default).
    Warning,
    /// Informational messages.
    Info,
    /// Verbose informational messages.
    Verbose,
    /// Debugging messages.
    Debug,
    /// Extremely verbose tracing output.
    Trace,
}

impl FfmpegLogLevel {
    fn to_ffmpeg_level(self) -> Level {
        match self {
            FfmpegLogLevel::Quiet => Level::Quiet,
            FfmpegLogLevel::Panic => Level::Panic,
            FfmpegLogLevel::Fatal => Level::Fatal,
            FfmpegLogLevel::Error => Level::Error,
            FfmpegLogLevel::Warning => Level::Warning,
            FfmpegLogLevel::Info => Level::Info,
            FfmpegLogLevel::Verbose => Level::Verbose,
            FfmpegLogLevel::Debug => Level::Debug,
            FfmpegLogLevel::Trace => Level::Trace,
        }
    }
}

impl FromStr for FfmpegLogLevel {
    type Err = VidsetError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "quiet" => Ok(FfmpegLogLevel::Quiet),
            "panic" => Ok(FfmpegLogLevel::Panic),
            "fatal" => Ok(FfmpegLogLevel::Fatal),
            "error" => Ok(FfmpegLogLevel::Error),
            "warning" | "warn" => Ok(FfmpegLogLevel::Warning),
            "info" => Ok(FfmpegLogLevel::Info),
            "verbose" => Ok(FfmpegLogLevel::Verbose),
            "debug" => Ok(FfmpegLogLevel::Debug),
            "trace" => Ok(FfmpegLogLevel::Trace),
            other => Err(VidsetError::FfmpegError(format!(
                "Unknown FFmpeg log level: {other:?}"
            ))),
        }
    }
}

/// Set the FFmpeg internal log verbosity.
///
/// Controls what FFmpeg itself prints to stderr; it does **not** affect
/// the crate's `log` output.
///
/// # Example
///
/// ```no_run
/// use vidset::FfmpegLogLevel;
///
/// // Only show FFmpeg errors and above.
/// vidset::set_ffmpeg_log_level(FfmpegLogLevel::Error);
/// ```
pub fn set_ffmpeg_log_level(level: FfmpegLogLevel) {
    ffmpeg_next::util::log::set_level(level.to_ffmpeg_level());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_aliases() {
        assert_eq!(
            "warn".parse::<FfmpegLogLevel>().unwrap(),
            FfmpegLogLevel::Warning,
        );
        assert_eq!(
            "QUIET".parse::<FfmpegLogLevel>().unwrap(),
            FfmpegLogLevel::Quiet,
        );
        assert!("loud".parse::<FfmpegLogLevel>().is_err());
    }
}
