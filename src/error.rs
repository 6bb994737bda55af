//! Error types for the `vidset` crate.
//!
//! This module defines [`VidsetError`], the unified error type returned by all
//! fallible operations in the crate. Errors carry enough context — archive
//! locations, member names, field names — to diagnose a bad shard without
//! additional logging at the call site.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `vidset` operations.
///
/// Every public method that can fail returns `Result<T, VidsetError>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VidsetError {
    /// The archive could not be located or opened.
    #[error("Failed to open archive at {location}: {reason}")]
    ArchiveOpen {
        /// Location that was passed to [`crate::TarDataset::open`].
        location: String,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// A tar member could not be read or its header was malformed.
    #[error("Failed to read archive entry: {0}")]
    EntryRead(String),

    /// A sample does not carry the requested field.
    #[error("Sample {sample} has no field {field:?}")]
    MissingField {
        /// Key of the offending sample.
        sample: String,
        /// The field that was requested.
        field: String,
    },

    /// A field payload could not be decoded by its registered strategy.
    #[error("Failed to decode field {field:?}: {reason}")]
    FieldDecodeError {
        /// The field whose payload was rejected.
        field: String,
        /// Underlying reason the decode failed.
        reason: String,
    },

    /// A materialized clip file could not be opened by the demuxer.
    #[error("Failed to open clip at {path}: {reason}")]
    ClipOpen {
        /// Path of the transient clip file.
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// A video frame could not be decoded.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// Audio data could not be decoded.
    #[error("Failed to decode audio: {0}")]
    AudioDecodeError(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate while decoding an image field.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),
}

impl From<FfmpegError> for VidsetError {
    fn from(error: FfmpegError) -> Self {
        VidsetError::FfmpegError(error.to_string())
    }
}
