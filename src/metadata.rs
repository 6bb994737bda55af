//! Clip metadata types.
//!
//! [`ClipMetadata`] is the descriptive record returned alongside the decoded
//! tensors of a [`VideoClip`](crate::VideoClip). It is extracted from the
//! container and stream parameters during the decode pass.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    time::Duration,
};

/// Descriptive attributes of a decoded clip.
///
/// The [`Display`] implementation renders the record as a small key/value
/// map, e.g. `{video_fps: 30, audio_fps: 44100, duration: 2.000s}`, which is
/// what the peek tool prints per sample.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct ClipMetadata {
    /// Frames per second of the visual stream. `None` when the container has
    /// no video stream (may be approximate for variable-frame-rate content).
    pub frames_per_second: Option<f64>,
    /// Sample rate of the audio stream in hertz. `None` when the container
    /// has no audio stream.
    pub audio_sample_rate: Option<u32>,
    /// Total duration reported by the container.
    pub duration: Duration,
}

impl Display for ClipMetadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut parts = Vec::with_capacity(3);
        if let Some(fps) = self.frames_per_second {
            parts.push(format!("video_fps: {fps}"));
        }
        if let Some(rate) = self.audio_sample_rate {
            parts.push(format!("audio_fps: {rate}"));
        }
        parts.push(format!("duration: {:.3}s", self.duration.as_secs_f64()));
        write!(f, "{{{}}}", parts.join(", "))
    }
}
