//! Decoded clip tensors.
//!
//! [`VideoClip`] bundles the two tensors produced by a decode pass — visual
//! frames and audio samples — with the clip's [`ClipMetadata`]. Pixel and
//! sample data live in [`ndarray`] arrays so shape inspection and slicing
//! need no copies.

use ndarray::{Array2, Array4, ArrayView3, Axis};

use crate::metadata::ClipMetadata;

/// A fully decoded video clip.
///
/// Created by [`read_video`](crate::read_video) or
/// [`decode_mp4`](crate::decode_mp4). Owned by a single iteration step and
/// dropped when the consumer moves on; clips share no state with each other.
#[derive(Debug, Clone)]
#[must_use]
pub struct VideoClip {
    /// Visual frames as `[frames, height, width, 3]` RGB24 intensities.
    /// Empty (`[0, 0, 0, 3]`) when the container has no video stream.
    pub frames: Array4<u8>,
    /// Audio samples as `[channels, samples]` 32-bit floats.
    /// Empty (`[0, 0]`) when the container has no audio stream.
    pub audio: Array2<f32>,
    /// Frame rate, sample rate, and duration of the source container.
    pub metadata: ClipMetadata,
}

impl VideoClip {
    /// Number of decoded visual frames.
    pub fn frame_count(&self) -> usize {
        self.frames.shape()[0]
    }

    /// Height of each frame in pixels.
    pub fn height(&self) -> usize {
        self.frames.shape()[1]
    }

    /// Width of each frame in pixels.
    pub fn width(&self) -> usize {
        self.frames.shape()[2]
    }

    /// Whether the clip carries any audio samples.
    pub fn has_audio(&self) -> bool {
        self.audio.len() > 0
    }

    /// Borrow a single frame as a `[height, width, 3]` view.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.frame_count()`.
    pub fn frame(&self, index: usize) -> ArrayView3<'_, u8> {
        self.frames.index_axis(Axis(0), index)
    }
}
