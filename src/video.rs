//! Clip decoding.
//!
//! This module turns a video container into tensors. [`read_video`] demuxes
//! a file on disk in a single forward pass, decoding the best video stream
//! to RGB24 frames and the best audio stream to f32 samples.
//! [`decode_mp4`] is the byte-buffer entry point used for archive fields: it
//! materializes the payload into a scratch directory, decodes it, and
//! removes the directory before returning — on the error path too.
//!
//! # Example
//!
//! ```no_run
//! let bytes = std::fs::read("clip.mp4")?;
//! let clip = vidset::decode_mp4(&bytes)?;
//! println!("{:?} {:?}", clip.frames.shape(), clip.audio.shape());
//! println!("{}", clip.metadata);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::{fs, path::Path, time::Duration};

use ffmpeg_next::{
    Packet,
    codec::context::Context as CodecContext,
    decoder::{Audio as AudioDecoder, Video as VideoDecoder},
    format::{Pixel, Sample, context::Input, sample::Type as SampleType},
    frame::{Audio as AudioFrame, Video as VideoFrame},
    media::Type,
    software::{
        resampling::Context as ResamplingContext,
        scaling::{Context as ScalingContext, Flags as ScalingFlags},
    },
};
use ndarray::{Array2, Array4};
use tempfile::TempDir;

use crate::{clip::VideoClip, error::VidsetError, metadata::ClipMetadata};

/// Fixed name of the transient clip file inside the scratch directory.
const CLIP_FILE_NAME: &str = "sample.mp4";

/// Decode an in-memory MP4 payload into a [`VideoClip`].
///
/// The byte buffer is written verbatim to `sample.mp4` inside a scratch
/// directory created under the system temporary directory, handed to
/// [`read_video`], and the directory is removed before this function
/// returns — whether the decode succeeded or failed.
///
/// # Errors
///
/// - [`VidsetError::IoError`] if the scratch directory or clip file cannot
///   be created.
/// - [`VidsetError::ClipOpen`] if the payload is not a readable container.
/// - [`VidsetError::VideoDecodeError`] / [`VidsetError::AudioDecodeError`]
///   if a stream cannot be decoded.
pub fn decode_mp4(bytes: &[u8]) -> Result<VideoClip, VidsetError> {
    decode_in_scratch(tempfile::tempdir()?, bytes)
}

/// Like [`decode_mp4`], but creates the scratch directory under `parent`.
///
/// Useful when the system temporary directory is unsuitable (size, mount
/// options) and for observing that the scratch space is gone after the call.
///
/// # Errors
///
/// Same as [`decode_mp4`].
pub fn decode_mp4_in(parent: &Path, bytes: &[u8]) -> Result<VideoClip, VidsetError> {
    decode_in_scratch(tempfile::tempdir_in(parent)?, bytes)
}

fn decode_in_scratch(scratch: TempDir, bytes: &[u8]) -> Result<VideoClip, VidsetError> {
    let clip_path = scratch.path().join(CLIP_FILE_NAME);
    log::trace!(
        "Materializing {} byte payload at {}",
        bytes.len(),
        clip_path.display(),
    );
    let result = fs::write(&clip_path, bytes)
        .map_err(VidsetError::from)
        .and_then(|()| read_video(&clip_path));
    // close() surfaces removal errors that a bare Drop would swallow; it
    // runs on the error path as well.
    scratch.close()?;
    result
}

/// Decode a video container on disk into a [`VideoClip`].
///
/// Performs one forward demux pass, feeding the best video stream through a
/// decoder and an RGB24 scaler, and the best audio stream through a decoder
/// and an f32 resampler at the native rate and channel count. A container
/// without a video stream yields an empty `[0, 0, 0, 3]` frame tensor; one
/// without audio yields an empty `[0, 0]` sample tensor.
///
/// # Errors
///
/// - [`VidsetError::ClipOpen`] if the file cannot be opened by the demuxer.
/// - [`VidsetError::VideoDecodeError`] / [`VidsetError::AudioDecodeError`]
///   if a stream cannot be decoded.
pub fn read_video<P: AsRef<Path>>(path: P) -> Result<VideoClip, VidsetError> {
    let path = path.as_ref();
    log::debug!("Decoding clip: {}", path.display());

    // Initialise ffmpeg (safe to call multiple times).
    ffmpeg_next::init().map_err(|error| VidsetError::ClipOpen {
        path: path.to_path_buf(),
        reason: format!("FFmpeg initialisation failed: {error}"),
    })?;

    let mut input_context =
        ffmpeg_next::format::input(&path).map_err(|error| VidsetError::ClipOpen {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;

    let video_stream_index = input_context
        .streams()
        .best(Type::Video)
        .map(|stream| stream.index());
    let audio_stream_index = input_context
        .streams()
        .best(Type::Audio)
        .map(|stream| stream.index());

    let duration_microseconds = input_context.duration();
    let duration = if duration_microseconds > 0 {
        Duration::from_micros(duration_microseconds as u64)
    } else {
        Duration::ZERO
    };

    let mut video = video_stream_index
        .map(|index| VideoCollector::new(&input_context, index))
        .transpose()?;
    let mut audio = audio_stream_index
        .map(|index| AudioCollector::new(&input_context, index))
        .transpose()?;

    // Single demux pass; packets for other streams (subtitles, data) are
    // dropped on the floor.
    for (stream, packet) in input_context.packets() {
        let index = Some(stream.index());
        if index == video_stream_index {
            if let Some(collector) = video.as_mut() {
                collector.feed(&packet)?;
            }
        } else if index == audio_stream_index {
            if let Some(collector) = audio.as_mut() {
                collector.feed(&packet)?;
            }
        }
    }
    if let Some(collector) = video.as_mut() {
        collector.finish()?;
    }
    if let Some(collector) = audio.as_mut() {
        collector.finish()?;
    }

    let (frames, frames_per_second) = match video {
        Some(collector) => collector.into_tensor()?,
        None => (Array4::zeros((0, 0, 0, 3)), None),
    };
    let (audio_samples, audio_sample_rate) = match audio {
        Some(collector) => collector.into_tensor()?,
        None => (Array2::zeros((0, 0)), None),
    };

    log::debug!(
        "Decoded {} frame(s), {} audio sample(s) from {}",
        frames.shape()[0],
        audio_samples.len(),
        path.display(),
    );

    Ok(VideoClip {
        frames,
        audio: audio_samples,
        metadata: ClipMetadata {
            frames_per_second,
            audio_sample_rate,
            duration,
        },
    })
}

/// Accumulates decoded video frames as packed RGB24 bytes.
struct VideoCollector {
    decoder: VideoDecoder,
    scaler: ScalingContext,
    width: u32,
    height: u32,
    frames_per_second: f64,
    pixels: Vec<u8>,
    frame_count: usize,
    decoded_frame: VideoFrame,
    rgb_frame: VideoFrame,
}

impl VideoCollector {
    fn new(input_context: &Input, stream_index: usize) -> Result<Self, VidsetError> {
        let stream = input_context.stream(stream_index).ok_or_else(|| {
            VidsetError::VideoDecodeError(format!("Video stream {stream_index} not found"))
        })?;

        // Average frame rate, falling back to the raw rate field.
        let frame_rate = stream.avg_frame_rate();
        let frames_per_second = if frame_rate.denominator() != 0 {
            frame_rate.numerator() as f64 / frame_rate.denominator() as f64
        } else {
            let rate = stream.rate();
            if rate.denominator() != 0 {
                rate.numerator() as f64 / rate.denominator() as f64
            } else {
                0.0
            }
        };

        let decoder_context = CodecContext::from_parameters(stream.parameters())?;
        let decoder = decoder_context.decoder().video().map_err(|error| {
            VidsetError::VideoDecodeError(format!("Failed to create video decoder: {error}"))
        })?;

        let width = decoder.width();
        let height = decoder.height();
        let scaler = ScalingContext::get(
            decoder.format(),
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )?;

        Ok(Self {
            decoder,
            scaler,
            width,
            height,
            frames_per_second,
            pixels: Vec::new(),
            frame_count: 0,
            decoded_frame: VideoFrame::empty(),
            rgb_frame: VideoFrame::empty(),
        })
    }

    fn feed(&mut self, packet: &Packet) -> Result<(), VidsetError> {
        self.decoder.send_packet(packet)?;
        self.drain()
    }

    fn finish(&mut self) -> Result<(), VidsetError> {
        self.decoder.send_eof()?;
        self.drain()
    }

    fn drain(&mut self) -> Result<(), VidsetError> {
        while self.decoder.receive_frame(&mut self.decoded_frame).is_ok() {
            self.scaler.run(&self.decoded_frame, &mut self.rgb_frame)?;
            append_packed_rgb(&self.rgb_frame, self.width, self.height, &mut self.pixels);
            self.frame_count += 1;
        }
        Ok(())
    }

    fn into_tensor(self) -> Result<(Array4<u8>, Option<f64>), VidsetError> {
        let shape = (
            self.frame_count,
            self.height as usize,
            self.width as usize,
            3,
        );
        let frames = Array4::from_shape_vec(shape, self.pixels).map_err(|error| {
            VidsetError::VideoDecodeError(format!(
                "Frame buffer does not match shape {shape:?}: {error}"
            ))
        })?;
        Ok((frames, Some(self.frames_per_second)))
    }
}

/// Accumulates decoded audio as interleaved f32 samples.
struct AudioCollector {
    decoder: AudioDecoder,
    resampler: ResamplingContext,
    channels: usize,
    sample_rate: u32,
    samples: Vec<f32>,
    decoded_frame: AudioFrame,
    resampled_frame: AudioFrame,
}

impl AudioCollector {
    fn new(input_context: &Input, stream_index: usize) -> Result<Self, VidsetError> {
        let stream = input_context.stream(stream_index).ok_or_else(|| {
            VidsetError::AudioDecodeError(format!("Audio stream {stream_index} not found"))
        })?;

        let decoder_context = CodecContext::from_parameters(stream.parameters())?;
        let decoder = decoder_context.decoder().audio().map_err(|error| {
            VidsetError::AudioDecodeError(format!("Failed to create audio decoder: {error}"))
        })?;

        let sample_rate = decoder.rate();
        let channel_layout = decoder.channel_layout();
        let channels = usize::from(decoder.channels());

        let resampler = ResamplingContext::get(
            decoder.format(),
            channel_layout,
            sample_rate,
            Sample::F32(SampleType::Packed),
            channel_layout,
            sample_rate,
        )
        .map_err(|error| {
            VidsetError::AudioDecodeError(format!("Failed to create resampler: {error}"))
        })?;

        Ok(Self {
            decoder,
            resampler,
            channels,
            sample_rate,
            samples: Vec::new(),
            decoded_frame: AudioFrame::empty(),
            resampled_frame: AudioFrame::empty(),
        })
    }

    fn feed(&mut self, packet: &Packet) -> Result<(), VidsetError> {
        self.decoder.send_packet(packet)?;
        self.drain()
    }

    fn finish(&mut self) -> Result<(), VidsetError> {
        self.decoder.send_eof()?;
        self.drain()
    }

    fn drain(&mut self) -> Result<(), VidsetError> {
        while self.decoder.receive_frame(&mut self.decoded_frame).is_ok() {
            self.resampler
                .run(&self.decoded_frame, &mut self.resampled_frame)
                .map_err(|error| {
                    VidsetError::AudioDecodeError(format!("Resample error: {error}"))
                })?;

            // Packed F32 output: one plane of interleaved samples.
            let sample_count = self.resampled_frame.samples() * self.channels;
            let data = self.resampled_frame.data(0);
            let float_samples: &[f32] = unsafe {
                std::slice::from_raw_parts(data.as_ptr() as *const f32, sample_count)
            };
            self.samples.extend_from_slice(float_samples);
        }
        Ok(())
    }

    fn into_tensor(self) -> Result<(Array2<f32>, Option<u32>), VidsetError> {
        let channels = self.channels.max(1);
        let (planar, per_channel) = deinterleave(self.samples, channels);
        let audio = Array2::from_shape_vec((channels, per_channel), planar).map_err(|error| {
            VidsetError::AudioDecodeError(format!(
                "Sample buffer does not match shape [{channels}, {per_channel}]: {error}"
            ))
        })?;
        Ok((audio, Some(self.sample_rate)))
    }
}

/// Copy pixel data from an RGB24 frame into a tightly-packed buffer.
///
/// FFmpeg frames frequently carry per-row padding (stride > width × 3);
/// this strips it so the rows can be stacked into a contiguous tensor.
fn append_packed_rgb(frame: &VideoFrame, width: u32, height: u32, out: &mut Vec<u8>) {
    let stride = frame.stride(0);
    let row_bytes = (width as usize) * 3;
    let data = frame.data(0);

    if stride == row_bytes {
        out.extend_from_slice(&data[..row_bytes * (height as usize)]);
    } else {
        for row in 0..(height as usize) {
            let row_start = row * stride;
            out.extend_from_slice(&data[row_start..row_start + row_bytes]);
        }
    }
}

/// Rearrange interleaved samples (`s0c0 s0c1 s1c0 …`) into channel-major
/// order. Returns the planar buffer and the per-channel sample count.
fn deinterleave(mut interleaved: Vec<f32>, channels: usize) -> (Vec<f32>, usize) {
    let channels = channels.max(1);
    let per_channel = interleaved.len() / channels;
    interleaved.truncate(per_channel * channels);

    let mut planar = vec![0.0f32; interleaved.len()];
    for (position, value) in interleaved.iter().enumerate() {
        let channel = position % channels;
        let sample = position / channels;
        planar[channel * per_channel + sample] = *value;
    }
    (planar, per_channel)
}
