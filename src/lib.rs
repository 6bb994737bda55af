//! # vidset
//!
//! Iterate tar-sharded datasets and decode embedded video clips into frame
//! tensors.
//!
//! `vidset` reads archives of grouped files — the webdataset convention,
//! where consecutive tar members `sample000.mp4`, `sample000.info.json`, …
//! form one record — and exposes them as a lazy sequence of [`Sample`]
//! values. Field payloads are decoded by extension through a
//! [`DecoderRegistry`]; `mp4` payloads are materialized into a scratch file
//! and decoded with FFmpeg (via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate) into
//! [`ndarray`] tensors: visual frames as `[frames, height, width, 3]` RGB
//! bytes and audio as `[channels, samples]` floats.
//!
//! ## Quick Start
//!
//! ```no_run
//! use vidset::TarDataset;
//!
//! let dataset = TarDataset::open("testoutput.tar")?;
//! let mut reader = dataset.reader()?;
//! for sample in reader.samples()?.take(3) {
//!     let sample = sample?;
//!     println!("---");
//!     println!("{:?}", sample.field_names());
//!     let clip = sample.video("mp4")?;
//!     println!("{:?} {:?}", clip.frames.shape(), clip.audio.shape());
//!     println!("{}", clip.metadata);
//! }
//! # Ok::<(), vidset::VidsetError>(())
//! ```
//!
//! ### Decode a standalone payload
//!
//! ```no_run
//! let bytes = std::fs::read("clip.mp4")?;
//! let clip = vidset::decode_mp4(&bytes)?;
//! assert!(clip.frame_count() >= 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Features
//!
//! - **Lazy iteration** — samples are read, grouped, and decoded one at a
//!   time as the consumer pulls them; a fresh pass can be opened at any
//!   time via [`TarDataset::reader`]
//! - **Extension-dispatched decoding** — text, class indices, JSON, and
//!   images decode out of the box; unknown extensions stay raw; overrides
//!   via [`DecoderRegistry::with_override`]
//! - **Clip decoding** — one demux pass per clip produces frame and audio
//!   tensors plus a [`ClipMetadata`] record (frame rate, sample rate,
//!   duration)
//! - **Scoped scratch space** — each clip decode writes to a temporary
//!   directory that is removed before the call returns, on error paths too
//! - **Local and remote shards** — archives open from a path or stream
//!   from an `http`/`https` URL
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system; see the
//! `ffmpeg-next` documentation for platform-specific instructions.

pub mod clip;
pub mod dataset;
pub mod decode;
pub mod error;
pub mod ffmpeg;
pub mod metadata;
pub mod peek;
pub mod sample;
pub mod video;

pub use clip::VideoClip;
pub use dataset::{DatasetReader, SampleIter, TarDataset};
pub use decode::{DecoderRegistry, FieldDecoder};
pub use error::VidsetError;
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use metadata::ClipMetadata;
pub use peek::peek;
pub use sample::{FieldValue, Sample};
pub use video::{decode_mp4, decode_mp4_in, read_video};
