//! Shared fixture helpers.
//!
//! Fixtures are synthesized at test time: clips are encoded with the
//! ffmpeg-next MPEG4 encoder and wrapped into tar archives with the same
//! member naming the library consumes. Nothing is checked in.

#![allow(dead_code)]

use std::{fs::File, path::Path};

use ffmpeg_next::{
    Packet, Rational,
    codec::{self, context::Context as CodecContext},
    format::{self, Pixel},
    frame::Video as VideoFrame,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};

/// Encode a small video-only MP4 at `path`.
///
/// Frames are flat gray levels stepping per frame, enough for the decoder
/// to produce deterministic dimensions and counts.
pub fn encode_clip(path: &Path, frame_count: usize, width: u32, height: u32, fps: i32) {
    ffmpeg_next::init().expect("FFmpeg init failed");

    let mut output = format::output(&path).expect("Failed to open fixture output");
    let needs_global_header = output
        .format()
        .flags()
        .contains(format::Flags::GLOBAL_HEADER);

    let codec = ffmpeg_next::encoder::find(codec::Id::MPEG4).expect("MPEG4 encoder unavailable");
    let mut stream = output.add_stream(codec).expect("Failed to add stream");
    let stream_index = stream.index();

    let mut encoder = CodecContext::new_with_codec(codec)
        .encoder()
        .video()
        .expect("Failed to create video encoder");
    encoder.set_width(width);
    encoder.set_height(height);
    encoder.set_format(Pixel::YUV420P);
    encoder.set_time_base(Rational::new(1, fps));
    encoder.set_frame_rate(Some(Rational::new(fps, 1)));
    if needs_global_header {
        encoder.set_flags(codec::Flags::GLOBAL_HEADER);
    }

    let opened = encoder
        .open_as(codec)
        .expect("Failed to open encoder");
    stream.set_parameters(&opened);
    let mut encoder = opened;

    output.write_header().expect("Failed to write header");
    let output_time_base = output
        .stream(stream_index)
        .expect("Encoder stream vanished")
        .time_base();

    let mut scaler = ScalingContext::get(
        Pixel::RGB24,
        width,
        height,
        Pixel::YUV420P,
        width,
        height,
        ScalingFlags::BILINEAR,
    )
    .expect("Failed to create scaler");

    for index in 0..frame_count {
        let mut rgb_frame = VideoFrame::new(Pixel::RGB24, width, height);
        let stride = rgb_frame.stride(0);
        let data = rgb_frame.data_mut(0);
        let level = ((index * 40) % 256) as u8;
        for row in 0..height as usize {
            for column in 0..(width as usize) * 3 {
                data[row * stride + column] = level;
            }
        }

        let mut yuv_frame = VideoFrame::empty();
        scaler
            .run(&rgb_frame, &mut yuv_frame)
            .expect("Failed to convert frame");
        yuv_frame.set_pts(Some(index as i64));

        encoder.send_frame(&yuv_frame).expect("send_frame failed");
        write_packets(&mut encoder, &mut output, stream_index, fps, output_time_base);
    }

    encoder.send_eof().expect("send_eof failed");
    write_packets(&mut encoder, &mut output, stream_index, fps, output_time_base);
    output.write_trailer().expect("Failed to write trailer");
}

fn write_packets(
    encoder: &mut ffmpeg_next::encoder::video::Encoder,
    output: &mut format::context::Output,
    stream_index: usize,
    fps: i32,
    output_time_base: Rational,
) {
    let mut packet = Packet::empty();
    while encoder.receive_packet(&mut packet).is_ok() {
        packet.set_stream(stream_index);
        packet.rescale_ts(Rational::new(1, fps), output_time_base);
        packet
            .write_interleaved(output)
            .expect("Failed to write packet");
    }
}

/// Encode a clip and return its bytes.
pub fn clip_bytes(frame_count: usize, width: u32, height: u32, fps: i32) -> Vec<u8> {
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    let clip_path = scratch.path().join("fixture.mp4");
    encode_clip(&clip_path, frame_count, width, height, fps);
    std::fs::read(&clip_path).expect("Failed to read encoded clip")
}

/// Write a tar archive at `path` with the given members, in order.
pub fn write_archive(path: &Path, members: &[(&str, &[u8])]) {
    let file = File::create(path).expect("Failed to create archive");
    let mut builder = tar::Builder::new(file);

    for (name, bytes) in members {
        let mut header = tar::Header::new_gnu();
        header.set_size(bytes.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, *bytes)
            .expect("Failed to append member");
    }

    builder.finish().expect("Failed to finish archive");
}

/// Write an archive of `keys.len()` samples, each with `mp4`, `info.json`,
/// and `txt` fields. One encoded clip is shared across all samples.
pub fn video_archive(path: &Path, keys: &[&str]) {
    let clip = clip_bytes(5, 160, 120, 30);
    let mut members: Vec<(String, Vec<u8>)> = Vec::new();
    for key in keys {
        members.push((format!("{key}.mp4"), clip.clone()));
        members.push((
            format!("{key}.info.json"),
            format!("{{\"key\": \"{key}\"}}").into_bytes(),
        ));
        members.push((format!("{key}.txt"), format!("caption for {key}").into_bytes()));
    }

    let borrowed: Vec<(&str, &[u8])> = members
        .iter()
        .map(|(name, bytes)| (name.as_str(), bytes.as_slice()))
        .collect();
    write_archive(path, &borrowed);
}
