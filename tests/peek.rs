//! Consumer loop integration tests.
//!
//! `peek` writes to any `io::Write`, so these tests capture the output in
//! a buffer and count separator blocks.

mod common;

use vidset::{TarDataset, peek};

fn separator_count(output: &[u8]) -> usize {
    String::from_utf8_lossy(output)
        .lines()
        .filter(|line| *line == "---")
        .count()
}

#[test]
fn prints_exactly_three_blocks_for_a_larger_archive() {
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    let archive = scratch.path().join("shard.tar");
    common::video_archive(
        &archive,
        &["sample000", "sample001", "sample002", "sample003"],
    );

    let dataset = TarDataset::open(archive.to_string_lossy()).expect("Failed to open dataset");
    let mut output = Vec::new();
    let written = peek(&dataset, "mp4", 3, &mut output).expect("peek failed");

    assert_eq!(written, 3);
    assert_eq!(separator_count(&output), 3);
}

#[test]
fn short_archive_prints_fewer_blocks_and_succeeds() {
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    let archive = scratch.path().join("shard.tar");
    common::video_archive(&archive, &["sample000", "sample001"]);

    let dataset = TarDataset::open(archive.to_string_lossy()).expect("Failed to open dataset");
    let mut output = Vec::new();
    let written = peek(&dataset, "mp4", 3, &mut output).expect("peek failed");

    assert_eq!(written, 2);
    assert_eq!(separator_count(&output), 2);
}

#[test]
fn block_contents_include_fields_shapes_and_metadata() {
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    let archive = scratch.path().join("shard.tar");
    common::video_archive(&archive, &["sample000"]);

    let dataset = TarDataset::open(archive.to_string_lossy()).expect("Failed to open dataset");
    let mut output = Vec::new();
    peek(&dataset, "mp4", 3, &mut output).expect("peek failed");

    let text = String::from_utf8(output).expect("Output should be UTF-8");
    assert!(text.contains("\"info.json\""), "missing field list: {text}");
    assert!(text.contains("[5, 120, 160, 3]"), "missing frame shape: {text}");
    assert!(text.contains("[0, 0]"), "missing audio shape: {text}");
    assert!(text.contains("video_fps"), "missing metadata record: {text}");
}

#[test]
fn corrupt_payload_stops_the_loop_without_isolation() {
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    let archive = scratch.path().join("shard.tar");
    let clip = common::clip_bytes(5, 160, 120, 30);
    common::write_archive(
        &archive,
        &[
            ("sample000.mp4", clip.as_slice()),
            ("sample001.mp4", b"corrupted payload".as_slice()),
            ("sample002.mp4", clip.as_slice()),
        ],
    );

    let dataset = TarDataset::open(archive.to_string_lossy()).expect("Failed to open dataset");
    let mut output = Vec::new();
    let result = peek(&dataset, "mp4", 3, &mut output);

    assert!(result.is_err(), "Corrupt payload should abort the loop");
    // The first sample printed; the corrupt one aborted before its block.
    assert_eq!(separator_count(&output), 1);
}

#[test]
fn missing_video_field_is_an_explicit_error() {
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    let archive = scratch.path().join("shard.tar");
    common::write_archive(&archive, &[("sample000.txt", b"caption only".as_slice())]);

    let dataset = TarDataset::open(archive.to_string_lossy()).expect("Failed to open dataset");
    let mut output = Vec::new();
    let error = peek(&dataset, "mp4", 3, &mut output).unwrap_err();

    assert!(
        error.to_string().contains("has no field"),
        "unexpected error: {error}",
    );
}
