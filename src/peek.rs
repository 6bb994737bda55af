//! Sample inspection.
//!
//! [`peek`] is the diagnostic consumer loop: it pulls the first few samples
//! of a dataset and writes, for each, a separator, the field names, the
//! decoded tensor shapes, and the clip metadata. Output goes to any
//! [`io::Write`] so the print contract is testable; the `vidset-peek`
//! binary points it at stdout.

use std::io::Write;

use crate::{dataset::TarDataset, error::VidsetError};

/// Inspect the first `count` samples of `dataset`.
///
/// For each sample, writes a `---` separator line, the sorted field names,
/// the `[frames, height, width, channels]` / `[channels, samples]` shapes
/// of the clip stored under `field`, and the clip's metadata record. Stops
/// after `count` samples or at the end of the archive, whichever comes
/// first — a short archive is not an error. Returns the number of samples
/// written.
///
/// There is no per-sample isolation: the first sample that fails to decode
/// (or lacks `field`) aborts the loop with its error, after the blocks for
/// the preceding samples have been written.
///
/// # Errors
///
/// - [`VidsetError::ArchiveOpen`] / [`VidsetError::EntryRead`] from the
///   archive pass.
/// - [`VidsetError::MissingField`] if a sample has no `field`.
/// - Decode errors from the field's payload.
/// - [`VidsetError::IoError`] if the writer fails.
///
/// # Example
///
/// ```no_run
/// use vidset::TarDataset;
///
/// let dataset = TarDataset::open("testoutput.tar")?;
/// let written = vidset::peek(&dataset, "mp4", 3, &mut std::io::stdout())?;
/// eprintln!("inspected {written} sample(s)");
/// # Ok::<(), vidset::VidsetError>(())
/// ```
pub fn peek<W: Write>(
    dataset: &TarDataset,
    field: &str,
    count: usize,
    out: &mut W,
) -> Result<usize, VidsetError> {
    log::info!("Peeking at the first {count} sample(s), video field {field:?}");

    let mut reader = dataset.reader()?;
    let mut written = 0usize;
    for sample in reader.samples()?.take(count) {
        let sample = sample?;
        writeln!(out, "---")?;
        writeln!(out, "{:?}", sample.field_names())?;

        let clip = sample.video(field)?;
        writeln!(out, "{:?} {:?}", clip.frames.shape(), clip.audio.shape())?;
        writeln!(out, "{}", clip.metadata)?;
        written += 1;
    }

    log::debug!("Wrote {written} sample block(s)");
    Ok(written)
}
