//! Tar-backed dataset iteration.
//!
//! [`TarDataset`] describes an archive of grouped files: consecutive tar
//! members whose basenames share a stem (`sample000.mp4`,
//! `sample000.info.json`, …) form one [`Sample`]. Iteration is lazy,
//! forward-only, and pull-based — each call to `next()` reads exactly the
//! members of one group and decodes their payloads through the registered
//! [`DecoderRegistry`](crate::DecoderRegistry).
//!
//! A dataset is restartable from scratch: every call to
//! [`TarDataset::reader`] opens a fresh pass over the archive.
//!
//! # Example
//!
//! ```no_run
//! use vidset::TarDataset;
//!
//! let dataset = TarDataset::open("testoutput.tar")?;
//! let mut reader = dataset.reader()?;
//! for sample in reader.samples()?.take(3) {
//!     let sample = sample?;
//!     println!("{}: {:?}", sample.key(), sample.field_names());
//! }
//! # Ok::<(), vidset::VidsetError>(())
//! ```

use std::{
    collections::BTreeMap,
    fs::File,
    io::Read,
    path::PathBuf,
};

use tar::{Archive, Entries};

use crate::{decode::DecoderRegistry, error::VidsetError, sample::Sample};

/// Where the archive bytes come from.
#[derive(Debug, Clone)]
enum Location {
    /// A tar file on the local filesystem.
    Path(PathBuf),
    /// An `http`/`https` URL streaming a tar body.
    Url(String),
}

/// A tar-backed dataset of grouped samples.
///
/// Construction validates the location once; the archive itself is opened
/// lazily, on every [`reader`](TarDataset::reader) call.
#[derive(Debug, Clone)]
#[must_use]
pub struct TarDataset {
    location: Location,
    registry: DecoderRegistry,
}

impl TarDataset {
    /// Describe a dataset at a local path or `http`/`https` URL.
    ///
    /// The location is validated here — a local path must name an existing
    /// file — but no archive data is read until iteration starts.
    ///
    /// # Errors
    ///
    /// Returns [`VidsetError::ArchiveOpen`] if a local path does not exist.
    pub fn open(location: impl AsRef<str>) -> Result<Self, VidsetError> {
        let location = location.as_ref();
        let location = if location.starts_with("http://") || location.starts_with("https://") {
            Location::Url(location.to_string())
        } else {
            let path = PathBuf::from(location);
            if !path.is_file() {
                return Err(VidsetError::ArchiveOpen {
                    location: location.to_string(),
                    reason: "no such file".to_string(),
                });
            }
            Location::Path(path)
        };

        Ok(Self {
            location,
            registry: DecoderRegistry::new(),
        })
    }

    /// Replace the decode table used for this dataset's fields.
    pub fn with_registry(mut self, registry: DecoderRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Open one forward pass over the archive.
    ///
    /// Local paths are read from disk; URLs are streamed over HTTP without
    /// buffering the whole archive.
    ///
    /// # Errors
    ///
    /// Returns [`VidsetError::ArchiveOpen`] if the file cannot be opened or
    /// the HTTP request fails (including non-success status codes).
    pub fn reader(&self) -> Result<DatasetReader, VidsetError> {
        let source: Box<dyn Read> = match &self.location {
            Location::Path(path) => {
                log::debug!("Opening archive: {}", path.display());
                let file = File::open(path).map_err(|error| VidsetError::ArchiveOpen {
                    location: path.display().to_string(),
                    reason: error.to_string(),
                })?;
                Box::new(file)
            }
            Location::Url(url) => {
                log::debug!("Fetching archive: {url}");
                let response = reqwest::blocking::get(url)
                    .and_then(reqwest::blocking::Response::error_for_status)
                    .map_err(|error| VidsetError::ArchiveOpen {
                        location: url.clone(),
                        reason: error.to_string(),
                    })?;
                Box::new(response)
            }
        };

        Ok(DatasetReader {
            archive: Archive::new(source),
            registry: self.registry.clone(),
        })
    }
}

/// One forward pass over an archive.
///
/// Obtained via [`TarDataset::reader`]. Holds the demuxed tar stream;
/// [`samples`](DatasetReader::samples) borrows it mutably for the duration
/// of iteration, so one pass yields one sequence.
pub struct DatasetReader {
    archive: Archive<Box<dyn Read>>,
    registry: DecoderRegistry,
}

impl DatasetReader {
    /// Iterate the samples of this pass.
    ///
    /// # Errors
    ///
    /// Returns [`VidsetError::EntryRead`] if the archive's member table
    /// cannot be read at all.
    pub fn samples(&mut self) -> Result<SampleIter<'_>, VidsetError> {
        let registry = self.registry.clone();
        let entries = self
            .archive
            .entries()
            .map_err(|error| VidsetError::EntryRead(error.to_string()))?;
        Ok(SampleIter {
            entries,
            registry,
            pending: None,
            done: false,
        })
    }
}

/// Raw members of one sample group, before field decoding.
struct PendingGroup {
    key: String,
    fields: Vec<(String, Vec<u8>)>,
}

/// A lazy iterator over decoded samples.
///
/// Members are read from the tar stream one at a time; a sample is decoded
/// and yielded when the stream moves past its group. After the first `Err`
/// the iterator is fused — there is no per-sample error isolation.
pub struct SampleIter<'a> {
    entries: Entries<'a, Box<dyn Read>>,
    registry: DecoderRegistry,
    pending: Option<PendingGroup>,
    done: bool,
}

impl SampleIter<'_> {
    /// Decode a completed group into a [`Sample`].
    fn decode_group(&self, group: PendingGroup) -> Result<Sample, VidsetError> {
        let mut fields = BTreeMap::new();
        for (field, bytes) in group.fields {
            let extension = field.rsplit('.').next().unwrap_or(field.as_str());
            let decoder = self.registry.decoder_for(extension);
            let value = decoder.decode(&field, bytes)?;
            if let Some(previous) = fields.insert(field.clone(), value) {
                log::warn!(
                    "Sample {} carries duplicate field {field:?}; discarding earlier {} value",
                    group.key,
                    previous.kind(),
                );
            }
        }
        log::trace!("Decoded sample {}", group.key);
        Ok(Sample::new(group.key, fields))
    }

    /// Pull the next file member, returning its split name and payload.
    ///
    /// Skips non-file members and members whose names don't follow the
    /// `<stem>.<field>` convention.
    fn next_member(&mut self) -> Option<Result<(String, String, Vec<u8>), VidsetError>> {
        loop {
            let mut entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(error) => return Some(Err(VidsetError::EntryRead(error.to_string()))),
            };

            if !entry.header().entry_type().is_file() {
                continue;
            }

            let name = match entry.path() {
                Ok(path) => path.to_string_lossy().into_owned(),
                Err(error) => return Some(Err(VidsetError::EntryRead(error.to_string()))),
            };

            let Some((key, field)) = split_member_name(&name) else {
                log::warn!("Skipping archive member with unconventional name: {name}");
                continue;
            };

            let mut bytes = Vec::with_capacity(entry.size() as usize);
            if let Err(error) = entry.read_to_end(&mut bytes) {
                return Some(Err(VidsetError::EntryRead(format!(
                    "Failed to read member {name}: {error}"
                ))));
            }

            return Some(Ok((key, field, bytes)));
        }
    }
}

impl Iterator for SampleIter<'_> {
    type Item = Result<Sample, VidsetError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            match self.next_member() {
                Some(Ok((key, field, bytes))) => {
                    if let Some(group) = self.pending.as_mut() {
                        if group.key == key {
                            group.fields.push((field, bytes));
                            continue;
                        }
                    }

                    // A new key closes the previous group, if any.
                    let finished = self.pending.replace(PendingGroup {
                        key,
                        fields: vec![(field, bytes)],
                    });
                    if let Some(group) = finished {
                        match self.decode_group(group) {
                            Ok(sample) => return Some(Ok(sample)),
                            Err(error) => {
                                self.done = true;
                                return Some(Err(error));
                            }
                        }
                    }
                }
                Some(Err(error)) => {
                    self.done = true;
                    return Some(Err(error));
                }
                None => {
                    self.done = true;
                    let group = self.pending.take()?;
                    return Some(self.decode_group(group));
                }
            }
        }
    }
}

/// Split a member path into `(sample key, field name)`.
///
/// The key is the path up to the first dot of the basename; the field is
/// everything after it, so `shard/sample000.info.json` becomes
/// `("shard/sample000", "info.json")`. Returns `None` for names with no
/// usable stem/field split (dotless, hidden, or trailing-dot names).
fn split_member_name(name: &str) -> Option<(String, String)> {
    let (directory, basename) = match name.rfind('/') {
        Some(index) => name.split_at(index + 1),
        None => ("", name),
    };

    let dot = basename.find('.')?;
    if dot == 0 || dot + 1 == basename.len() {
        return None;
    }

    let key = format!("{directory}{}", &basename[..dot]);
    let field = basename[dot + 1..].to_string();
    Some((key, field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_plain_member() {
        assert_eq!(
            split_member_name("sample000.mp4"),
            Some(("sample000".to_string(), "mp4".to_string())),
        );
    }

    #[test]
    fn split_keeps_directory_in_key() {
        assert_eq!(
            split_member_name("shard-03/sample000.info.json"),
            Some(("shard-03/sample000".to_string(), "info.json".to_string())),
        );
    }

    #[test]
    fn split_rejects_dotless_and_hidden_names() {
        assert_eq!(split_member_name("README"), None);
        assert_eq!(split_member_name(".hidden"), None);
        assert_eq!(split_member_name("dir/.hidden"), None);
        assert_eq!(split_member_name("trailing."), None);
    }

    #[test]
    fn open_missing_archive_is_an_error() {
        let error = TarDataset::open("this_archive_does_not_exist.tar").unwrap_err();
        assert!(
            error.to_string().contains("Failed to open archive"),
            "unexpected error: {error}",
        );
    }

    #[test]
    fn open_accepts_urls_without_touching_the_network() {
        // URL validation is syntactic; the fetch happens in reader().
        assert!(TarDataset::open("https://example.com/shard-000000.tar").is_ok());
    }
}
