//! Dataset sample types.
//!
//! A [`Sample`] is one record of the dataset: the group of archive members
//! sharing a key, with each member's suffix becoming a named field. Fields
//! hold [`FieldValue`]s produced by the decode table in
//! [`DecoderRegistry`](crate::DecoderRegistry).

use std::collections::BTreeMap;

use image::DynamicImage;

use crate::{clip::VideoClip, error::VidsetError};

/// A decoded field payload.
///
/// One variant per decode strategy. Fields whose extension has no
/// registered strategy stay [`Raw`](FieldValue::Raw).
#[derive(Debug, Clone)]
pub enum FieldValue {
    /// Undecoded bytes.
    Raw(Vec<u8>),
    /// UTF-8 text (`txt`, `text`).
    Text(String),
    /// A class index or similar small integer (`cls`, `index`).
    Integer(i64),
    /// A JSON document (`json`).
    Json(serde_json::Value),
    /// A decoded raster image (`png`, `jpg`, …).
    Image(DynamicImage),
    /// A decoded video clip (`mp4` by default).
    Video(Box<VideoClip>),
}

impl FieldValue {
    /// Short name of the value's kind, for logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Raw(_) => "raw",
            FieldValue::Text(_) => "text",
            FieldValue::Integer(_) => "integer",
            FieldValue::Json(_) => "json",
            FieldValue::Image(_) => "image",
            FieldValue::Video(_) => "video",
        }
    }
}

/// One dataset record.
///
/// Samples are yielded by value from
/// [`SampleIter`](crate::SampleIter) and carry no references back into the
/// archive; dropping a sample drops everything decoded for it.
#[derive(Debug, Clone)]
#[must_use]
pub struct Sample {
    key: String,
    fields: BTreeMap<String, FieldValue>,
}

impl Sample {
    pub(crate) fn new(key: String, fields: BTreeMap<String, FieldValue>) -> Self {
        Self { key, fields }
    }

    /// The sample key: the member path up to the first dot of its basename.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Field names present on this sample, in sorted order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    /// Look up a field by name.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Borrow the decoded clip stored under `field`.
    ///
    /// # Errors
    ///
    /// - [`VidsetError::MissingField`] if the sample has no such field.
    /// - [`VidsetError::FieldDecodeError`] if the field exists but was not
    ///   decoded as video (no override registered for its extension).
    pub fn video(&self, field: &str) -> Result<&VideoClip, VidsetError> {
        match self.fields.get(field) {
            Some(FieldValue::Video(clip)) => Ok(clip),
            Some(other) => Err(VidsetError::FieldDecodeError {
                field: field.to_string(),
                reason: format!("field holds a {} value, not a video clip", other.kind()),
            }),
            None => Err(VidsetError::MissingField {
                sample: self.key.clone(),
                field: field.to_string(),
            }),
        }
    }

    /// Consume the sample, returning its fields.
    pub fn into_fields(self) -> BTreeMap<String, FieldValue> {
        self.fields
    }
}
