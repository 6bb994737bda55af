//! Field decoding strategies.
//!
//! Archive members are decoded by extension. [`DecoderRegistry`] is the
//! dispatch table mapping a field's final extension to a [`FieldDecoder`]
//! strategy; the default table covers the conventional dataset extensions
//! (text, class indices, JSON, images) and routes `mp4` payloads through
//! the clip decoder. Unknown extensions fall back to raw bytes.
//!
//! # Example
//!
//! ```
//! use vidset::{DecoderRegistry, FieldDecoder};
//!
//! // Treat `webm` payloads as video too, and keep `json` fields raw.
//! let registry = DecoderRegistry::new()
//!     .with_override("webm", FieldDecoder::Video)
//!     .with_override("json", FieldDecoder::Raw);
//! assert_eq!(registry.decoder_for("WEBM"), FieldDecoder::Video);
//! ```

use std::collections::HashMap;

use crate::{error::VidsetError, sample::FieldValue, video::decode_mp4};

/// A decode strategy for one field payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDecoder {
    /// Keep the payload as raw bytes.
    Raw,
    /// Decode as UTF-8 text.
    Text,
    /// Parse as a decimal integer (class index).
    Integer,
    /// Parse as a JSON document.
    Json,
    /// Decode as a raster image.
    Image,
    /// Decode as a video clip via the scratch-file path.
    Video,
}

impl FieldDecoder {
    /// Apply this strategy to a field payload.
    ///
    /// # Errors
    ///
    /// Returns [`VidsetError::FieldDecodeError`] when the payload does not
    /// match the strategy (bad UTF-8, unparsable integer or JSON, broken
    /// image), or the clip decoder's error for video payloads.
    pub fn decode(self, field: &str, bytes: Vec<u8>) -> Result<FieldValue, VidsetError> {
        match self {
            FieldDecoder::Raw => Ok(FieldValue::Raw(bytes)),
            FieldDecoder::Text => String::from_utf8(bytes)
                .map(FieldValue::Text)
                .map_err(|error| VidsetError::FieldDecodeError {
                    field: field.to_string(),
                    reason: error.to_string(),
                }),
            FieldDecoder::Integer => {
                let text =
                    std::str::from_utf8(&bytes).map_err(|error| VidsetError::FieldDecodeError {
                        field: field.to_string(),
                        reason: error.to_string(),
                    })?;
                text.trim()
                    .parse::<i64>()
                    .map(FieldValue::Integer)
                    .map_err(|error| VidsetError::FieldDecodeError {
                        field: field.to_string(),
                        reason: error.to_string(),
                    })
            }
            FieldDecoder::Json => serde_json::from_slice(&bytes)
                .map(FieldValue::Json)
                .map_err(|error| VidsetError::FieldDecodeError {
                    field: field.to_string(),
                    reason: error.to_string(),
                }),
            FieldDecoder::Image => image::load_from_memory(&bytes)
                .map(FieldValue::Image)
                .map_err(|error| VidsetError::FieldDecodeError {
                    field: field.to_string(),
                    reason: error.to_string(),
                }),
            FieldDecoder::Video => {
                decode_mp4(&bytes).map(|clip| FieldValue::Video(Box::new(clip)))
            }
        }
    }
}

/// Extension → strategy dispatch table.
///
/// Lookups are case-insensitive and match the **final** extension of a
/// field name, so `info.json` dispatches on `json`.
#[derive(Debug, Clone)]
pub struct DecoderRegistry {
    table: HashMap<String, FieldDecoder>,
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DecoderRegistry {
    /// Build the default table.
    ///
    /// Covers `txt`/`text` → [`FieldDecoder::Text`], `cls`/`cls2`/`index` →
    /// [`FieldDecoder::Integer`], `json` → [`FieldDecoder::Json`], the
    /// common raster extensions → [`FieldDecoder::Image`], and `mp4` →
    /// [`FieldDecoder::Video`].
    pub fn new() -> Self {
        let mut table = HashMap::new();
        for extension in ["txt", "text"] {
            table.insert(extension.to_string(), FieldDecoder::Text);
        }
        for extension in ["cls", "cls2", "index"] {
            table.insert(extension.to_string(), FieldDecoder::Integer);
        }
        table.insert("json".to_string(), FieldDecoder::Json);
        for extension in ["png", "jpg", "jpeg", "ppm", "bmp"] {
            table.insert(extension.to_string(), FieldDecoder::Image);
        }
        table.insert("mp4".to_string(), FieldDecoder::Video);
        Self { table }
    }

    /// Replace or add the strategy for `extension`.
    #[must_use]
    pub fn with_override(mut self, extension: &str, decoder: FieldDecoder) -> Self {
        self.table.insert(extension.to_ascii_lowercase(), decoder);
        self
    }

    /// Resolve the strategy for a field's final extension.
    ///
    /// Unregistered extensions resolve to [`FieldDecoder::Raw`].
    pub fn decoder_for(&self, extension: &str) -> FieldDecoder {
        self.table
            .get(&extension.to_ascii_lowercase())
            .copied()
            .unwrap_or(FieldDecoder::Raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_dispatch() {
        let registry = DecoderRegistry::new();
        assert_eq!(registry.decoder_for("txt"), FieldDecoder::Text);
        assert_eq!(registry.decoder_for("json"), FieldDecoder::Json);
        assert_eq!(registry.decoder_for("cls"), FieldDecoder::Integer);
        assert_eq!(registry.decoder_for("jpeg"), FieldDecoder::Image);
        assert_eq!(registry.decoder_for("mp4"), FieldDecoder::Video);
        assert_eq!(registry.decoder_for("bin"), FieldDecoder::Raw);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = DecoderRegistry::new();
        assert_eq!(registry.decoder_for("MP4"), FieldDecoder::Video);
        assert_eq!(registry.decoder_for("Txt"), FieldDecoder::Text);
    }

    #[test]
    fn override_replaces_builtin() {
        let registry = DecoderRegistry::new().with_override("json", FieldDecoder::Raw);
        assert_eq!(registry.decoder_for("json"), FieldDecoder::Raw);
    }

    #[test]
    fn text_decode_round_trip() {
        let value = FieldDecoder::Text
            .decode("txt", b"hello world".to_vec())
            .expect("Text decode failed");
        assert!(matches!(value, FieldValue::Text(text) if text == "hello world"));
    }

    #[test]
    fn integer_decode_trims_whitespace() {
        let value = FieldDecoder::Integer
            .decode("cls", b" 42\n".to_vec())
            .expect("Integer decode failed");
        assert!(matches!(value, FieldValue::Integer(42)));
    }

    #[test]
    fn json_decode_rejects_garbage() {
        let error = FieldDecoder::Json
            .decode("json", b"{not json".to_vec())
            .unwrap_err();
        assert!(
            error.to_string().contains("json"),
            "error should name the field: {error}",
        );
    }

    #[test]
    fn integer_decode_rejects_text() {
        assert!(FieldDecoder::Integer.decode("cls", b"abc".to_vec()).is_err());
    }
}
