//! Decoder for SIRI documents encoded as JSON or XML.

use std::io::Read;

use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::DecodeError;
use crate::format::Format;
use crate::model::Siri;
use crate::xml;

/// Name of the wrapper around the root value in both formats.
pub const ROOT_NAME: &str = "Siri";

/// Settings the decoder honors; persisted by [`CacheClient`](crate::cache::CacheClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    pub root_name: String,
    /// Treat `""` as an absent value anywhere in the document.
    pub empty_string_as_null: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            root_name: ROOT_NAME.to_string(),
            empty_string_as_null: true,
        }
    }
}

/// Decodes a [`Siri`] document with the default [`DecoderConfig`].
///
/// # Errors
///
/// Returns a [`DecodeError`] if the bytes are not well-formed in `format`, lack
/// the `Siri` wrapper, or do not fit the model.
pub fn parse_siri(bytes: &[u8], format: Format) -> Result<Siri, DecodeError> {
    parse_siri_with(bytes, format, &DecoderConfig::default())
}

/// Decodes a [`Siri`] document.
///
/// Both formats are first read into a generic value tree, unwrapped from their
/// root and then mapped onto the model, so either the whole document decodes or
/// nothing is returned.
#[tracing::instrument(skip(bytes, config), fields(bytes = bytes.len()))]
pub fn parse_siri_with(
    bytes: &[u8],
    format: Format,
    config: &DecoderConfig,
) -> Result<Siri, DecodeError> {
    let mut root = match format {
        Format::Json => {
            let document = serde_json::from_slice(bytes).map_err(DecodeError::json)?;
            unwrap_root(document, &config.root_name)?
        }
        Format::Xml => xml::read_document(bytes, &config.root_name)?,
    };

    if config.empty_string_as_null {
        nullify_empty_strings(&mut root);
    }

    let siri: Siri = serde_path_to_error::deserialize(root).map_err(DecodeError::mapping)?;
    debug!("Document decoded");
    Ok(siri)
}

/// Inflates a gzip-compressed document.
pub fn decompress(bytes: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut decoder = GzDecoder::new(bytes);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

fn unwrap_root(document: Value, root_name: &str) -> Result<Value, DecodeError> {
    match document {
        Value::Object(mut map) => map
            .remove(root_name)
            .ok_or_else(|| DecodeError::MissingRoot(root_name.to_string())),
        _ => Err(DecodeError::MissingRoot(root_name.to_string())),
    }
}

fn nullify_empty_strings(value: &mut Value) {
    if value.as_str().is_some_and(str::is_empty) {
        *value = Value::Null;
        return;
    }
    match value {
        Value::Array(items) => items.iter_mut().for_each(nullify_empty_strings),
        Value::Object(map) => map.values_mut().for_each(nullify_empty_strings),
        _ => {}
    }
}
