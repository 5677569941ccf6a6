//! Encoder producing SIRI documents the decoder reads back.

use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::EncodeError;
use crate::format::Format;
use crate::model::Siri;
use crate::parser::ROOT_NAME;
use crate::xml;

/// Settings for writing documents; persisted by [`CacheClient`](crate::cache::CacheClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    pub root_name: String,
    pub pretty: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            root_name: ROOT_NAME.to_string(),
            pretty: true,
        }
    }
}

pub fn write_siri(siri: &Siri, format: Format) -> Result<Vec<u8>, EncodeError> {
    write_siri_with(siri, format, &EncoderConfig::default())
}

/// Encodes `siri` wrapped in its root, omitting absent values. Lists are written
/// as JSON arrays or as repeated XML siblings.
pub fn write_siri_with(
    siri: &Siri,
    format: Format,
    config: &EncoderConfig,
) -> Result<Vec<u8>, EncodeError> {
    let value = serde_json::to_value(siri)?;
    match format {
        Format::Json => {
            let mut wrapper = Map::new();
            wrapper.insert(config.root_name.clone(), value);
            let document = Value::Object(wrapper);
            if config.pretty {
                Ok(serde_json::to_vec_pretty(&document)?)
            } else {
                Ok(serde_json::to_vec(&document)?)
            }
        }
        Format::Xml => xml::write_document(&value, &config.root_name, config.pretty),
    }
}

pub fn compress(bytes: &[u8]) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}
