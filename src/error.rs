use std::path::PathBuf;

use thiserror::Error;

/// A document could not be turned into a [`Siri`](crate::model::Siri) value.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("JSON syntax error at line {line}, column {column}: {message}")]
    Json {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("XML syntax error: {0}")]
    Xml(String),
    #[error("Missing root element \"{0}\"")]
    MissingRoot(String),
    #[error("Document does not match the SIRI model at {path}: {message}")]
    Mapping { path: String, message: String },
    #[error("Failed to decompress input: {0}")]
    Decompress(#[from] std::io::Error),
}

impl DecodeError {
    pub(crate) fn json(err: serde_json::Error) -> Self {
        let (line, column) = (err.line(), err.column());
        let message = err.to_string();
        let location = format!(" at line {line} column {column}");
        DecodeError::Json {
            line,
            column,
            message: message
                .strip_suffix(&location)
                .unwrap_or(&message)
                .to_string(),
        }
    }

    pub(crate) fn mapping(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        DecodeError::Mapping {
            path: err.path().to_string(),
            message: err.into_inner().to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to write XML: {0}")]
    Xml(String),
    #[error("Failed to compress output: {0}")]
    Compress(#[from] std::io::Error),
}

/// The input path does not name a supported document format.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Unsupported file extension \"{0}\", expected json or xml")]
    Unsupported(String),
    #[error("File {0} has no extension, expected .json or .xml")]
    NoExtension(PathBuf),
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to write cache: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("Failed to read cache: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}
