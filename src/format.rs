//! Document format detection from file names.

use std::ffi::OsStr;
use std::path::Path;

use strum_macros::Display;

use crate::error::FormatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Format {
    Json,
    Xml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
}

impl Format {
    /// Upper-case name used in progress messages.
    pub fn label(self) -> &'static str {
        match self {
            Format::Json => "JSON",
            Format::Xml => "XML",
        }
    }

    /// Matches `json` or `xml`, ignoring case.
    pub fn from_extension(extension: &str) -> Result<Self, FormatError> {
        if extension.eq_ignore_ascii_case("json") {
            Ok(Format::Json)
        } else if extension.eq_ignore_ascii_case("xml") {
            Ok(Format::Xml)
        } else {
            Err(FormatError::Unsupported(extension.to_string()))
        }
    }

    /// Resolves the format of `path`, looking through a trailing `.gz`.
    pub fn detect(path: &Path) -> Result<(Self, Compression), FormatError> {
        let extension = extension_of(path)?;

        if !extension.eq_ignore_ascii_case("gz") {
            return Ok((Self::from_extension(extension)?, Compression::None));
        }

        let inner = path.file_stem().map(Path::new).unwrap_or(path);
        let extension = extension_of(inner)?;
        Ok((Self::from_extension(extension)?, Compression::Gzip))
    }
}

fn extension_of(path: &Path) -> Result<&str, FormatError> {
    path.extension()
        .and_then(OsStr::to_str)
        .ok_or_else(|| FormatError::NoExtension(path.to_path_buf()))
}
