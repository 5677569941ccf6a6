//! CLI entry point for the SIRI parser.
//!
//! Decodes a SIRI Vehicle Monitoring, Stop Monitoring or Situation Exchange
//! document from a `.json` or `.xml` file (optionally `.gz`), prints its
//! contents and can convert it to the other format.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use siri_parser::{
    cache::{CacheClient, ObjectType},
    format::{Compression, Format},
    model::Siri,
    output::{write_json, write_report},
    parser::{DecoderConfig, decompress, parse_siri_with},
    writer::{EncoderConfig, compress, write_siri_with},
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const USAGE: &str = "Proper Usage is: siri_parser path-to-siri-file-to-parse";

#[derive(Parser)]
#[command(name = "siri_parser")]
#[command(about = "Parse and print SIRI real-time transit feeds in JSON or XML", long_about = None)]
struct Cli {
    /// Path to a .json or .xml SIRI document, optionally gzip-compressed (.gz)
    #[arg(value_name = "FILE")]
    source: Option<PathBuf>,

    /// How to print the decoded document
    #[arg(short, long, value_enum, default_value_t = OutputMode::Text)]
    output: OutputMode,

    /// Also write the decoded document to this path, in the format of its extension
    #[arg(long, value_name = "PATH")]
    convert_to: Option<PathBuf>,

    /// Directory holding cached decoder and encoder settings
    #[arg(long, env = "SIRI_CACHE_DIR", default_value = ".")]
    cache_dir: PathBuf,

    /// Neither read nor write the settings cache
    #[arg(long, default_value_t = false)]
    no_cache: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputMode {
    /// Banner-delimited `Label: value` report
    Text,
    /// Pretty-printed JSON
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/siri_parser.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("siri_parser.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let Some(source) = cli.source else {
        println!("{USAGE}");
        return Ok(());
    };

    let cache = (!cli.no_cache).then(|| CacheClient::new(&cli.cache_dir));

    let siri = match decode_file(&source, cache.as_ref()) {
        Ok(siri) => siri,
        Err(e) => {
            error!(error = %e, path = %source.display(), "Failed to decode SIRI document");
            return Err(e);
        }
    };

    let mut stdout = std::io::stdout().lock();
    match cli.output {
        OutputMode::Text => write_report(&siri, &mut stdout)?,
        OutputMode::Json => write_json(&siri, &mut stdout)?,
    }

    if let Some(target) = cli.convert_to {
        convert(&siri, &target, cache.as_ref())?;
    }

    Ok(())
}

/// Reads, decompresses and decodes a SIRI document from disk.
#[tracing::instrument(skip(cache), fields(path = %path.display()))]
fn decode_file(path: &Path, cache: Option<&CacheClient>) -> Result<Siri> {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    info!("Input file = {}", absolute.display());

    let (format, compression) = Format::detect(path)?;
    let mut bytes = std::fs::read(path)?;
    if compression == Compression::Gzip {
        bytes = decompress(&bytes)?;
        debug!(bytes = bytes.len(), "Input decompressed");
    }

    let kind = match format {
        Format::Json => ObjectType::JsonDecoder,
        Format::Xml => ObjectType::XmlDecoder,
    };
    let config: DecoderConfig = cached_or_default(cache, kind);

    info!("Parsing {}...", format.label());
    let siri = parse_siri_with(&bytes, format, &config)?;
    info!(%format, "SIRI document decoded");
    Ok(siri)
}

/// Writes `siri` to `target` in the format named by its extension.
#[tracing::instrument(skip(siri, cache), fields(target = %target.display()))]
fn convert(siri: &Siri, target: &Path, cache: Option<&CacheClient>) -> Result<()> {
    let (format, compression) = Format::detect(target)?;
    let config = match format {
        Format::Xml => cached_or_default(cache, ObjectType::XmlEncoder),
        Format::Json => EncoderConfig::default(),
    };

    let mut bytes = write_siri_with(siri, format, &config)?;
    if compression == Compression::Gzip {
        bytes = compress(&bytes)?;
    }
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(target, &bytes)?;

    info!(%format, bytes = bytes.len(), "SIRI document written");
    Ok(())
}

/// Loads settings from the cache, storing the defaults in the background on a miss.
fn cached_or_default<T>(cache: Option<&CacheClient>, kind: ObjectType) -> T
where
    T: Default + serde::Serialize + serde::de::DeserializeOwned,
{
    let Some(cache) = cache else {
        return T::default();
    };
    if let Some(config) = cache.read(kind) {
        return config;
    }

    let config = T::default();
    debug!(%kind, "Caching default settings");
    // Fire and forget; the runtime finishes the write before exiting.
    let _ = cache.write(kind, &config);
    config
}
