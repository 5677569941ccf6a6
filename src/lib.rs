pub mod cache;
pub mod error;
pub mod format;
pub mod model;
pub mod output;
pub mod parser;
mod serde_helpers;
pub mod writer;
pub mod xml;
