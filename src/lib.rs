//! KML document parsing and style resolution
//!
//! Reads a KML document in one streaming pass into a tree of containers,
//! placemarks and styles, then resolves each placemark's effective style:
//! inline style first, then its style url looked up through the enclosing
//! containers, otherwise none.
//!
//! # Example
//! ```ignore
//! let document = kml_engine::parse_kml_file("tests/fixtures/amu_document_nest.kml")?;
//! for (placemark, owner) in document.placemarks() {
//!     println!("{:?} in {:?}", placemark.name(), owner.and_then(|c| c.container_id()));
//! }
//! ```

pub mod error;
pub mod kml;
pub mod options;
pub mod reader;

pub use error::KmlError;
pub use kml::*;
pub use options::ParserOptions;
pub use reader::{TagReader, TokenKind};

use anyhow::Context;
use std::io::BufRead;
use std::path::Path;

/// Parse a KML document held in memory with default options
pub fn parse_kml_str(source: &str) -> Result<KmlDocument, KmlError> {
    KmlParser::new(TagReader::from_text(source)).parse_kml()
}

/// Parse a KML document from any buffered byte source
pub fn parse_kml_reader<R: BufRead>(source: R, options: ParserOptions) -> Result<KmlDocument, KmlError> {
    KmlParser::with_options(TagReader::from_reader(source), options).parse_kml()
}

/// Parse a KML file from disk, with options taken from the environment
pub fn parse_kml_file<P: AsRef<Path>>(path: P) -> anyhow::Result<KmlDocument> {
    let path = path.as_ref();
    let reader = TagReader::from_file(path)
        .with_context(|| format!("Failed to open KML file {}", path.display()))?;
    KmlParser::with_options(reader, ParserOptions::from_env())
        .parse_kml()
        .with_context(|| format!("Failed to parse KML file {}", path.display()))
}
