//! Client library for the GA4GH Data Repository Service (DRS) protocol.
//!
//! Resolves `drs://host/id[/name/in/bundle]` URIs against the DRS v1 REST
//! endpoints, fetches object metadata, lists bundle contents, and streams
//! object bytes.
//!
//! ```no_run
//! use std::io::Read;
//!
//! // Metadata of a DRS object
//! let info = drsr::info("drs://example.org/abc123")?;
//! println!("{}", serde_json::to_string_pretty(&info)?);
//!
//! // Read a DRS object
//! let mut reader = drsr::open("drs://example.org/abc123")?;
//! let mut buf = Vec::new();
//! reader.read_to_end(&mut buf)?;
//!
//! // Save to file
//! let name = info.name.unwrap_or(info.id);
//! drsr::dump("drs://example.org/abc123", &name)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;
pub mod uri;

pub use client::{DrsClient, ObjectReader, ResolvedObject};
pub use error::{Error, Result};
pub use types::{AccessMethod, AccessUrl, Checksum, ContentsEntry, DrsObject};
pub use uri::DrsUri;

/// Metadata of the object `uri` resolves to, using a default client.
pub fn info(uri: &str) -> Result<DrsObject> {
    DrsClient::new()?.info(uri)
}

/// Child names of the bundle `uri` resolves to, using a default client.
pub fn ls(uri: &str) -> Result<Vec<String>> {
    DrsClient::new()?.ls(uri)
}

/// Byte stream of the object `uri` resolves to, using a default client.
pub fn open(uri: &str) -> Result<ObjectReader> {
    DrsClient::new()?.open(uri)
}

/// Write the bytes of the object `uri` resolves to into `path`, using a
/// default client.
pub fn dump(uri: &str, path: impl AsRef<std::path::Path>) -> Result<()> {
    DrsClient::new()?.dump(uri, path)
}
