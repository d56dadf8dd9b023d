//! Parsing of `drs://` URIs.
//!
//! The grammar is `drs://<host>/<object_id>(/<segment>)*`. Path segments
//! name entries inside nested bundles and are percent-decoded; `/` is the
//! sole separator and no query or fragment is recognized.

use crate::{Error, Result};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use std::fmt;
use std::str::FromStr;

/// Escape everything outside the RFC 3986 unreserved set.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A parsed `drs://` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrsUri {
    pub host: String,
    pub object_id: String,
    /// Bundle path below the object, outermost segment first. May be empty.
    pub path: Vec<String>,
}

impl DrsUri {
    pub fn parse(uri: &str) -> Result<Self> {
        let (scheme, rest) = uri
            .split_once("://")
            .ok_or_else(|| Error::InvalidUri(format!("{uri}: not a URI")))?;
        if scheme != "drs" {
            return Err(Error::InvalidUri(format!("{uri}: scheme must be drs")));
        }

        let mut parts = rest.split('/');
        let host = parts.next().unwrap_or_default();
        if host.is_empty() {
            return Err(Error::InvalidUri(format!("{uri}: missing host")));
        }

        let object_id = match parts.next() {
            Some(id) if !id.is_empty() => decode(id, uri)?,
            _ => return Err(Error::InvalidUri(format!("{uri}: missing object id"))),
        };

        // Doubled and trailing slashes collapse, like POSIX paths.
        let path = parts
            .filter(|seg| !seg.is_empty())
            .map(|seg| decode(seg, uri))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            host: host.to_string(),
            object_id,
            path,
        })
    }

    /// Scheme used when talking to this host's DRS endpoints.
    ///
    /// The DRS spec only defines https and never assigns a port, so an
    /// explicit port is taken to mean a local dev server on plain http.
    pub fn endpoint_scheme(&self) -> &'static str {
        scheme_for(&self.host)
    }
}

pub(crate) fn scheme_for(host: &str) -> &'static str {
    if host.contains(':') { "http" } else { "https" }
}

/// URL of the DRS v1 object-metadata endpoint for `object_id` on `host`.
pub(crate) fn object_endpoint(host: &str, object_id: &str) -> String {
    format!(
        "{}://{}/ga4gh/drs/v1/objects/{}",
        scheme_for(host),
        host,
        utf8_percent_encode(object_id, COMPONENT)
    )
}

/// URL of the DRS v1 access endpoint for `access_id` of `object_id` on `host`.
pub(crate) fn access_endpoint(host: &str, object_id: &str, access_id: &str) -> String {
    format!(
        "{}/access/{}",
        object_endpoint(host, object_id),
        utf8_percent_encode(access_id, COMPONENT)
    )
}

fn decode(segment: &str, uri: &str) -> Result<String> {
    percent_decode_str(segment)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|_| Error::InvalidUri(format!("{uri}: invalid percent-encoding")))
}

impl fmt::Display for DrsUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "drs://{}/{}",
            self.host,
            utf8_percent_encode(&self.object_id, COMPONENT)
        )?;
        for seg in &self.path {
            write!(f, "/{}", utf8_percent_encode(seg, COMPONENT))?;
        }
        Ok(())
    }
}

impl FromStr for DrsUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
