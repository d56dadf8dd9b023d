//! Blocking DRS client: URI resolution, metadata, bundle listing, and
//! byte-stream access.
//!
//! Every operation is synchronous and owns its HTTP request/response
//! lifecycle; nothing is cached or retried. Bundle paths resolve with one
//! metadata fetch per path segment, sequentially, since each segment's
//! lookup depends on the previous response.

use crate::types::{AccessMethod, AccessResponse, AccessUrl, DrsObject};
use crate::uri::{self, DrsUri};
use crate::{Error, Result};
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use url::Url;

/// Client for a GA4GH DRS server (or several; cross-host bundle references
/// are followed transparently).
///
/// Construction fails only if the underlying TLS backend cannot be
/// initialized.
#[derive(Debug, Clone)]
pub struct DrsClient {
    http: Client,
    token: Option<String>,
}

/// Outcome of resolving a `drs://` URI down to a single object.
#[derive(Debug, Clone)]
pub struct ResolvedObject {
    /// Host whose DRS endpoints served the final metadata document. Access
    /// ids of this object are exchanged against the same host.
    pub host: String,
    pub object: DrsObject,
}

impl DrsClient {
    pub fn new() -> Result<Self> {
        Self::build(None)
    }

    /// Client that sends `Authorization: Bearer {token}` on every request.
    pub fn with_token(token: impl Into<String>) -> Result<Self> {
        Self::build(Some(token.into()))
    }

    fn build(token: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("drsr/", env!("CARGO_PKG_VERSION")))
            // Object downloads can run long; deadlines are the caller's
            // concern, so no overall request timeout.
            .timeout(None)
            .build()?;
        Ok(Self { http, token })
    }

    /// Resolve a `drs://host/id[/name/in/bundle]` URI to a single object.
    ///
    /// Path segments are consumed left to right: the current object must be
    /// a bundle, the segment is matched by exact `name` among its contents,
    /// and the referenced child is fetched by `id` from the current host or
    /// by its `drs_uri` when the entry points at another host.
    pub fn resolve(&self, uri: &str) -> Result<ResolvedObject> {
        let parsed = DrsUri::parse(uri)?;

        let mut host = parsed.host.clone();
        let mut object = self.fetch_object(&parsed.host, &parsed.object_id)?;
        let mut trail = DrsUri {
            host: parsed.host,
            object_id: parsed.object_id,
            path: Vec::new(),
        };
        let mut pending: VecDeque<String> = parsed.path.into();

        while let Some(segment) = pending.pop_front() {
            if !object.is_bundle() {
                return Err(Error::NotABundle(trail.to_string()));
            }
            let contents = object.contents.as_deref().unwrap_or(&[]);
            let (child_id, child_uri) = match contents.iter().find(|e| e.name == segment) {
                Some(entry) => (entry.id.clone(), entry.drs_uri.clone()),
                None => {
                    trail.path.push(segment);
                    return Err(Error::NotFound(trail.to_string()));
                }
            };
            trail.path.push(segment);

            if let Some(id) = child_id {
                object = self.fetch_object(&host, &id)?;
            } else if let Some(raw) = child_uri {
                // Cross-host reference: restart resolution at the referenced
                // URI with the remaining segments appended.
                let target = DrsUri::parse(&raw)?;
                object = self.fetch_object(&target.host, &target.object_id)?;
                for seg in target.path.iter().rev() {
                    pending.push_front(seg.clone());
                }
                host = target.host.clone();
                trail = DrsUri {
                    host: target.host,
                    object_id: target.object_id,
                    path: Vec::new(),
                };
            } else {
                // Entry carries neither an id nor a drs_uri; nothing can be
                // fetched for it.
                return Err(Error::NotFound(trail.to_string()));
            }
        }

        Ok(ResolvedObject { host, object })
    }

    /// Full metadata document of the object a URI resolves to, unmodified.
    pub fn info(&self, uri: &str) -> Result<DrsObject> {
        Ok(self.resolve(uri)?.object)
    }

    /// Child names of the bundle a URI resolves to, in server order.
    pub fn ls(&self, uri: &str) -> Result<Vec<String>> {
        let resolved = self.resolve(uri)?;
        if !resolved.object.is_bundle() {
            return Err(Error::NotABundle(uri.to_string()));
        }
        Ok(resolved
            .object
            .contents
            .unwrap_or_default()
            .into_iter()
            .map(|entry| entry.name)
            .collect())
    }

    /// Open the object's bytes as a sequential reader.
    ///
    /// Prefers an inline http(s) `access_url`; otherwise exchanges the first
    /// available `access_id` at the access endpoint. The connection is
    /// released when the returned [`ObjectReader`] is dropped.
    pub fn open(&self, uri: &str) -> Result<ObjectReader> {
        let resolved = self.resolve(uri)?;
        if resolved.object.is_bundle() {
            return Err(Error::IsABundle(uri.to_string()));
        }

        let methods = resolved.object.access_methods.as_deref().unwrap_or(&[]);
        let response = match select_access(methods, uri)? {
            AccessRoute::Direct(access) => self.open_url(access, uri)?,
            AccessRoute::ById(access_id) => {
                let access =
                    self.fetch_access_url(&resolved.host, &resolved.object.id, access_id)?;
                if !is_http_url(&access.url) {
                    return Err(unsupported(&access.url));
                }
                self.open_url(&access, uri)?
            }
        };

        Ok(ObjectReader {
            object: resolved.object,
            response,
        })
    }

    /// Write the object's bytes to `path`.
    ///
    /// If the copy fails partway the error propagates and the partially
    /// written file is left on disk; callers needing atomicity should dump
    /// to a temporary path and rename.
    pub fn dump(&self, uri: &str, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut reader = self.open(uri)?;
        let mut file = File::create(path)?;
        let written = io::copy(&mut reader, &mut file)?;
        tracing::debug!(uri, path = %path.display(), written, "dumped DRS object");
        Ok(())
    }

    fn fetch_object(&self, host: &str, object_id: &str) -> Result<DrsObject> {
        let endpoint = uri::object_endpoint(host, object_id);
        tracing::debug!(host, object_id, "fetching DRS object");
        let resp = self.get(&endpoint)?;
        let resp = self.check_status(resp, &format!("drs://{host}/{object_id}"))?;
        Ok(resp.json()?)
    }

    fn fetch_access_url(&self, host: &str, object_id: &str, access_id: &str) -> Result<AccessUrl> {
        let endpoint = uri::access_endpoint(host, object_id, access_id);
        tracing::debug!(host, object_id, access_id, "resolving access id");
        let resp = self.get(&endpoint)?;
        let resp = self.check_status(
            resp,
            &format!("drs://{host}/{object_id} access_id: {access_id}"),
        )?;
        let body: AccessResponse = resp.json()?;
        Ok(body.access_url)
    }

    /// Streaming GET against a resolved access URL, with any headers the
    /// access endpoint demanded and the bearer token unless those headers
    /// already carry their own authorization.
    fn open_url(&self, access: &AccessUrl, context: &str) -> Result<Response> {
        let mut req = self.http.get(&access.url);
        for (name, value) in &access.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        let has_auth = access
            .headers
            .keys()
            .any(|name| name.eq_ignore_ascii_case("authorization"));
        if !has_auth && let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        self.check_status(req.send()?, context)
    }

    fn get(&self, url: &str) -> Result<Response> {
        let mut req = self.http.get(url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        Ok(req.send()?)
    }

    fn check_status(&self, resp: Response, context: &str) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        match status {
            StatusCode::NOT_FOUND => Err(Error::NotFound(context.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(Error::PermissionDenied(context.to_string()))
            }
            _ => {
                let url = resp.url().to_string();
                let body = resp.text().unwrap_or_default();
                Err(Error::Http {
                    status: status.as_u16(),
                    url,
                    body,
                })
            }
        }
    }
}

/// Live byte stream of a DRS object. Dropping it releases the connection.
#[derive(Debug)]
pub struct ObjectReader {
    object: DrsObject,
    response: Response,
}

impl ObjectReader {
    /// Metadata of the object being read.
    pub fn object(&self) -> &DrsObject {
        &self.object
    }

    /// Final URL the bytes are served from, after redirects.
    pub fn url(&self) -> &str {
        self.response.url().as_str()
    }
}

impl Read for ObjectReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.response.read(buf)
    }
}

#[derive(Debug)]
enum AccessRoute<'a> {
    Direct(&'a AccessUrl),
    ById(&'a str),
}

/// Pick how to fetch the bytes: an inline http(s) URL wins, then the first
/// access id. Only non-http URLs is `UnsupportedAccessMethod`; an empty or
/// unusable method list is `NoAccessMethod`.
fn select_access<'a>(methods: &'a [AccessMethod], context: &str) -> Result<AccessRoute<'a>> {
    for method in methods {
        if let Some(access) = &method.access_url
            && is_http_url(&access.url)
        {
            return Ok(AccessRoute::Direct(access));
        }
    }
    for method in methods {
        if let Some(access_id) = &method.access_id {
            return Ok(AccessRoute::ById(access_id));
        }
    }
    for method in methods {
        if let Some(access) = &method.access_url {
            return Err(unsupported(&access.url));
        }
    }
    Err(Error::NoAccessMethod(context.to_string()))
}

fn is_http_url(url: &str) -> bool {
    Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

fn unsupported(url: &str) -> Error {
    let scheme = Url::parse(url)
        .map(|u| u.scheme().to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    Error::UnsupportedAccessMethod {
        scheme,
        url: url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn with_url(url: &str) -> AccessMethod {
        AccessMethod {
            r#type: "https".to_string(),
            access_url: Some(AccessUrl {
                url: url.to_string(),
                headers: HashMap::new(),
            }),
            access_id: None,
            region: None,
        }
    }

    fn with_id(access_id: &str) -> AccessMethod {
        AccessMethod {
            r#type: "s3".to_string(),
            access_url: None,
            access_id: Some(access_id.to_string()),
            region: None,
        }
    }

    #[test]
    fn test_inline_url_preferred_over_access_id() {
        let methods = [with_id("ticket"), with_url("https://cdn/file.txt")];
        match select_access(&methods, "drs://x/y").unwrap() {
            AccessRoute::Direct(access) => assert_eq!(access.url, "https://cdn/file.txt"),
            AccessRoute::ById(_) => panic!("expected direct URL"),
        }
    }

    #[test]
    fn test_access_id_fallback_when_only_non_http_urls() {
        let methods = [with_url("s3://bucket/key"), with_id("ticket")];
        match select_access(&methods, "drs://x/y").unwrap() {
            AccessRoute::ById(id) => assert_eq!(id, "ticket"),
            AccessRoute::Direct(_) => panic!("expected access id"),
        }
    }

    #[test]
    fn test_only_non_http_urls_is_unsupported() {
        let methods = [with_url("s3://bucket/key"), with_url("gs://bucket/key")];
        match select_access(&methods, "drs://x/y") {
            Err(Error::UnsupportedAccessMethod { scheme, .. }) => assert_eq!(scheme, "s3"),
            other => panic!("expected UnsupportedAccessMethod, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_methods_is_no_access_method() {
        assert!(matches!(
            select_access(&[], "drs://x/y"),
            Err(Error::NoAccessMethod(_))
        ));
    }

    #[test]
    fn test_method_with_neither_url_nor_id() {
        let methods = [AccessMethod {
            r#type: "s3".to_string(),
            access_url: None,
            access_id: None,
            region: None,
        }];
        assert!(matches!(
            select_access(&methods, "drs://x/y"),
            Err(Error::NoAccessMethod(_))
        ));
    }
}
