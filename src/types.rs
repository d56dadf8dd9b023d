use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// DRS object metadata per DRS spec 1.x (`GET /ga4gh/drs/v1/objects/{id}`).
///
/// Fields the server sends beyond the ones modelled here are kept in
/// `extra`, so a document deserialized and re-serialized comes back
/// unmodified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrsObject {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checksums: Vec<Checksum>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_methods: Option<Vec<AccessMethod>>,
    /// Present (possibly nested) on bundle objects only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<ContentsEntry>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DrsObject {
    /// A bundle is an object with non-empty `contents`; everything else is
    /// a leaf carrying bytes.
    pub fn is_bundle(&self) -> bool {
        self.contents.as_ref().is_some_and(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checksum {
    pub checksum: String,
    pub r#type: String,
}

/// One server-declared way of retrieving an object's bytes: either an
/// inline URL or an `access_id` to be exchanged at the access endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessMethod {
    pub r#type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_url: Option<AccessUrl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessUrl {
    pub url: String,
    /// Headers the server requires on the byte request (auth tickets etc).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}

/// Response body of `GET /ga4gh/drs/v1/objects/{id}/access/{access_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessResponse {
    pub access_url: AccessUrl,
}

/// A child reference inside a bundle's `contents` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentsEntry {
    pub name: String,
    /// Object id of the child on the same host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Full `drs://` URI of the child, possibly on another host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drs_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<ContentsEntry>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_leaf_object_round_trips_unmodified() {
        let doc = json!({
            "id": "abc123",
            "name": "file.txt",
            "size": 10,
            "access_methods": [
                {"type": "https", "access_url": {"url": "https://cdn/file.txt"}}
            ]
        });
        let obj: DrsObject = serde_json::from_value(doc.clone()).unwrap();
        assert!(!obj.is_bundle());
        assert_eq!(serde_json::to_value(&obj).unwrap(), doc);
    }

    #[test]
    fn test_unknown_fields_are_preserved() {
        let doc = json!({
            "id": "abc123",
            "checksums": [{"checksum": "deadbeef", "type": "md5"}],
            "some_vendor_field": {"nested": true}
        });
        let obj: DrsObject = serde_json::from_value(doc.clone()).unwrap();
        assert_eq!(obj.extra["some_vendor_field"], json!({"nested": true}));
        assert_eq!(serde_json::to_value(&obj).unwrap(), doc);
    }

    #[test]
    fn test_bundle_discriminant() {
        let bundle: DrsObject = serde_json::from_value(json!({
            "id": "bundle1",
            "contents": [{"name": "x", "id": "x1"}]
        }))
        .unwrap();
        assert!(bundle.is_bundle());

        // An empty contents list does not make a bundle.
        let empty: DrsObject = serde_json::from_value(json!({
            "id": "b2",
            "contents": []
        }))
        .unwrap();
        assert!(!empty.is_bundle());
    }

    #[test]
    fn test_access_method_by_id() {
        let method: AccessMethod = serde_json::from_value(json!({
            "type": "s3",
            "access_id": "us-east-1",
            "region": "us-east-1"
        }))
        .unwrap();
        assert!(method.access_url.is_none());
        assert_eq!(method.access_id.as_deref(), Some("us-east-1"));
    }

    #[test]
    fn test_access_response_headers_default_empty() {
        let resp: AccessResponse = serde_json::from_value(json!({
            "access_url": {"url": "https://cdn/file.txt"}
        }))
        .unwrap();
        assert!(resp.access_url.headers.is_empty());
    }
}
