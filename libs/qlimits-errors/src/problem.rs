//! RFC 9457 Problem Details (pure data model, no HTTP framework dependencies)

use http::StatusCode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires &T signature
fn serialize_status_code<S>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u16(status.as_u16())
}

fn deserialize_status_code<'de, D>(deserializer: D) -> Result<StatusCode, D::Error>
where
    D: Deserializer<'de>,
{
    let code = u16::deserialize(deserializer)?;
    StatusCode::from_u16(code).map_err(serde::de::Error::custom)
}

/// RFC 9457 Problem Details for HTTP APIs.
///
/// Problem-type specific data travels in `extensions`, which are flattened
/// into the top-level JSON object as the RFC prescribes for extension members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct Problem {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub type_url: String,
    /// A short, human-readable summary of the problem type.
    pub title: String,
    /// The HTTP status code for this occurrence of the problem.
    /// Serializes as u16 for RFC 9457 compatibility.
    #[serde(
        serialize_with = "serialize_status_code",
        deserialize_with = "deserialize_status_code"
    )]
    pub status: StatusCode,
    /// A human-readable explanation specific to this occurrence of the problem.
    pub detail: String,
    /// A URI reference that identifies the specific occurrence of the problem.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub instance: String,
    /// Machine-readable error code from the catalog.
    #[serde(default)]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    /// Extension members specific to the problem type.
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Problem {
    /// Create a new Problem with the given status, title, and detail.
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_owned(),
            title: title.into(),
            status,
            detail: detail.into(),
            instance: String::new(),
            code: String::new(),
            trace_id: None,
            extensions: Map::new(),
        }
    }

    pub fn with_type(mut self, type_url: impl Into<String>) -> Self {
        self.type_url = type_url.into();
        self
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = uri.into();
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach an extension member. Reserved member names are ignored.
    pub fn with_extension(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        if !RESERVED_MEMBERS.contains(&name.as_str()) {
            self.extensions.insert(name, value.into());
        }
        self
    }

    /// Look up an extension member by name.
    #[must_use]
    pub fn extension(&self, name: &str) -> Option<&Value> {
        self.extensions.get(name)
    }

    /// `true` for 4xx problems, the ones a client can fix by changing its request.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }
}

const RESERVED_MEMBERS: &[&str] = &[
    "type", "title", "status", "detail", "instance", "code", "trace_id",
];

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn problem_builder_pattern() {
        let p = Problem::new(
            StatusCode::BAD_REQUEST,
            "Query Limit Exceeded",
            "The limit of 10 for $top has been exceeded",
        )
        .with_code("qlimits.limit_exceeded.v1")
        .with_instance("/customers")
        .with_trace_id("req-456")
        .with_extension("limit", 10_u64);

        assert_eq!(p.status, StatusCode::BAD_REQUEST);
        assert_eq!(p.code, "qlimits.limit_exceeded.v1");
        assert_eq!(p.instance, "/customers");
        assert_eq!(p.trace_id, Some("req-456".to_owned()));
        assert_eq!(p.extension("limit"), Some(&Value::from(10_u64)));
        assert!(p.is_client_error());
    }

    #[test]
    fn reserved_members_cannot_be_shadowed() {
        let p = Problem::new(StatusCode::BAD_REQUEST, "Bad", "bad").with_extension("status", 200);
        assert!(p.extensions.is_empty());
    }

    #[test]
    fn problem_serializes_status_as_u16_and_flattens_extensions() {
        let p = Problem::new(StatusCode::BAD_REQUEST, "Bad Request", "too many rows")
            .with_extension("dimension", "$top");
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["status"], 400);
        assert_eq!(json["dimension"], "$top");
        assert!(json.get("instance").is_none());
        assert!(json.get("extensions").is_none());
    }

    #[test]
    fn problem_deserializes_extension_members() {
        let json = r#"{"type":"about:blank","title":"Bad Request","status":400,"detail":"x","code":"c","requested":20}"#;
        let p: Problem = serde_json::from_str(json).unwrap();
        assert_eq!(p.status, StatusCode::BAD_REQUEST);
        assert_eq!(p.extension("requested"), Some(&Value::from(20)));
    }
}
