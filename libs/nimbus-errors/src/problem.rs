//! RFC 9457 Problem Details as returned by Nimbus services.
//!
//! Unlike a server-side problem model, this type is built from whatever the
//! remote service sent. Recognition is structural: a JSON object with a string
//! `type`, a string `title` and a numeric `status` qualifies. The complete
//! payload, extension members included, is kept verbatim so callers can inspect
//! fields this crate knows nothing about.

use http::StatusCode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Content type for Problem Details as per RFC 9457.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

const TYPE_FIELD: &str = "type";
const TITLE_FIELD: &str = "title";
const STATUS_FIELD: &str = "status";
const DETAIL_FIELD: &str = "detail";

/// A recognized Problem Details payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemDetails {
    payload: Map<String, Value>,
    status: Number,
}

impl ProblemDetails {
    /// Recognize a Problem Details object, handing the map back untouched when
    /// the required members are missing or have the wrong type.
    ///
    /// # Errors
    ///
    /// Returns the original map if it does not carry a string `type`, a string
    /// `title` and a numeric `status`. The number itself is not checked against
    /// the range of HTTP status codes.
    pub fn from_map(payload: Map<String, Value>) -> Result<Self, Map<String, Value>> {
        let has_strings = payload.get(TYPE_FIELD).is_some_and(Value::is_string)
            && payload.get(TITLE_FIELD).is_some_and(Value::is_string);

        let status = match payload.get(STATUS_FIELD) {
            Some(Value::Number(status)) if has_strings => status.clone(),
            _ => return Err(payload),
        };

        Ok(Self { payload, status })
    }

    /// A URI reference that identifies the problem type.
    #[must_use]
    pub fn type_url(&self) -> &str {
        self.str_field(TYPE_FIELD).unwrap_or_default()
    }

    /// Short, human-readable summary of the problem type.
    #[must_use]
    pub fn title(&self) -> &str {
        self.str_field(TITLE_FIELD).unwrap_or_default()
    }

    /// The `status` member exactly as the server sent it.
    ///
    /// This is not guaranteed to match the status line of the HTTP response,
    /// nor to be an integer.
    #[must_use]
    pub fn status(&self) -> &Number {
        &self.status
    }

    /// The `status` member as an HTTP status code, when it is an integer in
    /// the valid range.
    #[must_use]
    pub fn status_code(&self) -> Option<StatusCode> {
        self.status
            .as_u64()
            .and_then(|code| u16::try_from(code).ok())
            .and_then(|code| StatusCode::from_u16(code).ok())
    }

    /// Occurrence-specific explanation, when present and a string.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.str_field(DETAIL_FIELD)
    }

    /// Look up any member of the payload, extension members included.
    #[must_use]
    pub fn get(&self, member: &str) -> Option<&Value> {
        self.payload.get(member)
    }

    /// The payload exactly as received.
    #[must_use]
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    #[must_use]
    pub fn into_payload(self) -> Map<String, Value> {
        self.payload
    }

    fn str_field(&self, member: &str) -> Option<&str> {
        self.payload.get(member).and_then(Value::as_str)
    }
}

impl TryFrom<Value> for ProblemDetails {
    type Error = Value;

    /// Recognize a response body as Problem Details.
    ///
    /// Non-objects and objects missing a required member are returned as-is.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Self::from_map(map).map_err(Value::Object),
            other => Err(other),
        }
    }
}

impl fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = match self.title() {
            "" => "Problem response",
            title => title,
        };
        match self.detail() {
            Some(detail) if !detail.is_empty() => write!(f, "{title}: {detail}"),
            _ => f.write_str(title),
        }
    }
}

impl Serialize for ProblemDetails {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.payload.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ProblemDetails {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let payload = Map::deserialize(deserializer)?;
        Self::from_map(payload).map_err(|_| {
            serde::de::Error::custom(
                "problem details require string `type`, string `title` and numeric `status`",
            )
        })
    }
}
