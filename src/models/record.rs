use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// User identifier exactly as the platform sent it, numeric or string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Number(Number),
    Text(String),
}

impl Identifier {
    pub fn is_empty(&self) -> bool {
        match self {
            Identifier::Number(n) => n.as_f64().map_or(true, |f| f == 0.0),
            Identifier::Text(s) => s.is_empty(),
        }
    }

    fn to_cell(&self) -> Cell {
        match self {
            Identifier::Number(n) => Cell::from_json(&Value::Number(n.clone())),
            Identifier::Text(s) => Cell::Text(s.clone()),
        }
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Identifier::Text(s.to_string())
    }
}

impl From<i64> for Identifier {
    fn from(n: i64) -> Self {
        Identifier::Number(n.into())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Number(n) => write!(f, "{}", n),
            Identifier::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Follower count as reported by the platform, either numeric or a display string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FollowerMetric {
    Count(i64),
    Ratio(f64),
    Text(String),
}

/// Flat user record produced by the normalizer.
///
/// Field names on the wire follow the platform's own dataset columns so
/// exported files line up with what downstream tooling already expects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "uid")]
    pub id: Option<Identifier>,
    #[serde(rename = "nickname")]
    pub display_name: Option<String>,
    #[serde(rename = "signature", default)]
    pub bio: String,
    #[serde(rename = "avatar_thumb", default)]
    pub avatar_reference: Map<String, Value>,
    #[serde(rename = "follower_count")]
    pub follower_metric: Option<FollowerMetric>,
    #[serde(rename = "custom_verify")]
    pub verification_reason: Option<String>,
    #[serde(rename = "unique_id")]
    pub stable_handle: Option<Identifier>,
    #[serde(rename = "sec_uid")]
    pub internal_secondary_id: Option<Identifier>,
    #[serde(rename = "follow_status")]
    pub relationship_status: Option<Value>,
    #[serde(rename = "platform_sync_info")]
    pub cross_platform_sync_info: Option<Value>,
    #[serde(rename = "search_keyword", default)]
    pub source_query: String,
}

/// A single exported value, already reduced to something every tabular format can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    /// Nested map or list, rendered as compact JSON text.
    Nested(String),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Plain-text rendering used by text-based formats. Null renders empty.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Text(s) | Cell::Nested(s) => s.clone(),
            Cell::Integer(n) => n.to_string(),
            Cell::Float(f) => f.to_string(),
        }
    }

    fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Null,
            Value::Bool(b) => Cell::Text(b.to_string()),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Cell::Integer(i),
                None => Cell::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => Cell::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => Cell::Nested(value.to_string()),
        }
    }
}

fn text(value: &Option<String>) -> Cell {
    value.clone().map(Cell::Text).unwrap_or(Cell::Null)
}

fn identifier(value: &Option<Identifier>) -> Cell {
    value.as_ref().map(Identifier::to_cell).unwrap_or(Cell::Null)
}

fn raw(value: &Option<Value>) -> Cell {
    value.as_ref().map(Cell::from_json).unwrap_or(Cell::Null)
}

impl UserRecord {
    /// Exported column names, in output order.
    pub const COLUMNS: [&'static str; 11] = [
        "uid",
        "nickname",
        "signature",
        "avatar_thumb",
        "follower_count",
        "custom_verify",
        "unique_id",
        "sec_uid",
        "follow_status",
        "platform_sync_info",
        "search_keyword",
    ];

    /// True when the record carries at least one usable identifier.
    pub fn has_identity(&self) -> bool {
        [&self.id, &self.stable_handle, &self.internal_secondary_id]
            .into_iter()
            .any(|v| v.as_ref().is_some_and(|id| !id.is_empty()))
    }

    /// Attach the search keyword this record was discovered under.
    pub fn tag_source(&mut self, query: &str) {
        if self.source_query.is_empty() {
            self.source_query = query.to_string();
        }
    }

    /// Cells in [`UserRecord::COLUMNS`] order.
    pub fn cells(&self) -> Vec<Cell> {
        let follower = match &self.follower_metric {
            Some(FollowerMetric::Count(n)) => Cell::Integer(*n),
            Some(FollowerMetric::Ratio(f)) => Cell::Float(*f),
            Some(FollowerMetric::Text(s)) => Cell::Text(s.clone()),
            None => Cell::Null,
        };

        vec![
            identifier(&self.id),
            text(&self.display_name),
            Cell::Text(self.bio.clone()),
            Cell::Nested(Value::Object(self.avatar_reference.clone()).to_string()),
            follower,
            text(&self.verification_reason),
            identifier(&self.stable_handle),
            identifier(&self.internal_secondary_id),
            raw(&self.relationship_status),
            raw(&self.cross_platform_sync_info),
            Cell::Text(self.source_query.clone()),
        ]
    }
}
