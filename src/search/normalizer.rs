//! Pure extraction of pagination state and user records from raw search payloads.
//!
//! The search endpoint is unversioned and its field names drift between
//! camelCase and snake_case, so every lookup goes through an ordered list of
//! candidate keys. A shape mismatch never fails: it yields a missing field, a
//! dropped record or an empty page.

use serde_json::{Map, Value};

use crate::models::{FollowerMetric, Identifier, UserRecord};

const DATA_KEY: &str = "data";
const USER_LIST_KEY: &str = "user_list";

const TOP_LEVEL_FLAG_KEYS: &[&str] = &["hasMore"];
const NESTED_FLAG_KEYS: &[&str] = &["has_more", "hasMore"];
const CURSOR_KEY: &str = "cursor";

const USER_INFO_KEYS: &[&str] = &["user_info", "user"];
const STATS_KEYS: &[&str] = &["stats"];

const ID_KEYS: &[&str] = &["uid"];
const NICKNAME_KEYS: &[&str] = &["nickname"];
const SIGNATURE_KEYS: &[&str] = &["signature"];
const AVATAR_KEYS: &[&str] = &["avatar_thumb", "avatarThumb"];
const FOLLOWER_KEYS: &[&str] = &["follower_count", "followerCount", "followerCountStr"];
const VERIFY_KEYS: &[&str] = &["custom_verify", "enterprise_verify_reason"];
const HANDLE_KEYS: &[&str] = &["unique_id", "short_id"];
const SEC_UID_KEYS: &[&str] = &["sec_uid"];
const FOLLOW_STATUS_KEYS: &[&str] = &["follow_status"];
const SYNC_INFO_KEYS: &[&str] = &["platform_sync_info"];

/// Whether a more-results signal is present and set.
///
/// Top-level `hasMore` wins when it is a boolean or an integer; otherwise the
/// nested `data` object is consulted. Anything else reads as `false`.
pub fn extract_continuation_flag(payload: &Value) -> bool {
    let Some(root) = payload.as_object() else {
        return false;
    };

    if let Some(flag) = TOP_LEVEL_FLAG_KEYS
        .iter()
        .find_map(|key| root.get(*key).and_then(as_flag))
    {
        return flag;
    }

    data_object(root)
        .and_then(|data| first_present(data, NESTED_FLAG_KEYS))
        .and_then(as_flag)
        .unwrap_or(false)
}

/// Cursor for the next page, from top-level `cursor` or `data.cursor`.
pub fn extract_continuation_token(payload: &Value) -> Option<i64> {
    let root = payload.as_object()?;

    root.get(CURSOR_KEY)
        .and_then(as_cursor)
        .or_else(|| data_object(root)?.get(CURSOR_KEY).and_then(as_cursor))
}

/// Normalize every usable entry under `data.user_list`.
pub fn extract_user_records(payload: &Value) -> Vec<UserRecord> {
    let Some(entries) = payload
        .as_object()
        .and_then(data_object)
        .and_then(|data| data.get(USER_LIST_KEY))
        .and_then(Value::as_array)
    else {
        tracing::debug!("No user_list array found in payload");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(Value::as_object)
        .filter_map(normalize_entry)
        .collect()
}

fn normalize_entry(entry: &Map<String, Value>) -> Option<UserRecord> {
    let empty = Map::new();
    let user_info = first_present(entry, USER_INFO_KEYS)
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let stats = first_present(entry, STATS_KEYS)
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let record = UserRecord {
        id: first_present(user_info, ID_KEYS).and_then(as_identifier),
        display_name: first_present(user_info, NICKNAME_KEYS).and_then(as_string),
        bio: first_present(user_info, SIGNATURE_KEYS)
            .and_then(as_string)
            .unwrap_or_default(),
        avatar_reference: first_present(user_info, AVATAR_KEYS)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
        follower_metric: first_present(stats, FOLLOWER_KEYS).and_then(as_follower_metric),
        verification_reason: first_present(user_info, VERIFY_KEYS).and_then(as_string),
        stable_handle: first_present(user_info, HANDLE_KEYS).and_then(as_identifier),
        internal_secondary_id: first_present(user_info, SEC_UID_KEYS).and_then(as_identifier),
        relationship_status: FOLLOW_STATUS_KEYS
            .iter()
            .find_map(|key| entry.get(*key))
            .filter(|v| !v.is_null())
            .cloned(),
        cross_platform_sync_info: SYNC_INFO_KEYS
            .iter()
            .find_map(|key| entry.get(*key))
            .filter(|v| !v.is_null())
            .cloned(),
        source_query: String::new(),
    };

    record.has_identity().then_some(record)
}

fn data_object(root: &Map<String, Value>) -> Option<&Map<String, Value>> {
    root.get(DATA_KEY).and_then(Value::as_object)
}

/// First candidate whose value is present and non-empty.
fn first_present<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| is_present(value))
}

/// Null, false, zero and empty strings or collections all count as absent.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn as_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(_) => as_integer(value).map(|n| n != 0),
        _ => None,
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

fn as_cursor(value: &Value) -> Option<i64> {
    match value {
        Value::Number(_) => as_integer(value),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            s.parse().ok()
        }
        _ => None,
    }
}

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

/// Identifiers arrive as strings or bare integers depending on the endpoint; both are kept as sent.
fn as_identifier(value: &Value) -> Option<Identifier> {
    match value {
        Value::String(s) => Some(Identifier::Text(s.clone())),
        Value::Number(n) => Some(Identifier::Number(n.clone())),
        _ => None,
    }
}

fn as_follower_metric(value: &Value) -> Option<FollowerMetric> {
    match value {
        Value::Number(n) => Some(match n.as_i64() {
            Some(count) => FollowerMetric::Count(count),
            None => FollowerMetric::Ratio(n.as_f64()?),
        }),
        Value::String(s) => Some(FollowerMetric::Text(s.clone())),
        _ => None,
    }
}
