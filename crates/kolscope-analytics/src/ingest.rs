//! Ingestion adapter: loosely-keyed post objects to [`EngagementRecord`].
//!
//! Upstream sources disagree on key names (`likes` vs `like_count`, a nested
//! `public_metrics` object, string ids vs integer ids). All of that is
//! resolved here, once, so nothing else has to probe multiple keys.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::types::EngagementRecord;

const ID_KEYS: &[&str] = &["id", "tweet_id", "id_str"];
const TEXT_KEYS: &[&str] = &["text", "full_text"];
const LIKE_KEYS: &[&str] = &["likes", "like_count", "favorite_count"];
const RETWEET_KEYS: &[&str] = &["retweets", "retweet_count", "shares"];
const REPLY_KEYS: &[&str] = &["replies", "reply_count"];
const QUOTE_KEYS: &[&str] = &["quotes", "quote_count"];

/// Normalize one raw post. Returns `None` when `value` is not a JSON object.
#[must_use]
pub fn normalize_record(value: &Value) -> Option<EngagementRecord> {
    let obj = value.as_object()?;

    Some(EngagementRecord {
        id: read_id(obj),
        text: TEXT_KEYS
            .iter()
            .find_map(|k| obj.get(*k).and_then(Value::as_str))
            .unwrap_or_default()
            .to_string(),
        likes: read_count(obj, LIKE_KEYS, "like_count"),
        retweets: read_count(obj, RETWEET_KEYS, "retweet_count"),
        replies: read_count(obj, REPLY_KEYS, "reply_count"),
        quotes: read_count(obj, QUOTE_KEYS, "quote_count"),
    })
}

/// Normalize a raw post array.
///
/// Absent or non-array input yields an empty `Vec`; elements that are not
/// objects are skipped.
#[must_use]
pub fn normalize_records(value: Option<&Value>) -> Vec<EngagementRecord> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    let records: Vec<EngagementRecord> = items.iter().filter_map(normalize_record).collect();
    if records.len() != items.len() {
        tracing::debug!(
            skipped = items.len() - records.len(),
            "skipped non-object entries in record array"
        );
    }
    records
}

fn read_id(obj: &Map<String, Value>) -> String {
    ID_KEYS
        .iter()
        .find_map(|k| match obj.get(*k) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

fn read_count(obj: &Map<String, Value>, keys: &[&str], metric: &str) -> u64 {
    keys.iter()
        .find_map(|k| obj.get(*k).and_then(as_count))
        .or_else(|| {
            obj.get("public_metrics")
                .and_then(Value::as_object)
                .and_then(|m| m.get(metric))
                .and_then(as_count)
        })
        .unwrap_or(0)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// serde helpers
// ---------------------------------------------------------------------------

pub(crate) fn deserialize_records<'de, D>(deserializer: D) -> Result<Vec<EngagementRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(normalize_records(Some(&raw)))
}

pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(as_count(&raw).unwrap_or(0))
}

pub(crate) fn lenient_float<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(as_float(&raw).unwrap_or(0.0))
}

pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::Bool(b) => b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_u64().is_some_and(|n| n != 0),
        _ => false,
    })
}

pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Array of `T`; a non-array reads as empty and unreadable elements are
/// skipped, so one bad entry never takes its siblings down with it.
pub(crate) fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let raw = Value::deserialize(deserializer)?;
    let items = match raw {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        _ => {
            tracing::debug!("expected an array; reading as empty");
            return Ok(Vec::new());
        }
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}
