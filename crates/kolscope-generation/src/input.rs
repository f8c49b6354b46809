//! Typed request inputs for the three pipelines.
//!
//! Each `from_json` checks the raw body once and reports the first problem
//! as [`PipelineError::InvalidInput`].

use serde_json::{Map, Value};

use crate::error::PipelineError;

/// Window used for partnership baselines when the caller gives none.
pub const DEFAULT_KOL_WINDOW_DAYS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnomalyInput {
    /// KPI data as the caller sent it. Parsed later by the pipeline.
    pub kpi_data: String,
    pub description: String,
}

impl AnomalyInput {
    /// # Errors
    ///
    /// [`PipelineError::InvalidInput`] when `kpiData` or `description` is
    /// missing or not a string.
    pub fn from_json(body: &Value) -> Result<Self, PipelineError> {
        let obj = as_object(body)?;
        Ok(Self {
            kpi_data: required_string(obj, "kpiData")?,
            description: required_string(obj, "description")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuzzInput {
    pub twitter_id: String,
    pub tone: String,
    pub count: u64,
    pub analytics: Value,
}

impl BuzzInput {
    /// # Errors
    ///
    /// [`PipelineError::InvalidInput`] when a field is missing, `count` is
    /// not a positive integer, or `analytics` is not an object.
    pub fn from_json(body: &Value) -> Result<Self, PipelineError> {
        let obj = as_object(body)?;

        let twitter_id = match obj.get("twitterId") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(invalid("twitterId is required")),
        };
        let tone = required_string(obj, "tone")?;
        let count = match obj.get("count") {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
            _ => None,
        }
        .filter(|c| *c > 0)
        .ok_or_else(|| invalid("count must be a positive integer"))?;

        let analytics = match obj.get("analytics") {
            Some(v @ Value::Object(_)) => v.clone(),
            _ => return Err(invalid("analytics must be an object")),
        };

        Ok(Self {
            twitter_id,
            tone,
            count,
            analytics,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KolInput {
    pub kol_data: Value,
    pub brand_goals: Vec<Value>,
    pub window_days: u64,
}

impl KolInput {
    /// # Errors
    ///
    /// [`PipelineError::InvalidInput`] when `kol_data` is not an object,
    /// `brand_goals` is not a non-empty array, or `window_days` is given but
    /// is not a positive integer.
    pub fn from_json(body: &Value) -> Result<Self, PipelineError> {
        let obj = as_object(body)?;

        let kol_data = match obj.get("kol_data") {
            Some(v @ Value::Object(_)) => v.clone(),
            _ => return Err(invalid("kol_data must be an object")),
        };
        let brand_goals = match obj.get("brand_goals") {
            Some(Value::Array(goals)) if !goals.is_empty() => goals.clone(),
            _ => return Err(invalid("brand_goals must be a non-empty array")),
        };
        let window_days = match obj.get("window_days") {
            None | Some(Value::Null) => DEFAULT_KOL_WINDOW_DAYS,
            Some(v) => v
                .as_u64()
                .filter(|d| *d > 0)
                .ok_or_else(|| invalid("window_days must be a positive integer"))?,
        };

        Ok(Self {
            kol_data,
            brand_goals,
            window_days,
        })
    }
}

fn invalid(msg: impl Into<String>) -> PipelineError {
    PipelineError::InvalidInput(msg.into())
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, PipelineError> {
    body.as_object()
        .ok_or_else(|| invalid("request body must be a JSON object"))
}

fn required_string(obj: &Map<String, Value>, key: &str) -> Result<String, PipelineError> {
    match obj.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(invalid(format!("{key} must be a string"))),
        None => Err(invalid(format!("{key} is required"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn invalid_message(err: PipelineError) -> String {
        match err {
            PipelineError::InvalidInput(msg) => msg,
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn anomaly_input_requires_string_fields() {
        let ok = AnomalyInput::from_json(&json!({"kpiData": "{not json", "description": "d"})).unwrap();
        assert_eq!(ok.kpi_data, "{not json");

        let missing = AnomalyInput::from_json(&json!({"description": "d"})).unwrap_err();
        assert_eq!(invalid_message(missing), "kpiData is required");

        let wrong_type = AnomalyInput::from_json(&json!({"kpiData": {"a": 1}, "description": "d"}))
            .unwrap_err();
        assert_eq!(invalid_message(wrong_type), "kpiData must be a string");
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = AnomalyInput::from_json(&json!([1])).unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn buzz_input_accepts_numeric_id_and_string_count() {
        let input = BuzzInput::from_json(&json!({
            "twitterId": 12345,
            "tone": "playful",
            "count": "3",
            "analytics": {}
        }))
        .unwrap();
        assert_eq!(input.twitter_id, "12345");
        assert_eq!(input.count, 3);
    }

    #[test]
    fn buzz_count_accepts_any_positive_integer() {
        for (count, expected) in [(json!(1), 1), (json!(21), 21), (json!(500), 500), (json!("40"), 40)] {
            let input = BuzzInput::from_json(&json!({
                "twitterId": "brand",
                "tone": "calm",
                "count": count,
                "analytics": {}
            }))
            .unwrap();
            assert_eq!(input.count, expected);
        }
    }

    #[test]
    fn buzz_count_must_be_positive_integer() {
        for count in [json!(0), json!(-1), json!(2.5), json!("many"), json!(null)] {
            let err = BuzzInput::from_json(&json!({
                "twitterId": "brand",
                "tone": "calm",
                "count": count,
                "analytics": {}
            }))
            .unwrap_err();
            assert_eq!(invalid_message(err), "count must be a positive integer");
        }
    }

    #[test]
    fn buzz_analytics_must_be_object() {
        let err = BuzzInput::from_json(&json!({
            "twitterId": "brand",
            "tone": "calm",
            "count": 2,
            "analytics": [1, 2]
        }))
        .unwrap_err();
        assert_eq!(invalid_message(err), "analytics must be an object");
    }

    #[test]
    fn buzz_blank_twitter_id_is_rejected() {
        let err = BuzzInput::from_json(&json!({
            "twitterId": "  ",
            "tone": "calm",
            "count": 2,
            "analytics": {}
        }))
        .unwrap_err();
        assert_eq!(invalid_message(err), "twitterId is required");
    }

    #[test]
    fn kol_input_validates_goals_and_window() {
        let ok = KolInput::from_json(&json!({"kol_data": {}, "brand_goals": ["awareness"]})).unwrap();
        assert_eq!(ok.window_days, DEFAULT_KOL_WINDOW_DAYS);

        let custom = KolInput::from_json(&json!({
            "kol_data": {},
            "brand_goals": ["awareness"],
            "window_days": 7
        }))
        .unwrap();
        assert_eq!(custom.window_days, 7);

        let empty_goals = KolInput::from_json(&json!({"kol_data": {}, "brand_goals": []})).unwrap_err();
        assert_eq!(invalid_message(empty_goals), "brand_goals must be a non-empty array");

        let bad_data = KolInput::from_json(&json!({"kol_data": "x", "brand_goals": ["a"]})).unwrap_err();
        assert_eq!(invalid_message(bad_data), "kol_data must be an object");

        let bad_window = KolInput::from_json(&json!({
            "kol_data": {},
            "brand_goals": ["a"],
            "window_days": 0
        }))
        .unwrap_err();
        assert_eq!(invalid_message(bad_window), "window_days must be a positive integer");
    }
}
