//! Validated output variants, one per call site.

use std::fmt;
use std::str::FromStr;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::schema::{FieldKind, ObjectSchema, OutputSchema};

/// Typed output with a static schema.
///
/// The schema is attached verbatim to every request for that call site and
/// is the same value the response is validated against.
pub trait StructuredOutput: DeserializeOwned {
    fn schema() -> OutputSchema;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyAlert {
    pub has_anomaly: bool,
    pub alert_message: String,
}

impl AnomalyAlert {
    /// Alert synthesized locally when the KPI payload cannot be parsed.
    #[must_use]
    pub fn invalid_kpi_data(parse_error: &str) -> Self {
        Self {
            has_anomaly: true,
            alert_message: format!("Invalid KPI data format: {parse_error}"),
        }
    }
}

impl StructuredOutput for AnomalyAlert {
    fn schema() -> OutputSchema {
        OutputSchema {
            name: "anomaly_alert",
            root: ObjectSchema::new()
                .field("has_anomaly", FieldKind::Boolean)
                .field("alert_message", FieldKind::String),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuzzEstimates {
    pub mentions: i64,
    pub likes: i64,
    pub retweets: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuzzTweet {
    pub id: String,
    pub text: String,
    /// `None` when there is no history to anchor numbers to. The key is
    /// always present on the wire.
    pub estimates: Option<BuzzEstimates>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuzzTweetList {
    pub items: Vec<BuzzTweet>,
}

impl StructuredOutput for BuzzTweetList {
    fn schema() -> OutputSchema {
        let estimates = ObjectSchema::new()
            .field("mentions", FieldKind::integer(Some(0), None))
            .field("likes", FieldKind::integer(Some(0), None))
            .field("retweets", FieldKind::integer(Some(0), None));
        let item = ObjectSchema::new()
            .field("id", FieldKind::String)
            .field("text", FieldKind::String)
            .nullable_field("estimates", FieldKind::Object(estimates));

        OutputSchema {
            name: "buzz_tweet_list",
            root: ObjectSchema::new().field(
                "items",
                FieldKind::array_of(FieldKind::Object(item), None, None),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KolRecommendation {
    pub recommendation: String,
    pub fit_score: i64,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
}

impl StructuredOutput for KolRecommendation {
    fn schema() -> OutputSchema {
        OutputSchema {
            name: "kol_recommendation",
            root: ObjectSchema::new()
                .field("recommendation", FieldKind::String)
                .field("fit_score", FieldKind::integer(Some(1), Some(10)))
                .field(
                    "strengths",
                    FieldKind::array_of(FieldKind::String, Some(3), Some(5)),
                )
                .field(
                    "concerns",
                    FieldKind::array_of(FieldKind::String, Some(2), Some(4)),
                ),
        }
    }
}

/// Selects one of the output variants by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Anomaly,
    Buzz,
    Kol,
}

impl OutputKind {
    pub const ALL: [Self; 3] = [Self::Anomaly, Self::Buzz, Self::Kol];

    #[must_use]
    pub fn schema(self) -> OutputSchema {
        match self {
            Self::Anomaly => AnomalyAlert::schema(),
            Self::Buzz => BuzzTweetList::schema(),
            Self::Kol => KolRecommendation::schema(),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anomaly => "anomaly",
            Self::Buzz => "buzz",
            Self::Kol => "kol",
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anomaly" => Ok(Self::Anomaly),
            "buzz" => Ok(Self::Buzz),
            "kol" | "partnership" => Ok(Self::Kol),
            other => Err(format!(
                "unknown output kind '{other}' (expected anomaly, buzz or kol)"
            )),
        }
    }
}
