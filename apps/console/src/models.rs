use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::shaping::numeric_value;

#[derive(Clone, Debug, Serialize)]
pub struct PredictRequest<'a> {
    pub query_text: &'a str,
}

/// Body of `POST /v1/budget/predict`. Every field is optional so a partial
/// answer still renders.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub can_estimate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate_initial: Option<Value>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient_entries", skip_serializing_if = "Option::is_none")]
    pub topk: Option<Vec<TopkEntry>>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl PredictionResult {
    pub fn entries(&self) -> &[TopkEntry] {
        self.topk.as_deref().unwrap_or(&[])
    }

    pub fn currency_label(&self) -> &str {
        match self.currency.as_deref() {
            None | Some("JPY") => "円",
            Some(other) => other,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TopkEntry {
    #[serde(default)]
    pub rank: Value,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_budget: Option<Value>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub df_index: Option<i64>,
}

impl TopkEntry {
    pub fn rank_label(&self) -> String {
        match &self.rank {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    pub fn similarity_or_zero(&self) -> f64 {
        self.similarity.filter(|s| !s.is_nan()).unwrap_or(0.0)
    }
}

// Optional wire fields degrade to `None` on a type mismatch instead of
// failing the whole response.

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(numeric_value(&value))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        value @ (Value::Number(_) | Value::Bool(_)) => Some(value.to_string()),
        _ => None,
    })
}

/// Keeps every row that decodes, in delivered order.
fn lenient_entries<'de, D>(deserializer: D) -> Result<Option<Vec<TopkEntry>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

/// Raw record from `GET /v1/events/meta`; field names vary by source.
pub type EventMeta = Map<String, Value>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_budget: Option<Value>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
