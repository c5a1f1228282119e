use serde::Serialize;

use crate::metadata::{Timestamp, YamlValue};

/// One entry of `articles.json`. Field order is the serialized key order.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub(crate) struct ArticleRecord {
    pub slug: String,
    pub title: serde_json::Value,
    pub date: String,
    pub image: serde_json::Value,
    pub thumbnail: serde_json::Value,
}

/// The `date` field as found in front matter.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DateValue {
    Text(String),
    Native(Timestamp),
}

impl DateValue {
    pub fn from_yaml(value: &YamlValue) -> Self {
        match value {
            YamlValue::Timestamp(t) => DateValue::Native(t.clone()),
            YamlValue::Str(s) => DateValue::Text(s.clone()),
            YamlValue::Int(n) => DateValue::Text(n.to_string()),
            YamlValue::Float(f) => DateValue::Text(f.to_string()),
            YamlValue::Bool(b) => DateValue::Text(b.to_string()),
            YamlValue::Null | YamlValue::Seq(_) | YamlValue::Map(_) => DateValue::Text(String::new()),
        }
    }

    /// Native values in canonical ISO-8601 form; text as written.
    pub fn to_iso_string(&self) -> String {
        match self {
            DateValue::Text(s) => s.clone(),
            DateValue::Native(t) => t.to_iso_string(),
        }
    }
}
