use std::{collections::HashMap, sync::OnceLock};

use regex::Regex;
use yaml_rust2::{
    parser::{Event, EventReceiver, Parser},
    scanner::{ScanError, TScalarStyle},
};

use super::timestamp::Timestamp;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum YamlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Timestamp(Timestamp),
    Seq(Vec<YamlValue>),
    Map(Mapping),
}

/// Insertion-ordered mapping. A repeated key replaces the earlier value in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Mapping(Vec<(YamlValue, YamlValue)>);

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: YamlValue, value: YamlValue) {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&YamlValue> {
        self.0.iter().find_map(|(k, v)| match k {
            YamlValue::Str(s) if s == key => Some(v),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(YamlValue, YamlValue)> {
        self.0.iter()
    }
}

impl YamlValue {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            YamlValue::Null => serde_json::Value::Null,
            YamlValue::Bool(b) => serde_json::Value::from(*b),
            YamlValue::Int(n) => serde_json::Value::from(*n),
            YamlValue::Float(f) => serde_json::Value::from(*f),
            YamlValue::Str(s) => serde_json::Value::from(s.as_str()),
            YamlValue::Timestamp(t) => serde_json::Value::from(t.to_iso_string()),
            YamlValue::Seq(items) => items.iter().map(YamlValue::to_json).collect(),
            YamlValue::Map(m) => serde_json::Value::Object(
                m.iter()
                    .map(|(k, v)| (k.key_text(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Text used when this value is a JSON object key.
    fn key_text(&self) -> String {
        match self {
            YamlValue::Str(s) => s.clone(),
            other => other.to_json().to_string(),
        }
    }
}

fn int_regex() -> &'static Regex {
    static INT: OnceLock<Regex> = OnceLock::new();
    INT.get_or_init(|| {
        Regex::new(r"^[-+]?(?:0b[01_]+|0x[0-9a-fA-F_]+|0[0-7_]+|0|[1-9][0-9_]*)$").unwrap()
    })
}

fn float_regex() -> &'static Regex {
    static FLOAT: OnceLock<Regex> = OnceLock::new();
    FLOAT.get_or_init(|| {
        Regex::new(r"^[-+]?(?:[0-9][0-9_]*\.[0-9_]*|\.[0-9_]+)(?:[eE][-+][0-9]+)?$").unwrap()
    })
}

fn parse_int(s: &str) -> Option<i64> {
    let cleaned = s.replace('_', "");
    let (negative, digits) = match cleaned.as_bytes().first() {
        Some(b'-') => (true, &cleaned[1..]),
        Some(b'+') => (false, &cleaned[1..]),
        _ => (false, cleaned.as_str()),
    };
    let magnitude = if let Some(bin) = digits.strip_prefix("0b") {
        i64::from_str_radix(bin, 2).ok()?
    } else if let Some(hex) = digits.strip_prefix("0x") {
        i64::from_str_radix(hex, 16).ok()?
    } else if digits.len() > 1 && digits.starts_with('0') {
        i64::from_str_radix(&digits[1..], 8).ok()?
    } else {
        digits.parse::<i64>().ok()?
    };
    Some(if negative { -magnitude } else { magnitude })
}

/// Resolves a plain scalar with the YAML 1.1 rules. Quoted, block and tagged scalars
/// are always strings.
pub(crate) fn resolve_scalar(value: String, style: TScalarStyle, tagged: bool) -> YamlValue {
    if style != TScalarStyle::Plain || tagged {
        return YamlValue::Str(value);
    }
    match value.as_str() {
        "" | "~" | "null" | "Null" | "NULL" => return YamlValue::Null,
        "yes" | "Yes" | "YES" | "true" | "True" | "TRUE" | "on" | "On" | "ON" => {
            return YamlValue::Bool(true)
        }
        "no" | "No" | "NO" | "false" | "False" | "FALSE" | "off" | "Off" | "OFF" => {
            return YamlValue::Bool(false)
        }
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => {
            return YamlValue::Float(f64::INFINITY)
        }
        "-.inf" | "-.Inf" | "-.INF" => return YamlValue::Float(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => return YamlValue::Float(f64::NAN),
        _ => {}
    }
    if int_regex().is_match(&value) {
        if let Some(n) = parse_int(&value) {
            return YamlValue::Int(n);
        }
    } else if float_regex().is_match(&value) {
        if let Ok(f) = value.replace('_', "").parse::<f64>() {
            return YamlValue::Float(f);
        }
    } else if let Some(t) = Timestamp::parse(&value) {
        return YamlValue::Timestamp(t);
    }
    YamlValue::Str(value)
}

enum Frame {
    Seq(Vec<YamlValue>, usize),
    Map(Mapping, Option<YamlValue>, usize),
}

#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Frame>,
    anchors: HashMap<usize, YamlValue>,
    root: Option<YamlValue>,
}

impl TreeBuilder {
    fn push_node(&mut self, node: YamlValue, anchor_id: usize) {
        if anchor_id != 0 {
            self.anchors.insert(anchor_id, node.clone());
        }
        match self.stack.last_mut() {
            None => {
                if self.root.is_none() {
                    self.root = Some(node);
                }
            }
            Some(Frame::Seq(items, _)) => items.push(node),
            Some(Frame::Map(map, pending_key, _)) => match pending_key.take() {
                Some(key) => map.insert(key, node),
                None => *pending_key = Some(node),
            },
        }
    }
}

impl EventReceiver for TreeBuilder {
    fn on_event(&mut self, ev: Event) {
        match ev {
            Event::Scalar(value, style, anchor_id, tag) => {
                let node = resolve_scalar(value, style, tag.is_some());
                self.push_node(node, anchor_id);
            }
            Event::Alias(id) => {
                let node = self.anchors.get(&id).cloned().unwrap_or(YamlValue::Null);
                self.push_node(node, 0);
            }
            Event::SequenceStart(anchor_id, ..) => self.stack.push(Frame::Seq(vec![], anchor_id)),
            Event::MappingStart(anchor_id, ..) => {
                self.stack.push(Frame::Map(Mapping::new(), None, anchor_id))
            }
            Event::SequenceEnd | Event::MappingEnd => match self.stack.pop() {
                Some(Frame::Seq(items, anchor_id)) => self.push_node(YamlValue::Seq(items), anchor_id),
                Some(Frame::Map(map, _, anchor_id)) => self.push_node(YamlValue::Map(map), anchor_id),
                None => {}
            },
            _ => {}
        }
    }
}

/// Loads the first YAML document in `source`. An empty document is `Null`.
pub(crate) fn load(source: &str) -> Result<YamlValue, ScanError> {
    let mut builder = TreeBuilder::default();
    let mut parser = Parser::new(source.chars());
    parser.load(&mut builder, false)?;
    Ok(builder.root.unwrap_or(YamlValue::Null))
}
