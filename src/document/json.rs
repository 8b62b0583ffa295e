//! JSON conversion using the extended-JSON date convention
//!
//! Dates are written as `{"$date": "<RFC 3339>"}`. On input a `$date`
//! wrapper may also hold milliseconds since the Unix epoch.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde_json::{Map, Value as Json};

use super::errors::{DocumentError, DocumentResult};
use super::value::{Document, Value};

const DATE_KEY: &str = "$date";

impl Document {
    /// Converts a JSON object into a document.
    pub fn from_json(json: &Json) -> DocumentResult<Self> {
        match json {
            Json::Object(map) => object_from_json(map, ""),
            other => Err(DocumentError::NotAnObject(json_type_name(other))),
        }
    }

    /// Converts the document into JSON, dates as `$date` wrappers.
    pub fn to_json(&self) -> Json {
        let mut map = Map::with_capacity(self.len());
        for (key, value) in self.iter() {
            map.insert(key.to_string(), value.to_json());
        }
        Json::Object(map)
    }
}

impl Value {
    pub fn to_json(&self) -> Json {
        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(n) => Json::from(*n),
            Value::Double(n) => serde_json::Number::from_f64(*n)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::String(s) => Json::String(s.clone()),
            Value::Date(d) => {
                let mut wrapper = Map::with_capacity(1);
                wrapper.insert(
                    DATE_KEY.to_string(),
                    Json::String(d.to_rfc3339_opts(SecondsFormat::Millis, true)),
                );
                Json::Object(wrapper)
            }
            Value::Document(d) => d.to_json(),
            Value::Array(items) => Json::Array(items.iter().map(Value::to_json).collect()),
        }
    }
}

fn object_from_json(map: &Map<String, Json>, path: &str) -> DocumentResult<Document> {
    // JSON object keys are unique
    let mut doc = Document::with_capacity(map.len());
    for (key, json) in map {
        let field_path = make_path(path, key);
        doc.push_unique(key.clone(), value_from_json(json, &field_path)?);
    }
    Ok(doc)
}

fn value_from_json(json: &Json, path: &str) -> DocumentResult<Value> {
    Ok(match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(f) = n.as_f64() {
                Value::Double(f)
            } else {
                return Err(DocumentError::InvalidNumber(path.to_string()));
            }
        }
        Json::String(s) => Value::String(s.clone()),
        Json::Array(items) => Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| value_from_json(item, &format!("{}[{}]", path, i)))
                .collect::<DocumentResult<_>>()?,
        ),
        Json::Object(map) => match map.get(DATE_KEY) {
            Some(raw) if map.len() == 1 => Value::Date(parse_date(raw, path)?),
            _ => Value::Document(object_from_json(map, path)?),
        },
    })
}

fn parse_date(raw: &Json, path: &str) -> DocumentResult<DateTime<Utc>> {
    let invalid = |reason: String| DocumentError::InvalidDate {
        path: path.to_string(),
        reason,
    };

    match raw {
        Json::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|d| d.with_timezone(&Utc))
            .map_err(|e| invalid(e.to_string())),
        Json::Number(n) => {
            let millis = n
                .as_i64()
                .ok_or_else(|| invalid("milliseconds must be an integer".into()))?;
            Utc.timestamp_millis_opt(millis)
                .single()
                .ok_or_else(|| invalid(format!("{} is out of range", millis)))
        }
        other => Err(invalid(format!(
            "expected string or integer, got {}",
            json_type_name(other)
        ))),
    }
}

fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

fn json_type_name(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
