use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

/// Read access to one JSON record, trying each accepted key in order.
///
/// Every lookup is lenient: the first key that holds a usable value wins,
/// anything else falls back to the field's default.
pub(crate) struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    fn first(&self, keys: &[&str]) -> Option<&'a Value> {
        keys.iter()
            .filter_map(|k| self.map.get(*k))
            .find(|v| !v.is_null())
    }

    pub(crate) fn text(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|k| self.map.get(*k))
            .find_map(coerce_text)
    }

    pub(crate) fn amount(&self, keys: &[&str]) -> f64 {
        self.first(keys).map(coerce_amount).unwrap_or(0.0)
    }

    pub(crate) fn timestamp(&self, keys: &[&str]) -> Option<NaiveDateTime> {
        keys.iter()
            .filter_map(|k| self.map.get(*k))
            .filter_map(Value::as_str)
            .find_map(parse_timestamp)
    }

    pub(crate) fn integer(&self, keys: &[&str]) -> Option<i64> {
        match self.first(keys)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub(crate) fn array(&self, keys: &[&str]) -> &'a [Value] {
        self.first(keys)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Parse-or-zero: numbers pass through, numeric strings are parsed (thousands
/// separators allowed), everything else is 0.
pub fn coerce_amount(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Blank strings count as missing. Nested objects contribute their `name`.
fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Object(o) => o.get("name").and_then(coerce_text),
        _ => None,
    }
}

/// Accepts RFC 3339, naive ISO datetimes (`T` or space separated) and plain
/// dates. Offsets are dropped, keeping the wall-clock time the server sent.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
