//! Declarative field validation.
//!
//! Each business field is described by a [`FieldRules`] row in [`NEWS_RULES`].
//! [`validate`] walks the table against a raw JSON payload and collects every
//! violated rule per field. Create and replace apply the table with
//! [`Presence::Always`]; patch applies it with [`Presence::Sometimes`], so a
//! row only fires when its key was sent.
//!
//! String values are trimmed once by [`trim_strings`] before any rule runs, so
//! the checked, looked-up and stored values are the same string.
//!
//! Uniqueness needs the store, so the validator only reports which values must
//! be looked up ([`UniqueCheck`]); the service resolves them.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    String,
    Url,
    Date,
    /// Upper bound on string length, in characters.
    Max(usize),
    Unique,
}

impl Rule {
    pub fn message(self, field: &str) -> String {
        let attr = field.replace('_', " ");
        match self {
            Rule::Required => format!("The {attr} field is required."),
            Rule::String => format!("The {attr} field must be a string."),
            Rule::Url => format!("The {attr} field must be a valid URL."),
            Rule::Date => format!("The {attr} field must be a valid date."),
            Rule::Max(n) => format!("The {attr} field must not be greater than {n} characters."),
            Rule::Unique => format!("The {attr} has already been taken."),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRules {
    pub field: &'static str,
    pub rules: &'static [Rule],
}

const TEXT: &[Rule] = &[Rule::Required, Rule::String];

/// Width of the `url` and `url_image` columns.
pub const URL_MAX_LEN: usize = 2048;

/// Base rule set for a news item, in payload order.
pub const NEWS_RULES: &[FieldRules] = &[
    FieldRules { field: "title", rules: TEXT },
    FieldRules { field: "author", rules: TEXT },
    FieldRules { field: "description", rules: TEXT },
    FieldRules { field: "content", rules: TEXT },
    FieldRules { field: "url", rules: &[Rule::Required, Rule::Max(URL_MAX_LEN), Rule::Url, Rule::Unique] },
    FieldRules { field: "url_image", rules: &[Rule::Required, Rule::Max(URL_MAX_LEN), Rule::Url] },
    FieldRules { field: "published_at", rules: &[Rule::Required, Rule::Date] },
    FieldRules { field: "category", rules: TEXT },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Every row applies; absent keys fail `Required`.
    Always,
    /// A row applies only when its key is present in the payload.
    Sometimes,
}

/// Field name to violated-rule messages. Serializes as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self { Self::default() }

    pub fn single(field: &str, message: String) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: String) {
        self.0.entry(field.to_string()).or_default().push(message);
    }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn contains(&self, field: &str) -> bool { self.0.contains_key(field) }

    pub fn get(&self, field: &str) -> Option<&[String]> { self.0.get(field).map(Vec::as_slice) }

    pub fn fields(&self) -> impl Iterator<Item = &str> { self.0.keys().map(String::as_str) }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for m in messages {
                if !first { f.write_str("; ")?; }
                write!(f, "{field}: {m}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// A value that passed the synchronous rules and still needs a store lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueCheck {
    pub field: &'static str,
    pub value: String,
}

#[derive(Debug, Default)]
pub struct Outcome {
    pub errors: FieldErrors,
    pub unique_checks: Vec<UniqueCheck>,
}

/// Apply `table` to `payload`. Keys outside the table are never inspected.
pub fn validate(payload: &Map<String, Value>, table: &[FieldRules], presence: Presence) -> Outcome {
    let mut out = Outcome::default();

    for row in table {
        let value = payload.get(row.field);
        if presence == Presence::Sometimes && value.is_none() {
            continue;
        }
        let Some(value) = value.filter(|v| !is_missing(v)) else {
            if row.rules.contains(&Rule::Required) {
                out.errors.add(row.field, Rule::Required.message(row.field));
            }
            continue;
        };

        for &rule in row.rules {
            let ok = match rule {
                Rule::Required => true,
                Rule::String => value.is_string(),
                Rule::Url => value.as_str().is_some_and(is_valid_url),
                Rule::Date => value.as_str().and_then(parse_date).is_some(),
                Rule::Max(n) => value.as_str().map_or(true, |s| s.chars().count() <= n),
                Rule::Unique => {
                    if let Some(s) = value.as_str() {
                        out.unique_checks.push(UniqueCheck { field: row.field, value: s.to_string() });
                    }
                    true
                }
            };
            if !ok {
                out.errors.add(row.field, rule.message(row.field));
            }
        }
    }

    out
}

/// Copy of `payload` with every top-level string trimmed.
pub fn trim_strings(payload: &Map<String, Value>) -> Map<String, Value> {
    payload
        .iter()
        .map(|(k, v)| match v {
            Value::String(s) => (k.clone(), Value::String(s.trim().to_string())),
            other => (k.clone(), other.clone()),
        })
        .collect()
}

/// Absent, `null`, or blank strings count as missing.
fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}

/// Absolute URL with a host.
pub fn is_valid_url(s: &str) -> bool {
    match url::Url::parse(s) {
        Ok(u) => u.has_host(),
        Err(_) => false,
    }
}

/// Parse the accepted date forms into a naive timestamp; plain dates become midnight.
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().and_then(|d| d.and_hms_opt(0, 0, 0))
}
