//! Schema validation for task payloads.
//!
//! Payloads arrive as untyped JSON so that every violation can be reported at
//! once instead of stopping at the first field serde rejects.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::task::{Category, DEFAULT_ESTIMATE_HOURS, NewTask, Priority, TaskChanges};

pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;
pub const ESTIMATE_MIN_HOURS: f64 = 0.5;
pub const ESTIMATE_MAX_HOURS: f64 = 24.0;

const KNOWN_FIELDS: [&str; 7] = [
    "title",
    "description",
    "category",
    "priority",
    "dueDate",
    "estimate",
    "completed",
];

/// Every schema violation found in a payload, in field order.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Validation error: {}", details.join(", "))]
pub struct ValidationError {
    pub details: Vec<String>,
}

impl ValidationError {
    pub fn new(details: Vec<String>) -> Self {
        Self { details }
    }
}

impl NewTask {
    /// Validates a create payload, applying defaults for optional fields.
    pub fn from_json(payload: &Value) -> Result<Self, ValidationError> {
        let mut fields = Fields::new(payload)?;

        let title = fields.title(true);
        let description = fields.description();
        let category = fields.one_of("category", true);
        let priority = fields.one_of("priority", true);
        let due_date = fields.due_date();
        let estimate = fields.estimate();
        let completed = fields.completed();
        fields.reject_unknown();

        match (title, category, priority) {
            (Some(title), Some(category), Some(priority)) if fields.is_valid() => Ok(NewTask {
                title,
                description,
                category,
                priority,
                due_date: due_date.flatten(),
                estimate: estimate.unwrap_or(DEFAULT_ESTIMATE_HOURS),
                completed: completed.unwrap_or(false),
            }),
            _ => Err(fields.into_error()),
        }
    }
}

impl TaskChanges {
    /// Validates an update payload. Every field is optional and no defaults apply.
    pub fn from_json(payload: &Value) -> Result<Self, ValidationError> {
        let mut fields = Fields::new(payload)?;

        let changes = TaskChanges {
            title: fields.title(false),
            description: fields.description(),
            category: fields.one_of("category", false),
            priority: fields.one_of("priority", false),
            due_date: fields.due_date(),
            estimate: fields.estimate(),
            completed: fields.completed(),
        };
        fields.reject_unknown();

        if fields.is_valid() {
            Ok(changes)
        } else {
            Err(fields.into_error())
        }
    }
}

/// Parses the ISO 8601 forms accepted for due dates.
///
/// Offset-less values are taken as UTC; a bare date means midnight UTC.
pub fn parse_iso_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

struct Fields<'a> {
    map: &'a Map<String, Value>,
    details: Vec<String>,
}

impl<'a> Fields<'a> {
    fn new(payload: &'a Value) -> Result<Self, ValidationError> {
        match payload {
            Value::Object(map) => Ok(Self {
                map,
                details: Vec::new(),
            }),
            _ => Err(ValidationError::new(vec![
                "\"value\" must be of type object".to_string(),
            ])),
        }
    }

    fn fail(&mut self, key: &str, problem: &str) {
        self.details.push(format!("\"{key}\" {problem}"));
    }

    fn present(&mut self, key: &str, required: bool) -> Option<&'a Value> {
        let map = self.map;
        let value = map.get(key);
        if value.is_none() && required {
            self.fail(key, "is required");
        }
        value
    }

    fn title(&mut self, required: bool) -> Option<String> {
        match self.present("title", required)? {
            Value::String(title) if title.is_empty() => {
                self.fail("title", "is not allowed to be empty");
                None
            }
            Value::String(title) if title.chars().count() > TITLE_MAX_CHARS => {
                self.fail(
                    "title",
                    &format!("length must be less than or equal to {TITLE_MAX_CHARS} characters long"),
                );
                None
            }
            Value::String(title) => Some(title.clone()),
            _ => {
                self.fail("title", "must be a string");
                None
            }
        }
    }

    fn description(&mut self) -> Option<String> {
        match self.present("description", false)? {
            Value::String(text) if text.chars().count() > DESCRIPTION_MAX_CHARS => {
                self.fail(
                    "description",
                    &format!(
                        "length must be less than or equal to {DESCRIPTION_MAX_CHARS} characters long"
                    ),
                );
                None
            }
            Value::String(text) => Some(text.clone()),
            _ => {
                self.fail("description", "must be a string");
                None
            }
        }
    }

    fn one_of<T: Choice>(&mut self, key: &str, required: bool) -> Option<T> {
        let value = self.present(key, required)?;
        let parsed = value.as_str().and_then(|raw| raw.parse::<T>().ok());
        if parsed.is_none() {
            self.fail(key, &format!("must be one of [{}]", T::names().join(", ")));
        }
        parsed
    }

    fn due_date(&mut self) -> Option<Option<DateTime<Utc>>> {
        match self.present("dueDate", false)? {
            Value::Null => Some(None),
            Value::String(raw) => match parse_iso_date(raw) {
                Some(due_date) => Some(Some(due_date)),
                None => {
                    self.fail("dueDate", "must be in ISO 8601 date format");
                    None
                }
            },
            _ => {
                self.fail("dueDate", "must be in ISO 8601 date format");
                None
            }
        }
    }

    fn estimate(&mut self) -> Option<f64> {
        let value = self.present("estimate", false)?;
        let hours = match value {
            Value::Number(number) => number.as_f64(),
            Value::String(raw) => raw.trim().parse::<f64>().ok().filter(|hours| hours.is_finite()),
            _ => None,
        };
        match hours {
            None => {
                self.fail("estimate", "must be a number");
                None
            }
            Some(hours) if hours < ESTIMATE_MIN_HOURS => {
                self.fail(
                    "estimate",
                    &format!("must be greater than or equal to {ESTIMATE_MIN_HOURS}"),
                );
                None
            }
            Some(hours) if hours > ESTIMATE_MAX_HOURS => {
                self.fail(
                    "estimate",
                    &format!("must be less than or equal to {ESTIMATE_MAX_HOURS}"),
                );
                None
            }
            Some(hours) => Some(hours),
        }
    }

    fn completed(&mut self) -> Option<bool> {
        match self.present("completed", false)? {
            Value::Bool(completed) => Some(*completed),
            Value::String(raw) if raw == "true" => Some(true),
            Value::String(raw) if raw == "false" => Some(false),
            _ => {
                self.fail("completed", "must be a boolean");
                None
            }
        }
    }

    fn reject_unknown(&mut self) {
        let map = self.map;
        let unknown: Vec<&String> = map
            .keys()
            .filter(|key| !KNOWN_FIELDS.contains(&key.as_str()))
            .collect();
        for key in unknown {
            self.fail(key, "is not allowed");
        }
    }

    fn is_valid(&self) -> bool {
        self.details.is_empty()
    }

    fn into_error(self) -> ValidationError {
        ValidationError::new(self.details)
    }
}

trait Choice: std::str::FromStr {
    fn names() -> Vec<&'static str>;
}

impl Choice for Category {
    fn names() -> Vec<&'static str> {
        Category::ALL.iter().map(Category::as_str).collect()
    }
}

impl Choice for Priority {
    fn names() -> Vec<&'static str> {
        Priority::ALL.iter().map(Priority::as_str).collect()
    }
}
