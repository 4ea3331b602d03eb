//! Urgency scoring.
//!
//! A task's score is a hand-tuned sum of three terms: a base for its priority,
//! a bonus for how soon it is due and a flat bonus when its title contains an
//! urgency keyword. Two variants exist: [`score`] is what stored tasks carry,
//! [`score_weighted_by_category`] additionally scales the sum by a per-category
//! weight and is used only for ad-hoc prioritisation of caller-supplied tasks.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::task::{Category, Priority};
use crate::validation::parse_iso_date;

pub const MAX_SCORE: u8 = 100;

const URGENT_KEYWORDS: [&str; 5] = ["urgent", "asap", "immediately", "deadline", "critical"];
const KEYWORD_BONUS: u32 = 15;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Scores a task from its priority, due date and title as of `now`.
pub fn score(priority: Priority, due_date: Option<DateTime<Utc>>, title: &str, now: DateTime<Utc>) -> u8 {
    let raw = base_score(priority) + urgency_bonus(due_date, now) + keyword_bonus(title);
    raw.min(u32::from(MAX_SCORE)) as u8
}

/// Same terms as [`score`], scaled by the category weight and rounded.
///
/// An unknown priority contributes no base score and an unknown category
/// weighs 1.0.
pub fn score_weighted_by_category(
    priority: Option<Priority>,
    category: Option<Category>,
    due_date: Option<DateTime<Utc>>,
    title: &str,
    now: DateTime<Utc>,
) -> u8 {
    let raw = priority.map_or(0, base_score) + urgency_bonus(due_date, now) + keyword_bonus(title);
    let weighted = (f64::from(raw) * category.map_or(1.0, category_weight)).round();
    weighted.min(f64::from(MAX_SCORE)) as u8
}

/// Whole days until `due_date`, rounded up. Negative when overdue.
fn days_until_due(due_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (due_date - now).num_milliseconds() as f64;
    (millis / MILLIS_PER_DAY).ceil() as i64
}

/// Re-scores loosely typed task objects and orders them from most to least urgent.
///
/// Every element keeps its original fields; only `aiScore` is replaced. Elements
/// that are not objects are treated as empty tasks.
pub fn prioritize(tasks: Vec<Value>, now: DateTime<Utc>) -> Vec<Value> {
    let mut scored: Vec<(u8, Value)> = tasks
        .into_iter()
        .map(|task| {
            let mut object = match task {
                Value::Object(map) => map,
                _ => serde_json::Map::new(),
            };
            let priority = object
                .get("priority")
                .and_then(Value::as_str)
                .and_then(|raw| raw.parse().ok());
            let category = object
                .get("category")
                .and_then(Value::as_str)
                .and_then(|raw| raw.parse().ok());
            let due_date = object.get("dueDate").and_then(loose_due_date);
            let title = object.get("title").and_then(Value::as_str).unwrap_or_default();

            let ai_score = score_weighted_by_category(priority, category, due_date, title, now);
            object.insert("aiScore".to_string(), Value::from(ai_score));
            (ai_score, Value::Object(object))
        })
        .collect();

    scored.sort_by(|(a, _), (b, _)| b.cmp(a));
    scored.into_iter().map(|(_, task)| task).collect()
}

fn loose_due_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => parse_iso_date(raw),
        Value::Number(millis) => millis.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn base_score(priority: Priority) -> u32 {
    match priority {
        Priority::High => 30,
        Priority::Medium => 20,
        Priority::Low => 10,
    }
}

fn category_weight(category: Category) -> f64 {
    match category {
        Category::Work => 1.2,
        Category::Health => 1.1,
        Category::Learning => 1.0,
        Category::Personal => 0.9,
    }
}

fn urgency_bonus(due_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u32 {
    match due_date.map(|due| days_until_due(due, now)) {
        Some(days) if days <= 1 => 20,
        Some(days) if days <= 3 => 15,
        Some(days) if days <= 7 => 10,
        _ => 0,
    }
}

fn keyword_bonus(title: &str) -> u32 {
    let title = title.to_lowercase();
    if URGENT_KEYWORDS.iter().any(|keyword| title.contains(keyword)) {
        KEYWORD_BONUS
    } else {
        0
    }
}
