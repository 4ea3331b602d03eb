//! Nudges derived from the state of the whole task collection.

use chrono::{DateTime, Utc};

use crate::task::{Category, Priority, Task};

const CATEGORY_OVERLOAD_THRESHOLD: usize = 5;
const WORKLOAD_THRESHOLD_HOURS: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    Warning,
    Info,
    Suggestion,
    Motivation,
}

impl SuggestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionKind::Warning => "warning",
            SuggestionKind::Info => "info",
            SuggestionKind::Suggestion => "suggestion",
            SuggestionKind::Motivation => "motivation",
        }
    }
}

/// A human-readable nudge with a call to action.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub message: String,
    pub action: String,
    pub priority: Priority,
}

impl Suggestion {
    fn new(kind: SuggestionKind, message: String, action: &str, priority: Priority) -> Self {
        Self {
            kind,
            message,
            action: action.to_string(),
            priority,
        }
    }
}

/// Evaluates every suggestion rule against `tasks` as of `now`.
///
/// Rules are independent and always reported in the same order: overdue
/// tasks, high priority tasks without a due date, category overload, no
/// completions today and total workload.
pub fn generate_suggestions(tasks: &[Task], now: DateTime<Utc>) -> Vec<Suggestion> {
    let open: Vec<&Task> = tasks.iter().filter(|task| !task.is_completed()).collect();
    let mut suggestions = Vec::new();

    let overdue = open
        .iter()
        .filter(|task| task.due_date().is_some_and(|due| due < now))
        .count();
    if overdue > 0 {
        suggestions.push(Suggestion::new(
            SuggestionKind::Warning,
            format!(
                "You have {overdue} overdue task(s). Consider rescheduling or completing them soon."
            ),
            "View overdue tasks",
            Priority::High,
        ));
    }

    let undated_high_priority = open
        .iter()
        .filter(|task| task.priority() == Priority::High && task.due_date().is_none())
        .count();
    if undated_high_priority > 0 {
        suggestions.push(Suggestion::new(
            SuggestionKind::Info,
            format!(
                "You have {undated_high_priority} high priority task(s) without due dates. Consider setting deadlines."
            ),
            "Set due dates",
            Priority::Medium,
        ));
    }

    let (busiest, busiest_count) = dominant_category(&open);
    if busiest_count > CATEGORY_OVERLOAD_THRESHOLD {
        suggestions.push(Suggestion::new(
            SuggestionKind::Suggestion,
            format!(
                "You have many {busiest} tasks. Consider breaking them into smaller, manageable pieces."
            ),
            "Break down tasks",
            Priority::Low,
        ));
    }

    let today = now.date_naive();
    let completed_today = tasks
        .iter()
        .filter(|task| task.is_completed())
        .filter(|task| task.completed_at().unwrap_or(task.created_at()).date_naive() == today)
        .count();
    if completed_today == 0 && !open.is_empty() {
        suggestions.push(Suggestion::new(
            SuggestionKind::Motivation,
            "Start your day with a quick win! Complete a small task to build momentum.".to_string(),
            "Find quick tasks",
            Priority::Medium,
        ));
    }

    let workload: f64 = open.iter().map(|task| task.estimate()).sum();
    if workload > WORKLOAD_THRESHOLD_HOURS {
        suggestions.push(Suggestion::new(
            SuggestionKind::Warning,
            format!(
                "You have {workload} hours of estimated work. Consider prioritizing or delegating some tasks."
            ),
            "Review workload",
            Priority::High,
        ));
    }

    tracing::debug!(count = suggestions.len(), "Generated suggestions");
    suggestions
}

/// Category with the most open tasks. Ties go to the category seen later;
/// with no open tasks the answer is `personal` with a count of zero.
fn dominant_category(open: &[&Task]) -> (Category, usize) {
    let mut counts: Vec<(Category, usize)> = Vec::new();
    for task in open {
        match counts.iter_mut().find(|(category, _)| *category == task.category()) {
            Some((_, count)) => *count += 1,
            None => counts.push((task.category(), 1)),
        }
    }

    counts
        .into_iter()
        .fold((Category::Personal, 0), |best, candidate| {
            if best.1 > candidate.1 { best } else { candidate }
        })
}
