use std::cmp::Ordering;

use crate::task::Task;

/// Listing filters, combined with logical AND. `None` means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub category: Option<String>,
    pub priority: Option<String>,
    pub completed: Option<bool>,
}

impl TaskFilter {
    /// Builds a filter from raw query-string values.
    ///
    /// An empty value or `"all"` disables the category/priority filter. Any
    /// `completed` value other than the literal `"true"` selects incomplete tasks.
    pub fn from_query(category: Option<&str>, priority: Option<&str>, completed: Option<&str>) -> Self {
        Self {
            category: selective(category),
            priority: selective(priority),
            completed: completed.map(|raw| raw == "true"),
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.category
            .as_deref()
            .is_none_or(|category| task.category().as_str() == category)
            && self
                .priority
                .as_deref()
                .is_none_or(|priority| task.priority().as_str() == priority)
            && self
                .completed
                .is_none_or(|completed| task.is_completed() == completed)
    }

    pub fn apply(&self, tasks: Vec<Task>) -> Vec<Task> {
        tasks.into_iter().filter(|task| self.matches(task)).collect()
    }
}

fn selective(raw: Option<&str>) -> Option<String> {
    raw.filter(|value| !value.is_empty() && *value != "all")
        .map(str::to_string)
}

/// Orders tasks for display: open work first, most urgent first.
pub fn sort_for_listing(tasks: &mut [Task]) {
    tasks.sort_by(listing_order);
}

// Dated tasks come before undated ones on a score tie, so the order stays total.
fn listing_order(a: &Task, b: &Task) -> Ordering {
    a.is_completed()
        .cmp(&b.is_completed())
        .then_with(|| b.ai_score().cmp(&a.ai_score()))
        .then_with(|| match (a.due_date(), b.due_date()) {
            (Some(a_due), Some(b_due)) => a_due.cmp(&b_due),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| b.created_at().cmp(&a.created_at()))
}
