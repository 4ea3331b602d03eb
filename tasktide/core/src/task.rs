use chrono::{DateTime, Duration, SubsecRound, Utc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::scoring;

/// Area of life a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Work,
    Personal,
    Health,
    Learning,
}

/// How important the owner considers a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Returned when a string does not name a known enum value.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown {kind} '{value}'")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Work,
        Category::Personal,
        Category::Health,
        Category::Learning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Health => "health",
            Category::Learning => "learning",
        }
    }
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "category",
                value: s.to_string(),
            })
    }
}

impl FromStr for Priority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "priority",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_ESTIMATE_HOURS: f64 = 1.0;

/// Input for creating a task. Defaults have already been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub estimate: f64,
    pub completed: bool,
}

impl NewTask {
    /// Creates an incomplete task input with the default estimate and no due date.
    pub fn new(title: impl Into<String>, category: Category, priority: Priority) -> Self {
        Self {
            title: title.into(),
            description: None,
            category,
            priority,
            due_date: None,
            estimate: DEFAULT_ESTIMATE_HOURS,
            completed: false,
        }
    }
}

/// A partial update. `None` leaves the field untouched; `due_date: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub estimate: Option<f64>,
    pub completed: Option<bool>,
}

/// A stored task.
///
/// The score and timestamps are owned by the task itself: every mutation goes
/// through a method that refreshes `updated_at` and recomputes `ai_score`.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) category: Category,
    pub(crate) priority: Priority,
    pub(crate) due_date: Option<DateTime<Utc>>,
    pub(crate) estimate: f64,
    pub(crate) completed: bool,
    pub(crate) completed_at: Option<DateTime<Utc>>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
    pub(crate) ai_score: u8,
}

impl Task {
    /// Builds a fresh task with a random id, both timestamps set to `now` and its score computed.
    pub fn new(new_task: NewTask, now: DateTime<Utc>) -> Self {
        let now = now.trunc_subsecs(3);
        let ai_score = scoring::score(new_task.priority, new_task.due_date, &new_task.title, now);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: new_task.title,
            description: new_task.description,
            category: new_task.category,
            priority: new_task.priority,
            due_date: new_task.due_date,
            estimate: new_task.estimate,
            completed: new_task.completed,
            completed_at: new_task.completed.then_some(now),
            created_at: now,
            updated_at: now,
            ai_score,
        }
    }

    /// Merges `changes` into the task.
    pub fn apply_changes(&mut self, changes: TaskChanges, now: DateTime<Utc>) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        if let Some(due_date) = changes.due_date {
            self.due_date = due_date;
        }
        if let Some(estimate) = changes.estimate {
            self.estimate = estimate;
        }
        if let Some(completed) = changes.completed {
            self.set_completed(completed, now);
        }
        self.touch(now);
    }

    /// Flips the completion flag.
    pub fn toggle_completed(&mut self, now: DateTime<Utc>) {
        self.set_completed(!self.completed, now);
        self.touch(now);
    }

    fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        if completed && !self.completed {
            self.completed_at = Some(now.trunc_subsecs(3));
        } else if !completed {
            self.completed_at = None;
        }
        self.completed = completed;
    }

    // `updated_at` must move forward even if the clock has not.
    fn touch(&mut self, now: DateTime<Utc>) {
        let now = now.trunc_subsecs(3);
        let floor = self.updated_at + Duration::milliseconds(1);
        self.updated_at = now.max(floor);
        self.ai_score = scoring::score(self.priority, self.due_date, &self.title, now);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Estimated effort in hours.
    pub fn estimate(&self) -> f64 {
        self.estimate
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn ai_score(&self) -> u8 {
        self.ai_score
    }
}
