use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::task::{Category, Priority, Task};

/// Productivity report over the whole task collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Analytics {
    pub overview: Overview,
    pub category_stats: BTreeMap<Category, Breakdown>,
    pub priority_stats: BTreeMap<Priority, Breakdown>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// Percentage of tasks completed, rounded. Zero for an empty collection.
    pub productivity_score: u8,
    /// Estimated hours of completed work.
    pub time_blocked: f64,
}

/// Task counts for one value of a dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Breakdown {
    pub total: usize,
    pub completed: usize,
}

impl Breakdown {
    fn record(&mut self, task: &Task) {
        self.total += 1;
        if task.is_completed() {
            self.completed += 1;
        }
    }
}

/// Builds the report. Only values that occur in `tasks` appear in the breakdowns.
pub fn build_analytics(tasks: &[Task], now: DateTime<Utc>) -> Analytics {
    let total_tasks = tasks.len();
    let completed_tasks = tasks.iter().filter(|task| task.is_completed()).count();
    let productivity_score = if total_tasks > 0 {
        (completed_tasks as f64 / total_tasks as f64 * 100.0).round() as u8
    } else {
        0
    };
    let time_blocked = tasks
        .iter()
        .filter(|task| task.is_completed())
        .fold(0.0, |hours, task| hours + task.estimate());

    let mut category_stats: BTreeMap<Category, Breakdown> = BTreeMap::new();
    let mut priority_stats: BTreeMap<Priority, Breakdown> = BTreeMap::new();
    for task in tasks {
        category_stats.entry(task.category()).or_default().record(task);
        priority_stats.entry(task.priority()).or_default().record(task);
    }

    Analytics {
        overview: Overview {
            total_tasks,
            completed_tasks,
            productivity_score,
            time_blocked,
        },
        category_stats,
        priority_stats,
        generated_at: now,
    }
}
