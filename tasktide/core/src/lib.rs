//! Core domain models and task logic for TaskTide.
//!
//! Everything in this crate is free of HTTP concerns: the task model and its
//! validation, the urgency scoring heuristic, listing filters, the suggestion
//! and analytics reports, and the repository abstraction the web layer stores
//! tasks through.
pub mod analytics;
pub mod clock;
pub mod query;
pub mod repository;
pub mod scoring;
pub mod service;
pub mod suggestions;
pub mod task;
pub mod validation;

pub use analytics::{Analytics, Breakdown, Overview, build_analytics};
pub use clock::{Clock, SystemClock};
pub use query::{TaskFilter, sort_for_listing};
pub use repository::{InMemoryTaskRepository, RepositoryError, TaskRepository};
pub use scoring::{score, score_weighted_by_category};
pub use service::{TaskError, TaskService};
pub use suggestions::{Suggestion, SuggestionKind, generate_suggestions};
pub use task::{Category, NewTask, Priority, Task, TaskChanges};
pub use validation::ValidationError;
