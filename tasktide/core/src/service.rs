use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::analytics::{Analytics, build_analytics};
use crate::clock::Clock;
use crate::query::{TaskFilter, sort_for_listing};
use crate::repository::{RepositoryError, TaskRepository};
use crate::scoring;
use crate::suggestions::{Suggestion, generate_suggestions};
use crate::task::{NewTask, Task, TaskChanges};

/// Error type for TaskService operations.
#[derive(Error, Debug)]
pub enum TaskError {
    /// No task with the given id exists.
    #[error("Task with ID {0} not found")]
    NotFound(String),
    /// The storage backend failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Task operations on top of a repository and a clock.
///
/// This is the only place ids, timestamps and scores are assigned.
pub struct TaskService {
    repository: Arc<dyn TaskRepository>,
    clock: Arc<dyn Clock>,
}

impl TaskService {
    pub fn new(repository: Arc<dyn TaskRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Lists tasks matching `filter` in listing order.
    #[tracing::instrument(skip(self))]
    pub async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, TaskError> {
        let mut tasks = filter.apply(self.repository.find_all().await?);
        sort_for_listing(&mut tasks);
        Ok(tasks)
    }

    /// Retrieves a task by its ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_task(&self, id: &str) -> Result<Task, TaskError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| TaskError::NotFound(id.to_string()))
    }

    /// Creates a task, assigning its id, timestamps and score.
    #[tracing::instrument(skip(self))]
    pub async fn create_task(&self, new_task: NewTask) -> Result<Task, TaskError> {
        let task = Task::new(new_task, self.clock.now());
        let created = self.repository.insert(task).await?;
        tracing::info!(id = created.id(), "Created task");
        Ok(created)
    }

    /// Applies a partial update to an existing task.
    #[tracing::instrument(skip(self))]
    pub async fn update_task(&self, id: &str, changes: TaskChanges) -> Result<Task, TaskError> {
        let mut task = self.get_task(id).await?;
        task.apply_changes(changes, self.clock.now());
        self.store(task).await
    }

    /// Flips a task between completed and incomplete.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_task(&self, id: &str) -> Result<Task, TaskError> {
        let mut task = self.get_task(id).await?;
        task.toggle_completed(self.clock.now());
        self.store(task).await
    }

    /// Deletes a task by its ID, returning the deleted task.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task(&self, id: &str) -> Result<Task, TaskError> {
        let deleted = self
            .repository
            .delete_by_id(id)
            .await?
            .ok_or_else(|| TaskError::NotFound(id.to_string()))?;
        tracing::info!(id, "Deleted task");
        Ok(deleted)
    }

    #[tracing::instrument(skip(self))]
    pub async fn suggestions(&self) -> Result<Vec<Suggestion>, TaskError> {
        let tasks = self.repository.find_all().await?;
        Ok(generate_suggestions(&tasks, self.clock.now()))
    }

    #[tracing::instrument(skip(self))]
    pub async fn analytics(&self) -> Result<Analytics, TaskError> {
        let tasks = self.repository.find_all().await?;
        Ok(build_analytics(&tasks, self.clock.now()))
    }

    /// Scores caller-supplied tasks with the category-weighted formula, most urgent first.
    ///
    /// Nothing is read from or written to the repository.
    #[tracing::instrument(skip(self, tasks))]
    pub fn prioritize(&self, tasks: Vec<Value>) -> Vec<Value> {
        scoring::prioritize(tasks, self.clock.now())
    }

    async fn store(&self, task: Task) -> Result<Task, TaskError> {
        let id = task.id().to_string();
        self.repository
            .update(task)
            .await?
            .ok_or(TaskError::NotFound(id))
    }
}
