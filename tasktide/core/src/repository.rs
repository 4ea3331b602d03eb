//! Task storage.
//!
//! The service talks to storage only through [`TaskRepository`], so the
//! in-memory store used by default can be swapped for a durable backend
//! without touching scoring or reporting.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::task::Task;

/// Errors a storage backend can report.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// The backend could not be reached or refused the operation.
    #[error("Task storage unavailable: {0}")]
    Unavailable(String),
}

/// Operations the task service needs from storage.
///
/// Each call must be atomic with respect to the stored collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task and returns it.
    async fn insert(&self, task: Task) -> Result<Task, RepositoryError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Task>, RepositoryError>;

    /// Returns every stored task in no particular order.
    async fn find_all(&self) -> Result<Vec<Task>, RepositoryError>;

    /// Replaces the stored task with the same id.
    ///
    /// Returns `None` when no such task exists.
    async fn update(&self, task: Task) -> Result<Option<Task>, RepositoryError>;

    /// Removes a task, returning it if it existed.
    async fn delete_by_id(&self, id: &str) -> Result<Option<Task>, RepositoryError>;
}

/// Process-lifetime storage. Empty when created, gone when dropped.
#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    tasks: RwLock<Vec<Task>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: Task) -> Result<Task, RepositoryError> {
        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Task>, RepositoryError> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().find(|task| task.id() == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Task>, RepositoryError> {
        Ok(self.tasks.read().await.clone())
    }

    async fn update(&self, task: Task) -> Result<Option<Task>, RepositoryError> {
        let mut tasks = self.tasks.write().await;
        match tasks.iter_mut().find(|stored| stored.id() == task.id()) {
            Some(stored) => {
                *stored = task.clone();
                Ok(Some(task))
            }
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: &str) -> Result<Option<Task>, RepositoryError> {
        let mut tasks = self.tasks.write().await;
        let position = tasks.iter().position(|task| task.id() == id);
        Ok(position.map(|index| tasks.remove(index)))
    }
}
