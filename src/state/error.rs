//! State lookup error types.

/// Errors raised when the store does not hold what a caller expected.
/// These are local inconsistencies, never shown to the user.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// Todolist not found in state
    #[error("Todolist not found: {id}")]
    TodolistNotFound { id: String },

    /// Task not found in state
    #[error("Task {task_id} not found in todolist {todolist_id}")]
    TaskNotFound { task_id: String, todolist_id: String },
}
