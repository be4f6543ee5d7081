//! Tasks bucketed by owning todolist.

use super::error::StateError;
use super::todolists::TodolistEvent;
use crate::api::{Task, TaskPriority, TaskStatus};
use log::*;
use serde::Serialize;
use std::collections::HashMap;

/// Partial task fields. Only the fields that are set are merged.
///
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct TaskFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub start_date: Option<String>,
    pub deadline: Option<String>,
}

impl TaskFields {
    /// Overlay the set fields onto a task. `todolist_id` is never touched.
    ///
    pub fn merge_into(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.to_owned();
        }
        if let Some(description) = &self.description {
            task.description = description.to_owned();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(start_date) = &self.start_date {
            task.start_date = start_date.to_owned();
        }
        if let Some(deadline) = &self.deadline {
            task.deadline = deadline.to_owned();
        }
    }
}

/// Task store transitions.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TaskAction {
    SetForTodolist { todolist_id: String, tasks: Vec<Task> },
    Add(Task),
    Remove { task_id: String, todolist_id: String },
    Update { task_id: String, todolist_id: String, fields: TaskFields },
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Serialize)]
#[serde(transparent)]
pub struct TaskStore {
    buckets: HashMap<String, Vec<Task>>,
}

impl TaskStore {
    pub fn apply(&mut self, action: TaskAction) -> &mut Self {
        match action {
            TaskAction::SetForTodolist { todolist_id, tasks } => {
                match self.buckets.get_mut(&todolist_id) {
                    Some(bucket) => *bucket = tasks,
                    None => warn!(
                        "Dropping {} fetched tasks for unknown todolist {}.",
                        tasks.len(),
                        todolist_id
                    ),
                }
            }
            TaskAction::Add(task) => match self.buckets.get_mut(&task.todolist_id) {
                Some(tasks) => {
                    debug_assert!(
                        tasks.iter().all(|t| t.id != task.id),
                        "task {} already present",
                        task.id
                    );
                    tasks.insert(0, task);
                }
                None => warn!(
                    "Dropping task {} for unknown todolist {}.",
                    task.id, task.todolist_id
                ),
            },
            TaskAction::Remove { task_id, todolist_id } => {
                if let Some(tasks) = self.buckets.get_mut(&todolist_id) {
                    tasks.retain(|t| t.id != task_id);
                }
            }
            TaskAction::Update {
                task_id,
                todolist_id,
                fields,
            } => {
                if let Some(task) = self
                    .buckets
                    .get_mut(&todolist_id)
                    .and_then(|tasks| tasks.iter_mut().find(|t| t.id == task_id))
                {
                    fields.merge_into(task);
                }
            }
        }
        self
    }

    /// Keep one bucket per todolist in step with the todolist store.
    ///
    pub fn on_todolist_event(&mut self, event: TodolistEvent) -> &mut Self {
        match event {
            TodolistEvent::Created(id) => {
                self.buckets.insert(id, vec![]);
            }
            TodolistEvent::Removed(id) => {
                self.buckets.remove(&id);
            }
            TodolistEvent::Replaced(ids) => {
                self.buckets = ids.into_iter().map(|id| (id, vec![])).collect();
            }
        }
        self
    }

    /// Return the task or a lookup error naming what was missing.
    ///
    pub fn find(&self, task_id: &str, todolist_id: &str) -> Result<&Task, StateError> {
        self.buckets
            .get(todolist_id)
            .ok_or_else(|| StateError::TodolistNotFound {
                id: todolist_id.to_owned(),
            })?
            .iter()
            .find(|t| t.id == task_id)
            .ok_or_else(|| StateError::TaskNotFound {
                task_id: task_id.to_owned(),
                todolist_id: todolist_id.to_owned(),
            })
    }

    pub fn get(&self, todolist_id: &str) -> Option<&[Task]> {
        self.buckets.get(todolist_id).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.buckets.keys()
    }

    pub fn as_map(&self) -> &HashMap<String, Vec<Task>> {
        &self.buckets
    }
}
