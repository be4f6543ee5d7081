//! Ordered collection of todolists with their UI filter and per-entity
//! request status.

use super::app_status::RequestStatus;
use crate::api::Todolist;
use fake::Dummy;
use log::*;
use serde::Serialize;

/// Specifying which tasks of a todolist are shown.
///
#[derive(Debug, Default, Dummy, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterValue {
    #[default]
    All,
    Active,
    Completed,
}

impl std::str::FromStr for FilterValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(FilterValue::All),
            "active" => Ok(FilterValue::Active),
            "completed" => Ok(FilterValue::Completed),
            other => Err(format!("unknown filter '{}'", other)),
        }
    }
}

/// A todolist as held by the store.
///
#[derive(Debug, Dummy, PartialEq, Eq, Clone, Serialize)]
pub struct TodolistEntity {
    pub id: String,
    pub title: String,
    pub order: i64,
    pub added_date: String,
    pub filter: FilterValue,
    pub entity_status: RequestStatus,
}

impl From<Todolist> for TodolistEntity {
    fn from(todolist: Todolist) -> Self {
        TodolistEntity {
            id: todolist.id,
            title: todolist.title,
            order: todolist.order,
            added_date: todolist.added_date,
            filter: FilterValue::All,
            entity_status: RequestStatus::Idle,
        }
    }
}

/// Todolist store transitions.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TodolistAction {
    Add(Todolist),
    Remove { id: String },
    Rename { id: String, title: String },
    SetFilter { id: String, filter: FilterValue },
    SetEntityStatus { id: String, status: RequestStatus },
    ReplaceAll(Vec<Todolist>),
}

/// Published by a todolist transition that changes the id set, so the task
/// store can keep one bucket per todolist.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TodolistEvent {
    Created(String),
    Removed(String),
    Replaced(Vec<String>),
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Serialize)]
#[serde(transparent)]
pub struct TodolistStore {
    todolists: Vec<TodolistEntity>,
}

impl TodolistStore {
    /// Apply a transition and return the event the task store must consume.
    ///
    pub fn apply(&mut self, action: TodolistAction) -> Option<TodolistEvent> {
        match action {
            TodolistAction::Add(todolist) => {
                debug_assert!(
                    self.get(&todolist.id).is_none(),
                    "todolist {} already present",
                    todolist.id
                );
                let id = todolist.id.to_owned();
                self.todolists.insert(0, todolist.into());
                Some(TodolistEvent::Created(id))
            }
            TodolistAction::Remove { id } => {
                let index = self.todolists.iter().position(|tl| tl.id == id)?;
                self.todolists.remove(index);
                Some(TodolistEvent::Removed(id))
            }
            TodolistAction::Rename { id, title } => {
                if let Some(todolist) = self.get_mut(&id) {
                    todolist.title = title;
                }
                None
            }
            TodolistAction::SetFilter { id, filter } => {
                if let Some(todolist) = self.get_mut(&id) {
                    todolist.filter = filter;
                }
                None
            }
            TodolistAction::SetEntityStatus { id, status } => {
                if let Some(todolist) = self.get_mut(&id) {
                    todolist.entity_status = status;
                }
                None
            }
            TodolistAction::ReplaceAll(todolists) => {
                self.todolists.clear();
                for todolist in todolists {
                    if self.get(&todolist.id).is_some() {
                        warn!("Dropping duplicate todolist {}.", todolist.id);
                        continue;
                    }
                    self.todolists.push(todolist.into());
                }
                Some(TodolistEvent::Replaced(self.ids()))
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&TodolistEntity> {
        self.todolists.iter().find(|tl| tl.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut TodolistEntity> {
        self.todolists.iter_mut().find(|tl| tl.id == id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.todolists.iter().map(|tl| tl.id.to_owned()).collect()
    }

    pub fn as_slice(&self) -> &[TodolistEntity] {
        &self.todolists
    }

    pub fn len(&self) -> usize {
        self.todolists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todolists.is_empty()
    }
}
