//! Root store owning every state slice.
//!
//! All mutations go through `Store::dispatch`, which routes an `Action` to
//! its slice and feeds todolist events into the task store before returning,
//! so a reader never observes a todolist without its task bucket.

use super::app_status::{AppAction, AppStatus, RequestStatus};
use super::auth::{AuthAction, AuthState};
use super::tasks::{TaskAction, TaskStore};
use super::todolists::{FilterValue, TodolistAction, TodolistEntity, TodolistStore};
use crate::api::{Task, TaskStatus};
use log::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Every state transition the application can perform.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Action {
    App(AppAction),
    Auth(AuthAction),
    Todolists(TodolistAction),
    Tasks(TaskAction),
}

impl From<AppAction> for Action {
    fn from(action: AppAction) -> Self {
        Action::App(action)
    }
}

impl From<AuthAction> for Action {
    fn from(action: AuthAction) -> Self {
        Action::Auth(action)
    }
}

impl From<TodolistAction> for Action {
    fn from(action: TodolistAction) -> Self {
        Action::Todolists(action)
    }
}

impl From<TaskAction> for Action {
    fn from(action: TaskAction) -> Self {
        Action::Tasks(action)
    }
}

/// Read-only copy of the whole state handed to the view layer.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub app: AppStatus,
    pub auth: AuthState,
    pub todolists: Vec<TodolistEntity>,
    pub tasks: BTreeMap<String, Vec<Task>>,
}

#[derive(Debug, Default, Clone)]
pub struct Store {
    app: AppStatus,
    auth: AuthState,
    todolists: TodolistStore,
    tasks: TaskStore,
}

impl Store {
    pub fn new() -> Store {
        Store::default()
    }

    /// Apply an action, including any cascade it triggers.
    ///
    pub fn dispatch(&mut self, action: impl Into<Action>) -> &mut Self {
        let action = action.into();
        trace!("Dispatching {:?}", action);
        match action {
            Action::App(action) => {
                self.app.apply(action);
            }
            Action::Auth(action) => {
                self.auth.apply(action);
            }
            Action::Todolists(action) => {
                if let Some(event) = self.todolists.apply(action) {
                    self.tasks.on_todolist_event(event);
                }
            }
            Action::Tasks(action) => {
                self.tasks.apply(action);
            }
        }
        debug_assert!(self.buckets_match_todolists(), "task buckets out of step");
        self
    }

    pub fn set_status(&mut self, status: RequestStatus) -> &mut Self {
        self.dispatch(AppAction::SetStatus(status))
    }

    pub fn set_error(&mut self, error: Option<String>) -> &mut Self {
        self.dispatch(AppAction::SetError(error))
    }

    pub fn set_entity_status(&mut self, todolist_id: &str, status: RequestStatus) -> &mut Self {
        self.dispatch(TodolistAction::SetEntityStatus {
            id: todolist_id.to_owned(),
            status,
        })
    }

    /// Record a failure the user should see.
    ///
    pub fn fail(&mut self, message: String) -> &mut Self {
        self.set_error(Some(message)).set_status(RequestStatus::Failed)
    }

    pub fn app(&self) -> &AppStatus {
        &self.app
    }

    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    pub fn todolists(&self) -> &TodolistStore {
        &self.todolists
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    /// Return the tasks of a todolist that pass its current filter.
    ///
    pub fn visible_tasks(&self, todolist_id: &str) -> Vec<&Task> {
        let filter = self
            .todolists
            .get(todolist_id)
            .map(|tl| tl.filter)
            .unwrap_or_default();
        self.tasks
            .get(todolist_id)
            .unwrap_or_default()
            .iter()
            .filter(|task| match filter {
                FilterValue::All => true,
                FilterValue::Active => task.status != TaskStatus::Completed,
                FilterValue::Completed => task.status == TaskStatus::Completed,
            })
            .collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            app: self.app.clone(),
            auth: self.auth.clone(),
            todolists: self.todolists.as_slice().to_vec(),
            tasks: self
                .tasks
                .as_map()
                .iter()
                .map(|(id, tasks)| (id.to_owned(), tasks.clone()))
                .collect(),
        }
    }

    fn buckets_match_todolists(&self) -> bool {
        let ids = self.todolists.ids();
        ids.len() == self.tasks.as_map().len() && ids.iter().all(|id| self.tasks.get(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Todolist;
    use crate::state::TaskFields;
    use fake::{Fake, Faker};

    fn todolist(id: &str) -> Todolist {
        Todolist {
            id: id.to_string(),
            ..Faker.fake()
        }
    }

    fn task(id: &str, todolist_id: &str, status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            todolist_id: todolist_id.to_string(),
            status,
            ..Faker.fake()
        }
    }

    fn sorted_keys(store: &Store) -> Vec<String> {
        let mut keys: Vec<String> = store.tasks().keys().cloned().collect();
        keys.sort();
        keys
    }

    #[test]
    fn todolist_operations_keep_bucket_keys_equal_to_ids() {
        let mut store = Store::new();
        store.dispatch(TodolistAction::ReplaceAll(vec![todolist("A"), todolist("B")]));
        store.dispatch(TodolistAction::Add(todolist("C")));
        store.dispatch(TodolistAction::Remove { id: "A".to_string() });
        store.dispatch(TodolistAction::Remove { id: "missing".to_string() });
        store.dispatch(TodolistAction::Rename {
            id: "B".to_string(),
            title: "Renamed".to_string(),
        });

        let mut ids = store.todolists().ids();
        ids.sort();
        assert_eq!(ids, sorted_keys(&store));
        assert_eq!(ids, vec!["B", "C"]);
    }

    #[test]
    fn random_todolist_sequences_keep_bucket_keys_equal_to_ids() {
        const POOL: [&str; 5] = ["A", "B", "C", "D", "E"];
        let pick = || POOL[(0..POOL.len()).fake::<usize>()];

        for _ in 0..50 {
            let mut store = Store::new();
            for _ in 0..30 {
                match (0u8..3).fake::<u8>() {
                    0 => {
                        let id = pick();
                        if store.todolists().get(id).is_none() {
                            store.dispatch(TodolistAction::Add(todolist(id)));
                        }
                    }
                    1 => {
                        store.dispatch(TodolistAction::Remove { id: pick().to_string() });
                    }
                    _ => {
                        let count = (0usize..4).fake::<usize>();
                        let todolists = (0..count).map(|_| todolist(pick())).collect();
                        store.dispatch(TodolistAction::ReplaceAll(todolists));
                    }
                }
                let mut ids = store.todolists().ids();
                ids.sort();
                assert_eq!(ids, sorted_keys(&store));
            }
        }
    }

    #[test]
    fn replace_all_with_duplicate_ids_keeps_one_bucket_each() {
        let mut store = Store::new();
        store.dispatch(TodolistAction::ReplaceAll(vec![
            todolist("A"),
            todolist("A"),
            todolist("B"),
        ]));
        assert_eq!(store.todolists().ids(), vec!["A", "B"]);
        assert_eq!(sorted_keys(&store), vec!["A", "B"]);
    }

    #[test]
    fn removing_todolist_drops_its_tasks() {
        let mut store = Store::new();
        store.dispatch(TodolistAction::ReplaceAll(vec![todolist("A")]));
        store.dispatch(TaskAction::Add(task("T1", "A", TaskStatus::New)));
        store.dispatch(TodolistAction::Remove { id: "A".to_string() });
        assert!(store.tasks().get("A").is_none());
        assert!(store.todolists().is_empty());
    }

    #[test]
    fn replace_all_drops_locally_added_todolist() {
        let mut store = Store::new();
        store.dispatch(TodolistAction::Add(todolist("X")));
        store.dispatch(TodolistAction::ReplaceAll(vec![todolist("A")]));
        assert!(store.todolists().get("X").is_none());
        assert!(store.tasks().get("X").is_none());
        assert_eq!(sorted_keys(&store), vec!["A"]);
    }

    #[test]
    fn visible_tasks_follow_todolist_filter() {
        let mut store = Store::new();
        store.dispatch(TodolistAction::ReplaceAll(vec![todolist("A")]));
        store.dispatch(TaskAction::SetForTodolist {
            todolist_id: "A".to_string(),
            tasks: vec![
                task("T1", "A", TaskStatus::New),
                task("T2", "A", TaskStatus::Completed),
                task("T3", "A", TaskStatus::InProgress),
            ],
        });

        let ids = |store: &Store| -> Vec<String> {
            store.visible_tasks("A").iter().map(|t| t.id.to_owned()).collect()
        };
        assert_eq!(ids(&store), vec!["T1", "T2", "T3"]);

        store.dispatch(TodolistAction::SetFilter {
            id: "A".to_string(),
            filter: FilterValue::Active,
        });
        assert_eq!(ids(&store), vec!["T1", "T3"]);

        store.dispatch(TodolistAction::SetFilter {
            id: "A".to_string(),
            filter: FilterValue::Completed,
        });
        assert_eq!(ids(&store), vec!["T2"]);
        assert!(store.visible_tasks("missing").is_empty());
    }

    #[test]
    fn update_never_moves_task_between_todolists() {
        let mut store = Store::new();
        store.dispatch(TodolistAction::ReplaceAll(vec![todolist("A"), todolist("B")]));
        store.dispatch(TaskAction::Add(task("T1", "A", TaskStatus::New)));
        store.dispatch(TaskAction::Update {
            task_id: "T1".to_string(),
            todolist_id: "A".to_string(),
            fields: TaskFields {
                title: Some("Moved?".to_string()),
                ..TaskFields::default()
            },
        });
        assert_eq!(store.tasks().find("T1", "A").unwrap().todolist_id, "A");
        assert!(store.tasks().get("B").unwrap().is_empty());
    }

    #[test]
    fn fail_sets_error_and_status() {
        let mut store = Store::new();
        store.set_status(RequestStatus::Loading).fail("boom".to_string());
        assert_eq!(store.app().status(), RequestStatus::Failed);
        assert_eq!(store.app().error(), Some("boom"));
    }

    #[test]
    fn snapshot_copies_every_slice() {
        let mut store = Store::new();
        store.dispatch(TodolistAction::ReplaceAll(vec![todolist("A")]));
        store.dispatch(AuthAction::SetLoggedIn(true));
        let snapshot = store.snapshot();
        assert!(snapshot.auth.is_logged_in());
        assert_eq!(snapshot.todolists.len(), 1);
        assert_eq!(snapshot.tasks.get("A"), Some(&vec![]));
    }

    #[test]
    fn snapshot_lists_buckets_in_stable_order() {
        let mut store = Store::new();
        store.dispatch(TodolistAction::ReplaceAll(vec![
            todolist("C"),
            todolist("A"),
            todolist("B"),
        ]));
        let snapshot = store.snapshot();
        let keys: Vec<&String> = snapshot.tasks.keys().collect();
        assert_eq!(keys, vec!["A", "B", "C"]);
    }
}
