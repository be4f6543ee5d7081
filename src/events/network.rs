use super::error::{accept, SyncError};
use crate::api::{LoginParams, TodolistsApi, UpdateTaskModel};
use crate::state::{
    AppAction, AuthAction, FilterValue, RequestStatus, Store, TaskAction, TaskFields,
    TodolistAction,
};
use log::*;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Specify different network event types.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    InitializeSession,
    Login(LoginParams),
    Logout,
    FetchTodolists,
    AddTodolist {
        title: String,
    },
    RemoveTodolist {
        id: String,
    },
    RenameTodolist {
        id: String,
        title: String,
    },
    ChangeFilter {
        id: String,
        filter: FilterValue,
    },
    FetchTasks {
        todolist_id: String,
    },
    AddTask {
        todolist_id: String,
        title: String,
    },
    RemoveTask {
        task_id: String,
        todolist_id: String,
    },
    UpdateTask {
        task_id: String,
        todolist_id: String,
        fields: TaskFields,
    },
    DismissError,
}

/// Runs orchestrator operations against the API and applies their outcome
/// to the store.
///
/// The store lock is only taken to dispatch or read and is always released
/// before awaiting the API, so the view layer can read while a call is in
/// flight. Failures are recorded in the store rather than returned.
///
#[derive(Clone)]
pub struct Handler {
    store: Arc<Mutex<Store>>,
    api: Arc<TodolistsApi>,
}

impl Handler {
    /// Return new instance with reference to state.
    ///
    pub fn new(store: Arc<Mutex<Store>>, api: Arc<TodolistsApi>) -> Self {
        Handler { store, api }
    }

    /// Handle network events by type.
    ///
    pub async fn handle(&self, event: Event) {
        debug!("Processing network event '{:?}'...", event);
        match event {
            Event::InitializeSession => self.initialize_session().await,
            Event::Login(params) => self.login(params).await,
            Event::Logout => self.logout().await,
            Event::FetchTodolists => self.fetch_todolists().await,
            Event::AddTodolist { title } => self.add_todolist(title).await,
            Event::RemoveTodolist { id } => self.remove_todolist(id).await,
            Event::RenameTodolist { id, title } => self.rename_todolist(id, title).await,
            Event::ChangeFilter { id, filter } => {
                self.store
                    .lock()
                    .await
                    .dispatch(TodolistAction::SetFilter { id, filter });
            }
            Event::FetchTasks { todolist_id } => self.fetch_tasks(todolist_id).await,
            Event::AddTask { todolist_id, title } => self.add_task(todolist_id, title).await,
            Event::RemoveTask {
                task_id,
                todolist_id,
            } => self.remove_task(task_id, todolist_id).await,
            Event::UpdateTask {
                task_id,
                todolist_id,
                fields,
            } => self.update_task(task_id, todolist_id, fields).await,
            Event::DismissError => {
                self.store.lock().await.set_error(None);
            }
        }
    }

    /// Check for an existing session. Initialization completes whatever the
    /// outcome; an unauthenticated answer is not an error.
    ///
    async fn initialize_session(&self) {
        info!("Checking for an existing session...");
        self.begin(None).await;
        let outcome = self.api.me().await;
        let mut store = self.store.lock().await;
        match outcome {
            Ok(envelope) if envelope.is_success() => {
                info!("Session active for '{}'.", envelope.data.login);
                store
                    .dispatch(AuthAction::SetLoggedIn(true))
                    .set_status(RequestStatus::Succeeded);
            }
            Ok(envelope) => {
                info!("No active session ({:?}).", envelope.messages);
                store.set_status(RequestStatus::Succeeded);
            }
            Err(e) => surface(&mut store, e.into()),
        }
        store.dispatch(AppAction::SetInitialized(true));
    }

    async fn login(&self, params: LoginParams) {
        info!("Logging in as {}...", params.email);
        self.begin(None).await;
        let outcome = self.api.login(&params).await.map_err(SyncError::from).and_then(accept);
        let mut store = self.store.lock().await;
        match outcome {
            Ok(_) => {
                info!("Logged in.");
                store
                    .dispatch(AuthAction::SetLoggedIn(true))
                    .set_status(RequestStatus::Succeeded);
            }
            Err(e) => surface(&mut store, e),
        }
    }

    async fn logout(&self) {
        info!("Logging out...");
        self.begin(None).await;
        let outcome = self.api.logout().await.map_err(SyncError::from).and_then(accept);
        let mut store = self.store.lock().await;
        match outcome {
            Ok(_) => {
                info!("Logged out.");
                store
                    .dispatch(AuthAction::SetLoggedIn(false))
                    .set_status(RequestStatus::Succeeded);
            }
            Err(e) => surface(&mut store, e),
        }
    }

    /// Replace the todolist store with the server's list.
    ///
    async fn fetch_todolists(&self) {
        info!("Fetching todolists...");
        self.begin(None).await;
        let outcome = self.api.todolists().await;
        let mut store = self.store.lock().await;
        match outcome {
            Ok(todolists) => {
                info!("Received {} todolists.", todolists.len());
                store
                    .dispatch(TodolistAction::ReplaceAll(todolists))
                    .set_status(RequestStatus::Succeeded);
            }
            Err(e) => surface(&mut store, e.into()),
        }
    }

    async fn add_todolist(&self, title: String) {
        info!("Creating todolist '{}'...", title);
        self.begin(None).await;
        let outcome = self
            .api
            .create_todolist(&title)
            .await
            .map_err(SyncError::from)
            .and_then(accept)
            .and_then(|created| created.into_inner().map_err(SyncError::from));
        let mut store = self.store.lock().await;
        match outcome {
            Ok(created) => {
                info!("Todolist '{}' created with id {}.", created.title, created.id);
                store
                    .dispatch(TodolistAction::Add(created))
                    .set_status(RequestStatus::Succeeded);
            }
            Err(e) => surface(&mut store, e),
        }
    }

    /// Delete a todolist, tracking the request on the todolist itself too.
    ///
    async fn remove_todolist(&self, id: String) {
        info!("Deleting todolist {}...", id);
        self.begin(Some(&id)).await;
        let outcome = self
            .api
            .delete_todolist(&id)
            .await
            .map_err(SyncError::from)
            .and_then(accept);
        let mut store = self.store.lock().await;
        match outcome {
            Ok(_) => {
                info!("Todolist {} deleted.", id);
                store
                    .set_status(RequestStatus::Succeeded)
                    .dispatch(TodolistAction::Remove { id });
            }
            Err(e) => {
                store.set_entity_status(&id, RequestStatus::Failed);
                surface(&mut store, e);
            }
        }
    }

    /// Rename a todolist. A rejecting envelope is logged but still applied.
    ///
    async fn rename_todolist(&self, id: String, title: String) {
        info!("Renaming todolist {} to '{}'...", id, title);
        self.begin(None).await;
        let outcome = self.api.update_todolist(&id, &title).await;
        let mut store = self.store.lock().await;
        match outcome {
            Ok(envelope) => {
                if !envelope.is_success() {
                    warn!(
                        "Rename of todolist {} returned result code {}: {:?}",
                        id, envelope.result_code, envelope.messages
                    );
                }
                store
                    .dispatch(TodolistAction::Rename { id, title })
                    .set_status(RequestStatus::Succeeded);
            }
            Err(e) => surface(&mut store, e.into()),
        }
    }

    async fn fetch_tasks(&self, todolist_id: String) {
        info!("Fetching tasks for todolist {}...", todolist_id);
        self.begin(None).await;
        let outcome = self.api.tasks(&todolist_id).await;
        let mut store = self.store.lock().await;
        match outcome {
            Ok(tasks) => {
                info!("Received {} tasks for todolist {}.", tasks.len(), todolist_id);
                store
                    .dispatch(TaskAction::SetForTodolist { todolist_id, tasks })
                    .set_status(RequestStatus::Succeeded);
            }
            Err(e) => surface(&mut store, e.into()),
        }
    }

    /// Create a task. The owning todolist's entity status ends `succeeded`
    /// on every path so it is re-enabled in the view.
    ///
    async fn add_task(&self, todolist_id: String, title: String) {
        info!("Creating task '{}' in todolist {}...", title, todolist_id);
        self.begin(Some(&todolist_id)).await;
        let outcome = self
            .api
            .create_task(&todolist_id, &title)
            .await
            .map_err(SyncError::from)
            .and_then(accept)
            .and_then(|created| created.into_inner().map_err(SyncError::from));
        let mut store = self.store.lock().await;
        match outcome {
            Ok(created) => {
                info!("Task '{}' created with id {}.", created.title, created.id);
                store
                    .dispatch(TaskAction::Add(created))
                    .set_status(RequestStatus::Succeeded);
            }
            Err(e) => surface(&mut store, e),
        }
        store.set_entity_status(&todolist_id, RequestStatus::Succeeded);
    }

    async fn remove_task(&self, task_id: String, todolist_id: String) {
        info!("Deleting task {} from todolist {}...", task_id, todolist_id);
        self.begin(Some(&todolist_id)).await;
        let outcome = self
            .api
            .delete_task(&todolist_id, &task_id)
            .await
            .map_err(SyncError::from)
            .and_then(accept);
        let mut store = self.store.lock().await;
        match outcome {
            Ok(_) => {
                info!("Task {} deleted.", task_id);
                store
                    .set_status(RequestStatus::Succeeded)
                    .dispatch(TaskAction::Remove {
                        task_id,
                        todolist_id: todolist_id.to_owned(),
                    });
            }
            Err(e) => surface(&mut store, e),
        }
        store.set_entity_status(&todolist_id, RequestStatus::Succeeded);
    }

    /// Update a task with the partial fields overlaid on its current values.
    /// Skipped without a network call when the task is not in the store.
    ///
    async fn update_task(&self, task_id: String, todolist_id: String, fields: TaskFields) {
        let model = {
            let store = self.store.lock().await;
            match store.tasks().find(&task_id, &todolist_id) {
                Ok(task) => {
                    let mut task = task.clone();
                    fields.merge_into(&mut task);
                    UpdateTaskModel::from(&task)
                }
                Err(e) => {
                    warn!("Skipping task update: {}", e);
                    return;
                }
            }
        };

        info!("Updating task {} in todolist {}...", task_id, todolist_id);
        self.begin(None).await;
        let outcome = self
            .api
            .update_task(&todolist_id, &task_id, &model)
            .await
            .map_err(SyncError::from)
            .and_then(accept);
        let mut store = self.store.lock().await;
        match outcome {
            Ok(_) => {
                info!("Task {} updated.", task_id);
                store
                    .dispatch(TaskAction::Update {
                        task_id,
                        todolist_id,
                        fields,
                    })
                    .set_status(RequestStatus::Succeeded);
            }
            Err(e) => surface(&mut store, e),
        }
    }

    /// Mark the start of a gateway call, globally and optionally on a
    /// todolist.
    ///
    async fn begin(&self, todolist_id: Option<&str>) {
        let mut store = self.store.lock().await;
        store.set_status(RequestStatus::Loading);
        if let Some(id) = todolist_id {
            store.set_entity_status(id, RequestStatus::Loading);
        }
    }
}

fn surface(store: &mut Store, error: SyncError) {
    error!("{}", error);
    store.fail(error.user_message());
}
