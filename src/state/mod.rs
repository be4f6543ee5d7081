//! Application state management module.
//!
//! This module contains the normalized client-side state:
//! - `AppStatus` global request status, error and initialization flag
//! - `AuthState` login flag
//! - `TodolistStore` ordered todolists with UI filter and entity status
//! - `TaskStore` tasks bucketed by todolist
//! - `Store` root owner that routes `Action`s and applies cascades

mod app_status;
mod auth;
mod error;
mod store;
mod tasks;
mod todolists;

pub use app_status::{AppAction, AppStatus, RequestStatus};
pub use auth::{AuthAction, AuthState};
pub use error::StateError;
pub use store::{Action, Snapshot, Store};
pub use tasks::{TaskAction, TaskFields, TaskStore};
pub use todolists::{FilterValue, TodolistAction, TodolistEntity, TodolistEvent, TodolistStore};
