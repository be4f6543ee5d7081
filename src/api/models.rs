//! Wire envelopes shared by the API responses.

use serde::Deserialize;

use super::{ApiError, Task, Todolist};

/// Uniform envelope returned by every mutating call and by the session
/// check. A `result_code` of zero signals success.
///
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub result_code: i32,
    #[serde(default)]
    pub messages: Vec<String>,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.result_code == 0
    }
}

/// Envelope payload for calls that return nothing useful.
///
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Empty {}

/// Envelope payload wrapping a freshly created entity. Rejections carry an
/// empty `data` object, so the item is optional.
///
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Item<T> {
    pub item: Option<T>,
}

impl<T> Item<T> {
    pub fn into_inner(self) -> Result<T, ApiError> {
        self.item
            .ok_or_else(|| ApiError::Other("created item missing from response".to_string()))
    }
}

/// Envelope payload of a successful login.
///
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// Response of the task listing call, which does not use the envelope.
///
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPage {
    pub items: Vec<Task>,
    #[serde(default)]
    pub total_count: usize,
    #[serde(default)]
    pub error: Option<String>,
}

pub type TodolistEnvelope = Envelope<Item<Todolist>>;
pub type TaskEnvelope = Envelope<Item<Task>>;
