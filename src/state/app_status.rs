//! Process-wide request status, last error and initialization flag.

use fake::Dummy;
use serde::Serialize;

/// Lifecycle marker for an in-flight request, used globally and per entity.
///
#[derive(Debug, Default, Dummy, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Status controller transitions. Every variant is an unconditional overwrite.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AppAction {
    SetStatus(RequestStatus),
    SetError(Option<String>),
    SetInitialized(bool),
}

/// Houses the global request status shown by the view layer.
///
#[derive(Debug, Default, PartialEq, Eq, Clone, Serialize)]
pub struct AppStatus {
    status: RequestStatus,
    error: Option<String>,
    is_initialized: bool,
}

impl AppStatus {
    pub fn apply(&mut self, action: AppAction) -> &mut Self {
        match action {
            AppAction::SetStatus(status) => self.status = status,
            AppAction::SetError(error) => self.error = error,
            AppAction::SetInitialized(is_initialized) => self.is_initialized = is_initialized,
        }
        self
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}
