use serde::Serialize;

/// Auth gate transitions.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AuthAction {
    SetLoggedIn(bool),
}

/// Whether protected views may be shown.
///
#[derive(Debug, Default, PartialEq, Eq, Clone, Serialize)]
pub struct AuthState {
    is_logged_in: bool,
}

impl AuthState {
    pub fn apply(&mut self, action: AuthAction) -> &mut Self {
        match action {
            AuthAction::SetLoggedIn(value) => self.is_logged_in = value,
        }
        self
    }

    pub fn is_logged_in(&self) -> bool {
        self.is_logged_in
    }
}
