use dioxus::prelude::*;
use shared_types::{is_logged_in, AppError, AuthUser};
use shared_ui::{ToastOptions, Toasts};

use crate::routes::Route;

/// Cached session of the signed-in operator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AuthState {
    pub current_user: Signal<Option<AuthUser>>,
}

impl AuthState {
    pub fn new() -> Self {
        Self {
            current_user: Signal::new(None),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        is_logged_in(self.current_user.read().as_ref())
    }

    pub fn set_user(&mut self, user: AuthUser) {
        self.current_user.set(Some(user));
    }

    pub fn clear_auth(&mut self) {
        self.current_user.set(None);
    }
}

/// Hook to access auth state.
pub fn use_auth() -> AuthState {
    use_context::<AuthState>()
}

/// Report a failed server call. Session loss drops the cached user and goes
/// back to the login page; anything else becomes an error toast.
pub fn report_error(mut auth: AuthState, toast: Toasts, err: &ServerFnError) {
    let text = err.to_string();
    if AppError::is_unauthorized(&text) {
        auth.clear_auth();
        navigator().replace(Route::Login {});
        return;
    }
    toast.error(AppError::friendly_message(&text), ToastOptions::new());
}
