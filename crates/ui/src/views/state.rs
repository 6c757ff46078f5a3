use client::ApiError;
use dioxus::prelude::*;
use dioxus_router::Navigator;

use crate::context::AppContext;
use crate::routes::Route;

/// Render-side error classification. `Unauthorized` is handled by the
/// shell (credential clear plus redirect); everything else is shown
/// inline with whatever detail the service supplied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unauthorized,
    Message(String),
}

impl ViewError {
    #[must_use]
    pub fn from_api(err: &ApiError) -> Self {
        if err.is_unauthorized() {
            ViewError::Unauthorized
        } else {
            ViewError::Message(err.detail_message())
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            ViewError::Unauthorized => "Сессия истекла. Войдите снова.",
            ViewError::Message(detail) => detail,
        }
    }
}

impl From<&ApiError> for ViewError {
    fn from(err: &ApiError) -> Self {
        Self::from_api(err)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

/// Route an action failure: an expired credential triggers the shared
/// logout, everything else lands in the view's inline error slot.
pub fn report_error(
    ctx: &AppContext,
    navigator: Navigator,
    unauthorized: bool,
    message: String,
    error: &mut Signal<Option<String>>,
) {
    if unauthorized {
        if ctx.begin_logout() {
            ctx.credentials().clear();
            navigator.replace(Route::Login {});
        }
    } else {
        error.set(Some(message));
    }
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(err.clone()),
            None => ViewState::Error(ViewError::Message("Неизвестная ошибка".to_string())),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
