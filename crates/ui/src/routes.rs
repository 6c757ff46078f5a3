use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator};

use til_core::model::SessionContext;

use crate::context::AppContext;
use crate::views::{
    AdminView, ChatView, DashboardView, ExercisesView, LessonDetailView, LessonsView, LoginView,
    ProgressView, TestsView, ViewError, ViewState, VocabularyView, view_state_from_resource,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/login", LoginView)] Login {},
    #[layout(Shell)]
        #[route("/", DashboardView)] Dashboard {},
        #[route("/lessons", LessonsView)] Lessons {},
        #[route("/lesson/:lesson_id", LessonDetailView)] LessonDetail { lesson_id: u64 },
        #[route("/exercises", ExercisesView)] Exercises {},
        #[route("/tests", TestsView)] Tests {},
        #[route("/chat?:lesson_id", ChatView)] Chat { lesson_id: Option<u64> },
        #[route("/vocabulary", VocabularyView)] Vocabulary {},
        #[route("/progress", ProgressView)] Progress {},
        #[route("/admin", AdminView)] Admin {},
        // Unknown paths land on the dashboard instead of a dead end.
        #[route("/:..segments", NotFound)] NotFound { segments: Vec<String> },
}

#[component]
fn NotFound(segments: Vec<String>) -> Element {
    let _ = segments;
    rsx! { DashboardView {} }
}

/// Authenticated frame: loads the profile once, renders the navigation,
/// and owns the expired-credential logout. Views below never see a
/// missing profile.
#[component]
fn Shell() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut session = use_context_provider(|| Signal::new(None::<SessionContext>));

    let api = ctx.api();
    let resource = use_resource(move || {
        let api = api.clone();
        async move {
            api.current_user()
                .await
                .map_err(|err| ViewError::from_api(&err))
        }
    });

    let logout_ctx = ctx.clone();
    use_effect(move || {
        let value = resource.value();
        let value = value.read();
        match value.as_ref() {
            Some(Ok(user)) => {
                if session.peek().as_ref() != Some(user) {
                    session.set(Some(user.clone()));
                }
            }
            Some(Err(ViewError::Unauthorized)) => {
                // Several requests can observe the same expired credential;
                // the latch makes sure we clear and redirect exactly once.
                if logout_ctx.begin_logout() {
                    logout_ctx.credentials().clear();
                    navigator.replace(Route::Login {});
                }
            }
            _ => {}
        }
    });

    let state = view_state_from_resource(&resource);
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                match state {
                    ViewState::Idle | ViewState::Loading => rsx! {
                        p { class: "loading", "Загрузка..." }
                    },
                    ViewState::Error(ViewError::Unauthorized) => rsx! {
                        p { class: "loading", "Сессия истекла. Выполняется выход..." }
                    },
                    ViewState::Error(err) => rsx! {
                        div { class: "error-panel",
                            p { "{err.message()}" }
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                onclick: move |_| {
                                    let mut resource = resource;
                                    resource.restart();
                                },
                                "Повторить"
                            }
                        }
                    },
                    ViewState::Ready(_) => rsx! {
                        Outlet::<Route> {}
                    },
                }
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let session = use_context::<Signal<Option<SessionContext>>>();
    let user = session();
    let is_staff = user.as_ref().is_some_and(|user| user.role.is_staff());

    rsx! {
        nav { class: "sidebar",
            h1 { "Til" }
            if let Some(user) = user.as_ref() {
                p { class: "sidebar-user", "{user.display_label()}" }
            }
            ul {
                li { Link { to: Route::Dashboard {}, "Главная" } }
                li { Link { to: Route::Lessons {}, "Уроки" } }
                li { Link { to: Route::Exercises {}, "Упражнения" } }
                li { Link { to: Route::Tests {}, "Тесты" } }
                li { Link { to: Route::Chat { lesson_id: None }, "Чат" } }
                li { Link { to: Route::Vocabulary {}, "Словарь" } }
                li { Link { to: Route::Progress {}, "Прогресс" } }
                if is_staff {
                    li { Link { to: Route::Admin {}, "Админ" } }
                }
            }
            button {
                class: "btn btn-secondary sidebar-logout",
                r#type: "button",
                onclick: move |_| {
                    ctx.credentials().clear();
                    navigator.replace(Route::Login {});
                },
                "Выйти"
            }
        }
    }
}
