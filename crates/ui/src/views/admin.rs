use dioxus::prelude::*;

use til_core::model::{LessonSummary, SessionContext, TestSummary};

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[derive(Clone, Debug, PartialEq)]
struct AdminData {
    lessons: Vec<LessonSummary>,
    tests: Vec<TestSummary>,
}

/// Content overview for teachers and admins. The server enforces the role
/// on every request; this view only spares students a broken page.
#[component]
pub fn AdminView() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_context::<Signal<Option<SessionContext>>>();
    let is_staff = session().as_ref().is_some_and(|user| user.role.is_staff());

    let api = ctx.api();
    let resource = use_resource(move || {
        let api = api.clone();
        async move {
            let lessons = api
                .list_lessons()
                .await
                .map_err(|err| ViewError::from_api(&err))?;
            let tests = api
                .list_tests(None)
                .await
                .map_err(|err| ViewError::from_api(&err))?;
            Ok::<_, ViewError>(AdminData { lessons, tests })
        }
    });
    let state = view_state_from_resource(&resource);

    if !is_staff {
        return rsx! {
            div { class: "page admin-page",
                p { class: "form-error", "Недостаточно прав." }
            }
        };
    }

    rsx! {
        div { class: "page admin-page",
            header { class: "view-header",
                h2 { class: "view-title", "Администрирование" }
            }
            div { class: "view-divider" }
            match state {
                ViewState::Idle => rsx! { p { "..." } },
                ViewState::Loading => rsx! { p { "Загрузка..." } },
                ViewState::Error(err) => rsx! {
                    p { class: "form-error", "{err.message()}" }
                },
                ViewState::Ready(data) => rsx! {
                    h3 { "Уроки ({data.lessons.len()})" }
                    table { class: "admin-table",
                        thead {
                            tr {
                                th { "Название" }
                                th { "Уровень" }
                                th { "Тема" }
                            }
                        }
                        tbody {
                            for lesson in data.lessons.clone() {
                                tr {
                                    td { "{lesson.title}" }
                                    td { "{lesson.level}" }
                                    td { "{lesson.topic}" }
                                }
                            }
                        }
                    }
                    h3 { "Тесты ({data.tests.len()})" }
                    table { class: "admin-table",
                        thead {
                            tr {
                                th { "Название" }
                                th { "Итоговый" }
                            }
                        }
                        tbody {
                            for test in data.tests.clone() {
                                tr {
                                    td { "{test.title}" }
                                    td { if test.is_final { "да" } else { "нет" } }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}
