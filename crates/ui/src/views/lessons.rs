use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[component]
pub fn LessonsView() -> Element {
    let ctx = use_context::<AppContext>();

    let api = ctx.api();
    let resource = use_resource(move || {
        let api = api.clone();
        async move {
            api.list_lessons()
                .await
                .map_err(|err| ViewError::from_api(&err))
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page lessons-page",
            header { class: "view-header",
                h2 { class: "view-title", "Уроки" }
            }
            div { class: "view-divider" }
            match state {
                ViewState::Idle => rsx! { p { "..." } },
                ViewState::Loading => rsx! { p { "Загрузка..." } },
                ViewState::Error(err) => rsx! {
                    p { class: "form-error", "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Повторить"
                    }
                },
                ViewState::Ready(lessons) => rsx! {
                    if lessons.is_empty() {
                        p { class: "empty", "Уроков пока нет." }
                    }
                    ul { class: "lesson-list",
                        for lesson in lessons {
                            li {
                                class: if lesson.is_locked { "lesson-item lesson-item--locked" } else { "lesson-item" },
                                // Locked lessons stay visible but unlinked; the
                                // server is the authority if someone navigates anyway.
                                if lesson.is_locked {
                                    span { class: "lesson-title", "{lesson.title}" }
                                    span { class: "lesson-locked", "Заблокировано" }
                                } else {
                                    Link {
                                        class: "lesson-title",
                                        to: Route::LessonDetail { lesson_id: lesson.id.value() },
                                        "{lesson.title}"
                                    }
                                }
                                span { class: "lesson-level", "{lesson.level}" }
                                span { class: "lesson-topic", "{lesson.topic}" }
                            }
                        }
                    }
                },
            }
        }
    }
}
