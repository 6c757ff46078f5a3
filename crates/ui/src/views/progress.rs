use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[component]
pub fn ProgressView() -> Element {
    let ctx = use_context::<AppContext>();

    let api = ctx.api();
    let resource = use_resource(move || {
        let api = api.clone();
        async move {
            api.progress_summary()
                .await
                .map_err(|err| ViewError::from_api(&err))
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page progress-page",
            header { class: "view-header",
                h2 { class: "view-title", "Прогресс" }
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
                ViewState::Ready(summary) => rsx! {
                    table { class: "progress-table",
                        tbody {
                            tr {
                                td { "Уроки" }
                                td { "{summary.completed_lessons} из {summary.total_lessons}" }
                            }
                            tr {
                                td { "Слова в словаре" }
                                td { "{summary.vocabulary_size}" }
                            }
                            tr {
                                td { "Выучено слов" }
                                td { "{summary.vocabulary_learned}" }
                            }
                            tr {
                                td { "Попыток упражнений" }
                                td { "{summary.exercise_attempts}" }
                            }
                            tr {
                                td { "Точность упражнений" }
                                td { "{summary.exercise_accuracy_percent()}%" }
                            }
                            tr {
                                td { "Пройдено тестов" }
                                td { "{summary.test_passed} из {summary.test_attempts}" }
                            }
                        }
                    }
                },
            }
        }
    }
}
