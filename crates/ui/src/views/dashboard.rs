use dioxus::prelude::*;
use dioxus_router::Link;

use til_core::model::SessionContext;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_context::<Signal<Option<SessionContext>>>();

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
        div { class: "page dashboard-page",
            header { class: "view-header",
                h2 { class: "view-title", "Главная" }
                if let Some(user) = session().as_ref() {
                    p { class: "view-subtitle", "Қош келдіңіз, {user.full_name}!" }
                }
            }
            div { class: "view-divider" }
            match state {
                ViewState::Idle => rsx! { p { "..." } },
                ViewState::Loading => rsx! { p { "Загрузка..." } },
                ViewState::Error(err) => rsx! {
                    p { class: "form-error", "{err.message()}" }
                },
                ViewState::Ready(summary) => rsx! {
                    div { class: "dashboard-stats",
                        div { class: "stat-card",
                            span { class: "stat-value", "{summary.completed_lessons}/{summary.total_lessons}" }
                            span { class: "stat-label", "уроков пройдено" }
                        }
                        div { class: "stat-card",
                            span { class: "stat-value", "{summary.vocabulary_learned}/{summary.vocabulary_size}" }
                            span { class: "stat-label", "слов выучено" }
                        }
                        div { class: "stat-card",
                            span { class: "stat-value", "{summary.exercise_accuracy_percent()}%" }
                            span { class: "stat-label", "точность упражнений" }
                        }
                    }
                },
            }
            div { class: "dashboard-links",
                Link { class: "dashboard-card", to: Route::Lessons {}, "Продолжить уроки" }
                Link { class: "dashboard-card", to: Route::Vocabulary {}, "Тренировать слова" }
                Link { class: "dashboard-card", to: Route::Chat { lesson_id: None }, "Спросить ассистента" }
            }
        }
    }
}
