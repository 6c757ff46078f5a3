use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use services::LessonFlow;
use til_core::model::{ChatContext, LessonId, SessionContext};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, report_error, view_state_from_resource};
use crate::vm::{markdown_to_html, sanitize_html};

#[component]
pub fn LessonDetailView(lesson_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let session = use_context::<Signal<Option<SessionContext>>>();
    let lesson_id = LessonId::new(lesson_id);
    let mut completed = use_signal(|| false);
    let mut completing = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);
    let mut ask_text = use_signal(String::new);
    let mut ask_reply = use_signal(|| None::<String>);
    let mut ask_busy = use_signal(|| false);
    let mut ask_error = use_signal(|| None::<String>);

    let api = ctx.api();
    let resource = use_resource(move || {
        let api = api.clone();
        async move {
            LessonFlow::load(api, lesson_id)
                .await
                .map_err(|err| match err {
                    services::LessonFlowError::Api(inner) => ViewError::from_api(&inner),
                })
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page lesson-page",
            match state {
                ViewState::Idle => rsx! { p { "..." } },
                ViewState::Loading => rsx! { p { "Загрузка..." } },
                ViewState::Error(err) => rsx! {
                    p { class: "form-error", "{err.message()}" }
                    Link { to: Route::Lessons {}, "К списку уроков" }
                },
                ViewState::Ready(flow) => {
                    let lesson = flow.lesson().clone();
                    let next = flow.next().clone();
                    let final_test = flow.final_test().cloned();
                    let content_html = markdown_to_html(&lesson.content);
                    let flow_for_complete = flow.clone();
                    let ask_ctx = ctx.clone();
                    rsx! {
                        header { class: "view-header",
                            h2 { class: "view-title", "{lesson.title}" }
                            p { class: "view-subtitle", "{lesson.level} · {lesson.topic}" }
                        }
                        div { class: "view-divider" }
                        article {
                            class: "lesson-content",
                            dangerous_inner_html: "{content_html}",
                        }
                        if let Some(test) = final_test.as_ref() {
                            div { class: "final-test-notice",
                                p { "Для завершения урока необходимо пройти итоговый тест: {test.title}" }
                                Link { class: "btn btn-secondary", to: Route::Tests {}, "Перейти к тестам" }
                            }
                        }
                        // One-shot question about this lesson, answered in
                        // place. The chat view keeps the full thread.
                        div { class: "lesson-ask",
                            p { class: "lesson-ask-title", "Спросить по уроку" }
                            div { class: "lesson-ask-form",
                                input {
                                    class: "lesson-ask-input",
                                    r#type: "text",
                                    placeholder: "Ваш вопрос...",
                                    value: "{ask_text()}",
                                    oninput: move |evt| ask_text.set(evt.value()),
                                }
                                button {
                                    class: "btn btn-secondary",
                                    r#type: "button",
                                    disabled: ask_busy(),
                                    onclick: {
                                        let lesson_id = lesson.id;
                                        move |_| {
                                            if ask_busy() {
                                                return;
                                            }
                                            let question = ask_text().trim().to_string();
                                            if question.is_empty() {
                                                ask_error.set(Some("Введите сообщение".to_string()));
                                                return;
                                            }
                                            let ctx = ask_ctx.clone();
                                            spawn(async move {
                                                ask_busy.set(true);
                                                ask_error.set(None);
                                                let level = session
                                                    .peek()
                                                    .as_ref()
                                                    .map_or_else(
                                                        || "A1".to_string(),
                                                        |user| user.proficiency_level.as_str().to_string(),
                                                    );
                                                let context = ChatContext::new(level, Some(lesson_id));
                                                match ctx.api().chat(&question, &context).await {
                                                    Ok(reply) => {
                                                        ask_reply.set(Some(sanitize_html(
                                                            &reply.text.replace('\n', "<br>"),
                                                        )));
                                                        ask_text.set(String::new());
                                                    }
                                                    Err(err) => report_error(
                                                        &ctx,
                                                        navigator,
                                                        err.is_unauthorized(),
                                                        err.detail_message(),
                                                        &mut ask_error,
                                                    ),
                                                }
                                                ask_busy.set(false);
                                            });
                                        }
                                    },
                                    "Спросить"
                                }
                            }
                            if let Some(message) = ask_error() {
                                p { class: "form-error", "{message}" }
                            }
                            if let Some(reply) = ask_reply() {
                                div {
                                    class: "lesson-ask-reply",
                                    dangerous_inner_html: "{reply}",
                                }
                            }
                        }
                        if let Some(message) = error() {
                            p { class: "form-error", "{message}" }
                        }
                        div { class: "lesson-actions",
                            Link {
                                class: "btn btn-secondary",
                                to: Route::Chat { lesson_id: Some(lesson.id.value()) },
                                "Открыть чат по уроку"
                            }
                            if completed() {
                                span { class: "lesson-completed", "Урок завершён" }
                            } else {
                                button {
                                    class: "btn btn-primary",
                                    r#type: "button",
                                    disabled: completing(),
                                    onclick: move |_| {
                                        let ctx = ctx.clone();
                                        let mut flow = flow_for_complete.clone();
                                        let mut error = error;
                                        let mut completed = completed;
                                        let mut completing = completing;
                                        spawn(async move {
                                            completing.set(true);
                                            error.set(None);
                                            match flow.complete().await {
                                                Ok(()) => completed.set(true),
                                                Err(err) => report_error(
                                                    &ctx,
                                                    navigator,
                                                    err.is_unauthorized(),
                                                    err.to_string(),
                                                    &mut error,
                                                ),
                                            }
                                            completing.set(false);
                                        });
                                    },
                                    "Завершить урок"
                                }
                            }
                            if next.has_next() {
                                if next.is_accessible {
                                    if let Some(next_id) = next.next_lesson_id {
                                        Link {
                                            class: "btn btn-primary",
                                            to: Route::LessonDetail { lesson_id: next_id.value() },
                                            "Следующий урок: {next.title}"
                                        }
                                    }
                                } else {
                                    span { class: "lesson-locked",
                                        {next.locked_reason.clone().unwrap_or_else(|| "Следующий урок пока недоступен".to_string())}
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
