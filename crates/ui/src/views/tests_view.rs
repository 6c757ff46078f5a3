use dioxus::prelude::*;
use dioxus_router::use_navigator;

use services::AssessmentRun;
use til_core::model::TestId;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, report_error, view_state_from_resource};
use crate::vm::{AssessmentVm, map_assessment};

#[component]
pub fn TestsView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    // The run itself is taken out of the signal for the duration of each
    // request; the snapshot is what the markup renders from.
    let mut run = use_signal(|| None::<AssessmentRun>);
    let mut vm = use_signal(|| None::<AssessmentVm>);
    let mut active_title = use_signal(String::new);
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);

    let api = ctx.api();
    let resource = use_resource(move || {
        let api = api.clone();
        async move {
            api.list_tests(None)
                .await
                .map_err(|err| ViewError::from_api(&err))
        }
    });
    let state = view_state_from_resource(&resource);

    let start_run = {
        let ctx = ctx.clone();
        move |test_id: TestId, title: String| {
            let ctx = ctx.clone();
            let mut run = run;
            let mut vm = vm;
            let mut active_title = active_title;
            let mut busy = busy;
            let mut error = error;
            spawn(async move {
                busy.set(true);
                error.set(None);
                match AssessmentRun::begin(ctx.api(), test_id).await {
                    Ok(new_run) => {
                        vm.set(Some(map_assessment(&new_run)));
                        run.set(Some(new_run));
                        active_title.set(title);
                    }
                    Err(err) => report_error(
                        &ctx,
                        navigator,
                        err.is_unauthorized(),
                        err.to_string(),
                        &mut error,
                    ),
                }
                busy.set(false);
            });
        }
    };

    rsx! {
        div { class: "page tests-page",
            header { class: "view-header",
                h2 { class: "view-title", "Тесты" }
            }
            div { class: "view-divider" }
            if let Some(message) = error() {
                p { class: "form-error", "{message}" }
            }
            if let Some(snapshot) = vm() {
                div { class: "assessment",
                    h3 { "{active_title()}" }
                    if let Some(outcome) = snapshot.outcome.clone() {
                        div {
                            class: if outcome.passed { "assessment-outcome assessment-outcome--passed" } else { "assessment-outcome assessment-outcome--failed" },
                            p { class: "assessment-score", "Ваш результат: {outcome.score_label}" }
                            p { class: "assessment-verdict", "{outcome.verdict_label}" }
                            if outcome.can_retake {
                                button {
                                    class: "btn btn-primary",
                                    r#type: "button",
                                    disabled: busy(),
                                    onclick: {
                                        let start_run = start_run.clone();
                                        move |_| {
                                            let test_id = run.read().as_ref().map(AssessmentRun::test_id);
                                            if let Some(test_id) = test_id {
                                                start_run(test_id, active_title());
                                            }
                                        }
                                    },
                                    "Пройти ещё раз"
                                }
                            }
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                onclick: move |_| {
                                    run.set(None);
                                    vm.set(None);
                                },
                                "К списку тестов"
                            }
                        }
                    } else {
                        ol { class: "assessment-questions",
                            for question in snapshot.questions.clone() {
                                li { class: "assessment-question",
                                    p { "{question.text}" }
                                    if question.options.is_empty() {
                                        input {
                                            class: "assessment-input",
                                            r#type: "text",
                                            placeholder: "Ваш ответ",
                                            value: "{question.answer}",
                                            oninput: {
                                                let question_id = question.id;
                                                move |evt: FormEvent| {
                                                    if let Some(current) = run.write().as_mut() {
                                                        current.set_answer(question_id, evt.value());
                                                    }
                                                    let snapshot = run.read().as_ref().map(map_assessment);
                                                    vm.set(snapshot);
                                                }
                                            },
                                        }
                                    } else {
                                        div { class: "assessment-options",
                                            for option_text in question.options.clone() {
                                                button {
                                                    class: if question.answer == option_text { "btn option option--selected" } else { "btn option" },
                                                    r#type: "button",
                                                    onclick: {
                                                        let question_id = question.id;
                                                        let choice = option_text.clone();
                                                        move |_| {
                                                            if let Some(current) = run.write().as_mut() {
                                                                current.set_answer(question_id, choice.clone());
                                                            }
                                                            let snapshot = run.read().as_ref().map(map_assessment);
                                                            vm.set(snapshot);
                                                        }
                                                    },
                                                    "{option_text}"
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            disabled: busy() || !snapshot.is_complete,
                            onclick: {
                                let ctx = ctx.clone();
                                move |_| {
                                    let ctx = ctx.clone();
                                    let mut run = run;
                                    let mut vm = vm;
                                    let mut busy = busy;
                                    let mut error = error;
                                    spawn(async move {
                                        let Some(mut current) = run.write().take() else {
                                            return;
                                        };
                                        busy.set(true);
                                        error.set(None);
                                        if let Err(err) = current.submit().await {
                                            report_error(
                                                &ctx,
                                                navigator,
                                                err.is_unauthorized(),
                                                err.to_string(),
                                                &mut error,
                                            );
                                        }
                                        vm.set(Some(map_assessment(&current)));
                                        run.set(Some(current));
                                        busy.set(false);
                                    });
                                }
                            },
                            "Завершить тест"
                        }
                    }
                }
            } else {
                match state {
                    ViewState::Idle => rsx! { p { "..." } },
                    ViewState::Loading => rsx! { p { "Загрузка..." } },
                    ViewState::Error(err) => rsx! {
                        p { class: "form-error", "{err.message()}" }
                    },
                    ViewState::Ready(tests) => rsx! {
                        if tests.is_empty() {
                            p { class: "empty", "Тестов пока нет." }
                        }
                        ul { class: "test-list",
                            for test in tests {
                                li { class: "test-item",
                                    span { class: "test-title", "{test.title}" }
                                    if test.is_final {
                                        span { class: "test-final-badge", "Итоговый" }
                                    }
                                    button {
                                        class: "btn btn-primary",
                                        r#type: "button",
                                        disabled: busy(),
                                        onclick: {
                                            let start_run = start_run.clone();
                                            let test_id = test.id;
                                            let title = test.title.clone();
                                            move |_| start_run(test_id, title.clone())
                                        },
                                        "Начать тест"
                                    }
                                }
                            }
                        }
                    },
                }
            }
        }
    }
}
