use dioxus::prelude::*;
use dioxus_router::use_navigator;

use til_core::model::{Exercise, ExerciseId, LessonId, LessonSummary};

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, report_error, view_state_from_resource};

#[derive(Clone, Debug, PartialEq)]
struct ExercisesData {
    lessons: Vec<LessonSummary>,
    exercises: Vec<Exercise>,
}

#[derive(Clone, Debug, PartialEq)]
enum AttemptState {
    Idle,
    Submitting,
    Correct,
    Incorrect,
}

#[component]
pub fn ExercisesView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut lesson_filter = use_signal(|| None::<u64>);
    let mut active = use_signal(|| None::<ExerciseId>);
    let mut answer = use_signal(String::new);
    let mut attempt = use_signal(|| AttemptState::Idle);
    let mut error = use_signal(|| None::<String>);

    let api = ctx.api();
    let resource = use_resource(move || {
        let api = api.clone();
        let filter = lesson_filter().map(LessonId::new);
        async move {
            let lessons = api
                .list_lessons()
                .await
                .map_err(|err| ViewError::from_api(&err))?;
            let exercises = api
                .list_exercises(filter)
                .await
                .map_err(|err| ViewError::from_api(&err))?;
            Ok::<_, ViewError>(ExercisesData { lessons, exercises })
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page exercises-page",
            header { class: "view-header",
                h2 { class: "view-title", "Упражнения" }
            }
            div { class: "view-divider" }
            match state {
                ViewState::Idle => rsx! { p { "..." } },
                ViewState::Loading => rsx! { p { "Загрузка..." } },
                ViewState::Error(err) => rsx! {
                    p { class: "form-error", "{err.message()}" }
                },
                ViewState::Ready(data) => rsx! {
                    select {
                        class: "exercise-filter",
                        onchange: move |evt| {
                            active.set(None);
                            attempt.set(AttemptState::Idle);
                            lesson_filter.set(evt.value().parse::<u64>().ok());
                        },
                        option { value: "", selected: lesson_filter().is_none(), "Все уроки" }
                        for lesson in data.lessons.iter().filter(|lesson| !lesson.is_locked) {
                            option {
                                value: "{lesson.id.value()}",
                                selected: lesson_filter() == Some(lesson.id.value()),
                                "{lesson.title}"
                            }
                        }
                    }
                    if data.exercises.is_empty() {
                        p { class: "empty", "Упражнений нет." }
                    }
                    ul { class: "exercise-list",
                        for exercise in data.exercises.clone() {
                            li { class: "exercise-item",
                                div { class: "exercise-head",
                                    span { class: "exercise-title", "{exercise.title}" }
                                    span { class: "exercise-type", "{exercise.exercise_type.label()}" }
                                }
                                if active() == Some(exercise.id) {
                                    p { class: "exercise-question", "{exercise.question}" }
                                    if exercise.has_options() {
                                        div { class: "exercise-options",
                                            for option_text in exercise.options.clone() {
                                                button {
                                                    class: if answer() == option_text { "btn option option--selected" } else { "btn option" },
                                                    r#type: "button",
                                                    onclick: {
                                                        let choice = option_text.clone();
                                                        move |_| answer.set(choice.clone())
                                                    },
                                                    "{option_text}"
                                                }
                                            }
                                        }
                                    } else {
                                        input {
                                            class: "exercise-input",
                                            r#type: "text",
                                            placeholder: "Ваш ответ",
                                            value: "{answer()}",
                                            oninput: move |evt| answer.set(evt.value()),
                                        }
                                    }
                                    match attempt() {
                                        AttemptState::Correct => rsx! { p { class: "verdict verdict--ok", "Верно!" } },
                                        AttemptState::Incorrect => rsx! { p { class: "verdict verdict--bad", "Неверно, попробуйте ещё раз." } },
                                        _ => rsx! {},
                                    }
                                    if let Some(message) = error() {
                                        p { class: "form-error", "{message}" }
                                    }
                                    button {
                                        class: "btn btn-primary",
                                        r#type: "button",
                                        disabled: attempt() == AttemptState::Submitting || answer().trim().is_empty(),
                                        onclick: {
                                            let ctx = ctx.clone();
                                            let exercise_id = exercise.id;
                                            move |_| {
                                                let ctx = ctx.clone();
                                                let mut attempt = attempt;
                                                let mut error = error;
                                                let submitted = answer().trim().to_string();
                                                spawn(async move {
                                                    attempt.set(AttemptState::Submitting);
                                                    error.set(None);
                                                    match ctx.api().submit_exercise(exercise_id, &submitted).await {
                                                        Ok(result) if result.is_correct => attempt.set(AttemptState::Correct),
                                                        Ok(_) => attempt.set(AttemptState::Incorrect),
                                                        Err(err) => {
                                                            attempt.set(AttemptState::Idle);
                                                            report_error(
                                                                &ctx,
                                                                navigator,
                                                                err.is_unauthorized(),
                                                                err.detail_message(),
                                                                &mut error,
                                                            );
                                                        }
                                                    }
                                                });
                                            }
                                        },
                                        "Проверить"
                                    }
                                } else {
                                    button {
                                        class: "btn btn-secondary",
                                        r#type: "button",
                                        onclick: {
                                            let exercise_id = exercise.id;
                                            move |_| {
                                                active.set(Some(exercise_id));
                                                answer.set(String::new());
                                                attempt.set(AttemptState::Idle);
                                                error.set(None);
                                            }
                                        },
                                        "Решить"
                                    }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}
