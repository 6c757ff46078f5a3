use std::time::Duration;

use dioxus::prelude::*;
use dioxus_router::use_navigator;

use client::AddVocabulary;
use services::{DrillError, DrillPhase, DrillSession};
use til_core::model::VocabularyStatus;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, report_error, view_state_from_resource};
use crate::vm::{DrillVm, map_drill};

/// Pause between drill feedback and the next question.
const FEEDBACK_DELAY: Duration = Duration::from_millis(1500);

#[component]
pub fn VocabularyView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut tab = use_signal(|| VocabularyStatus::InProgress);
    let mut new_word = use_signal(String::new);
    let mut new_translation = use_signal(String::new);
    let mut form_error = use_signal(|| None::<String>);
    let mut drill = use_signal(|| None::<DrillSession>);
    let mut drill_vm = use_signal(|| None::<DrillVm>);
    let mut drill_answer = use_signal(String::new);
    let mut drill_error = use_signal(|| None::<String>);

    let api = ctx.api();
    let resource = use_resource(move || {
        let api = api.clone();
        let status = tab();
        async move {
            api.list_vocabulary(Some(status))
                .await
                .map_err(|err| ViewError::from_api(&err))
        }
    });
    let state = view_state_from_resource(&resource);

    // Takes the drill session out of its signal, runs one async step on it,
    // and publishes a fresh snapshot. Feedback schedules a delayed advance;
    // if the learner ends the sitting during the pause the session is back
    // in Idle by then and the advance is a no-op.
    let drill_step = {
        let ctx = ctx.clone();
        move |step: DrillStep| {
            let ctx = ctx.clone();
            let mut drill = drill;
            let mut drill_vm = drill_vm;
            let mut drill_answer = drill_answer;
            let mut drill_error = drill_error;
            spawn(async move {
                let mut current = match step {
                    DrillStep::Start => DrillSession::new(ctx.api()),
                    _ => {
                        let Some(session) = drill.write().take() else {
                            return;
                        };
                        session
                    }
                };
                drill_error.set(None);
                let outcome = match &step {
                    DrillStep::Start => current.request_next().await,
                    DrillStep::Submit(answer) => match current.submit(answer).await {
                        Ok(_) => {
                            drill_answer.set(String::new());
                            Ok(())
                        }
                        Err(err) => Err(err),
                    },
                    DrillStep::End => {
                        current.end();
                        Ok(())
                    }
                };
                match outcome {
                    Ok(()) => {}
                    Err(DrillError::EmptyAnswer) => {
                        drill_error.set(Some("Введите ответ".to_string()));
                    }
                    Err(err) => report_error(
                        &ctx,
                        navigator,
                        err.is_unauthorized(),
                        err.to_string(),
                        &mut drill_error,
                    ),
                }
                let schedule_advance = current.phase() == DrillPhase::Feedback;
                drill_vm.set(Some(map_drill(&current)));
                drill.set(Some(current));
                if schedule_advance {
                    let ctx = ctx.clone();
                    spawn(async move {
                        tokio::time::sleep(FEEDBACK_DELAY).await;
                        let Some(mut session) = drill.write().take() else {
                            return;
                        };
                        if session.phase() == DrillPhase::Feedback {
                            if let Err(err) = session.request_next().await {
                                report_error(
                                    &ctx,
                                    navigator,
                                    err.is_unauthorized(),
                                    err.to_string(),
                                    &mut drill_error,
                                );
                            }
                        }
                        drill_vm.set(Some(map_drill(&session)));
                        drill.set(Some(session));
                    });
                }
            });
        }
    };

    let snapshot = drill_vm();
    rsx! {
        div { class: "page vocabulary-page",
            header { class: "view-header",
                h2 { class: "view-title", "Словарь" }
            }
            div { class: "view-divider" }

            // ── drill ──
            div { class: "drill-panel",
                match snapshot {
                    None => rsx! {
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            onclick: {
                                let drill_step = drill_step.clone();
                                move |_| drill_step(DrillStep::Start)
                            },
                            "Начать тренировку"
                        }
                    },
                    Some(vm) => rsx! {
                        div { class: "drill-progress",
                            span { "Отвечено: {vm.answered}, верно: {vm.correct}" }
                        }
                        match vm.phase {
                            DrillPhase::Idle => rsx! {
                                button {
                                    class: "btn btn-primary",
                                    r#type: "button",
                                    onclick: {
                                        let drill_step = drill_step.clone();
                                        move |_| drill_step(DrillStep::Start)
                                    },
                                    "Начать тренировку"
                                }
                            },
                            DrillPhase::Loading | DrillPhase::Submitting => rsx! {
                                p { "..." }
                            },
                            DrillPhase::Exhausted => rsx! {
                                p { class: "drill-exhausted",
                                    {vm.exhausted_message.clone().unwrap_or_default()}
                                }
                                button {
                                    class: "btn btn-secondary",
                                    r#type: "button",
                                    onclick: {
                                        let drill_step = drill_step.clone();
                                        move |_| drill_step(DrillStep::End)
                                    },
                                    "Закончить"
                                }
                            },
                            DrillPhase::Feedback => rsx! {
                                if let Some(feedback) = vm.feedback.clone() {
                                    p {
                                        class: if feedback.is_correct { "verdict verdict--ok" } else { "verdict verdict--bad" },
                                        "{feedback.verdict_label}"
                                    }
                                    div { class: "mastery-bar",
                                        div {
                                            class: "mastery-fill",
                                            style: "width: {feedback.mastery_percent}%",
                                        }
                                        span { class: "mastery-label", "{feedback.mastery_label}" }
                                    }
                                    if feedback.learned {
                                        p { class: "drill-learned", "Слово выучено!" }
                                    }
                                }
                            },
                            DrillPhase::Presenting => rsx! {
                                p { class: "drill-prompt",
                                    {vm.prompt_label.clone().unwrap_or_default()}
                                }
                                if vm.options.is_empty() {
                                    input {
                                        class: "drill-input",
                                        r#type: "text",
                                        placeholder: "Ваш ответ",
                                        value: "{drill_answer()}",
                                        oninput: move |evt| drill_answer.set(evt.value()),
                                        onkeydown: {
                                            let drill_step = drill_step.clone();
                                            move |evt: KeyboardEvent| {
                                                if evt.key() == Key::Enter {
                                                    drill_step(DrillStep::Submit(drill_answer()));
                                                }
                                            }
                                        },
                                    }
                                } else {
                                    div { class: "drill-options",
                                        for option_text in vm.options.clone() {
                                            button {
                                                class: "btn option",
                                                r#type: "button",
                                                onclick: {
                                                    let drill_step = drill_step.clone();
                                                    let choice = option_text.clone();
                                                    move |_| drill_step(DrillStep::Submit(choice.clone()))
                                                },
                                                "{option_text}"
                                            }
                                        }
                                    }
                                }
                                if let Some(message) = drill_error() {
                                    p { class: "form-error", "{message}" }
                                }
                                div { class: "drill-actions",
                                    button {
                                        class: "btn btn-primary",
                                        r#type: "button",
                                        onclick: {
                                            let drill_step = drill_step.clone();
                                            move |_| drill_step(DrillStep::Submit(drill_answer()))
                                        },
                                        "Ответить"
                                    }
                                    button {
                                        class: "btn btn-secondary",
                                        r#type: "button",
                                        onclick: {
                                            let drill_step = drill_step.clone();
                                            move |_| drill_step(DrillStep::End)
                                        },
                                        "Закончить"
                                    }
                                }
                            },
                        }
                    },
                }
            }

            // ── word list ──
            div { class: "vocabulary-tabs",
                button {
                    class: if tab() == VocabularyStatus::InProgress { "btn tab tab--active" } else { "btn tab" },
                    r#type: "button",
                    onclick: move |_| tab.set(VocabularyStatus::InProgress),
                    "Изучаю"
                }
                button {
                    class: if tab() == VocabularyStatus::Learned { "btn tab tab--active" } else { "btn tab" },
                    r#type: "button",
                    onclick: move |_| tab.set(VocabularyStatus::Learned),
                    "Изучено"
                }
            }
            div { class: "vocabulary-add",
                input {
                    class: "vocabulary-input",
                    r#type: "text",
                    placeholder: "Слово (қазақша)",
                    value: "{new_word()}",
                    oninput: move |evt| new_word.set(evt.value()),
                }
                input {
                    class: "vocabulary-input",
                    r#type: "text",
                    placeholder: "Перевод",
                    value: "{new_translation()}",
                    oninput: move |evt| new_translation.set(evt.value()),
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: new_word().trim().is_empty() || new_translation().trim().is_empty(),
                    onclick: {
                        let ctx = ctx.clone();
                        move |_| {
                            let ctx = ctx.clone();
                            let mut form_error = form_error;
                            let mut new_word = new_word;
                            let mut new_translation = new_translation;
                            let word = new_word().trim().to_string();
                            let translation = new_translation().trim().to_string();
                            spawn(async move {
                                form_error.set(None);
                                let request = AddVocabulary::ByPair {
                                    word_source: word,
                                    translation,
                                };
                                match ctx.api().add_vocabulary(&request).await {
                                    Ok(_) => {
                                        new_word.set(String::new());
                                        new_translation.set(String::new());
                                        let mut resource = resource;
                                        resource.restart();
                                    }
                                    Err(err) if err.is_conflict() => {
                                        form_error.set(Some("Уже в словаре".to_string()));
                                    }
                                    Err(err) => report_error(
                                        &ctx,
                                        navigator,
                                        err.is_unauthorized(),
                                        err.detail_message(),
                                        &mut form_error,
                                    ),
                                }
                            });
                        }
                    },
                    "Добавить"
                }
            }
            if let Some(message) = form_error() {
                p { class: "form-error", "{message}" }
            }
            match state {
                ViewState::Idle => rsx! { p { "..." } },
                ViewState::Loading => rsx! { p { "Загрузка..." } },
                ViewState::Error(err) => rsx! {
                    p { class: "form-error", "{err.message()}" }
                },
                ViewState::Ready(entries) => rsx! {
                    if entries.is_empty() {
                        p { class: "empty", "В этом списке пока нет слов." }
                    }
                    ul { class: "vocabulary-list",
                        for entry in entries {
                            li { class: "vocabulary-item",
                                span { class: "vocabulary-word", "{entry.word_source}" }
                                span { class: "vocabulary-translation", "{entry.translation}" }
                                div { class: "mastery-bar",
                                    div {
                                        class: "mastery-fill",
                                        style: "width: {entry.mastery.percent()}%",
                                    }
                                    span { class: "mastery-label", "{entry.mastery}" }
                                }
                                button {
                                    class: "btn btn-danger",
                                    r#type: "button",
                                    onclick: {
                                        let ctx = ctx.clone();
                                        let id = entry.id;
                                        move |_| {
                                            let ctx = ctx.clone();
                                            let mut form_error = form_error;
                                            spawn(async move {
                                                match ctx.api().remove_vocabulary(id).await {
                                                    Ok(()) => {
                                                        let mut resource = resource;
                                                        resource.restart();
                                                    }
                                                    Err(err) => report_error(
                                                        &ctx,
                                                        navigator,
                                                        err.is_unauthorized(),
                                                        err.detail_message(),
                                                        &mut form_error,
                                                    ),
                                                }
                                            });
                                        }
                                    },
                                    "Удалить"
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum DrillStep {
    Start,
    Submit(String),
    End,
}
