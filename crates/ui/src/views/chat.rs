use dioxus::prelude::*;
use dioxus_router::use_navigator;

use services::{ChatError, ConversationThread};
use til_core::model::{LessonId, RefineMode, SessionContext, VocabularyId};

use crate::context::AppContext;
use crate::views::report_error;
use crate::vm::{ChatVm, map_chat, map_chat_busy};

#[component]
pub fn ChatView(lesson_id: Option<u64>) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let session = use_context::<Signal<Option<SessionContext>>>();
    let lesson_id = lesson_id.map(LessonId::new);

    let thread_ctx = ctx.clone();
    let mut thread = use_signal(move || {
        let level = session
            .peek()
            .as_ref()
            .map(|user| user.proficiency_level.as_str().to_string())
            .unwrap_or_else(|| "A1".to_string());
        Some(ConversationThread::new(
            thread_ctx.api(),
            thread_ctx.clock(),
            level,
            lesson_id,
        ))
    });
    let mut vm = use_signal(|| ChatVm {
        turns: vec![],
        can_refine: false,
        in_flight: false,
    });
    let mut draft = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);

    // All four chat actions funnel through the same take/await/put-back
    // cycle, so the closures only differ in which thread method they call.
    let dispatch = {
        let ctx = ctx.clone();
        move |action: ChatAction| {
            let ctx = ctx.clone();
            let mut thread = thread;
            let mut vm = vm;
            let mut draft = draft;
            let mut error = error;
            spawn(async move {
                let Some(mut current) = thread.write().take() else {
                    return;
                };
                error.set(None);
                vm.set(map_chat_busy(&current));
                let outcome = match &action {
                    ChatAction::Send(text) => current.send(text).await,
                    ChatAction::Refine(mode) => current.refine(*mode).await,
                    ChatAction::AddMention(id) => current.add_mention(*id).await,
                };
                match outcome {
                    Ok(()) => {
                        if matches!(action, ChatAction::Send(_)) {
                            draft.set(String::new());
                        }
                    }
                    Err(ChatError::EmptyMessage) => {
                        error.set(Some("Введите сообщение".to_string()));
                    }
                    Err(err) => report_error(
                        &ctx,
                        navigator,
                        err.is_unauthorized(),
                        err.to_string(),
                        &mut error,
                    ),
                }
                vm.set(map_chat(&current));
                thread.set(Some(current));
            });
        }
    };

    let snapshot = vm();
    rsx! {
        div { class: "page chat-page",
            header { class: "view-header",
                h2 { class: "view-title",
                    if lesson_id.is_some() { "Чат по уроку" } else { "Чат с ассистентом" }
                }
            }
            div { class: "view-divider" }
            div { class: "chat-transcript",
                if snapshot.turns.is_empty() {
                    p { class: "empty", "Задайте вопрос о казахском языке." }
                }
                for turn in snapshot.turns.clone() {
                    div {
                        class: if turn.is_user { "chat-turn chat-turn--user" }
                               else if turn.is_error { "chat-turn chat-turn--error" }
                               else { "chat-turn chat-turn--assistant" },
                        div { class: "chat-bubble",
                            div { dangerous_inner_html: "{turn.html}" }
                            div { class: "chat-meta",
                                if let Some(source) = turn.source_label {
                                    span { class: "chat-source-badge", "{source}" }
                                }
                                span { class: "chat-time", "{turn.time_label}" }
                            }
                        }
                        if !turn.mentions.is_empty() {
                            div { class: "chat-mentions",
                                for mention in turn.mentions.clone() {
                                    button {
                                        class: "btn chat-mention",
                                        r#type: "button",
                                        disabled: mention.disabled,
                                        onclick: {
                                            let dispatch = dispatch.clone();
                                            let id = mention.vocabulary_id;
                                            move |_| dispatch(ChatAction::AddMention(id))
                                        },
                                        "{mention.word}: {mention.button_label}"
                                    }
                                }
                            }
                        }
                        if !turn.suggestions.is_empty() {
                            div { class: "chat-suggestions",
                                for suggestion in turn.suggestions.clone() {
                                    button {
                                        class: "btn chat-suggestion",
                                        r#type: "button",
                                        disabled: snapshot.in_flight,
                                        onclick: {
                                            let dispatch = dispatch.clone();
                                            let text = suggestion.clone();
                                            move |_| dispatch(ChatAction::Send(text.clone()))
                                        },
                                        "{suggestion}"
                                    }
                                }
                            }
                        }
                    }
                }
            }
            if snapshot.can_refine {
                div { class: "chat-refine",
                    for mode in RefineMode::ALL {
                        button {
                            class: "btn chat-refine-button",
                            r#type: "button",
                            disabled: snapshot.in_flight,
                            onclick: {
                                let dispatch = dispatch.clone();
                                move |_| dispatch(ChatAction::Refine(mode))
                            },
                            "{mode.label()}"
                        }
                    }
                }
            }
            if let Some(message) = error() {
                p { class: "form-error", "{message}" }
            }
            div { class: "chat-composer",
                input {
                    class: "chat-input",
                    r#type: "text",
                    placeholder: "Ваш вопрос...",
                    value: "{draft()}",
                    oninput: move |evt| draft.set(evt.value()),
                    onkeydown: {
                        let dispatch = dispatch.clone();
                        move |evt: KeyboardEvent| {
                            if evt.key() == Key::Enter {
                                dispatch(ChatAction::Send(draft()));
                            }
                        }
                    },
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: snapshot.in_flight,
                    onclick: {
                        let dispatch = dispatch.clone();
                        move |_| dispatch(ChatAction::Send(draft()))
                    },
                    "Отправить"
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum ChatAction {
    Send(String),
    Refine(RefineMode),
    AddMention(VocabularyId),
}
