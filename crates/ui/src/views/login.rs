use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::ViewError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FormMode {
    Login,
    Register,
}

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut mode = use_signal(|| FormMode::Login);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut full_name = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let submit_label = match mode() {
        FormMode::Login => "Войти",
        FormMode::Register => "Зарегистрироваться",
    };

    let on_submit = move |_| {
        let ctx = ctx.clone();
        let mut error = error;
        let mut busy = busy;
        let mode_now = mode();
        let email_value = email().trim().to_string();
        let password_value = password();
        let full_name_value = full_name().trim().to_string();
        if email_value.is_empty() || password_value.is_empty() {
            error.set(Some("Заполните все поля".to_string()));
            return;
        }
        if mode_now == FormMode::Register && full_name_value.is_empty() {
            error.set(Some("Заполните все поля".to_string()));
            return;
        }
        spawn(async move {
            busy.set(true);
            error.set(None);
            let api = ctx.api();
            let outcome = async {
                if mode_now == FormMode::Register {
                    api.register(&email_value, &password_value, &full_name_value)
                        .await?;
                }
                api.login(&email_value, &password_value).await
            }
            .await;
            busy.set(false);
            match outcome {
                Ok(credential) => {
                    ctx.credentials().set_token(&credential.access_token);
                    ctx.reset_logout();
                    navigator.replace(Route::Dashboard {});
                }
                Err(err) => {
                    error.set(Some(ViewError::from_api(&err).message().to_string()));
                }
            }
        });
    };

    rsx! {
        div { class: "page login-page",
            h2 { "Til — изучение казахского" }
            div { class: "login-form",
                if mode() == FormMode::Register {
                    input {
                        class: "login-input",
                        r#type: "text",
                        placeholder: "Имя",
                        value: "{full_name()}",
                        oninput: move |evt| full_name.set(evt.value()),
                    }
                }
                input {
                    class: "login-input",
                    r#type: "email",
                    placeholder: "Email",
                    value: "{email()}",
                    oninput: move |evt| email.set(evt.value()),
                }
                input {
                    class: "login-input",
                    r#type: "password",
                    placeholder: "Пароль",
                    value: "{password()}",
                    oninput: move |evt| password.set(evt.value()),
                }
                if let Some(message) = error() {
                    p { class: "form-error", "{message}" }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: busy(),
                    onclick: on_submit,
                    "{submit_label}"
                }
                button {
                    class: "btn btn-link",
                    r#type: "button",
                    onclick: move |_| {
                        error.set(None);
                        mode.set(match mode() {
                            FormMode::Login => FormMode::Register,
                            FormMode::Register => FormMode::Login,
                        });
                    },
                    match mode() {
                        FormMode::Login => "Нет аккаунта? Регистрация",
                        FormMode::Register => "Уже есть аккаунт? Войти",
                    }
                }
            }
        }
    }
}
