use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};

use client::{CredentialStore, FakeLearningApi, InMemoryCredentialStore, LearningApi};
use services::Clock;
use til_core::model::SessionContext;
use til_core::time::fixed_now;

use crate::context::{UiApp, build_app_context};
use crate::views::{
    AdminView, ChatView, DashboardView, ExercisesView, LessonDetailView, LessonsView,
    ProgressView, TestsView, VocabularyView,
};

#[derive(Clone)]
struct TestApp {
    api: Arc<FakeLearningApi>,
    credentials: Arc<InMemoryCredentialStore>,
}

impl UiApp for TestApp {
    fn api(&self) -> Arc<dyn LearningApi> {
        self.api.clone()
    }

    fn credentials(&self) -> Arc<dyn CredentialStore> {
        self.credentials.clone()
    }

    fn clock(&self) -> Clock {
        Clock::fixed(fixed_now())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Dashboard,
    Lessons,
    Lesson(u64),
    Exercises,
    Tests,
    Chat,
    Vocabulary,
    Progress,
    Admin,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    session: Option<SessionContext>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    // Views read the authenticated profile from the shell's signal. The
    // harness provides it directly so tests bypass the shell's own load.
    let session = props.session.clone();
    use_context_provider(|| Signal::new(session));
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Dashboard => rsx! { DashboardView {} },
        ViewKind::Lessons => rsx! { LessonsView {} },
        ViewKind::Lesson(lesson_id) => rsx! { LessonDetailView { lesson_id } },
        ViewKind::Exercises => rsx! { ExercisesView {} },
        ViewKind::Tests => rsx! { TestsView {} },
        ViewKind::Chat => rsx! { ChatView { lesson_id: None } },
        ViewKind::Vocabulary => rsx! { VocabularyView {} },
        ViewKind::Progress => rsx! { ProgressView {} },
        ViewKind::Admin => rsx! { AdminView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub api: Arc<FakeLearningApi>,
    pub credentials: Arc<InMemoryCredentialStore>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub async fn setup_view_harness(view: ViewKind) -> ViewHarness {
    setup_view_harness_with(view, FakeLearningApi::new()).await
}

pub async fn setup_view_harness_with(view: ViewKind, api: FakeLearningApi) -> ViewHarness {
    let api = Arc::new(api);
    let session = api.current_user().await.ok();
    let credentials = Arc::new(InMemoryCredentialStore::new(Some("token".to_string())));
    let app = Arc::new(TestApp {
        api: Arc::clone(&api),
        credentials: Arc::clone(&credentials),
    });

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps { app, view, session },
    );

    ViewHarness {
        dom,
        api,
        credentials,
    }
}
