mod admin;
mod chat;
mod dashboard;
mod exercises;
mod lesson;
mod lessons;
mod login;
mod progress;
mod state;
mod tests_view;
mod vocabulary;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use admin::AdminView;
pub use chat::ChatView;
pub use dashboard::DashboardView;
pub use exercises::ExercisesView;
pub use lesson::LessonDetailView;
pub use lessons::LessonsView;
pub use login::LoginView;
pub use progress::ProgressView;
pub use state::{ViewError, ViewState, report_error, view_state_from_resource};
pub use tests_view::TestsView;
pub use vocabulary::VocabularyView;
