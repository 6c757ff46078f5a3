#![forbid(unsafe_code)]

pub mod api;
pub mod credentials;
pub mod error;
pub mod fake;
pub mod http;

pub use api::{AddVocabulary, Credential, LearningApi};
pub use credentials::{CredentialStore, InMemoryCredentialStore};
pub use error::ApiError;
pub use fake::{FakeLearningApi, ScriptedFailure};
pub use http::HttpLearningApi;
