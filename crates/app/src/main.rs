use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};

use client::{CredentialStore, HttpLearningApi, LearningApi};
use services::Clock;
use ui::{App, UiApp, build_app_context};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TOKEN_FILE: &str = ".til-token";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidBaseUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidBaseUrl { raw } => write!(f, "invalid --base-url value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--base-url <url>] [--token-file <path>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --base-url {DEFAULT_BASE_URL}");
    eprintln!("  --token-file {DEFAULT_TOKEN_FILE}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TIL_API_URL, TIL_TOKEN_FILE");
}

struct Args {
    base_url: String,
    token_file: PathBuf,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut base_url = std::env::var("TIL_API_URL")
            .ok()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut token_file = std::env::var("TIL_TOKEN_FILE")
            .ok()
            .map_or_else(|| PathBuf::from(DEFAULT_TOKEN_FILE), PathBuf::from);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--base-url" => {
                    let value = require_value(args, "--base-url")?;
                    if !value.starts_with("http://") && !value.starts_with("https://") {
                        return Err(ArgsError::InvalidBaseUrl { raw: value });
                    }
                    base_url = value;
                }
                "--token-file" => {
                    let value = require_value(args, "--token-file")?;
                    token_file = PathBuf::from(value);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            base_url,
            token_file,
        })
    }
}

/// Token storage backed by a plain file, so the session survives restarts.
/// Read and write failures degrade to "no token"; the shell then routes the
/// learner to the login screen.
struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialStore for FileCredentialStore {
    fn token(&self) -> Option<String> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        let token = raw.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    fn set_token(&self, token: &str) {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(err) = std::fs::write(&self.path, token) {
            eprintln!("failed to persist token to {}: {err}", self.path.display());
        }
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                eprintln!("failed to remove token at {}: {err}", self.path.display());
            }
        }
    }
}

struct DesktopApp {
    api: Arc<HttpLearningApi>,
    credentials: Arc<FileCredentialStore>,
}

impl UiApp for DesktopApp {
    fn api(&self) -> Arc<dyn LearningApi> {
        Arc::clone(&self.api) as Arc<dyn LearningApi>
    }

    fn credentials(&self) -> Arc<dyn CredentialStore> {
        Arc::clone(&self.credentials) as Arc<dyn CredentialStore>
    }

    fn clock(&self) -> Clock {
        Clock::default_clock()
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let parsed = Args::parse(&mut args).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let credentials = Arc::new(FileCredentialStore::new(&parsed.token_file));
    let api = Arc::new(HttpLearningApi::new(
        parsed.base_url,
        Arc::clone(&credentials) as Arc<dyn CredentialStore>,
    ));

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp { api, credentials });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    // Explicitly disable it so the app doesn't behave like a modal window.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Til")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
