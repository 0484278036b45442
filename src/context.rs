use crate::cli::Cli;
use crate::constants::{
    DEFAULT_COMMIT_MESSAGE, DEFAULT_GENERATOR, DEFAULT_LANGUAGE, DEFAULT_MODEL,
    GENERATOR_TIMEOUT_SECS,
};
use crate::warning;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const LANGUAGE_ENV: &str = "COMMIT_LANGUAGE";
pub const DEFAULT_MESSAGE_ENV: &str = "DEFAULT_COMMIT_MESSAGE";
pub const AUTO_PUSH_ENV: &str = "AUTO_PUSH";
pub const GENERATOR_ENV: &str = "COMMIT_GENERATOR";
pub const MODEL_ENV: &str = "COMMIT_MODEL";
pub const TIMEOUT_ENV: &str = "COMMIT_TIMEOUT_SECS";

/// payload supplied by the host on stdin
#[derive(Debug, Default, Deserialize)]
pub struct HookInput {
    #[serde(default)]
    pub cwd: Option<String>,
}

impl HookInput {
    /// parse the payload, falling back to the default on any error
    pub fn parse(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }

    /// working directory to operate in ("." when absent or empty)
    pub fn working_dir(&self) -> PathBuf {
        match self.cwd.as_deref() {
            Some(cwd) if !cwd.trim().is_empty() => PathBuf::from(cwd),
            _ => PathBuf::from("."),
        }
    }
}

/// configuration for a single run, fixed at startup
#[derive(Debug, Clone)]
pub struct AppContext {
    /// directory the hook operates in
    pub cwd: PathBuf,

    /// natural language the commit message should be written in
    pub language: String,

    /// message committed when generation falls back
    pub default_message: String,

    /// whether to push the current branch after committing
    pub auto_push: bool,

    /// generator executable (bare name or path)
    pub generator: String,

    /// model identifier passed to the generator
    pub model: String,

    pub timeout: Duration,

    // debugging
    pub show_prompt: bool,
    pub show_response: bool,
}

impl AppContext {
    /// create a context with default values for the given directory
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            language: String::from(DEFAULT_LANGUAGE),
            default_message: String::from(DEFAULT_COMMIT_MESSAGE),
            auto_push: false,
            generator: String::from(DEFAULT_GENERATOR),
            model: String::from(DEFAULT_MODEL),
            timeout: Duration::from_secs(GENERATOR_TIMEOUT_SECS),
            show_prompt: false,
            show_response: false,
        }
    }

    /// build the context from the hook payload, environment and flags
    pub fn from_env(input: &HookInput, cli: &Cli) -> Self {
        let mut ctx = Self::new(input.working_dir());

        if let Some(language) = env_value(LANGUAGE_ENV) {
            ctx.language = language;
        }
        if let Some(message) = env_value(DEFAULT_MESSAGE_ENV) {
            ctx.default_message = message;
        }
        ctx.auto_push = env_value(AUTO_PUSH_ENV).is_some_and(|v| v == "1");
        if let Some(generator) = env_value(GENERATOR_ENV) {
            ctx.generator = generator;
        }
        if let Some(model) = env_value(MODEL_ENV) {
            ctx.model = model;
        }
        if let Some(secs) = env_value(TIMEOUT_ENV) {
            match secs.parse::<u64>() {
                Ok(secs) if secs > 0 => ctx.timeout = Duration::from_secs(secs),
                _ => warning!(
                    "invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV,
                    secs,
                    GENERATOR_TIMEOUT_SECS
                ),
            }
        }

        ctx.show_prompt = cli.debug_prompt;
        ctx.show_response = cli.debug_response;
        ctx
    }
}

/// read an environment variable, treating empty values as unset
fn env_value(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
