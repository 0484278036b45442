use clap::Parser;

/// auto-commit-hook: stage pending changes and commit them with a generated message
///
/// reads a JSON payload (`{"cwd": "..."}`) on stdin; configured through
/// COMMIT_LANGUAGE, DEFAULT_COMMIT_MESSAGE and AUTO_PUSH
#[derive(Parser, Debug, Default)]
#[command(
    name = "auto-commit-hook",
    about,
    long_about = None,
    disable_version_flag = true
)]
pub struct Cli {
    /// print the prompt sent to the generator
    #[arg(long)]
    pub debug_prompt: bool,

    /// print the raw output returned by the generator
    #[arg(long)]
    pub debug_response: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
