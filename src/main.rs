mod changeset;
mod cli;
mod constants;
mod context;
mod diff_filter;
mod generator;
mod git;
mod orchestrator;
mod prompt;
mod runner;
mod sanitize;
mod ui;

use crate::cli::Cli;
use crate::context::{AppContext, HookInput};
use std::io::{IsTerminal, Read};

fn main() {
    let cli = Cli::parse_args();
    let input = read_hook_input();
    let ctx = AppContext::from_env(&input, &cli);

    let outcome = orchestrator::run(&ctx);
    std::process::exit(outcome.exit_code());
}

/// read the host's JSON payload from stdin
///
/// nothing is read from an interactive terminal, and unreadable or malformed
/// input means "use the current directory"
fn read_hook_input() -> HookInput {
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return HookInput::default();
    }

    let mut raw = String::new();
    if let Err(e) = stdin.read_to_string(&mut raw) {
        warning!("failed to read hook input: {}", e);
        return HookInput::default();
    }
    HookInput::parse(&raw)
}
