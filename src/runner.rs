use std::path::Path;
use std::process::{Command, Stdio};

/// result of running an external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub succeeded: bool,
    pub stdout: String,
    pub stderr: String,
}

/// whether to capture the command's output or pass it through to our streams
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    Output,
    Passthrough,
}

/// run a command and report how it went
///
/// arguments are passed as a list, never interpolated into a shell string.
/// a nonzero exit is reported through `succeeded`; failure to start the
/// command is reported the same way with the error in `stderr`.
pub fn run(program: &str, args: &[&str], cwd: &Path, capture: Capture) -> CommandOutput {
    let mut command = Command::new(program);
    command.args(args).current_dir(cwd).stdin(Stdio::null());

    match capture {
        Capture::Output => match command.output() {
            Ok(output) => CommandOutput {
                succeeded: output.status.success(),
                stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            },
            Err(e) => failed_to_start(program, args, &e),
        },
        Capture::Passthrough => match command.status() {
            Ok(status) => CommandOutput {
                succeeded: status.success(),
                ..CommandOutput::default()
            },
            Err(e) => failed_to_start(program, args, &e),
        },
    }
}

fn failed_to_start(program: &str, args: &[&str], e: &std::io::Error) -> CommandOutput {
    CommandOutput {
        succeeded: false,
        stdout: String::new(),
        stderr: format!("failed to run {}: {e}", display_command(program, args)),
    }
}

/// render a command line for diagnostics, quoting arguments as a shell would
pub fn display_command(program: &str, args: &[&str]) -> String {
    let words = std::iter::once(program).chain(args.iter().copied());
    shlex::try_join(words).unwrap_or_else(|_| {
        // arguments containing nul bytes can't be quoted
        format!("{program} {}", args.join(" "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captures_trimmed_output() {
        let output = run("git", &["--version"], Path::new("."), Capture::Output);
        assert!(output.succeeded);
        assert!(output.stdout.starts_with("git version"));
        assert_eq!(output.stdout, output.stdout.trim());
    }

    #[test]
    fn test_nonzero_exit_is_not_an_error() {
        let output = run(
            "git",
            &["definitely-not-a-git-subcommand"],
            Path::new("."),
            Capture::Output,
        );
        assert!(!output.succeeded);
        assert!(!output.stderr.is_empty());
    }

    #[test]
    fn test_missing_program_is_reported() {
        let output = run(
            "no-such-program-for-runner-tests",
            &["--flag"],
            Path::new("."),
            Capture::Output,
        );
        assert!(!output.succeeded);
        assert!(output.stdout.is_empty());
        assert!(
            output
                .stderr
                .starts_with("failed to run no-such-program-for-runner-tests --flag")
        );
    }

    #[test]
    fn test_passthrough_reports_status_without_output() {
        let output = run("git", &["--version"], Path::new("."), Capture::Passthrough);
        assert!(output.succeeded);
        assert!(output.stdout.is_empty());
        assert!(output.stderr.is_empty());

        let missing = run(
            "no-such-program-for-runner-tests",
            &[],
            Path::new("."),
            Capture::Passthrough,
        );
        assert!(!missing.succeeded);
    }

    #[test]
    fn test_display_command_quotes_arguments() {
        let line = display_command("git", &["commit", "--message", "fix: it's done"]);
        assert_eq!(
            shlex::split(&line),
            Some(vec![
                "git".to_string(),
                "commit".to_string(),
                "--message".to_string(),
                "fix: it's done".to_string()
            ])
        );
        assert_eq!(display_command("git", &["status"]), "git status");
    }
}
