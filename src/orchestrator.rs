use crate::changeset::{ChangeSet, CommitResult, PushResult};
use crate::constants::{CONVENTIONAL_PREFIXES, MAX_DETAIL_CHARS};
use crate::context::AppContext;
use crate::generator::{FallbackReason, GenerationOutcome, GeneratorClient};
use crate::runner::display_command;
use crate::{error, git, info, prompt, sanitize, status, ui, warning};
use anyhow::Result;
use num_format::{Locale, ToFormattedString};

/// how a run ended
#[derive(Debug)]
pub enum Outcome {
    NoRepo,
    NoChanges,
    NoGenerator,
    /// staging or summarising the changes failed
    RepoError(String),
    CommitFailed(String),
    Committed {
        result: CommitResult,
        generated: bool,
    },
}

impl Outcome {
    /// process exit code reported to the host
    ///
    /// a commit made with the fallback message still exits 1 so the host knows
    /// the message needs a look
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoChanges => 0,
            Self::Committed { result, generated } => i32::from(!(result.committed && *generated)),
            Self::NoRepo | Self::NoGenerator | Self::RepoError(_) | Self::CommitFailed(_) => 1,
        }
    }
}

/// run the whole pipeline once
pub fn run(ctx: &AppContext) -> Outcome {
    let cwd = ctx.cwd.as_path();

    if !git::is_repository(cwd) {
        error!("not a git repository: {}", cwd.display());
        return Outcome::NoRepo;
    }

    match git::has_pending_changes(cwd) {
        Ok(true) => {}
        Ok(false) => {
            status!("no changes, skipping commit");
            return Outcome::NoChanges;
        }
        Err(e) => {
            error!("{:#}", e);
            return Outcome::RepoError(format!("{e:#}"));
        }
    }

    let generator = GeneratorClient::new(&ctx.generator, &ctx.model, &ctx.default_message, cwd);
    if !generator.is_available() {
        error!("{} not found, install it or set COMMIT_GENERATOR", ctx.generator);
        return Outcome::NoGenerator;
    }

    let changeset = match stage_and_summarise(ctx) {
        Ok(changeset) => changeset,
        Err(e) => {
            error!("{:#}", e);
            return Outcome::RepoError(format!("{e:#}"));
        }
    };

    let (message, generated) = match generate_message(ctx, &generator, &changeset) {
        GenerationOutcome::Generated(raw) => match sanitize::strip_quotes(&raw) {
            "" => {
                warning!("generated message is empty once quotes are removed, using default message");
                (ctx.default_message.clone(), false)
            }
            stripped => (stripped.to_string(), true),
        },
        outcome @ GenerationOutcome::Fallback { .. } => (outcome.message().to_string(), false),
    };

    status!(
        "{}",
        display_command("git", &["commit", "--message", &message])
    );
    let output = git::commit(cwd, &message);
    if !output.succeeded {
        let reason = if output.stderr.is_empty() {
            output.stdout
        } else {
            output.stderr
        };
        error!("commit failed: {}", reason);
        return Outcome::CommitFailed(reason);
    }

    let result = report_and_maybe_push(ctx, message);
    if !generated {
        warning!("message generation failed, exiting with code 1");
    }
    Outcome::Committed { result, generated }
}

/// stage everything unless something is already staged, then capture the staged changes
fn stage_and_summarise(ctx: &AppContext) -> Result<ChangeSet> {
    let cwd = ctx.cwd.as_path();

    if !git::has_staged_changes(cwd)? {
        status!("nothing staged, staging all changes");
        // best effort, whatever did get staged is still committed
        if let Err(e) = git::stage_all(cwd) {
            warning!("{:#}", e);
        }
    }

    let changeset = git::staged_changes(cwd)?;
    if !changeset.has_changes {
        warning!("nothing ended up staged, the commit will likely fail");
    }
    status!("changes:\n{}", changeset.stat_summary);
    status!(
        "diff size: {} chars across {} files",
        changeset.detailed_diff.chars().count().to_formatted_string(&Locale::en),
        changeset.file_count()
    );
    Ok(changeset)
}

fn generate_message(
    ctx: &AppContext,
    generator: &GeneratorClient,
    changeset: &ChangeSet,
) -> GenerationOutcome {
    let prompt = prompt::build(
        &ctx.language,
        &CONVENTIONAL_PREFIXES,
        &changeset.stat_summary,
        &changeset.detailed_diff,
        MAX_DETAIL_CHARS,
    );
    if prompt.truncated {
        warning!(
            "diff is large, only the first {} chars are sent",
            MAX_DETAIL_CHARS.to_formatted_string(&Locale::en)
        );
    }
    status!(
        "prompt size: {} chars",
        prompt.text.chars().count().to_formatted_string(&Locale::en)
    );
    if ctx.show_prompt {
        status!("{}", prompt.text);
    }

    let spinner = ui::spinner(&format!("generating commit message with {}...", ctx.generator));
    let outcome = generator.generate(&prompt.text, ctx.timeout);
    spinner.finish_and_clear();

    match &outcome {
        GenerationOutcome::Generated(raw) => {
            if ctx.show_response {
                status!("{}", raw);
            }
            status!("commit message generated");
        }
        GenerationOutcome::Fallback {
            reason,
            default_message,
        } => {
            if let FallbackReason::NonZeroExit { stderr, .. } = reason
                && !stderr.is_empty()
            {
                error!("{}", stderr);
            }
            warning!("{}, using default message: {}", reason, default_message);
        }
    }
    outcome
}

/// print the commit summary, note leftover changes and push if enabled
fn report_and_maybe_push(ctx: &AppContext, message: String) -> CommitResult {
    let cwd = ctx.cwd.as_path();

    let result = CommitResult {
        committed: true,
        message,
        log_line: git::last_commit_line(cwd).unwrap_or_default(),
        // leftovers are informational only
        remaining_changes: git::has_pending_changes(cwd).unwrap_or(false),
        push_result: None,
    };

    info!("committed: {}", result.message);
    info!();
    info!("commit info:");
    info!("{}", result.log_line);
    if result.remaining_changes {
        info!();
        info!("uncommitted changes remain:");
        git::show_short_status(cwd);
    }

    CommitResult {
        push_result: ctx.auto_push.then(|| push(ctx)),
        ..result
    }
}

fn push(ctx: &AppContext) -> PushResult {
    let Some(branch) = git::current_branch(&ctx.cwd) else {
        warning!("push skipped: could not determine the current branch");
        return PushResult {
            ok: false,
            remote_ref: String::new(),
            error: Some(String::from("current branch unavailable")),
        };
    };

    status!("pushing {}...", branch);
    let result = git::push(&ctx.cwd, &branch);
    if result.ok {
        status!("pushed to {}", result.remote_ref);
    } else {
        warning!(
            "push to {} failed: {}",
            result.remote_ref,
            result.error.as_deref().unwrap_or_default()
        );
    }
    result
}
