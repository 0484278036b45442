use crate::changeset::{ChangeSet, PushResult};
use crate::constants::PUSH_REMOTE;
use crate::diff_filter;
use crate::runner::{self, Capture, CommandOutput};
use anyhow::{Context, Result, bail};
use git2::{DiffFindOptions, DiffFormat, DiffStatsFormat, Repository, StatusOptions};
use std::path::Path;

/// width used when rendering the stat summary
const STAT_WIDTH: usize = 80;

/// check the path is inside a git repository (can be anywhere within the repo)
pub fn is_repository(path: &Path) -> bool {
    Repository::discover(path).is_ok()
}

fn open(path: &Path) -> Result<Repository> {
    Repository::discover(path).context("failed to open git repository")
}

/// whether the working tree has any tracked or untracked changes (ignored files excluded)
pub fn has_pending_changes(path: &Path) -> Result<bool> {
    let repo = open(path)?;
    let mut opts = StatusOptions::new();
    opts.include_untracked(true)
        .recurse_untracked_dirs(true)
        .include_ignored(false);
    let statuses = repo
        .statuses(Some(&mut opts))
        .context("failed to read repository status")?;
    Ok(!statuses.is_empty())
}

/// whether anything is staged for the next commit
pub fn has_staged_changes(path: &Path) -> Result<bool> {
    let repo = open(path)?;
    let diff = create_staged_diff(&repo)?;
    let stats = diff.stats().context("failed to get diff stats")?;
    Ok(stats.files_changed() > 0)
}

/// stage every pending change with `git add --all`
///
/// goes through the git binary so embedded repositories are added as gitlinks
/// (git warns, libgit2 refuses); ignored files are never added
pub fn stage_all(path: &Path) -> Result<()> {
    let output = runner::run("git", &["add", "--all"], path, Capture::Output);
    if !output.succeeded {
        bail!("failed to stage changes: {}", output.stderr);
    }
    if !output.stderr.is_empty() {
        crate::warning!("{}", output.stderr);
    }
    Ok(())
}

/// capture the staged changes: a stat summary and the diff without binary files
pub fn staged_changes(path: &Path) -> Result<ChangeSet> {
    let repo = open(path)?;
    let diff = create_staged_diff(&repo)?;

    let stats = diff.stats().context("failed to get diff stats")?;
    let stat_summary = stats
        .to_buf(DiffStatsFormat::FULL, STAT_WIDTH)
        .context("failed to format diff stats")?
        .as_str()
        .unwrap_or_default()
        .trim_end()
        .to_string();

    let detailed_diff = diff_filter::filter_binary(&format_diff(&diff)?);

    Ok(ChangeSet {
        has_changes: stats.files_changed() > 0,
        stat_summary,
        detailed_diff,
    })
}

/// create a diff object for staged changes
fn create_staged_diff(repo: &Repository) -> Result<git2::Diff<'_>> {
    // handle unborn branch (no commits yet) - compare against empty tree
    let tree = match repo.head() {
        Ok(head) => Some(head.peel_to_tree().context("failed to get tree")?),
        Err(e) if e.code() == git2::ErrorCode::UnbornBranch => None,
        Err(e) => return Err(e).context("failed to get HEAD"),
    };

    let mut diff = repo
        .diff_tree_to_index(tree.as_ref(), None, None)
        .context("failed to create diff")?;

    let mut find_opts = DiffFindOptions::new();
    find_opts.renames(true);
    find_opts.rename_threshold(50); // 50% similarity (git default)
    diff.find_similar(Some(&mut find_opts))
        .context("failed to detect renames")?;

    Ok(diff)
}

/// format a diff object into unified diff text
fn format_diff(diff: &git2::Diff) -> Result<String> {
    let mut output = String::new();

    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let content = String::from_utf8_lossy(line.content());
        match line.origin() {
            // content lines need their origin character, headers already carry theirs
            origin @ ('+' | '-' | ' ') => output.push(origin),
            _ => {}
        }
        output.push_str(&content);
        true
    })
    .context("failed to format diff")?;

    Ok(output)
}

/// name of the checked out branch, None when HEAD is detached or unborn
pub fn current_branch(path: &Path) -> Option<String> {
    let repo = open(path).ok()?;
    let head = repo.head().ok()?;
    if !head.is_branch() {
        return None;
    }
    head.shorthand().map(str::to_string)
}

/// create a commit with the given message
///
/// uses the git binary rather than git2 so commit signing and git hooks
/// (pre-commit, commit-msg, etc.) work as expected
pub fn commit(path: &Path, message: &str) -> CommandOutput {
    runner::run("git", &["commit", "--message", message], path, Capture::Output)
}

/// one-line log entry for HEAD
pub fn last_commit_line(path: &Path) -> Option<String> {
    let output = runner::run("git", &["log", "-1", "--oneline"], path, Capture::Output);
    (output.succeeded && !output.stdout.is_empty()).then_some(output.stdout)
}

/// print `git status --short` straight to our stdout
pub fn show_short_status(path: &Path) {
    runner::run("git", &["status", "--short"], path, Capture::Passthrough);
}

/// push `branch` to the same-named branch on the default remote
pub fn push(path: &Path, branch: &str) -> PushResult {
    let output = runner::run("git", &["push", PUSH_REMOTE, branch], path, Capture::Output);
    PushResult {
        ok: output.succeeded,
        remote_ref: format!("{PUSH_REMOTE}/{branch}"),
        error: (!output.succeeded).then_some(output.stderr),
    }
}
