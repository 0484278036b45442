/// the staged changes captured for a single run
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    pub has_changes: bool,
    pub stat_summary: String, // per-file stat, like `git diff --stat`
    pub detailed_diff: String, // unified diff with binary blocks removed
}

impl ChangeSet {
    pub fn file_count(&self) -> usize {
        self.stat_summary
            .lines()
            .filter(|line| line.contains('|'))
            .count()
    }
}

/// result of pushing the new commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushResult {
    pub ok: bool,
    pub remote_ref: String,
    pub error: Option<String>,
}

/// what happened after a successful commit
#[derive(Debug, Clone)]
pub struct CommitResult {
    pub committed: bool,
    pub message: String,
    pub log_line: String,
    pub remaining_changes: bool,
    pub push_result: Option<PushResult>,
}
