use crate::constants::ELISION_MARKER;

/// bound `detail` to `max_chars` characters, appending the elision marker when cut
///
/// returns the bounded text and whether it was truncated
pub fn truncate_detail(detail: &str, max_chars: usize) -> (String, bool) {
    match detail.char_indices().nth(max_chars) {
        Some((cut, _)) => (format!("{}{ELISION_MARKER}", &detail[..cut]), true),
        None => (detail.to_string(), false),
    }
}

/// render the prefix list as "`build:`, `chore:`, ..."
fn format_prefixes(prefixes: &[&str]) -> String {
    prefixes
        .iter()
        .map(|prefix| format!("`{prefix}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// the instruction sent to the generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    /// the detailed diff was cut to fit
    pub truncated: bool,
}

/// build the instruction sent to the generator
///
/// section order and labels are fixed; the generator's output is more
/// consistent when they don't move around
pub fn build(
    language: &str,
    prefixes: &[&str],
    summary: &str,
    detail: &str,
    max_detail_chars: usize,
) -> Prompt {
    let (detail, truncated) = truncate_detail(detail, max_detail_chars);
    let prefixes = format_prefixes(prefixes);

    let text = format!(
        r#"
Write a git commit message in Conventional Commits style for the changes below. Write it in {language}, as a single concise line.

Conventional Commits rules:
- start with exactly one of these prefixes: {prefixes}
- follow the prefix with a colon and a space
- start the description with a lowercase word (unless {language} has no letter case)
- describe the change on a single line
- use the imperative, present tense

<changes>
{summary}

<details>
{detail}
</changes>
"#
    )
    .trim()
    .to_string();

    Prompt { text, truncated }
}
