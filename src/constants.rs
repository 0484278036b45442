// prompt
pub const CONVENTIONAL_PREFIXES: [&str; 11] = [
    "build:",
    "chore:",
    "ci:",
    "debug:",
    "docs:",
    "feat:",
    "fix:",
    "perf:",
    "refactor:",
    "style:",
    "test:",
];
pub const MAX_DETAIL_CHARS: usize = 5000;
pub const ELISION_MARKER: &str = "\n\n[... remaining diff omitted ...]";

// generator
pub const DEFAULT_GENERATOR: &str = "gemini";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const GENERATOR_TIMEOUT_SECS: u64 = 20;

// defaults
pub const DEFAULT_LANGUAGE: &str = "Japanese";
pub const DEFAULT_COMMIT_MESSAGE: &str = "chore: automatic commit from editing session";

// push
pub const PUSH_REMOTE: &str = "origin";
