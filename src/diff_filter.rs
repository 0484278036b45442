//! removal of binary file changes from unified diff text

/// line prefix that opens a per-file block
const BLOCK_MARKER: &str = "diff --git ";

/// one per-file block of a unified diff, kept verbatim (line endings included)
#[derive(Debug, Default)]
struct DiffBlock<'a> {
    lines: Vec<&'a str>,
    is_binary: bool,
}

impl<'a> DiffBlock<'a> {
    fn push(&mut self, line: &'a str) {
        if is_binary_marker(line) {
            self.is_binary = true;
        }
        self.lines.push(line);
    }
}

fn is_binary_marker(line: &str) -> bool {
    line.contains("Binary files") && line.contains("differ")
}

/// drop every block describing a binary file change
///
/// textual blocks (and any text before the first block header) are emitted
/// unchanged and in their original order
pub fn filter_binary(diff: &str) -> String {
    let mut blocks: Vec<DiffBlock> = Vec::new();
    let mut current = DiffBlock::default();

    for line in diff.split_inclusive('\n') {
        if line.starts_with(BLOCK_MARKER) && !current.lines.is_empty() {
            blocks.push(std::mem::take(&mut current));
        }
        current.push(line);
    }
    if !current.lines.is_empty() {
        blocks.push(current);
    }

    blocks
        .iter()
        .filter(|block| !block.is_binary)
        .flat_map(|block| block.lines.iter().copied())
        .collect()
}
