const QUOTES: [char; 3] = ['"', '\'', '`'];

/// strip surrounding whitespace and one matching pair of wrapping quotes
pub fn strip_quotes(message: &str) -> &str {
    let trimmed = message.trim();
    for quote in QUOTES {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            // quotes are all single byte
            return trimmed[1..trimmed.len() - 1].trim();
        }
    }
    trimmed
}
