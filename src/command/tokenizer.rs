//! Quote-aware splitting of command strings into argument vectors.

/// Tokenize a command string into an argument vector.
///
/// Splits on spaces while preserving single- and double-quoted spans, so
/// that `-i 'My Movie.mp4'` stays a single `-i` / `My Movie.mp4` pair
/// when handed to the engine's argv-style entry point. Quote characters
/// of the other kind are literal inside an open span, and a quote
/// preceded by a backslash is always literal (the backslash is kept,
/// backslash has no other special meaning). Unterminated quotes are
/// tolerated: the open state is dropped and the pending token is still
/// emitted.
///
/// Never fails; an empty or all-space input yields an empty vector.
pub fn tokenize(command: &str) -> Vec<String> {
    let mut arguments = Vec::new();
    let mut current = String::new();
    let mut single_quote_open = false;
    let mut double_quote_open = false;
    let mut previous: Option<char> = None;

    for c in command.chars() {
        if c == ' ' {
            if single_quote_open || double_quote_open {
                current.push(c);
            } else if !current.is_empty() {
                arguments.push(std::mem::take(&mut current));
            }
        } else if c == '\'' && previous != Some('\\') {
            if single_quote_open {
                single_quote_open = false;
            } else if double_quote_open {
                current.push(c);
            } else {
                single_quote_open = true;
            }
        } else if c == '"' && previous != Some('\\') {
            if double_quote_open {
                double_quote_open = false;
            } else if single_quote_open {
                current.push(c);
            } else {
                double_quote_open = true;
            }
        } else {
            current.push(c);
        }
        previous = Some(c);
    }

    if !current.is_empty() {
        arguments.push(current);
    }

    arguments
}
