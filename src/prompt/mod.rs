mod stream;

pub use stream::*;

/// Strips a trailing `#` comment and surrounding whitespace from a line.
///
/// Returns `None` when nothing meaningful is left.
pub(crate) fn strip_comment(line: &str) -> Option<&str> {
    let content = line.split('#').next().unwrap_or("").trim();
    (!content.is_empty()).then_some(content)
}
