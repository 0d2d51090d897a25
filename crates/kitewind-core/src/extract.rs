//! Pulling code out of free-form model replies.
//!
//! Models answer with prose around a fenced block. Only a block opened by the
//! exact, case-sensitive marker "```python" followed by a newline counts; the
//! block ends at the next "```".

const OPENING_FENCE: &str = "```python\n";
const CLOSING_FENCE: &str = "```";

/// Returns the body of the first fenced python block in `reply`.
///
/// The body runs from just after the opening fence up to (not including) the
/// first closing fence after it, across newlines. Returns `None` when no
/// opening fence exists or it is never closed.
pub fn extract_python_block(reply: &str) -> Option<&str> {
    let start = reply.find(OPENING_FENCE)? + OPENING_FENCE.len();
    let len = reply[start..].find(CLOSING_FENCE)?;
    Some(&reply[start..start + len])
}

/// Outcome of applying a model reply to the current code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    /// The code to place in the buffer.
    pub code: String,
    /// Whether `code` came from the reply (`false` means the original was kept).
    pub extracted: bool,
}

/// Takes the code from `reply`, or keeps `original_code` when the reply has no
/// fenced python block.
pub fn rewrite_result(reply: &str, original_code: &str) -> RewriteResult {
    match extract_python_block(reply) {
        Some(code) => RewriteResult {
            code: code.to_string(),
            extracted: true,
        },
        None => RewriteResult {
            code: original_code.to_string(),
            extracted: false,
        },
    }
}
