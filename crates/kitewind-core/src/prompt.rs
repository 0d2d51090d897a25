//! Prompt text sent to the code-rewriting model.

/// Builds the rewrite request: the current code in a python fence followed by
/// the user's request.
pub fn rewrite_prompt(code: &str, request: &str) -> String {
    format!(
        "```python\n{}```\nGiven the code above return only updated code for the following request:\n{}\n",
        code, request
    )
}

/// Wraps `text` in the instruction markers expected by instruct-tuned models
/// served through raw completion endpoints.
pub fn instruct_wrap(text: &str) -> String {
    format!("<s>[INST] {} [/INST]", text)
}
