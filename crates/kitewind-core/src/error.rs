//! Core error types for kitewind-core.
//!
//! The history controller itself never fails; these variants cover the
//! parsing done at the edges of the core (mode names, share links).

use thiserror::Error;

/// Errors produced by the kitewind-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A mode name that is neither `gradio` nor `streamlit`.
    #[error("unknown demo mode: '{value}'")]
    UnknownMode { value: String },

    /// A share link that could not be parsed as a URL.
    #[error("invalid share link: {reason}")]
    InvalidShareLink { reason: String },
}
