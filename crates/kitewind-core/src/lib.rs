//! Core model for KiteWind: the per-mode edit history, requirements handling,
//! code extraction from model replies, prompt text and share/export rendering.
//!
//! Nothing here performs I/O. The server crate wires these pieces to HTTP and
//! to the language-model and speech-to-text collaborators.

pub mod error;
pub mod export;
pub mod extract;
pub mod history;
pub mod mode;
pub mod prompt;
pub mod requirements;
pub mod session;

// Re-export commonly used types
pub use error::CoreError;
pub use export::{render_app_html, render_snippet, share_link, ExportedApp, ShareParams};
pub use extract::{extract_python_block, rewrite_result, RewriteResult};
pub use history::{CommitOutput, EditHistory};
pub use mode::DemoMode;
pub use prompt::{instruct_wrap, rewrite_prompt};
pub use requirements::{normalize_requirements, parse_requirements, RequirementsSet};
pub use session::{CommitOutcome, ModeSession, Navigation, Workspace};
