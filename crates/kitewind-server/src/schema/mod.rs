//! API request and response types.
//!
//! Each sub-module groups the JSON types for one family of endpoints.

pub mod assist;
pub mod export;
pub mod history;
pub mod sessions;
