//! HTTP handler modules for the KiteWind API.
//!
//! Each sub-module implements thin handlers that parse path parameters,
//! delegate to [`SessionService`](crate::service::SessionService), and return
//! JSON responses. No business logic lives in handlers.

pub mod assist;
pub mod export;
pub mod history;
pub mod sessions;

use kitewind_core::DemoMode;

use crate::error::ApiError;
use crate::session_store::SessionId;

/// Parses the `{id}` path segment. Malformed ids are reported as missing
/// sessions.
pub(crate) fn parse_session_id(raw: &str) -> Result<SessionId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("session {} not found", raw)))
}

/// Parses the `{id}/{mode}` path segments.
pub(crate) fn parse_target(id: &str, mode: &str) -> Result<(SessionId, DemoMode), ApiError> {
    Ok((parse_session_id(id)?, mode.parse::<DemoMode>()?))
}
