//! Sharing and exporting an app.
//!
//! A share link carries `(mode, code, requirements)` as URL query parameters so
//! opening it restores the app. Exports render the same triple into a
//! standalone HTML page or an embeddable snippet that boots the mode's sandbox
//! runtime straight from a CDN.

use url::Url;

use crate::error::CoreError;
use crate::mode::DemoMode;
use crate::requirements::parse_requirements;

const TYPE_PARAM: &str = "type";
const REQUIREMENTS_PARAM: &str = "requirements";
const CODE_PARAM: &str = "code";

const CODE_SLOT: &str = "{{APP_CODE}}";
const REQUIREMENTS_SLOT: &str = "{{APP_REQUIREMENTS}}";

/// App state recovered from share-link query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareParams {
    /// `None` when `type` is missing or not a known mode.
    pub mode: Option<DemoMode>,
    pub code: Option<String>,
    pub requirements: Option<String>,
}

impl ShareParams {
    /// Reads the share parameters from a raw query string (without `?`).
    ///
    /// Values are form-decoded; when a key repeats, the last value wins.
    pub fn from_query(query: &str) -> Self {
        let mut params = ShareParams::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                TYPE_PARAM => params.mode = value.parse().ok(),
                CODE_PARAM => params.code = Some(value.into_owned()),
                REQUIREMENTS_PARAM => params.requirements = Some(value.into_owned()),
                _ => {}
            }
        }
        params
    }

    pub fn from_url(url: &Url) -> Self {
        ShareParams::from_query(url.query().unwrap_or_default())
    }

    /// Parses a full share link.
    pub fn parse_link(link: &str) -> Result<Self, CoreError> {
        let url = Url::parse(link).map_err(|e| CoreError::InvalidShareLink {
            reason: e.to_string(),
        })?;
        Ok(ShareParams::from_url(&url))
    }
}

/// Builds a share link by setting `type`, `requirements` and `code` on `base`.
///
/// Other query parameters already on `base` are preserved; earlier values of
/// the three share parameters are replaced.
pub fn share_link(base: &Url, mode: DemoMode, code: &str, requirements: &str) -> Url {
    let kept: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| !matches!(key.as_ref(), TYPE_PARAM | REQUIREMENTS_PARAM | CODE_PARAM))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = base.clone();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (key, value) in &kept {
            pairs.append_pair(key, value);
        }
        pairs.append_pair(TYPE_PARAM, mode.as_str());
        pairs.append_pair(REQUIREMENTS_PARAM, requirements);
        pairs.append_pair(CODE_PARAM, code);
    }
    url
}

/// A rendered standalone app page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedApp {
    pub file_name: &'static str,
    pub html: String,
}

/// Renders the app as a standalone HTML page.
pub fn render_app_html(mode: DemoMode, code: &str, requirements: &str) -> ExportedApp {
    ExportedApp {
        file_name: mode.download_file_name(),
        html: fill_template(mode.app_template(), code, requirements),
    }
}

/// Renders the app as an HTML fragment for pasting into another page.
pub fn render_snippet(mode: DemoMode, code: &str, requirements: &str) -> String {
    fill_template(mode.snippet_template(), code, requirements)
}

/// Escapes `code` for a JavaScript template literal inside a `<script>` tag.
pub fn escape_template_literal(code: &str) -> String {
    code.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
        .replace("</", "<\\/")
}

/// Requirements as a JSON array literal, comment and blank lines removed.
pub fn requirements_array(requirements: &str) -> String {
    let packages: Vec<String> = parse_requirements(requirements)
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect();
    let quoted: Vec<String> = packages
        .iter()
        .map(|p| serde_json::Value::String(p.clone()).to_string())
        .collect();
    format!("[{}]", quoted.join(", ")).replace("</", "<\\/")
}

/// Fills both slots in one left-to-right pass, so slot markers that appear
/// inside the substituted values are left alone.
fn fill_template(template: &str, code: &str, requirements: &str) -> String {
    let code = escape_template_literal(code);
    let requirements = requirements_array(requirements);
    let slots = [(CODE_SLOT, code.as_str()), (REQUIREMENTS_SLOT, requirements.as_str())];

    let mut out = String::with_capacity(template.len() + code.len() + requirements.len());
    let mut rest = template;
    loop {
        let next = slots
            .iter()
            .filter_map(|(slot, value)| rest.find(slot).map(|at| (at, *slot, *value)))
            .min_by_key(|(at, _, _)| *at);
        match next {
            Some((at, slot, value)) => {
                out.push_str(&rest[..at]);
                out.push_str(value);
                rest = &rest[at + slot.len()..];
            }
            None => {
                out.push_str(rest);
                break;
            }
        }
    }
    out
}
