//! The two kinds of demo app a workspace can build.
//!
//! [`DemoMode`] is the only place mode-specific constants live. Callers ask the
//! mode for its starting code, URL tag or export file name instead of branching
//! on strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const GRADIO_STARTING_CODE: &str = include_str!("../templates/gradio_lite_starting_code.py");
const STREAMLIT_STARTING_CODE: &str = include_str!("../templates/stlite_starting_code.py");
const GRADIO_APP_TEMPLATE: &str = include_str!("../templates/gradio_lite_app.html");
const STREAMLIT_APP_TEMPLATE: &str = include_str!("../templates/stlite_app.html");
const GRADIO_SNIPPET_TEMPLATE: &str = include_str!("../templates/gradio_lite_snippet.html");
const STREAMLIT_SNIPPET_TEMPLATE: &str = include_str!("../templates/stlite_snippet.html");

/// Which in-browser sandbox runtime an app targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemoMode {
    /// A Gradio app executed by gradio-lite.
    Gradio,
    /// A Streamlit app executed by stlite.
    Streamlit,
}

impl DemoMode {
    /// Both modes, in tab order.
    pub const ALL: [DemoMode; 2] = [DemoMode::Gradio, DemoMode::Streamlit];

    /// The value used for the `type` share-link parameter and in API paths.
    pub fn as_str(self) -> &'static str {
        match self {
            DemoMode::Gradio => "gradio",
            DemoMode::Streamlit => "streamlit",
        }
    }

    /// Template app every fresh session starts from.
    pub fn starting_code(self) -> &'static str {
        match self {
            DemoMode::Gradio => GRADIO_STARTING_CODE,
            DemoMode::Streamlit => STREAMLIT_STARTING_CODE,
        }
    }

    /// Name of the sandbox runtime, as shown to users.
    pub fn runtime_name(self) -> &'static str {
        match self {
            DemoMode::Gradio => "gradio-lite",
            DemoMode::Streamlit => "stlite",
        }
    }

    /// File the sandbox runs as the app entrypoint.
    pub fn entrypoint(self) -> &'static str {
        match self {
            DemoMode::Gradio => "app.py",
            DemoMode::Streamlit => "streamlit_app.py",
        }
    }

    /// File name offered when the app is downloaded as standalone HTML.
    pub fn download_file_name(self) -> &'static str {
        match self {
            DemoMode::Gradio => "gradio-lite-app.html",
            DemoMode::Streamlit => "stlite-app.html",
        }
    }

    /// Standalone HTML page that boots the sandbox runtime.
    pub fn app_template(self) -> &'static str {
        match self {
            DemoMode::Gradio => GRADIO_APP_TEMPLATE,
            DemoMode::Streamlit => STREAMLIT_APP_TEMPLATE,
        }
    }

    /// HTML fragment for embedding the app in another page.
    pub fn snippet_template(self) -> &'static str {
        match self {
            DemoMode::Gradio => GRADIO_SNIPPET_TEMPLATE,
            DemoMode::Streamlit => STREAMLIT_SNIPPET_TEMPLATE,
        }
    }

    /// Zero-based tab position in the UI.
    pub fn tab_index(self) -> usize {
        match self {
            DemoMode::Gradio => 0,
            DemoMode::Streamlit => 1,
        }
    }
}

impl fmt::Display for DemoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DemoMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gradio" => Ok(DemoMode::Gradio),
            "streamlit" => Ok(DemoMode::Streamlit),
            other => Err(CoreError::UnknownMode {
                value: other.to_string(),
            }),
        }
    }
}
