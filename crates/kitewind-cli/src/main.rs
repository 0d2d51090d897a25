//! KiteWind command-line tools.
//!
//! Provides the `kitewind` binary for working with apps outside the server:
//! exporting an app to standalone HTML or an embeddable snippet, building and
//! decoding share links, and pulling the code out of a saved model reply.
//!
//! Uses the same `kitewind_core` rendering and extraction as the HTTP server,
//! so output is identical from both entry points.
//!
//! Exit codes: 0 = success, 1 = invalid input, 2 = no code found,
//! 3 = I/O error.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use url::Url;

use kitewind_core::{
    extract_python_block, render_app_html, render_snippet, share_link, DemoMode, ShareParams,
};

/// KiteWind app tools.
#[derive(Parser)]
#[command(name = "kitewind", about = "KiteWind app export and sharing tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Gradio,
    Streamlit,
}

impl From<ModeArg> for DemoMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Gradio => DemoMode::Gradio,
            ModeArg::Streamlit => DemoMode::Streamlit,
        }
    }
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Render an app as a standalone HTML page.
    Export {
        #[arg(short, long, value_enum)]
        mode: ModeArg,

        /// Python source of the app (`-` for stdin).
        #[arg(short, long)]
        code: PathBuf,

        /// Requirements file, one package per line.
        #[arg(short, long)]
        requirements: Option<PathBuf>,

        /// Emit an embeddable snippet instead of a full page.
        #[arg(long)]
        snippet: bool,

        /// Output directory (default: print to stdout).
        #[arg(short = 'O', long)]
        output_dir: Option<PathBuf>,
    },

    /// Build a share link for an app.
    ShareLink {
        #[arg(short, long, value_enum)]
        mode: ModeArg,

        /// Python source of the app (`-` for stdin).
        #[arg(short, long)]
        code: PathBuf,

        #[arg(short, long)]
        requirements: Option<PathBuf>,

        /// Base URL of the KiteWind server.
        #[arg(short, long, default_value = "http://localhost:7860/")]
        base_url: String,
    },

    /// Print the mode, code and requirements carried by a share link as JSON.
    Decode {
        link: String,
    },

    /// Print the first fenced python block of a model reply.
    Extract {
        /// File holding the reply (`-` for stdin).
        reply: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Export {
            mode,
            code,
            requirements,
            snippet,
            output_dir,
        } => run_export(mode.into(), &code, requirements.as_deref(), snippet, output_dir),
        Commands::ShareLink {
            mode,
            code,
            requirements,
            base_url,
        } => run_share_link(mode.into(), &code, requirements.as_deref(), &base_url),
        Commands::Decode { link } => run_decode(&link),
        Commands::Extract { reply } => run_extract(&reply),
    };
    process::exit(exit_code);
}

/// Execute the export subcommand.
fn run_export(
    mode: DemoMode,
    code_path: &Path,
    requirements_path: Option<&Path>,
    snippet: bool,
    output_dir: Option<PathBuf>,
) -> i32 {
    let (code, requirements) = match read_app(code_path, requirements_path) {
        Ok(app) => app,
        Err(code) => return code,
    };

    let (file_name, html) = if snippet {
        let name = format!("{}-snippet.html", mode.runtime_name());
        (name, render_snippet(mode, &code, &requirements))
    } else {
        let app = render_app_html(mode, &code, &requirements);
        (app.file_name.to_string(), app.html)
    };

    match output_dir {
        Some(dir) => {
            let path = dir.join(&file_name);
            if let Err(e) = fs::create_dir_all(&dir).and_then(|_| fs::write(&path, html)) {
                eprintln!("Error: failed to write '{}': {}", path.display(), e);
                return 3;
            }
            println!("{}", path.display());
        }
        None => print!("{}", html),
    }
    0
}

/// Execute the share-link subcommand.
fn run_share_link(
    mode: DemoMode,
    code_path: &Path,
    requirements_path: Option<&Path>,
    base_url: &str,
) -> i32 {
    let base = match Url::parse(base_url) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("Error: invalid base URL '{}': {}", base_url, e);
            return 1;
        }
    };
    let (code, requirements) = match read_app(code_path, requirements_path) {
        Ok(app) => app,
        Err(code) => return code,
    };
    println!("{}", share_link(&base, mode, &code, &requirements));
    0
}

/// Execute the decode subcommand.
fn run_decode(link: &str) -> i32 {
    let params = match ShareParams::parse_link(link) {
        Ok(params) => params,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let json = serde_json::json!({
        "type": params.mode,
        "code": params.code,
        "requirements": params.requirements,
    });
    let text = serde_json::to_string_pretty(&json)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize result: {}\"}}", e));
    println!("{}", text);
    0
}

/// Execute the extract subcommand.
fn run_extract(reply_path: &Path) -> i32 {
    let reply = match read_input(reply_path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: failed to read '{}': {}", reply_path.display(), e);
            return 3;
        }
    };
    match extract_python_block(&reply) {
        Some(code) => {
            print!("{}", code);
            0
        }
        None => {
            eprintln!("No ```python block found in reply");
            2
        }
    }
}

/// Reads the code and optional requirements, mapping failures to exit code 3.
fn read_app(code_path: &Path, requirements_path: Option<&Path>) -> Result<(String, String), i32> {
    let code = read_input(code_path).map_err(|e| {
        eprintln!("Error: failed to read '{}': {}", code_path.display(), e);
        3
    })?;
    let requirements = match requirements_path {
        Some(path) => read_input(path).map_err(|e| {
            eprintln!("Error: failed to read '{}': {}", path.display(), e);
            3
        })?,
        None => String::new(),
    };
    Ok((code, requirements))
}

/// Reads a file, or stdin when the path is `-`.
fn read_input(path: &Path) -> io::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        fs::read_to_string(path)
    }
}
