//! Markdown to HTML conversion with graceful fallback.
//!
//! Conversion picks among several strategies sharing a common
//! `try_convert` seam. Rich external tools are preferred, the built-in
//! regex converter is the terminal fallback and never fails. Output
//! lacking a document marker is wrapped in a minimal HTML shell, and a
//! configured stylesheet is inlined into the head.

use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::LazyLock;
use std::time::Duration;

use dochelp_config::Config;
use pulldown_cmark::{Options, Parser, html};
use regex::Regex;
use ureq::Agent;

/// Disclaimer appended by the built-in regex converter.
pub const RAW_FALLBACK_NOTICE: &str = "No markdown renderer is available on your system, so \
     this help page is rendered with a simplified built-in converter. Install pandoc to \
     improve the rendering of this page.";

/// GitHub markdown rendering API endpoint.
const GITHUB_MARKDOWN_API: &str = "https://api.github.com/markdown";

/// Marker identifying already-rendered HTML documents.
const HTML_MARKER: &str = "<html";

/// A markdown conversion strategy.
///
/// Named strategies attempt conversion through an external capability
/// and report failure as `None` so a fallback chain can proceed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// External `pandoc` binary, the richest converter.
    Pandoc,
    /// Built-in `pulldown-cmark` library rendering.
    Cmark,
    /// GitHub markdown rendering API over the network.
    Github,
    /// Dependency-free regex converter; never fails.
    Raw,
    /// Return the input unchanged, no wrapping.
    Passthrough,
}

impl Strategy {
    /// Attempt conversion with this strategy.
    ///
    /// Returns `None` when the underlying capability is unavailable or
    /// fails; [`Strategy::Raw`] and [`Strategy::Passthrough`] always
    /// succeed.
    #[must_use]
    pub fn try_convert(self, markdown: &str) -> Option<String> {
        match self {
            Self::Pandoc => try_pandoc(markdown),
            Self::Cmark => Some(convert_cmark(markdown)),
            Self::Github => try_github(markdown),
            Self::Raw => Some(convert_raw(markdown)),
            Self::Passthrough => Some(markdown.to_owned()),
        }
    }
}

/// Strategies tried in order by auto mode; `Raw` is terminal.
const AUTO_CHAIN: &[Strategy] = &[Strategy::Pandoc, Strategy::Cmark, Strategy::Raw];

/// Convert markdown text to a full HTML document.
///
/// Content already carrying an HTML document marker passes through
/// unchanged. `None` selects auto mode, trying [`AUTO_CHAIN`] in order.
/// A named strategy that fails degrades to the raw converter so the
/// caller always receives renderable text.
#[must_use]
pub fn convert(content: &str, strategy: Option<Strategy>, config: &Config) -> String {
    if content.contains(HTML_MARKER) {
        // already rendered
        return content.to_owned();
    }
    if strategy == Some(Strategy::Passthrough) {
        return content.to_owned();
    }

    let html = match strategy {
        Some(strategy) => strategy.try_convert(content).unwrap_or_else(|| {
            tracing::warn!("{strategy:?} conversion failed, falling back to raw converter");
            convert_raw(content)
        }),
        None => AUTO_CHAIN
            .iter()
            .find_map(|s| s.try_convert(content))
            .unwrap_or_else(|| convert_raw(content)),
    };

    let html = if html.contains(HTML_MARKER) {
        html
    } else {
        wrap_shell(&html)
    };
    inject_stylesheet(html, config)
}

/// Wrap a body fragment in a minimal HTML document shell.
fn wrap_shell(body: &str) -> String {
    format!("<html>\n<head>\n<meta charset=\"utf-8\"/>\n</head>\n<body>\n\n{body}</body>\n</html>")
}

/// Inline the configured stylesheet as a `<style>` block before `</head>`.
///
/// A missing stylesheet file is logged, not fatal.
fn inject_stylesheet(html: String, config: &Config) -> String {
    let path = config.stylesheet_path();
    match std::fs::read_to_string(&path) {
        Ok(css) if !css.is_empty() => {
            let block = format!("<style>\n{css}\n</style>\n</head>");
            html.replacen("</head>", &block, 1)
        }
        Ok(_) => html,
        Err(e) => {
            tracing::debug!("unable to open stylesheet {}: {e}", path.display());
            html
        }
    }
}

/// Convert via the external `pandoc` binary.
fn try_pandoc(markdown: &str) -> Option<String> {
    let mut child = Command::new("pandoc")
        .args(["-f", "markdown", "-t", "html"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .ok()?;
    child
        .stdin
        .take()?
        .write_all(markdown.as_bytes())
        .ok()?;
    let output = child.wait_with_output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout).ok()
}

/// Convert with the pulldown-cmark library.
fn convert_cmark(markdown: &str) -> String {
    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut out, parser);
    out
}

/// Convert via the GitHub markdown rendering API.
fn try_github(markdown: &str) -> Option<String> {
    let agent: Agent = Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(30)))
        .build()
        .into();
    let response = agent
        .post(GITHUB_MARKDOWN_API)
        .header("User-Agent", "dochelp")
        .send_json(serde_json::json!({
            "text": markdown,
            "mode": "markdown",
        }))
        .ok()?;
    response.into_body().read_to_string().ok()
}

static H5_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^##### (.*)\n").unwrap());
static H4_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#### (.*)\n").unwrap());
static H3_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^### (.*)\n").unwrap());
static H2_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^## (.*)\n").unwrap());
static H1_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^# (.*)\n").unwrap());
static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").unwrap());
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").unwrap());
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").unwrap());

/// Simple and dirty regex-based markdown to HTML.
///
/// Substitution order is an invariant: heading patterns run from the
/// longest prefix down so `#` does not swallow `##`, images run before
/// links, bold before italic. Appends [`RAW_FALLBACK_NOTICE`].
fn convert_raw(markdown: &str) -> String {
    let m = H5_RE.replace_all(markdown, "<h5>$1</h5>\n");
    let m = H4_RE.replace_all(&m, "<h4>$1</h4>\n");
    let m = H3_RE.replace_all(&m, "<h3>$1</h3>\n");
    let m = H2_RE.replace_all(&m, "<h2>$1</h2>\n");
    let m = H1_RE.replace_all(&m, "<h1>$1</h1>\n");
    let m = IMAGE_RE.replace_all(&m, r#"<img alt="$1" src="$2">"#);
    let m = LINK_RE.replace_all(&m, r#"<a href="$2">$1</a>"#);
    let m = BOLD_RE.replace_all(&m, "<b>$1</b>");
    let m = ITALIC_RE.replace_all(&m, "<i>$1</i>");
    let m = m.replace("\n\n", "<br/>");
    format!("{m}\n<br/><hr/><small>{RAW_FALLBACK_NOTICE}</small>")
}
