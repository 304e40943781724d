//! Page resolution and markdown conversion pipeline for dochelp.
//!
//! The main entry point is [`show`]. It accepts a page name, a command
//! name, a URL or a local file path; the pipeline recognizes whether
//! the contents are HTML or Markdown and renders them appropriately.
//!
//! ```no_run
//! use std::path::Path;
//! use dochelp_config::Config;
//!
//! let config = Config::load(Path::new("/home/user/.local/share/host")).unwrap();
//! dochelp_core::show("Draft Line", None, None, &config);
//! dochelp_core::show("Draft_Line", None, None, &config); // spaces or underscores
//! dochelp_core::show("https://docs.example.com/wiki/Draft_Line", None, None, &config);
//! dochelp_core::show("/home/user/docs/Draft_Line.md", None, None, &config);
//! ```
//!
//! No failure in the pipeline propagates to the caller: unresolvable
//! locations are logged, fetch errors degrade to a notice shown in
//! place of content, and conversion always falls back to a built-in
//! converter.

mod convert;
mod fetch;
mod location;
mod page;
mod present;

pub use convert::{RAW_FALLBACK_NOTICE, Strategy, convert};
pub use fetch::{FETCH_ERROR_NOTICE, fetch};
pub use location::{ResolvedLocation, resolve};
pub use page::normalize;
pub use present::{HtmlView, base_uri, open_in_browser, page_title};

use dochelp_config::{Config, PresentationMode};

/// A fully rendered help page, ready for a host surface.
#[derive(Clone, Debug)]
pub struct RenderedPage {
    /// Complete HTML document.
    pub html: String,
    /// Base URI for resolving relative links.
    pub base_url: String,
    /// Window title.
    pub title: String,
}

/// Resolve, fetch, convert and display a help page.
///
/// In browser mode the resolved location is opened externally and
/// `None` is returned. Otherwise the rendered page is delivered to
/// `view` when one is given (reusing an existing surface) and returned
/// so a host without a view can mount a new tab or dialog according to
/// [`Config::mode`]. `strategy` forces a conversion strategy; `None`
/// picks the best available.
///
/// Returns `None` when no location could be determined; the failure is
/// logged, never raised.
pub fn show(
    page: &str,
    view: Option<&mut dyn HtmlView>,
    strategy: Option<Strategy>,
    config: &Config,
) -> Option<RenderedPage> {
    let page = normalize(page);
    let Some(location) = resolve(&page, config) else {
        tracing::error!("help files location could not be determined; check viewer preferences");
        return None;
    };
    tracing::info!("opening {location}");

    if config.mode == PresentationMode::Browser {
        open_in_browser(&location);
        return None;
    }

    let contents = fetch(&location);
    let rendered = RenderedPage {
        html: convert(&contents, strategy, config),
        base_url: base_uri(&location),
        title: page_title(&page),
    };
    if let Some(view) = view {
        view.set_html(&rendered.html, &rendered.base_url, &rendered.title);
    }
    Some(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    struct RecordingView {
        titles: Vec<String>,
    }

    impl HtmlView for RecordingView {
        fn set_html(&mut self, _html: &str, _base_url: &str, title: &str) {
            self.titles.push(title.to_owned());
        }
    }

    fn offline_config(base: &Path) -> Config {
        let mut config = Config::default_with_base(base);
        config.online = false;
        config
    }

    #[test]
    fn test_show_offline_page_end_to_end() {
        let tmp = tempfile::TempDir::new().unwrap();
        let root = tmp.path().join("documentation").join("wiki");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("Draft_Line.md"), "# Draft Line\n\nDraws a line.\n").unwrap();

        let config = offline_config(tmp.path());
        let rendered = show("Draft Line", None, Some(Strategy::Cmark), &config).unwrap();

        assert!(rendered.html.contains("<h1>Draft Line</h1>"));
        assert!(rendered.base_url.starts_with("file://"));
        assert_eq!(rendered.title, "Help: Draft Line");
    }

    #[test]
    fn test_show_delivers_to_existing_view() {
        let tmp = tempfile::TempDir::new().unwrap();
        let root = tmp.path().join("documentation").join("wiki");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("Page.md"), "content\n").unwrap();

        let config = offline_config(tmp.path());
        let mut view = RecordingView { titles: Vec::new() };
        show("Page", Some(&mut view), Some(Strategy::Cmark), &config);

        assert_eq!(view.titles, vec!["Help: Page".to_owned()]);
    }

    #[test]
    fn test_show_missing_page_degrades_to_notice() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = offline_config(tmp.path());

        let rendered = show("No_Such_Page", None, Some(Strategy::Cmark), &config).unwrap();
        assert!(rendered.html.contains(FETCH_ERROR_NOTICE));
    }

    #[test]
    fn test_show_empty_page_returns_none() {
        let config = offline_config(Path::new("/data"));
        assert!(show("", None, None, &config).is_none());
    }

    #[test]
    fn test_show_already_html_file_is_not_reconverted() {
        let tmp = tempfile::TempDir::new().unwrap();
        let root = tmp.path().join("documentation").join("wiki");
        std::fs::create_dir_all(&root).unwrap();
        let doc = "<html><body><p>rendered</p></body></html>";
        std::fs::write(root.join("Page.html"), doc).unwrap();

        let config = offline_config(tmp.path());
        let rendered = show("Page", None, None, &config).unwrap();
        assert_eq!(rendered.html, doc);
    }
}
