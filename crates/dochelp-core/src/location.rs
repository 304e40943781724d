//! Page location resolution.
//!
//! Turns a normalized page token into a concrete content location,
//! applying redirect substitutions and the online/offline preference.
//! Resolution never fails hard: an undeterminable location is reported
//! as `None` and the caller logs it.

use std::fmt;
use std::path::{Path, PathBuf};

use dochelp_config::{Config, PresentationMode};

/// Default online location rendered by the wiki host, used in browser mode.
const DEFAULT_RENDERED_URL: &str = "https://github.com/dochelp/documentation/blob/main/wiki/";

/// Default online location serving raw markdown, used for embedded rendering.
const DEFAULT_RAW_URL: &str = "https://raw.githubusercontent.com/dochelp/documentation/main/wiki";

/// Legacy page names and their canonical replacements.
const REDIRECTS: &[(&str, &str)] = &[
    ("Main_Page", "README"),
    ("Online_Help_Startpage", "README"),
];

/// A concrete content location: a URL or a filesystem path.
///
/// Downstream code treats both uniformly except for the fetch mechanism.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedLocation {
    /// Scheme-prefixed network location.
    Url(String),
    /// Local filesystem path.
    File(PathBuf),
}

impl fmt::Display for ResolvedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Look up a legacy page name in the redirect table.
fn redirect(page: &str) -> Option<&'static str> {
    REDIRECTS
        .iter()
        .find(|(from, _)| *from == page)
        .map(|(_, to)| *to)
}

/// Resolve the location (online or offline) of a given page.
///
/// URLs and existing file paths pass through unchanged. Anything else
/// is treated as a page name and anchored to the configured base URL or
/// offline root. Returns `None` only when no location could be
/// determined, which signals a preference problem to the caller.
#[must_use]
pub fn resolve(page: &str, config: &Config) -> Option<ResolvedLocation> {
    if page.is_empty() {
        return None;
    }
    if page.starts_with("http") {
        return Some(ResolvedLocation::Url(page.to_owned()));
    }
    if let Some(path) = page.strip_prefix("file://") {
        return Some(ResolvedLocation::File(PathBuf::from(path)));
    }
    if Path::new(page).exists() {
        return Some(ResolvedLocation::File(PathBuf::from(page)));
    }

    let page = page.split('#').next().unwrap_or_default();
    let page = page.strip_suffix(".md").unwrap_or(page);
    let page = page.strip_prefix("wiki/").unwrap_or(page);
    let page = page.replace(' ', "_");

    let location = if config.online {
        resolve_online(page, config)
    } else {
        resolve_offline(page, config)
    };
    Some(apply_suffix(location, config.suffix.as_deref()))
}

fn resolve_online(mut page: String, config: &Config) -> ResolvedLocation {
    let mut base = config.url.clone().unwrap_or_else(|| {
        if config.mode == PresentationMode::Browser {
            DEFAULT_RENDERED_URL.to_owned()
        } else {
            DEFAULT_RAW_URL.to_owned()
        }
    });
    // Redirects only apply outside wiki-rendering hosts, which still
    // serve the legacy names themselves.
    if !base.contains("wiki.")
        && let Some(target) = redirect(&page)
    {
        page = target.to_owned();
    }
    if page.ends_with("README") && base.ends_with("wiki") {
        // README lives outside the wiki folder
        base.truncate(base.len() - 4);
    }
    if !base.ends_with('/') {
        base.push('/');
    }
    base.push_str(&page);
    if !base.contains("wiki.") {
        base.push_str(".md");
    }
    ResolvedLocation::Url(base)
}

fn resolve_offline(mut page: String, config: &Config) -> ResolvedLocation {
    let mut root = config.offline_root();
    if let Some(target) = redirect(&page) {
        page = target.to_owned();
    }
    if page.ends_with("README") && root.file_name().is_some_and(|n| n == "wiki") {
        // README lives outside the wiki folder
        root.pop();
    }
    let html = root.join(format!("{page}.html"));
    if html.exists() {
        ResolvedLocation::File(html)
    } else {
        ResolvedLocation::File(root.join(format!("{page}.md")))
    }
}

/// Append the configured locale suffix as an extra path segment.
fn apply_suffix(location: ResolvedLocation, suffix: Option<&str>) -> ResolvedLocation {
    let Some(suffix) = suffix else {
        return location;
    };
    let segment = suffix.trim_start_matches('/');
    match location {
        ResolvedLocation::Url(mut url) => {
            url.push('/');
            url.push_str(segment);
            ResolvedLocation::Url(url)
        }
        ResolvedLocation::File(path) => ResolvedLocation::File(path.join(segment)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn online_config(url: Option<&str>) -> Config {
        let mut config = Config::default_with_base(Path::new("/data"));
        config.url = url.map(str::to_owned);
        config
    }

    fn offline_config(root: &Path) -> Config {
        let mut config = Config::default_with_base(root);
        config.online = false;
        config
    }

    #[test]
    fn test_url_passes_through_unchanged() {
        let config = offline_config(Path::new("/data"));
        assert_eq!(
            resolve("https://example.com/x.md", &config),
            Some(ResolvedLocation::Url("https://example.com/x.md".to_owned()))
        );
    }

    #[test]
    fn test_file_scheme_strips_prefix() {
        let config = online_config(None);
        assert_eq!(
            resolve("file:///home/user/docs/Page.md", &config),
            Some(ResolvedLocation::File(PathBuf::from(
                "/home/user/docs/Page.md"
            )))
        );
    }

    #[test]
    fn test_existing_path_passes_through() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("Page.md");
        std::fs::write(&file, "# hi\n").unwrap();

        let config = online_config(None);
        let given = file.to_str().unwrap();
        assert_eq!(resolve(given, &config), Some(ResolvedLocation::File(file)));
    }

    #[test]
    fn test_empty_page_is_unresolvable() {
        let config = online_config(None);
        assert_eq!(resolve("", &config), None);
    }

    #[test]
    fn test_online_default_base() {
        let config = online_config(None);
        assert_eq!(
            resolve("Draft_Line", &config),
            Some(ResolvedLocation::Url(format!(
                "{DEFAULT_RAW_URL}/Draft_Line.md"
            )))
        );
    }

    #[test]
    fn test_online_browser_mode_uses_rendered_default() {
        let mut config = online_config(None);
        config.mode = PresentationMode::Browser;
        assert_eq!(
            resolve("Draft_Line", &config),
            Some(ResolvedLocation::Url(format!(
                "{DEFAULT_RENDERED_URL}Draft_Line.md"
            )))
        );
    }

    #[test]
    fn test_online_strips_md_wiki_and_fragment() {
        let config = online_config(Some("https://example.com/docs"));
        assert_eq!(
            resolve("wiki/Draft_Line.md#Usage", &config),
            Some(ResolvedLocation::Url(
                "https://example.com/docs/Draft_Line.md".to_owned()
            ))
        );
    }

    #[test]
    fn test_online_redirect_applies() {
        let config = online_config(Some("https://example.com/docs"));
        assert_eq!(
            resolve("Main_Page", &config),
            Some(ResolvedLocation::Url(
                "https://example.com/docs/README.md".to_owned()
            ))
        );
    }

    #[test]
    fn test_online_redirect_skipped_on_wiki_host() {
        let config = online_config(Some("https://wiki.example.org/"));
        assert_eq!(
            resolve("Main_Page", &config),
            Some(ResolvedLocation::Url(
                "https://wiki.example.org/Main_Page".to_owned()
            ))
        );
    }

    #[test]
    fn test_online_wiki_host_has_no_md_suffix() {
        let config = online_config(Some("https://wiki.example.org/"));
        assert_eq!(
            resolve("Draft_Line", &config),
            Some(ResolvedLocation::Url(
                "https://wiki.example.org/Draft_Line".to_owned()
            ))
        );
    }

    #[test]
    fn test_online_readme_trims_wiki_segment() {
        let config = online_config(Some("https://example.com/docs/wiki"));
        assert_eq!(
            resolve("README", &config),
            Some(ResolvedLocation::Url(
                "https://example.com/docs/README.md".to_owned()
            ))
        );
    }

    #[test]
    fn test_online_suffix_appended() {
        let mut config = online_config(Some("https://example.com/docs"));
        config.suffix = Some("fr".to_owned());
        assert_eq!(
            resolve("Draft_Line", &config),
            Some(ResolvedLocation::Url(
                "https://example.com/docs/Draft_Line.md/fr".to_owned()
            ))
        );
    }

    #[test]
    fn test_online_suffix_leading_separator_normalized() {
        let mut config = online_config(Some("https://example.com/docs"));
        config.suffix = Some("/fr".to_owned());
        assert_eq!(
            resolve("Draft_Line", &config),
            Some(ResolvedLocation::Url(
                "https://example.com/docs/Draft_Line.md/fr".to_owned()
            ))
        );
    }

    #[test]
    fn test_offline_default_root() {
        let config = offline_config(Path::new("/data"));
        assert_eq!(
            resolve("Draft_Line", &config),
            Some(ResolvedLocation::File(PathBuf::from(
                "/data/documentation/wiki/Draft_Line.md"
            )))
        );
    }

    #[test]
    fn test_offline_prefers_existing_html() {
        let tmp = tempfile::TempDir::new().unwrap();
        let root = tmp.path().join("documentation").join("wiki");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("Draft_Line.html"), "<html></html>").unwrap();

        let config = offline_config(tmp.path());
        assert_eq!(
            resolve("Draft_Line", &config),
            Some(ResolvedLocation::File(root.join("Draft_Line.html")))
        );
    }

    #[test]
    fn test_offline_redirect_and_readme_outside_wiki() {
        let config = offline_config(Path::new("/data"));
        // Main_Page redirects to README, which lives above the wiki dir
        assert_eq!(
            resolve("Main_Page", &config),
            Some(ResolvedLocation::File(PathBuf::from(
                "/data/documentation/README.md"
            )))
        );
    }

    #[test]
    fn test_offline_spaces_become_underscores() {
        let config = offline_config(Path::new("/data"));
        assert_eq!(
            resolve("Draft Line", &config),
            Some(ResolvedLocation::File(PathBuf::from(
                "/data/documentation/wiki/Draft_Line.md"
            )))
        );
    }
}
