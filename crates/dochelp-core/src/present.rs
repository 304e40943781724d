//! Presenter seam.
//!
//! Displaying rendered help is host-specific. The pipeline ends at
//! [`HtmlView`] (the `setHtml` capability a host view must expose) and
//! a desktop-browser opener; docks, tabs and window plumbing stay on
//! the host side.

use std::path::Path;

use crate::location::ResolvedLocation;

/// A host view capable of displaying rendered HTML.
///
/// Implemented by the host application's embedded web widget. Reusing
/// an existing view routes a new page into it instead of opening a new
/// surface.
pub trait HtmlView {
    /// Display the given HTML with its base URL and window title.
    fn set_html(&mut self, html: &str, base_url: &str, title: &str);
}

/// Open the resolved location in the desktop web browser.
///
/// Failures are logged; nothing is shown in that case.
pub fn open_in_browser(location: &ResolvedLocation) {
    let target = match location {
        ResolvedLocation::Url(url) => url.clone(),
        ResolvedLocation::File(path) => file_uri(path),
    };
    if let Err(e) = webbrowser::open(&target) {
        tracing::warn!("failed to open browser for {target}: {e}");
    }
}

/// Base URI of a location, for resolving relative links in a view.
///
/// The parent of the location with a trailing slash; filesystem paths
/// become `file://` URIs.
#[must_use]
pub fn base_uri(location: &ResolvedLocation) -> String {
    match location {
        ResolvedLocation::Url(url) => match url.rfind('/') {
            Some(pos) => url[..=pos].to_owned(),
            None => url.clone(),
        },
        ResolvedLocation::File(path) => {
            let parent = path.parent().unwrap_or(Path::new(""));
            let mut dir = parent.to_string_lossy().into_owned();
            if !dir.ends_with('/') {
                dir.push('/');
            }
            file_uri(Path::new(&dir))
        }
    }
}

/// Window title for a page token: the bare page name with spaces.
#[must_use]
pub fn page_title(page: &str) -> String {
    let name = page.rsplit('/').next().unwrap_or(page);
    let name = name.strip_suffix(".md").unwrap_or(name);
    format!("Help: {}", name.replace('_', " "))
}

/// Turn a filesystem path into a `file://` URI string.
fn file_uri(path: &Path) -> String {
    let raw = path.to_string_lossy();
    if raw.starts_with('/') {
        // unix path
        return format!("file://{raw}");
    }
    let mut chars = raw.chars();
    if let (Some(drive), Some(':')) = (chars.next(), chars.next())
        && drive.is_ascii_uppercase()
    {
        // windows path
        return format!("file:///{}", raw.replace('\\', "/"));
    }
    raw.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_base_uri_of_url() {
        let location = ResolvedLocation::Url("https://example.com/docs/Page.md".to_owned());
        assert_eq!(base_uri(&location), "https://example.com/docs/");
    }

    #[test]
    fn test_base_uri_of_unix_path() {
        let location = ResolvedLocation::File(PathBuf::from("/home/user/docs/Page.md"));
        assert_eq!(base_uri(&location), "file:///home/user/docs/");
    }

    #[test]
    fn test_file_uri_windows_drive() {
        assert_eq!(
            file_uri(Path::new(r"C:\Users\docs\")),
            "file:///C:/Users/docs/"
        );
    }

    #[test]
    fn test_page_title() {
        assert_eq!(page_title("Draft_Line"), "Help: Draft Line");
        assert_eq!(page_title("wiki/Draft_Line.md"), "Help: Draft Line");
        assert_eq!(
            page_title("/home/user/docs/Draft_Line.md"),
            "Help: Draft Line"
        );
    }
}
