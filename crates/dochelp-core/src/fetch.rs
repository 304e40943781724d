//! Content retrieval for resolved locations.
//!
//! Fetch failures are non-fatal by design: the caller always needs
//! renderable text, so network and file errors are substituted with a
//! fixed notice instead of propagating.

use std::time::Duration;

use ureq::Agent;

use crate::location::ResolvedLocation;

/// Notice shown in place of content when retrieval fails.
pub const FETCH_ERROR_NOTICE: &str = "Contents for this page could not be retrieved. \
     Please check the documentation settings of your application.";

/// Single network attempt timeout.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Retrieve the text contents of a resolved location.
///
/// URLs are fetched with a single GET request; paths are read as UTF-8
/// text. Any failure (timeout, DNS, HTTP error, missing file) yields
/// [`FETCH_ERROR_NOTICE`] instead of an error.
#[must_use]
pub fn fetch(location: &ResolvedLocation) -> String {
    match location {
        ResolvedLocation::Url(url) => fetch_url(url),
        ResolvedLocation::File(path) => match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("failed to read {}: {e}", path.display());
                FETCH_ERROR_NOTICE.to_owned()
            }
        },
    }
}

fn fetch_url(url: &str) -> String {
    let agent: Agent = Agent::config_builder()
        .timeout_global(Some(FETCH_TIMEOUT))
        .build()
        .into();
    match agent.get(url).call() {
        Ok(response) => match response.into_body().read_to_string() {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("failed to read response body from {url}: {e}");
                FETCH_ERROR_NOTICE.to_owned()
            }
        },
        Err(e) => {
            tracing::warn!("failed to fetch {url}: {e}");
            FETCH_ERROR_NOTICE.to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_fetch_existing_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("Page.md");
        std::fs::write(&path, "# Title\n\nBody text.\n").unwrap();

        let contents = fetch(&ResolvedLocation::File(path));
        assert_eq!(contents, "# Title\n\nBody text.\n");
    }

    #[test]
    fn test_fetch_missing_file_returns_notice() {
        let location = ResolvedLocation::File(PathBuf::from("/nonexistent/Page.md"));
        assert_eq!(fetch(&location), FETCH_ERROR_NOTICE);
    }

    #[test]
    fn test_fetch_unreachable_url_returns_notice() {
        // Discard port on localhost refuses the connection immediately
        let location = ResolvedLocation::Url("http://127.0.0.1:9/Page.md".to_owned());
        assert_eq!(fetch(&location), FETCH_ERROR_NOTICE);
    }
}
