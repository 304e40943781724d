//! Help menu model.
//!
//! Builds a host-agnostic "Help" menu structure from a static web-link
//! list and a cached table-of-contents file. The cache is a single flat
//! Markdown file fetched from the documentation source; it is refreshed
//! on demand when absent. Turning the model into actual menu widgets is
//! the host's job.

use std::path::Path;

use dochelp_config::Config;
use dochelp_core::{fetch, normalize, resolve};

/// Page holding the documentation table of contents.
const TOC_PAGE: &str = "Online_Help_Toc";

/// Static links shown in the "On the web" submenu.
pub const WEB_LINKS: &[(&str, &str)] = &[
    ("Home", "https://dochelp.dev"),
    ("Forum", "https://forum.dochelp.dev"),
    ("Wiki", "https://wiki.dochelp.dev"),
    ("Issues", "https://github.com/dochelp/dochelp/issues"),
    ("Code repository", "https://github.com/dochelp/dochelp"),
];

/// A single menu entry: a label and the page or URL it opens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: String,
    pub target: String,
}

/// A named submenu with its entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuSection {
    pub label: String,
    pub target: String,
    pub entries: Vec<MenuEntry>,
}

/// The documentation part of the help menu.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MenuModel {
    pub sections: Vec<MenuSection>,
}

/// Parse the cached table-of-contents markdown into a menu model.
///
/// Lines starting with `-` open a new section; any other line with a
/// `[label](target)` link appends an entry to the current section.
/// Malformed lines and entries before the first section are skipped.
#[must_use]
pub fn parse_menu(markdown: &str) -> MenuModel {
    let mut model = MenuModel::default();
    for line in markdown.lines() {
        let Some((label, target)) = parse_link(line) else {
            if !line.trim().is_empty() {
                tracing::debug!("skipping malformed menu line: {line}");
            }
            continue;
        };
        if line.starts_with('-') {
            model.sections.push(MenuSection {
                label,
                target,
                entries: Vec::new(),
            });
        } else if let Some(section) = model.sections.last_mut() {
            section.entries.push(MenuEntry { label, target });
        } else {
            tracing::debug!("menu entry before any section: {line}");
        }
    }
    model
}

/// Extract the `[label]` and `(target)` parts of a markdown link line.
fn parse_link(line: &str) -> Option<(String, String)> {
    let open = line.find('[')?;
    let close = line[open..].find(']')? + open;
    let paren_open = line[close..].find('(')? + close;
    let paren_close = line[paren_open..].find(')')? + paren_open;
    Some((
        line[open + 1..close].to_owned(),
        line[paren_open + 1..paren_close].to_owned(),
    ))
}

/// Fetch the table of contents and rewrite the cache file.
///
/// Failures are logged, never fatal; the cache is simply left as is.
pub fn refresh(config: &Config) {
    let page = normalize(TOC_PAGE);
    let Some(location) = resolve(&page, config) else {
        tracing::warn!("table of contents location could not be determined");
        return;
    };
    let contents = fetch(&location);
    let cache = config.menu_cache();
    if let Some(parent) = cache.parent()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        tracing::warn!("failed to create cache directory {}: {e}", parent.display());
        return;
    }
    if let Err(e) = std::fs::write(&cache, &contents) {
        tracing::warn!("failed to write menu cache {}: {e}", cache.display());
    }
}

/// Load the menu model from the cache, refreshing it first when absent.
#[must_use]
pub fn load(config: &Config) -> MenuModel {
    let cache = config.menu_cache();
    if !cache.exists() {
        refresh(config);
    }
    load_cache(&cache)
}

fn load_cache(cache: &Path) -> MenuModel {
    match std::fs::read_to_string(cache) {
        Ok(markdown) => parse_menu(&markdown),
        Err(e) => {
            tracing::warn!("failed to read menu cache {}: {e}", cache.display());
            MenuModel::default()
        }
    }
}
