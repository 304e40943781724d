//! Viewer preferences for dochelp.
//!
//! Parses `dochelp.toml` preference files with serde. A [`Config`] is
//! loaded once at the boundary and passed as an immutable snapshot to
//! the resolution and conversion pipeline; nothing in the pipeline
//! writes preferences back.
//!
//! String paths (`viewer.location`, `viewer.stylesheet`) support shell
//! expansion (`~`, `$VAR`) via `shellexpand`.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Preference filename inside the data directory.
const CONFIG_FILENAME: &str = "dochelp.toml";

/// Subdirectory of the data directory holding cached help data.
const CACHE_DIRNAME: &str = "help";

/// Where rendered help content should be displayed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationMode {
    /// Open the resolved location in the desktop web browser.
    Browser,
    /// Floating dock panel inside the host application.
    Dialog,
    /// Embedded host-application tab.
    #[default]
    Tab,
}

/// Viewer preferences as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ViewerConfigRaw {
    online: Option<bool>,
    mode: Option<PresentationMode>,
    url: Option<String>,
    location: Option<String>,
    suffix: Option<String>,
    stylesheet: Option<String>,
}

/// Cached dock-widget geometry for the dialog presenter.
///
/// The presenter writes these back through the host; the pipeline only
/// carries them so a reused dialog reopens where the user left it.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DockConfig {
    /// Dock area code (host-specific; 2 is the right-hand area).
    pub area: u8,
    /// Whether the dock widget floats.
    pub floating: bool,
    /// Widget width in pixels.
    pub width: u32,
    /// Widget height in pixels.
    pub height: u32,
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            area: 2,
            floating: true,
            width: 300,
            height: 200,
        }
    }
}

/// Viewer configuration snapshot.
///
/// Immutable for the duration of a single `show` operation.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Raw viewer preferences (paths are unexpanded strings from TOML).
    viewer: ViewerConfigRaw,
    /// Dock-widget geometry for the dialog presenter.
    pub dock: DockConfig,

    /// Whether to fetch documentation online (set after loading).
    #[serde(skip)]
    pub online: bool,
    /// Presentation mode (set after loading).
    #[serde(skip)]
    pub mode: PresentationMode,
    /// Online base URL, if configured.
    #[serde(skip)]
    pub url: Option<String>,
    /// Locale suffix path segment, e.g. `fr`.
    #[serde(skip)]
    pub suffix: Option<String>,
    /// Resolved offline documentation root (set after loading).
    #[serde(skip)]
    location_resolved: Option<PathBuf>,
    /// Resolved stylesheet path (set after loading).
    #[serde(skip)]
    stylesheet_resolved: Option<PathBuf>,
    /// Data directory the preferences were loaded relative to.
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Path to the preference file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Preference loading error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Preference file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Preference error: {0}")]
    Validation(String),
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load preferences for the given data directory.
    ///
    /// Reads `dochelp.toml` inside `data_dir` when present; otherwise
    /// returns defaults rooted at `data_dir`. A host that stores its
    /// preference file elsewhere can use [`Config::load_from_file`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(data_dir: &Path) -> Result<Self, ConfigError> {
        let candidate = data_dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            Self::load_from_file(&candidate, data_dir)
        } else {
            Ok(Self::default_with_base(data_dir))
        }
    }

    /// Load preferences from a specific file, resolving paths against `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if the file does not exist, or a
    /// parse/validation error for malformed content.
    pub fn load_from_file(path: &Path, data_dir: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.resolve(data_dir)?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;
        Ok(config)
    }

    /// Create default preferences rooted at the given data directory.
    #[must_use]
    pub fn default_with_base(data_dir: &Path) -> Self {
        Self {
            viewer: ViewerConfigRaw::default(),
            dock: DockConfig::default(),
            online: true,
            mode: PresentationMode::default(),
            url: None,
            suffix: None,
            location_resolved: None,
            stylesheet_resolved: None,
            data_dir: data_dir.to_path_buf(),
            config_path: None,
        }
    }

    /// Offline documentation root.
    ///
    /// Falls back to `<data_dir>/documentation/wiki` when not configured.
    #[must_use]
    pub fn offline_root(&self) -> PathBuf {
        self.location_resolved
            .clone()
            .unwrap_or_else(|| self.data_dir.join("documentation").join("wiki"))
    }

    /// Whether an offline root was explicitly configured.
    #[must_use]
    pub fn has_offline_root(&self) -> bool {
        self.location_resolved.is_some()
    }

    /// Stylesheet to inline into rendered pages.
    ///
    /// Falls back to `<data_dir>/default.css` when not configured.
    #[must_use]
    pub fn stylesheet_path(&self) -> PathBuf {
        self.stylesheet_resolved
            .clone()
            .unwrap_or_else(|| self.data_dir.join("default.css"))
    }

    /// Directory holding cached help data (menu cache).
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.data_dir.join(CACHE_DIRNAME)
    }

    /// Path of the cached table-of-contents file.
    #[must_use]
    pub fn menu_cache(&self) -> PathBuf {
        self.cache_dir().join("menu.md")
    }

    /// Remove the preference file and cached help data.
    ///
    /// Used on uninstall when the user chooses not to keep settings.
    /// Failures are logged, never fatal.
    pub fn purge(&self) {
        let pref = self
            .config_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join(CONFIG_FILENAME));
        if pref.exists()
            && let Err(e) = std::fs::remove_file(&pref)
        {
            tracing::warn!("failed to remove preference file {}: {e}", pref.display());
        }
        let cache = self.cache_dir();
        if cache.exists()
            && let Err(e) = std::fs::remove_dir_all(&cache)
        {
            tracing::warn!("failed to remove cache directory {}: {e}", cache.display());
        }
    }

    /// Validate preference values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the configured URL does not
    /// use an http(s) scheme.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.url {
            require_http_url(url, "viewer.url")?;
        }
        Ok(())
    }

    /// Move raw TOML values into their resolved fields, expanding paths.
    fn resolve(&mut self, data_dir: &Path) -> Result<(), ConfigError> {
        self.data_dir = data_dir.to_path_buf();
        self.online = self.viewer.online.unwrap_or(true);
        self.mode = self.viewer.mode.unwrap_or_default();
        self.url = self.viewer.url.take().filter(|u| !u.is_empty());
        self.suffix = self.viewer.suffix.take().filter(|s| !s.is_empty());
        self.location_resolved = expand_path(self.viewer.location.as_deref(), "viewer.location")?;
        self.stylesheet_resolved =
            expand_path(self.viewer.stylesheet.as_deref(), "viewer.stylesheet")?;
        Ok(())
    }
}

/// Expand `~` and environment variables in an optional path string.
fn expand_path(raw: Option<&str>, field: &str) -> Result<Option<PathBuf>, ConfigError> {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let expanded = shellexpand::full(raw)
        .map_err(|e| ConfigError::Validation(format!("{field}: {e}")))?;
    Ok(Some(PathBuf::from(expanded.as_ref())))
}
