//! Configuration management for Pedia.
//!
//! Parses `pedia.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.repository`
//! - `site.edit_base_url`
//! - `server.host`

mod expand;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override site display name.
    pub site_name: Option<String>,
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override content source directory.
    pub source_dir: Option<PathBuf>,
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override live reload enabled flag.
    pub live_reload_enabled: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "pedia.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site section as parsed from TOML (every field optional).
    site: SiteConfigRaw,
    /// Documentation paths as relative strings from TOML.
    docs: DocsConfigRaw,
    /// Navigation ordering.
    pub navigation: NavigationConfig,
    /// Server configuration for `serve` mode.
    pub server: ServerConfig,
    /// Live reload configuration.
    pub live_reload: LiveReloadConfig,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw site section as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    name: Option<String>,
    logo: Option<String>,
    repository: Option<String>,
    edit_base_url: Option<String>,
    footer: Option<String>,
}

/// Site-wide presentation settings.
///
/// Loaded once per build and read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SiteConfig {
    /// Display name shown in the page title and header.
    pub name: String,
    /// Logo text for the header (defaults to `name`).
    pub logo: String,
    /// External project repository link.
    pub repository: Option<String>,
    /// Base URL for "Edit this page" links, joined with the source path.
    pub edit_base_url: Option<String>,
    /// Footer text.
    pub footer: Option<String>,
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
}

/// Resolved documentation paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Directory holding the content documents.
    pub source_dir: PathBuf,
    /// Directory the static site is written to.
    pub output_dir: PathBuf,
}

/// What to do with documents that the roadmap does not mention.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    /// Leave them out of navigation and report a warning.
    #[default]
    Warn,
    /// Leave them out of navigation silently.
    Exclude,
    /// Add them after the roadmap entries, ordered by slug.
    Append,
}

/// Navigation ordering configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Hand-maintained display order of document slugs.
    pub roadmap: Vec<String>,
    /// Policy for documents missing from the roadmap.
    pub orphans: OrphanPolicy,
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
        }
    }
}

/// Live reload configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LiveReloadConfig {
    /// Whether live reload is enabled.
    pub enabled: bool,
    /// File patterns to watch for changes.
    pub watch_patterns: Option<Vec<String>>,
}

impl Default for LiveReloadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            watch_patterns: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// A required field is absent.
    #[error("Configuration error: missing required field `{0}`")]
    MissingField(&'static str),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.repository`").
        field: String,
        /// Error message (e.g., "${`REPO_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
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

/// Normalize a roadmap slug (`/hash-map/` -> `hash-map`).
fn normalize_slug(slug: &str) -> String {
    slug.trim().trim_matches('/').to_owned()
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `pedia.toml` in current directory and parents,
    /// falling back to defaults relative to the current directory.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The site section
    /// is resolved last, so a missing display name is reported even when no
    /// config file exists.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or `site.name` is missing.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.resolve_site()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(name) = &settings.site_name {
            self.site.name = Some(name.clone());
        }
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.docs_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(live_reload_enabled) = settings.live_reload_enabled {
            self.live_reload.enabled = live_reload_enabled;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfigRaw::default(),
            docs: DocsConfigRaw::default(),
            navigation: NavigationConfig::default(),
            server: ServerConfig::default(),
            live_reload: LiveReloadConfig::default(),
            site_resolved: SiteConfig::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                output_dir: base.join("dist"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Build the [`SiteConfig`] from the raw site section.
    fn resolve_site(&mut self) -> Result<(), ConfigError> {
        let name = self
            .site
            .name
            .clone()
            .ok_or(ConfigError::MissingField("site.name"))?;
        require_non_empty(&name, "site.name")?;

        let logo = self.site.logo.clone().unwrap_or_else(|| name.clone());
        self.site_resolved = SiteConfig {
            name,
            logo,
            repository: self.site.repository.clone(),
            edit_base_url: self
                .site
                .edit_base_url
                .as_deref()
                .map(|url| url.trim_end_matches('/').to_owned()),
            footer: self.site.footer.clone(),
        };
        Ok(())
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are properly set and contain valid values.
    /// Called automatically by [`Config::load`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_navigation()?;
        self.validate_server()?;
        Ok(())
    }

    /// Validate site links.
    fn validate_site(&self) -> Result<(), ConfigError> {
        if let Some(ref repository) = self.site_resolved.repository {
            require_http_url(repository, "site.repository")?;
        }
        if let Some(ref edit_base_url) = self.site_resolved.edit_base_url {
            require_http_url(edit_base_url, "site.edit_base_url")?;
        }
        Ok(())
    }

    /// Validate roadmap entries: non-empty and unique after normalization.
    fn validate_navigation(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for slug in &self.navigation.roadmap {
            let normalized = normalize_slug(slug);
            if !seen.insert(normalized.clone()) {
                return Err(ConfigError::Validation(format!(
                    "navigation.roadmap lists `{normalized}` more than once"
                )));
            }
        }
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 is technically valid (OS assigns a random port), but it's
        // unlikely to be intentional in a config file
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Roadmap slugs with surrounding slashes stripped.
    #[must_use]
    pub fn roadmap(&self) -> Vec<String> {
        self.navigation
            .roadmap
            .iter()
            .map(|slug| normalize_slug(slug))
            .collect()
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        expand::expand_opt(&mut self.site.repository, "site.repository")?;
        expand::expand_opt(&mut self.site.edit_base_url, "site.edit_base_url")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), "docs"),
            output_dir: resolve(self.docs.output_dir.as_deref(), "dist"),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7979);
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
        assert_eq!(config.docs_resolved.output_dir, PathBuf::from("/test/dist"));
        assert!(config.navigation.roadmap.is_empty());
        assert_eq!(config.navigation.orphans, OrphanPolicy::Warn);
        assert!(config.live_reload.enabled);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[site]
name = "Javapedia"
logo = "JP"
repository = "https://github.com/example/javapedia"
footer = "MIT"

[docs]
source_dir = "pages"
output_dir = "public"

[navigation]
roadmap = ["array-list", "hash-map", "abstract"]
orphans = "append"

[server]
port = 9000
"#;
        let (_dir, path) = write_config(toml);
        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(
            config.site_resolved,
            SiteConfig {
                name: "Javapedia".to_owned(),
                logo: "JP".to_owned(),
                repository: Some("https://github.com/example/javapedia".to_owned()),
                edit_base_url: None,
                footer: Some("MIT".to_owned()),
            }
        );
        let base = path.parent().unwrap();
        assert_eq!(config.docs_resolved.source_dir, base.join("pages"));
        assert_eq!(config.docs_resolved.output_dir, base.join("public"));
        assert_eq!(config.roadmap(), vec!["array-list", "hash-map", "abstract"]);
        assert_eq!(config.navigation.orphans, OrphanPolicy::Append);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_missing_site_name_is_config_error() {
        let (_dir, path) = write_config("[site]\nrepository = \"https://example.com\"\n");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingField("site.name")),
            "Expected MissingField, got {err:?}"
        );
    }

    #[test]
    fn test_empty_site_name_is_rejected() {
        let (_dir, path) = write_config("[site]\nname = \"  \"\n");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("site.name"));
    }

    #[test]
    fn test_cli_site_name_satisfies_requirement() {
        let (_dir, path) = write_config("");
        let settings = CliSettings {
            site_name: Some("Javapedia".to_owned()),
            ..CliSettings::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert_eq!(config.site_resolved.name, "Javapedia");
        assert_eq!(config.site_resolved.logo, "Javapedia");
    }

    #[test]
    fn test_explicit_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/pedia.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_invalid_repository_url() {
        let (_dir, path) = write_config("[site]\nname = \"J\"\nrepository = \"github.com/x\"\n");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(err.to_string().contains("site.repository"));
    }

    #[test]
    fn test_edit_base_url_trailing_slash_trimmed() {
        let (_dir, path) = write_config(
            "[site]\nname = \"J\"\nedit_base_url = \"https://github.com/x/y/blob/main/\"\n",
        );
        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(
            config.site_resolved.edit_base_url.as_deref(),
            Some("https://github.com/x/y/blob/main")
        );
    }

    #[test]
    fn test_duplicate_roadmap_entry_rejected() {
        let (_dir, path) = write_config(
            "[site]\nname = \"J\"\n[navigation]\nroadmap = [\"hash-map\", \"/hash-map/\"]\n",
        );
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("hash-map"));
    }

    #[test]
    fn test_unknown_orphan_policy_fails_parse() {
        let (_dir, path) =
            write_config("[site]\nname = \"J\"\n[navigation]\norphans = \"ignore\"\n");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_repository_env_expansion() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("PEDIA_CFG_TEST_ORG", "example");
        }
        let (_dir, path) = write_config(
            "[site]\nname = \"J\"\nrepository = \"https://github.com/${PEDIA_CFG_TEST_ORG}/j\"\n",
        );
        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(
            config.site_resolved.repository.as_deref(),
            Some("https://github.com/example/j")
        );
        unsafe {
            std::env::remove_var("PEDIA_CFG_TEST_ORG");
        }
    }

    #[test]
    fn test_apply_cli_settings_paths() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            source_dir: Some(PathBuf::from("/custom/pages")),
            output_dir: Some(PathBuf::from("/custom/out")),
            ..CliSettings::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/custom/pages")
        );
        assert_eq!(config.docs_resolved.output_dir, PathBuf::from("/custom/out"));
        assert_eq!(config.server.port, 7979);
    }

    #[test]
    fn test_apply_cli_settings_server() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            port: Some(8080),
            live_reload_enabled: Some(false),
            ..CliSettings::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert!(!config.live_reload.enabled);
    }

    #[test]
    fn test_port_zero_rejected() {
        let (_dir, path) = write_config("[site]\nname = \"J\"\n[server]\nport = 0\n");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(err.to_string().contains("server.port"));
    }
}
