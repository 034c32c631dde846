//! Configuration management for krokidoc.
//!
//! Parses `krokidoc.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! `kroki.url` supports environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

mod expand;

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use krokidoc_render::{DEFAULT_PREFIX, DEFAULT_SERVICE_URL, OutputFormat};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override Kroki service URL.
    pub kroki_url: Option<String>,
    /// Override default output format.
    pub output_format: Option<OutputFormat>,
    /// Override inline SVG flag.
    pub inline_svg: Option<bool>,
    /// Override documentation source directory.
    pub source_dir: Option<PathBuf>,
    /// Override build output directory.
    pub output_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "krokidoc.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Kroki rendering configuration.
    pub kroki: KrokiConfig,
    /// Build configuration (paths are relative strings from TOML).
    build: BuildConfigRaw,

    /// Resolved build configuration (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Kroki rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct KrokiConfig {
    /// Kroki service URL.
    pub url: String,
    /// Format used when a directive does not name one.
    pub output_format: OutputFormat,
    /// Embed SVG artifacts inline instead of referencing them.
    pub inline_svg: bool,
    /// Artifact filename prefix.
    pub prefix: String,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl KrokiConfig {
    /// HTTP timeout for Kroki requests.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for KrokiConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVICE_URL.to_owned(),
            output_format: OutputFormat::default(),
            inline_svg: false,
            prefix: DEFAULT_PREFIX.to_owned(),
            timeout_secs: 30,
        }
    }
}

/// Raw build configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
    image_dir: Option<String>,
}

/// Resolved build configuration with absolute paths.
#[derive(Debug, Default)]
pub struct BuildConfig {
    /// Directory containing the documentation sources.
    pub source_dir: PathBuf,
    /// Directory receiving the generated documents.
    pub output_dir: PathBuf,
    /// Artifact subdirectory of `output_dir`, `/`-separated.
    pub image_dir: String,
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
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`kroki.url`").
        field: String,
        /// Error message (e.g., "${`KROKI_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
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

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `krokidoc.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The merged result
    /// is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the merged configuration is invalid.
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

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(url) = &settings.kroki_url {
            self.kroki.url.clone_from(url);
        }
        if let Some(format) = settings.output_format {
            self.kroki.output_format = format;
        }
        if let Some(inline_svg) = settings.inline_svg {
            self.kroki.inline_svg = inline_svg;
        }
        if let Some(source_dir) = &settings.source_dir {
            self.build_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.build_resolved.output_dir.clone_from(output_dir);
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
        let mut config = Self {
            kroki: KrokiConfig::default(),
            build: BuildConfigRaw::default(),
            build_resolved: BuildConfig::default(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
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

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_kroki()?;
        self.validate_build()?;
        Ok(())
    }

    fn validate_kroki(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.kroki.url, "kroki.url")?;
        require_http_url(&self.kroki.url, "kroki.url")?;
        require_non_empty(&self.kroki.prefix, "kroki.prefix")?;

        if self.kroki.prefix.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "kroki.prefix cannot contain path separators".to_owned(),
            ));
        }
        if self.kroki.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "kroki.timeout_secs must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_build(&self) -> Result<(), ConfigError> {
        let image_dir = &self.build_resolved.image_dir;
        require_non_empty(image_dir, "build.image_dir")?;

        // The image dir doubles as a web path, so it must stay inside the output dir
        let escapes = Path::new(image_dir)
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(ConfigError::Validation(
                "build.image_dir must be a relative path inside the output directory".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.kroki.url = expand::expand_env(&self.kroki.url, "kroki.url")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.build_resolved = BuildConfig {
            source_dir: resolve(self.build.source_dir.as_deref(), "docs"),
            output_dir: resolve(self.build.output_dir.as_deref(), "_build/html"),
            image_dir: self
                .build
                .image_dir
                .as_deref()
                .unwrap_or("_images")
                .trim_matches('/')
                .to_owned(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.kroki.url, "https://kroki.io");
        assert_eq!(config.kroki.output_format, OutputFormat::Svg);
        assert!(!config.kroki.inline_svg);
        assert_eq!(config.kroki.prefix, "kroki");
        assert_eq!(config.kroki.timeout(), Duration::from_secs(30));
        assert_eq!(config.build_resolved.source_dir, PathBuf::from("/test/docs"));
        assert_eq!(
            config.build_resolved.output_dir,
            PathBuf::from("/test/_build/html")
        );
        assert_eq!(config.build_resolved.image_dir, "_images");
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.kroki.url, "https://kroki.io");
        assert_eq!(config.kroki.output_format, OutputFormat::Svg);
    }

    #[test]
    fn test_parse_kroki_config() {
        let toml = r#"
[kroki]
url = "http://localhost:8000"
output_format = "png"
inline_svg = true
prefix = "diagram"
timeout_secs = 5
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.kroki.url, "http://localhost:8000");
        assert_eq!(config.kroki.output_format, OutputFormat::Png);
        assert!(config.kroki.inline_svg);
        assert_eq!(config.kroki.prefix, "diagram");
        assert_eq!(config.kroki.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_parse_unknown_output_format_fails() {
        let toml = r#"
[kroki]
output_format = "pdf"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[build]
source_dir = "documentation"
output_dir = "site"
image_dir = "/static/diagrams/"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.build_resolved.source_dir,
            PathBuf::from("/project/documentation")
        );
        assert_eq!(
            config.build_resolved.output_dir,
            PathBuf::from("/project/site")
        );
        assert_eq!(config.build_resolved.image_dir, "static/diagrams");
    }

    #[test]
    fn test_apply_cli_settings_kroki() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            kroki_url: Some("http://kroki:8000".to_owned()),
            output_format: Some(OutputFormat::Png),
            inline_svg: Some(true),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.kroki.url, "http://kroki:8000");
        assert_eq!(config.kroki.output_format, OutputFormat::Png);
        assert!(config.kroki.inline_svg);
        assert_eq!(config.kroki.prefix, "kroki"); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_dirs() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            source_dir: Some(PathBuf::from("/custom/docs")),
            output_dir: Some(PathBuf::from("/custom/out")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.build_resolved.source_dir,
            PathBuf::from("/custom/docs")
        );
        assert_eq!(
            config.build_resolved.output_dir,
            PathBuf::from("/custom/out")
        );
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.kroki.url, "https://kroki.io");
        assert_eq!(config.build_resolved.source_dir, PathBuf::from("/test/docs"));
    }

    #[test]
    fn test_expand_env_vars_kroki_url() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("KROKIDOC_CONFIG_TEST_HOST", "kroki.example.com");
        }
        let toml = r#"
[kroki]
url = "https://${KROKIDOC_CONFIG_TEST_HOST}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.kroki.url, "https://kroki.example.com");
        unsafe {
            std::env::remove_var("KROKIDOC_CONFIG_TEST_HOST");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("KROKIDOC_CONFIG_TEST_MISSING");
        }
        let toml = r#"
[kroki]
url = "${KROKIDOC_CONFIG_TEST_MISSING}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("kroki.url"));
    }

    #[test]
    fn test_load_explicit_file_resolves_relative_to_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            r#"
[kroki]
url = "http://localhost:8000"

[build]
source_dir = "src"
"#,
        )
        .unwrap();

        let config = Config::load(Some(path.as_path()), None).unwrap();

        assert_eq!(config.kroki.url, "http://localhost:8000");
        assert_eq!(config.build_resolved.source_dir, tmp.path().join("src"));
        assert_eq!(
            config.build_resolved.output_dir,
            tmp.path().join("_build/html")
        );
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nope.toml");

        let err = Config::load(Some(path.as_path()), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_validates_cli_overrides() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();
        let overrides = CliSettings {
            kroki_url: Some("kroki.io".to_owned()),
            ..Default::default()
        };

        let err = Config::load(Some(path.as_path()), Some(&overrides)).unwrap_err();

        assert!(err.to_string().contains("kroki.url"));
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_kroki_url_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.kroki.url = String::new();
        assert_validation_error(&config, &["kroki.url", "empty"]);
    }

    #[test]
    fn test_validate_kroki_url_invalid_scheme() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.kroki.url = "ftp://kroki.io".to_owned();
        assert_validation_error(&config, &["kroki.url", "http://"]);
    }

    #[test]
    fn test_validate_timeout_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.kroki.timeout_secs = 0;
        assert_validation_error(&config, &["kroki.timeout_secs"]);
    }

    #[test]
    fn test_validate_prefix() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.kroki.prefix = String::new();
        assert_validation_error(&config, &["kroki.prefix", "empty"]);

        config.kroki.prefix = "a/b".to_owned();
        assert_validation_error(&config, &["kroki.prefix", "separators"]);
    }

    #[test]
    fn test_validate_image_dir() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.build_resolved.image_dir = String::new();
        assert_validation_error(&config, &["build.image_dir", "empty"]);

        config.build_resolved.image_dir = "../images".to_owned();
        assert_validation_error(&config, &["build.image_dir", "relative"]);

        config.build_resolved.image_dir = "static/images".to_owned();
        assert!(config.validate().is_ok());
    }
}
