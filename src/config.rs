// Configuration loading and parsing (config/screener.toml).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    #[serde(default)]
    pub documents: DocumentsConfig,
}

/// The `[backend]` table: where the evaluation service lives and how the
/// client talks to it.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the evaluation backend, e.g. `http://localhost:8000`.
    pub base_url: String,
    /// Job title sent with every evaluation request.
    #[serde(default = "default_job_title")]
    pub job_title: String,
    /// Delay between consecutive job status queries.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Per-request timeout for upload/evaluate/status calls.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// The `[documents]` table: optional pre-selected document paths. Paths can
/// also be entered (or changed) interactively in the TUI.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentsConfig {
    #[serde(default)]
    pub cv: Option<PathBuf>,
    #[serde(default)]
    pub project_report: Option<PathBuf>,
}

fn default_job_title() -> String {
    "Backend AI Developer".to_string()
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl BackendConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

const CONFIG_FILE: &str = "screener.toml";

/// Load and validate configuration from `config/screener.toml` relative to
/// the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy
/// defaults. Prefer `load_config()` which handles default initialization
/// automatically.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
        path: path.clone(),
    })?;
    parse_config(&text, &path)
}

fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Ensure `config/screener.toml` exists by copying it from `defaults/` on
/// first run. Returns the paths that were copied (empty when nothing was
/// missing). An existing config file is never overwritten.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let default_path = base_dir.join("defaults").join(CONFIG_FILE);
    let config_dir = base_dir.join("config");
    let target = config_dir.join(CONFIG_FILE);

    if target.exists() {
        return Ok(vec![]);
    }
    if !default_path.exists() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "neither {} nor {} found; run from the project root or create the config file",
                target.display(),
                default_path.display()
            ),
        });
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;
    std::fs::copy(&default_path, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {}: {e}", default_path.display()),
    })?;

    Ok(vec![target])
}

/// Convenience wrapper: loads config relative to the current working
/// directory. Ensures the default config file is copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let backend = &config.backend;

    if backend.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "backend.base_url".into(),
            message: "must not be empty".into(),
        });
    }
    if !backend.base_url.starts_with("http://") && !backend.base_url.starts_with("https://") {
        return Err(ConfigError::ValidationError {
            field: "backend.base_url".into(),
            message: format!("must start with http:// or https://, got `{}`", backend.base_url),
        });
    }

    if backend.job_title.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "backend.job_title".into(),
            message: "must not be empty".into(),
        });
    }

    if backend.poll_interval_ms == 0 {
        return Err(ConfigError::ValidationError {
            field: "backend.poll_interval_ms".into(),
            message: "must be greater than 0".into(),
        });
    }

    if backend.request_timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "backend.request_timeout_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Config, ConfigError> {
        parse_config(text, Path::new("screener.toml"))
    }

    #[test]
    fn full_config_parses() {
        let config = parse(
            r#"
            [backend]
            base_url = "http://localhost:8000"
            job_title = "Backend AI Developer"
            poll_interval_ms = 2000
            request_timeout_secs = 30

            [documents]
            cv = "documents/cv.pdf"
            project_report = "documents/report.pdf"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.base_url, "http://localhost:8000");
        assert_eq!(config.backend.job_title, "Backend AI Developer");
        assert_eq!(config.backend.poll_interval(), Duration::from_millis(2000));
        assert_eq!(config.backend.request_timeout(), Duration::from_secs(30));
        assert_eq!(
            config.documents.cv.as_deref(),
            Some(Path::new("documents/cv.pdf"))
        );
        assert_eq!(
            config.documents.project_report.as_deref(),
            Some(Path::new("documents/report.pdf"))
        );
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = parse(
            r#"
            [backend]
            base_url = "http://localhost:8000"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.job_title, "Backend AI Developer");
        assert_eq!(config.backend.poll_interval_ms, 2000);
        assert_eq!(config.backend.request_timeout_secs, 30);
        assert!(config.documents.cv.is_none());
        assert!(config.documents.project_report.is_none());
    }

    #[test]
    fn empty_base_url_fails_validation() {
        let err = parse(
            r#"
            [backend]
            base_url = ""
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ValidationError { ref field, .. } if field == "backend.base_url"
        ));
    }

    #[test]
    fn non_http_base_url_fails_validation() {
        let err = parse(
            r#"
            [backend]
            base_url = "localhost:8000"
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ValidationError { ref field, .. } if field == "backend.base_url"
        ));
    }

    #[test]
    fn zero_poll_interval_fails_validation() {
        let err = parse(
            r#"
            [backend]
            base_url = "http://localhost:8000"
            poll_interval_ms = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ValidationError { ref field, .. } if field == "backend.poll_interval_ms"
        ));
    }

    #[test]
    fn empty_job_title_fails_validation() {
        let err = parse(
            r#"
            [backend]
            base_url = "http://localhost:8000"
            job_title = "  "
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ValidationError { ref field, .. } if field == "backend.job_title"
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = parse("[backend").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    // -- defaults copy --

    fn temp_base_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "screener-config-{}-{}",
            tag,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn ensure_copies_default_file_once() {
        let base = temp_base_dir("copy");
        std::fs::create_dir_all(base.join("defaults")).unwrap();
        std::fs::write(
            base.join("defaults").join(CONFIG_FILE),
            "[backend]\nbase_url = \"http://localhost:8000\"\n",
        )
        .unwrap();

        let copied = ensure_config_files(&base).unwrap();
        assert_eq!(copied.len(), 1);

        // Second call finds the file in place and copies nothing.
        let copied_again = ensure_config_files(&base).unwrap();
        assert!(copied_again.is_empty());

        let config = load_config_from(&base).unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:8000");

        let _ = std::fs::remove_dir_all(&base);
    }

    #[test]
    fn ensure_does_not_overwrite_existing_config() {
        let base = temp_base_dir("keep");
        std::fs::create_dir_all(base.join("defaults")).unwrap();
        std::fs::create_dir_all(base.join("config")).unwrap();
        std::fs::write(
            base.join("defaults").join(CONFIG_FILE),
            "[backend]\nbase_url = \"http://defaults:1\"\n",
        )
        .unwrap();
        std::fs::write(
            base.join("config").join(CONFIG_FILE),
            "[backend]\nbase_url = \"http://mine:2\"\n",
        )
        .unwrap();

        let copied = ensure_config_files(&base).unwrap();
        assert!(copied.is_empty());

        let config = load_config_from(&base).unwrap();
        assert_eq!(config.backend.base_url, "http://mine:2");

        let _ = std::fs::remove_dir_all(&base);
    }

    #[test]
    fn missing_defaults_and_config_is_an_error() {
        let base = temp_base_dir("missing");
        let err = ensure_config_files(&base).unwrap_err();
        assert!(matches!(err, ConfigError::DefaultsCopyError { .. }));
        let _ = std::fs::remove_dir_all(&base);
    }
}
