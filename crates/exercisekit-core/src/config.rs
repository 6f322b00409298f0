//! exercisekit configuration.
//!
//! Deployment-level choices that are resolved once at startup: the
//! environment flag that gates the debug overlay, the canvas backend used
//! by the coverage heuristic, the authoring debounce delay, and the puzzle
//! board geometry.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    #[default]
    Development,
    Test,
}

impl Environment {
    /// The debug overlay is shown everywhere except production.
    pub fn shows_debug(&self) -> bool {
        *self != Environment::Production
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

/// Which coverage heuristic canvas exercises use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanvasBackend {
    /// Rasterize strokes onto a coarse grid and compare cells.
    #[default]
    Raster,
    /// Measure distances between guide samples and stroke segments.
    Vector,
}

impl fmt::Display for CanvasBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanvasBackend::Raster => write!(f, "raster"),
            CanvasBackend::Vector => write!(f, "vector"),
        }
    }
}

impl FromStr for CanvasBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "raster" => Ok(CanvasBackend::Raster),
            "vector" => Ok(CanvasBackend::Vector),
            other => Err(format!("unknown canvas backend: {other}")),
        }
    }
}

/// Puzzle board geometry, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleBoard {
    pub board_width: f64,
    pub board_height: f64,
    /// A dropped piece snaps home when both offsets are below this.
    pub snap_tolerance: f64,
}

impl Default for PuzzleBoard {
    fn default() -> Self {
        Self {
            board_width: 400.0,
            board_height: 400.0,
            snap_tolerance: 20.0,
        }
    }
}

/// Settings for the tracing coverage heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingSettings {
    /// Raster cell edge, in canvas pixels.
    pub cell_size: u32,
}

impl Default for TracingSettings {
    fn default() -> Self {
        Self { cell_size: 4 }
    }
}

/// Top-level exercisekit configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseConfig {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub canvas_backend: CanvasBackend,
    /// Authoring forms wait this long after the last keystroke before emitting.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Fixed seed for shuffles and puzzle scatter; random when absent.
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
    #[serde(default)]
    pub puzzle: PuzzleBoard,
    #[serde(default)]
    pub tracing: TracingSettings,
}

fn default_debounce_ms() -> u64 {
    500
}

impl Default for ExerciseConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            canvas_backend: CanvasBackend::default(),
            debounce_ms: default_debounce_ms(),
            shuffle_seed: None,
            puzzle: PuzzleBoard::default(),
            tracing: TracingSettings::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Expand `${VAR}` references in every string value of a TOML document.
fn resolve_toml_env_vars(value: &mut toml::Value) {
    match value {
        toml::Value::String(s) => *s = resolve_env_vars(s),
        toml::Value::Array(items) => items.iter_mut().for_each(resolve_toml_env_vars),
        toml::Value::Table(table) => table.iter_mut().for_each(|(_, v)| resolve_toml_env_vars(v)),
        _ => {}
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `exercisekit.toml` in the current directory
/// 2. `~/.config/exercisekit/config.toml`
///
/// Environment variable overrides: `EXERCISEKIT_ENV`, `EXERCISEKIT_CANVAS_BACKEND`.
pub fn load_config() -> Result<ExerciseConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ExerciseConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("exercisekit.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ExerciseConfig::default(),
    };

    apply_env_overrides(&mut config)?;
    tracing::debug!(
        environment = %config.environment,
        canvas_backend = %config.canvas_backend,
        "configuration loaded"
    );
    Ok(config)
}

/// Parse a TOML string, expanding `${VAR}` references first.
pub fn parse_config_str(content: &str) -> Result<ExerciseConfig> {
    let mut document: toml::Value = toml::from_str(content)?;
    resolve_toml_env_vars(&mut document);
    let config: ExerciseConfig = document.try_into()?;
    Ok(config)
}

fn apply_env_overrides(config: &mut ExerciseConfig) -> Result<()> {
    if let Ok(env) = std::env::var("EXERCISEKIT_ENV") {
        config.environment = env
            .parse()
            .map_err(|e: String| anyhow::anyhow!("EXERCISEKIT_ENV: {e}"))?;
    }
    if let Ok(backend) = std::env::var("EXERCISEKIT_CANVAS_BACKEND") {
        config.canvas_backend = backend
            .parse()
            .map_err(|e: String| anyhow::anyhow!("EXERCISEKIT_CANVAS_BACKEND: {e}"))?;
    }
    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("exercisekit"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_EXERCISEKIT_TEST_VAR", "vector");
        assert_eq!(resolve_env_vars("${_EXERCISEKIT_TEST_VAR}"), "vector");
        assert_eq!(
            resolve_env_vars("a_${_EXERCISEKIT_TEST_VAR}_b"),
            "a_vector_b"
        );
        std::env::remove_var("_EXERCISEKIT_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_expand_substituted_values() {
        std::env::set_var("_EXERCISEKIT_SELF_VAR", "x${_EXERCISEKIT_SELF_VAR}");
        assert_eq!(
            resolve_env_vars("${_EXERCISEKIT_SELF_VAR}/${_EXERCISEKIT_SELF_VAR}"),
            "x${_EXERCISEKIT_SELF_VAR}/x${_EXERCISEKIT_SELF_VAR}"
        );
        assert_eq!(resolve_env_vars("open ${ended"), "open ${ended");
        std::env::remove_var("_EXERCISEKIT_SELF_VAR");
    }

    #[test]
    fn default_config() {
        let config = ExerciseConfig::default();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.canvas_backend, CanvasBackend::Raster);
        assert_eq!(config.debounce_ms, 500);
        assert_eq!(config.puzzle.snap_tolerance, 20.0);
        assert!(config.shuffle_seed.is_none());
    }

    #[test]
    fn parse_full_config() {
        let config = parse_config_str(
            r#"
environment = "production"
canvas_backend = "vector"
debounce_ms = 300
shuffle_seed = 7

[puzzle]
board_width = 600.0
snap_tolerance = 10.0

[tracing]
cell_size = 8
"#,
        )
        .unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert!(!config.environment.shows_debug());
        assert_eq!(config.canvas_backend, CanvasBackend::Vector);
        assert_eq!(config.debounce_ms, 300);
        assert_eq!(config.shuffle_seed, Some(7));
        assert_eq!(config.puzzle.board_width, 600.0);
        assert_eq!(config.puzzle.board_height, 400.0);
        assert_eq!(config.tracing.cell_size, 8);
    }

    #[test]
    fn parse_expands_env_references() {
        std::env::set_var("_EXERCISEKIT_TEST_BACKEND", "vector");
        let config = parse_config_str(r#"canvas_backend = "${_EXERCISEKIT_TEST_BACKEND}""#).unwrap();
        assert_eq!(config.canvas_backend, CanvasBackend::Vector);
        std::env::remove_var("_EXERCISEKIT_TEST_BACKEND");
    }

    #[test]
    fn load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exercisekit.toml");
        std::fs::write(&path, "environment = \"test\"\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.environment.to_string(), "test");
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let result = load_config_from(Some(Path::new("/nonexistent/exercisekit.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn environment_parse() {
        assert_eq!("PROD".parse::<Environment>().unwrap(), Environment::Production);
        assert!("staging".parse::<Environment>().is_err());
        assert_eq!("Raster".parse::<CanvasBackend>().unwrap(), CanvasBackend::Raster);
    }
}
