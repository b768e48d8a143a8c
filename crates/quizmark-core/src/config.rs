//! quizmark configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level quizmark configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizmarkConfig {
    /// Replaces each quiz's own passing grade unless one is given on the
    /// command line.
    #[serde(default)]
    pub default_passing_grade: Option<f64>,
    /// Where attempt reports and submissions are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Output format for `grade`: text, json or markdown.
    #[serde(default = "default_format")]
    pub default_format: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./quizmark-results")
}

fn default_format() -> String {
    "text".to_string()
}

impl Default for QuizmarkConfig {
    fn default() -> Self {
        Self {
            default_passing_grade: None,
            output_dir: default_output_dir(),
            default_format: default_format(),
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order when no path is given:
/// 1. `quizmark.toml` in the current directory
/// 2. `~/.config/quizmark/config.toml`
///
/// Environment variable overrides: `QUIZMARK_PASSING_GRADE`, `QUIZMARK_OUTPUT_DIR`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizmarkConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizmark.toml");
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
            tracing::debug!("loaded config from {}", path.display());
            toml::from_str::<QuizmarkConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizmarkConfig::default(),
    };

    apply_env_overrides(
        &mut config,
        std::env::var("QUIZMARK_PASSING_GRADE").ok(),
        std::env::var("QUIZMARK_OUTPUT_DIR").ok(),
    )?;

    Ok(config)
}

fn apply_env_overrides(
    config: &mut QuizmarkConfig,
    passing_grade: Option<String>,
    output_dir: Option<String>,
) -> Result<()> {
    if let Some(grade) = passing_grade {
        let grade: f64 = grade
            .trim()
            .parse()
            .with_context(|| format!("invalid QUIZMARK_PASSING_GRADE: '{grade}'"))?;
        config.default_passing_grade = Some(grade);
    }
    if let Some(dir) = output_dir {
        config.output_dir = PathBuf::from(dir);
    }
    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizmark"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = QuizmarkConfig::default();
        assert_eq!(config.default_passing_grade, None);
        assert_eq!(config.default_format, "text");
        assert_eq!(config.output_dir, PathBuf::from("./quizmark-results"));
    }

    #[test]
    fn parse_config_file() {
        let toml_str = r#"
default_passing_grade = 65
output_dir = "results"
default_format = "markdown"
"#;
        let config: QuizmarkConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.default_passing_grade, Some(65.0));
        assert_eq!(config.output_dir, PathBuf::from("results"));
        assert_eq!(config.default_format, "markdown");
    }

    #[test]
    fn load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizmark.toml");
        std::fs::write(&path, "default_format = \"json\"\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.default_format, "json");
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let err = load_config_from(Some(Path::new("/no/such/quizmark.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn env_overrides() {
        let mut config = QuizmarkConfig::default();
        apply_env_overrides(&mut config, Some(" 80 ".into()), Some("/tmp/out".into())).unwrap();
        assert_eq!(config.default_passing_grade, Some(80.0));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));

        let err = apply_env_overrides(&mut config, Some("high".into()), None).unwrap_err();
        assert!(err.to_string().contains("QUIZMARK_PASSING_GRADE"));
    }
}
