//! CLI configuration, loaded from an optional TOML file.

use anyhow::Context;
use iris_image::Interpolation;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Tool defaults, overridable through a TOML file named on the command
/// line (`--config`) or by the `IRIS_CONFIG` environment variable.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Resampling filter for resize operations: "nearest" or "bilinear".
    pub interpolation: String,
    /// Border color for pad, per channel in BGR order.
    pub border_color: Vec<f64>,
    /// Directory where `show` snapshots land (default: system temp dir).
    pub show_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interpolation: "bilinear".to_string(),
            border_color: vec![0.0, 0.0, 0.0],
            show_dir: None,
        }
    }
}

impl Config {
    /// Load from `path`, else from `IRIS_CONFIG`, else defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("IRIS_CONFIG").ok().map(PathBuf::from));
        match path {
            Some(p) => {
                let text = std::fs::read_to_string(&p)
                    .with_context(|| format!("reading config {}", p.display()))?;
                toml::from_str(&text).with_context(|| format!("parsing config {}", p.display()))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn interpolation(&self) -> anyhow::Result<Interpolation> {
        match self.interpolation.as_str() {
            "nearest" => Ok(Interpolation::Nearest),
            "bilinear" => Ok(Interpolation::Bilinear),
            other => anyhow::bail!("unknown interpolation {other:?} (nearest|bilinear)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.interpolation().unwrap(), Interpolation::Bilinear);
        assert_eq!(cfg.border_color, vec![0.0, 0.0, 0.0]);
        assert!(cfg.show_dir.is_none());
    }

    #[test]
    fn test_parse_toml() {
        let cfg: Config = toml::from_str(
            r#"
            interpolation = "nearest"
            border_color = [255.0, 0.0, 0.0]
            show_dir = "/tmp/iris"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.interpolation().unwrap(), Interpolation::Nearest);
        assert_eq!(cfg.border_color, vec![255.0, 0.0, 0.0]);
        assert_eq!(cfg.show_dir, Some(PathBuf::from("/tmp/iris")));
    }

    #[test]
    fn test_unknown_interpolation_rejected() {
        let cfg = Config {
            interpolation: "lanczos".into(),
            ..Config::default()
        };
        assert!(cfg.interpolation().is_err());
    }
}
