//! Run configuration from an optional TOML file plus flag overrides.
//!
//! ```toml
//! [pipeline]
//! sla_threshold_ms = 1200
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use lims_model::PipelineOptions;
use serde::Deserialize;
use tracing::info;

/// Top-level layout of a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub pipeline: PipelineOptions,
}

impl ConfigFile {
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("parse configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read configuration {}", path.display()))?;
        let config = Self::parse(&contents)
            .with_context(|| format!("in configuration {}", path.display()))?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }
}

/// Resolve options with precedence flag, then file, then default.
pub fn resolve_options(
    config_path: Option<&Path>,
    sla_threshold_ms: Option<u32>,
) -> Result<PipelineOptions> {
    let mut options = match config_path {
        Some(path) => ConfigFile::load(path)?.pipeline,
        None => PipelineOptions::default(),
    };
    if let Some(threshold) = sla_threshold_ms {
        options = options.with_sla_threshold_ms(threshold);
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_file_uses_defaults() {
        let config = ConfigFile::parse("").unwrap();
        assert_eq!(config.pipeline, PipelineOptions::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ConfigFile::parse("[pipline]\nsla_threshold_ms = 1").is_err());
    }

    #[test]
    fn flag_beats_file_beats_default() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[pipeline]\nsla_threshold_ms = 1200").unwrap();

        let from_file = resolve_options(Some(file.path()), None).unwrap();
        assert_eq!(from_file.sla_threshold_ms, 1200);

        let from_flag = resolve_options(Some(file.path()), Some(900)).unwrap();
        assert_eq!(from_flag.sla_threshold_ms, 900);

        let default = resolve_options(None, None).unwrap();
        assert_eq!(
            default.sla_threshold_ms,
            PipelineOptions::DEFAULT_SLA_THRESHOLD_MS
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = resolve_options(Some(Path::new("/nonexistent/lims.toml")), None).unwrap_err();
        assert!(err.to_string().contains("read configuration"));
    }
}
