//! Configuration for request normalization and the engine adapter.
//!
//! Every behaviour that historically drifted between API revisions is an
//! explicit flag here instead of a separate code path.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Normalization policy flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NormalizeConfig {
    /// Remove `\` characters when splitting delimited list strings.
    #[serde(default = "NormalizeConfig::default_strip_backslashes")]
    pub strip_backslashes: bool,

    /// Sort an explicitly supplied time list ascending.
    #[serde(default)]
    pub sort_explicit_times: bool,

    /// Drop consecutive duplicates from an explicitly supplied time list.
    #[serde(default)]
    pub dedup_explicit_times: bool,

    /// Fraction of one step below which a duration range is considered to
    /// land exactly on `stop` (and so excludes it).
    #[serde(default = "NormalizeConfig::default_step_tolerance")]
    pub step_tolerance: f64,

    /// Upper bound on the number of time points one request may expand to.
    #[serde(default = "NormalizeConfig::default_max_time_points")]
    pub max_time_points: usize,
}

impl NormalizeConfig {
    const fn default_strip_backslashes() -> bool {
        true
    }

    const fn default_step_tolerance() -> f64 {
        1e-9
    }

    const fn default_max_time_points() -> usize {
        1_000_000
    }

    pub fn with_strip_backslashes(mut self, strip: bool) -> Self {
        self.strip_backslashes = strip;
        self
    }

    pub fn with_sort_explicit_times(mut self, sort: bool) -> Self {
        self.sort_explicit_times = sort;
        self
    }

    pub fn with_dedup_explicit_times(mut self, dedup: bool) -> Self {
        self.dedup_explicit_times = dedup;
        self
    }

    pub fn with_step_tolerance(mut self, tolerance: f64) -> Self {
        assert!(
            tolerance.is_finite() && (0.0..1.0).contains(&tolerance),
            "Step tolerance must be in [0, 1)"
        );
        if tolerance > 1e-3 {
            log::warn!(
                "Step tolerance of {} is large; ranges may drop a final point well below stop",
                tolerance
            );
        }
        self.step_tolerance = tolerance;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.step_tolerance.is_finite() || !(0.0..1.0).contains(&self.step_tolerance) {
            return Err(format!(
                "Step tolerance must be in [0, 1), got {}",
                self.step_tolerance
            ));
        }

        if self.max_time_points == 0 {
            return Err("Max time points must be greater than zero".to_string());
        }

        Ok(())
    }

    pub fn with_max_time_points(mut self, max: usize) -> Self {
        assert!(max > 0, "Max time points must be greater than zero");
        self.max_time_points = max;
        self
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            strip_backslashes: Self::default_strip_backslashes(),
            sort_explicit_times: false,
            dedup_explicit_times: false,
            step_tolerance: Self::default_step_tolerance(),
            max_time_points: Self::default_max_time_points(),
        }
    }
}

/// How to reach the external query engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Executable invoked once per query.
    #[serde(default)]
    pub program: Option<PathBuf>,

    /// Extra arguments passed before the request is written to stdin.
    #[serde(default)]
    pub args: Vec<String>,
}

/// Top-level service configuration, usually read from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub normalize: NormalizeConfig,

    #[serde(default)]
    pub engine: EngineConfig,
}

impl Config {
    pub fn with_engine_program<P: Into<PathBuf>>(mut self, program: P) -> Self {
        self.engine.program = Some(program.into());
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        self.normalize.validate()
    }

    #[cfg(feature = "toml")]
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        use serde::de::Error;

        let config: Config = toml::from_str(content)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NormalizeConfig::default();
        assert!(config.strip_backslashes);
        assert!(!config.sort_explicit_times);
        assert!(!config.dedup_explicit_times);
        assert_eq!(config.step_tolerance, 1e-9);
        assert_eq!(config.max_time_points, 1_000_000);
    }

    #[test]
    #[should_panic(expected = "Step tolerance")]
    fn test_tolerance_out_of_range() {
        let _ = NormalizeConfig::default().with_step_tolerance(1.5);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_from_toml() {
        let config = Config::from_toml_str(
            r#"
            [normalize]
            sort_explicit_times = true

            [engine]
            program = "/usr/local/bin/spiceql-query"
            args = ["--json"]
            "#,
        )
        .unwrap();

        assert!(config.normalize.sort_explicit_times);
        assert!(config.normalize.strip_backslashes);
        assert_eq!(
            config.engine.program,
            Some(PathBuf::from("/usr/local/bin/spiceql-query"))
        );
        assert_eq!(config.engine.args, vec!["--json".to_string()]);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_unknown_fields_rejected() {
        assert!(Config::from_toml_str("[normalize]\nsort = true\n").is_err());
    }

    #[test]
    fn test_validate() {
        assert!(NormalizeConfig::default().validate().is_ok());

        let mut config = NormalizeConfig::default();
        config.step_tolerance = 5.0;
        assert!(config.validate().is_err());

        let mut config = NormalizeConfig::default();
        config.max_time_points = 0;
        assert!(config.validate().is_err());
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_out_of_range_values_rejected() {
        assert!(Config::from_toml_str("[normalize]\nstep_tolerance = 5.0\n").is_err());
        assert!(Config::from_toml_str("[normalize]\nmax_time_points = 0\n").is_err());
        assert!(Config::from_toml_str("[normalize]\nstep_tolerance = 1e-6\n").is_ok());
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_from_file_rejects_invalid() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[normalize]\nmax_time_points = 0").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[normalize]\nstrip_backslashes = false").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert!(!config.normalize.strip_backslashes);
        assert_eq!(config.engine, EngineConfig::default());
    }
}
