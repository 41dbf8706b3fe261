use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_CACHE_CAPACITY: usize = 8192;

/// Tunables for graph construction, heuristic evaluation and search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub graph: GraphSettings,
    pub heuristic: HeuristicSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    /// At most one non-persistence action per level.
    pub serial: bool,
    /// Cap on the number of expansions; `None` uses `2N + 1` for `N` fluents.
    pub max_levels: Option<usize>,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self { serial: true, max_levels: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicSettings {
    pub cache_capacity: usize,
}

impl Default for HeuristicSettings {
    fn default() -> Self {
        Self { cache_capacity: DEFAULT_CACHE_CAPACITY }
    }
}

impl Settings {
    /// Defaults, overlaid by the optional TOML file, overlaid by
    /// `GRAPHPLAN_<SECTION>__<KEY>` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let builder = builder.add_source(
            Environment::with_prefix("GRAPHPLAN")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        tracing::debug!(?settings, "settings loaded");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.heuristic.cache_capacity == 0 {
            let message = "heuristic.cache_capacity must be positive";
            return Err(Error::InvalidSettings(message.to_owned()));
        }
        if self.graph.max_levels == Some(0) {
            return Err(Error::InvalidSettings("graph.max_levels must be positive".to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn settings_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".toml").tempfile().expect("Unable to create temporary file");
        write!(file.as_file_mut(), "{}", contents).expect("Unable to write to tempfile");
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.graph.serial);
        assert_eq!(settings.graph.max_levels, None);
        assert_eq!(settings.heuristic.cache_capacity, 8192);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_file() {
        let file = settings_file("[graph]\nserial = false\nmax_levels = 12\n\n[heuristic]\ncache_capacity = 64\n");
        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings, Settings {
            graph: GraphSettings { serial: false, max_levels: Some(12) },
            heuristic: HeuristicSettings { cache_capacity: 64 },
        });
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = settings_file("[graph]\nserial = false\n");
        let settings = Settings::load(Some(file.path())).unwrap();
        assert!(!settings.graph.serial);
        assert_eq!(settings.graph.max_levels, None);
        assert_eq!(settings.heuristic, HeuristicSettings::default());
    }

    #[test]
    fn test_invalid_capacity() {
        let file = settings_file("[heuristic]\ncache_capacity = 0\n");
        match Settings::load(Some(file.path())) {
            Err(Error::InvalidSettings(message)) => assert!(message.contains("cache_capacity")),
            other => panic!("Expected InvalidSettings, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let result = Settings::load(Some(Path::new("/nonexistent/graphplan.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_levels_rejected() {
        let settings = Settings { graph: GraphSettings { max_levels: Some(0), ..GraphSettings::default() }, ..Settings::default() };
        assert!(matches!(settings.validate(), Err(Error::InvalidSettings(_))));
    }
}
