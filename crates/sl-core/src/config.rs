//! Configuration types and parsing for sluice.yml

use crate::error::{CoreError, CoreResult};
use crate::name_cmp::NameComparison;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable that overrides the configured current database
pub const CURRENT_DATABASE_ENV: &str = "SLUICE_DATABASE";

/// Analyzer configuration from sluice.yml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Compare table, view and routine names case-sensitively
    #[serde(default)]
    pub case_sensitive: bool,

    /// Database used for unqualified references
    #[serde(default)]
    pub current_database: Option<String>,

    /// Upper bound on recursive CTE fixpoint passes.
    ///
    /// When unset, the bound is derived from the CTE's column count and the
    /// height of the masking lattice.
    #[serde(default)]
    pub max_recursive_cte_iterations: Option<usize>,

    /// Wrap non-empty diff scripts in `SET FOREIGN_KEY_CHECKS` pragmas
    #[serde(default = "default_true")]
    pub foreign_key_checks_pragmas: bool,

    /// Settings applied to emitted `CREATE VIEW` statements
    #[serde(default)]
    pub views: ViewDefaults,
}

/// Defaults for the view header clauses when a definition omits them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewDefaults {
    /// `ALGORITHM=` value
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// `DEFINER=` value
    #[serde(default = "default_definer")]
    pub definer: String,

    /// `SQL SECURITY` value
    #[serde(default = "default_security")]
    pub security: String,
}

fn default_true() -> bool {
    true
}

fn default_algorithm() -> String {
    "UNDEFINED".to_string()
}

fn default_definer() -> String {
    "CURRENT_USER".to_string()
}

fn default_security() -> String {
    "DEFINER".to_string()
}

impl Default for ViewDefaults {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            definer: default_definer(),
            security: default_security(),
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            current_database: None,
            max_recursive_cte_iterations: None,
            foreign_key_checks_pragmas: true,
            views: ViewDefaults::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: AnalyzerConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory
    /// Looks for sluice.yml or sluice.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("sluice.yml");
        let yaml_path = dir.join("sluice.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_recursive_cte_iterations == Some(0) {
            return Err(CoreError::ConfigInvalid {
                message: "max_recursive_cte_iterations must be at least 1".to_string(),
            });
        }

        for (key, value) in [
            ("views.algorithm", &self.views.algorithm),
            ("views.definer", &self.views.definer),
            ("views.security", &self.views.security),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("{} cannot be empty", key),
                });
            }
        }

        Ok(())
    }

    /// Name comparison strategy implied by `case_sensitive`
    pub fn name_comparison(&self) -> NameComparison {
        NameComparison::from_case_sensitive(self.case_sensitive)
    }

    /// Resolve the current database
    ///
    /// Priority: explicit argument > SLUICE_DATABASE env var > config value
    pub fn resolve_current_database(&self, explicit: Option<&str>) -> Option<String> {
        explicit
            .map(String::from)
            .or_else(|| std::env::var(CURRENT_DATABASE_ENV).ok())
            .or_else(|| self.current_database.clone())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
