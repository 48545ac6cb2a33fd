//! TOML-based scenario configuration and preset definitions.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::twin::builder::DEFAULT_FEEDER_COUNT;
use crate::twin::policy::{EquityPolicy, PolicyKind};
use crate::twin::types::SimConfig;
use crate::twin::vulnerability::VulnerabilityGroup;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Step size, step budget and policy selection.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Synthetic network layout.
    #[serde(default)]
    pub network: NetworkConfig,
    /// Group weights for the equity policy.
    #[serde(default)]
    pub equity: EquityConfig,
}

/// Step size, step budget and policy selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Length of one step in days (must be > 0).
    pub dt_days: f64,
    /// Maximum number of steps (must be > 0).
    pub max_steps: usize,
    /// Recovery policy: `"baseline"` or `"equity"`.
    pub policy: PolicyKind,
    /// Stop as soon as every asset is repaired and every building has power.
    pub stop_when_restored: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt_days: 1.0,
            max_steps: 30,
            policy: PolicyKind::Baseline,
            stop_when_restored: false,
        }
    }
}

/// Synthetic network layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    /// Requested number of feeders (must be > 0). Fewer are created when
    /// there are fewer buildings.
    pub feeder_count: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            feeder_count: DEFAULT_FEEDER_COUNT,
        }
    }
}

/// Per-group weights for the equity policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EquityConfig {
    pub residential: f64,
    pub commercial: f64,
    pub critical: f64,
    pub unknown: f64,
}

impl Default for EquityConfig {
    fn default() -> Self {
        Self {
            residential: 1.5,
            commercial: 1.0,
            critical: 2.0,
            unknown: 1.0,
        }
    }
}

impl EquityConfig {
    /// Weights keyed by vulnerability group.
    pub fn weights(&self) -> BTreeMap<VulnerabilityGroup, f64> {
        BTreeMap::from([
            (VulnerabilityGroup::Residential, self.residential),
            (VulnerabilityGroup::Commercial, self.commercial),
            (VulnerabilityGroup::Critical, self.critical),
            (VulnerabilityGroup::Unknown, self.unknown),
        ])
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.dt_days"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: fixed-priority repairs, one-day steps.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            network: NetworkConfig::default(),
            equity: EquityConfig::default(),
        }
    }

    /// Returns the equity preset: default weights, equity-weighted repairs.
    pub fn equity() -> Self {
        Self {
            simulation: SimulationConfig {
                policy: PolicyKind::Equity,
                ..SimulationConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns the critical-first preset: equity repairs with critical
    /// facilities weighted far above everything else, half-day steps.
    pub fn critical_first() -> Self {
        Self {
            simulation: SimulationConfig {
                dt_days: 0.5,
                max_steps: 60,
                policy: PolicyKind::Equity,
                stop_when_restored: true,
            },
            network: NetworkConfig { feeder_count: 8 },
            equity: EquityConfig {
                residential: 1.0,
                commercial: 0.5,
                critical: 5.0,
                unknown: 0.5,
            },
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "equity", "critical_first"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "equity" => Ok(Self::equity()),
            "critical_first" => Ok(Self::critical_first()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if !(s.dt_days.is_finite() && s.dt_days > 0.0) {
            errors.push(ConfigError {
                field: "simulation.dt_days".into(),
                message: "must be a finite number > 0".into(),
            });
        }
        if s.max_steps == 0 {
            errors.push(ConfigError {
                field: "simulation.max_steps".into(),
                message: "must be > 0".into(),
            });
        }
        if self.network.feeder_count == 0 {
            errors.push(ConfigError {
                field: "network.feeder_count".into(),
                message: "must be > 0".into(),
            });
        }

        let eq = &self.equity;
        for (name, w) in [
            ("residential", eq.residential),
            ("commercial", eq.commercial),
            ("critical", eq.critical),
            ("unknown", eq.unknown),
        ] {
            if !(w.is_finite() && w >= 0.0) {
                errors.push(ConfigError {
                    field: format!("equity.{name}"),
                    message: "must be a finite number >= 0".into(),
                });
            }
        }

        errors
    }

    /// Engine step parameters. Call only on a validated config.
    pub fn sim_config(&self) -> SimConfig {
        SimConfig::new(self.simulation.dt_days, self.simulation.max_steps)
    }

    /// Equity policy carrying the configured weights.
    pub fn equity_policy(&self) -> EquityPolicy {
        EquityPolicy::new(self.equity.weights())
    }
}
