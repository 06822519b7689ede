/*
 * Configuration File Parser
 *
 * Parse checker configuration from YAML or JSON.
 *
 * # Schema
 * ```yaml
 * include_builtins: true
 * extra_start_signatures:
 *   - '^mypkg\.StartTrace$'
 * transfer_signatures:
 *   - '^pkg\.SpanRegistry\.Adopt$'
 * finalizer: all-paths            # disabled | error-paths-only | all-paths
 * status_setter: error-paths-only
 * error_recorder: disabled
 * err_correlation: named-error-return   # or: disabled
 * ```
 *
 * # Validation
 * - every signature pattern must compile
 * - duplicate starters with conflicting profiles are rejected
 * Any failure is fatal before analysis starts.
 */

use super::built_in::default_config;
use crate::config::{CheckConfig, ErrCorrelation};
use crate::errors::{Result, SpanguardError};
use crate::features::lifecycle::domain::RequirementPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Requirement policy, file form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyConfig {
    Disabled,
    ErrorPathsOnly,
    AllPaths,
}

impl From<PolicyConfig> for RequirementPolicy {
    fn from(value: PolicyConfig) -> Self {
        match value {
            PolicyConfig::Disabled => RequirementPolicy::Disabled,
            PolicyConfig::ErrorPathsOnly => RequirementPolicy::ErrorPathsOnly,
            PolicyConfig::AllPaths => RequirementPolicy::AllPaths,
        }
    }
}

/// Err-correlation mode, file form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorrelationConfig {
    NamedErrorReturn,
    Disabled,
}

/// Checker configuration file schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Start from the built-in starter tables
    #[serde(default = "default_true")]
    pub include_builtins: bool,

    /// User-declared starter signatures (regex over package.Type.method)
    #[serde(default)]
    pub extra_start_signatures: Vec<String>,

    /// Ownership-transfer signatures
    #[serde(default)]
    pub transfer_signatures: Vec<String>,

    /// Policy overrides applied to every starter profile
    #[serde(default)]
    pub finalizer: Option<PolicyConfig>,
    #[serde(default)]
    pub status_setter: Option<PolicyConfig>,
    #[serde(default)]
    pub error_recorder: Option<PolicyConfig>,

    #[serde(default)]
    pub err_correlation: Option<CorrelationConfig>,
}

fn default_true() -> bool {
    true
}

/// Configuration parser
pub struct ConfigParser;

impl ConfigParser {
    /// Parse YAML text into a checker configuration
    pub fn from_yaml(yaml: &str) -> Result<CheckConfig> {
        let file: ConfigFile = serde_yaml::from_str(yaml)
            .map_err(|e| SpanguardError::parse_error(format!("config YAML: {e}")))?;
        Self::build(file)
    }

    /// Parse JSON text into a checker configuration
    pub fn from_json(json: &str) -> Result<CheckConfig> {
        let file: ConfigFile = serde_json::from_str(json)
            .map_err(|e| SpanguardError::parse_error(format!("config JSON: {e}")))?;
        Self::build(file)
    }

    /// Load a configuration file, format chosen by extension
    pub fn from_file(path: &Path) -> Result<CheckConfig> {
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&text),
            Some("yaml") | Some("yml") => Self::from_yaml(&text),
            other => Err(SpanguardError::parse_error(format!(
                "unsupported config extension: {other:?}"
            ))),
        }
    }

    fn build(file: ConfigFile) -> Result<CheckConfig> {
        let mut config = if file.include_builtins {
            default_config()?
        } else {
            CheckConfig::new()
        };

        for pattern in &file.extra_start_signatures {
            config.add_extra_start(pattern)?;
        }
        for pattern in &file.transfer_signatures {
            config.add_transfer(pattern)?;
        }

        for starter in &mut config.starters {
            if let Some(policy) = file.finalizer {
                starter.profile.finalizer = policy.into();
            }
            if let Some(policy) = file.status_setter {
                starter.profile.status_setter = policy.into();
            }
            if let Some(policy) = file.error_recorder {
                starter.profile.error_recorder = policy.into();
            }
        }

        if let Some(mode) = file.err_correlation {
            config.err_correlation = match mode {
                CorrelationConfig::NamedErrorReturn => ErrCorrelation::NamedErrorReturn,
                CorrelationConfig::Disabled => ErrCorrelation::Disabled,
            };
        }

        config.validate()?;
        Ok(config)
    }
}
