//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `CANDOR_*` environment variables. The
//! reference and grounding-fact field names are required: set `CANDOR_FACT_FIELD=none`
//! to run without a grounding field.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::collections::BTreeSet;
use std::env;
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_ALLOWED_GENERATORS, DEFAULT_BERTSCORE_MODEL, DEFAULT_CANDIDATE_PREFIX,
    DEFAULT_FILTER_FIELD, default_layer_for,
};
use crate::embedding::{AlignerConfig, EncoderConfig};
use crate::evaluation::{ColumnSpec, EvalSettings, FilterGate, RerunPolicy, SelectionCriterion};

/// Sentinel accepted by `CANDOR_FACT_FIELD` to disable the grounding field explicitly.
pub const FACT_FIELD_DISABLED: &str = "none";

/// Run configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `CANDOR_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input JSON array. Default: `input.json`.
    pub input_path: PathBuf,

    /// Output JSON array. Default: `output.json`.
    pub output_path: PathBuf,

    /// Prefixes used to discover candidate columns. Default: `generated_text`.
    pub candidate_prefixes: Vec<String>,

    /// Explicit candidate columns; overrides `candidate_prefixes` when set.
    pub candidate_columns: Option<Vec<String>>,

    /// Field holding the reference text.
    pub reference_field: String,

    /// Field holding the grounding fact (`None` disables fact-based sub-scores).
    pub fact_field: Option<String>,

    /// Whether the filter gate is active. Default: `false`.
    pub filter_enabled: bool,

    /// Categorical field consulted by the filter gate. Default: `generator_model`.
    pub filter_field: String,

    /// Values admitted by the filter gate.
    pub filter_allow: Vec<String>,

    /// Encoder identifier used for BERTScore.
    pub bertscore_model: String,

    /// Local directory with the BERTScore encoder (stub encoder when unset).
    pub bertscore_path: Option<PathBuf>,

    /// Hidden layer used for BERTScore token embeddings.
    pub bertscore_layer: Option<usize>,

    /// Local directory with the consistency aligner (stub aligner when unset).
    pub consistency_path: Option<PathBuf>,

    /// Criterion for the best-output marker.
    pub selection: SelectionCriterion,

    /// Behaviour for columns that already carry metrics.
    pub rerun_policy: RerunPolicy,

    /// Records scored concurrently. Default: available parallelism.
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("input.json"),
            output_path: PathBuf::from("output.json"),
            candidate_prefixes: vec![DEFAULT_CANDIDATE_PREFIX.to_string()],
            candidate_columns: None,
            reference_field: String::new(),
            fact_field: None,
            filter_enabled: false,
            filter_field: DEFAULT_FILTER_FIELD.to_string(),
            filter_allow: DEFAULT_ALLOWED_GENERATORS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            bertscore_model: DEFAULT_BERTSCORE_MODEL.to_string(),
            bertscore_path: None,
            bertscore_layer: default_layer_for(DEFAULT_BERTSCORE_MODEL),
            consistency_path: None,
            selection: SelectionCriterion::default(),
            rerun_policy: RerunPolicy::default(),
            workers: default_workers(),
        }
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl Config {
    const ENV_INPUT_PATH: &'static str = "CANDOR_INPUT_PATH";
    const ENV_OUTPUT_PATH: &'static str = "CANDOR_OUTPUT_PATH";
    const ENV_CANDIDATE_PREFIXES: &'static str = "CANDOR_CANDIDATE_PREFIXES";
    const ENV_CANDIDATE_COLUMNS: &'static str = "CANDOR_CANDIDATE_COLUMNS";
    const ENV_REFERENCE_FIELD: &'static str = "CANDOR_REFERENCE_FIELD";
    const ENV_FACT_FIELD: &'static str = "CANDOR_FACT_FIELD";
    const ENV_FILTER_ENABLED: &'static str = "CANDOR_FILTER_ENABLED";
    const ENV_FILTER_FIELD: &'static str = "CANDOR_FILTER_FIELD";
    const ENV_FILTER_ALLOW: &'static str = "CANDOR_FILTER_ALLOW";
    const ENV_BERTSCORE_MODEL: &'static str = "CANDOR_BERTSCORE_MODEL";
    const ENV_BERTSCORE_PATH: &'static str = "CANDOR_BERTSCORE_PATH";
    const ENV_BERTSCORE_LAYER: &'static str = "CANDOR_BERTSCORE_LAYER";
    const ENV_CONSISTENCY_PATH: &'static str = "CANDOR_CONSISTENCY_PATH";
    const ENV_SELECTION: &'static str = "CANDOR_SELECTION";
    const ENV_RERUN_POLICY: &'static str = "CANDOR_RERUN_POLICY";
    const ENV_WORKERS: &'static str = "CANDOR_WORKERS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let input_path = Self::parse_path_from_env(Self::ENV_INPUT_PATH, defaults.input_path);
        let output_path = Self::parse_path_from_env(Self::ENV_OUTPUT_PATH, defaults.output_path);
        let candidate_prefixes = Self::parse_list_from_env(Self::ENV_CANDIDATE_PREFIXES)
            .unwrap_or(defaults.candidate_prefixes);
        let candidate_columns = Self::parse_list_from_env(Self::ENV_CANDIDATE_COLUMNS);

        let reference_field = Self::parse_required_from_env(Self::ENV_REFERENCE_FIELD)?;
        let fact_field = Self::parse_required_from_env(Self::ENV_FACT_FIELD)?;
        let fact_field = if fact_field.eq_ignore_ascii_case(FACT_FIELD_DISABLED) {
            None
        } else {
            Some(fact_field)
        };

        let filter_enabled =
            Self::parse_bool_from_env(Self::ENV_FILTER_ENABLED, defaults.filter_enabled)?;
        let filter_field =
            Self::parse_string_from_env(Self::ENV_FILTER_FIELD, defaults.filter_field);
        let filter_allow =
            Self::parse_list_from_env(Self::ENV_FILTER_ALLOW).unwrap_or(defaults.filter_allow);

        let bertscore_model =
            Self::parse_string_from_env(Self::ENV_BERTSCORE_MODEL, defaults.bertscore_model);
        let bertscore_path = Self::parse_optional_path_from_env(Self::ENV_BERTSCORE_PATH);
        let bertscore_layer = match Self::parse_usize_from_env(Self::ENV_BERTSCORE_LAYER)? {
            Some(layer) => Some(layer),
            None => default_layer_for(&bertscore_model),
        };
        let consistency_path = Self::parse_optional_path_from_env(Self::ENV_CONSISTENCY_PATH);

        let selection = Self::parse_enum_from_env(Self::ENV_SELECTION, defaults.selection)?;
        let rerun_policy = Self::parse_enum_from_env(Self::ENV_RERUN_POLICY, defaults.rerun_policy)?;
        let workers = Self::parse_usize_from_env(Self::ENV_WORKERS)?.unwrap_or(defaults.workers);

        Ok(Self {
            input_path,
            output_path,
            candidate_prefixes,
            candidate_columns,
            reference_field,
            fact_field,
            filter_enabled,
            filter_field,
            filter_allow,
            bertscore_model,
            bertscore_path,
            bertscore_layer,
            consistency_path,
            selection,
            rerun_policy,
            workers,
        })
    }

    /// Validates field names, lists and model paths (does not load anything).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reference_field.trim().is_empty() {
            return Err(ConfigError::EmptyValue {
                name: Self::ENV_REFERENCE_FIELD,
            });
        }

        if let Some(ref fact) = self.fact_field
            && fact.trim().is_empty()
        {
            return Err(ConfigError::EmptyValue {
                name: Self::ENV_FACT_FIELD,
            });
        }

        match self.candidate_columns {
            Some(ref columns) if columns.is_empty() => {
                return Err(ConfigError::EmptyList {
                    name: Self::ENV_CANDIDATE_COLUMNS,
                });
            }
            None if self.candidate_prefixes.is_empty() => {
                return Err(ConfigError::EmptyList {
                    name: Self::ENV_CANDIDATE_PREFIXES,
                });
            }
            _ => {}
        }

        if self.filter_enabled {
            if self.filter_field.trim().is_empty() {
                return Err(ConfigError::EmptyValue {
                    name: Self::ENV_FILTER_FIELD,
                });
            }
            if self.filter_allow.is_empty() {
                return Err(ConfigError::EmptyList {
                    name: Self::ENV_FILTER_ALLOW,
                });
            }
        }

        if self.bertscore_model.trim().is_empty() {
            return Err(ConfigError::EmptyValue {
                name: Self::ENV_BERTSCORE_MODEL,
            });
        }

        if self.bertscore_layer == Some(0) {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_BERTSCORE_LAYER,
                value: "0".to_string(),
                reason: "layer index starts at 1".to_string(),
            });
        }

        if self.workers == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_WORKERS,
                value: "0".to_string(),
                reason: "at least one worker is required".to_string(),
            });
        }

        if self.input_path.exists() && !self.input_path.is_file() {
            return Err(ConfigError::NotAFile {
                path: self.input_path.clone(),
            });
        }

        if let Some(ref path) = self.bertscore_path {
            Self::validate_model_dir(path)?;
        }

        if let Some(ref path) = self.consistency_path {
            Self::validate_model_dir(path)?;
        }

        Ok(())
    }

    /// Candidate-column selection as configured.
    pub fn column_spec(&self) -> ColumnSpec {
        match self.candidate_columns {
            Some(ref columns) => ColumnSpec::Explicit(columns.clone()),
            None => ColumnSpec::Prefixes(self.candidate_prefixes.clone()),
        }
    }

    /// Filter gate, or `None` when the gate is disabled.
    pub fn filter_gate(&self) -> Option<FilterGate> {
        self.filter_enabled.then(|| {
            FilterGate::new(
                self.filter_field.clone(),
                self.filter_allow.iter().cloned().collect::<BTreeSet<_>>(),
            )
        })
    }

    /// Per-record evaluation settings handed to the aggregator.
    pub fn eval_settings(&self) -> EvalSettings {
        EvalSettings {
            column_spec: self.column_spec(),
            reference_field: self.reference_field.clone(),
            fact_field: self.fact_field.clone(),
            gate: self.filter_gate(),
            rerun_policy: self.rerun_policy,
            criterion: self.selection,
        }
    }

    /// BERTScore encoder configuration.
    pub fn encoder_config(&self) -> EncoderConfig {
        EncoderConfig {
            model_id: self.bertscore_model.clone(),
            model_path: self.bertscore_path.clone(),
            layer: self.bertscore_layer,
            ..Default::default()
        }
    }

    /// Consistency aligner configuration.
    pub fn aligner_config(&self) -> AlignerConfig {
        AlignerConfig {
            model_path: self.consistency_path.clone(),
            ..Default::default()
        }
    }

    fn validate_model_dir(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            return Err(ConfigError::PathNotFound {
                path: path.to_path_buf(),
            });
        }
        if !path.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: path.to_path_buf(),
            });
        }
        for file in ["config.json", "model.safetensors", "tokenizer.json"] {
            if !path.join(file).exists() {
                return Err(ConfigError::MissingModelFile {
                    path: path.to_path_buf(),
                    file,
                });
            }
        }
        Ok(())
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        Self::parse_optional_path_from_env(var_name).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    fn parse_required_from_env(var_name: &'static str) -> Result<String, ConfigError> {
        let value = env::var(var_name).map_err(|_| ConfigError::MissingEnvVar { name: var_name })?;
        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(ConfigError::EmptyValue { name: var_name });
        }
        Ok(value)
    }

    fn parse_list_from_env(var_name: &str) -> Option<Vec<String>> {
        let raw = env::var(var_name).ok()?;
        let items: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Some(items)
    }

    fn parse_bool_from_env(var_name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match env::var(var_name) {
            Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::InvalidValue {
                    name: var_name,
                    value,
                    reason: "expected a boolean".to_string(),
                }),
            },
            Err(_) => Ok(default),
        }
    }

    fn parse_usize_from_env(var_name: &'static str) -> Result<Option<usize>, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map(Some)
                .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                    name: var_name,
                    value,
                    reason: e.to_string(),
                }),
            Err(_) => Ok(None),
        }
    }

    fn parse_enum_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr<Err = String>,
    {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|reason| ConfigError::InvalidValue {
                    name: var_name,
                    value,
                    reason,
                }),
            Err(_) => Ok(default),
        }
    }
}
