use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::features::VectorizerConfig;
use crate::ml::SvmConfig;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Training data location within the messages database
    pub data: DataConfig,

    /// Train/test split configuration
    pub split: SplitConfig,

    /// Feature extraction configuration
    #[serde(default)]
    pub vectorizer: VectorizerConfig,

    /// Per-category SVM configuration
    #[serde(default)]
    pub classifier: SvmConfig,

    /// Hyperparameter search configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Evaluation report destination
    pub report: ReportConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("TRIAGE_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: TRIAGE__)
            .add_source(
                config::Environment::with_prefix("TRIAGE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Table holding the labeled messages
    #[serde(default = "default_messages_table")]
    pub messages_table: String,

    /// Column with the raw message text
    #[serde(default = "default_text_column")]
    pub text_column: String,

    /// Every column at this index or later (in table order) is a category
    #[serde(default = "default_label_offset")]
    pub label_offset: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            messages_table: default_messages_table(),
            text_column: default_text_column(),
            label_offset: default_label_offset(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Fraction of rows held out for evaluation
    #[serde(default = "default_test_ratio")]
    pub test_ratio: f64,

    /// Shuffle seed, so repeated runs train on the same partition
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_ratio: default_test_ratio(),
            seed: default_seed(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Vocabulary caps to try; 0 means no cap
    #[serde(default = "default_max_features_grid")]
    pub max_features_grid: Vec<usize>,

    /// Cross-validation folds per candidate
    #[serde(default = "default_cv_folds")]
    pub cv_folds: usize,

    /// Shuffle seed for fold assignment
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_features_grid: default_max_features_grid(),
            cv_folds: default_cv_folds(),
            seed: default_seed(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Database file the evaluation report is written into
    #[serde(default = "default_report_database")]
    pub database: PathBuf,

    /// Report table name, replaced wholesale on every run
    #[serde(default = "default_report_table")]
    pub table: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            database: default_report_database(),
            table: default_report_table(),
        }
    }
}

// Default value functions
fn default_messages_table() -> String {
    "labeled_messages".to_string()
}

fn default_text_column() -> String {
    "message".to_string()
}

fn default_label_offset() -> usize {
    4
}

fn default_test_ratio() -> f64 {
    0.2
}

fn default_seed() -> u64 {
    42
}

fn default_max_features_grid() -> Vec<usize> {
    vec![0, 10_000]
}

fn default_cv_folds() -> usize {
    5
}

fn default_report_database() -> PathBuf {
    PathBuf::from("data/DisasterResponse.db")
}

fn default_report_table() -> String {
    "model_report".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        assert_eq!(default_label_offset(), 4);
        assert_eq!(default_test_ratio(), 0.2);
        assert_eq!(default_cv_folds(), 5);
        assert_eq!(default_max_features_grid(), vec![0, 10_000]);
        assert_eq!(default_report_table(), "model_report");
    }

    #[test]
    fn test_embedded_defaults_parse() {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .build()
            .and_then(|c| c.try_deserialize())
            .unwrap();

        assert_eq!(config.data.messages_table, "labeled_messages");
        assert_eq!(config.data.text_column, "message");
        assert_eq!(config.split.seed, 42);
        assert_eq!(config.vectorizer.ngram_max, 2);
        assert_eq!(config.search.max_features_grid, vec![0, 10_000]);
    }
}
