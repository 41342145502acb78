//! One-vs-rest classification over label columns.
//!
//! Each category column gets its own linear-kernel SVM. Columns that are
//! constant in the training data cannot be separated, so they fall back to a
//! `Constant` predictor that always answers the one observed value; a
//! degenerate category never aborts a training run.

use linfa::prelude::*;
use linfa::Dataset;
use linfa_svm::Svm;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AppError, Result};

/// Per-category SVM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvmConfig {
    /// Regularization strength, applied to both classes
    #[serde(default = "default_c")]
    pub c: f64,
}

impl Default for SvmConfig {
    fn default() -> Self {
        Self { c: default_c() }
    }
}

impl SvmConfig {
    pub fn validate(&self) -> Result<()> {
        if self.c <= 0.0 {
            return Err(AppError::Validation(format!(
                "SVM regularization c must be positive, got {}",
                self.c
            )));
        }
        Ok(())
    }
}

fn default_c() -> f64 {
    1.0
}

/// Classifier for a single category column.
#[derive(Serialize, Deserialize)]
pub enum LabelClassifier {
    /// Separating hyperplane learned from a mixed column
    Svm(Svm<f64, bool>),
    /// Fixed answer for a column that was constant during training
    Constant(bool),
}

/// One classifier per category, in label column order.
#[derive(Serialize, Deserialize)]
pub struct MultiLabelClassifier {
    config: SvmConfig,
    models: Vec<LabelClassifier>,
    category_names: Vec<String>,
    n_features: usize,
    trained: bool,
}

impl MultiLabelClassifier {
    /// Create an untrained classifier with the given configuration
    pub fn new(config: SvmConfig) -> Self {
        Self {
            config,
            models: Vec::new(),
            category_names: Vec::new(),
            n_features: 0,
            trained: false,
        }
    }

    /// Train one classifier per label column.
    ///
    /// `labels` columns and `category_names` must line up; predictions and
    /// reports keep the same order.
    pub fn train(
        &mut self,
        features: &Array2<f64>,
        labels: &Array2<u8>,
        category_names: &[String],
    ) -> Result<()> {
        self.config.validate()?;
        if features.nrows() != labels.nrows() {
            return Err(AppError::DataFormat(format!(
                "{} feature rows for {} label rows",
                features.nrows(),
                labels.nrows()
            )));
        }
        if labels.ncols() != category_names.len() {
            return Err(AppError::DataFormat(format!(
                "{} label columns for {} category names",
                labels.ncols(),
                category_names.len()
            )));
        }
        if features.nrows() == 0 {
            return Err(AppError::DataFormat(
                "cannot train on an empty feature matrix".to_string(),
            ));
        }
        if category_names.is_empty() {
            return Err(AppError::DataFormat(
                "cannot train with zero categories".to_string(),
            ));
        }

        let mut models = Vec::with_capacity(category_names.len());
        for (column, category) in category_names.iter().enumerate() {
            let targets: Array1<bool> = labels.column(column).mapv(|v| v != 0);
            let positives = targets.iter().filter(|&&t| t).count();

            let model = if positives == 0 || positives == targets.len() {
                let value = positives > 0;
                warn!(
                    category = %category,
                    value,
                    "label column is constant in the training data; using a constant predictor"
                );
                LabelClassifier::Constant(value)
            } else {
                let dataset = Dataset::new(features.to_owned(), targets);
                let svm = Svm::<f64, bool>::params()
                    .linear_kernel()
                    .pos_neg_weights(self.config.c, self.config.c)
                    .fit(&dataset)
                    .map_err(|e| {
                        AppError::Training(format!(
                            "SVM training failed for category '{category}': {e}"
                        ))
                    })?;
                LabelClassifier::Svm(svm)
            };
            models.push(model);
        }

        self.models = models;
        self.category_names = category_names.to_vec();
        self.n_features = features.ncols();
        self.trained = true;
        Ok(())
    }

    /// Predict the 0/1 label matrix for a feature matrix.
    pub fn predict(&self, features: &Array2<f64>) -> Result<Array2<u8>> {
        if !self.trained {
            return Err(AppError::Training(
                "classifier must be trained before predicting".to_string(),
            ));
        }
        if features.ncols() != self.n_features {
            return Err(AppError::DataFormat(format!(
                "feature matrix has {} columns, model was trained with {}",
                features.ncols(),
                self.n_features
            )));
        }

        let mut predictions = Array2::zeros((features.nrows(), self.models.len()));
        for (column, model) in self.models.iter().enumerate() {
            match model {
                LabelClassifier::Svm(svm) => {
                    let outputs: Array1<bool> = svm.predict(features);
                    for (row, value) in outputs.iter().enumerate() {
                        predictions[[row, column]] = u8::from(*value);
                    }
                }
                LabelClassifier::Constant(value) => {
                    if *value {
                        predictions.column_mut(column).fill(1);
                    }
                }
            }
        }
        Ok(predictions)
    }

    /// Category names in label column order
    pub fn category_names(&self) -> &[String] {
        &self.category_names
    }

    /// Feature width the model was trained with
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Whether `train` has run
    pub fn is_trained(&self) -> bool {
        self.trained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn separable_features() -> Array2<f64> {
        array![[0.0, 1.0], [0.05, 0.9], [0.95, 0.1], [1.0, 0.0]]
    }

    #[test]
    fn test_train_and_predict_separable_column() {
        let features = separable_features();
        let labels = array![[0u8], [0], [1], [1]];
        let mut classifier = MultiLabelClassifier::new(SvmConfig::default());
        classifier.train(&features, &labels, &names(&["water"])).unwrap();

        let predictions = classifier.predict(&features).unwrap();
        assert_eq!(predictions, labels);
    }

    #[test]
    fn test_constant_columns_use_fallback() {
        let features = separable_features();
        let labels = array![[0u8, 1, 0], [0, 1, 0], [1, 1, 0], [1, 1, 0]];
        let mut classifier = MultiLabelClassifier::new(SvmConfig::default());
        classifier
            .train(&features, &labels, &names(&["water", "related", "missing"]))
            .unwrap();

        let predictions = classifier.predict(&features).unwrap();
        // Constant-true and constant-false columns reproduce their value.
        assert!(predictions.column(1).iter().all(|&v| v == 1));
        assert!(predictions.column(2).iter().all(|&v| v == 0));
        assert_eq!(predictions.column(0), labels.column(0));
    }

    #[test]
    fn test_prediction_width_is_category_count() {
        let features = separable_features();
        let labels = array![[0u8, 0], [0, 1], [1, 0], [1, 1]];
        let mut classifier = MultiLabelClassifier::new(SvmConfig::default());
        classifier.train(&features, &labels, &names(&["water", "food"])).unwrap();

        let single = classifier.predict(&array![[0.0, 1.0]]).unwrap();
        assert_eq!(single.dim(), (1, 2));
    }

    #[test]
    fn test_predict_before_train_is_an_error() {
        let classifier = MultiLabelClassifier::new(SvmConfig::default());
        let err = classifier.predict(&array![[0.0, 1.0]]).unwrap_err();
        assert!(matches!(err, AppError::Training(_)));
    }

    #[test]
    fn test_feature_width_mismatch_rejected() {
        let features = separable_features();
        let labels = array![[0u8], [0], [1], [1]];
        let mut classifier = MultiLabelClassifier::new(SvmConfig::default());
        classifier.train(&features, &labels, &names(&["water"])).unwrap();

        let err = classifier.predict(&array![[0.0]]).unwrap_err();
        assert!(matches!(err, AppError::DataFormat(_)));
    }

    #[test]
    fn test_shape_validation_on_train() {
        let mut classifier = MultiLabelClassifier::new(SvmConfig::default());
        let err = classifier
            .train(
                &separable_features(),
                &array![[0u8], [1]],
                &names(&["water"]),
            )
            .unwrap_err();
        assert!(matches!(err, AppError::DataFormat(_)));

        let err = classifier
            .train(
                &separable_features(),
                &array![[0u8], [0], [1], [1]],
                &names(&["water", "food"]),
            )
            .unwrap_err();
        assert!(matches!(err, AppError::DataFormat(_)));
    }

    #[test]
    fn test_invalid_c_rejected() {
        let mut classifier = MultiLabelClassifier::new(SvmConfig { c: 0.0 });
        let err = classifier
            .train(
                &separable_features(),
                &array![[0u8], [0], [1], [1]],
                &names(&["water"]),
            )
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
