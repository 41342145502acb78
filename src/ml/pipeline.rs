//! End-to-end message classification pipeline.
//!
//! `TrainedPipeline` is the unit that gets saved to disk: the fitted
//! vectorizer, the per-category classifiers and the training metadata
//! travel together, so the prediction CLI can load one file and classify.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::features::{TextVectorizer, VectorizerConfig};
use crate::ml::classifier::{MultiLabelClassifier, SvmConfig};

/// Training provenance stored with the model artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineMetadata {
    pub trained_at: DateTime<Utc>,
    pub n_training_samples: usize,
    pub n_features: usize,
    pub n_categories: usize,
    pub hyperparameters: HashMap<String, String>,
}

/// Fitted vectorizer, classifiers and metadata.
#[derive(Serialize, Deserialize)]
pub struct TrainedPipeline {
    vectorizer: TextVectorizer,
    classifier: MultiLabelClassifier,
    metadata: PipelineMetadata,
}

impl TrainedPipeline {
    /// Fit the vectorizer and one classifier per category on a training set.
    pub fn fit(
        texts: &[String],
        labels: &Array2<u8>,
        category_names: &[String],
        vectorizer_config: VectorizerConfig,
        svm_config: SvmConfig,
    ) -> Result<Self> {
        let mut vectorizer = TextVectorizer::new(vectorizer_config);
        let features = vectorizer.fit_transform(texts)?;

        let mut classifier = MultiLabelClassifier::new(svm_config.clone());
        classifier.train(&features, labels, category_names)?;

        let config = vectorizer.config();
        let hyperparameters = HashMap::from([
            (
                "ngram_range".to_string(),
                format!("{}..={}", config.ngram_min, config.ngram_max),
            ),
            ("max_df".to_string(), config.max_df.to_string()),
            (
                "max_features".to_string(),
                config
                    .max_features
                    .map_or_else(|| "none".to_string(), |k| k.to_string()),
            ),
            ("svm_c".to_string(), svm_config.c.to_string()),
        ]);

        let metadata = PipelineMetadata {
            trained_at: Utc::now(),
            n_training_samples: texts.len(),
            n_features: vectorizer.vocabulary_size(),
            n_categories: category_names.len(),
            hyperparameters,
        };

        Ok(Self {
            vectorizer,
            classifier,
            metadata,
        })
    }

    /// Predict the 0/1 label matrix for a batch of messages.
    pub fn predict_texts(&self, texts: &[String]) -> Result<Array2<u8>> {
        let features = self.vectorizer.transform(texts)?;
        self.classifier.predict(&features)
    }

    /// Predict the label vector for one message, in category order.
    ///
    /// The returned vector always has one entry per category the pipeline
    /// was trained on.
    pub fn predict_one(&self, text: &str) -> Result<Vec<u8>> {
        let matrix = self.predict_texts(&[text.to_string()])?;
        Ok(matrix.row(0).to_vec())
    }

    /// Category names in label column order
    pub fn category_names(&self) -> &[String] {
        self.classifier.category_names()
    }

    /// Training provenance
    pub fn metadata(&self) -> &PipelineMetadata {
        &self.metadata
    }

    /// Write the pipeline to a binary file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, self)?;
        Ok(())
    }

    /// Load a pipeline written by [`save`](Self::save).
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AppError::NotFound(format!(
                "model file {}",
                path.display()
            )));
        }
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let pipeline = bincode::deserialize_from(reader)?;
        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn training_corpus() -> (Vec<String>, Array2<u8>, Vec<String>) {
        let texts = [
            "need clean water",
            "water supply low",
            "send drinking water",
            "food packages required",
            "people need food",
            "food aid requested",
        ]
        .iter()
        .map(|t| t.to_string())
        .collect();
        let labels = array![[1u8, 0], [1, 0], [1, 0], [0, 1], [0, 1], [0, 1]];
        let names = vec!["water".to_string(), "food".to_string()];
        (texts, labels, names)
    }

    fn fitted_pipeline() -> TrainedPipeline {
        let (texts, labels, names) = training_corpus();
        TrainedPipeline::fit(
            &texts,
            &labels,
            &names,
            VectorizerConfig::default(),
            SvmConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_fit_and_predict_training_texts() {
        let pipeline = fitted_pipeline();
        let (texts, labels, _) = training_corpus();
        let predictions = pipeline.predict_texts(&texts).unwrap();
        assert_eq!(predictions, labels);
    }

    #[test]
    fn test_predict_one_length_matches_categories() {
        let pipeline = fitted_pipeline();
        let prediction = pipeline.predict_one("completely unrelated text").unwrap();
        assert_eq!(prediction.len(), pipeline.category_names().len());
    }

    #[test]
    fn test_metadata_populated() {
        let pipeline = fitted_pipeline();
        let metadata = pipeline.metadata();
        assert_eq!(metadata.n_training_samples, 6);
        assert_eq!(metadata.n_categories, 2);
        assert!(metadata.n_features > 0);
        assert!(metadata.hyperparameters.contains_key("max_features"));
        assert!(metadata.hyperparameters.contains_key("svm_c"));
    }

    #[test]
    fn test_save_load_round_trip() {
        let pipeline = fitted_pipeline();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classifier.bin");
        pipeline.save(&path).unwrap();

        let loaded = TrainedPipeline::load(&path).unwrap();
        assert_eq!(loaded.category_names(), pipeline.category_names());

        let (texts, _, _) = training_corpus();
        for text in &texts {
            assert_eq!(
                loaded.predict_one(text).unwrap(),
                pipeline.predict_one(text).unwrap(),
                "loaded model diverged on: {text}"
            );
        }
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let pipeline = fitted_pipeline();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models/nested/classifier.bin");
        pipeline.save(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let result = TrainedPipeline::load(Path::new("/nonexistent/model.bin"));
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_load_corrupt_file_is_serialization_error() {
        let pipeline = fitted_pipeline();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classifier.bin");
        pipeline.save(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();
        assert!(matches!(
            TrainedPipeline::load(&path),
            Err(AppError::Serialization(_))
        ));

        std::fs::write(&path, b"not a model file").unwrap();
        assert!(matches!(
            TrainedPipeline::load(&path),
            Err(AppError::Serialization(_))
        ));
    }
}
