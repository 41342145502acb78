//! TF-IDF feature extraction over lemmatized n-grams.
//!
//! `TextVectorizer` learns a vocabulary from a training corpus and turns
//! documents into dense, L2-normalized TF-IDF rows. Vocabulary indices are
//! assigned lexicographically, so two fits on the same corpus produce
//! identical matrices.

use std::collections::{HashMap, HashSet};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::text::Normalizer;

/// Feature extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerConfig {
    /// Smallest n-gram length
    #[serde(default = "default_ngram_min")]
    pub ngram_min: usize,

    /// Largest n-gram length
    #[serde(default = "default_ngram_max")]
    pub ngram_max: usize,

    /// Terms appearing in more than this fraction of documents are dropped
    #[serde(default = "default_max_df")]
    pub max_df: f64,

    /// Keep only the most frequent terms; `None` keeps the full vocabulary
    #[serde(default)]
    pub max_features: Option<usize>,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            ngram_min: default_ngram_min(),
            ngram_max: default_ngram_max(),
            max_df: default_max_df(),
            max_features: None,
        }
    }
}

impl VectorizerConfig {
    /// Check field ranges before a fit.
    pub fn validate(&self) -> Result<()> {
        if self.ngram_min == 0 {
            return Err(AppError::Validation(
                "ngram_min must be at least 1".to_string(),
            ));
        }
        if self.ngram_min > self.ngram_max {
            return Err(AppError::Validation(format!(
                "ngram_min {} exceeds ngram_max {}",
                self.ngram_min, self.ngram_max
            )));
        }
        if !(self.max_df > 0.0 && self.max_df <= 1.0) {
            return Err(AppError::Validation(format!(
                "max_df must be in (0, 1], got {}",
                self.max_df
            )));
        }
        if self.max_features == Some(0) {
            return Err(AppError::Validation(
                "max_features must be positive; omit it to keep all terms".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_ngram_min() -> usize {
    1
}

fn default_ngram_max() -> usize {
    2
}

fn default_max_df() -> f64 {
    0.5
}

/// TF-IDF vectorizer over normalized message text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextVectorizer {
    config: VectorizerConfig,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    n_documents: usize,
    is_fitted: bool,
}

impl TextVectorizer {
    /// Create a new vectorizer with the given configuration
    pub fn new(config: VectorizerConfig) -> Self {
        Self {
            config,
            vocabulary: HashMap::new(),
            idf: Vec::new(),
            n_documents: 0,
            is_fitted: false,
        }
    }

    /// Learn the vocabulary and document frequencies from a corpus.
    ///
    /// Terms present in more than `max_df` of the documents are dropped;
    /// if `max_features` is set, the survivors are ranked by total corpus
    /// frequency (ties broken alphabetically) and the tail is cut.
    pub fn fit(&mut self, documents: &[String]) -> Result<()> {
        self.config.validate()?;
        if documents.is_empty() {
            return Err(AppError::DataFormat(
                "cannot fit a vectorizer on an empty corpus".to_string(),
            ));
        }

        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut corpus_freq: HashMap<String, usize> = HashMap::new();

        for text in documents {
            let terms = self.extract_terms(text);
            for term in &terms {
                *corpus_freq.entry(term.clone()).or_insert(0) += 1;
            }
            let unique: HashSet<&String> = terms.iter().collect();
            for term in unique {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
        }

        let n_docs = documents.len();
        let max_doc_count = self.config.max_df * n_docs as f64;
        let mut kept: Vec<String> = doc_freq
            .iter()
            .filter(|(_, &df)| df as f64 <= max_doc_count)
            .map(|(term, _)| term.clone())
            .collect();

        if kept.is_empty() {
            return Err(AppError::DataFormat(format!(
                "no vocabulary terms remain after dropping terms in more than {:.0}% of {} documents",
                self.config.max_df * 100.0,
                n_docs
            )));
        }

        if let Some(cap) = self.config.max_features {
            if kept.len() > cap {
                kept.sort_by(|a, b| {
                    let freq_a = corpus_freq.get(a).copied().unwrap_or(0);
                    let freq_b = corpus_freq.get(b).copied().unwrap_or(0);
                    freq_b.cmp(&freq_a).then_with(|| a.cmp(b))
                });
                kept.truncate(cap);
            }
        }

        kept.sort();
        self.vocabulary = kept
            .into_iter()
            .enumerate()
            .map(|(index, term)| (term, index))
            .collect();

        let mut idf = vec![0.0; self.vocabulary.len()];
        for (term, &index) in &self.vocabulary {
            let df = doc_freq.get(term).copied().unwrap_or(0);
            idf[index] = ((1.0 + n_docs as f64) / (1.0 + df as f64)).ln() + 1.0;
        }

        self.idf = idf;
        self.n_documents = n_docs;
        self.is_fitted = true;
        Ok(())
    }

    /// Transform documents into a dense TF-IDF matrix, one row per document.
    ///
    /// Terms outside the learned vocabulary are ignored; a document with no
    /// known terms becomes a zero row.
    pub fn transform(&self, documents: &[String]) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(AppError::Training(
                "vectorizer must be fitted before transform".to_string(),
            ));
        }

        let mut matrix = Array2::zeros((documents.len(), self.vocabulary.len()));

        for (row, text) in documents.iter().enumerate() {
            let mut counts: HashMap<usize, usize> = HashMap::new();
            for term in self.extract_terms(text) {
                if let Some(&index) = self.vocabulary.get(&term) {
                    *counts.entry(index).or_insert(0) += 1;
                }
            }

            for (&index, &count) in &counts {
                matrix[[row, index]] = count as f64 * self.idf[index];
            }

            let norm: f64 = matrix.row(row).iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                matrix.row_mut(row).mapv_inplace(|v| v / norm);
            }
        }

        Ok(matrix)
    }

    /// Fit on a corpus and transform it in one call
    pub fn fit_transform(&mut self, documents: &[String]) -> Result<Array2<f64>> {
        self.fit(documents)?;
        self.transform(documents)
    }

    /// Tokenize a document and assemble n-grams in the configured range
    pub fn extract_terms(&self, text: &str) -> Vec<String> {
        let tokens = Normalizer::tokenize(text);
        let lo = self.config.ngram_min.max(1);
        let mut terms = Vec::new();
        for n in lo..=self.config.ngram_max {
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    /// Number of terms in the learned vocabulary
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Whether `fit` has run
    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Configuration this vectorizer was built with
    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }
}
