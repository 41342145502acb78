//! Hyperparameter grid search with k-fold cross-validation.
//!
//! The searched axis is the vocabulary cap. Every candidate is scored by
//! mean macro F1 over shuffled folds, with the vectorizer refit inside each
//! fold so validation rows never leak vocabulary into training. The winner
//! is refit on the whole training split.

use tracing::{info, warn};

use crate::config::SearchConfig;
use crate::error::{AppError, Result};
use crate::features::VectorizerConfig;
use crate::ml::classifier::SvmConfig;
use crate::ml::dataset::LabeledDataset;
use crate::ml::metrics::macro_f1;
use crate::ml::pipeline::TrainedPipeline;

/// Cross-validation score for one grid candidate.
#[derive(Debug, Clone)]
pub struct CandidateScore {
    pub max_features: Option<usize>,
    pub fold_scores: Vec<f64>,
    pub mean_macro_f1: f64,
}

/// Outcome of a search: the winning pipeline refit on the full training
/// split, plus every candidate's score.
pub struct SearchOutcome {
    pub pipeline: TrainedPipeline,
    pub candidates: Vec<CandidateScore>,
    pub best_max_features: Option<usize>,
}

/// Sequential grid search over vocabulary caps.
pub struct GridSearch {
    vectorizer_config: VectorizerConfig,
    svm_config: SvmConfig,
    search_config: SearchConfig,
}

impl GridSearch {
    pub fn new(
        vectorizer_config: VectorizerConfig,
        svm_config: SvmConfig,
        search_config: SearchConfig,
    ) -> Self {
        Self {
            vectorizer_config,
            svm_config,
            search_config,
        }
    }

    /// Cross-validate every candidate on `train` and refit the best one.
    ///
    /// Candidates are tried in grid order and the first best score wins
    /// ties, so repeated runs pick the same model.
    pub fn run(&self, train: &LabeledDataset) -> Result<SearchOutcome> {
        if self.search_config.max_features_grid.is_empty() {
            return Err(AppError::Validation(
                "max_features_grid must contain at least one candidate".to_string(),
            ));
        }

        let folds = self.make_folds(train)?;
        let mut candidates: Vec<CandidateScore> = Vec::new();

        for &cap in &self.search_config.max_features_grid {
            let max_features = (cap != 0).then_some(cap);
            info!(
                ?max_features,
                folds = folds.len(),
                "evaluating grid candidate"
            );
            let fold_scores = self.score_candidate(train, &folds, max_features)?;
            let mean_macro_f1 = fold_scores.iter().sum::<f64>() / fold_scores.len() as f64;
            info!(?max_features, mean_macro_f1, "candidate scored");
            candidates.push(CandidateScore {
                max_features,
                fold_scores,
                mean_macro_f1,
            });
        }

        let mut best = 0;
        for (index, candidate) in candidates.iter().enumerate().skip(1) {
            if candidate.mean_macro_f1 > candidates[best].mean_macro_f1 {
                best = index;
            }
        }
        let best_max_features = candidates[best].max_features;
        info!(
            max_features = ?best_max_features,
            mean_macro_f1 = candidates[best].mean_macro_f1,
            "refitting best candidate on the full training split"
        );

        let mut vectorizer_config = self.vectorizer_config.clone();
        vectorizer_config.max_features = best_max_features;
        let pipeline = TrainedPipeline::fit(
            &train.texts,
            &train.labels,
            &train.category_names,
            vectorizer_config,
            self.svm_config.clone(),
        )?;

        Ok(SearchOutcome {
            pipeline,
            candidates,
            best_max_features,
        })
    }

    fn make_folds(&self, train: &LabeledDataset) -> Result<Vec<Vec<usize>>> {
        let requested = self.search_config.cv_folds;
        if requested < 2 {
            return Err(AppError::Validation(format!(
                "cross-validation needs at least 2 folds, got {requested}"
            )));
        }
        let folds = requested.min(train.len());
        if folds < 2 {
            return Err(AppError::DataFormat(format!(
                "cross-validation needs at least 2 training rows, got {}",
                train.len()
            )));
        }
        if folds < requested {
            warn!(requested, using = folds, "fewer training rows than folds");
        }
        train.k_folds(folds, self.search_config.seed)
    }

    fn score_candidate(
        &self,
        train: &LabeledDataset,
        folds: &[Vec<usize>],
        max_features: Option<usize>,
    ) -> Result<Vec<f64>> {
        let mut scores = Vec::with_capacity(folds.len());

        for (fold_index, holdout) in folds.iter().enumerate() {
            let fit_indices: Vec<usize> = folds
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != fold_index)
                .flat_map(|(_, fold)| fold.iter().copied())
                .collect();

            let fit_split = train.subset(&fit_indices);
            let holdout_split = train.subset(holdout);

            let mut vectorizer_config = self.vectorizer_config.clone();
            vectorizer_config.max_features = max_features;
            let pipeline = TrainedPipeline::fit(
                &fit_split.texts,
                &fit_split.labels,
                &fit_split.category_names,
                vectorizer_config,
                self.svm_config.clone(),
            )?;

            let predictions = pipeline.predict_texts(&holdout_split.texts)?;
            let score = macro_f1(&holdout_split.labels, &predictions)?;
            info!(
                fold = fold_index + 1,
                total = folds.len(),
                macro_f1 = score,
                "fold scored"
            );
            scores.push(score);
        }

        Ok(scores)
    }
}
