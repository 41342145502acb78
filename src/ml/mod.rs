/// Machine learning module for multi-label message classification
///
/// This module provides the training stack:
/// - Labeled datasets with seeded splits and cross-validation folds
/// - One-vs-rest linear SVM classification over category columns
/// - Precision/recall/F1 evaluation reports
/// - The fit/predict/save/load pipeline the binaries are built on
/// - Grid search over vocabulary caps scored by macro F1

pub mod classifier;
pub mod dataset;
pub mod metrics;
pub mod pipeline;
pub mod search;

pub use classifier::{LabelClassifier, MultiLabelClassifier, SvmConfig};
pub use dataset::LabeledDataset;
pub use metrics::{evaluate, macro_f1, ClassMetrics, ClassificationReport};
pub use pipeline::{PipelineMetadata, TrainedPipeline};
pub use search::{CandidateScore, GridSearch, SearchOutcome};
