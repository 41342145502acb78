//! Multi-label evaluation metrics.
//!
//! Metrics are computed structurally into per-category rows; the formatted
//! table is only a `Display` rendering, so nothing downstream ever parses
//! report text.

use std::fmt;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Precision, recall and F1 for one category.
///
/// `support` is the number of held-out rows where the category is positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub category: String,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

/// Per-category metrics in category column order, with macro averages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub per_category: Vec<ClassMetrics>,
    pub macro_precision: f64,
    pub macro_recall: f64,
    pub macro_f1: f64,
}

/// Compare predictions against truth, one category per label column.
///
/// Rows of the report follow `category_names` order. Undefined ratios
/// (no predicted positives, or no true positives) are reported as 0.0.
pub fn evaluate(
    y_true: &Array2<u8>,
    y_pred: &Array2<u8>,
    category_names: &[String],
) -> Result<ClassificationReport> {
    check_shapes(y_true, y_pred)?;
    if y_true.ncols() != category_names.len() {
        return Err(AppError::DataFormat(format!(
            "{} label columns for {} category names",
            y_true.ncols(),
            category_names.len()
        )));
    }
    if category_names.is_empty() {
        return Err(AppError::DataFormat(
            "cannot evaluate with zero categories".to_string(),
        ));
    }

    let mut per_category = Vec::with_capacity(category_names.len());
    for (column, category) in category_names.iter().enumerate() {
        let (tp, fp, fn_count) = column_counts(y_true, y_pred, column);
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_count);
        let f1_score = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        per_category.push(ClassMetrics {
            category: category.clone(),
            precision,
            recall,
            f1_score,
            support: tp + fn_count,
        });
    }

    let n = per_category.len() as f64;
    Ok(ClassificationReport {
        macro_precision: per_category.iter().map(|m| m.precision).sum::<f64>() / n,
        macro_recall: per_category.iter().map(|m| m.recall).sum::<f64>() / n,
        macro_f1: per_category.iter().map(|m| m.f1_score).sum::<f64>() / n,
        per_category,
    })
}

/// Macro-averaged F1 across all label columns.
pub fn macro_f1(y_true: &Array2<u8>, y_pred: &Array2<u8>) -> Result<f64> {
    check_shapes(y_true, y_pred)?;
    let n_categories = y_true.ncols();
    if n_categories == 0 {
        return Err(AppError::DataFormat(
            "cannot score with zero categories".to_string(),
        ));
    }

    let mut total = 0.0;
    for column in 0..n_categories {
        let (tp, fp, fn_count) = column_counts(y_true, y_pred, column);
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_count);
        if precision + recall > 0.0 {
            total += 2.0 * precision * recall / (precision + recall);
        }
    }
    Ok(total / n_categories as f64)
}

fn check_shapes(y_true: &Array2<u8>, y_pred: &Array2<u8>) -> Result<()> {
    if y_true.dim() != y_pred.dim() {
        return Err(AppError::DataFormat(format!(
            "prediction shape {:?} does not match truth shape {:?}",
            y_pred.dim(),
            y_true.dim()
        )));
    }
    Ok(())
}

fn column_counts(y_true: &Array2<u8>, y_pred: &Array2<u8>, column: usize) -> (usize, usize, usize) {
    let mut tp = 0;
    let mut fp = 0;
    let mut fn_count = 0;
    for (truth, pred) in y_true.column(column).iter().zip(y_pred.column(column)) {
        match (*truth != 0, *pred != 0) {
            (true, true) => tp += 1,
            (false, true) => fp += 1,
            (true, false) => fn_count += 1,
            (false, false) => {}
        }
    }
    (tp, fp, fn_count)
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .per_category
            .iter()
            .map(|m| m.category.len())
            .chain(["macro avg".len()])
            .max()
            .unwrap_or(0);

        writeln!(
            f,
            "{:>width$}  {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for m in &self.per_category {
            writeln!(
                f,
                "{:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
                m.category, m.precision, m.recall, m.f1_score, m.support
            )?;
        }
        writeln!(f)?;
        let total_support: usize = self.per_category.iter().map(|m| m.support).sum();
        write!(
            f,
            "{:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
            "macro avg", self.macro_precision, self.macro_recall, self.macro_f1, total_support
        )
    }
}
