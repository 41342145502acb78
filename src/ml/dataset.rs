//! Labeled message datasets and split helpers.

use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{AppError, Result};

/// Messages with their 0/1 category matrix.
///
/// Column `j` of `labels` belongs to `category_names[j]`; everything
/// downstream, from the per-category classifiers to the report rows,
/// keeps this column order.
#[derive(Debug, Clone)]
pub struct LabeledDataset {
    pub texts: Vec<String>,
    pub labels: Array2<u8>,
    pub category_names: Vec<String>,
}

impl LabeledDataset {
    /// Assemble a dataset, checking that texts, labels and names agree.
    pub fn new(
        texts: Vec<String>,
        labels: Array2<u8>,
        category_names: Vec<String>,
    ) -> Result<Self> {
        if labels.nrows() != texts.len() {
            return Err(AppError::DataFormat(format!(
                "label matrix has {} rows for {} texts",
                labels.nrows(),
                texts.len()
            )));
        }
        if labels.ncols() != category_names.len() {
            return Err(AppError::DataFormat(format!(
                "label matrix has {} columns for {} category names",
                labels.ncols(),
                category_names.len()
            )));
        }
        Ok(Self {
            texts,
            labels,
            category_names,
        })
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Whether the dataset has no rows
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Number of categories
    pub fn n_categories(&self) -> usize {
        self.category_names.len()
    }

    /// Rows at `indices`, in the order given.
    pub(crate) fn subset(&self, indices: &[usize]) -> LabeledDataset {
        let texts = indices.iter().map(|&i| self.texts[i].clone()).collect();
        let labels = self.labels.select(Axis(0), indices);
        LabeledDataset {
            texts,
            labels,
            category_names: self.category_names.clone(),
        }
    }

    /// Shuffle rows with a seeded RNG and split off a held-out test set.
    ///
    /// Both sides are guaranteed at least one row; the same seed on the same
    /// dataset always yields the same partition.
    pub fn train_test_split(
        &self,
        test_ratio: f64,
        seed: u64,
    ) -> Result<(LabeledDataset, LabeledDataset)> {
        if !(test_ratio > 0.0 && test_ratio < 1.0) {
            return Err(AppError::Validation(format!(
                "test_ratio must be in (0, 1), got {test_ratio}"
            )));
        }
        let n = self.len();
        if n < 2 {
            return Err(AppError::DataFormat(format!(
                "need at least 2 rows to split, got {n}"
            )));
        }

        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let test_size = ((n as f64 * test_ratio).round() as usize).clamp(1, n - 1);
        let split_at = n - test_size;
        let train = self.subset(&indices[..split_at]);
        let test = self.subset(&indices[split_at..]);
        Ok((train, test))
    }

    /// Partition row indices into `k` shuffled folds for cross-validation.
    ///
    /// Fold sizes differ by at most one row.
    pub fn k_folds(&self, k: usize, seed: u64) -> Result<Vec<Vec<usize>>> {
        let n = self.len();
        if k < 2 {
            return Err(AppError::Validation(format!(
                "cross-validation needs at least 2 folds, got {k}"
            )));
        }
        if k > n {
            return Err(AppError::DataFormat(format!(
                "cannot make {k} folds out of {n} rows"
            )));
        }

        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let base = n / k;
        let remainder = n % k;
        let mut folds = Vec::with_capacity(k);
        let mut start = 0;
        for fold in 0..k {
            let size = base + usize::from(fold < remainder);
            folds.push(indices[start..start + size].to_vec());
            start += size;
        }
        Ok(folds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample_dataset(n: usize) -> LabeledDataset {
        let texts = (0..n).map(|i| format!("message number {i}")).collect();
        let mut labels = Array2::zeros((n, 2));
        for i in 0..n {
            labels[[i, i % 2]] = 1;
        }
        LabeledDataset::new(texts, labels, vec!["water".into(), "food".into()]).unwrap()
    }

    #[test]
    fn test_new_rejects_mismatched_shapes() {
        let err = LabeledDataset::new(
            vec!["one".into()],
            array![[1u8, 0], [0, 1]],
            vec!["water".into(), "food".into()],
        )
        .unwrap_err();
        assert!(matches!(err, AppError::DataFormat(_)));

        let err = LabeledDataset::new(
            vec!["one".into()],
            array![[1u8, 0]],
            vec!["water".into()],
        )
        .unwrap_err();
        assert!(matches!(err, AppError::DataFormat(_)));
    }

    #[test]
    fn test_split_sizes_and_order_preserved() {
        let dataset = sample_dataset(10);
        let (train, test) = dataset.train_test_split(0.2, 42).unwrap();
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);
        assert_eq!(train.category_names, dataset.category_names);
        assert_eq!(test.category_names, dataset.category_names);
    }

    #[test]
    fn test_split_is_reproducible() {
        let dataset = sample_dataset(20);
        let (train_a, test_a) = dataset.train_test_split(0.25, 7).unwrap();
        let (train_b, test_b) = dataset.train_test_split(0.25, 7).unwrap();
        assert_eq!(train_a.texts, train_b.texts);
        assert_eq!(test_a.texts, test_b.texts);
        assert_eq!(train_a.labels, train_b.labels);

        let (train_c, _) = dataset.train_test_split(0.25, 8).unwrap();
        assert_ne!(train_a.texts, train_c.texts);
    }

    #[test]
    fn test_split_labels_follow_texts() {
        let dataset = sample_dataset(12);
        let (train, test) = dataset.train_test_split(0.25, 3).unwrap();
        for part in [&train, &test] {
            for (text, row) in part.texts.iter().zip(part.labels.rows()) {
                let i: usize = text
                    .rsplit(' ')
                    .next()
                    .and_then(|s| s.parse().ok())
                    .unwrap();
                assert_eq!(row[i % 2], 1, "label row moved with its text");
            }
        }
    }

    #[test]
    fn test_tiny_split_keeps_both_sides_nonempty() {
        let dataset = sample_dataset(2);
        let (train, test) = dataset.train_test_split(0.2, 42).unwrap();
        assert_eq!(train.len(), 1);
        assert_eq!(test.len(), 1);
    }

    #[test]
    fn test_invalid_ratio_rejected() {
        let dataset = sample_dataset(4);
        assert!(dataset.train_test_split(0.0, 42).is_err());
        assert!(dataset.train_test_split(1.0, 42).is_err());
        assert!(dataset.train_test_split(-0.1, 42).is_err());
    }

    #[test]
    fn test_k_folds_partition_all_rows() {
        let dataset = sample_dataset(11);
        let folds = dataset.k_folds(3, 42).unwrap();
        assert_eq!(folds.len(), 3);

        let sizes: Vec<usize> = folds.iter().map(Vec::len).collect();
        assert_eq!(sizes.iter().sum::<usize>(), 11);
        assert!(sizes.iter().all(|&s| s == 3 || s == 4));

        let mut seen: Vec<usize> = folds.into_iter().flatten().collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..11).collect::<Vec<_>>());
    }

    #[test]
    fn test_k_folds_bounds() {
        let dataset = sample_dataset(3);
        assert!(dataset.k_folds(1, 42).is_err());
        assert!(dataset.k_folds(4, 42).is_err());
        assert!(dataset.k_folds(3, 42).is_ok());
    }
}
