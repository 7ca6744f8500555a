//! Data structures and helpers for labeled training sets.
//!
//! This module defines `Dataset` (a feature matrix plus row-aligned labels)
//! and `ClassPartition` (the ordered class universe with per-class row
//! indices) used by the models at fit time.
use std::collections::HashMap;
use std::hash::Hash;

use ndarray::{Array2, Axis};
use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::error::ModelError;

/// A labeled sample set: `x` holds one sample per row, `y` one label per row.
#[derive(Debug, Clone)]
pub struct Dataset<L> {
    pub x: Array2<f32>,
    pub y: Vec<L>,
}

impl<L: Clone + Eq + Hash> Dataset<L> {
    pub fn new(x: Array2<f32>, y: Vec<L>) -> Result<Self, ModelError> {
        if x.nrows() != y.len() {
            return Err(ModelError::ShapeMismatch {
                expected: x.nrows(),
                found: y.len(),
            });
        }
        Ok(Dataset { x, y })
    }

    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    pub fn log_input_data_summary(&self) {
        let n_classes = self.y.iter().collect::<std::collections::HashSet<_>>().len();
        log::info!(
            "Input data: {} samples, {} feature columns, {} distinct classes",
            self.n_samples(),
            self.n_features(),
            n_classes
        );
    }

    /// New dataset containing only the given rows, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Dataset<L> {
        Dataset {
            x: self.x.select(Axis(0), indices),
            y: indices.iter().map(|&i| self.y[i].clone()).collect(),
        }
    }

    /// Split into a shuffled (train, eval) pair; `fraction` of the rows go
    /// to the train side.
    pub fn shuffled_split(&self, fraction: f32) -> (Dataset<L>, Dataset<L>) {
        let mut rng = thread_rng();
        let n_samples = self.n_samples();
        let mut indices: Vec<usize> = (0..n_samples).collect();
        indices.shuffle(&mut rng);

        let n_train = (n_samples as f32 * fraction) as usize;
        let train = self.select_rows(&indices[..n_train]);
        let eval = self.select_rows(&indices[n_train..]);
        (train, eval)
    }
}

/// The class universe of a label sequence, in first-seen order, with the
/// row indices belonging to each class.
#[derive(Debug, Clone)]
pub struct ClassPartition<L> {
    pub classes: Vec<L>,
    pub class_rows: Vec<Vec<usize>>,
}

impl<L: Clone + Eq + Hash> ClassPartition<L> {
    pub fn from_labels(y: &[L]) -> Self {
        let mut index: HashMap<L, usize> = HashMap::new();
        let mut classes = Vec::new();
        let mut class_rows: Vec<Vec<usize>> = Vec::new();

        for (row, label) in y.iter().enumerate() {
            let class_idx = *index.entry(label.clone()).or_insert_with(|| {
                classes.push(label.clone());
                class_rows.push(Vec::new());
                classes.len() - 1
            });
            class_rows[class_idx].push(row);
        }

        ClassPartition {
            classes,
            class_rows,
        }
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }
}
