use super::regressor::Regressor;
use crate::domain::errors::ModelError;
use crate::domain::ml::feature_registry::{FEATURE_COUNT, FeatureVector};
use crate::domain::ml::training_config::BoostingParams;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_regressor::{
    DecisionTreeRegressor, DecisionTreeRegressorParameters,
};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

type Tree = DecisionTreeRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// One boosting round: a regression tree fitted on a subset of columns.
#[derive(Debug, Serialize, Deserialize)]
struct BoostedTree {
    columns: Vec<usize>,
    tree: Tree,
}

impl BoostedTree {
    fn predict(&self, rows: &[[f64; FEATURE_COUNT]]) -> Result<Vec<f64>, ModelError> {
        let matrix = project(rows, &self.columns, None)?;
        self.tree
            .predict(&matrix)
            .map_err(|e| ModelError::Predict(e.to_string()))
    }
}

/// Squared-error gradient boosting over smartcore regression trees.
///
/// Each round fits a tree to the current residuals using a random subset of
/// rows and columns drawn without replacement, then adds
/// `learning_rate * tree(x)` to the ensemble. The RNG is seeded from
/// `BoostingParams::seed`, so identical inputs give identical models.
#[derive(Debug, Serialize, Deserialize)]
pub struct GradientBoostedTrees {
    base_score: f64,
    learning_rate: f64,
    trees: Vec<BoostedTree>,
}

/// Builds a dense matrix from the selected rows (all when `None`) and columns.
fn project(
    rows: &[[f64; FEATURE_COUNT]],
    columns: &[usize],
    row_subset: Option<&[usize]>,
) -> Result<DenseMatrix<f64>, ModelError> {
    let select = |row: &[f64; FEATURE_COUNT]| columns.iter().map(|&c| row[c]).collect::<Vec<f64>>();

    let values: Vec<Vec<f64>> = match row_subset {
        Some(indices) => indices.iter().map(|&i| select(&rows[i])).collect(),
        None => rows.iter().map(select).collect(),
    };

    DenseMatrix::from_2d_vec(&values).map_err(|e| ModelError::Matrix(e.to_string()))
}

/// Number of items kept when sampling `fraction` of `total`, at least one.
fn subsample_size(total: usize, fraction: f64) -> usize {
    ((total as f64 * fraction).floor() as usize).clamp(1, total)
}

impl GradientBoostedTrees {
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Regressor for GradientBoostedTrees {
    fn fit(
        features: &[FeatureVector],
        targets: &[f64],
        params: &BoostingParams,
    ) -> Result<Self, ModelError> {
        if features.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        if features.len() != targets.len() {
            return Err(ModelError::ShapeMismatch {
                rows: features.len(),
                targets: targets.len(),
            });
        }

        let rows: Vec<[f64; FEATURE_COUNT]> = features.iter().map(|f| f.to_array()).collect();
        let n = rows.len();
        let base_score = targets.iter().sum::<f64>() / n as f64;
        let mut predictions = vec![base_score; n];

        let n_rows = subsample_size(n, params.row_subsample);
        let n_cols = subsample_size(FEATURE_COUNT, params.column_subsample);
        let tree_params = DecisionTreeRegressorParameters::default().with_max_depth(params.max_depth);
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_rounds);

        for round in 0..params.n_rounds {
            let row_idx = index::sample(&mut rng, n, n_rows).into_vec();
            let mut columns = index::sample(&mut rng, FEATURE_COUNT, n_cols).into_vec();
            columns.sort_unstable();

            let residuals: Vec<f64> = row_idx
                .iter()
                .map(|&i| targets[i] - predictions[i])
                .collect();
            let x = project(&rows, &columns, Some(&row_idx))?;

            let tree = Tree::fit(&x, &residuals, tree_params.clone())
                .map_err(|e| ModelError::Fit(format!("round {}: {}", round, e)))?;
            let boosted = BoostedTree { columns, tree };

            for (pred, step) in predictions.iter_mut().zip(boosted.predict(&rows)?) {
                *pred += params.learning_rate * step;
            }
            trees.push(boosted);
        }

        debug!(
            "Fitted {} trees on {} rows ({} rows / {} columns per round)",
            trees.len(),
            n,
            n_rows,
            n_cols
        );

        Ok(Self {
            base_score,
            learning_rate: params.learning_rate,
            trees,
        })
    }

    fn predict(&self, features: &[FeatureVector]) -> Result<Vec<f64>, ModelError> {
        let rows: Vec<[f64; FEATURE_COUNT]> = features.iter().map(|f| f.to_array()).collect();
        let mut predictions = vec![self.base_score; rows.len()];

        if rows.is_empty() {
            return Ok(predictions);
        }

        for boosted in &self.trees {
            for (pred, step) in predictions.iter_mut().zip(boosted.predict(&rows)?) {
                *pred += self.learning_rate * step;
            }
        }

        Ok(predictions)
    }

    fn save(&self, path: &Path) -> Result<(), ModelError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    fn load(path: &Path) -> Result<Self, ModelError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    fn name(&self) -> &str {
        "SmartCore Gradient Boosted Trees"
    }
}
