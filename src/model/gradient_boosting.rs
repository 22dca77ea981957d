use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::features::FeatureVector;
use crate::model::Regressor;
use crate::prelude::*;

const LEAF: i64 = -1;

/// Gradient-boosted regression trees.
///
/// The prediction is `init + learning_rate * Σ tree(x)`.
#[derive(Serialize, Deserialize)]
pub struct GradientBoostingRegressor {
    /// Must match [`FeatureVector::NAMES`] exactly.
    pub feature_names: Vec<String>,

    pub init: f64,
    pub learning_rate: f64,
    pub trees: Vec<RegressionTree>,
}

/// Regression tree in the flat array layout: node `i` is a leaf
/// when `children_left[i] == -1`, otherwise a row goes to `children_left[i]`
/// if `x[feature[i]] <= threshold[i]` and to `children_right[i]` otherwise.
#[derive(Serialize, Deserialize)]
pub struct RegressionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

impl GradientBoostingRegressor {
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let model: Self = serde_json::from_slice(bytes).context("malformed JSON model")?;
        model.validate()?;
        Ok(model)
    }

    pub fn from_pickle_slice(bytes: &[u8]) -> Result<Self> {
        let model: Self = serde_pickle::from_slice(bytes, serde_pickle::DeOptions::new())
            .context("malformed pickled model")?;
        model.validate()?;
        Ok(model)
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    fn validate(&self) -> Result {
        if self.feature_names != FeatureVector::NAMES {
            anyhow::bail!(
                "the model is trained on {:?}, expected {:?}",
                self.feature_names,
                FeatureVector::NAMES,
            );
        }
        if !self.init.is_finite() || !self.learning_rate.is_finite() {
            anyhow::bail!("non-finite `init` or `learning_rate`");
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate().with_context(|| format!("invalid tree #{}", i))?;
        }
        Ok(())
    }
}

impl Regressor for GradientBoostingRegressor {
    fn predict(&self, features: &FeatureVector) -> Result<f64, Error> {
        let row = features.to_row();
        if let Some((name, value)) = FeatureVector::NAMES
            .iter()
            .zip(row)
            .find(|(_, value)| !value.is_finite())
        {
            return Err(Error::Prediction(format!("`{}` is {}", name, value)));
        }

        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.evaluate(&row)?;
        }
        let price = self.init + self.learning_rate * sum;
        debug!(price, n_trees = self.trees.len());
        if price.is_finite() {
            Ok(price)
        } else {
            Err(Error::Prediction(format!("the model returned {}", price)))
        }
    }
}

impl RegressionTree {
    fn n_nodes(&self) -> usize {
        self.value.len()
    }

    fn validate(&self) -> Result {
        let n_nodes = self.n_nodes();
        if n_nodes == 0 {
            anyhow::bail!("empty tree");
        }
        if [
            self.children_left.len(),
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
        ]
        .iter()
        .any(|length| *length != n_nodes)
        {
            anyhow::bail!("node arrays differ in length");
        }

        let is_child = |index: i64, parent: usize| {
            usize::try_from(index).map_or(false, |index| index < n_nodes && index != parent)
        };
        for node in 0..n_nodes {
            if !self.value[node].is_finite() {
                anyhow::bail!("node #{} has a non-finite value", node);
            }
            match (self.children_left[node], self.children_right[node]) {
                (LEAF, LEAF) => {}
                (left, right) if is_child(left, node) && is_child(right, node) => {
                    if !usize::try_from(self.feature[node])
                        .map_or(false, |feature| feature < FeatureVector::NAMES.len())
                    {
                        anyhow::bail!("node #{} splits on unknown feature {}", node, self.feature[node]);
                    }
                    if self.threshold[node].is_nan() {
                        anyhow::bail!("node #{} has a NaN threshold", node);
                    }
                }
                (left, right) => {
                    anyhow::bail!("node #{} has invalid children {} and {}", node, left, right);
                }
            }
        }
        Ok(())
    }

    /// Walks the tree from the root. Indices are checked by [`RegressionTree::validate`].
    fn evaluate(&self, row: &[f64; 13]) -> Result<f64, Error> {
        let mut node = 0;
        for _ in 0..self.n_nodes() {
            if self.children_left[node] == LEAF {
                return Ok(self.value[node]);
            }
            // Trainers store features in single precision.
            let x = f64::from(row[self.feature[node] as usize] as f32);
            node = if x <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        Err(Error::Prediction("the tree contains a cycle".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyInput;

    fn stump(feature: i64, threshold: f64, left: f64, right: f64) -> RegressionTree {
        RegressionTree {
            children_left: vec![1, LEAF, LEAF],
            children_right: vec![2, LEAF, LEAF],
            feature: vec![feature, -2, -2],
            threshold: vec![threshold, -2.0, -2.0],
            value: vec![0.0, left, right],
        }
    }

    fn model() -> GradientBoostingRegressor {
        GradientBoostingRegressor {
            feature_names: FeatureVector::NAMES.iter().map(ToString::to_string).collect(),
            init: 500_000.0,
            learning_rate: 0.1,
            trees: vec![
                // sqft_living_above
                stump(2, 2500.0, -10_000.0, 50_000.0),
                // city
                stump(10, 4.5, 20_000.0, -30_000.0),
            ],
        }
    }

    fn features(input: PropertyInput) -> FeatureVector {
        FeatureVector::derive(&input).unwrap()
    }

    #[test]
    fn predict_ok() -> Result {
        let model = model();

        // Shoreline, 2000 sqft.
        let price = model.predict(&features(PropertyInput::default()))?;
        assert!((price - 501_000.0).abs() < 1e-6);

        // Seattle, 3000 sqft.
        let price = model.predict(&features(PropertyInput {
            sqft_living: 3000,
            sqft_above: 3000,
            city: "Seattle".to_string(),
            ..Default::default()
        }))?;
        assert!((price - 502_000.0).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn threshold_is_inclusive_ok() -> Result {
        let price = model().predict(&features(PropertyInput {
            sqft_living: 2500,
            sqft_above: 2500,
            ..Default::default()
        }))?;
        assert!((price - 501_000.0).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn non_finite_feature_fails() {
        let mut features = features(PropertyInput::default());
        features.lot_to_living_ratio = f64::INFINITY;
        assert_eq!(
            model().predict(&features),
            Err(Error::Prediction("`lot_to_living_ratio` is inf".to_string())),
        );
    }

    #[test]
    fn cycle_fails() -> Result {
        let mut model = model();
        model.trees = vec![RegressionTree {
            children_left: vec![1, 0],
            children_right: vec![1, 0],
            feature: vec![0, 0],
            threshold: vec![0.0, 0.0],
            value: vec![0.0, 0.0],
        }];
        model.validate()?;
        assert!(matches!(
            model.predict(&features(PropertyInput::default())),
            Err(Error::Prediction(_)),
        ));
        Ok(())
    }

    #[test]
    fn from_json_slice_ok() -> Result {
        let model = GradientBoostingRegressor::from_json_slice(&serde_json::to_vec(&model())?)?;
        assert_eq!(model.n_trees(), 2);
        Ok(())
    }

    #[test]
    fn from_pickle_slice_ok() -> Result {
        let bytes = serde_pickle::to_vec(&model(), serde_pickle::SerOptions::new())?;
        let model = GradientBoostingRegressor::from_pickle_slice(&bytes)?;
        let price = model.predict(&features(PropertyInput::default()))?;
        assert!((price - 501_000.0).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn feature_order_mismatch_fails() {
        let mut model = model();
        model.feature_names.swap(0, 1);
        assert!(model.validate().is_err());
    }

    #[test]
    fn missing_feature_fails() {
        let mut model = model();
        model.feature_names.pop();
        assert!(model.validate().is_err());
    }

    #[test]
    fn invalid_tree_fails() {
        let mut model = model();
        model.trees[0].children_left[0] = 3;
        assert!(model.validate().is_err());

        let mut model = self::model();
        model.trees[0].feature[0] = 13;
        assert!(model.validate().is_err());

        let mut model = self::model();
        model.trees[0].threshold.pop();
        assert!(model.validate().is_err());

        let mut model = self::model();
        model.trees[0].children_left[1] = 2;
        assert!(model.validate().is_err());

        let mut model = self::model();
        model.trees.push(RegressionTree {
            children_left: vec![],
            children_right: vec![],
            feature: vec![],
            threshold: vec![],
            value: vec![],
        });
        assert!(model.validate().is_err());
    }
}
