//! Pre-trained price model.

use std::path::Path;

pub use self::gradient_boosting::GradientBoostingRegressor;
use crate::error::Error;
use crate::features::FeatureVector;
use crate::prelude::*;

mod gradient_boosting;

/// Black-box price regressor.
pub trait Regressor: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<f64, Error>;
}

/// Loads the model artifact, failing fast on anything unexpected.
#[instrument(level = "info", skip_all, fields(path = ?path))]
pub fn load(path: &Path) -> Result<Arc<dyn Regressor>> {
    let start_instant = Instant::now();
    let bytes = std::fs::read(path).with_context(|| format!("failed to read `{}`", path.display()))?;
    let model = match path.extension().and_then(|extension| extension.to_str()) {
        Some("json") => GradientBoostingRegressor::from_json_slice(&bytes),
        _ => GradientBoostingRegressor::from_pickle_slice(&bytes),
    }
    .with_context(|| format!("failed to load the model from `{}`", path.display()))?;
    info!(
        n_trees = model.n_trees(),
        elapsed = %crate::tracing::format_elapsed(start_instant),
        "loaded",
    );
    Ok(Arc::new(model))
}
