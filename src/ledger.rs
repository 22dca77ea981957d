//! Predictions made within one session.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::features::FeatureVector;
use crate::model::Regressor;
use crate::property::PropertyInput;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub price: f64,
    pub price_per_sqft: u32,
    pub lot_to_living_ratio: f64,

    /// Snapshot of what the user has entered.
    pub input: PropertyInput,
}

impl Prediction {
    /// Derives the features and runs the model on them.
    pub fn new(input: PropertyInput, model: &dyn Regressor) -> Result<Self, Error> {
        let features = FeatureVector::derive(&input)?;
        let price = model.predict(&features)?;
        Ok(Self {
            price,
            price_per_sqft: features.price_per_sqft,
            lot_to_living_ratio: features.lot_to_living_ratio,
            input,
        })
    }
}

/// Investment comparison strategy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Lowest priced property.
    Minimal,

    /// Highest priced property.
    High,
}

impl Strategy {
    pub const ALL: [Self; 2] = [Self::Minimal, Self::High];

    /// Serialized name, as in query strings and paths.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::High => "high",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Minimal => "Minimal Capital Investment",
            Self::High => "High Capital Investment",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Minimal => "Lowest priced property from your predictions",
            Self::High => "Highest priced property from your predictions",
        }
    }
}

/// Append-only, apart from [`Ledger::clear`].
#[derive(Default)]
pub struct Ledger(Vec<Prediction>);

impl Ledger {
    pub fn append(&mut self, prediction: Prediction) {
        self.0.push(prediction);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Predictions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Prediction> {
        self.0.iter()
    }

    pub fn cheapest(&self) -> Result<&Prediction, Error> {
        self.first_by(Ordering::Less)
    }

    pub fn priciest(&self) -> Result<&Prediction, Error> {
        self.first_by(Ordering::Greater)
    }

    pub fn compare(&self, strategy: Strategy) -> Result<&Prediction, Error> {
        match strategy {
            Strategy::Minimal => self.cheapest(),
            Strategy::High => self.priciest(),
        }
    }

    /// Linear scan which replaces the current pick only on a strict improvement,
    /// so that ties resolve to the earliest prediction.
    fn first_by(&self, wanted: Ordering) -> Result<&Prediction, Error> {
        let mut predictions = self.0.iter();
        let mut best = predictions.next().ok_or(Error::EmptyLedger)?;
        for prediction in predictions {
            if prediction.price.total_cmp(&best.price) == wanted {
                best = prediction;
            }
        }
        Ok(best)
    }
}
