/// Errors which are surfaced to the user as is.
///
/// All of them are deterministic for a given input, so none is ever retried.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("unknown city: {0:?}")]
    InvalidCity(String),

    #[error("cannot compute the lot-to-living ratio: the living area averages to zero")]
    DerivedFeature,

    #[error("the model rejected the property: {0}")]
    Prediction(String),

    #[error("no predictions have been made yet")]
    EmptyLedger,
}
