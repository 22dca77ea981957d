//! Raw property attributes as chosen by the user.

use std::ops::RangeInclusive;

use num_traits::AsPrimitive;
use serde::{Deserialize, Deserializer, Serialize};

use crate::city;

pub const BEDROOMS: RangeInclusive<u8> = 0..=10;
pub const BATHROOMS: RangeInclusive<f64> = 0.5..=5.0;
pub const SQFT_LIVING: RangeInclusive<u32> = 0..=10_000;
pub const SQFT_LOT: RangeInclusive<u32> = 0..=100_000;
pub const SQFT_ABOVE: RangeInclusive<u32> = 0..=10_000;
pub const SQFT_BASEMENT: RangeInclusive<u32> = 0..=5_000;
pub const FLOORS: RangeInclusive<u8> = 1..=4;
pub const VIEW: RangeInclusive<u8> = 0..=4;
pub const CONDITION: RangeInclusive<u8> = 1..=5;
pub const YEAR: RangeInclusive<u16> = 1900..=2020;
pub const PRICE_PER_SQFT: RangeInclusive<u32> = 50..=2000;

/// Renovation year meaning «never renovated».
pub const NOT_RENOVATED: u16 = 0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyInput {
    #[serde(deserialize_with = "deserialize_saturating")]
    pub bedrooms: u8,
    pub bathrooms: f64,
    #[serde(deserialize_with = "deserialize_saturating")]
    pub sqft_living: u32,
    #[serde(deserialize_with = "deserialize_saturating")]
    pub sqft_lot: u32,
    #[serde(deserialize_with = "deserialize_saturating")]
    pub sqft_above: u32,
    #[serde(deserialize_with = "deserialize_saturating")]
    pub sqft_basement: u32,
    #[serde(deserialize_with = "deserialize_saturating")]
    pub floors: u8,
    #[serde(deserialize_with = "deserialize_saturating")]
    pub view: u8,
    #[serde(deserialize_with = "deserialize_saturating")]
    pub condition: u8,
    #[serde(deserialize_with = "deserialize_saturating")]
    pub yr_built: u16,
    #[serde(deserialize_with = "deserialize_saturating")]
    pub yr_renovated: u16,
    pub city: String,
    #[serde(deserialize_with = "deserialize_saturating")]
    pub price_per_sqft: u32,
}

impl Default for PropertyInput {
    fn default() -> Self {
        Self {
            bedrooms: 3,
            bathrooms: 2.0,
            sqft_living: 2000,
            sqft_lot: 10_000,
            sqft_above: 2000,
            sqft_basement: 0,
            floors: 1,
            view: 0,
            condition: 3,
            yr_built: 2000,
            yr_renovated: NOT_RENOVATED,
            city: city::DEFAULT.to_string(),
            price_per_sqft: 300,
        }
    }
}

impl PropertyInput {
    /// Forces the numeric fields into the form widget ranges.
    ///
    /// The city is left intact: it is validated when the features get derived.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            bedrooms: clamp(self.bedrooms, BEDROOMS),
            bathrooms: clamp_bathrooms(self.bathrooms),
            sqft_living: clamp(self.sqft_living, SQFT_LIVING),
            sqft_lot: clamp(self.sqft_lot, SQFT_LOT),
            sqft_above: clamp(self.sqft_above, SQFT_ABOVE),
            sqft_basement: clamp(self.sqft_basement, SQFT_BASEMENT),
            floors: clamp(self.floors, FLOORS),
            view: clamp(self.view, VIEW),
            condition: clamp(self.condition, CONDITION),
            yr_built: clamp(self.yr_built, YEAR),
            yr_renovated: if self.yr_renovated == NOT_RENOVATED {
                NOT_RENOVATED
            } else {
                clamp(self.yr_renovated, YEAR)
            },
            city: self.city,
            price_per_sqft: clamp(self.price_per_sqft, PRICE_PER_SQFT),
        }
    }
}

/// Accepts any number, saturating at the bounds of the field type so that [`PropertyInput::clamped`]
/// gets to see values which do not fit the type.
fn deserialize_saturating<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Copy + 'static,
    f64: AsPrimitive<T>,
{
    Ok(f64::deserialize(deserializer)?.round().as_())
}

fn clamp<T: Ord + Copy>(value: T, range: RangeInclusive<T>) -> T {
    value.clamp(*range.start(), *range.end())
}

/// Snaps to the nearest half step.
fn clamp_bathrooms(value: f64) -> f64 {
    if value.is_nan() {
        return PropertyInput::default().bathrooms;
    }
    ((value * 2.0).round() / 2.0).clamp(*BATHROOMS.start(), *BATHROOMS.end())
}

/// Bathroom counts offered in the form.
pub fn bathroom_options() -> impl Iterator<Item = f64> {
    (1..=10).map(|halves| f64::from(halves) / 2.0)
}
