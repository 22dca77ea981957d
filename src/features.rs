//! Feature vector the model was trained on.

use serde::Serialize;

use crate::city;
use crate::error::Error;
use crate::property::PropertyInput;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    pub bedrooms: u8,
    pub bathrooms: f64,
    pub sqft_living_above: f64,
    pub sqft_lot: u32,
    pub floors: u8,
    pub view: u8,
    pub condition: u8,
    pub sqft_basement: u32,
    pub yr_built: u16,
    pub yr_renovated: u16,
    pub city: u8,
    pub price_per_sqft: u32,
    pub lot_to_living_ratio: f64,
}

impl FeatureVector {
    /// Column order the model expects.
    pub const NAMES: [&'static str; 13] = [
        "bedrooms",
        "bathrooms",
        "sqft_living_above",
        "sqft_lot",
        "floors",
        "view",
        "condition",
        "sqft_basement",
        "yr_built",
        "yr_renovated",
        "city",
        "price_per_sqft",
        "lot_to_living_ratio",
    ];

    pub fn derive(input: &PropertyInput) -> Result<Self, Error> {
        let city = city::code(&input.city)?;

        let sqft_living_above = (f64::from(input.sqft_living) + f64::from(input.sqft_above)) / 2.0;
        if sqft_living_above == 0.0 {
            return Err(Error::DerivedFeature);
        }
        let lot_to_living_ratio = f64::from(input.sqft_lot) / sqft_living_above;

        Ok(Self {
            bedrooms: input.bedrooms,
            bathrooms: input.bathrooms,
            sqft_living_above,
            sqft_lot: input.sqft_lot,
            floors: input.floors,
            view: input.view,
            condition: input.condition,
            sqft_basement: input.sqft_basement,
            yr_built: input.yr_built,
            yr_renovated: input.yr_renovated,
            city,
            price_per_sqft: input.price_per_sqft,
            lot_to_living_ratio,
        })
    }

    /// Values in the [`FeatureVector::NAMES`] order.
    pub fn to_row(&self) -> [f64; 13] {
        [
            f64::from(self.bedrooms),
            self.bathrooms,
            self.sqft_living_above,
            f64::from(self.sqft_lot),
            f64::from(self.floors),
            f64::from(self.view),
            f64::from(self.condition),
            f64::from(self.sqft_basement),
            f64::from(self.yr_built),
            f64::from(self.yr_renovated),
            f64::from(self.city),
            f64::from(self.price_per_sqft),
            self.lot_to_living_ratio,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::Result;

    fn seattle() -> PropertyInput {
        PropertyInput {
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
            yr_renovated: 0,
            city: "Seattle".to_string(),
            price_per_sqft: 300,
        }
    }

    #[test]
    fn derive_ok() -> Result {
        let features = FeatureVector::derive(&seattle())?;
        assert_eq!(features.sqft_living_above, 2000.0);
        assert_eq!(features.lot_to_living_ratio, 5.0);
        assert_eq!(features.city, 5);
        assert_eq!(features.price_per_sqft, 300);
        assert_eq!(features.yr_renovated, 0);
        Ok(())
    }

    #[test]
    fn sqft_living_above_is_average_ok() -> Result {
        for (sqft_living, sqft_above, sqft_lot) in
            [(1, 0, 7), (1500, 1200, 5000), (10_000, 1, 0), (3, 4, 100_000)]
        {
            let input = PropertyInput {
                sqft_living,
                sqft_above,
                sqft_lot,
                ..seattle()
            };
            let features = FeatureVector::derive(&input)?;
            let expected = (f64::from(sqft_living) + f64::from(sqft_above)) / 2.0;
            assert!((features.sqft_living_above - expected).abs() < f64::EPSILON);
            assert!(
                (features.lot_to_living_ratio - f64::from(sqft_lot) / expected).abs()
                    < f64::EPSILON
            );
        }
        Ok(())
    }

    #[test]
    fn zero_living_area_fails() {
        let input = PropertyInput {
            sqft_living: 0,
            sqft_above: 0,
            ..seattle()
        };
        assert_eq!(FeatureVector::derive(&input), Err(Error::DerivedFeature));
    }

    #[test]
    fn unknown_city_fails() {
        let input = PropertyInput {
            city: "Gotham".to_string(),
            ..seattle()
        };
        assert_eq!(FeatureVector::derive(&input), Err(Error::InvalidCity("Gotham".to_string())));
    }

    #[test]
    fn to_row_follows_names_ok() -> Result {
        let row = FeatureVector::derive(&seattle())?.to_row();
        assert_eq!(
            row,
            [3.0, 2.0, 2000.0, 10000.0, 1.0, 0.0, 3.0, 0.0, 2000.0, 0.0, 5.0, 300.0, 5.0],
        );
        Ok(())
    }
}
