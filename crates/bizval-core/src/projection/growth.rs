use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::model::DcfAssumptions;
use crate::types::Rate;

/// Year of the second growth anchor; the curve is flat from here on.
pub const PLATEAU_YEAR: u32 = 5;

/// Annual revenue-growth curve defined by a year-1 and a year-5 anchor.
///
/// Linear between the anchors, flat at the year-5 rate afterwards. Years
/// below 1 clamp to the year-1 anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthCurve {
    pub year_1: Rate,
    pub year_5: Rate,
}

impl GrowthCurve {
    pub fn new(year_1: Rate, year_5: Rate) -> Self {
        Self { year_1, year_5 }
    }

    pub fn from_assumptions(assumptions: &DcfAssumptions) -> Self {
        Self::new(assumptions.growth_year_1, assumptions.growth_year_5)
    }

    pub fn rate_for_year(&self, year: u32) -> Rate {
        rate_for_year(year, self.year_1, self.year_5)
    }
}

/// Interpolated growth rate for `year`:
/// `g1 + (g5 - g1) * (year - 1) / 4` for years 1 to 4, `g5` from year 5.
pub fn rate_for_year(year: u32, growth_year_1: Rate, growth_year_5: Rate) -> Rate {
    if year <= 1 {
        return growth_year_1;
    }
    if year >= PLATEAU_YEAR {
        return growth_year_5;
    }
    // Weighted form of the interpolation: neither term exceeds its anchor
    let step = Decimal::from(year - 1) / dec!(4);
    (growth_year_1 * (Decimal::ONE - step)).saturating_add(growth_year_5 * step)
}
