//! Lifetime curves give the share of installed capacity reaching end of life in each year.
use crate::id::{define_id_getter, define_id_type};
use crate::units::Dimensionless;
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use serde::Deserialize;

define_id_type! {CurveID}

/// Provides the rate at which installed capacity reaches end of life
pub trait LifetimeCurves {
    /// The fraction of the original capacity which reaches end of life during the year starting
    /// at `age`.
    fn eol_fraction(&self, curve_id: &CurveID, age: f64) -> Result<Dimensionless>;
}

/// A Weibull lifetime distribution
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeibullCurve {
    /// Unique identifier for the curve
    pub id: CurveID,
    /// Scale parameter (years)
    pub scale: f64,
    /// Shape parameter
    pub shape: f64,
}
define_id_getter! {WeibullCurve, CurveID}

impl WeibullCurve {
    /// Check that the parameters describe a valid distribution
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.scale.is_finite() && self.scale > 0.0,
            "Scale of lifetime curve {} must be a finite, positive number",
            self.id
        );
        ensure!(
            self.shape.is_finite() && self.shape > 0.0,
            "Shape of lifetime curve {} must be a finite, positive number",
            self.id
        );

        Ok(())
    }

    /// The fraction of capacity which has reached end of life by `age`
    pub fn cumulative(&self, age: f64) -> f64 {
        if age <= 0.0 {
            return 0.0;
        }

        1.0 - (-(age / self.scale).powf(self.shape)).exp()
    }
}

/// A map of [`WeibullCurve`]s, keyed by curve ID
pub type LifetimeCurveMap = IndexMap<CurveID, WeibullCurve>;

impl LifetimeCurves for LifetimeCurveMap {
    fn eol_fraction(&self, curve_id: &CurveID, age: f64) -> Result<Dimensionless> {
        let curve = self
            .get(curve_id)
            .with_context(|| format!("Unknown lifetime curve {curve_id}"))?;

        Ok(Dimensionless(
            curve.cumulative(age + 1.0) - curve.cumulative(age),
        ))
    }
}
