//! Code for reading lifetime curves from a CSV file.
use super::*;
use crate::curve::{LifetimeCurveMap, WeibullCurve};
use crate::utils::try_insert;
use std::path::Path;

const LIFETIME_CURVES_FILE_NAME: &str = "lifetime_curves.csv";

/// Read lifetime curves from the model directory.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
///
/// # Returns
///
/// A map of [`WeibullCurve`]s, keyed by curve ID, or an error.
pub fn read_lifetime_curves(model_dir: &Path) -> Result<LifetimeCurveMap> {
    let file_path = model_dir.join(LIFETIME_CURVES_FILE_NAME);
    let curves_csv = read_csv(&file_path)?;
    read_lifetime_curves_from_iter(curves_csv).with_context(|| input_err_msg(&file_path))
}

fn read_lifetime_curves_from_iter<I>(iter: I) -> Result<LifetimeCurveMap>
where
    I: Iterator<Item = WeibullCurve>,
{
    let mut curves = LifetimeCurveMap::new();
    for curve in iter {
        curve.validate()?;
        try_insert(&mut curves, curve.id.clone(), curve)?;
    }

    Ok(curves)
}
