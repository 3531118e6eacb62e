//! Defines the `ModelParameters` struct, which represents the contents of `model.toml`.
use crate::input::{input_err_msg, read_toml};
use crate::units::{Capacity, Length, MoneyPerMass};
use anyhow::{Context, Result, ensure};
use log::warn;
use serde::Deserialize;
use std::path::Path;

const MODEL_PARAMETERS_FILE_NAME: &str = "model.toml";

macro_rules! define_unit_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            <$type>::new($value)
        }
    };
}

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_unit_param_default!(default_removal_threshold, Capacity, 0.01);
define_unit_param_default!(default_segment_length, Length, 15.0);
define_param_default!(default_segments_per_truck, f64, 3.0);

/// Represents the contents of the entire model file.
#[derive(Debug, Deserialize, PartialEq)]
pub struct ModelParameters {
    /// The first simulated year
    pub start_year: u32,
    /// The last simulated year (inclusive)
    pub end_year: u32,
    /// Coefficient of the power law relating blade radius to blade mass
    pub mass_coefficient: f64,
    /// Exponent of the power law relating blade radius to blade mass
    pub mass_power: f64,
    /// Fixed cost of decommissioning added to every pathway
    pub decommissioning_cost: MoneyPerMass,
    /// Number of blade segments a truck can carry
    #[serde(default = "default_segments_per_truck")]
    pub segments_per_truck: f64,
    /// Length of each blade segment
    #[serde(default = "default_segment_length")]
    pub segment_length: Length,
    /// Plants whose remaining capacity falls below this are removed from the simulation
    #[serde(default = "default_removal_threshold")]
    pub removal_threshold: Capacity,
}

/// Check that the simulated years are valid
fn check_years(start_year: u32, end_year: u32) -> Result<()> {
    ensure!(
        start_year <= end_year,
        "`start_year` must not be after `end_year`"
    );

    Ok(())
}

/// Check that the blade mass power law is valid
fn check_mass_law(coefficient: f64, power: f64) -> Result<()> {
    ensure!(
        coefficient.is_finite() && coefficient > 0.0,
        "mass_coefficient must be a finite number greater than zero"
    );
    ensure!(power.is_finite(), "mass_power must be a finite number");

    Ok(())
}

/// Check that the segment transport parameters are valid
fn check_segments(segments_per_truck: f64, segment_length: Length) -> Result<()> {
    ensure!(
        segments_per_truck.is_finite() && segments_per_truck > 0.0,
        "segments_per_truck must be a finite number greater than zero"
    );
    ensure!(
        segment_length.is_finite() && segment_length > Length(0.0),
        "segment_length must be a finite number greater than zero"
    );

    Ok(())
}

/// Check that the `removal_threshold` parameter is valid
fn check_removal_threshold(value: Capacity) -> Result<()> {
    ensure!(
        value.is_finite() && value >= Capacity(0.0),
        "removal_threshold must be a finite, non-negative number"
    );

    Ok(())
}

impl ModelParameters {
    /// Read a model file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - Folder containing model configuration files
    ///
    /// # Returns
    ///
    /// The model file contents as a [`ModelParameters`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(model_dir: P) -> Result<ModelParameters> {
        let file_path = model_dir.as_ref().join(MODEL_PARAMETERS_FILE_NAME);
        let model_params: ModelParameters = read_toml(&file_path)?;

        model_params
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(model_params)
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<()> {
        check_years(self.start_year, self.end_year)?;
        check_mass_law(self.mass_coefficient, self.mass_power)?;
        check_segments(self.segments_per_truck, self.segment_length)?;
        check_removal_threshold(self.removal_threshold)?;

        // decommissioning_cost
        ensure!(
            self.decommissioning_cost.is_finite(),
            "decommissioning_cost must be a finite number"
        );
        if self.decommissioning_cost < MoneyPerMass(0.0) {
            warn!(
                "decommissioning_cost is negative ({}); pathway costs will be reduced by it",
                self.decommissioning_cost
            );
        }

        Ok(())
    }
}
