//! The module responsible for writing output data to disk.
use crate::destination::{DestinationID, DestinationKind};
use crate::id::PlantID;
use crate::pathway::PathwayID;
use crate::plant::WindPlantOwner;
use crate::report::ReportVariable;
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

pub mod metadata;

/// The root folder in which model-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "windeol_results";

/// The output file name for plant state
const PLANTS_FILE_NAME: &str = "plants.csv";

/// The output file name for chosen pathways
const PATHWAY_CHOICES_FILE_NAME: &str = "pathway_choices.csv";

/// The output file name for yearly report totals
const REPORT_TOTALS_FILE_NAME: &str = "report_totals.csv";

/// The output file name for the distances plants considered when decommissioning
const EOL_DISTANCES_FILE_NAME: &str = "debug_eol_distances.csv";

/// Get the default output directory for the model specified at `model_dir`
pub fn get_output_dir(model_dir: &Path) -> Result<PathBuf> {
    // Get the model name from the dir path. This ends up being convoluted because we need to check
    // for all possible errors. Ugh.
    let model_dir = model_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to model")?;

    let model_name = model_dir
        .file_name()
        .context("Model cannot be in root folder")?
        .to_str()
        .context("Invalid chars in model dir name")?;

    // Construct path
    Ok([OUTPUT_DIRECTORY_ROOT, model_name].iter().collect())
}

/// Create a new output directory.
///
/// If the directory already exists and is not empty, it is only reused when `allow_overwrite` is
/// set, in which case its contents are deleted.
///
/// # Returns
///
/// Whether an existing directory was overwritten.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let overwrite = if let Ok(mut it) = fs::read_dir(output_dir) {
        if it.next().is_none() {
            // Folder exists and is empty: nothing to do
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder {} already exists and is not empty. Use --overwrite to replace it.",
            output_dir.display()
        );

        // Delete the old folder
        fs::remove_dir_all(output_dir)?;
        true
    } else {
        false
    };

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Represents a row in the plants CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct PlantRow {
    year: u32,
    plant_id: PlantID,
    age: u32,
    remaining_capacity: f64,
    waste_mass: f64,
    eol_cost: f64,
    past_useful_life: bool,
    decommissioning: bool,
    state: String,
}

impl PlantRow {
    fn new(year: u32, plant: &WindPlantOwner) -> Self {
        Self {
            year,
            plant_id: plant.unique_id,
            age: plant.age,
            remaining_capacity: plant.remaining_capacity.value(),
            waste_mass: plant.waste_mass.value(),
            eol_cost: plant.eol_cost.value(),
            past_useful_life: plant.past_useful_life,
            decommissioning: plant.decommissioning,
            state: plant.state.to_string(),
        }
    }
}

/// Represents a row in the pathway choices CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct PathwayChoiceRow {
    year: u32,
    plant_id: PlantID,
    pathway_id: PathwayID,
    kind: DestinationKind,
    destination_id: DestinationID,
    cost: f64,
}

/// Represents a row in the report totals CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ReportTotalRow {
    year: u32,
    variable: String,
    value: f64,
}

/// Represents a row in the EOL distances CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct EolDistanceRow {
    year: u32,
    plant_id: PlantID,
    destination_id: DestinationID,
    distance: f64,
}

/// An object for writing simulation results to file
pub struct DataWriter {
    plants_writer: csv::Writer<File>,
    pathway_choices_writer: csv::Writer<File>,
    report_totals_writer: csv::Writer<File>,
    eol_distances_writer: Option<csv::Writer<File>>,
}

impl DataWriter {
    /// Open CSV files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    /// * `save_debug_info` - Whether to include extra CSV files for debugging model
    pub fn create(output_path: &Path, save_debug_info: bool) -> Result<Self> {
        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(file_path)
        };

        let eol_distances_writer = if save_debug_info {
            Some(new_writer(EOL_DISTANCES_FILE_NAME)?)
        } else {
            None
        };

        Ok(Self {
            plants_writer: new_writer(PLANTS_FILE_NAME)?,
            pathway_choices_writer: new_writer(PATHWAY_CHOICES_FILE_NAME)?,
            report_totals_writer: new_writer(REPORT_TOTALS_FILE_NAME)?,
            eol_distances_writer,
        })
    }

    /// Write the state of a plant at the end of a year
    pub fn write_plant(&mut self, year: u32, plant: &WindPlantOwner) -> Result<()> {
        self.plants_writer.serialize(PlantRow::new(year, plant))?;

        Ok(())
    }

    /// Write the pathway a plant has chosen, along with debug info if enabled
    pub fn write_pathway_choice(&mut self, year: u32, plant: &WindPlantOwner) -> Result<()> {
        let chosen = plant
            .chosen_pathway
            .as_ref()
            .with_context(|| format!("Plant {} has not chosen a pathway", plant.unique_id))?;
        self.pathway_choices_writer.serialize(PathwayChoiceRow {
            year,
            plant_id: plant.unique_id,
            pathway_id: chosen.pathway.clone(),
            kind: chosen.kind,
            destination_id: chosen.destination.clone(),
            cost: chosen.cost.value(),
        })?;

        if let Some(wtr) = &mut self.eol_distances_writer {
            for (destination_id, distance) in &plant.eol_distances {
                wtr.serialize(EolDistanceRow {
                    year,
                    plant_id: plant.unique_id,
                    destination_id: destination_id.clone(),
                    distance: distance.value(),
                })?;
            }
        }

        Ok(())
    }

    /// Write the report totals for a year
    pub fn write_report_totals(
        &mut self,
        year: u32,
        totals: &IndexMap<ReportVariable, f64>,
    ) -> Result<()> {
        for (variable, value) in totals {
            self.report_totals_writer.serialize(ReportTotalRow {
                year,
                variable: variable.to_string(),
                value: *value,
            })?;
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.plants_writer.flush()?;
        self.pathway_choices_writer.flush()?;
        self.report_totals_writer.flush()?;
        if let Some(wtr) = &mut self.eol_distances_writer {
            wtr.flush()?;
        }

        Ok(())
    }
}
