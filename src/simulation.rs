//! Functionality for running the simulation.
use crate::destination::DestinationKind;
use crate::id::PlantID;
use crate::model::Model;
use crate::output::DataWriter;
use crate::plant::{
    AgentState, Collaborators, DecommissioningContext, StepContext, WindPlantOwner,
};
use crate::report::Report;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use itertools::Itertools;
use log::info;
use std::path::Path;

pub mod schedule;
use schedule::{Schedule, SpatialGrid};

/// Create an owner for every plant in the model
pub fn create_plants(model: &Model) -> Result<IndexMap<PlantID, WindPlantOwner>> {
    model
        .plant_parameters
        .iter()
        .map(|(id, parameters)| {
            WindPlantOwner::new(*id, parameters.clone(), model).map(|plant| (*id, plant))
        })
        .try_collect()
}

/// Run the simulation.
///
/// Each year every scheduled plant is stepped in turn. On its first step a plant reports and
/// retires capacity as part of [`WindPlantOwner::step`]; in later years the same happens here,
/// followed by a removal check. Once a plant is past its useful life it chooses an EOL pathway.
/// A removed plant is not aged, decommissioned or written out again.
///
/// # Arguments:
///
/// * `model` - The model to run
/// * `output_path` - The folder to which output files will be written
/// * `debug_model` - Whether to write additional information (e.g. EOL distances) to CSV files
pub fn run(model: &Model, output_path: &Path, debug_model: bool) -> Result<()> {
    let mut writer = DataWriter::create(output_path, debug_model)?;

    let mut plants = create_plants(model)?;
    let mut schedule = Schedule::new(plants.keys().copied());
    let mut grid = SpatialGrid::new(model.plant_locations.clone());
    let mut report = Report::new();
    let mut registry = model.process_cost_registry();
    let recyclers_update = model.process_costs_of_kind(DestinationKind::Recycler);
    let landfills_update = model.process_costs_of_kind(DestinationKind::Landfill);

    for year in model.iter_years() {
        info!("Year: {year} ({} plants active)", schedule.len());

        for id in schedule.ids().collect_vec() {
            let plant = plants
                .get_mut(&id)
                .with_context(|| format!("Scheduled plant {id} does not exist"))?;

            if plant.has_run_first_step {
                plant.update_agent_variables_every_or_specific_step(&model.lifetime_curves)?;
                plant.report_agent_variable_once_or_every_step(&mut report);
                plant.remove_agent(&mut Collaborators {
                    grid: &mut grid,
                    schedule: &mut schedule,
                    report: &mut report,
                });
                if plant.state == AgentState::Removed {
                    continue;
                }
            }

            plant.step(&mut StepContext {
                collaborators: Collaborators {
                    grid: &mut grid,
                    schedule: &mut schedule,
                    report: &mut report,
                },
                curves: &model.lifetime_curves,
            })?;
            if plant.state == AgentState::Removed {
                continue;
            }

            if plant.past_useful_life {
                let mut ctx = DecommissioningContext {
                    destinations: &model.destinations,
                    distances: &model.distances,
                    registry: &mut registry,
                    recyclers_update: &recyclers_update,
                    landfills_update: &landfills_update,
                    parameters: &model.parameters,
                };
                if plant.decommission(&mut ctx)? {
                    writer.write_pathway_choice(year, plant)?;
                }
            }

            writer.write_plant(year, plant)?;
        }

        writer.write_report_totals(year, &report.take_totals())?;
        writer.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::model;
    use crate::units::Capacity;
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    fn test_create_plants(model: Model) {
        let plants = create_plants(&model).unwrap();
        assert_eq!(plants.len(), 1);
        assert_eq!(plants[&PlantID(1)].state, AgentState::Active);
    }

    #[rstest]
    fn test_run(model: Model) {
        let dir = tempdir().unwrap();
        run(&model, dir.path(), true).unwrap();

        for file_name in [
            "plants.csv",
            "pathway_choices.csv",
            "report_totals.csv",
            "debug_eol_distances.csv",
        ] {
            assert!(dir.path().join(file_name).is_file());
        }

        // One row per plant per year
        let rows = csv::Reader::from_path(dir.path().join("plants.csv"))
            .unwrap()
            .records()
            .count();
        assert_eq!(rows, model.iter_years().count());
    }

    #[rstest]
    fn test_run_removed_plant_is_not_stepped(mut model: Model) {
        // The plant's whole capacity is below the threshold, so it is removed on its first step
        model.parameters.removal_threshold = Capacity(5.0);
        model.commissioning_years.insert(PlantID(1), 1995);

        let dir = tempdir().unwrap();
        run(&model, dir.path(), false).unwrap();

        for file_name in ["plants.csv", "pathway_choices.csv"] {
            let rows = csv::Reader::from_path(dir.path().join(file_name))
                .unwrap()
                .records()
                .count();
            assert_eq!(rows, 0, "{file_name} has rows for a removed plant");
        }
    }
}
