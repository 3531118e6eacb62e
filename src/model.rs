//! The model represents the static input data provided by the user.
use crate::curve::LifetimeCurveMap;
use crate::destination::{DestinationKind, DestinationMap, LocationID};
use crate::distance::DistanceTable;
use crate::id::PlantID;
use crate::pathway::{PathwayMap, ProcessCostRegistry, ProcessCostUpdates};
use crate::plant::PlantParameters;
use crate::units::MoneyPerBlade;
use indexmap::IndexMap;
use std::ops::RangeInclusive;
use std::path::PathBuf;

pub mod parameters;
pub use parameters::ModelParameters;

/// Model definition
pub struct Model {
    /// Path to model folder
    pub model_path: PathBuf,
    /// Parameters from the model TOML file
    pub parameters: ModelParameters,
    /// Physical and lifecycle parameters of each wind plant
    pub plant_parameters: IndexMap<PlantID, PlantParameters>,
    /// The grid cell of each wind plant
    pub plant_locations: IndexMap<PlantID, LocationID>,
    /// The year each wind plant was commissioned
    pub commissioning_years: IndexMap<PlantID, u32>,
    /// Recyclers, landfills and developers
    pub destinations: DestinationMap,
    /// EOL pathways, without process costs
    pub pathways: PathwayMap,
    /// Process costs for recycler and landfill pathways
    pub process_costs: ProcessCostUpdates,
    /// Process costs for developer pathways, quoted per blade
    pub developer_costs: ProcessCostUpdates<MoneyPerBlade>,
    /// Road distances between locations
    pub distances: DistanceTable,
    /// Lifetime curves for plants
    pub lifetime_curves: LifetimeCurveMap,
}

impl Model {
    /// Iterate over the model's simulated years
    pub fn iter_years(&self) -> RangeInclusive<u32> {
        self.parameters.start_year..=self.parameters.end_year
    }

    /// Process costs quoted by destinations of the given kind.
    ///
    /// Developer pathways are excluded as their costs are quoted per blade.
    pub fn process_costs_of_kind(&self, kind: DestinationKind) -> ProcessCostUpdates {
        self.process_costs
            .iter()
            .filter(|(id, _)| self.pathways.get(*id).is_some_and(|p| p.kind == kind))
            .map(|(id, costs)| (id.clone(), costs.clone()))
            .collect()
    }

    /// Create a registry holding the initial process costs of all recycler and landfill pathways
    pub fn process_cost_registry(&self) -> ProcessCostRegistry {
        let mut pathways = self.pathways.clone();
        for (id, costs) in &self.process_costs {
            if let Some(pathway) = pathways.get_mut(id) {
                pathway.process_costs = costs.clone();
            }
        }

        ProcessCostRegistry::new(pathways)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::model;
    use crate::pathway::PathwayID;
    use itertools::assert_equal;
    use rstest::rstest;

    #[rstest]
    fn test_iter_years(model: Model) {
        assert_equal(model.iter_years(), 2020..=2025);
    }

    #[rstest]
    fn test_process_costs_of_kind(model: Model) {
        let landfill = model.process_costs_of_kind(DestinationKind::Landfill);
        assert_equal(landfill.keys(), [&PathwayID::new("landfill")]);
        assert!(
            model
                .process_costs_of_kind(DestinationKind::Developer)
                .is_empty()
        );
    }

    #[rstest]
    fn test_process_cost_registry(model: Model) {
        let registry = model.process_cost_registry();
        assert_eq!(registry.len(), model.pathways.len());
        let mechanical = registry.get(&"mechanical".into()).unwrap();
        assert!(mechanical.process_costs.contains_key("rec1"));
    }
}
