//! Costing EOL pathways and choosing between them.
use super::{ChosenPathway, TransportCosts, WindPlantOwner};
use crate::destination::{DestinationID, DestinationKind, DestinationMap, sites_of_kind};
use crate::distance::DistanceTable;
use crate::model::ModelParameters;
use crate::pathway::{
    PathwayCost, PathwayID, ProcessCostRegistry, ProcessCostUpdates, TransportMode,
    minimum_tr_proc_costs,
};
use crate::units::MoneyPerMass;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use log::{info, warn};

/// The shared data a plant uses when deciding what to do with its blades
pub struct DecommissioningContext<'a> {
    /// Recyclers, landfills and developers
    pub destinations: &'a DestinationMap,
    /// Road distances between locations
    pub distances: &'a DistanceTable,
    /// Current process costs for every pathway
    pub registry: &'a mut ProcessCostRegistry,
    /// Process costs published by recyclers
    pub recyclers_update: &'a ProcessCostUpdates,
    /// Process costs published by landfills
    pub landfills_update: &'a ProcessCostUpdates,
    /// Model parameters
    pub parameters: &'a ModelParameters,
}

impl WindPlantOwner {
    /// Cost every pathway in the registry for this plant.
    ///
    /// The updates are first merged into the registry. Each pathway then costs the cheapest of its
    /// destinations, using the transport costs for its transport mode, plus
    /// `decommissioning_cost`. Only transport costs to destinations which quote process costs for
    /// the pathway are considered.
    pub fn costs_eol_pathways(
        &self,
        transport: &TransportCosts,
        registry: &mut ProcessCostRegistry,
        recyclers_update: &ProcessCostUpdates,
        landfills_update: &ProcessCostUpdates,
        developers_update: &ProcessCostUpdates,
        decommissioning_cost: MoneyPerMass,
    ) -> Result<IndexMap<PathwayID, PathwayCost>> {
        registry.merge(DestinationKind::Recycler, recyclers_update)?;
        registry.merge(DestinationKind::Landfill, landfills_update)?;
        registry.merge(DestinationKind::Developer, developers_update)?;

        let mut costs = IndexMap::new();
        for pathway in registry.iter() {
            let transport_costs: Vec<(&DestinationID, &MoneyPerMass)> =
                match &pathway.transport_mode {
                    TransportMode::Shred => transport.shred.iter().collect(),
                    TransportMode::Segment => transport.segment.iter().collect(),
                    TransportMode::Repair => transport.repair.iter().collect(),
                    TransportMode::Unrecognised(tag) => {
                        warn!(
                            "Plant {}: pathway {} has unrecognised transport mode '{tag}'; using \
                            shred and segment transport costs",
                            self.unique_id, pathway.id
                        );
                        transport.shred.iter().chain(&transport.segment).collect()
                    }
                };
            let transport_costs = transport_costs
                .into_iter()
                .filter(|(destination, _)| pathway.process_costs.contains_key(*destination));

            let mut cost = minimum_tr_proc_costs(&pathway.process_costs, transport_costs)
                .with_context(|| format!("Cannot cost pathway {}", pathway.id))?;
            cost.cost += decommissioning_cost;
            costs.insert(pathway.id.clone(), cost);
        }

        Ok(costs)
    }

    /// Choose the cheapest pathway. The first of equally cheap pathways wins.
    pub fn choose_eol_pathway(
        &mut self,
        costs: &IndexMap<PathwayID, PathwayCost>,
        registry: &ProcessCostRegistry,
    ) -> Result<&ChosenPathway> {
        let (pathway_id, best) = costs
            .iter()
            .reduce(|best, candidate| {
                if candidate.1.cost < best.1.cost {
                    candidate
                } else {
                    best
                }
            })
            .context("No EOL pathways to choose from")?;
        let pathway = registry
            .get(pathway_id)
            .with_context(|| format!("Unknown pathway {pathway_id}"))?;

        Ok(self.chosen_pathway.insert(ChosenPathway {
            pathway: pathway_id.clone(),
            kind: pathway.kind,
            destination: best.destination.clone(),
            cost: best.cost,
        }))
    }

    /// Decide what happens to the plant's blades.
    ///
    /// Finds distances and transport costs to every destination, costs every pathway and chooses
    /// the cheapest. This only happens once per plant; later calls return `false` and do nothing.
    pub fn decommission(&mut self, ctx: &mut DecommissioningContext) -> Result<bool> {
        if self.decommissioning {
            return Ok(false);
        }

        let recyclers = sites_of_kind(ctx.destinations, DestinationKind::Recycler);
        let landfills = sites_of_kind(ctx.destinations, DestinationKind::Landfill);
        let developers = sites_of_kind(ctx.destinations, DestinationKind::Developer);
        let mut distances = self.eol_distances(&recyclers, &landfills, ctx.distances)?;
        distances.extend(self.repair_distances(&developers, ctx.distances)?);

        let transport =
            self.eol_transportation_costs(ctx.destinations, &distances, ctx.parameters)?;
        let costs = self.costs_eol_pathways(
            &transport,
            ctx.registry,
            ctx.recyclers_update,
            ctx.landfills_update,
            &self.developer_costs,
            ctx.parameters.decommissioning_cost,
        )?;
        let plant_id = self.unique_id;
        let chosen = self.choose_eol_pathway(&costs, ctx.registry)?;
        info!(
            "Plant {plant_id} chose pathway {} to {} at {} per tonne",
            chosen.pathway, chosen.destination, chosen.cost
        );
        self.decommissioning = true;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, model, pathway_registry, plant};
    use crate::model::Model;
    use crate::pathway::{CostCurvePoint, Pathway};
    use crate::units::Distance;
    use float_cmp::assert_approx_eq;
    use indexmap::indexmap;
    use itertools::assert_equal;
    use rstest::rstest;

    fn point(destination: &str, cost: f64) -> CostCurvePoint {
        CostCurvePoint {
            destination: destination.into(),
            quantity: 1.0,
            cost: MoneyPerMass(cost),
        }
    }

    fn transport() -> TransportCosts {
        TransportCosts {
            shred: indexmap! {
                "rec1".into() => MoneyPerMass(40.0),
                "rec2".into() => MoneyPerMass(5.0),
                "land1".into() => MoneyPerMass(8.0),
            },
            segment: indexmap! {
                "rec1".into() => MoneyPerMass(25.0),
                "land1".into() => MoneyPerMass(12.0),
            },
            repair: IndexMap::new(),
        }
    }

    #[rstest]
    fn test_costs_eol_pathways_adds_decommissioning_cost(
        plant: WindPlantOwner,
        mut pathway_registry: ProcessCostRegistry,
    ) {
        let none = ProcessCostUpdates::new();
        let costs = plant
            .costs_eol_pathways(
                &transport(),
                &mut pathway_registry,
                &none,
                &none,
                &none,
                MoneyPerMass(100.0),
            )
            .unwrap();

        // mechanical: rec1 = 40 + 100, rec2 = 5 + 140; landfill: land1 = 8 + 30
        assert_equal(
            costs.keys(),
            [&PathwayID::new("mechanical"), &PathwayID::new("landfill")],
        );
        assert_eq!(costs["mechanical"].destination, "rec1".into());
        assert_approx_eq!(MoneyPerMass, costs["mechanical"].cost, MoneyPerMass(240.0));
        assert_approx_eq!(MoneyPerMass, costs["landfill"].cost, MoneyPerMass(138.0));
    }

    #[rstest]
    fn test_costs_eol_pathways_ignores_transport_to_other_destinations(
        plant: WindPlantOwner,
        mut pathway_registry: ProcessCostRegistry,
    ) {
        // Getting shredded blades to the landfill is free, but mechanical recycling is not
        // offered there
        let mut transport = transport();
        transport.shred.insert("land1".into(), MoneyPerMass(0.0));
        let none = ProcessCostUpdates::new();
        let costs = plant
            .costs_eol_pathways(
                &transport,
                &mut pathway_registry,
                &none,
                &none,
                &none,
                MoneyPerMass(0.0),
            )
            .unwrap();

        assert_eq!(costs["mechanical"].destination, "rec1".into());
        assert_approx_eq!(MoneyPerMass, costs["mechanical"].cost, MoneyPerMass(140.0));
        assert_eq!(costs["landfill"].destination, "land1".into());
        assert_approx_eq!(MoneyPerMass, costs["landfill"].cost, MoneyPerMass(30.0));
    }

    #[rstest]
    fn test_costs_eol_pathways_merges_updates(
        plant: WindPlantOwner,
        mut pathway_registry: ProcessCostRegistry,
    ) {
        let recyclers_update = indexmap! {
            "mechanical".into() => indexmap! { "rec2".into() => vec![point("rec2", 10.0)] },
        };
        let none = ProcessCostUpdates::new();
        let costs = plant
            .costs_eol_pathways(
                &transport(),
                &mut pathway_registry,
                &recyclers_update,
                &none,
                &none,
                MoneyPerMass(0.0),
            )
            .unwrap();

        assert_eq!(costs["mechanical"].destination, "rec2".into());
        assert_approx_eq!(MoneyPerMass, costs["mechanical"].cost, MoneyPerMass(15.0));
    }

    #[rstest]
    fn test_costs_eol_pathways_wrong_kind(
        plant: WindPlantOwner,
        mut pathway_registry: ProcessCostRegistry,
    ) {
        let landfills_update = indexmap! {
            "mechanical".into() => indexmap! { "land1".into() => vec![point("land1", 1.0)] },
        };
        let none = ProcessCostUpdates::new();
        assert_error!(
            plant.costs_eol_pathways(
                &transport(),
                &mut pathway_registry,
                &none,
                &landfills_update,
                &none,
                MoneyPerMass(0.0),
            ),
            "Pathway mechanical is offered by a recycler, not a landfill"
        );
    }

    #[rstest]
    fn test_costs_eol_pathways_unrecognised_mode(plant: WindPlantOwner) {
        let mut registry = ProcessCostRegistry::new(indexmap! {
            "rail".into() => Pathway {
                id: "rail".into(),
                description: "Rail freight".into(),
                kind: DestinationKind::Landfill,
                transport_mode: TransportMode::Unrecognised("rail".into()),
                process_costs: indexmap! { "land1".into() => vec![point("land1", 30.0)] },
            }
        });
        let none = ProcessCostUpdates::new();
        let costs = plant
            .costs_eol_pathways(
                &transport(),
                &mut registry,
                &none,
                &none,
                &none,
                MoneyPerMass(0.0),
            )
            .unwrap();

        // Shred and segment costs are both counted: 8 + 12 + 30
        assert_approx_eq!(MoneyPerMass, costs["rail"].cost, MoneyPerMass(50.0));
    }

    #[rstest]
    fn test_choose_eol_pathway(mut plant: WindPlantOwner, pathway_registry: ProcessCostRegistry) {
        let cost = |destination: &str, cost: f64| PathwayCost {
            destination: destination.into(),
            cost: MoneyPerMass(cost),
        };
        let costs = indexmap! {
            "mechanical".into() => cost("rec1", 50.0),
            "landfill".into() => cost("land1", 50.0),
        };

        let chosen = plant.choose_eol_pathway(&costs, &pathway_registry).unwrap();
        assert_eq!(chosen.pathway, "mechanical".into());
        assert_eq!(chosen.kind, DestinationKind::Recycler);
        assert!(plant.chosen_pathway.is_some());

        assert_error!(
            plant.choose_eol_pathway(&IndexMap::new(), &pathway_registry),
            "No EOL pathways to choose from"
        );
    }

    #[rstest]
    fn test_decommission(mut plant: WindPlantOwner, model: Model) {
        let mut registry = model.process_cost_registry();
        let recyclers_update = model.process_costs_of_kind(DestinationKind::Recycler);
        let landfills_update = model.process_costs_of_kind(DestinationKind::Landfill);
        let mut ctx = DecommissioningContext {
            destinations: &model.destinations,
            distances: &model.distances,
            registry: &mut registry,
            recyclers_update: &recyclers_update,
            landfills_update: &landfills_update,
            parameters: &model.parameters,
        };

        assert!(plant.decommission(&mut ctx).unwrap());
        assert!(plant.decommissioning);
        assert!(plant.chosen_pathway.is_some());
        assert_eq!(plant.eol_distances["dev1"], Distance(50.0));

        // Only happens once
        let chosen = plant.chosen_pathway.clone();
        assert!(!plant.decommission(&mut ctx).unwrap());
        assert_eq!(plant.chosen_pathway, chosen);
    }
}
