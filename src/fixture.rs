//! Fixtures for tests

use crate::curve::{LifetimeCurveMap, WeibullCurve};
use crate::destination::{Destination, DestinationKind, DestinationMap, LocationID, TransportRates};
use crate::distance::DistanceTable;
use crate::id::PlantID;
use crate::model::{Model, ModelParameters};
use crate::pathway::{
    CostCurvePoint, Pathway, PathwayMap, ProcessCostMap, ProcessCostRegistry, TransportMode,
};
use crate::plant::{PlantParameters, WindPlantOwner};
use crate::report::{Baseline, ReportBuffer, ReportVariable};
use crate::simulation::schedule::{Scheduler, SpatialIndex};
use crate::units::{
    Capacity, Distance, Length, MoneyPerBlade, MoneyPerDistance, MoneyPerMass,
    MoneyPerMassPerDistance,
};
use indexmap::{IndexSet, indexmap};
use rstest::fixture;
use std::path::PathBuf;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// A collaborator which only counts how many times a plant was removed from it
#[derive(Debug, Default)]
pub struct CountingCollaborator {
    pub removals: u32,
}

impl Scheduler for CountingCollaborator {
    fn remove(&mut self, _plant: PlantID) {
        self.removals += 1;
    }
}

impl SpatialIndex for CountingCollaborator {
    fn position(&self, _plant: PlantID) -> Option<&LocationID> {
        None
    }

    fn remove_agent(&mut self, _plant: PlantID) {
        self.removals += 1;
    }
}

impl ReportBuffer for CountingCollaborator {
    fn record_baseline(&mut self, _plant: PlantID, _baseline: Baseline) {}

    fn add(&mut self, _variable: ReportVariable, _value: f64) {}

    fn remove(&mut self, _plant: PlantID) {
        self.removals += 1;
    }
}

fn haulage_destination(id: &str, kind: DestinationKind, sites: &[&str]) -> Destination {
    Destination {
        id: id.into(),
        description: format!("{kind} {id}"),
        kind,
        sites: sites.iter().map(|&site| site.into()).collect(),
        rates: TransportRates::Haulage {
            shredding_cost: MoneyPerMass(30.0),
            shred_transport_cost: MoneyPerMassPerDistance(0.1),
            cutting_cost: MoneyPerMass(20.0),
            segment_transport_cost: MoneyPerDistance(4.0),
        },
    }
}

#[fixture]
pub fn destinations() -> DestinationMap {
    let developer = Destination {
        id: "dev1".into(),
        description: "Blade repair workshop".into(),
        kind: DestinationKind::Developer,
        sites: IndexSet::from(["cell_e".into()]),
        rates: TransportRates::Repair {
            transport_cost: MoneyPerMassPerDistance(0.2),
        },
    };

    [
        haulage_destination("rec1", DestinationKind::Recycler, &["cell_b", "cell_c"]),
        haulage_destination("rec2", DestinationKind::Recycler, &["cell_d"]),
        haulage_destination("land1", DestinationKind::Landfill, &["cell_b"]),
        developer,
    ]
    .into_iter()
    .map(|destination| (destination.id.clone(), destination))
    .collect()
}

#[fixture]
pub fn distances() -> DistanceTable {
    let mut distances = DistanceTable::new();
    for (site, distance) in [
        ("cell_b", 20.0),
        ("cell_c", 20.0),
        ("cell_d", 30.0),
        ("cell_e", 50.0),
    ] {
        distances.insert("cell_a".into(), site.into(), Distance(distance));
    }

    distances
}

fn cost_curve(destination: &str, cost: f64) -> Vec<CostCurvePoint> {
    vec![CostCurvePoint {
        destination: destination.into(),
        quantity: 1.0,
        cost: MoneyPerMass(cost),
    }]
}

fn pathway(id: &str, kind: DestinationKind, transport_mode: TransportMode) -> Pathway {
    Pathway {
        id: id.into(),
        description: format!("{id} pathway"),
        kind,
        transport_mode,
        process_costs: ProcessCostMap::new(),
    }
}

#[fixture]
pub fn pathways() -> PathwayMap {
    [
        pathway(
            "mechanical",
            DestinationKind::Recycler,
            TransportMode::Shred,
        ),
        pathway("landfill", DestinationKind::Landfill, TransportMode::Shred),
        pathway("repair", DestinationKind::Developer, TransportMode::Repair),
    ]
    .into_iter()
    .map(|pathway| (pathway.id.clone(), pathway))
    .collect()
}

/// A registry of recycler and landfill pathways with their process costs
#[fixture]
pub fn pathway_registry() -> ProcessCostRegistry {
    let mut mechanical = pathway(
        "mechanical",
        DestinationKind::Recycler,
        TransportMode::Shred,
    );
    mechanical.process_costs = indexmap! {
        "rec1".into() => cost_curve("rec1", 100.0),
        "rec2".into() => cost_curve("rec2", 140.0),
    };
    let mut landfill = pathway("landfill", DestinationKind::Landfill, TransportMode::Shred);
    landfill.process_costs = indexmap! { "land1".into() => cost_curve("land1", 30.0) };

    ProcessCostRegistry::new(indexmap! {
        mechanical.id.clone() => mechanical,
        landfill.id.clone() => landfill,
    })
}

#[fixture]
pub fn model(
    destinations: DestinationMap,
    distances: DistanceTable,
    pathways: PathwayMap,
) -> Model {
    let plant_parameters = PlantParameters {
        rotor_diameter: Length(80.0),
        blades_per_rotor: 3,
        capacity: Capacity(2.0),
        lifetime: 20,
        curve_id: "standard".into(),
    };
    let lifetime_curves: LifetimeCurveMap = indexmap! {
        "standard".into() => WeibullCurve {
            id: "standard".into(),
            scale: 20.0,
            shape: 2.5,
        }
    };

    Model {
        model_path: PathBuf::from("model"),
        parameters: ModelParameters {
            start_year: 2020,
            end_year: 2025,
            mass_coefficient: 0.5,
            mass_power: 2.0,
            decommissioning_cost: MoneyPerMass(100.0),
            segments_per_truck: 3.0,
            segment_length: Length(15.0),
            removal_threshold: Capacity(0.01),
        },
        plant_parameters: indexmap! { PlantID(1) => plant_parameters },
        plant_locations: indexmap! { PlantID(1) => "cell_a".into() },
        commissioning_years: indexmap! { PlantID(1) => 2005 },
        destinations,
        pathways,
        process_costs: indexmap! {
            "mechanical".into() => indexmap! {
                "rec1".into() => cost_curve("rec1", 100.0),
                "rec2".into() => cost_curve("rec2", 140.0),
            },
            "landfill".into() => indexmap! { "land1".into() => cost_curve("land1", 30.0) },
        },
        developer_costs: indexmap! {
            "repair".into() => indexmap! {
                "dev1".into() => vec![CostCurvePoint {
                    destination: "dev1".into(),
                    quantity: 1.0,
                    cost: MoneyPerBlade(600.0),
                }],
            },
        },
        distances,
        lifetime_curves,
    }
}

/// The plant with ID 1 from the [`model`] fixture
#[fixture]
pub fn plant(model: Model) -> WindPlantOwner {
    let parameters = model.plant_parameters[&PlantID(1)].clone();
    WindPlantOwner::new(PlantID(1), parameters, &model).unwrap()
}
