//! Code for reading EOL pathways and process cost curves from CSV files.
use super::*;
use crate::destination::{DestinationKind, DestinationMap};
use crate::id::IDCollection;
use crate::pathway::{
    CostCurvePoint, Pathway, PathwayID, PathwayMap, ProcessCostMap, ProcessCostUpdates,
    TransportMode,
};
use crate::units::{MoneyPerBlade, MoneyPerMass};
use crate::utils::try_insert;
use anyhow::ensure;
use log::warn;
use serde::Deserialize;
use std::path::Path;

const PATHWAYS_FILE_NAME: &str = "eol_pathways.csv";
const PROCESS_COSTS_FILE_NAME: &str = "process_costs.csv";

#[derive(PartialEq, Debug, Deserialize)]
struct PathwayRaw {
    id: PathwayID,
    description: String,
    kind: DestinationKind,
    transport_mode: TransportMode,
}

#[derive(PartialEq, Debug, Deserialize)]
struct ProcessCostRaw {
    pathway_id: String,
    destination_id: String,
    quantity: f64,
    cost: f64,
}

/// EOL pathways together with the process costs quoted for them
#[derive(Debug, PartialEq)]
pub struct PathwayData {
    /// The pathways, with empty process cost tables
    pub pathways: PathwayMap,
    /// Process costs for recycler and landfill pathways, per tonne
    pub process_costs: ProcessCostUpdates,
    /// Process costs for developer pathways, per blade
    pub developer_costs: ProcessCostUpdates<MoneyPerBlade>,
}

/// Read EOL pathways and their process costs from the model directory.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `destinations` - The model's destinations
pub fn read_pathways(model_dir: &Path, destinations: &DestinationMap) -> Result<PathwayData> {
    let file_path = model_dir.join(PATHWAYS_FILE_NAME);
    let pathways_csv = read_csv(&file_path)?;
    let pathways =
        read_pathways_from_iter(pathways_csv).with_context(|| input_err_msg(&file_path))?;

    let file_path = model_dir.join(PROCESS_COSTS_FILE_NAME);
    let costs_csv = read_csv(&file_path)?;
    read_process_costs_from_iter(costs_csv, pathways, destinations)
        .with_context(|| input_err_msg(&file_path))
}

fn read_pathways_from_iter<I>(iter: I) -> Result<PathwayMap>
where
    I: Iterator<Item = PathwayRaw>,
{
    let mut pathways = PathwayMap::new();
    for raw in iter {
        match (&raw.transport_mode, raw.kind) {
            (TransportMode::Unrecognised(tag), _) => warn!(
                "Pathway {} has unrecognised transport mode '{tag}'; shred and segment \
                transport costs will be combined for it",
                raw.id
            ),
            (TransportMode::Repair, DestinationKind::Recycler | DestinationKind::Landfill)
            | (TransportMode::Shred | TransportMode::Segment, DestinationKind::Developer) => {
                warn!(
                    "Pathway {} uses {} transport but is offered by a {}",
                    raw.id, raw.transport_mode, raw.kind
                );
            }
            _ => {}
        }

        let pathway = Pathway {
            id: raw.id,
            description: raw.description,
            kind: raw.kind,
            transport_mode: raw.transport_mode,
            process_costs: ProcessCostMap::new(),
        };
        try_insert(&mut pathways, pathway.id.clone(), pathway)?;
    }

    Ok(pathways)
}

fn read_process_costs_from_iter<I>(
    iter: I,
    pathways: PathwayMap,
    destinations: &DestinationMap,
) -> Result<PathwayData>
where
    I: Iterator<Item = ProcessCostRaw>,
{
    let mut process_costs = ProcessCostUpdates::new();
    let mut developer_costs = ProcessCostUpdates::new();
    for raw in iter {
        let pathway_id = pathways.get_id_by_str(&raw.pathway_id)?;
        let destination_id = destinations.get_id_by_str(&raw.destination_id)?;
        let pathway = &pathways[&pathway_id];
        let destination = &destinations[&destination_id];
        ensure!(
            destination.kind == pathway.kind,
            "Destination {destination_id} is a {}, but pathway {pathway_id} is offered by a {}",
            destination.kind,
            pathway.kind
        );
        ensure!(
            raw.cost.is_finite(),
            "Process cost for {destination_id} on pathway {pathway_id} must be finite"
        );

        if pathway.kind == DestinationKind::Developer {
            let point = CostCurvePoint {
                destination: destination_id.clone(),
                quantity: raw.quantity,
                cost: MoneyPerBlade(raw.cost),
            };
            developer_costs
                .entry(pathway_id)
                .or_insert_with(ProcessCostMap::new)
                .entry(destination_id)
                .or_insert_with(Vec::new)
                .push(point);
        } else {
            let point = CostCurvePoint {
                destination: destination_id.clone(),
                quantity: raw.quantity,
                cost: MoneyPerMass(raw.cost),
            };
            process_costs
                .entry(pathway_id)
                .or_insert_with(ProcessCostMap::new)
                .entry(destination_id)
                .or_insert_with(Vec::new)
                .push(point);
        }
    }

    for id in pathways.keys() {
        ensure!(
            process_costs.contains_key(id) || developer_costs.contains_key(id),
            "No process costs given for pathway {id}"
        );
    }

    Ok(PathwayData {
        pathways,
        process_costs,
        developer_costs,
    })
}
