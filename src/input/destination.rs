//! Code for reading destinations and their sites from CSV files.
use super::*;
use crate::destination::{
    Destination, DestinationID, DestinationKind, DestinationMap, LocationID, TransportRates,
};
use crate::id::IDCollection;
use crate::units::{MoneyPerDistance, MoneyPerMass, MoneyPerMassPerDistance};
use crate::utils::try_insert;
use anyhow::ensure;
use indexmap::IndexSet;
use serde::Deserialize;
use std::path::Path;

const DESTINATIONS_FILE_NAME: &str = "destinations.csv";
const DESTINATION_SITES_FILE_NAME: &str = "destination_sites.csv";

#[derive(PartialEq, Debug, Deserialize)]
struct DestinationRaw {
    id: DestinationID,
    kind: DestinationKind,
    description: String,
    shredding_cost: Option<MoneyPerMass>,
    shred_transport_cost: Option<MoneyPerMassPerDistance>,
    cutting_cost: Option<MoneyPerMass>,
    segment_transport_cost: Option<MoneyPerDistance>,
    repair_transport_cost: Option<MoneyPerMassPerDistance>,
}

#[derive(PartialEq, Debug, Deserialize)]
struct DestinationSiteRaw {
    destination_id: String,
    location_id: LocationID,
}

/// Read destinations and their sites from the model directory.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
///
/// # Returns
///
/// A map of [`Destination`]s, keyed by destination ID, or an error.
pub fn read_destinations(model_dir: &Path) -> Result<DestinationMap> {
    let file_path = model_dir.join(DESTINATIONS_FILE_NAME);
    let destinations_csv = read_csv(&file_path)?;
    let mut destinations = read_destinations_from_iter(destinations_csv)
        .with_context(|| input_err_msg(&file_path))?;

    let file_path = model_dir.join(DESTINATION_SITES_FILE_NAME);
    let sites_csv = read_csv(&file_path)?;
    read_sites_from_iter(sites_csv, &mut destinations)
        .with_context(|| input_err_msg(&file_path))?;

    Ok(destinations)
}

/// Get a rate which must be present for destinations of the given kind
fn required<T>(value: Option<T>, field: &str, raw: &DestinationRaw) -> Result<T> {
    value.with_context(|| {
        format!(
            "Missing {field} for {} {}",
            raw.kind, raw.id
        )
    })
}

/// Check that a rate is a finite, non-negative number
fn check_rate(value: f64, field: &str, id: &DestinationID) -> Result<()> {
    ensure!(
        value.is_finite() && value >= 0.0,
        "{field} for destination {id} must be a finite, non-negative number"
    );

    Ok(())
}

impl TryFrom<DestinationRaw> for Destination {
    type Error = anyhow::Error;

    fn try_from(raw: DestinationRaw) -> Result<Self> {
        let rates = match raw.kind {
            DestinationKind::Recycler | DestinationKind::Landfill => {
                let shredding_cost = required(raw.shredding_cost, "shredding_cost", &raw)?;
                let shred_transport_cost =
                    required(raw.shred_transport_cost, "shred_transport_cost", &raw)?;
                let cutting_cost = required(raw.cutting_cost, "cutting_cost", &raw)?;
                let segment_transport_cost =
                    required(raw.segment_transport_cost, "segment_transport_cost", &raw)?;
                check_rate(shredding_cost.value(), "shredding_cost", &raw.id)?;
                check_rate(shred_transport_cost.value(), "shred_transport_cost", &raw.id)?;
                check_rate(cutting_cost.value(), "cutting_cost", &raw.id)?;
                check_rate(
                    segment_transport_cost.value(),
                    "segment_transport_cost",
                    &raw.id,
                )?;

                TransportRates::Haulage {
                    shredding_cost,
                    shred_transport_cost,
                    cutting_cost,
                    segment_transport_cost,
                }
            }
            DestinationKind::Developer => {
                let transport_cost =
                    required(raw.repair_transport_cost, "repair_transport_cost", &raw)?;
                check_rate(transport_cost.value(), "repair_transport_cost", &raw.id)?;

                TransportRates::Repair { transport_cost }
            }
        };

        Ok(Destination {
            id: raw.id,
            description: raw.description,
            kind: raw.kind,
            sites: IndexSet::new(),
            rates,
        })
    }
}

fn read_destinations_from_iter<I>(iter: I) -> Result<DestinationMap>
where
    I: Iterator<Item = DestinationRaw>,
{
    let mut destinations = DestinationMap::new();
    for raw in iter {
        let destination = Destination::try_from(raw)?;
        try_insert(&mut destinations, destination.id.clone(), destination)?;
    }

    Ok(destinations)
}

fn read_sites_from_iter<I>(iter: I, destinations: &mut DestinationMap) -> Result<()>
where
    I: Iterator<Item = DestinationSiteRaw>,
{
    for site in iter {
        let id = destinations.get_id_by_str(&site.destination_id)?;
        let destination = &mut destinations[&id];
        ensure!(
            destination.sites.insert(site.location_id.clone()),
            "Duplicate site {} for destination {id}",
            site.location_id
        );
    }

    for destination in destinations.values() {
        ensure!(
            !destination.sites.is_empty(),
            "No sites given for destination {}",
            destination.id
        );
    }

    Ok(())
}
