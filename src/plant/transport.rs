//! Distances to destinations and the cost of getting blades there.
use super::WindPlantOwner;
use crate::destination::{
    DestinationID, DestinationMap, DestinationSites, LocationID, TransportRates,
};
use crate::distance::DistanceTable;
use crate::model::ModelParameters;
use crate::units::{Distance, Length, MassPerBlade, MoneyPerDistancePerLength, MoneyPerMass};
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;

/// Transport cost per tonne of blade to each destination, for each way of moving blades
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportCosts {
    /// Shredding on site and hauling by mass
    pub shred: IndexMap<DestinationID, MoneyPerMass>,
    /// Cutting into segments and trucking
    pub segment: IndexMap<DestinationID, MoneyPerMass>,
    /// Moving intact blades for repair
    pub repair: IndexMap<DestinationID, MoneyPerMass>,
}

/// Cost of shredding blades on site and hauling them to each destination.
///
/// Destinations which are unknown or do not accept shredded blades are skipped.
pub fn transport_shred_costs(
    destinations: &DestinationMap,
    distances: &IndexMap<DestinationID, Distance>,
) -> IndexMap<DestinationID, MoneyPerMass> {
    distances
        .iter()
        .filter_map(|(id, distance)| match destinations.get(id).map(|d| &d.rates) {
            Some(TransportRates::Haulage {
                shredding_cost,
                shred_transport_cost,
                ..
            }) => Some((
                id.clone(),
                *shredding_cost + *shred_transport_cost * *distance,
            )),
            _ => None,
        })
        .collect()
}

/// The nearest site of each destination to `origin`. The first of equally near sites wins.
fn nearest_sites(
    origin: &LocationID,
    candidates: &DestinationSites,
    distances: &DistanceTable,
) -> Result<IndexMap<DestinationID, Distance>> {
    let mut nearest = IndexMap::new();
    for (id, sites) in candidates {
        let mut best: Option<Distance> = None;
        for site in sites {
            let distance = distances.get(origin, site)?;
            if best.is_none_or(|best| distance < best) {
                best = Some(distance);
            }
        }
        let best = best.with_context(|| format!("No sites given for destination {id}"))?;
        nearest.insert(id.clone(), best);
    }

    Ok(nearest)
}

impl WindPlantOwner {
    /// Find the distance from the plant to the nearest site of each recycler and landfill.
    ///
    /// The candidates are merged with recyclers first. Each winning distance is also recorded in
    /// [`WindPlantOwner::eol_distances`].
    pub fn eol_distances(
        &mut self,
        recyclers: &DestinationSites,
        landfills: &DestinationSites,
        distances: &DistanceTable,
    ) -> Result<IndexMap<DestinationID, Distance>> {
        let candidates: DestinationSites = recyclers
            .iter()
            .chain(landfills)
            .map(|(id, sites)| (id.clone(), sites.clone()))
            .collect();
        let nearest = nearest_sites(&self.position, &candidates, distances)?;
        self.eol_distances
            .extend(nearest.iter().map(|(id, d)| (id.clone(), *d)));

        Ok(nearest)
    }

    /// Find the distance from the plant to the nearest site of each developer
    pub fn repair_distances(
        &mut self,
        developers: &DestinationSites,
        distances: &DistanceTable,
    ) -> Result<IndexMap<DestinationID, Distance>> {
        let nearest = nearest_sites(&self.position, developers, distances)?;
        self.eol_distances
            .extend(nearest.iter().map(|(id, d)| (id.clone(), *d)));

        Ok(nearest)
    }

    /// Cost of cutting the plant's blades into segments and trucking them to each destination.
    ///
    /// A truck's rate per km is spread over the blade length it carries, then re-expressed per
    /// tonne using the mass of a metre of blade.
    pub fn transport_segment_costs(
        &self,
        destinations: &DestinationMap,
        distances: &IndexMap<DestinationID, Distance>,
        parameters: &ModelParameters,
    ) -> Result<IndexMap<DestinationID, MoneyPerMass>> {
        let load_length = parameters.segments_per_truck * parameters.segment_length.value();
        ensure!(
            load_length > 0.0,
            "Cannot compute segment transport costs for a zero truck load"
        );
        ensure!(
            self.blade_length > Length(0.0) && self.blade_mass > MassPerBlade(0.0),
            "Cannot compute segment transport costs for plant {} with zero blade length or mass",
            self.unique_id
        );
        let mass_per_metre = self.blade_mass / self.blade_length;

        let mut costs = IndexMap::new();
        for (id, distance) in distances {
            let Some(TransportRates::Haulage {
                cutting_cost,
                segment_transport_cost,
                ..
            }) = destinations.get(id).map(|d| &d.rates)
            else {
                continue;
            };

            let per_metre = MoneyPerDistancePerLength(segment_transport_cost.value() / load_length);
            let per_tonne_km = per_metre / mass_per_metre;
            costs.insert(id.clone(), *cutting_cost + per_tonne_km * *distance);
        }

        Ok(costs)
    }

    /// Transport costs to every destination in `distances`.
    ///
    /// Recyclers and landfills get shred and segment costs and developers get repair costs.
    /// Unknown destinations are skipped.
    pub fn eol_transportation_costs(
        &self,
        destinations: &DestinationMap,
        distances: &IndexMap<DestinationID, Distance>,
        parameters: &ModelParameters,
    ) -> Result<TransportCosts> {
        let repair = distances
            .iter()
            .filter_map(|(id, distance)| match destinations.get(id).map(|d| &d.rates) {
                Some(TransportRates::Repair { transport_cost }) => {
                    Some((id.clone(), *transport_cost * *distance))
                }
                _ => None,
            })
            .collect();

        Ok(TransportCosts {
            shred: transport_shred_costs(destinations, distances),
            segment: self.transport_segment_costs(destinations, distances, parameters)?,
            repair,
        })
    }
}
