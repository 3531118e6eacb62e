//! Road distances between locations.
use crate::destination::LocationID;
use crate::units::Distance;
use anyhow::{Context, Result};
use std::collections::HashMap;

/// Distances between pairs of locations, keyed by `(origin, destination)`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistanceTable(HashMap<(LocationID, LocationID), Distance>);

impl DistanceTable {
    /// Create a new, empty [`DistanceTable`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the distance for a route.
    ///
    /// The reverse route is given the same distance unless it has been inserted explicitly.
    pub fn insert(&mut self, origin: LocationID, destination: LocationID, distance: Distance) {
        self.0
            .entry((destination.clone(), origin.clone()))
            .or_insert(distance);
        self.0.insert((origin, destination), distance);
    }

    /// Get the distance between two locations
    pub fn get(&self, origin: &LocationID, destination: &LocationID) -> Result<Distance> {
        self.0
            .get(&(origin.clone(), destination.clone()))
            .copied()
            .with_context(|| format!("No distance given from {origin} to {destination}"))
    }

    /// The number of routes in the table
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
