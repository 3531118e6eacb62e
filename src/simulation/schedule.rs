//! Keeps track of which plants are still taking part in the simulation and where they are.
use crate::destination::LocationID;
use crate::id::PlantID;
use indexmap::{IndexMap, IndexSet};

/// Decides which plants are stepped
pub trait Scheduler {
    /// Stop stepping a plant
    fn remove(&mut self, plant: PlantID);
}

/// Places plants on the model grid
pub trait SpatialIndex {
    /// The grid cell a plant occupies, if it is on the grid
    fn position(&self, plant: PlantID) -> Option<&LocationID>;

    /// Take a plant off the grid
    fn remove_agent(&mut self, plant: PlantID);
}

/// The plants which are stepped each year, in the order they were added
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule(IndexSet<PlantID>);

impl Schedule {
    /// Create a schedule containing the given plants
    pub fn new<I: IntoIterator<Item = PlantID>>(plants: I) -> Self {
        Self(plants.into_iter().collect())
    }

    /// The plants still scheduled, in order
    pub fn ids(&self) -> impl Iterator<Item = PlantID> + '_ {
        self.0.iter().copied()
    }

    /// Whether a plant is still scheduled
    pub fn contains(&self, plant: PlantID) -> bool {
        self.0.contains(&plant)
    }

    /// The number of scheduled plants
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no plants are left
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Scheduler for Schedule {
    fn remove(&mut self, plant: PlantID) {
        // Preserve the order of the remaining plants
        self.0.shift_remove(&plant);
    }
}

/// The grid cells occupied by plants
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpatialGrid(IndexMap<PlantID, LocationID>);

impl SpatialGrid {
    /// Create a grid from the location of each plant
    pub fn new(positions: IndexMap<PlantID, LocationID>) -> Self {
        Self(positions)
    }

    /// The number of plants on the grid
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the grid is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl SpatialIndex for SpatialGrid {
    fn position(&self, plant: PlantID) -> Option<&LocationID> {
        self.0.get(&plant)
    }

    fn remove_agent(&mut self, plant: PlantID) {
        self.0.shift_remove(&plant);
    }
}
