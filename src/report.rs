//! Aggregate reporting of plant state across the simulation.
use crate::id::PlantID;
use crate::units::{Capacity, Mass, Money};
use indexmap::{IndexMap, IndexSet};
use strum::IntoEnumIterator;

/// A variable which plants add to each year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ReportVariable {
    /// Capacity which has not yet reached end of life
    ActiveCapacity,
    /// Active capacity weighted by the fraction of its design lifetime still to run
    LifetimeWeightedCapacity,
    /// Cumulative mass of blade waste
    WasteMass,
    /// Cumulative cost of handling blades at end of life
    EolCost,
}

/// The state of a plant when it was first reported
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    /// Capacity not yet retired
    pub remaining_capacity: Capacity,
    /// Blade waste so far
    pub waste_mass: Mass,
    /// EOL cost so far
    pub eol_cost: Money,
}

/// Somewhere plants can send reporting data
pub trait ReportBuffer {
    /// Record the state of a plant when it is first reported
    fn record_baseline(&mut self, plant: PlantID, baseline: Baseline);

    /// Add a plant's contribution to a running total
    fn add(&mut self, variable: ReportVariable, value: f64);

    /// Mark a plant as having left the simulation
    fn remove(&mut self, plant: PlantID);
}

/// Collects running totals for the current year and baselines for every plant
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    baselines: IndexMap<PlantID, Baseline>,
    totals: IndexMap<ReportVariable, f64>,
    removed: IndexSet<PlantID>,
}

impl Default for Report {
    fn default() -> Self {
        Self {
            baselines: IndexMap::new(),
            totals: zeroed_totals(),
            removed: IndexSet::new(),
        }
    }
}

fn zeroed_totals() -> IndexMap<ReportVariable, f64> {
    ReportVariable::iter().map(|variable| (variable, 0.0)).collect()
}

impl Report {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// The baseline recorded for a plant, if any
    pub fn baseline(&self, plant: PlantID) -> Option<&Baseline> {
        self.baselines.get(&plant)
    }

    /// The current value of a running total
    pub fn total(&self, variable: ReportVariable) -> f64 {
        self.totals[&variable]
    }

    /// Whether a plant has been removed from the report
    pub fn is_removed(&self, plant: PlantID) -> bool {
        self.removed.contains(&plant)
    }

    /// Take the totals accumulated so far, resetting them to zero
    pub fn take_totals(&mut self) -> IndexMap<ReportVariable, f64> {
        std::mem::replace(&mut self.totals, zeroed_totals())
    }
}

impl ReportBuffer for Report {
    fn record_baseline(&mut self, plant: PlantID, baseline: Baseline) {
        self.baselines.insert(plant, baseline);
    }

    fn add(&mut self, variable: ReportVariable, value: f64) {
        *self.totals.entry(variable).or_default() += value;
    }

    fn remove(&mut self, plant: PlantID) {
        self.removed.insert(plant);
    }
}
