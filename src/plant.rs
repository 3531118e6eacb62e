//! Wind plant owners: the agents which decide what happens to blades at end of life.
use crate::conversion::{compute_mass_conv_factor, conversion_blade_to_ton, convert_developer_costs};
use crate::curve::{CurveID, LifetimeCurves};
use crate::destination::{DestinationID, DestinationKind, LocationID};
use crate::id::PlantID;
use crate::model::Model;
use crate::pathway::{PathwayID, ProcessCostUpdates};
use crate::report::{Baseline, ReportBuffer, ReportVariable};
use crate::simulation::schedule::{Scheduler, SpatialIndex};
use crate::units::{
    Capacity, Dimensionless, Distance, Length, Mass, MassPerBlade, MassPerCapacity, Money,
    MoneyPerMass,
};
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use itertools::Itertools;
use log::debug;

mod eol;
pub use eol::DecommissioningContext;
mod transport;
pub use transport::{TransportCosts, transport_shred_costs};

/// The physical and lifecycle parameters of a wind plant
#[derive(Debug, Clone, PartialEq)]
pub struct PlantParameters {
    /// Diameter of each turbine's rotor
    pub rotor_diameter: Length,
    /// Number of blades on each rotor
    pub blades_per_rotor: u32,
    /// Installed capacity of the plant
    pub capacity: Capacity,
    /// Design lifetime in years
    pub lifetime: u32,
    /// The curve giving the rate at which capacity reaches end of life
    pub curve_id: CurveID,
}

impl PlantParameters {
    /// Check that the parameters describe a real plant
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.rotor_diameter.is_finite() && self.rotor_diameter > Length(0.0),
            "rotor_diameter must be a finite number greater than zero"
        );
        ensure!(
            self.blades_per_rotor > 0,
            "blades_per_rotor must be at least one"
        );
        ensure!(
            self.capacity.is_finite() && self.capacity > Capacity(0.0),
            "capacity must be a finite number greater than zero"
        );
        ensure!(self.lifetime > 0, "lifetime must be greater than zero");

        Ok(())
    }
}

/// Whether a plant is still taking part in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum AgentState {
    /// The plant is stepped each year
    Active,
    /// The plant has been taken out of the schedule, grid and report
    Removed,
}

/// The EOL pathway a plant has chosen for its blades
#[derive(Debug, Clone, PartialEq)]
pub struct ChosenPathway {
    /// The chosen pathway
    pub pathway: PathwayID,
    /// The kind of destination offering the pathway
    pub kind: DestinationKind,
    /// The destination the blades go to
    pub destination: DestinationID,
    /// Total cost per tonne of blade, including decommissioning
    pub cost: MoneyPerMass,
}

/// The collaborators a plant notifies when it leaves the simulation
pub struct Collaborators<'a> {
    /// Positions of plants on the grid
    pub grid: &'a mut dyn SpatialIndex,
    /// The plants which are stepped
    pub schedule: &'a mut dyn Scheduler,
    /// Where reporting data is sent
    pub report: &'a mut dyn ReportBuffer,
}

/// Everything a plant needs to take a step
pub struct StepContext<'a> {
    /// Collaborators notified on removal
    pub collaborators: Collaborators<'a>,
    /// Lifetime curves
    pub curves: &'a dyn LifetimeCurves,
}

/// An agent owning a single wind plant
#[derive(Debug, Clone, PartialEq)]
pub struct WindPlantOwner {
    /// Unique identifier for the plant
    pub unique_id: PlantID,
    /// The plant's physical and lifecycle parameters
    pub parameters: PlantParameters,
    /// The grid cell the plant is in
    pub position: LocationID,
    /// Length of a blade (the rotor radius)
    pub blade_length: Length,
    /// Mass of a single blade
    pub blade_mass: MassPerBlade,
    /// Blade mass per unit of installed capacity
    pub mass_conv_factor: MassPerCapacity,
    /// Age when the simulation started
    pub initial_age: u32,
    /// Current age
    pub age: u32,
    /// Capacity which has not yet reached end of life
    pub remaining_capacity: Capacity,
    /// Cumulative blade waste
    pub waste_mass: Mass,
    /// Cumulative cost of handling blades at end of life
    pub eol_cost: Money,
    /// Set once the plant reaches its design lifetime
    pub past_useful_life: bool,
    /// Set once an EOL pathway has been chosen
    pub decommissioning: bool,
    /// The pathway chosen on decommissioning
    pub chosen_pathway: Option<ChosenPathway>,
    /// Distance to the nearest site of each destination considered
    pub eol_distances: IndexMap<DestinationID, Distance>,
    /// Developer process costs, converted to cost per tonne for this plant's blades
    pub developer_costs: ProcessCostUpdates,
    /// Whether the baseline has been reported
    pub reported: bool,
    /// The state of the plant when it was first reported
    pub baseline: Option<Baseline>,
    /// Number of times the plant has reported
    pub report_steps: u32,
    /// Whether the first step has run
    pub has_run_first_step: bool,
    /// Whether the plant is still in the simulation
    pub state: AgentState,
    removal_threshold: Capacity,
}

impl WindPlantOwner {
    /// Create a new plant owner.
    ///
    /// The plant's location and commissioning year are looked up in `model` using `unique_id`.
    ///
    /// # Arguments
    ///
    /// * `unique_id` - Identifier of the plant
    /// * `parameters` - Physical and lifecycle parameters of the plant
    /// * `model` - The model the plant belongs to
    pub fn new(unique_id: PlantID, parameters: PlantParameters, model: &Model) -> Result<Self> {
        parameters
            .validate()
            .with_context(|| format!("Invalid parameters for plant {unique_id}"))?;
        let position = model
            .plant_locations
            .get(&unique_id)
            .with_context(|| format!("No location given for plant {unique_id}"))?
            .clone();
        let commissioning_year = *model
            .commissioning_years
            .get(&unique_id)
            .with_context(|| format!("No commissioning year given for plant {unique_id}"))?;
        let start_year = model.parameters.start_year;
        ensure!(
            commissioning_year <= start_year,
            "Plant {unique_id} is commissioned in {commissioning_year}, after the simulation \
            starts in {start_year}"
        );

        let mass_conv_factor = compute_mass_conv_factor(
            parameters.rotor_diameter,
            model.parameters.mass_coefficient,
            model.parameters.mass_power,
            parameters.blades_per_rotor,
            parameters.capacity,
        )?;
        let blade_mass = conversion_blade_to_ton(
            mass_conv_factor,
            parameters.capacity,
            parameters.blades_per_rotor,
        )?;
        let developer_costs: ProcessCostUpdates = model
            .developer_costs
            .iter()
            .map(|(id, costs)| {
                convert_developer_costs(costs, blade_mass).map(|converted| (id.clone(), converted))
            })
            .try_collect()?;

        let initial_age = start_year - commissioning_year;
        Ok(Self {
            unique_id,
            position,
            blade_length: parameters.rotor_diameter / Dimensionless(2.0),
            blade_mass,
            mass_conv_factor,
            initial_age,
            age: initial_age,
            remaining_capacity: parameters.capacity,
            waste_mass: Mass(0.0),
            eol_cost: Money(0.0),
            past_useful_life: false,
            decommissioning: false,
            chosen_pathway: None,
            eol_distances: IndexMap::new(),
            developer_costs,
            reported: false,
            baseline: None,
            report_steps: 0,
            has_run_first_step: false,
            state: AgentState::Active,
            removal_threshold: model.parameters.removal_threshold,
            parameters,
        })
    }

    /// Retire capacity reaching end of life this year and account for its waste and cost.
    ///
    /// Retirements before a pathway has been chosen produce waste but no cost.
    pub fn update_agent_variables_every_or_specific_step(
        &mut self,
        curves: &dyn LifetimeCurves,
    ) -> Result<()> {
        let fraction = curves.eol_fraction(&self.parameters.curve_id, f64::from(self.age))?;
        let retiring = self
            .remaining_capacity
            .min(self.parameters.capacity * fraction);
        let retiring_mass = self.mass_conv_factor * retiring;

        if let Some(chosen) = &self.chosen_pathway {
            self.eol_cost += chosen.cost * retiring_mass;
        }
        self.remaining_capacity -= retiring;
        self.waste_mass += retiring_mass;
        if self.age >= self.parameters.lifetime {
            self.past_useful_life = true;
        }

        Ok(())
    }

    /// Send this plant's contribution to the running totals.
    ///
    /// The first call also records a baseline snapshot of the plant.
    pub fn report_agent_variable_once_or_every_step(&mut self, report: &mut dyn ReportBuffer) {
        if !self.reported {
            let baseline = Baseline {
                remaining_capacity: self.remaining_capacity,
                waste_mass: self.waste_mass,
                eol_cost: self.eol_cost,
            };
            report.record_baseline(self.unique_id, baseline);
            self.baseline = Some(baseline);
            self.reported = true;
        }

        let life_left =
            (1.0 - f64::from(self.age) / f64::from(self.parameters.lifetime)).max(0.0);
        report.add(
            ReportVariable::ActiveCapacity,
            self.remaining_capacity.value(),
        );
        report.add(
            ReportVariable::LifetimeWeightedCapacity,
            (self.remaining_capacity * Dimensionless(life_left)).value(),
        );
        report.add(ReportVariable::WasteMass, self.waste_mass.value());
        report.add(ReportVariable::EolCost, self.eol_cost.value());
        self.report_steps += 1;
    }

    /// Take the plant out of the simulation once nearly all its capacity has been retired.
    ///
    /// Returns whether the plant was removed by this call.
    pub fn remove_agent(&mut self, collaborators: &mut Collaborators) -> bool {
        if self.state == AgentState::Removed || self.remaining_capacity >= self.removal_threshold {
            return false;
        }

        debug!(
            "Removing plant {} with {} MW remaining",
            self.unique_id, self.remaining_capacity
        );
        collaborators.grid.remove_agent(self.unique_id);
        collaborators.schedule.remove(self.unique_id);
        collaborators.report.remove(self.unique_id);
        self.state = AgentState::Removed;

        true
    }

    /// Advance the plant by one year.
    ///
    /// On the first step, the plant is checked for removal, reported and updated. Ageing happens
    /// on every step.
    pub fn step(&mut self, ctx: &mut StepContext) -> Result<()> {
        if !self.has_run_first_step {
            self.remove_agent(&mut ctx.collaborators);
            self.report_agent_variable_once_or_every_step(ctx.collaborators.report);
            self.update_agent_variables_every_or_specific_step(ctx.curves)?;
            self.has_run_first_step = true;
        }
        self.age += 1;

        Ok(())
    }
}
