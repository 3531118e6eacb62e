//! Conversions between blade geometry, blade mass and installed capacity.
//!
//! These functions are pure: they are evaluated once when a [`WindPlantOwner`] is created and the
//! results are stored on the agent.
//!
//! [`WindPlantOwner`]: crate::plant::WindPlantOwner
use crate::pathway::{CostCurvePoint, ProcessCostMap};
use crate::units::{Capacity, Length, Mass, MassPerBlade, MassPerCapacity, MoneyPerBlade};
use anyhow::{Result, ensure};

/// Calculate the blade mass per unit of installed capacity for a turbine.
///
/// The mass of a single blade follows a power law in the blade radius, i.e.
/// `coefficient * (rotor_diameter / 2) ^ power`.
///
/// # Arguments
///
/// * `rotor_diameter` - Rotor diameter of the turbine
/// * `coefficient` - Coefficient of the mass power law
/// * `power` - Exponent of the mass power law (need not be an integer)
/// * `blades_per_rotor` - Number of blades on a rotor
/// * `t_cap` - Installed capacity which the blades belong to
///
/// # Returns
///
/// The total blade mass divided by `t_cap`, or an error if `t_cap` is zero.
pub fn compute_mass_conv_factor(
    rotor_diameter: Length,
    coefficient: f64,
    power: f64,
    blades_per_rotor: u32,
    t_cap: Capacity,
) -> Result<MassPerCapacity> {
    ensure!(
        t_cap != Capacity(0.0),
        "Cannot compute mass conversion factor for zero capacity"
    );

    let blade_radius = rotor_diameter.value() / 2.0;
    let mass_per_blade = Mass(coefficient * blade_radius.powf(power));
    let total_blade_mass = Mass(mass_per_blade.value() * f64::from(blades_per_rotor));

    Ok(total_blade_mass / t_cap)
}

/// Convert a mass conversion factor back into the mass of a single blade.
///
/// Composing this with [`compute_mass_conv_factor`] for the same capacity gives the mass of one
/// blade, independent of capacity.
pub fn conversion_blade_to_ton(
    mass_conv_factor: MassPerCapacity,
    t_cap: Capacity,
    blades_per_rotor: u32,
) -> Result<MassPerBlade> {
    ensure!(blades_per_rotor > 0, "Number of blades per rotor cannot be zero");

    let total = mass_conv_factor * t_cap;
    Ok(MassPerBlade(total.value() / f64::from(blades_per_rotor)))
}

/// Re-express developer cost curves quoted per blade as costs per tonne.
///
/// The destination and quantity of each point are left untouched. A new map is returned and the
/// input is not modified.
pub fn convert_developer_costs(
    developer_costs: &ProcessCostMap<MoneyPerBlade>,
    conversion_factor: MassPerBlade,
) -> Result<ProcessCostMap> {
    ensure!(
        conversion_factor != MassPerBlade(0.0),
        "Cannot convert developer costs with a zero conversion factor"
    );

    let converted = developer_costs
        .iter()
        .map(|(id, curve)| {
            let curve = curve
                .iter()
                .map(|point| CostCurvePoint {
                    destination: point.destination.clone(),
                    quantity: point.quantity,
                    cost: point.cost / conversion_factor,
                })
                .collect();
            (id.clone(), curve)
        })
        .collect();

    Ok(converted)
}
