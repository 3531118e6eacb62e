//! Code for reading wind plants from a CSV file.
use super::*;
use crate::curve::LifetimeCurveMap;
use crate::destination::LocationID;
use crate::id::{IDCollection, PlantID};
use crate::plant::PlantParameters;
use crate::units::{Capacity, Length};
use crate::utils::try_insert;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

const PLANTS_FILE_NAME: &str = "plants.csv";

#[derive(PartialEq, Debug, Deserialize)]
struct PlantRaw {
    id: PlantID,
    location_id: LocationID,
    commissioning_year: u32,
    rotor_diameter: Length,
    blades_per_rotor: u32,
    capacity: Capacity,
    lifetime: u32,
    curve_id: String,
}

/// The wind plants in a model, split into the tables the simulation looks them up in
#[derive(Debug, Default, PartialEq)]
pub struct PlantData {
    /// Physical and lifecycle parameters of each plant
    pub parameters: IndexMap<PlantID, PlantParameters>,
    /// The grid cell each plant is in
    pub locations: IndexMap<PlantID, LocationID>,
    /// The year each plant was commissioned
    pub commissioning_years: IndexMap<PlantID, u32>,
}

/// Read wind plants from the model directory.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `lifetime_curves` - Lifetime curves which plants may refer to
pub fn read_plants(model_dir: &Path, lifetime_curves: &LifetimeCurveMap) -> Result<PlantData> {
    let file_path = model_dir.join(PLANTS_FILE_NAME);
    let plants_csv = read_csv(&file_path)?;
    read_plants_from_iter(plants_csv, lifetime_curves).with_context(|| input_err_msg(&file_path))
}

fn read_plants_from_iter<I>(iter: I, lifetime_curves: &LifetimeCurveMap) -> Result<PlantData>
where
    I: Iterator<Item = PlantRaw>,
{
    let mut plants = PlantData::default();
    for raw in iter {
        let parameters = PlantParameters {
            rotor_diameter: raw.rotor_diameter,
            blades_per_rotor: raw.blades_per_rotor,
            capacity: raw.capacity,
            lifetime: raw.lifetime,
            curve_id: lifetime_curves.get_id_by_str(&raw.curve_id)?,
        };
        parameters
            .validate()
            .with_context(|| format!("Invalid parameters for plant {}", raw.id))?;

        try_insert(&mut plants.parameters, raw.id, parameters)?;
        plants.locations.insert(raw.id, raw.location_id);
        plants
            .commissioning_years
            .insert(raw.id, raw.commissioning_year);
    }

    Ok(plants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::WeibullCurve;
    use crate::fixture::assert_error;
    use indexmap::indexmap;
    use std::iter;

    fn curves() -> LifetimeCurveMap {
        indexmap! {
            "standard".into() => WeibullCurve {
                id: "standard".into(),
                scale: 22.0,
                shape: 2.2,
            }
        }
    }

    fn plant_raw(id: u32) -> PlantRaw {
        PlantRaw {
            id: PlantID(id),
            location_id: "cell_a".into(),
            commissioning_year: 2005,
            rotor_diameter: Length(80.0),
            blades_per_rotor: 3,
            capacity: Capacity(2.0),
            lifetime: 20,
            curve_id: "standard".into(),
        }
    }

    #[test]
    fn test_read_plants_from_iter() {
        let plants = read_plants_from_iter([plant_raw(1), plant_raw(2)].into_iter(), &curves())
            .unwrap();
        assert_eq!(plants.parameters.len(), 2);
        assert_eq!(plants.locations[&PlantID(2)], "cell_a".into());
        assert_eq!(plants.commissioning_years[&PlantID(1)], 2005);
        assert_eq!(plants.parameters[&PlantID(1)].curve_id, "standard".into());
    }

    #[test]
    fn test_read_plants_from_iter_duplicate() {
        assert_error!(
            read_plants_from_iter([plant_raw(1), plant_raw(1)].into_iter(), &curves()),
            "Key 1 already exists in the map"
        );
    }

    #[test]
    fn test_read_plants_from_iter_unknown_curve() {
        let raw = PlantRaw {
            curve_id: "fast".into(),
            ..plant_raw(1)
        };
        assert_error!(
            read_plants_from_iter(iter::once(raw), &curves()),
            "Unknown ID fast found"
        );
    }

    #[test]
    fn test_read_plants_from_iter_invalid_parameters() {
        let raw = PlantRaw {
            blades_per_rotor: 0,
            ..plant_raw(7)
        };
        assert_error!(
            read_plants_from_iter(iter::once(raw), &curves()),
            "Invalid parameters for plant 7"
        );
    }
}
