//! Code for reading road distances from a CSV file.
use super::*;
use crate::destination::LocationID;
use crate::distance::DistanceTable;
use crate::units::Distance;
use anyhow::ensure;
use serde::Deserialize;
use std::path::Path;

const DISTANCES_FILE_NAME: &str = "distances.csv";

#[derive(PartialEq, Debug, Deserialize)]
struct DistanceRaw {
    origin: LocationID,
    destination: LocationID,
    distance: Distance,
}

/// Read the distance table from the model directory.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
///
/// # Returns
///
/// A [`DistanceTable`] or an error.
pub fn read_distances(model_dir: &Path) -> Result<DistanceTable> {
    let file_path = model_dir.join(DISTANCES_FILE_NAME);
    let distances_csv = read_csv(&file_path)?;
    read_distances_from_iter(distances_csv).with_context(|| input_err_msg(&file_path))
}

fn read_distances_from_iter<I>(iter: I) -> Result<DistanceTable>
where
    I: Iterator<Item = DistanceRaw>,
{
    let mut table = DistanceTable::new();
    for raw in iter {
        ensure!(
            raw.distance.is_finite() && raw.distance >= Distance(0.0),
            "Distance from {} to {} must be a finite, non-negative number",
            raw.origin,
            raw.destination
        );
        table.insert(raw.origin, raw.destination, raw.distance);
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use std::iter;

    fn raw(origin: &str, destination: &str, distance: f64) -> DistanceRaw {
        DistanceRaw {
            origin: origin.into(),
            destination: destination.into(),
            distance: Distance(distance),
        }
    }

    #[test]
    fn test_read_distances_from_iter() {
        let table =
            read_distances_from_iter([raw("a", "b", 5.0), raw("a", "c", 7.5)].into_iter())
                .unwrap();
        assert_eq!(table.get(&"c".into(), &"a".into()).unwrap(), Distance(7.5));
    }

    #[test]
    fn test_read_distances_from_iter_negative() {
        assert_error!(
            read_distances_from_iter(iter::once(raw("a", "b", -5.0))),
            "Distance from a to b must be a finite, non-negative number"
        );
    }
}
