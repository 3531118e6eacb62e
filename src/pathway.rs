//! End-of-life pathways and the process costs charged by the destinations offering them.
use crate::destination::{DestinationID, DestinationKind};
use crate::id::{define_id_getter, define_id_type};
use crate::units::MoneyPerMass;
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt;

define_id_type! {PathwayID}

/// A map of [`Pathway`]s, keyed by pathway ID
pub type PathwayMap = IndexMap<PathwayID, Pathway>;

/// Process cost curves for a pathway, keyed by the destination quoting them
pub type ProcessCostMap<C = MoneyPerMass> = IndexMap<DestinationID, Vec<CostCurvePoint<C>>>;

/// Updates to the process cost tables, keyed by pathway
pub type ProcessCostUpdates<C = MoneyPerMass> = IndexMap<PathwayID, ProcessCostMap<C>>;

/// A single point on a destination's process cost curve
#[derive(Debug, Clone, PartialEq)]
pub struct CostCurvePoint<C = MoneyPerMass> {
    /// The destination which charges this cost
    pub destination: DestinationID,
    /// The quantity at which the cost was quoted.
    ///
    /// This is carried through unit conversions but is not used when combining costs.
    pub quantity: f64,
    /// The processing cost
    pub cost: C,
}

/// How blades are prepared and moved from the plant to a destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportMode {
    /// Blades are shredded on site and hauled by mass
    Shred,
    /// Blades are cut into segments and moved by truck
    Segment,
    /// Blades are moved intact to a developer for repair or reuse
    Repair,
    /// A tag which matches none of the known modes
    Unrecognised(String),
}

impl<'de> Deserialize<'de> for TransportMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(match value.trim().to_ascii_lowercase().as_str() {
            "shred" => TransportMode::Shred,
            "segment" => TransportMode::Segment,
            "repair" => TransportMode::Repair,
            _ => TransportMode::Unrecognised(value),
        })
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shred => write!(f, "shred"),
            Self::Segment => write!(f, "segment"),
            Self::Repair => write!(f, "repair"),
            Self::Unrecognised(tag) => write!(f, "{tag}"),
        }
    }
}

/// An end-of-life pathway (e.g. mechanical recycling, landfill, repair)
#[derive(Debug, Clone, PartialEq)]
pub struct Pathway {
    /// Unique identifier for the pathway
    pub id: PathwayID,
    /// A text description of the pathway
    pub description: String,
    /// The kind of destination which offers the pathway
    pub kind: DestinationKind,
    /// How blades are moved to destinations on this pathway
    pub transport_mode: TransportMode,
    /// Current process costs quoted by destinations offering the pathway
    pub process_costs: ProcessCostMap,
}
define_id_getter! {Pathway, PathwayID}

/// The cheapest destination for a pathway and what it costs
#[derive(Debug, Clone, PartialEq)]
pub struct PathwayCost {
    /// The destination giving the minimum cost
    pub destination: DestinationID,
    /// Combined transport and processing cost per tonne of blade
    pub cost: MoneyPerMass,
}

/// The process cost tables for every pathway in the model.
///
/// Recyclers, landfills and developers publish new process costs through [`Self::merge`]; nothing
/// else mutates the tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessCostRegistry {
    pathways: PathwayMap,
}

impl ProcessCostRegistry {
    /// Create a registry from the model's pathways
    pub fn new(pathways: PathwayMap) -> Self {
        Self { pathways }
    }

    /// Merge updated process costs published by destinations of the given kind.
    ///
    /// For each pathway, the curve for every destination in `updates` replaces the existing one.
    /// Destinations not mentioned in `updates` keep their current curves.
    pub fn merge(&mut self, kind: DestinationKind, updates: &ProcessCostUpdates) -> Result<()> {
        for (pathway_id, costs) in updates {
            let pathway = self
                .pathways
                .get_mut(pathway_id)
                .with_context(|| {
                    format!("Process costs supplied for unknown pathway {pathway_id}")
                })?;
            ensure!(
                pathway.kind == kind,
                "Pathway {pathway_id} is offered by a {}, not a {kind}",
                pathway.kind
            );

            for (destination_id, curve) in costs {
                pathway
                    .process_costs
                    .insert(destination_id.clone(), curve.clone());
            }
        }

        Ok(())
    }

    /// Get a pathway by its ID
    pub fn get(&self, id: &PathwayID) -> Option<&Pathway> {
        self.pathways.get(id)
    }

    /// Iterate over the pathways in the order they were defined
    pub fn iter(&self) -> indexmap::map::Values<'_, PathwayID, Pathway> {
        self.pathways.values()
    }

    /// The number of pathways in the registry
    pub fn len(&self) -> usize {
        self.pathways.len()
    }

    /// Whether the registry has no pathways
    pub fn is_empty(&self) -> bool {
        self.pathways.is_empty()
    }
}

/// Combine transport and processing costs and find the cheapest destination.
///
/// Each process cost curve is flattened into `(destination, cost)` pairs, which are appended to
/// the transport costs. Costs for the same destination are summed and the destination with the
/// smallest total is returned. If several destinations share the minimum, the first one
/// encountered wins.
///
/// # Arguments
///
/// * `process_costs` - Process cost curves, keyed by destination
/// * `transport_costs` - Transport cost to each destination
///
/// # Returns
///
/// The cheapest destination, or an error if there are no costs at all.
pub fn minimum_tr_proc_costs<'a, I>(
    process_costs: &'a ProcessCostMap,
    transport_costs: I,
) -> Result<PathwayCost>
where
    I: IntoIterator<Item = (&'a DestinationID, &'a MoneyPerMass)>,
{
    let flattened = process_costs
        .values()
        .flatten()
        .map(|point| (&point.destination, &point.cost));

    let mut totals: IndexMap<&DestinationID, MoneyPerMass> = IndexMap::new();
    for (destination, cost) in transport_costs.into_iter().chain(flattened) {
        *totals.entry(destination).or_default() += *cost;
    }

    let (destination, cost) = totals
        .into_iter()
        .reduce(|best, candidate| if candidate.1 < best.1 { candidate } else { best })
        .context("No transport or process costs to choose from")?;

    Ok(PathwayCost {
        destination: destination.clone(),
        cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, pathway_registry};
    use float_cmp::assert_approx_eq;
    use indexmap::indexmap;
    use rstest::rstest;

    fn point(destination: &str, quantity: f64, cost: f64) -> CostCurvePoint {
        CostCurvePoint {
            destination: destination.into(),
            quantity,
            cost: MoneyPerMass(cost),
        }
    }

    #[test]
    fn test_minimum_tr_proc_costs_sums_shared_destination() {
        let process_costs = indexmap! {
            "rec1".into() => vec![point("rec1", 1.0, 100.0)],
            "rec2".into() => vec![point("rec2", 1.0, 140.0)],
        };
        let transport: IndexMap<DestinationID, MoneyPerMass> = indexmap! {
            "rec1".into() => MoneyPerMass(50.0),
            "rec2".into() => MoneyPerMass(5.0),
        };

        let best = minimum_tr_proc_costs(&process_costs, &transport).unwrap();
        assert_eq!(best.destination, "rec2".into());
        assert_approx_eq!(MoneyPerMass, best.cost, MoneyPerMass(145.0));
    }

    #[test]
    fn test_minimum_tr_proc_costs_first_minimum_wins() {
        let process_costs = indexmap! {
            "rec1".into() => vec![point("rec1", 1.0, 10.0)],
            "rec2".into() => vec![point("rec2", 1.0, 10.0)],
        };

        let transport = IndexMap::<DestinationID, MoneyPerMass>::new();
        let best = minimum_tr_proc_costs(&process_costs, &transport).unwrap();
        assert_eq!(best.destination, "rec1".into());
    }

    #[test]
    fn test_minimum_tr_proc_costs_transport_only() {
        let transport: IndexMap<DestinationID, MoneyPerMass> = indexmap! {
            "land1".into() => MoneyPerMass(12.0),
        };

        let best = minimum_tr_proc_costs(&ProcessCostMap::new(), &transport).unwrap();
        assert_eq!(best.cost, MoneyPerMass(12.0));
    }

    #[test]
    fn test_minimum_tr_proc_costs_empty() {
        assert_error!(
            minimum_tr_proc_costs(
                &ProcessCostMap::new(),
                &IndexMap::<DestinationID, MoneyPerMass>::new()
            ),
            "No transport or process costs to choose from"
        );
    }

    #[rstest]
    #[case("shred", TransportMode::Shred)]
    #[case("Segment", TransportMode::Segment)]
    #[case(" repair", TransportMode::Repair)]
    #[case("rail", TransportMode::Unrecognised("rail".into()))]
    fn test_transport_mode_deserialise(#[case] tag: &str, #[case] expected: TransportMode) {
        let value = serde::de::value::StrDeserializer::<serde::de::value::Error>::new(tag);
        assert_eq!(TransportMode::deserialize(value).unwrap(), expected);
    }

    #[rstest]
    fn test_merge_replaces_curves(mut pathway_registry: ProcessCostRegistry) {
        let updates = indexmap! {
            "mechanical".into() => indexmap! {
                "rec1".into() => vec![point("rec1", 2.0, 80.0)],
            },
        };
        pathway_registry
            .merge(DestinationKind::Recycler, &updates)
            .unwrap();

        let pathway = pathway_registry.get(&"mechanical".into()).unwrap();
        assert_eq!(pathway.process_costs["rec1"], vec![point("rec1", 2.0, 80.0)]);
        // Curves from other destinations are kept
        assert!(pathway.process_costs.contains_key("rec2"));
    }

    #[rstest]
    fn test_merge_unknown_pathway(mut pathway_registry: ProcessCostRegistry) {
        let updates = indexmap! { "pyrolysis".into() => ProcessCostMap::new() };
        assert_error!(
            pathway_registry.merge(DestinationKind::Recycler, &updates),
            "Process costs supplied for unknown pathway pyrolysis"
        );
    }

    #[rstest]
    fn test_merge_wrong_kind(mut pathway_registry: ProcessCostRegistry) {
        let updates = indexmap! { "landfill".into() => ProcessCostMap::new() };
        assert_error!(
            pathway_registry.merge(DestinationKind::Recycler, &updates),
            "Pathway landfill is offered by a landfill, not a recycler"
        );
    }
}
