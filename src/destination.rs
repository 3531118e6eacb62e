//! Destinations receive blades at end of life: recyclers, landfills and developers.
use crate::id::{define_id_getter, define_id_type};
use crate::units::{MoneyPerDistance, MoneyPerMass, MoneyPerMassPerDistance};
use indexmap::{IndexMap, IndexSet};
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};

define_id_type! {DestinationID}
define_id_type! {LocationID}

/// A map of [`Destination`]s, keyed by destination ID
pub type DestinationMap = IndexMap<DestinationID, Destination>;

/// The candidate sites of each destination.
///
/// Distances are measured from a plant to each site and the nearest site is used.
pub type DestinationSites = IndexMap<DestinationID, IndexSet<LocationID>>;

/// The kind of organisation a destination is
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    DeserializeLabeledStringEnum,
    SerializeLabeledStringEnum,
)]
pub enum DestinationKind {
    /// Processes shredded or segmented blades into secondary material
    #[string = "recycler"]
    Recycler,
    /// Disposes of shredded or segmented blades
    #[string = "landfill"]
    Landfill,
    /// Repairs blades for reuse
    #[string = "developer"]
    Developer,
}

/// The rates a destination charges for getting blades to it
#[derive(Debug, Clone, PartialEq)]
pub enum TransportRates {
    /// Blades are shredded or cut on site and hauled away
    Haulage {
        /// Cost of shredding blades on site
        shredding_cost: MoneyPerMass,
        /// Cost of hauling shredded blades
        shred_transport_cost: MoneyPerMassPerDistance,
        /// Cost of cutting blades into segments on site
        cutting_cost: MoneyPerMass,
        /// Cost of running a truck loaded with segments
        segment_transport_cost: MoneyPerDistance,
    },
    /// Intact blades are moved for repair
    Repair {
        /// Cost of moving intact blades
        transport_cost: MoneyPerMassPerDistance,
    },
}

/// A recycler, landfill or developer to which blades can be sent
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    /// Unique identifier for the destination
    pub id: DestinationID,
    /// A text description of the destination
    pub description: String,
    /// The kind of destination
    pub kind: DestinationKind,
    /// The locations at which the destination operates
    pub sites: IndexSet<LocationID>,
    /// Transport rates charged by the destination
    pub rates: TransportRates,
}
define_id_getter! {Destination, DestinationID}

/// Group the sites of destinations of a given kind
pub fn sites_of_kind(destinations: &DestinationMap, kind: DestinationKind) -> DestinationSites {
    destinations
        .values()
        .filter(|destination| destination.kind == kind)
        .map(|destination| (destination.id.clone(), destination.sites.clone()))
        .collect()
}
