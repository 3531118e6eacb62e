//! Utility functions.
use anyhow::{Result, bail};
use indexmap::IndexMap;
use indexmap::map::Entry::{Occupied, Vacant};
use std::hash::Hash;

/// Inserts a key-value pair into an [`IndexMap`] if the key does not already exist.
///
/// If the key already exists, it returns an error with a message indicating the key's existence.
pub fn try_insert<K, V>(map: &mut IndexMap<K, V>, key: K, value: V) -> Result<()>
where
    K: Eq + Hash + std::fmt::Display,
{
    match map.entry(key) {
        Vacant(entry) => {
            entry.insert(value);
            Ok(())
        }
        Occupied(entry) => bail!("Key {} already exists in the map", entry.key()),
    }
}
