//! Per-facet activation and filter state.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{error::Error, facet_registry::FacetKey};

/// Splits raw filter input the way URL lists are read: on commas, with every
/// part trimmed and blank parts dropped.
pub fn split_filter_values(input: &str) -> impl Iterator<Item = &str> {
    input.split(',').map(str::trim).filter(|part| !part.is_empty())
}

/// A non-empty, deduplicated and sorted set of filter values.
///
/// The only way to build one is through [`FacetFilter::new`], so every value
/// in circulation is already normalised. Comparison is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FacetFilter(Vec<String>);

impl FacetFilter {
    /// Returns `None` when `values` is empty.
    pub fn new<I, S>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect::<BTreeSet<String>>();
        if values.is_empty() {
            return None;
        }
        Some(Self(values.into_iter().collect()))
    }

    pub fn values(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.binary_search_by(|v| v.as_str().cmp(value)).is_ok()
    }

    /// Removing the last value yields `None`, never an empty filter.
    pub fn without_value(&self, value: &str) -> Option<Self> {
        Self::new(self.0.iter().filter(|v| v.as_str() != value).cloned())
    }

    pub fn join(&self, separator: &str) -> String {
        self.0.join(separator)
    }
}

impl TryFrom<Vec<String>> for FacetFilter {
    type Error = Error;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(Error::EmptyFacetFilter)
    }
}

impl From<FacetFilter> for Vec<String> {
    fn from(value: FacetFilter) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct FacetState {
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FacetFilter>,
}

impl FacetState {
    pub const INACTIVE: FacetState = FacetState {
        active: false,
        filter: None,
    };

    pub fn new(active: bool, filter: Option<FacetFilter>) -> Self {
        Self { active, filter }
    }

    /// Builds a state from raw filter values, normalising them.
    pub fn from_values<I, S>(active: bool, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(active, FacetFilter::new(values))
    }

    pub fn filter_values(&self) -> &[String] {
        self.filter.as_ref().map(FacetFilter::values).unwrap_or(&[])
    }
}

/// The state of every registered facet, keyed by facet.
///
/// [`FacetStates::initial`] holds one inactive entry per registry key. The
/// `FromIterator` and serde paths accept arbitrary key sets so that
/// externally built maps can be checked with [`FacetStates::has_registry_keys`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacetStates(BTreeMap<FacetKey, FacetState>);

impl FacetStates {
    pub fn initial() -> Self {
        FacetKey::ALL.into_iter().map(|key| (key, FacetState::INACTIVE)).collect()
    }

    pub fn get(&self, key: FacetKey) -> Option<&FacetState> {
        self.0.get(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FacetKey, &FacetState)> {
        self.0.iter().map(|(key, state)| (*key, state))
    }

    pub fn keys(&self) -> impl Iterator<Item = FacetKey> + '_ {
        self.0.keys().copied()
    }

    /// Keys of the active facets, in registry order.
    pub fn active_keys(&self) -> impl Iterator<Item = FacetKey> + '_ {
        self.iter().filter(|(_, state)| state.active).map(|(key, _)| key)
    }

    pub fn has_registry_keys(&self) -> bool {
        self.0.len() == FacetKey::ALL.len() && FacetKey::ALL.iter().all(|key| self.0.contains_key(key))
    }

    /// Returns a copy with `key`'s state replaced.
    pub(crate) fn with(&self, key: FacetKey, state: FacetState) -> Self {
        let mut next = self.0.clone();
        next.insert(key, state);
        Self(next)
    }
}

impl FromIterator<(FacetKey, FacetState)> for FacetStates {
    fn from_iter<T: IntoIterator<Item = (FacetKey, FacetState)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
