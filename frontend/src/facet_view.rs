//! Display model for the facet sidebar: controls state combined with the
//! aggregation counts of the latest search result.

use search_common::{
    aggregation::{AggregationEntry, Aggregations},
    facet_registry::{FACETS, FacetDefinition, FacetKey, Translator},
    facet_state::FacetFilter,
    search_controls::SearchControls,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetOption {
    pub value: String,
    pub label: String,
    pub count: u64,
    pub is_estimate: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetInfo {
    pub key: FacetKey,
    pub active: bool,
    pub filter: Option<FacetFilter>,
    /// Whether the facet applies to the selected content type.
    pub relevant: bool,
    pub options: Vec<FacetOption>,
}

/// One entry per registered facet, in registry order.
pub fn facet_infos(
    controls: &SearchControls,
    aggregations: &Aggregations,
    translator: &dyn Translator,
) -> Vec<FacetInfo> {
    FACETS
        .iter()
        .map(|facet| facet_info(facet, controls, aggregations, translator))
        .collect()
}

pub fn facet_info(
    facet: &FacetDefinition,
    controls: &SearchControls,
    aggregations: &Aggregations,
    translator: &dyn Translator,
) -> FacetInfo {
    let state = facet.extract_input(&controls.facets);
    let mut entries = facet.extract_aggregations(aggregations);

    // keep selected values visible, even when the backend returned no count for them,
    // so they can still be deselected
    let missing = state
        .filter_values()
        .iter()
        .filter(|value| !entries.iter().any(|entry| &entry.value == *value))
        .map(|value| AggregationEntry {
            value: value.clone(),
            label: None,
            count: 0,
            is_estimate: false,
        })
        .collect::<Vec<_>>();
    entries.extend(missing);

    let options = entries
        .into_iter()
        .map(|entry| FacetOption {
            label: facet.resolve_label(&entry, translator, &controls.language),
            selected: state.filter.as_ref().is_some_and(|filter| filter.contains(&entry.value)),
            count: entry.count,
            is_estimate: entry.is_estimate,
            value: entry.value,
        })
        .collect();

    FacetInfo {
        key: facet.key,
        active: state.active,
        filter: state.filter,
        relevant: facet.is_relevant(controls.content_type),
        options,
    }
}
