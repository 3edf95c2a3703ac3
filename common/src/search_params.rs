//! The parameter set handed to the search fetch layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    content_type::ContentTypeSelection, facet_registry::FacetKey, order_by::OrderBy,
    search_controls::SearchControls,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetParams {
    pub aggregate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Vec<String>>,
}

/// Everything a search request depends on. The display language is left
/// out, so switching language never causes a refetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_string: Option<String>,
    pub page: u32,
    pub limit: u32,
    pub offset: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentTypeSelection>,
    pub order_by: OrderBy,
    /// Only active facets appear here.
    pub facets: BTreeMap<FacetKey, FacetParams>,
}

impl SearchParams {
    pub fn from_controls(controls: &SearchControls) -> Self {
        let facets = controls
            .facets
            .iter()
            .filter(|(_, state)| state.active)
            .map(|(key, state)| {
                let params = FacetParams {
                    aggregate: true,
                    filter: state.filter.clone().map(Vec::from),
                };
                (key, params)
            })
            .collect();
        Self {
            query_string: controls.query_string.clone(),
            page: controls.page,
            limit: controls.limit,
            offset: controls.offset(),
            content_type: controls.content_type,
            order_by: controls.order_by,
            facets,
        }
    }

    /// Renders the parameters as GraphQL variables.
    pub fn to_variables(&self) -> serde_json::Value {
        serde_json::json!({ "input": self })
    }
}

impl From<&SearchControls> for SearchParams {
    fn from(value: &SearchControls) -> Self {
        Self::from_controls(value)
    }
}
