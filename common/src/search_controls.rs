//! The search controls state and the pure transitions applied to it.
//!
//! `SearchControls` is never mutated in place: every transition takes the
//! previous value by reference and returns the next one.

use serde::{Deserialize, Serialize};

use crate::{
    content_type::ContentTypeSelection,
    facet_registry::FacetKey,
    facet_state::{FacetState, FacetStates, split_filter_values},
    order_by::{OrderBy, OrderField},
    search_config::SearchConfig,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchControls {
    pub language: String,
    /// `None` when there is no free-text query; never an empty string.
    pub query_string: Option<String>,
    pub page: u32,
    pub limit: u32,
    pub content_type: Option<ContentTypeSelection>,
    pub order_by: OrderBy,
    pub facets: FacetStates,
}

/// Picks the ordering after the query string changes from `previous_query`
/// to `next_query`.
///
/// A new non-empty query switches to the relevance ordering so that results
/// are ranked by match quality. Clearing the query drops a relevance ordering
/// back to the structural default. Anything else keeps `current`.
pub fn order_by_for_query(
    config: &SearchConfig,
    previous_query: Option<&str>,
    next_query: Option<&str>,
    current: OrderBy,
) -> OrderBy {
    match next_query.filter(|query| !query.is_empty()) {
        Some(query) if Some(query) != previous_query => config.default_query_order_by,
        Some(_) => current,
        None if current.is_relevance() => config.default_order_by,
        None => current,
    }
}

/// Empty strings mean "no query".
pub fn normalize_query_string(query_string: Option<String>) -> Option<String> {
    query_string.filter(|query| !query.is_empty())
}

impl SearchControls {
    pub fn initial(config: &SearchConfig, language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            query_string: None,
            page: 1,
            limit: config.default_limit,
            content_type: None,
            order_by: config.default_order_by,
            facets: FacetStates::initial(),
        }
    }

    pub fn facet(&self, key: FacetKey) -> FacetState {
        key.definition().extract_input(&self.facets)
    }

    pub fn is_facet_relevant(&self, key: FacetKey) -> bool {
        key.definition().is_relevant(self.content_type)
    }

    /// Offset of the first result on the current page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    pub fn with_language(&self, language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            ..self.clone()
        }
    }

    /// Sets the query text, applying the query ordering rule and returning
    /// to the first page.
    pub fn with_query_string(&self, config: &SearchConfig, query_string: Option<String>) -> Self {
        let query_string = normalize_query_string(query_string);
        let order_by = order_by_for_query(
            config,
            self.query_string.as_deref(),
            query_string.as_deref(),
            self.order_by,
        );
        Self {
            query_string,
            order_by,
            page: 1,
            ..self.clone()
        }
    }

    pub fn with_content_type(&self, content_type: Option<ContentTypeSelection>) -> Self {
        Self {
            content_type,
            page: 1,
            ..self.clone()
        }
    }

    /// Orders by `field` in its natural direction.
    pub fn with_order_field(&self, field: OrderField) -> Self {
        Self {
            order_by: OrderBy::for_field(field),
            page: 1,
            ..self.clone()
        }
    }

    pub fn with_order_direction_toggled(&self) -> Self {
        Self {
            order_by: self.order_by.reversed(),
            page: 1,
            ..self.clone()
        }
    }

    fn with_facet(&self, key: FacetKey, state: FacetState) -> Self {
        Self {
            facets: key.definition().patch_input(&self.facets, state),
            page: 1,
            ..self.clone()
        }
    }

    pub fn with_facet_activated(&self, key: FacetKey) -> Self {
        let state = self.facet(key);
        self.with_facet(key, FacetState::new(true, state.filter))
    }

    /// Deactivating a facet also discards its filter.
    pub fn with_facet_deactivated(&self, key: FacetKey) -> Self {
        self.with_facet(key, FacetState::INACTIVE)
    }

    /// Adds `value` to the facet's filter. The value is read like a URL list
    /// (split on commas, trimmed) so that it reads back unchanged from the
    /// URL. Blank values are ignored.
    pub fn with_filter_value(&self, key: FacetKey, value: &str) -> Self {
        let added = split_filter_values(value).collect::<Vec<_>>();
        if added.is_empty() {
            return self.clone();
        }
        let state = self.facet(key);
        let values = state.filter_values().iter().map(String::as_str).chain(added);
        self.with_facet(key, FacetState::from_values(state.active, values))
    }

    pub fn without_filter_value(&self, key: FacetKey, value: &str) -> Self {
        let state = self.facet(key);
        let filter = state.filter.as_ref().and_then(|filter| filter.without_value(value.trim()));
        self.with_facet(key, FacetState::new(state.active, filter))
    }

    /// Zero is not a valid page and leaves the controls unchanged.
    pub fn with_page(&self, page: u32) -> Self {
        if page == 0 {
            return self.clone();
        }
        Self { page, ..self.clone() }
    }

    /// Changing the page size returns to the first page. Zero is ignored.
    pub fn with_page_size(&self, limit: u32) -> Self {
        if limit == 0 {
            return self.clone();
        }
        Self {
            limit,
            page: 1,
            ..self.clone()
        }
    }
}
