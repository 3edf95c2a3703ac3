//! Conversion between [`SearchControls`] and the shareable URL query.
//!
//! Decoding is total: unparsable values count as absent and fall back as
//! described per parameter. Encoding leaves out values equal to their
//! defaults so that URLs stay short.

use search_common::{
    facet_registry::{FACETS, FacetKey},
    facet_state::{FacetFilter, FacetState},
    search_config::SearchConfig,
    search_controls::{SearchControls, order_by_for_query},
};
use tracing::trace;

use crate::data_definitions::{
    query_params::QueryParams,
    url_param::{content_type_param, encode_component, int_param, string_list_param, string_param},
};

pub const QUERY_PARAM: &str = "query";
pub const PAGE_PARAM: &str = "page";
pub const LIMIT_PARAM: &str = "limit";
pub const CONTENT_TYPE_PARAM: &str = "content_type";
pub const FACETS_PARAM: &str = "facets";

/// Applies the URL query to `previous`.
///
/// - `page` and `limit` keep their previous value when missing or invalid;
/// - `query` and `content_type` become `None` when missing or invalid;
/// - without a `facets` parameter every facet keeps its activation;
/// - a facet's filter is replaced when its parameter is present, cleared
///   when the facet is listed in `facets` without one, and kept otherwise;
/// - the ordering follows [`order_by_for_query`];
/// - the language is never changed.
pub fn decode_query_params(config: &SearchConfig, params: &QueryParams, previous: &SearchControls) -> SearchControls {
    let query_string = string_param(params, QUERY_PARAM);
    let order_by = order_by_for_query(
        config,
        previous.query_string.as_deref(),
        query_string.as_deref(),
        previous.order_by,
    );
    let listed_facets = params
        .contains_key(FACETS_PARAM)
        .then(|| string_list_param(params, FACETS_PARAM).unwrap_or_default());
    for unknown in listed_facets.iter().flatten().filter(|key| key.parse::<FacetKey>().is_err()) {
        trace!(facet = %unknown, "ignoring unknown facet in url");
    }
    let facets = FACETS.iter().fold(previous.facets.clone(), |facets, facet| {
        let kept = facet.extract_input(&facets);
        let active = match &listed_facets {
            Some(listed) => listed.iter().any(|key| key == facet.key.as_str()),
            None => kept.active,
        };
        let filter = match string_list_param(params, facet.key.as_str()) {
            Some(values) => FacetFilter::new(values),
            // only listed facets carry their filter in the url
            None if active && listed_facets.is_some() => None,
            None => kept.filter,
        };
        facet.patch_input(&facets, FacetState::new(active, filter))
    });
    SearchControls {
        language: previous.language.clone(),
        query_string,
        page: int_param(params, PAGE_PARAM).unwrap_or(previous.page),
        limit: int_param(params, LIMIT_PARAM).unwrap_or(previous.limit),
        content_type: content_type_param(params, CONTENT_TYPE_PARAM),
        order_by,
        facets,
    }
}

/// Builds the patch for [`SearchController::update`](crate::controller::SearchController::update)
/// that applies `params`.
pub fn query_params_patch<'a>(
    config: &'a SearchConfig,
    params: &'a QueryParams,
) -> impl FnOnce(&SearchControls) -> SearchControls + 'a {
    move |previous| decode_query_params(config, params, previous)
}

/// Renders `controls` as URL query parameters.
///
/// Active facet keys are listed in sorted order, the same order decoding
/// produces, so a decoded URL re-encodes to itself.
pub fn encode_controls(config: &SearchConfig, controls: &SearchControls) -> QueryParams {
    let mut params = QueryParams::new();
    if let Some(query_string) = controls.query_string.as_deref().filter(|query| !query.is_empty()) {
        params.insert(QUERY_PARAM, encode_component(query_string));
    }
    if controls.page != 1 {
        params.insert(PAGE_PARAM, controls.page.to_string());
    }
    if controls.limit != config.default_limit {
        params.insert(LIMIT_PARAM, controls.limit.to_string());
    }
    if let Some(content_type) = controls.content_type {
        params.insert(CONTENT_TYPE_PARAM, content_type.as_str());
    }

    let mut active_keys = controls.facets.active_keys().map(|key| key.as_str()).collect::<Vec<_>>();
    active_keys.sort_unstable();
    if !active_keys.is_empty() {
        params.insert(FACETS_PARAM, active_keys.join(","));
    }
    for (key, state) in controls.facets.iter().filter(|(_, state)| state.active) {
        if let Some(filter) = &state.filter {
            params.insert(key.as_str(), encode_component(&filter.join(",")));
        }
    }
    params
}
