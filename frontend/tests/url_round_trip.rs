use futures::{FutureExt, StreamExt};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use search_common::{
    facet_registry::FacetKey,
    facet_state::FacetState,
    search_config::SearchConfig,
    search_controls::SearchControls,
};
use search_frontend::{
    controller::SearchController,
    data_definitions::{query_params::QueryParams, url_param::encode_component},
    url_codec::{decode_query_params, encode_controls},
};

fn fresh() -> SearchControls {
    SearchControls::initial(&SearchConfig::default(), "en")
}

fn matrix_url() -> QueryParams {
    [
        ("query", "matrix".to_string()),
        ("facets", "genre,videoResolution".to_string()),
        ("genre", encode_component("action, Action ,sci-fi")),
    ]
    .into_iter()
    .collect()
}

#[test]
fn decodes_a_shared_search_url() {
    let config = SearchConfig::default();
    let controls = decode_query_params(&config, &matrix_url(), &fresh());

    assert_eq!(controls.query_string.as_deref(), Some("matrix"));
    assert_eq!(controls.order_by, config.default_query_order_by);
    assert_eq!(
        controls.facet(FacetKey::Genre),
        FacetState::from_values(true, ["Action", "action", "sci-fi"])
    );
    assert!(controls.facet(FacetKey::VideoResolution).active);
    assert_eq!(controls.facet(FacetKey::VideoResolution).filter, None);
    assert_eq!(controls.facet(FacetKey::Language), FacetState::INACTIVE);
}

#[test]
fn clearing_the_query_restores_structural_ordering() {
    let config = SearchConfig::default();
    let searched = decode_query_params(&config, &matrix_url(), &fresh());
    let cleared = decode_query_params(&config, &QueryParams::new(), &searched);

    assert_eq!(cleared.query_string, None);
    assert_eq!(cleared.order_by, config.default_order_by);
    assert!(cleared.facet(FacetKey::Genre).active);
    assert!(cleared.facet(FacetKey::VideoResolution).active);
    assert_eq!(cleared.facets, searched.facets);
}

#[test]
fn shared_url_survives_a_round_trip() {
    let config = SearchConfig::default();
    let controls = decode_query_params(&config, &matrix_url(), &fresh());
    let encoded = encode_controls(&config, &controls);
    assert_eq!(
        encoded.to_query_string(),
        "facets=genre,videoResolution&genre=Action%2Caction%2Csci-fi&query=matrix"
    );
    assert_eq!(decode_query_params(&config, &encoded, &controls), controls);
}

#[test]
fn controller_streams_follow_url_changes() {
    let controller = SearchController::new(SearchConfig::default(), "en");
    let mut controls = controller.controls();
    let mut params = controller.params();

    assert_eq!(controls.next().now_or_never().flatten().map(|c| c.page), Some(1));
    assert!(params.next().now_or_never().flatten().is_some());

    controller.apply_query_params(&matrix_url()).unwrap();
    let latest = controls.next().now_or_never().flatten().unwrap();
    assert_eq!(latest.query_string.as_deref(), Some("matrix"));
    let fetched = params.next().now_or_never().flatten().unwrap();
    assert_eq!(fetched.facets.len(), 2);

    controller.select_language("fr").unwrap();
    assert_eq!(controls.next().now_or_never().flatten().unwrap().language, "fr");
    assert!(params.next().now_or_never().is_none());

    assert_eq!(controller.query_params(), encode_controls(controller.config(), &latest));
}

fn filter_input() -> impl Strategy<Value = (FacetKey, bool, String)> {
    (
        prop::sample::select(FacetKey::ALL.to_vec()),
        any::<bool>(),
        "[a-zA-Z ,%&=+é]{0,8}",
    )
}

proptest! {
    #[test]
    fn facet_intents_read_back_unchanged_from_the_url(inputs in prop::collection::vec(filter_input(), 1..10)) {
        let config = SearchConfig::default();
        let controls = inputs.iter().fold(fresh(), |controls, (key, activate, value)| {
            let controls = controls.with_filter_value(*key, value);
            if *activate { controls.with_facet_activated(*key) } else { controls }
        });
        let url = QueryParams::parse(&encode_controls(&config, &controls).to_query_string());
        prop_assert_eq!(decode_query_params(&config, &url, &controls), controls);
    }

    #[test]
    fn filter_parameter_normalises(values in prop::collection::vec("[a-zA-Z][a-zA-Z ]{0,5}", 1..8)) {
        let config = SearchConfig::default();
        let url: QueryParams = [
            ("facets", "torrentTag".to_string()),
            ("torrentTag", encode_component(&values.join(","))),
        ]
        .into_iter()
        .collect();
        let controls = decode_query_params(&config, &url, &fresh());

        let mut expected = values.iter().map(|value| value.trim().to_string()).collect::<Vec<_>>();
        expected.sort();
        expected.dedup();
        prop_assert_eq!(controls.facet(FacetKey::TorrentTag).filter_values().to_vec(), expected.clone());

        let encoded = encode_controls(&config, &controls);
        let reencoded = encode_component(&expected.join(","));
        prop_assert_eq!(encoded.get("torrentTag"), Some(reencoded.as_str()));
    }

    #[test]
    fn encoding_omits_defaults(page in 1u32..50, limit in 1u32..200) {
        let config = SearchConfig::default();
        let controls = fresh().with_page_size(limit).with_page(page);
        let encoded = encode_controls(&config, &controls);
        prop_assert_eq!(encoded.contains_key("page"), page != 1);
        prop_assert_eq!(encoded.contains_key("limit"), limit != config.default_limit);
    }
}
