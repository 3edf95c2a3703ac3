//! Keeps the browser URL and the search controller in step.
//!
//! URL changes are decoded into the controller, language changes are
//! forwarded to it, and every controls change is encoded back into the URL
//! unless the URL already says the same thing.

use anyhow::Context;
use futures::{Stream, StreamExt, future, stream};
use search_common::{search_config::SearchConfig, search_controls::SearchControls};
use tracing::debug;

use crate::{controller::SearchController, data_definitions::query_params::QueryParams, url_codec::encode_controls};

/// Rewrites the shareable URL, e.g. through the router's history API,
/// without reloading the page.
pub trait NavigationSink {
    fn replace_query(&mut self, params: &QueryParams) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// The URL query changed, by navigation or by our own rewrite.
    UrlChanged(QueryParams),
    /// The UI language changed.
    LanguageChanged(String),
}

/// Tracks the query currently in the URL so that encoding the state it
/// produced does not write the same URL back.
#[derive(Debug, Clone, Default)]
pub struct UrlSync {
    current_url: Option<QueryParams>,
}

impl UrlSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe_url(&mut self, params: &QueryParams) {
        self.current_url = Some(params.clone());
    }

    /// The query to write for `controls`, or `None` when the URL already
    /// holds it.
    pub fn on_controls(&mut self, config: &SearchConfig, controls: &SearchControls) -> Option<QueryParams> {
        let encoded = encode_controls(config, controls);
        if self.current_url.as_ref() == Some(&encoded) {
            return None;
        }
        self.current_url = Some(encoded.clone());
        Some(encoded)
    }
}

enum SyncInput {
    Event(SyncEvent),
    ControlsChanged,
    EventsClosed,
}

fn write_url<N: NavigationSink>(
    sync: &mut UrlSync,
    controller: &SearchController,
    sink: &mut N,
) -> anyhow::Result<()> {
    // always encode the latest controls, a queued snapshot may already be stale
    let Some(params) = sync.on_controls(controller.config(), &controller.current()) else {
        return Ok(());
    };
    debug!(query = %params.to_query_string(), "rewriting search url");
    sink.replace_query(&params).context("failed to rewrite the search url")
}

/// Runs until `events` ends. `initial_url` is the query the page was opened
/// with; it is applied before anything is written back.
pub async fn run_url_sync<S, N>(
    controller: SearchController,
    initial_url: QueryParams,
    events: S,
    sink: &mut N,
) -> anyhow::Result<()>
where
    S: Stream<Item = SyncEvent> + Unpin,
    N: NavigationSink,
{
    let mut sync = UrlSync::new();
    sync.observe_url(&initial_url);
    controller.apply_query_params(&initial_url)?;

    let events = events
        .map(SyncInput::Event)
        .chain(stream::once(future::ready(SyncInput::EventsClosed)));
    let changes = controller.controls().map(|_| SyncInput::ControlsChanged);
    let mut inputs = stream::select(events, changes);

    while let Some(input) = inputs.next().await {
        match input {
            SyncInput::Event(SyncEvent::UrlChanged(params)) => {
                sync.observe_url(&params);
                controller.apply_query_params(&params)?;
            }
            SyncInput::Event(SyncEvent::LanguageChanged(language)) => {
                controller.select_language(language)?;
            }
            SyncInput::ControlsChanged => write_url(&mut sync, &controller, sink)?,
            SyncInput::EventsClosed => break,
        }
    }
    write_url(&mut sync, &controller, sink)
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use search_common::facet_registry::FacetKey;

    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        writes: Vec<String>,
    }

    impl NavigationSink for RecordingSink {
        fn replace_query(&mut self, params: &QueryParams) -> anyhow::Result<()> {
            self.writes.push(params.to_query_string());
            Ok(())
        }
    }

    struct FailingSink;

    impl NavigationSink for FailingSink {
        fn replace_query(&mut self, _params: &QueryParams) -> anyhow::Result<()> {
            anyhow::bail!("history is gone")
        }
    }

    fn run(initial_url: &str, events: Vec<SyncEvent>) -> (SearchController, Vec<String>) {
        let controller = SearchController::new(SearchConfig::default(), "en");
        let mut sink = RecordingSink::default();
        block_on(run_url_sync(
            controller.clone(),
            QueryParams::parse(initial_url),
            stream::iter(events),
            &mut sink,
        ))
        .unwrap();
        (controller, sink.writes)
    }

    #[test]
    fn url_that_produced_the_state_is_not_written_back() {
        let config = SearchConfig::default();
        let mut sync = UrlSync::new();
        let url = QueryParams::parse("query=dune&facets=genre");
        sync.observe_url(&url);
        let controller = SearchController::new(config.clone(), "en");
        let controls = controller.apply_query_params(&url).unwrap();
        assert_eq!(sync.on_controls(&config, &controls), None);
    }

    #[test]
    fn changed_state_is_written_once() {
        let config = SearchConfig::default();
        let mut sync = UrlSync::new();
        sync.observe_url(&QueryParams::new());
        let controls = SearchControls::initial(&config, "en").with_facet_activated(FacetKey::FileType);
        assert_eq!(
            sync.on_controls(&config, &controls).map(|params| params.to_query_string()),
            Some("facets=fileType".to_string())
        );
        assert_eq!(sync.on_controls(&config, &controls), None);
    }

    #[test]
    fn unnormalised_url_is_rewritten() {
        let config = SearchConfig::default();
        let mut sync = UrlSync::new();
        let url = QueryParams::parse("page=1&facets=genre,genre");
        sync.observe_url(&url);
        let controller = SearchController::new(config.clone(), "en");
        let controls = controller.apply_query_params(&url).unwrap();
        assert_eq!(
            sync.on_controls(&config, &controls).map(|params| params.to_query_string()),
            Some("facets=genre".to_string())
        );
    }

    #[test]
    fn opening_a_normalised_url_writes_nothing() {
        let (controller, writes) = run("query=dune&facets=genre", vec![]);
        assert_eq!(writes, Vec::<String>::new());
        assert_eq!(controller.current().query_string.as_deref(), Some("dune"));
    }

    #[test]
    fn language_change_does_not_touch_the_url() {
        let (controller, writes) = run("query=dune", vec![SyncEvent::LanguageChanged("fr".to_string())]);
        assert_eq!(writes, Vec::<String>::new());
        assert_eq!(controller.current().language, "fr");
    }

    #[test]
    fn navigation_to_an_unnormalised_url_is_rewritten_once() {
        let (controller, writes) = run(
            "",
            vec![SyncEvent::UrlChanged(QueryParams::parse("page=1&facets=genre,genre"))],
        );
        assert_eq!(writes, vec!["facets=genre".to_string()]);
        assert!(controller.current().facet(FacetKey::Genre).active);
    }

    #[test]
    fn sink_failures_are_reported() {
        let controller = SearchController::new(SearchConfig::default(), "en");
        let result = block_on(run_url_sync(
            controller,
            QueryParams::parse("limit=20"),
            stream::iter(Vec::new()),
            &mut FailingSink,
        ));
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "failed to rewrite the search url");
    }
}
