//! The search controller: single owner of the current [`SearchControls`].
//!
//! Every change goes through [`SearchController::update`], which applies a
//! patch to the current value and publishes the result to all subscribers
//! before the next patch can start. Subscribers get `Arc` snapshots and never
//! see a half-applied patch.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::{Stream, StreamExt, channel::mpsc, future};
use search_common::{
    content_type::ContentTypeSelection,
    facet_registry::FacetKey,
    order_by::OrderField,
    search_config::SearchConfig,
    search_controls::SearchControls,
    search_params::SearchParams,
};
use thiserror::Error;
use tracing::{debug, error};

use crate::{
    data_definitions::query_params::QueryParams,
    url_codec::{encode_controls, query_params_patch},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// A patch added or removed facet keys. This is a bug in the patch, not
    /// bad user input; the state is left as it was.
    #[error("patch changed the facet keys: expected {expected:?}, got {actual:?}")]
    FacetKeysMismatch {
        expected: Vec<FacetKey>,
        actual: Vec<FacetKey>,
    },
}

pub type ControlsSnapshot = Arc<SearchControls>;

/// Current and future controls; see [`SearchController::controls`].
pub type ControlsStream = mpsc::UnboundedReceiver<ControlsSnapshot>;

struct ControllerState {
    controls: ControlsSnapshot,
    subscribers: Vec<mpsc::UnboundedSender<ControlsSnapshot>>,
}

/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct SearchController {
    config: Arc<SearchConfig>,
    state: Arc<Mutex<ControllerState>>,
}

impl std::fmt::Debug for SearchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchController")
            .field("controls", &self.current())
            .finish_non_exhaustive()
    }
}

impl SearchController {
    /// Starts from the initial controls in the given display language.
    pub fn new(config: SearchConfig, language: impl Into<String>) -> Self {
        let controls = SearchControls::initial(&config, language);
        Self::from_parts(config, controls)
    }

    /// Starts from the initial controls in the configured default language.
    pub fn from_config(config: SearchConfig) -> Self {
        let language = config.default_language.clone();
        Self::new(config, language)
    }

    /// Starts from previously built controls, which must cover every facet.
    pub fn with_controls(config: SearchConfig, controls: SearchControls) -> Result<Self, ControllerError> {
        check_facet_keys(&controls)?;
        Ok(Self::from_parts(config, controls))
    }

    fn from_parts(config: SearchConfig, controls: SearchControls) -> Self {
        Self {
            config: Arc::new(config),
            state: Arc::new(Mutex::new(ControllerState {
                controls: Arc::new(controls),
                subscribers: Vec::new(),
            })),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        // patches are pure, so a panicking one cannot leave the slot half written
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current(&self) -> ControlsSnapshot {
        self.lock().controls.clone()
    }

    /// Applies `patch` to the current controls and publishes the result.
    ///
    /// The result is published even when it equals the previous value;
    /// [`SearchController::params`] filters out repeats for fetching.
    /// `patch` runs while the controller is locked and must not call back
    /// into the controller.
    pub fn update<F>(&self, patch: F) -> Result<ControlsSnapshot, ControllerError>
    where
        F: FnOnce(&SearchControls) -> SearchControls,
    {
        let mut state = self.lock();
        let next = patch(state.controls.as_ref());
        if let Err(err) = check_facet_keys(&next) {
            error!(%err, "rejected search controls patch");
            return Err(err);
        }
        let next = Arc::new(next);
        state.controls = next.clone();
        state
            .subscribers
            .retain(|subscriber| subscriber.unbounded_send(next.clone()).is_ok());
        debug!(
            query = ?next.query_string,
            page = next.page,
            limit = next.limit,
            content_type = ?next.content_type,
            order_by = ?next.order_by,
            subscribers = state.subscribers.len(),
            "search controls updated"
        );
        Ok(next)
    }

    /// Subscribes to the controls. The current value is delivered first,
    /// followed by every later update in order.
    pub fn controls(&self) -> ControlsStream {
        let (sender, receiver) = mpsc::unbounded();
        let mut state = self.lock();
        if sender.unbounded_send(state.controls.clone()).is_ok() {
            state.subscribers.push(sender);
        }
        receiver
    }

    /// The fetch parameters derived from [`SearchController::controls`], with
    /// consecutive duplicates dropped so that unrelated changes such as the
    /// display language do not trigger a refetch.
    pub fn params(&self) -> impl Stream<Item = SearchParams> + Send + use<> {
        let mut last: Option<SearchParams> = None;
        self.controls().filter_map(move |controls| {
            let params = SearchParams::from_controls(&controls);
            let changed = last.as_ref() != Some(&params);
            if changed {
                last = Some(params.clone());
            }
            future::ready(changed.then_some(params))
        })
    }

    pub fn select_language(&self, language: impl Into<String>) -> Result<ControlsSnapshot, ControllerError> {
        let language = language.into();
        self.update(|controls| controls.with_language(language))
    }

    /// Applies a URL query, see [`crate::url_codec::decode_query_params`].
    pub fn apply_query_params(&self, params: &QueryParams) -> Result<ControlsSnapshot, ControllerError> {
        self.update(query_params_patch(&self.config, params))
    }

    /// The URL query for the current controls.
    pub fn query_params(&self) -> QueryParams {
        encode_controls(&self.config, &self.current())
    }

    pub fn set_query_string(&self, query_string: impl Into<String>) -> Result<ControlsSnapshot, ControllerError> {
        let query_string = query_string.into();
        self.update(|controls| controls.with_query_string(&self.config, Some(query_string)))
    }

    pub fn select_content_type(
        &self,
        content_type: Option<ContentTypeSelection>,
    ) -> Result<ControlsSnapshot, ControllerError> {
        self.update(|controls| controls.with_content_type(content_type))
    }

    pub fn select_order_by(&self, field: OrderField) -> Result<ControlsSnapshot, ControllerError> {
        self.update(|controls| controls.with_order_field(field))
    }

    pub fn toggle_order_by_direction(&self) -> Result<ControlsSnapshot, ControllerError> {
        self.update(SearchControls::with_order_direction_toggled)
    }

    pub fn activate_facet(&self, key: FacetKey) -> Result<ControlsSnapshot, ControllerError> {
        self.update(|controls| controls.with_facet_activated(key))
    }

    pub fn deactivate_facet(&self, key: FacetKey) -> Result<ControlsSnapshot, ControllerError> {
        self.update(|controls| controls.with_facet_deactivated(key))
    }

    pub fn activate_filter(&self, key: FacetKey, value: &str) -> Result<ControlsSnapshot, ControllerError> {
        self.update(|controls| controls.with_filter_value(key, value))
    }

    pub fn deactivate_filter(&self, key: FacetKey, value: &str) -> Result<ControlsSnapshot, ControllerError> {
        self.update(|controls| controls.without_filter_value(key, value))
    }

    pub fn set_page(&self, page: u32) -> Result<ControlsSnapshot, ControllerError> {
        self.update(|controls| controls.with_page(page))
    }

    pub fn set_page_size(&self, limit: u32) -> Result<ControlsSnapshot, ControllerError> {
        self.update(|controls| controls.with_page_size(limit))
    }
}

fn check_facet_keys(controls: &SearchControls) -> Result<(), ControllerError> {
    if controls.facets.has_registry_keys() {
        return Ok(());
    }
    Err(ControllerError::FacetKeysMismatch {
        expected: FacetKey::ALL.to_vec(),
        actual: controls.facets.keys().collect(),
    })
}
