//! Search page state: the controller, its URL codec and URL sync, and the
//! facet sidebar model.

pub mod controller;
pub mod data_definitions;
pub mod facet_view;
pub mod url_codec;
pub mod url_sync;
