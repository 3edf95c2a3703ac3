//! Search state models shared between the URL codec, the controller and the
//! fetch layer.

pub mod error;
pub mod content_type;
pub mod order_by;
pub mod facet_state;
pub mod facet_registry;
pub mod aggregation;
pub mod search_config;
pub mod search_controls;
pub mod search_params;
