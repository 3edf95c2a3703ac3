//! Default values the search controls start from and fall back to.

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    order_by::{OrderBy, OrderField},
};

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_LIMIT: u32 = 20;
pub const DEFAULT_ORDER_BY: OrderBy = OrderBy::descending(OrderField::PublishedAt);
pub const DEFAULT_QUERY_ORDER_BY: OrderBy = OrderBy::descending(OrderField::Relevance);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub default_language: String,
    /// Page size used when the URL carries none; omitted from URLs.
    pub default_limit: u32,
    /// Ordering used while there is no query string.
    pub default_order_by: OrderBy,
    /// Ordering forced when a new query string is entered.
    pub default_query_order_by: OrderBy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            default_limit: DEFAULT_LIMIT,
            default_order_by: DEFAULT_ORDER_BY,
            default_query_order_by: DEFAULT_QUERY_ORDER_BY,
        }
    }
}

impl SearchConfig {
    /// Parses a config document; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SearchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_limit == 0 {
            return Err(Error::InvalidConfig("default_limit must be greater than zero"));
        }
        if self.default_order_by.is_relevance() {
            return Err(Error::InvalidConfig("default_order_by cannot order by relevance"));
        }
        Ok(())
    }
}
