//! Result ordering definitions.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderField {
    /// Text match quality; only meaningful while a query string is set.
    Relevance,
    PublishedAt,
    UpdatedAt,
    Size,
    FilesCount,
    Seeders,
    Leechers,
    Name,
    InfoHash,
}

impl OrderField {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderField::Relevance => "relevance",
            OrderField::PublishedAt => "published_at",
            OrderField::UpdatedAt => "updated_at",
            OrderField::Size => "size",
            OrderField::FilesCount => "files_count",
            OrderField::Seeders => "seeders",
            OrderField::Leechers => "leechers",
            OrderField::Name => "name",
            OrderField::InfoHash => "info_hash",
        }
    }

    /// The direction this field is sorted in when first selected.
    pub fn default_direction(&self) -> OrderDirection {
        ORDER_BY_OPTIONS
            .iter()
            .find(|option| option.field == *self)
            .map(|option| option.direction)
            .unwrap_or(OrderDirection::Ascending)
    }
}

impl Display for OrderField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ORDER_BY_OPTIONS
            .iter()
            .map(|option| option.field)
            .find(|field| field.as_str() == s)
            .ok_or_else(|| Error::UnknownOrderField(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderDirection {
    Ascending,
    Descending,
}

impl OrderDirection {
    pub fn reversed(&self) -> Self {
        match self {
            OrderDirection::Ascending => OrderDirection::Descending,
            OrderDirection::Descending => OrderDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: OrderField,
    pub direction: OrderDirection,
}

impl OrderBy {
    pub const fn new(field: OrderField, direction: OrderDirection) -> Self {
        Self { field, direction }
    }

    pub const fn descending(field: OrderField) -> Self {
        Self::new(field, OrderDirection::Descending)
    }

    pub const fn ascending(field: OrderField) -> Self {
        Self::new(field, OrderDirection::Ascending)
    }

    /// Ordering on `field` in its natural direction.
    pub fn for_field(field: OrderField) -> Self {
        Self::new(field, field.default_direction())
    }

    pub fn is_relevance(&self) -> bool {
        self.field == OrderField::Relevance
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.field, self.direction.reversed())
    }
}

/// The orderings offered to the user, with the direction each starts in.
pub const ORDER_BY_OPTIONS: [OrderBy; 9] = [
    OrderBy::descending(OrderField::Relevance),
    OrderBy::descending(OrderField::PublishedAt),
    OrderBy::descending(OrderField::UpdatedAt),
    OrderBy::descending(OrderField::Size),
    OrderBy::descending(OrderField::FilesCount),
    OrderBy::descending(OrderField::Seeders),
    OrderBy::descending(OrderField::Leechers),
    OrderBy::ascending(OrderField::Name),
    OrderBy::ascending(OrderField::InfoHash),
];
