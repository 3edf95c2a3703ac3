//! The fixed set of facets the torrent search can filter on.
//!
//! Each [`FacetDefinition`] knows how to read and write its slice of the
//! [`FacetStates`] map, which aggregation field the backend reports its counts
//! under, and how to turn an aggregation entry into a display label.

use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    aggregation::{AggregationEntry, Aggregations},
    content_type::{ContentType, ContentTypeSelection},
    error::Error,
    facet_state::{FacetState, FacetStates},
};

/// Declaration order is registry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FacetKey {
    Genre,
    Language,
    FileType,
    TorrentSource,
    TorrentTag,
    VideoResolution,
    VideoSource,
}

impl FacetKey {
    pub const ALL: [FacetKey; 7] = [
        FacetKey::Genre,
        FacetKey::Language,
        FacetKey::FileType,
        FacetKey::TorrentSource,
        FacetKey::TorrentTag,
        FacetKey::VideoResolution,
        FacetKey::VideoSource,
    ];

    /// URL parameter name and backend aggregation field.
    pub fn as_str(&self) -> &'static str {
        match self {
            FacetKey::Genre => "genre",
            FacetKey::Language => "language",
            FacetKey::FileType => "fileType",
            FacetKey::TorrentSource => "torrentSource",
            FacetKey::TorrentTag => "torrentTag",
            FacetKey::VideoResolution => "videoResolution",
            FacetKey::VideoSource => "videoSource",
        }
    }

    pub fn definition(&self) -> &'static FacetDefinition {
        // FACETS is declared in the same order as the enum.
        &FACETS[*self as usize]
    }
}

impl Display for FacetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacetKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FacetKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| Error::UnknownFacetKey(s.to_string()))
    }
}

/// Resolves translation keys for the active display language.
///
/// Implemented by the localisation layer; the search engine only forwards the
/// language code and never reads translation tables itself.
pub trait Translator {
    fn translate(&self, language: &str, key: &str) -> Option<String>;
}

impl<F> Translator for F
where
    F: Fn(&str, &str) -> Option<String>,
{
    fn translate(&self, language: &str, key: &str) -> Option<String> {
        self(language, key)
    }
}

/// Translation tables keyed by language code, then by translation key.
impl Translator for BTreeMap<String, BTreeMap<String, String>> {
    fn translate(&self, language: &str, key: &str) -> Option<String> {
        self.get(language).and_then(|table| table.get(key)).cloned()
    }
}

/// Translator that knows no keys, so every label falls back to its raw value.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTranslations;

impl Translator for NoTranslations {
    fn translate(&self, _language: &str, _key: &str) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStrategy {
    /// The aggregation value is already human readable.
    Value,
    /// Look up `<prefix>.<value>` with the translator.
    Translated { prefix: &'static str },
    /// Use the label the backend sent along with the value.
    BackendLabel,
    /// Drop a fixed prefix from the value, e.g. `V1080p` becomes `1080p`.
    StripPrefix { prefix: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacetDefinition {
    pub key: FacetKey,
    /// When set, the facet is only shown for these content types.
    pub content_types: Option<&'static [ContentType]>,
    pub label_strategy: LabelStrategy,
}

impl FacetDefinition {
    pub fn extract_input(&self, facets: &FacetStates) -> FacetState {
        facets.get(self.key).cloned().unwrap_or(FacetState::INACTIVE)
    }

    /// Returns a new map with this facet's state replaced. `FacetFilter` is
    /// normalised at construction, so the stored filter is always sorted and
    /// deduplicated.
    pub fn patch_input(&self, facets: &FacetStates, state: FacetState) -> FacetStates {
        facets.with(self.key, state)
    }

    pub fn extract_aggregations(&self, aggregations: &Aggregations) -> Vec<AggregationEntry> {
        aggregations.get(self.key.as_str()).to_vec()
    }

    pub fn resolve_label(&self, entry: &AggregationEntry, translator: &dyn Translator, language: &str) -> String {
        match self.label_strategy {
            LabelStrategy::Value => entry.value.clone(),
            LabelStrategy::Translated { prefix } => translator
                .translate(language, &format!("{prefix}.{}", entry.value))
                .unwrap_or_else(|| entry.value.clone()),
            LabelStrategy::BackendLabel => entry.label.clone().unwrap_or_else(|| entry.value.clone()),
            LabelStrategy::StripPrefix { prefix } => entry
                .value
                .strip_prefix(prefix)
                .unwrap_or(&entry.value)
                .to_string(),
        }
    }

    /// Whether the facet should be offered for the selected content type.
    /// Relevance only gates visibility; stored state and fetch filters are
    /// unaffected.
    pub fn is_relevant(&self, content_type: Option<ContentTypeSelection>) -> bool {
        let Some(content_types) = self.content_types else { return true };
        match content_type.and_then(|selection| selection.content_type()) {
            Some(content_type) => content_types.contains(&content_type),
            None => false,
        }
    }
}

const VIDEO_CONTENT_TYPES: &[ContentType] = &[ContentType::Movie, ContentType::TvShow, ContentType::Xxx];

pub static FACETS: [FacetDefinition; 7] = [
    FacetDefinition {
        key: FacetKey::Genre,
        content_types: Some(&[ContentType::Movie, ContentType::TvShow]),
        label_strategy: LabelStrategy::Value,
    },
    FacetDefinition {
        key: FacetKey::Language,
        content_types: None,
        label_strategy: LabelStrategy::Translated { prefix: "languages" },
    },
    FacetDefinition {
        key: FacetKey::FileType,
        content_types: None,
        label_strategy: LabelStrategy::Translated { prefix: "file_types" },
    },
    FacetDefinition {
        key: FacetKey::TorrentSource,
        content_types: None,
        label_strategy: LabelStrategy::BackendLabel,
    },
    FacetDefinition {
        key: FacetKey::TorrentTag,
        content_types: None,
        label_strategy: LabelStrategy::Value,
    },
    FacetDefinition {
        key: FacetKey::VideoResolution,
        content_types: Some(VIDEO_CONTENT_TYPES),
        label_strategy: LabelStrategy::StripPrefix { prefix: "V" },
    },
    FacetDefinition {
        key: FacetKey::VideoSource,
        content_types: Some(VIDEO_CONTENT_TYPES),
        label_strategy: LabelStrategy::Value,
    },
];
