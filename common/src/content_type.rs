//! Content type taxonomy and the content type filter selection.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Movie,
    TvShow,
    Music,
    Ebook,
    Comic,
    Audiobook,
    Game,
    Software,
    Xxx,
}

impl ContentType {
    pub const ALL: [ContentType; 9] = [
        ContentType::Movie,
        ContentType::TvShow,
        ContentType::Music,
        ContentType::Ebook,
        ContentType::Comic,
        ContentType::Audiobook,
        ContentType::Game,
        ContentType::Software,
        ContentType::Xxx,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Movie => "movie",
            ContentType::TvShow => "tv_show",
            ContentType::Music => "music",
            ContentType::Ebook => "ebook",
            ContentType::Comic => "comic",
            ContentType::Audiobook => "audiobook",
            ContentType::Game => "game",
            ContentType::Software => "software",
            ContentType::Xxx => "xxx",
        }
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentType::ALL
            .into_iter()
            .find(|content_type| content_type.as_str() == s)
            .ok_or_else(|| Error::UnknownContentType(s.to_string()))
    }
}

/// Key used for torrents without a detected content type.
pub const UNKNOWN_CONTENT_TYPE_KEY: &str = "null";

/// A content type filter. "Any content type" is the absence of a selection
/// (`Option::None`) and is not represented here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ContentTypeSelection {
    Type(ContentType),
    /// Only torrents whose content type could not be determined.
    Unknown,
}

impl ContentTypeSelection {
    /// Every selectable value, in display order.
    pub fn all() -> impl Iterator<Item = ContentTypeSelection> {
        ContentType::ALL
            .into_iter()
            .map(ContentTypeSelection::Type)
            .chain(std::iter::once(ContentTypeSelection::Unknown))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentTypeSelection::Type(content_type) => content_type.as_str(),
            ContentTypeSelection::Unknown => UNKNOWN_CONTENT_TYPE_KEY,
        }
    }

    pub fn content_type(&self) -> Option<ContentType> {
        match self {
            ContentTypeSelection::Type(content_type) => Some(*content_type),
            ContentTypeSelection::Unknown => None,
        }
    }
}

impl From<ContentType> for ContentTypeSelection {
    fn from(value: ContentType) -> Self {
        ContentTypeSelection::Type(value)
    }
}

impl Display for ContentTypeSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentTypeSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == UNKNOWN_CONTENT_TYPE_KEY {
            return Ok(ContentTypeSelection::Unknown);
        }
        s.parse().map(ContentTypeSelection::Type)
    }
}

impl TryFrom<String> for ContentTypeSelection {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ContentTypeSelection> for String {
    fn from(value: ContentTypeSelection) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_known_key() {
        for selection in ContentTypeSelection::all() {
            let parsed: ContentTypeSelection = selection.as_str().parse().unwrap();
            assert_eq!(parsed, selection);
        }
    }

    #[test]
    fn null_key_is_the_unknown_selection() {
        let parsed: ContentTypeSelection = "null".parse().unwrap();
        assert_eq!(parsed, ContentTypeSelection::Unknown);
        assert_eq!(parsed.content_type(), None);
    }

    #[test]
    fn rejects_unknown_and_differently_cased_keys() {
        assert!("series".parse::<ContentTypeSelection>().is_err());
        assert!("Movie".parse::<ContentTypeSelection>().is_err());
        assert!("".parse::<ContentTypeSelection>().is_err());
    }

    #[test]
    fn serializes_as_plain_key() {
        let json = serde_json::to_string(&ContentTypeSelection::Type(ContentType::TvShow)).unwrap();
        assert_eq!(json, "\"tv_show\"");
        let back: ContentTypeSelection = serde_json::from_str("\"null\"").unwrap();
        assert_eq!(back, ContentTypeSelection::Unknown);
    }
}
