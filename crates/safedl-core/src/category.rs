//! Software categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;

/// One of the four software classifications.
///
/// Each category owns its own record collection and column configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Windows installers and ISOs.
    Windows,
    /// Office suites.
    Office,
    /// Utilities.
    Tools,
    /// Antivirus products.
    Antivirus,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Self; 4] = [Self::Windows, Self::Office, Self::Tools, Self::Antivirus];

    /// Lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Office => "office",
            Self::Tools => "tools",
            Self::Antivirus => "antivirus",
        }
    }

    /// Single-byte tag used to prefix storage keys.
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Windows => 1,
            Self::Office => 2,
            Self::Tools => 3,
            Self::Antivirus => 4,
        }
    }
}

impl FromStr for Category {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "windows" => Ok(Self::Windows),
            "office" => Ok(Self::Office),
            "tools" => Ok(Self::Tools),
            "antivirus" => Ok(Self::Antivirus),
            other => Err(CatalogError::InvalidCategory(other.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_matches_display() {
        for category in Category::ALL {
            assert_eq!(category.to_string().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = "games".parse::<Category>().unwrap_err();
        assert_eq!(err, CatalogError::InvalidCategory("games".into()));
    }

    #[test]
    fn tags_are_distinct() {
        let mut tags: Vec<u8> = Category::ALL.iter().map(|c| c.tag()).collect();
        tags.dedup();
        assert_eq!(tags.len(), 4);
    }
}
