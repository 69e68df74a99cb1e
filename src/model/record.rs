//! Harvested record types

use serde::Serialize;
use std::fmt;

/// Stock status of a catalogue item
///
/// Serialized with the catalogue's own labels so exported files read the
/// same as the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Availability {
    #[default]
    #[serde(rename = "В наличии")]
    InStock,

    #[serde(rename = "Ограниченное количество")]
    LimitedStock,

    #[serde(rename = "Нет в продаже")]
    OutOfStock,

    #[serde(rename = "Ожидается")]
    Expected,
}

impl Availability {
    /// Returns the catalogue label for this status
    pub fn label(&self) -> &'static str {
        match self {
            Self::InStock => "В наличии",
            Self::LimitedStock => "Ограниченное количество",
            Self::OutOfStock => "Нет в продаже",
            Self::Expected => "Ожидается",
        }
    }

    /// Returns true if the item can currently be bought
    pub fn is_purchasable(&self) -> bool {
        matches!(self, Self::InStock | Self::LimitedStock)
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One harvested catalogue record
///
/// Created once by a fetch task and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(rename = "id")]
    pub identifier: String,
    pub url: String,
    /// Empty when no title node was found
    pub title: String,
    /// Empty when no price node was found
    pub price: String,
    pub availability: Availability,
    pub image_links: Vec<String>,
}

impl Record {
    /// Creates a record with every extracted field at its default
    pub fn empty(identifier: &str, url: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            url: url.to_string(),
            title: String::new(),
            price: String::new(),
            availability: Availability::default(),
            image_links: Vec::new(),
        }
    }
}
