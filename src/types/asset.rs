//! Tradable asset records.

use std::fmt;

/// A tradable asset.
///
/// `quantity` is the total number of shares issued. It is informational
/// only; the engine never checks positions against it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Asset {
    /// Unique asset identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Total issued shares
    pub quantity: u64,
}

impl Asset {
    /// Create a new asset
    ///
    /// # Example
    ///
    /// ```
    /// use matchbook::types::Asset;
    ///
    /// let asset = Asset::new("asset1", "Asset 1", 100);
    /// assert_eq!(asset.id, "asset1");
    /// ```
    pub fn new(id: impl Into<String>, name: impl Into<String>, quantity: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity,
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
