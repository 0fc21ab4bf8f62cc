//! Response types for the Nominatim `search` endpoint.
//!
//! Only the address fields the location resolver consumes are modelled; the
//! rest of the payload is ignored during deserialization.

use serde::Deserialize;

/// One entry of the JSON array returned by `GET /search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub address: Option<Address>,
}

/// The `addressdetails=1` block. Nominatim populates whichever of
/// `city`/`town`/`village` applies, and uses `state` for the comunidad.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Address {
    pub country_code: Option<String>,
    pub province: Option<String>,
    pub state: Option<String>,
    pub county: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
}

impl Address {
    /// The most specific populated settlement name.
    #[must_use]
    pub fn settlement(&self) -> Option<&str> {
        self.city
            .as_deref()
            .or(self.town.as_deref())
            .or(self.village.as_deref())
    }
}
