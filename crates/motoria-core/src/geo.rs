//! The geo level taxonomy: eight nested scopes used to progressively widen
//! a catalog search, each with a minimum-result threshold.

use serde::{Deserialize, Serialize};

/// A geographic search scope, ordered from narrowest to widest.
///
/// `Mundo` is terminal: it has no wider level and a threshold of zero, so a
/// search at world scope is always accepted as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoLevel {
    Provincia,
    Comunidad,
    Limitrofes,
    Nacional,
    SuroesteEuropeo,
    UnionEuropea,
    Europa,
    Mundo,
}

/// All levels in escalation order, narrowest first.
pub const LEVEL_ORDER: [GeoLevel; 8] = [
    GeoLevel::Provincia,
    GeoLevel::Comunidad,
    GeoLevel::Limitrofes,
    GeoLevel::Nacional,
    GeoLevel::SuroesteEuropeo,
    GeoLevel::UnionEuropea,
    GeoLevel::Europa,
    GeoLevel::Mundo,
];

impl GeoLevel {
    /// The level immediately wider than this one, or `None` for `Mundo`.
    #[must_use]
    pub fn next(self) -> Option<GeoLevel> {
        match self {
            GeoLevel::Provincia => Some(GeoLevel::Comunidad),
            GeoLevel::Comunidad => Some(GeoLevel::Limitrofes),
            GeoLevel::Limitrofes => Some(GeoLevel::Nacional),
            GeoLevel::Nacional => Some(GeoLevel::SuroesteEuropeo),
            GeoLevel::SuroesteEuropeo => Some(GeoLevel::UnionEuropea),
            GeoLevel::UnionEuropea => Some(GeoLevel::Europa),
            GeoLevel::Europa => Some(GeoLevel::Mundo),
            GeoLevel::Mundo => None,
        }
    }

    /// Minimum number of results expected at this scope before the catalog
    /// offers to widen the search. `Mundo` maps to zero and never triggers.
    #[must_use]
    pub fn few_results_threshold(self) -> u32 {
        match self {
            GeoLevel::Provincia => 3,
            GeoLevel::Comunidad => 5,
            GeoLevel::Limitrofes => 6,
            GeoLevel::Nacional => 8,
            GeoLevel::SuroesteEuropeo => 10,
            GeoLevel::UnionEuropea | GeoLevel::Europa => 12,
            GeoLevel::Mundo => 0,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == GeoLevel::Mundo
    }

    /// Stable wire name, matching the serde representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GeoLevel::Provincia => "provincia",
            GeoLevel::Comunidad => "comunidad",
            GeoLevel::Limitrofes => "limitrofes",
            GeoLevel::Nacional => "nacional",
            GeoLevel::SuroesteEuropeo => "suroeste_europeo",
            GeoLevel::UnionEuropea => "union_europea",
            GeoLevel::Europa => "europa",
            GeoLevel::Mundo => "mundo",
        }
    }
}

impl std::fmt::Display for GeoLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GeoLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "provincia" => Ok(GeoLevel::Provincia),
            "comunidad" => Ok(GeoLevel::Comunidad),
            "limitrofes" => Ok(GeoLevel::Limitrofes),
            "nacional" => Ok(GeoLevel::Nacional),
            "suroeste_europeo" => Ok(GeoLevel::SuroesteEuropeo),
            "union_europea" => Ok(GeoLevel::UnionEuropea),
            "europa" => Ok(GeoLevel::Europa),
            "mundo" => Ok(GeoLevel::Mundo),
            other => Err(format!("unknown geo level '{other}'")),
        }
    }
}

/// Display name for a country code at the `Nacional` level.
///
/// Covers the markets the catalog actually serves; anything else falls back
/// to the raw code.
fn country_display_name(code: &str) -> &str {
    match code {
        "ES" => "España",
        "PT" => "Portugal",
        "FR" => "Francia",
        "AD" => "Andorra",
        "IT" => "Italia",
        "DE" => "Alemania",
        other => other,
    }
}

/// Human-readable name for a level, using override values where given and
/// falling back to the resolved user location.
///
/// The non-geographic levels have fixed names. At `Nacional` the default is
/// "España" when the country is `ES` or unknown.
#[must_use]
pub fn level_label(
    level: GeoLevel,
    province: Option<&str>,
    region: Option<&str>,
    country: Option<&str>,
) -> String {
    match level {
        GeoLevel::Provincia => province.unwrap_or("tu provincia").to_string(),
        GeoLevel::Comunidad => region.unwrap_or("tu comunidad").to_string(),
        GeoLevel::Limitrofes => "Cercanías".to_string(),
        GeoLevel::Nacional => match country {
            Some(code) if code != "ES" => country_display_name(code).to_string(),
            _ => "España".to_string(),
        },
        GeoLevel::SuroesteEuropeo => "Suroeste Europeo".to_string(),
        GeoLevel::UnionEuropea => "Unión Europea".to_string(),
        GeoLevel::Europa => "Europa".to_string(),
        GeoLevel::Mundo => "Todo el mundo".to_string(),
    }
}
