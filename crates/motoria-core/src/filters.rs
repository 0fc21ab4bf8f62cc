//! Catalog filters and state.
//!
//! The location constraint is a tagged union rather than three optional
//! fields, so "at most one location shape at a time" holds by construction.
//! Catalog state transitions are pure: methods return new values, nothing
//! mutates in place.

use serde::{Deserialize, Serialize};

use crate::geo::GeoLevel;

/// A user's resolved home geography. Snapshot taken once per session; the
/// escalation engine only derives filters from it and never writes back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLocation {
    pub country: Option<String>,
    pub province: Option<String>,
    pub region: Option<String>,
}

impl UserLocation {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.country.is_none() && self.province.is_none() && self.region.is_none()
    }
}

/// The single location constraint a vehicle query carries.
///
/// `Regions` holds the province names composing the widened scope (the
/// comunidad's provinces, or those plus the neighbouring comunidades').
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocationConstraint {
    Province { value: String },
    Regions { values: Vec<String> },
    Countries { values: Vec<String> },
    #[default]
    None,
}

impl LocationConstraint {
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, LocationConstraint::None)
    }
}

/// Query filters for published vehicles. Prices are whole euros, years are
/// model years. Non-location fields pass through level transitions unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleFilters {
    pub category: Option<String>,
    pub brand: Option<String>,
    pub price_min: Option<i64>,
    pub price_max: Option<i64>,
    pub year_min: Option<i16>,
    pub year_max: Option<i16>,
    #[serde(default)]
    pub location: LocationConstraint,
}

impl VehicleFilters {
    /// The same filters with a different location constraint.
    #[must_use]
    pub fn with_location(&self, location: LocationConstraint) -> Self {
        Self {
            location,
            ..self.clone()
        }
    }
}

/// The catalog's effective scope: a current level (or `None` when not yet
/// determined) plus the active filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogState {
    pub level: Option<GeoLevel>,
    pub filters: VehicleFilters,
}

impl CatalogState {
    #[must_use]
    pub fn new(level: Option<GeoLevel>, filters: VehicleFilters) -> Self {
        Self { level, filters }
    }

    /// A copy of this state at a different level, keeping the filters.
    #[must_use]
    pub fn with_level(&self, level: GeoLevel) -> Self {
        Self {
            level: Some(level),
            filters: self.filters.clone(),
        }
    }

    /// A copy of this state with replacement filters, keeping the level.
    #[must_use]
    pub fn with_filters(&self, filters: VehicleFilters) -> Self {
        Self {
            level: self.level,
            filters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_constraint_is_none() {
        let filters = VehicleFilters::default();
        assert!(filters.location.is_none());
    }

    #[test]
    fn with_location_preserves_other_fields() {
        let filters = VehicleFilters {
            category: Some("suv".to_string()),
            price_min: Some(5_000),
            location: LocationConstraint::Province {
                value: "Madrid".to_string(),
            },
            ..VehicleFilters::default()
        };
        let widened = filters.with_location(LocationConstraint::Countries {
            values: vec!["ES".to_string()],
        });
        assert_eq!(widened.category.as_deref(), Some("suv"));
        assert_eq!(widened.price_min, Some(5_000));
        assert!(matches!(widened.location, LocationConstraint::Countries { .. }));
    }

    #[test]
    fn constraint_serializes_with_kind_tag() {
        let constraint = LocationConstraint::Regions {
            values: vec!["Lérida".to_string(), "Barcelona".to_string()],
        };
        let json = serde_json::to_value(&constraint).expect("serialize");
        assert_eq!(json["kind"], "regions");
        assert_eq!(json["values"][0], "Lérida");

        let none = serde_json::to_value(LocationConstraint::None).expect("serialize");
        assert_eq!(none["kind"], "none");
    }

    #[test]
    fn state_transitions_return_new_values() {
        let state = CatalogState::new(Some(GeoLevel::Provincia), VehicleFilters::default());
        let wider = state.with_level(GeoLevel::Comunidad);
        assert_eq!(state.level, Some(GeoLevel::Provincia));
        assert_eq!(wider.level, Some(GeoLevel::Comunidad));
    }

    #[test]
    fn catalog_state_round_trips_through_json() {
        let state = CatalogState::new(
            Some(GeoLevel::Limitrofes),
            VehicleFilters {
                brand: Some("Seat".to_string()),
                location: LocationConstraint::Regions {
                    values: vec!["Zaragoza".to_string()],
                },
                ..VehicleFilters::default()
            },
        );
        let json = serde_json::to_string(&state).expect("serialize");
        let back: CatalogState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, state);
    }
}
