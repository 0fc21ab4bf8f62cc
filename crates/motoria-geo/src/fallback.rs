//! The geo-fallback engine.
//!
//! Decides whether a result set is too small for its scope, computes the
//! next wider scope's filters, and previews that scope's result count
//! through a read-only probe. Escalation itself is a pure state transition:
//! scopes only move forward along the level order, and `mundo` is terminal.

use serde::Serialize;

use motoria_core::{
    level_label, CatalogState, GeoLevel, LocationConstraint, UserLocation, VehicleFilters,
};

use crate::tables::{
    canonical_province, canonical_region, provinces_of_region,
    provinces_of_region_and_neighbours, region_of_province, EUROPE, EUROPEAN_UNION,
    SOUTHWEST_EUROPE,
};

/// The level immediately wider than `current`, or `None` when the scope is
/// unset or already at world level.
#[must_use]
pub fn next_level(current: Option<GeoLevel>) -> Option<GeoLevel> {
    current.and_then(GeoLevel::next)
}

/// True iff there ARE results but fewer than the level's threshold.
///
/// A count of exactly zero is never "few": the empty case is a distinct,
/// more severe condition reported separately by [`is_empty_results`].
#[must_use]
pub fn is_few_results(level: Option<GeoLevel>, count: u32) -> bool {
    match level {
        Some(level) => count > 0 && count < level.few_results_threshold(),
        None => false,
    }
}

/// True iff the scope is known and produced no results at all.
#[must_use]
pub fn is_empty_results(level: Option<GeoLevel>, count: u32) -> bool {
    level.is_some() && count == 0
}

/// What the catalog should do about the current count at the current level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationAdvice {
    /// Enough results, or no wider level exists.
    None,
    /// Some results but below threshold: offer the wider scope to the user.
    Offer,
    /// No results at all: clients may widen without waiting for a prompt.
    /// The engine itself still never transitions state on its own.
    AutoWiden,
}

/// Advice for a count observed at a level. Terminal levels never escalate.
#[must_use]
pub fn escalation_advice(level: Option<GeoLevel>, count: u32) -> EscalationAdvice {
    if next_level(level).is_none() {
        return EscalationAdvice::None;
    }
    if is_empty_results(level, count) {
        EscalationAdvice::AutoWiden
    } else if is_few_results(level, count) {
        EscalationAdvice::Offer
    } else {
        EscalationAdvice::None
    }
}

/// The location constraint appropriate to a level, derived from the user's
/// resolved geography. Unknown geography degrades to a missing constraint
/// rather than an error.
#[must_use]
pub fn constraint_for_level(level: GeoLevel, location: &UserLocation) -> LocationConstraint {
    match level {
        GeoLevel::Provincia => location
            .province
            .as_deref()
            .and_then(canonical_province)
            .map_or(LocationConstraint::None, |province| {
                LocationConstraint::Province {
                    value: province.to_string(),
                }
            }),
        GeoLevel::Comunidad => regions_constraint(location, provinces_of_region),
        GeoLevel::Limitrofes => regions_constraint(location, provinces_of_region_and_neighbours),
        GeoLevel::Nacional => LocationConstraint::Countries {
            values: vec![location.country.clone().unwrap_or_else(|| "ES".to_string())],
        },
        GeoLevel::SuroesteEuropeo => countries_constraint(SOUTHWEST_EUROPE, location),
        GeoLevel::UnionEuropea => countries_constraint(EUROPEAN_UNION, location),
        GeoLevel::Europa => countries_constraint(EUROPE, location),
        // World scope: no location constraint at all.
        GeoLevel::Mundo => LocationConstraint::None,
    }
}

/// Province list for the user's comunidad, resolved through the region name
/// or, failing that, the province name.
fn regions_constraint(
    location: &UserLocation,
    expand: fn(&str) -> Vec<&'static str>,
) -> LocationConstraint {
    let region = location
        .region
        .as_deref()
        .and_then(canonical_region)
        .or_else(|| location.province.as_deref().and_then(region_of_province));
    let provinces: Vec<String> = region
        .map(|r| expand(r).into_iter().map(ToString::to_string).collect())
        .unwrap_or_default();
    if provinces.is_empty() {
        LocationConstraint::None
    } else {
        LocationConstraint::Regions { values: provinces }
    }
}

fn countries_constraint(group: &[&str], location: &UserLocation) -> LocationConstraint {
    let mut values: Vec<String> = group.iter().map(ToString::to_string).collect();
    // A user outside the group still sees their own market included.
    if let Some(country) = location.country.as_deref() {
        if !group.contains(&country) {
            values.push(country.to_string());
        }
    }
    LocationConstraint::Countries { values }
}

/// Filters for the next wider level, or `None` when no wider level exists.
///
/// The previous level's location constraint is dropped and exactly one
/// constraint appropriate to the next level is applied; every non-location
/// filter passes through unchanged.
#[must_use]
pub fn next_level_filters(
    filters: &VehicleFilters,
    current: Option<GeoLevel>,
    location: &UserLocation,
) -> Option<VehicleFilters> {
    let next = next_level(current)?;
    Some(filters.with_location(constraint_for_level(next, location)))
}

/// Pure escalation: the same catalog state one level wider, with the
/// location constraint recomputed from the user's geography. `None` when
/// the scope is unset or terminal.
#[must_use]
pub fn escalate(state: &CatalogState, location: &UserLocation) -> Option<CatalogState> {
    let next = next_level(state.level)?;
    Some(CatalogState {
        level: Some(next),
        filters: state.filters.with_location(constraint_for_level(next, location)),
    })
}

/// Read-only collaborator answering "how many published vehicles match".
pub trait VehicleCountProbe {
    type Error: std::fmt::Display;

    fn count_published(
        &self,
        filters: &VehicleFilters,
    ) -> impl std::future::Future<Output = Result<u32, Self::Error>> + Send;
}

/// Preview of the next wider scope, for the "23 results in all of Europe"
/// style of teaser.
#[derive(Debug, Clone, Serialize)]
pub struct EscalationPreview {
    pub current_level: Option<GeoLevel>,
    pub next_level: Option<GeoLevel>,
    /// Human-readable name of the next level, when one exists.
    pub next_level_label: Option<String>,
    /// Prospective result count at the next level. Zero when terminal or
    /// when the probe failed.
    pub next_level_count: u32,
    /// The filter set the next level would use.
    pub next_level_filters: Option<VehicleFilters>,
}

/// Compute the next level's filters and probe their count.
///
/// This never mutates the active filters; it only produces a preview. A
/// probe failure is logged and reported as a zero count so callers can omit
/// the escalation suggestion instead of erroring.
pub async fn preview_escalation<P: VehicleCountProbe>(
    probe: &P,
    filters: &VehicleFilters,
    current: Option<GeoLevel>,
    location: &UserLocation,
) -> EscalationPreview {
    let next = next_level(current);
    let next_filters = next_level_filters(filters, current, location);

    let count = match &next_filters {
        Some(next_filters) => match probe.count_published(next_filters).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(error = %e, "next-level count probe failed, suppressing preview");
                0
            }
        },
        None => 0,
    };

    EscalationPreview {
        current_level: current,
        next_level: next,
        next_level_label: next.map(|level| {
            level_label(
                level,
                location.province.as_deref(),
                location.region.as_deref(),
                location.country.as_deref(),
            )
        }),
        next_level_count: count,
        next_level_filters: next_filters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motoria_core::LEVEL_ORDER;

    fn lerida_location() -> UserLocation {
        UserLocation {
            country: Some("ES".to_string()),
            province: Some("Lérida".to_string()),
            region: Some("Cataluña".to_string()),
        }
    }

    #[test]
    fn next_level_follows_order_and_terminates() {
        for pair in LEVEL_ORDER.windows(2) {
            assert_eq!(next_level(Some(pair[0])), Some(pair[1]));
        }
        assert_eq!(next_level(Some(GeoLevel::Mundo)), None);
        assert_eq!(next_level(None), None);
    }

    #[test]
    fn zero_is_never_few_results() {
        for level in LEVEL_ORDER {
            assert!(!is_few_results(Some(level), 0), "level {level}");
        }
    }

    #[test]
    fn few_results_boundary_is_strict() {
        assert!(is_few_results(Some(GeoLevel::Provincia), 2));
        assert!(!is_few_results(Some(GeoLevel::Provincia), 3));
    }

    #[test]
    fn mundo_never_has_few_results() {
        for count in [1, 5, 100] {
            assert!(!is_few_results(Some(GeoLevel::Mundo), count));
        }
    }

    #[test]
    fn unset_level_never_has_few_results() {
        assert!(!is_few_results(None, 1));
        assert!(!is_empty_results(None, 0));
    }

    #[test]
    fn advice_distinguishes_empty_from_few() {
        assert_eq!(
            escalation_advice(Some(GeoLevel::Provincia), 0),
            EscalationAdvice::AutoWiden
        );
        assert_eq!(
            escalation_advice(Some(GeoLevel::Provincia), 2),
            EscalationAdvice::Offer
        );
        assert_eq!(
            escalation_advice(Some(GeoLevel::Provincia), 3),
            EscalationAdvice::None
        );
        assert_eq!(escalation_advice(Some(GeoLevel::Mundo), 0), EscalationAdvice::None);
        assert_eq!(escalation_advice(None, 0), EscalationAdvice::None);
    }

    #[test]
    fn next_level_filters_is_none_at_terminal_states() {
        let filters = VehicleFilters::default();
        assert!(next_level_filters(&filters, None, &lerida_location()).is_none());
        assert!(next_level_filters(&filters, Some(GeoLevel::Mundo), &lerida_location()).is_none());
    }

    #[test]
    fn provincia_to_comunidad_swaps_province_for_region_list() {
        let filters = VehicleFilters {
            location: LocationConstraint::Province {
                value: "Madrid".to_string(),
            },
            ..VehicleFilters::default()
        };
        let location = UserLocation {
            country: Some("ES".to_string()),
            province: Some("Madrid".to_string()),
            region: Some("Madrid".to_string()),
        };
        let widened = next_level_filters(&filters, Some(GeoLevel::Provincia), &location)
            .expect("comunidad level exists");
        match &widened.location {
            LocationConstraint::Regions { values } => {
                assert_eq!(values, &vec!["Madrid".to_string()]);
            }
            other => panic!("expected Regions constraint, got {other:?}"),
        }
    }

    #[test]
    fn non_location_filters_survive_every_transition() {
        let filters = VehicleFilters {
            category: Some("furgoneta".to_string()),
            brand: Some("Renault".to_string()),
            price_min: Some(4_000),
            price_max: Some(25_000),
            year_min: Some(2015),
            year_max: Some(2024),
            location: LocationConstraint::Province {
                value: "Lérida".to_string(),
            },
        };
        let location = lerida_location();

        let mut level = Some(GeoLevel::Provincia);
        let mut current = filters.clone();
        while let Some(widened) = next_level_filters(&current, level, &location) {
            assert_eq!(widened.category, filters.category);
            assert_eq!(widened.brand, filters.brand);
            assert_eq!(widened.price_min, filters.price_min);
            assert_eq!(widened.price_max, filters.price_max);
            assert_eq!(widened.year_min, filters.year_min);
            assert_eq!(widened.year_max, filters.year_max);
            level = next_level(level);
            current = widened;
        }
        assert_eq!(level, Some(GeoLevel::Mundo));
    }

    #[test]
    fn mundo_carries_no_location_constraint() {
        let filters = VehicleFilters::default();
        let widened = next_level_filters(&filters, Some(GeoLevel::Europa), &lerida_location())
            .expect("mundo exists after europa");
        assert!(widened.location.is_none());
    }

    #[test]
    fn unknown_geography_degrades_to_unconstrained() {
        let filters = VehicleFilters::default();
        let nowhere = UserLocation::default();
        let widened = next_level_filters(&filters, Some(GeoLevel::Provincia), &nowhere)
            .expect("comunidad level exists");
        assert!(widened.location.is_none());
    }

    #[test]
    fn foreign_country_is_appended_to_fixed_groups() {
        let location = UserLocation {
            country: Some("MA".to_string()),
            ..UserLocation::default()
        };
        let filters = VehicleFilters::default();
        let widened = next_level_filters(&filters, Some(GeoLevel::Nacional), &location)
            .expect("suroeste_europeo exists");
        match &widened.location {
            LocationConstraint::Countries { values } => {
                assert!(values.contains(&"ES".to_string()));
                assert!(values.contains(&"MA".to_string()));
            }
            other => panic!("expected Countries constraint, got {other:?}"),
        }
    }

    #[test]
    fn escalate_advances_state_one_level() {
        let state = CatalogState::new(
            Some(GeoLevel::Comunidad),
            VehicleFilters {
                price_min: Some(5_000),
                ..VehicleFilters::default()
            },
        );
        let widened = escalate(&state, &lerida_location()).expect("limitrofes exists");
        assert_eq!(widened.level, Some(GeoLevel::Limitrofes));
        assert_eq!(widened.filters.price_min, Some(5_000));
        // Original state untouched.
        assert_eq!(state.level, Some(GeoLevel::Comunidad));
    }

    #[test]
    fn escalate_is_none_at_terminal_states() {
        let terminal = CatalogState::new(Some(GeoLevel::Mundo), VehicleFilters::default());
        assert!(escalate(&terminal, &lerida_location()).is_none());
        let unset = CatalogState::new(None, VehicleFilters::default());
        assert!(escalate(&unset, &lerida_location()).is_none());
    }

    struct FixedProbe(Result<u32, &'static str>);

    impl VehicleCountProbe for FixedProbe {
        type Error = &'static str;

        async fn count_published(&self, _filters: &VehicleFilters) -> Result<u32, &'static str> {
            self.0
        }
    }

    #[tokio::test]
    async fn preview_reports_next_level_count() {
        let probe = FixedProbe(Ok(23));
        let preview = preview_escalation(
            &probe,
            &VehicleFilters::default(),
            Some(GeoLevel::UnionEuropea),
            &lerida_location(),
        )
        .await;
        assert_eq!(preview.next_level, Some(GeoLevel::Europa));
        assert_eq!(preview.next_level_label.as_deref(), Some("Europa"));
        assert_eq!(preview.next_level_count, 23);
        assert!(preview.next_level_filters.is_some());
    }

    #[tokio::test]
    async fn preview_at_terminal_level_is_empty() {
        let probe = FixedProbe(Ok(99));
        let preview = preview_escalation(
            &probe,
            &VehicleFilters::default(),
            Some(GeoLevel::Mundo),
            &lerida_location(),
        )
        .await;
        assert_eq!(preview.next_level, None);
        assert_eq!(preview.next_level_count, 0);
        assert!(preview.next_level_filters.is_none());
    }

    #[tokio::test]
    async fn probe_failure_degrades_to_zero_count() {
        let probe = FixedProbe(Err("connection refused"));
        let preview = preview_escalation(
            &probe,
            &VehicleFilters::default(),
            Some(GeoLevel::Provincia),
            &lerida_location(),
        )
        .await;
        assert_eq!(preview.next_level, Some(GeoLevel::Comunidad));
        assert_eq!(preview.next_level_count, 0);
    }

    /// The documented end-to-end scenario: a user in Lérida with one result
    /// at provincia scope gets a comunidad offer whose filters keep the
    /// price floor and swap the province for Cataluña's provinces.
    #[test]
    fn lerida_few_results_scenario() {
        let location = lerida_location();
        let filters = VehicleFilters {
            price_min: Some(5_000),
            location: LocationConstraint::Province {
                value: "Lérida".to_string(),
            },
            ..VehicleFilters::default()
        };

        assert!(is_few_results(Some(GeoLevel::Provincia), 1));
        assert_eq!(next_level(Some(GeoLevel::Provincia)), Some(GeoLevel::Comunidad));

        let widened = next_level_filters(&filters, Some(GeoLevel::Provincia), &location)
            .expect("comunidad level exists");
        assert_eq!(widened.price_min, Some(5_000));
        match &widened.location {
            LocationConstraint::Regions { values } => {
                assert_eq!(
                    values,
                    &vec![
                        "Barcelona".to_string(),
                        "Gerona".to_string(),
                        "Lérida".to_string(),
                        "Tarragona".to_string()
                    ]
                );
            }
            other => panic!("expected Regions constraint, got {other:?}"),
        }
    }
}
