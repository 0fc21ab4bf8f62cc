//! Free-text location resolution.
//!
//! Resolution order: the static city/province dictionary first (synchronous,
//! extended by the optional markets file), then one best-effort geocoding
//! call through the [`Geocoder`] seam. Geocoding failures fall back silently
//! to whatever the dictionary produced.

use motoria_core::{CityEntry, UserLocation};

use crate::tables::{
    canonical_province, canonical_region, normalize_name, region_of_province, CITY_DIRECTORY,
};

/// A single geocoded place, already reduced to the address fields the
/// resolver cares about.
#[derive(Debug, Clone, Default)]
pub struct GeocodedPlace {
    pub country_code: Option<String>,
    pub province: Option<String>,
    pub state: Option<String>,
    pub county: Option<String>,
    pub city: Option<String>,
}

/// External geocoding collaborator. Implementations return `None` on any
/// failure; the resolver treats the call as best-effort.
pub trait Geocoder {
    fn lookup(&self, query: &str) -> impl std::future::Future<Output = Option<GeocodedPlace>> + Send;
}

/// Resolve a free-text location against the static dictionaries only.
///
/// Tries the city directory (built-in plus `extra_cities`), then province
/// names. Matches imply country `ES`. Unrecognised text yields an empty
/// location rather than an error.
#[must_use]
pub fn parse_location_text(text: &str, extra_cities: &[CityEntry]) -> UserLocation {
    let key = normalize_name(text);
    if key.is_empty() {
        return UserLocation::default();
    }

    for city in extra_cities {
        if normalize_name(&city.name) == key {
            return UserLocation {
                country: Some("ES".to_string()),
                province: Some(city.province.clone()),
                region: Some(city.region.clone()),
            };
        }
    }

    for (city, province, region) in CITY_DIRECTORY {
        if normalize_name(city) == key {
            return UserLocation {
                country: Some("ES".to_string()),
                province: Some((*province).to_string()),
                region: Some((*region).to_string()),
            };
        }
    }

    if let Some(province) = canonical_province(text) {
        return UserLocation {
            country: Some("ES".to_string()),
            province: Some(province.to_string()),
            region: region_of_province(province).map(ToString::to_string),
        };
    }

    UserLocation::default()
}

/// Resolve a free-text location, falling back to geocoding when the
/// dictionary does not pin down a province.
///
/// The geocoded address is mapped back into the dictionary's vocabulary,
/// preferring an exact province-name match (`province`/`county` fields) over
/// a region/state-name match. A failed or unhelpful geocoding call leaves
/// the dictionary result (possibly partially empty) untouched.
pub async fn resolve<G: Geocoder>(
    geocoder: &G,
    text: &str,
    extra_cities: &[CityEntry],
) -> UserLocation {
    let from_dictionary = parse_location_text(text, extra_cities);
    if from_dictionary.province.is_some() {
        return from_dictionary;
    }

    let Some(place) = geocoder.lookup(text).await else {
        tracing::debug!(query = text, "geocoding unavailable, keeping dictionary result");
        return from_dictionary;
    };

    merge_geocoded(from_dictionary, &place)
}

/// Overlay a geocoded place onto the dictionary result.
fn merge_geocoded(base: UserLocation, place: &GeocodedPlace) -> UserLocation {
    let country = place
        .country_code
        .as_deref()
        .map(str::to_uppercase)
        .or(base.country);

    // Exact province-name matches win over state/region names.
    let province = place
        .province
        .as_deref()
        .or(place.county.as_deref())
        .and_then(canonical_province)
        .or_else(|| place.state.as_deref().and_then(canonical_province));

    if let Some(province) = province {
        return UserLocation {
            country,
            province: Some(province.to_string()),
            region: region_of_province(province).map(ToString::to_string),
        };
    }

    // No province anywhere; a state naming a comunidad still narrows us down.
    let region = place
        .state
        .as_deref()
        .and_then(canonical_region)
        .map(ToString::to_string)
        .or(base.region);

    UserLocation {
        country,
        province: base.province,
        region,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubGeocoder {
        place: Option<GeocodedPlace>,
    }

    impl Geocoder for StubGeocoder {
        async fn lookup(&self, _query: &str) -> Option<GeocodedPlace> {
            self.place.clone()
        }
    }

    #[test]
    fn dictionary_resolves_known_city() {
        let location = parse_location_text("bilbao", &[]);
        assert_eq!(location.country.as_deref(), Some("ES"));
        assert_eq!(location.province.as_deref(), Some("Vizcaya"));
        assert_eq!(location.region.as_deref(), Some("País Vasco"));
    }

    #[test]
    fn dictionary_resolves_province_name_with_accents_folded() {
        let location = parse_location_text("LERIDA", &[]);
        assert_eq!(location.province.as_deref(), Some("Lérida"));
        assert_eq!(location.region.as_deref(), Some("Cataluña"));
    }

    #[test]
    fn extra_cities_take_precedence() {
        let extra = vec![CityEntry {
            name: "Mollerussa".to_string(),
            province: "Lérida".to_string(),
            region: "Cataluña".to_string(),
        }];
        let location = parse_location_text("Mollerussa", &extra);
        assert_eq!(location.province.as_deref(), Some("Lérida"));
    }

    #[test]
    fn unknown_text_yields_empty_location() {
        let location = parse_location_text("Springfield", &[]);
        assert!(location.is_empty());
    }

    #[tokio::test]
    async fn resolve_skips_geocoding_when_dictionary_hits() {
        struct PanickingGeocoder;
        impl Geocoder for PanickingGeocoder {
            async fn lookup(&self, _query: &str) -> Option<GeocodedPlace> {
                panic!("dictionary hit must not reach the geocoder");
            }
        }
        let location = resolve(&PanickingGeocoder, "Madrid", &[]).await;
        assert_eq!(location.province.as_deref(), Some("Madrid"));
    }

    #[tokio::test]
    async fn resolve_uses_geocoded_province_for_unknown_town() {
        let geocoder = StubGeocoder {
            place: Some(GeocodedPlace {
                country_code: Some("es".to_string()),
                county: Some("Lleida".to_string()),
                ..GeocodedPlace::default()
            }),
        };
        let location = resolve(&geocoder, "Balaguer", &[]).await;
        assert_eq!(location.country.as_deref(), Some("ES"));
        assert_eq!(location.province.as_deref(), Some("Lérida"));
        assert_eq!(location.region.as_deref(), Some("Cataluña"));
    }

    #[tokio::test]
    async fn resolve_prefers_province_match_over_state_match() {
        let geocoder = StubGeocoder {
            place: Some(GeocodedPlace {
                country_code: Some("ES".to_string()),
                province: Some("Gerona".to_string()),
                state: Some("Madrid".to_string()),
                ..GeocodedPlace::default()
            }),
        };
        let location = resolve(&geocoder, "somewhere", &[]).await;
        assert_eq!(location.province.as_deref(), Some("Gerona"));
        assert_eq!(location.region.as_deref(), Some("Cataluña"));
    }

    #[tokio::test]
    async fn resolve_falls_back_to_state_region_when_no_province() {
        let geocoder = StubGeocoder {
            place: Some(GeocodedPlace {
                country_code: Some("ES".to_string()),
                state: Some("Cataluña".to_string()),
                ..GeocodedPlace::default()
            }),
        };
        let location = resolve(&geocoder, "somewhere rural", &[]).await;
        assert_eq!(location.province, None);
        assert_eq!(location.region.as_deref(), Some("Cataluña"));
    }

    #[tokio::test]
    async fn geocoding_failure_keeps_dictionary_result() {
        let geocoder = StubGeocoder { place: None };
        let location = resolve(&geocoder, "Ruritania", &[]).await;
        assert!(location.is_empty());
    }
}
