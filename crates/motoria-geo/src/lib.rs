//! Spanish market geography and the catalog geo-fallback engine.
//!
//! `tables` holds the static province/comunidad/country data, `resolver`
//! turns free-text locations into a [`motoria_core::UserLocation`], and
//! `fallback` decides when and how to widen a search scope.

pub mod fallback;
pub mod resolver;
pub mod tables;

pub use fallback::{
    constraint_for_level, escalate, escalation_advice, is_empty_results, is_few_results,
    next_level, next_level_filters, preview_escalation, EscalationAdvice, EscalationPreview,
    VehicleCountProbe,
};
pub use resolver::{parse_location_text, resolve, GeocodedPlace, Geocoder};
