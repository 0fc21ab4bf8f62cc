//! Location-resolution command handler for the CLI.

use motoria_geocode::{GeocodeClient, GeocodeConfig};

/// Resolve free-text location input and print the result as JSON.
///
/// Uses the same dictionary-first pipeline as the server: the static city
/// and province tables, the optional markets file, and only then the
/// external geocoder.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the markets file
/// cannot be read. Geocoding failures degrade to a partial result.
pub(crate) async fn run_resolve(text: &str) -> anyhow::Result<()> {
    // Resolution never touches the database, so only the resolver
    // settings are loaded here.
    let config = motoria_core::load_resolver_config()?;

    let geocoder = GeocodeClient::new(&GeocodeConfig {
        base_url: config.geocode_base_url.clone(),
        request_timeout_secs: config.geocode_request_timeout_secs,
        user_agent: config.geocode_user_agent.clone(),
        max_retries: config.geocode_max_retries,
        retry_backoff_base_ms: config.geocode_retry_backoff_base_ms,
    })?;

    let extra_cities = match &config.markets_path {
        Some(path) => motoria_core::load_markets_file(path)?.cities,
        None => Vec::new(),
    };

    let location = motoria_geo::resolve(&geocoder, text, &extra_cities).await;
    println!("{}", serde_json::to_string_pretty(&location)?);

    Ok(())
}
