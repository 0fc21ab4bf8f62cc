//! Optional markets file: operator-maintained city entries that extend the
//! built-in city dictionary used by the location resolver.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One city the resolver should recognise, with its province and comunidad.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityEntry {
    pub name: String,
    pub province: String,
    pub region: String,
}

#[derive(Debug, Deserialize)]
pub struct MarketsFile {
    pub cities: Vec<CityEntry>,
}

/// Load and validate the markets file from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or contains
/// duplicate or empty city names.
pub fn load_markets_file(path: &Path) -> Result<MarketsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::MarketsFileRead {
        path: path.display().to_string(),
        source: e,
    })?;

    let markets: MarketsFile =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::MarketsFileParse {
            path: path.display().to_string(),
            source: e,
        })?;

    let mut seen = HashSet::new();
    for city in &markets.cities {
        let key = city.name.trim().to_lowercase();
        if key.is_empty() {
            return Err(ConfigError::DuplicateCity("<empty>".to_string()));
        }
        if !seen.insert(key) {
            return Err(ConfigError::DuplicateCity(city.name.clone()));
        }
    }

    Ok(markets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("motoria-markets-{}.yaml", uuid::Uuid::new_v4()));
        std::fs::write(&path, content).expect("write temp markets file");
        path
    }

    #[test]
    fn loads_valid_markets_file() {
        let path = write_temp(
            "cities:\n  - name: Mollerussa\n    province: Lérida\n    region: Cataluña\n",
        );
        let markets = load_markets_file(&path).expect("should parse");
        assert_eq!(markets.cities.len(), 1);
        assert_eq!(markets.cities[0].province, "Lérida");
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn rejects_duplicate_city_names() {
        let path = write_temp(
            "cities:\n  - name: Tudela\n    province: Navarra\n    region: Navarra\n  - name: tudela\n    province: Navarra\n    region: Navarra\n",
        );
        let result = load_markets_file(&path);
        assert!(
            matches!(result, Err(ConfigError::DuplicateCity(ref name)) if name == "tudela"),
            "expected DuplicateCity, got: {result:?}"
        );
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = load_markets_file(Path::new("/nonexistent/markets.yaml"));
        assert!(matches!(result, Err(ConfigError::MarketsFileRead { .. })));
    }
}
