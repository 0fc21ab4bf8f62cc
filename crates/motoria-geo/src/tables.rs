//! Static geography tables for the primary (Spanish) market.
//!
//! Lookups normalise accents and case, so `"Lérida"`, `"lerida"` and the
//! Catalan `"Lleida"` all hit the same canonical province entry.

/// Canonical province name → comunidad autónoma.
const PROVINCE_REGIONS: &[(&str, &str)] = &[
    // Andalucía
    ("Almería", "Andalucía"),
    ("Cádiz", "Andalucía"),
    ("Córdoba", "Andalucía"),
    ("Granada", "Andalucía"),
    ("Huelva", "Andalucía"),
    ("Jaén", "Andalucía"),
    ("Málaga", "Andalucía"),
    ("Sevilla", "Andalucía"),
    // Aragón
    ("Huesca", "Aragón"),
    ("Teruel", "Aragón"),
    ("Zaragoza", "Aragón"),
    // Uniprovinciales
    ("Asturias", "Asturias"),
    ("Baleares", "Baleares"),
    ("Cantabria", "Cantabria"),
    ("Madrid", "Madrid"),
    ("Murcia", "Murcia"),
    ("Navarra", "Navarra"),
    ("La Rioja", "La Rioja"),
    // Canarias
    ("Las Palmas", "Canarias"),
    ("Santa Cruz de Tenerife", "Canarias"),
    // Castilla-La Mancha
    ("Albacete", "Castilla-La Mancha"),
    ("Ciudad Real", "Castilla-La Mancha"),
    ("Cuenca", "Castilla-La Mancha"),
    ("Guadalajara", "Castilla-La Mancha"),
    ("Toledo", "Castilla-La Mancha"),
    // Castilla y León
    ("Ávila", "Castilla y León"),
    ("Burgos", "Castilla y León"),
    ("León", "Castilla y León"),
    ("Palencia", "Castilla y León"),
    ("Salamanca", "Castilla y León"),
    ("Segovia", "Castilla y León"),
    ("Soria", "Castilla y León"),
    ("Valladolid", "Castilla y León"),
    ("Zamora", "Castilla y León"),
    // Cataluña
    ("Barcelona", "Cataluña"),
    ("Gerona", "Cataluña"),
    ("Lérida", "Cataluña"),
    ("Tarragona", "Cataluña"),
    // Comunidad Valenciana
    ("Alicante", "Comunidad Valenciana"),
    ("Castellón", "Comunidad Valenciana"),
    ("Valencia", "Comunidad Valenciana"),
    // Extremadura
    ("Badajoz", "Extremadura"),
    ("Cáceres", "Extremadura"),
    // Galicia
    ("La Coruña", "Galicia"),
    ("Lugo", "Galicia"),
    ("Orense", "Galicia"),
    ("Pontevedra", "Galicia"),
    // País Vasco
    ("Álava", "País Vasco"),
    ("Guipúzcoa", "País Vasco"),
    ("Vizcaya", "País Vasco"),
    // Ciudades autónomas
    ("Ceuta", "Ceuta"),
    ("Melilla", "Melilla"),
];

/// Co-official and historical province names → canonical name.
const PROVINCE_ALIASES: &[(&str, &str)] = &[
    ("Lleida", "Lérida"),
    ("Girona", "Gerona"),
    ("A Coruña", "La Coruña"),
    ("Ourense", "Orense"),
    ("Gipuzkoa", "Guipúzcoa"),
    ("Bizkaia", "Vizcaya"),
    ("Araba", "Álava"),
    ("Illes Balears", "Baleares"),
    ("Alacant", "Alicante"),
    ("Castelló", "Castellón"),
    ("València", "Valencia"),
];

/// Comunidad → bordering comunidades, used by the `limitrofes` scope.
/// Island comunidades list their closest mainland coast instead.
const REGION_NEIGHBOURS: &[(&str, &[&str])] = &[
    ("Galicia", &["Asturias", "Castilla y León"]),
    ("Asturias", &["Galicia", "Cantabria", "Castilla y León"]),
    ("Cantabria", &["Asturias", "Castilla y León", "País Vasco"]),
    (
        "País Vasco",
        &["Cantabria", "Castilla y León", "La Rioja", "Navarra"],
    ),
    ("Navarra", &["País Vasco", "La Rioja", "Aragón"]),
    (
        "La Rioja",
        &["País Vasco", "Navarra", "Aragón", "Castilla y León"],
    ),
    (
        "Aragón",
        &[
            "Navarra",
            "La Rioja",
            "Castilla y León",
            "Castilla-La Mancha",
            "Comunidad Valenciana",
            "Cataluña",
        ],
    ),
    ("Cataluña", &["Aragón", "Comunidad Valenciana"]),
    (
        "Castilla y León",
        &[
            "Galicia",
            "Asturias",
            "Cantabria",
            "País Vasco",
            "La Rioja",
            "Aragón",
            "Madrid",
            "Castilla-La Mancha",
            "Extremadura",
        ],
    ),
    ("Madrid", &["Castilla y León", "Castilla-La Mancha"]),
    (
        "Castilla-La Mancha",
        &[
            "Madrid",
            "Castilla y León",
            "Aragón",
            "Comunidad Valenciana",
            "Murcia",
            "Andalucía",
            "Extremadura",
        ],
    ),
    (
        "Comunidad Valenciana",
        &["Cataluña", "Aragón", "Castilla-La Mancha", "Murcia"],
    ),
    ("Murcia", &["Comunidad Valenciana", "Castilla-La Mancha", "Andalucía"]),
    (
        "Extremadura",
        &["Castilla y León", "Castilla-La Mancha", "Andalucía"],
    ),
    (
        "Andalucía",
        &["Extremadura", "Castilla-La Mancha", "Murcia"],
    ),
    ("Baleares", &["Cataluña", "Comunidad Valenciana"]),
    ("Canarias", &[]),
    ("Ceuta", &["Andalucía"]),
    ("Melilla", &["Andalucía"]),
];

/// Well-known cities → (province, comunidad). Extended at runtime by the
/// optional markets file.
pub(crate) const CITY_DIRECTORY: &[(&str, &str, &str)] = &[
    ("Madrid", "Madrid", "Madrid"),
    ("Barcelona", "Barcelona", "Cataluña"),
    ("Valencia", "Valencia", "Comunidad Valenciana"),
    ("Sevilla", "Sevilla", "Andalucía"),
    ("Zaragoza", "Zaragoza", "Aragón"),
    ("Málaga", "Málaga", "Andalucía"),
    ("Murcia", "Murcia", "Murcia"),
    ("Palma", "Baleares", "Baleares"),
    ("Las Palmas de Gran Canaria", "Las Palmas", "Canarias"),
    ("Bilbao", "Vizcaya", "País Vasco"),
    ("Alicante", "Alicante", "Comunidad Valenciana"),
    ("Córdoba", "Córdoba", "Andalucía"),
    ("Valladolid", "Valladolid", "Castilla y León"),
    ("Vigo", "Pontevedra", "Galicia"),
    ("Gijón", "Asturias", "Asturias"),
    ("Vitoria", "Álava", "País Vasco"),
    ("La Coruña", "La Coruña", "Galicia"),
    ("Granada", "Granada", "Andalucía"),
    ("Elche", "Alicante", "Comunidad Valenciana"),
    ("Oviedo", "Asturias", "Asturias"),
    ("Cartagena", "Murcia", "Murcia"),
    ("Terrassa", "Barcelona", "Cataluña"),
    ("Sabadell", "Barcelona", "Cataluña"),
    ("Jerez de la Frontera", "Cádiz", "Andalucía"),
    ("Santa Cruz de Tenerife", "Santa Cruz de Tenerife", "Canarias"),
    ("Pamplona", "Navarra", "Navarra"),
    ("Almería", "Almería", "Andalucía"),
    ("San Sebastián", "Guipúzcoa", "País Vasco"),
    ("Santander", "Cantabria", "Cantabria"),
    ("Burgos", "Burgos", "Castilla y León"),
    ("Albacete", "Albacete", "Castilla-La Mancha"),
    ("Castellón de la Plana", "Castellón", "Comunidad Valenciana"),
    ("Logroño", "La Rioja", "La Rioja"),
    ("Badajoz", "Badajoz", "Extremadura"),
    ("Salamanca", "Salamanca", "Castilla y León"),
    ("Huelva", "Huelva", "Andalucía"),
    ("Lérida", "Lérida", "Cataluña"),
    ("Tarragona", "Tarragona", "Cataluña"),
    ("Cáceres", "Cáceres", "Extremadura"),
    ("León", "León", "Castilla y León"),
    ("Toledo", "Toledo", "Castilla-La Mancha"),
    ("Lugo", "Lugo", "Galicia"),
    ("Santiago de Compostela", "La Coruña", "Galicia"),
    ("Mérida", "Badajoz", "Extremadura"),
    ("Getafe", "Madrid", "Madrid"),
    ("Alcalá de Henares", "Madrid", "Madrid"),
];

/// Countries of the south-western European corner the marketplace ships to.
pub const SOUTHWEST_EUROPE: &[&str] = &["ES", "PT", "FR", "AD"];

/// EU-27 member states.
pub const EUROPEAN_UNION: &[&str] = &[
    "AT", "BE", "BG", "HR", "CY", "CZ", "DK", "EE", "FI", "FR", "DE", "GR", "HU", "IE", "IT",
    "LV", "LT", "LU", "MT", "NL", "PL", "PT", "RO", "SK", "SI", "ES", "SE",
];

/// Geographic Europe: the EU-27 plus the non-member states listings come from.
pub const EUROPE: &[&str] = &[
    "AT", "BE", "BG", "HR", "CY", "CZ", "DK", "EE", "FI", "FR", "DE", "GR", "HU", "IE", "IT",
    "LV", "LT", "LU", "MT", "NL", "PL", "PT", "RO", "SK", "SI", "ES", "SE", "GB", "CH", "NO",
    "IS", "AD", "MC", "SM", "LI", "UA", "MD", "RS", "BA", "ME", "MK", "AL", "XK", "TR",
];

/// Fold a name to a lookup key: lowercase, accents stripped, whitespace
/// collapsed.
#[must_use]
pub fn normalize_name(raw: &str) -> String {
    let folded: String = raw
        .chars()
        .map(|c| match c.to_lowercase().next().unwrap_or(c) {
            'á' | 'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            lower => lower,
        })
        .collect();
    folded
        .split_whitespace()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Canonical province name for any recognised spelling, or `None`.
#[must_use]
pub fn canonical_province(name: &str) -> Option<&'static str> {
    let key = normalize_name(name);
    if let Some((canonical, _)) = PROVINCE_REGIONS
        .iter()
        .find(|(province, _)| normalize_name(province) == key)
    {
        return Some(canonical);
    }
    PROVINCE_ALIASES
        .iter()
        .find(|(alias, _)| normalize_name(alias) == key)
        .map(|(_, canonical)| *canonical)
}

/// Comunidad a province belongs to, accepting any recognised spelling.
#[must_use]
pub fn region_of_province(province: &str) -> Option<&'static str> {
    let canonical = canonical_province(province)?;
    PROVINCE_REGIONS
        .iter()
        .find(|(name, _)| *name == canonical)
        .map(|(_, region)| *region)
}

/// Canonical comunidad name for any recognised spelling, or `None`.
#[must_use]
pub fn canonical_region(name: &str) -> Option<&'static str> {
    let key = normalize_name(name);
    REGION_NEIGHBOURS
        .iter()
        .find(|(region, _)| normalize_name(region) == key)
        .map(|(region, _)| *region)
}

/// All provinces of a comunidad, in table order.
#[must_use]
pub fn provinces_of_region(region: &str) -> Vec<&'static str> {
    let Some(canonical) = canonical_region(region) else {
        return Vec::new();
    };
    PROVINCE_REGIONS
        .iter()
        .filter(|(_, r)| *r == canonical)
        .map(|(province, _)| *province)
        .collect()
}

/// Provinces of a comunidad and of every bordering comunidad.
#[must_use]
pub fn provinces_of_region_and_neighbours(region: &str) -> Vec<&'static str> {
    let Some(canonical) = canonical_region(region) else {
        return Vec::new();
    };
    let mut provinces = provinces_of_region(canonical);
    if let Some((_, neighbours)) = REGION_NEIGHBOURS
        .iter()
        .find(|(name, _)| *name == canonical)
    {
        for neighbour in *neighbours {
            provinces.extend(provinces_of_region(neighbour));
        }
    }
    provinces
}
