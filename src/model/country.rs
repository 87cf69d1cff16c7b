use std::fmt;

use serde::Deserialize;


/// The region and subregion value used when upstream does not provide one.
const UNKNOWN: &str = "Unknown";

/// A country as served by the gateway. Built fresh from upstream data for
/// every request and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "UpstreamCountry")]
pub(crate) struct Country {
    /// The common name (e.g. "France"). Identifies the country.
    pub(crate) name: String,
    pub(crate) capital: Vec<String>,
    pub(crate) population: u32,
    pub(crate) region: String,
    pub(crate) subregion: String,
    pub(crate) flags: Flag,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Flag {
    pub(crate) png: String,
    pub(crate) svg: String,
}

/// The largest population we can represent, bounded by GraphQL's `Int`.
const MAX_POPULATION: u64 = i32::MAX as u64;


// ===== Upstream wire format ===================================================================
//
// Every field except `name.common` is optional and `null` is treated like a
// missing field. Unknown fields are ignored.

#[derive(Deserialize)]
struct UpstreamCountry {
    name: UpstreamName,
    #[serde(default)]
    capital: Option<Vec<String>>,
    #[serde(default)]
    population: Option<u64>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    subregion: Option<String>,
    #[serde(default)]
    flags: Option<UpstreamFlags>,
}

#[derive(Deserialize)]
struct UpstreamName {
    common: String,
}

#[derive(Deserialize)]
struct UpstreamFlags {
    #[serde(default)]
    png: Option<String>,
    #[serde(default)]
    svg: Option<String>,
}

/// An upstream record that has the right shape, but contains values we
/// cannot accept.
#[derive(Debug, Clone, PartialEq, Eq)]
enum MalformedCountry {
    EmptyName,
    PopulationOutOfRange(u64),
}

impl fmt::Display for MalformedCountry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "country has an empty common name"),
            Self::PopulationOutOfRange(v) => {
                write!(f, "population {v} exceeds the maximum of {MAX_POPULATION}")
            }
        }
    }
}

impl TryFrom<UpstreamCountry> for Country {
    type Error = MalformedCountry;

    fn try_from(src: UpstreamCountry) -> Result<Self, Self::Error> {
        if src.name.common.is_empty() {
            return Err(MalformedCountry::EmptyName);
        }

        let population = src.population.unwrap_or(0);
        let population = u32::try_from(population)
            .ok()
            .filter(|&p| u64::from(p) <= MAX_POPULATION)
            .ok_or(MalformedCountry::PopulationOutOfRange(population))?;

        let or_unknown = |s: Option<String>| s.filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_owned());

        let flags = src.flags.map(|f| Flag {
            png: f.png.unwrap_or_default(),
            svg: f.svg.unwrap_or_default(),
        }).unwrap_or_default();

        Ok(Self {
            name: src.name.common,
            capital: src.capital.unwrap_or_default(),
            population,
            region: or_unknown(src.region),
            subregion: or_unknown(src.subregion),
            flags,
        })
    }
}
