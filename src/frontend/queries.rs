//! The two GraphQL documents the front-end sends, and the shapes of their
//! results. Every field is nullable in the schema, so every field is optional
//! here.

use serde::Deserialize;
use serde_json::json;


pub(crate) const GET_COUNTRIES: &str = "\
    query GetCountries {
        countries {
            name
            population
            flags { png }
        }
    }";

pub(crate) const GET_COUNTRY: &str = "\
    query GetCountry($name: String!) {
        country(name: $name) {
            name
            capital
            population
            region
            subregion
            flags { png }
        }
    }";


/// One entry of the listing: one card and one `<option>` per country.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct CountrySummary {
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) population: Option<i32>,
    #[serde(default)]
    pub(crate) flags: Option<FlagImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct CountryDetails {
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) capital: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub(crate) population: Option<i32>,
    #[serde(default)]
    pub(crate) region: Option<String>,
    #[serde(default)]
    pub(crate) subregion: Option<String>,
    #[serde(default)]
    pub(crate) flags: Option<FlagImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct FlagImage {
    #[serde(default)]
    pub(crate) png: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CountriesData {
    pub(super) countries: Vec<CountrySummary>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CountryData {
    pub(super) country: Option<CountryDetails>,
}

/// The dependent detail query for one selected country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DetailRequest {
    pub(crate) name: String,
}

impl DetailRequest {
    pub(crate) fn variables(&self) -> serde_json::Value {
        json!({ "name": self.name })
    }
}

impl CountrySummary {
    pub(crate) fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub(crate) fn flag_png(&self) -> &str {
        self.flags.as_ref().and_then(|f| f.png.as_deref()).unwrap_or_default()
    }
}

impl CountryDetails {
    pub(crate) fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub(crate) fn flag_png(&self) -> &str {
        self.flags.as_ref().and_then(|f| f.png.as_deref()).unwrap_or_default()
    }

    /// The capitals joined with `", "`, or `N/A` if there are none.
    pub(crate) fn capital_line(&self) -> String {
        let capitals = self.capital.iter()
            .flatten()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>();

        if capitals.is_empty() {
            "N/A".into()
        } else {
            capitals.join(", ")
        }
    }
}

/// Formats a population with thousands separators. Negative values cannot
/// come from the gateway and are shown as they are.
pub(crate) fn population_line(population: Option<i32>) -> String {
    match population.map(u32::try_from) {
        Some(Ok(n)) => crate::util::group_thousands(n),
        Some(Err(_)) => population.unwrap_or_default().to_string(),
        None => "N/A".into(),
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;
    use super::{population_line, CountryDetails};

    fn details(capital: serde_json::Value) -> CountryDetails {
        serde_json::from_value(json!({ "name": "X", "capital": capital })).unwrap()
    }

    #[test]
    fn capital_line() {
        assert_eq!(details(json!(["Paris"])).capital_line(), "Paris");
        assert_eq!(
            details(json!(["Pretoria", "Bloemfontein", "Cape Town"])).capital_line(),
            "Pretoria, Bloemfontein, Cape Town",
        );
        assert_eq!(details(json!([])).capital_line(), "N/A");
        assert_eq!(details(json!(null)).capital_line(), "N/A");
    }

    #[test]
    fn population() {
        assert_eq!(population_line(Some(67_000_000)), "67,000,000");
        assert_eq!(population_line(Some(0)), "0");
        assert_eq!(population_line(None), "N/A");
    }

    #[test]
    fn null_fields() {
        let d: CountryDetails = serde_json::from_value(json!({
            "name": null, "population": null, "flags": null,
        })).unwrap();
        assert_eq!(d.name(), "");
        assert_eq!(d.flag_png(), "");
        assert_eq!(d.region, None);
    }
}
