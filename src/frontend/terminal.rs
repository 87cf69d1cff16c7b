//! Prints the browser to a terminal.

use std::io;

use termcolor::WriteColor;

use super::{
    queries::{population_line, CountryDetails, CountrySummary},
    QueryState,
    View,
};


pub(crate) fn render(view: &View<'_>, mut out: &mut impl WriteColor) -> io::Result<()> {
    match view {
        View::LoadingCountries => bunt::writeln!(out, "{$dimmed}Loading countries...{/$}")?,
        View::CountriesError(msg) => {
            bunt::writeln!(out, "{$red}Error fetching countries:{/$} {[yellow+intense]}", msg)?;
        }
        View::Browse { countries, details: None, .. } => render_listing(countries, out)?,
        View::Browse { details: Some(state), .. } => render_details(state, out)?,
    }

    Ok(())
}

fn render_listing(countries: &[CountrySummary], mut out: &mut impl WriteColor) -> io::Result<()> {
    bunt::writeln!(out, "{$bold+blue+intense}All Countries{/$} {$dimmed}({} total){/$}", countries.len())?;
    writeln!(out)?;

    let width = countries.iter().map(|c| c.name().chars().count()).max().unwrap_or(0);
    for country in countries {
        let name = country.name();
        let padding = width - name.chars().count();
        bunt::writeln!(
            out,
            " ▸ {[bold]}{}  {$dimmed}population{/$} {}",
            name,
            " ".repeat(padding),
            population_line(country.population),
        )?;
    }

    Ok(())
}

fn render_details(state: &QueryState<CountryDetails>, mut out: &mut impl WriteColor) -> io::Result<()> {
    bunt::writeln!(out, "{$bold+blue+intense}Country Details{/$}")?;
    writeln!(out)?;

    match state {
        QueryState::Loading => bunt::writeln!(out, "{$dimmed}Loading details...{/$}")?,
        QueryState::Error(msg) => {
            bunt::writeln!(out, "{$red}Error fetching details:{/$} {[yellow+intense]}", msg)?;
        }
        QueryState::Ready(country) => {
            let field = |v: &Option<String>| v.clone().unwrap_or_default();
            bunt::writeln!(out, "  {[bold+intense]}", country.name())?;
            bunt::writeln!(out, "  {$dimmed}Flag:{/$}       {}", country.flag_png())?;
            bunt::writeln!(out, "  {$dimmed}Capital:{/$}    {}", country.capital_line())?;
            bunt::writeln!(out, "  {$dimmed}Population:{/$} {}", population_line(country.population))?;
            bunt::writeln!(out, "  {$dimmed}Region:{/$}     {}", field(&country.region))?;
            bunt::writeln!(out, "  {$dimmed}Subregion:{/$}  {}", field(&country.subregion))?;
        }
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use serde_json::json;
    use termcolor::NoColor;

    use crate::frontend::{Browser, View};
    use super::render;

    fn render_to_string(view: &View<'_>) -> String {
        let mut out = NoColor::new(Vec::new());
        render(view, &mut out).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn listing() {
        let mut browser = Browser::new();
        browser.countries_loaded(Ok(serde_json::from_value(json!([
            { "name": "France", "population": 67000000 },
            { "name": "Japan", "population": 125700000 },
        ])).unwrap()));

        let out = render_to_string(&browser.view());
        assert!(out.starts_with("All Countries (2 total)\n"));
        assert!(out.contains(" ▸ France  population 67,000,000\n"));
        assert!(out.contains(" ▸ Japan   population 125,700,000\n"));
    }

    #[test]
    fn details() {
        let mut browser = Browser::new();
        browser.countries_loaded(Ok(vec![]));
        browser.select("France");
        browser.details_loaded("France", Ok(serde_json::from_value(json!({
            "name": "France",
            "capital": ["Paris"],
            "population": 67000000,
            "region": "Europe",
            "subregion": "Western Europe",
        })).unwrap()));

        let out = render_to_string(&browser.view());
        assert!(out.contains("  France\n"));
        assert!(out.contains("  Capital:    Paris\n"));
        assert!(out.contains("  Population: 67,000,000\n"));
        assert!(out.contains("  Subregion:  Western Europe\n"));
    }

    #[test]
    fn errors() {
        let out = render_to_string(&View::CountriesError("Upstream failure: boom"));
        assert_eq!(out, "Error fetching countries: Upstream failure: boom\n");
    }
}
