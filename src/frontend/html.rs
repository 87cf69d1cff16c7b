//! Renders the browser as a complete HTML page. The page works without
//! JavaScript: the select control and the "Clear" button submit a `GET` form,
//! so every selection change is a fresh page load with `?country=NAME`.

use std::fmt::Write;

use crate::util::escape_html;
use super::{
    queries::{population_line, CountryDetails, CountrySummary},
    QueryState,
    View,
};


const STYLE: &str = "\
    body { font-family: sans-serif; padding: 20px; }
    select, button { margin-left: 10px; padding: 5px; }
    .cards { display: flex; flex-wrap: wrap; gap: 20px; }
    .card { border: 1px solid #ccc; border-radius: 5px; padding: 10px;
        width: 200px; text-align: center; }
    .card img { width: 100%; border-radius: 5px; }
    .details img { width: 150px; border-radius: 5px; }
";

pub(crate) fn render_page(view: &View<'_>) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n<title>Country Browser</title>\n");
    let _ = writeln!(out, "<style>{STYLE}</style>\n</head>\n<body>");

    match view {
        View::LoadingCountries => out.push_str("<p>Loading countries...</p>\n"),
        View::CountriesError(msg) => {
            let _ = writeln!(out, "<p>Error fetching countries: {}</p>", escape_html(msg));
        }
        View::Browse { countries, selection, details } => {
            out.push_str("<h1>Country Browser</h1>\n");
            render_select(&mut out, countries, *selection);
            match details {
                Some(state) => render_details(&mut out, state),
                None => render_cards(&mut out, countries),
            }
        }
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn render_select(out: &mut String, countries: &[CountrySummary], selection: Option<&str>) {
    out.push_str("<form method=\"get\" action=\"/\">\n");
    out.push_str("<label for=\"country-select\">Search for a country:</label>\n");
    out.push_str("<select id=\"country-select\" name=\"country\" onchange=\"this.form.submit()\">\n");

    let placeholder_selected = if selection.is_none() { " selected" } else { "" };
    let _ = writeln!(out, "<option value=\"\" disabled{placeholder_selected}>Select a country</option>");
    for country in countries {
        let name = escape_html(country.name());
        let selected = if selection == Some(country.name()) { " selected" } else { "" };
        let _ = writeln!(out, "<option value=\"{name}\"{selected}>{name}</option>");
    }

    out.push_str("</select>\n<noscript><button type=\"submit\">Show</button></noscript>\n");
    out.push_str("</form>\n");

    // An empty form: submitting it loads the page without selection.
    out.push_str("<form method=\"get\" action=\"/\"><button type=\"submit\">Clear</button></form>\n");
}

fn render_cards(out: &mut String, countries: &[CountrySummary]) {
    out.push_str("<h2>All Countries</h2>\n<div class=\"cards\">\n");
    for country in countries {
        let name = escape_html(country.name());
        let _ = writeln!(
            out,
            "<div class=\"card\" data-key=\"{name}\">\
                <img src=\"{}\" alt=\"{name} flag\">\
                <h3>{name}</h3>\
                <p>Population: {}</p>\
            </div>",
            escape_html(country.flag_png()),
            population_line(country.population),
        );
    }
    out.push_str("</div>\n");
}

fn render_details(out: &mut String, state: &QueryState<CountryDetails>) {
    out.push_str("<div class=\"details\">\n<h2>Country Details</h2>\n");
    match state {
        QueryState::Loading => out.push_str("<p>Loading details...</p>\n"),
        QueryState::Error(msg) => {
            let _ = writeln!(out, "<p>Error fetching details: {}</p>", escape_html(msg));
        }
        QueryState::Ready(country) => {
            let name = escape_html(country.name());
            let text = |v: &Option<String>| escape_html(v.as_deref().unwrap_or_default());
            let _ = writeln!(
                out,
                "<h3>{name}</h3>\n\
                <img src=\"{}\" alt=\"{name} flag\">\n\
                <p><strong>Capital:</strong> {}</p>\n\
                <p><strong>Population:</strong> {}</p>\n\
                <p><strong>Region:</strong> {}</p>\n\
                <p><strong>Subregion:</strong> {}</p>",
                escape_html(country.flag_png()),
                escape_html(&country.capital_line()),
                population_line(country.population),
                text(&country.region),
                text(&country.subregion),
            );
        }
    }
    out.push_str("</div>\n");
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::frontend::{Browser, View};
    use super::render_page;

    fn browser_with(countries: serde_json::Value) -> Browser {
        let mut browser = Browser::new();
        browser.countries_loaded(Ok(serde_json::from_value(countries).unwrap()));
        browser
    }

    #[test]
    fn loading_and_error() {
        let html = render_page(&View::LoadingCountries);
        assert!(html.contains("<p>Loading countries...</p>"));

        let html = render_page(&View::CountriesError("Upstream failure: <boom>"));
        assert!(html.contains("<p>Error fetching countries: Upstream failure: &lt;boom&gt;</p>"));
        assert!(!html.contains("<select"));
    }

    #[test]
    fn listing() {
        let browser = browser_with(json!([
            { "name": "France", "population": 67000000, "flags": { "png": "fr.png" } },
            { "name": "Côte d'Ivoire", "population": 26378274, "flags": null },
        ]));
        let html = render_page(&browser.view());

        assert!(html.contains("<h1>Country Browser</h1>"));
        assert!(html.contains("<option value=\"\" disabled selected>Select a country</option>"));
        assert!(html.contains("<option value=\"France\">France</option>"));
        assert!(html.contains("<option value=\"Côte d&#39;Ivoire\">Côte d&#39;Ivoire</option>"));
        assert!(html.contains(">Clear</button>"));
        assert!(html.contains("<h2>All Countries</h2>"));
        assert!(html.contains("<img src=\"fr.png\" alt=\"France flag\">"));
        assert!(html.contains("<p>Population: 67,000,000</p>"));
        assert!(html.contains("<p>Population: 26,378,274</p>"));
        assert!(!html.contains("Country Details"));
    }

    #[test]
    fn details() {
        let mut browser = browser_with(json!([{ "name": "France" }, { "name": "Japan" }]));
        browser.select("Japan");

        let html = render_page(&browser.view());
        assert!(html.contains("<option value=\"Japan\" selected>Japan</option>"));
        assert!(html.contains("<option value=\"\" disabled>Select a country</option>"));
        assert!(html.contains("<p>Loading details...</p>"));
        assert!(!html.contains("All Countries"));

        browser.details_loaded("Japan", Ok(serde_json::from_value(json!({
            "name": "Japan",
            "capital": ["Tokyo"],
            "population": 125700000,
            "region": "Asia",
            "subregion": "Eastern Asia",
            "flags": { "png": "jp.png" },
        })).unwrap()));
        let html = render_page(&browser.view());
        assert!(html.contains("<h3>Japan</h3>"));
        assert!(html.contains("<p><strong>Capital:</strong> Tokyo</p>"));
        assert!(html.contains("<p><strong>Population:</strong> 125,700,000</p>"));
        assert!(html.contains("<p><strong>Region:</strong> Asia</p>"));
        assert!(html.contains("<p><strong>Subregion:</strong> Eastern Asia</p>"));
    }

    #[test]
    fn details_error_and_missing_capital() {
        let mut browser = browser_with(json!([]));
        browser.select("Atlantis");
        browser.details_loaded("Atlantis", Err("Not found: No data found for country: Atlantis".into()));
        let html = render_page(&browser.view());
        assert!(html.contains("<p>Error fetching details: Not found: No data found for country: Atlantis</p>"));

        browser.select("Antarctica");
        browser.details_loaded("Antarctica", Ok(serde_json::from_value(json!({
            "name": "Antarctica", "capital": [], "population": 1000,
        })).unwrap()));
        let html = render_page(&browser.view());
        assert!(html.contains("<p><strong>Capital:</strong> N/A</p>"));
    }
}
