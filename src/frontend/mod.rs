//! The country browser front-end: two read-only queries against the gateway
//! and the list/detail view driven by them.
//!
//! The same state is rendered as HTML page (served by the gateway at `/`) and
//! in the terminal (`browse` subcommand).

use crate::{config::BaseUrl, prelude::*};
use self::{
    client::fetch,
    queries::{CountriesData, CountryData, DetailRequest, GET_COUNTRIES, GET_COUNTRY},
};

mod client;
mod queries;
mod state;
pub(crate) mod html;
pub(crate) mod terminal;

pub(crate) use self::{
    client::{HttpTransport, LocalTransport, Transport},
    state::{Browser, QueryState, View},
};


#[derive(Debug, confique::Config)]
pub(crate) struct FrontendConfig {
    /// URL of the GraphQL endpoint of a running gateway. Used by the `browse`
    /// subcommand. The page served at `/` always queries its own server.
    #[config(default = "http://localhost:4000/graphql")]
    pub(crate) gateway_url: BaseUrl,
}


/// Loads the listing and, if a country is selected, its details. Both
/// queries run concurrently.
pub(crate) async fn load(transport: &impl Transport, selection: Option<String>) -> Browser {
    let mut browser = Browser::new();
    let request = selection.and_then(|name| browser.select(&name));

    let details = async {
        match &request {
            Some(request) => Some(fetch_details(transport, request).await),
            None => None,
        }
    };
    let (countries, details) = tokio::join!(fetch_countries(transport), details);

    browser.countries_loaded(countries);
    if let (Some(request), Some(result)) = (request, details) {
        browser.details_loaded(&request.name, result);
    }
    browser
}

async fn fetch_countries(
    transport: &impl Transport,
) -> Result<Vec<queries::CountrySummary>, String> {
    let data: CountriesData = fetch(transport, GET_COUNTRIES, serde_json::json!({})).await?;
    debug!("Loaded {} countries", data.countries.len());
    Ok(data.countries)
}

async fn fetch_details(
    transport: &impl Transport,
    request: &DetailRequest,
) -> Result<queries::CountryDetails, String> {
    let data: CountryData = fetch(transport, GET_COUNTRY, request.variables()).await?;

    // Only reachable with a misbehaving gateway: "not found" is an error.
    data.country.ok_or_else(|| format!("No data found for country: {}", request.name))
}
