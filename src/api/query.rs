use juniper::graphql_object;

use crate::{model::Country, prelude::*};
use super::{
    Context,
    err::{ApiResult, invalid_argument, not_found},
};


/// The root query object.
pub(crate) struct Query;

#[graphql_object(context = Context)]
impl Query {
    /// Returns the first country whose name matches `name`. Fails with
    /// `NOT_FOUND` if there is no such country.
    async fn country(name: String, context: &Context) -> ApiResult<Option<Country>> {
        country_by_name(&name, context).await.map(Some)
    }

    /// Returns all countries known to the upstream API.
    async fn countries(context: &Context) -> ApiResult<Vec<Country>> {
        all_countries(context).await
    }
}

async fn country_by_name(name: &str, context: &Context) -> ApiResult<Country> {
    if name.trim().is_empty() {
        return Err(invalid_argument!("The 'name' argument is required."));
    }

    let countries = context.upstream.countries_by_name(name).await?;
    trace!("Upstream returned {} match(es) for '{name}'", countries.len());
    countries.into_iter()
        .next()
        .ok_or_else(|| not_found!("No data found for country: {}", name))
}

async fn all_countries(context: &Context) -> ApiResult<Vec<Country>> {
    let countries = context.upstream.all_countries().await?;
    if countries.is_empty() {
        return Err(not_found!("No countries found."));
    }

    Ok(countries)
}
