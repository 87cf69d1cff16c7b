use bytes::Bytes;
use hyper::{Method, StatusCode};
use juniper::{
    http::{GraphQLBatchRequest, GraphQLRequest},
    InputValue,
};
use std::{sync::Arc, time::Instant};

use crate::{
    api,
    frontend::{self, LocalTransport},
    prelude::*,
    util::download_body,
};
use super::{Context, Response, log, response};


/// This is the main HTTP entry point, called for each incoming request.
pub(super) async fn handle<B>(req: hyper::Request<B>, ctx: Arc<Context>) -> Response
where
    B: hyper::body::Body<Data = Bytes>,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    log::req::log(&req);
    if ctx.log_http_headers {
        log::headers::log(&req);
    }

    let method = req.method().clone();
    let path = req.uri().path().trim_end_matches('/').to_owned();

    match path.as_str() {
        // The GraphQL endpoint. This is the only path for which POST is
        // allowed.
        "/graphql" if method == Method::POST => handle_api_post(req, &ctx).await,
        "/graphql" if method == Method::GET => {
            let query = req.uri().query().unwrap_or("").to_owned();
            handle_api_get(&query, &ctx).await
        }

        // From this point on, we only support GET and HEAD requests.
        _ if method != Method::GET && method != Method::HEAD => response::method_not_allowed(),

        // The interactive GraphQL API explorer/IDE.
        "/graphiql" => response::html(juniper::http::graphiql::graphiql_source("/graphql", None)),

        // The browser front-end, with the selected country in the query string.
        "" => {
            let selection = req.uri().query().and_then(selected_country);
            serve_frontend(selection, &ctx).await
        }

        _ => response::not_found(&method, &path),
    }
}

/// Extracts the `country` parameter from a query string. An empty value
/// counts as "nothing selected".
fn selected_country(query: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "country")
        .map(|(_, value)| value.into_owned())
        .filter(|name| !name.is_empty())
}

/// Renders the front-end page by running its queries against our own API,
/// without a network round trip.
async fn serve_frontend(selection: Option<String>, ctx: &Context) -> Response {
    let transport = LocalTransport::new(Arc::clone(&ctx.api_root), Arc::clone(&ctx.upstream));
    let browser = frontend::load(&transport, selection).await;
    response::html(frontend::html::render_page(&browser.view()))
}

/// Handles a `POST` request to `/graphql`. The body is a single JSON request
/// or a batch of them.
async fn handle_api_post<B>(req: hyper::Request<B>, ctx: &Context) -> Response
where
    B: hyper::body::Body<Data = Bytes>,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let body = match download_body(req.into_body()).await {
        Ok(body) => body,
        Err(e) => {
            warn!("Failed to read body of API request: {e:#}");
            return response::bad_request(Some("failed to read request body"));
        }
    };

    match serde_json::from_slice::<GraphQLBatchRequest>(&body) {
        Ok(gql_req) => execute_api(gql_req, ctx).await,
        Err(e) => {
            debug!("Invalid GraphQL request body: {e}");
            response::bad_request(Some(&format!("invalid GraphQL request: {e}")))
        }
    }
}

/// Handles a `GET` request to `/graphql`, with the request encoded in the
/// `query`, `operationName` and `variables` parameters.
async fn handle_api_get(query_string: &str, ctx: &Context) -> Response {
    let mut query = None;
    let mut operation_name = None;
    let mut variables = None;
    for (key, value) in form_urlencoded::parse(query_string.as_bytes()) {
        match &*key {
            "query" => query = Some(value.into_owned()),
            "operationName" => operation_name = Some(value.into_owned()),
            "variables" => match serde_json::from_str::<InputValue>(&value) {
                Ok(v) => variables = Some(v),
                Err(e) => {
                    return response::bad_request(Some(&format!("invalid 'variables': {e}")));
                }
            },
            _ => {}
        }
    }

    let Some(query) = query else {
        return response::bad_request(Some("missing 'query' parameter"));
    };

    let gql_req = GraphQLRequest::new(query, operation_name, variables);
    execute_api(GraphQLBatchRequest::Single(gql_req), ctx).await
}

async fn execute_api(gql_req: GraphQLBatchRequest, ctx: &Context) -> Response {
    let before = Instant::now();
    let api_context = api::Context { upstream: Arc::clone(&ctx.upstream) };

    let result = gql_req.execute(&ctx.api_root, &api_context).await;
    let status = if result.is_ok() { StatusCode::OK } else { StatusCode::BAD_REQUEST };
    let out = match serde_json::to_vec(&result) {
        Ok(json) => response::json(status, json),
        Err(e) => {
            error!("Failed to serialize GraphQL response: {e}");
            response::internal_server_error()
        }
    };

    debug!("Finished /graphql query in {:.2?}", before.elapsed());
    out
}
