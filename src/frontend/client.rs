//! Ways to send the front-end's GraphQL queries to the gateway.

use std::{future::Future, sync::Arc};

use juniper::{http::GraphQLRequest, InputValue};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;

use crate::{
    api,
    config::BaseUrl,
    prelude::*,
    upstream::UpstreamClient,
};


/// Something that can execute a GraphQL query and return the raw JSON
/// response (`{ "data": ..., "errors": [...] }`). Failures to get any
/// response are returned as the message to show to the user.
pub(crate) trait Transport {
    fn execute(
        &self,
        query: &'static str,
        variables: serde_json::Value,
    ) -> impl Future<Output = Result<serde_json::Value, String>> + Send;
}

/// Sends queries to a running gateway over HTTP.
pub(crate) struct HttpTransport {
    http_client: reqwest::Client,
    gateway_url: BaseUrl,
}

impl HttpTransport {
    pub(crate) fn new(gateway_url: &BaseUrl) -> Result<Self> {
        // `reqwest` and `hyper-rustls` pull in different providers.
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

        let http_client = reqwest::Client::builder()
            .user_agent(crate::version::user_agent())
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { http_client, gateway_url: gateway_url.clone() })
    }
}

impl Transport for HttpTransport {
    async fn execute(
        &self,
        query: &'static str,
        variables: serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        let body = json!({ "query": query, "variables": variables });
        let response = self.http_client.post(self.gateway_url.to_string())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| format!("failed to reach the gateway at '{}': {e}", self.gateway_url))?;

        // The gateway also sends a JSON body with `400`.
        let status = response.status();
        let bytes = response.bytes()
            .await
            .map_err(|e| format!("failed to read response from the gateway: {e}"))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            debug!("Undecodable {status} response from the gateway: {e}");
            let text = excerpt(&String::from_utf8_lossy(&bytes));
            if text.is_empty() {
                format!("unexpected response from the gateway (HTTP {status})")
            } else {
                format!("unexpected response from the gateway (HTTP {status}): {text}")
            }
        })
    }
}

/// How many characters of an undecodable response body end up in the error.
const MAX_EXCERPT_LEN: usize = 200;

fn excerpt(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(MAX_EXCERPT_LEN) {
        Some((end, _)) => format!("{}…", &body[..end]),
        None => body.to_owned(),
    }
}

/// Executes queries in-process against an API root node, as the server does
/// when rendering the front-end page.
pub(crate) struct LocalTransport {
    api_root: Arc<api::RootNode>,
    upstream: Arc<UpstreamClient>,
}

impl LocalTransport {
    pub(crate) fn new(api_root: Arc<api::RootNode>, upstream: Arc<UpstreamClient>) -> Self {
        Self { api_root, upstream }
    }
}

impl Transport for LocalTransport {
    async fn execute(
        &self,
        query: &'static str,
        variables: serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        let variables = serde_json::from_value::<InputValue>(variables)
            .map_err(|e| format!("invalid query variables: {e}"))?;
        let context = api::Context { upstream: Arc::clone(&self.upstream) };

        let request = GraphQLRequest::new(query.to_owned(), None, Some(variables));
        let response = request.execute(&self.api_root, &context).await;
        serde_json::to_value(&response).map_err(|e| format!("failed to serialize response: {e}"))
    }
}


#[derive(Deserialize)]
struct GraphQLResponse {
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Vec<GraphQLError>,
}

#[derive(Deserialize)]
struct GraphQLError {
    message: String,
}

/// Executes a query and decodes its `data`. If the response carries errors,
/// the message of the first one is returned.
pub(crate) async fn fetch<T, D>(
    transport: &T,
    query: &'static str,
    variables: serde_json::Value,
) -> Result<D, String>
where
    T: Transport,
    D: DeserializeOwned,
{
    let raw = transport.execute(query, variables).await?;
    let response = serde_json::from_value::<GraphQLResponse>(raw)
        .map_err(|e| format!("invalid GraphQL response: {e}"))?;

    if let Some(error) = response.errors.into_iter().next() {
        return Err(error.message);
    }

    let data = response.data.ok_or_else(|| "GraphQL response contains no data".to_owned())?;
    serde_json::from_value(data).map_err(|e| format!("unexpected GraphQL response data: {e}"))
}
