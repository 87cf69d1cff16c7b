//! Client for the upstream REST Countries API.
//!
//! Every lookup is exactly one `GET` request. Responses are decoded and
//! reshaped into [`Country`] values in one step; nothing is cached or
//! retried.

use std::{fmt, time::Instant};

use bytes::Bytes;
use http_body_util::Empty;
use hyper::{
    Request, StatusCode,
    body::Incoming,
    http::{self, uri::Uri},
};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::{
    config::BaseUrl,
    model::Country,
    prelude::*,
    util::download_body,
};

#[cfg(test)]
pub(crate) mod stub;


#[derive(Debug, confique::Config)]
pub(crate) struct UpstreamConfig {
    /// Base URL of the REST Countries API, including the version path.
    /// The gateway appends `/name/{name}` and `/all` to it.
    ///
    /// HTTP is only allowed for loopback hosts, unless the URL ends with
    /// `#allow-insecure`.
    #[config(default = "https://restcountries.com/v3.1")]
    pub(crate) base_url: BaseUrl,
}

/// The upstream fields we actually use. Upstream only sends these, which
/// keeps the `/all` response small.
const FIELDS: &str = "name,capital,population,region,subregion,flags";

/// Characters that have to be escaped in a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ').add(b'"').add(b'#').add(b'%').add(b'/').add(b'<').add(b'>')
    .add(b'?').add(b'`').add(b'{').add(b'}').add(b'\\').add(b'^').add(b'|');

type RequestBody = Empty<Bytes>;

/// Sends requests to the REST Countries API. Cheap to share: all requests go
/// through one connection pool.
pub(crate) struct UpstreamClient {
    http_client: Client<HttpsConnector<HttpConnector>, RequestBody>,
    base_url: BaseUrl,
}

/// Outcome of a lookup that reached upstream, before it is turned into API
/// errors.
#[derive(Debug)]
pub(crate) enum UpstreamError {
    /// The request could not be sent or the response could not be received.
    Transport(String),

    /// Upstream answered with an unexpected HTTP status.
    Status(StatusCode),

    /// The response body is not the JSON we expect.
    Malformed(String),
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "request failed: {msg}"),
            Self::Status(status) => write!(f, "unexpected HTTP status {status}"),
            Self::Malformed(msg) => write!(f, "malformed response: {msg}"),
        }
    }
}

impl std::error::Error for UpstreamError {}

impl UpstreamClient {
    const ALL_PATH: &'static str = "/all";
    const NAME_PATH: &'static str = "/name";

    pub(crate) fn new(config: &UpstreamConfig) -> Result<Self> {
        Ok(Self {
            http_client: crate::util::http_client()?,
            base_url: config.base_url.clone(),
        })
    }

    pub(crate) fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Fetches all countries whose name matches `name`, in upstream order.
    /// Upstream replying "404 Not Found" is treated like an empty result.
    pub(crate) async fn countries_by_name(&self, name: &str) -> Result<Vec<Country>, UpstreamError> {
        let pq = format!(
            "{}/{}?fields={FIELDS}",
            Self::NAME_PATH,
            utf8_percent_encode(name, PATH_SEGMENT),
        );

        match self.get_json(&pq).await {
            Err(UpstreamError::Status(StatusCode::NOT_FOUND)) => {
                debug!("Upstream has no country matching '{name}'");
                Ok(vec![])
            }
            other => other,
        }
    }

    /// Fetches the full list of countries, in upstream order.
    pub(crate) async fn all_countries(&self) -> Result<Vec<Country>, UpstreamError> {
        self.get_json(&format!("{}?fields={FIELDS}", Self::ALL_PATH)).await
    }

    async fn get_json(&self, path_and_query: &str) -> Result<Vec<Country>, UpstreamError> {
        let before = Instant::now();
        let uri = self.base_url.join(path_and_query)
            .map_err(|e| UpstreamError::Transport(format!("{e:#}")))?;
        let req = Self::build_req(&uri)?;

        trace!("Sending request: GET {uri}");
        let response = self.http_client.request(req)
            .await
            .map_err(|e| UpstreamError::Transport(format!("HTTP request to '{uri}' failed: {e}")))?;

        let (countries, body_len) = Self::deserialize_response(response, &uri).await?;
        debug!(
            "Received {} KiB ({} countries) from upstream in {:.2?} ({uri})",
            body_len / 1024,
            countries.len(),
            before.elapsed(),
        );

        Ok(countries)
    }

    fn build_req(uri: &Uri) -> Result<Request<RequestBody>, UpstreamError> {
        Request::builder()
            .method(http::Method::GET)
            .uri(uri)
            .header(http::header::ACCEPT, "application/json")
            .header(http::header::USER_AGENT, crate::version::user_agent())
            .body(RequestBody::new())
            .map_err(|e| UpstreamError::Transport(format!("failed to build request: {e}")))
    }

    async fn deserialize_response(
        response: hyper::Response<Incoming>,
        uri: &Uri,
    ) -> Result<(Vec<Country>, usize), UpstreamError> {
        let (parts, body) = response.into_parts();
        let body = download_body(body).await
            .map_err(|e| UpstreamError::Transport(format!("failed to download body from '{uri}': {e:#}")))?;

        if parts.status != StatusCode::OK {
            trace!("HTTP response: {:#?}", parts);
            return Err(UpstreamError::Status(parts.status));
        }

        let out = serde_json::from_slice::<Vec<Country>>(&body)
            .map_err(|e| UpstreamError::Malformed(e.to_string()))
            .tap_err(|_| trace!("HTTP response: {:#?}", parts))?;

        Ok((out, body.len()))
    }
}
