//! Stand-in for the REST Countries API in tests, backed by a `wiremock`
//! server. Paths without a canned response get an empty `404`.

use hyper::StatusCode;
use tokio::net::TcpListener;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use crate::config::BaseUrl;
use super::{UpstreamClient, UpstreamConfig};


/// Canned responses by request path. The query part is ignored when matching.
pub(crate) struct StubBuilder {
    routes: Vec<(String, StatusCode, String)>,
}

pub(crate) struct StubUpstream {
    server: MockServer,
}

impl StubBuilder {
    pub(crate) fn json(self, path: &str, body: serde_json::Value) -> Self {
        self.respond(path, StatusCode::OK, &body.to_string())
    }

    pub(crate) fn respond(mut self, path: &str, status: StatusCode, body: &str) -> Self {
        self.routes.push((path.to_owned(), status, body.to_owned()));
        self
    }

    pub(crate) async fn serve(self) -> StubUpstream {
        let server = MockServer::start().await;
        for (route, status, body) in self.routes {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(
                    ResponseTemplate::new(status.as_u16())
                        .set_body_raw(body, "application/json"),
                )
                .mount(&server)
                .await;
        }

        StubUpstream { server }
    }
}

impl StubUpstream {
    pub(crate) fn start() -> StubBuilder {
        StubBuilder { routes: vec![] }
    }

    pub(crate) fn base_url(&self) -> BaseUrl {
        self.server.uri().parse().unwrap()
    }

    pub(crate) fn client(&self) -> UpstreamClient {
        UpstreamClient::new(&UpstreamConfig { base_url: self.base_url() }).unwrap()
    }

    /// Path and query of all requests received so far.
    pub(crate) async fn requests(&self) -> Vec<String> {
        self.server.received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|req| match req.url.query() {
                Some(query) => format!("{}?{query}", req.url.path()),
                None => req.url.path().to_owned(),
            })
            .collect()
    }

    /// Returns a client pointing to a local port nobody listens on.
    pub(crate) async fn unreachable_client() -> UpstreamClient {
        let base_url = unused_local_url().await.parse().unwrap();
        UpstreamClient::new(&UpstreamConfig { base_url }).unwrap()
    }
}

/// An `http://127.0.0.1:PORT` URL where nothing listens.
pub(crate) async fn unused_local_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
