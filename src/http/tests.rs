use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Method, Request, StatusCode};
use serde_json::json;

use crate::{api, upstream::{stub::StubUpstream, UpstreamClient}};
use super::{handle, Context, Response};


fn context(upstream: UpstreamClient) -> Arc<Context> {
    Arc::new(Context {
        api_root: Arc::new(api::root_node()),
        upstream: Arc::new(upstream),
        log_http_headers: false,
    })
}

async fn send(ctx: &Arc<Context>, method: Method, uri: &str, body: &str) -> Response {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Full::new(Bytes::from(body.to_owned())))
        .unwrap();
    handle(req, Arc::clone(ctx)).await
}

async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn france_stub() -> StubUpstream {
    StubUpstream::start()
        .json("/name/France", json!([{
            "name": { "common": "France" },
            "capital": ["Paris"],
            "population": 67000000,
            "region": "Europe",
            "subregion": "Western Europe",
            "flags": { "png": "https://flagcdn.com/w320/fr.png" },
        }]))
        .json("/all", json!([
            { "name": { "common": "France" }, "population": 67000000,
                "flags": { "png": "https://flagcdn.com/w320/fr.png" } },
            { "name": { "common": "Japan" }, "population": 125700000,
                "flags": { "png": "https://flagcdn.com/w320/jp.png" } },
        ]))
        .serve()
        .await
}

#[tokio::test]
async fn graphql_post() {
    let stub = france_stub().await;
    let ctx = context(stub.client());

    let body = json!({
        "query": "query($name: String!) { country(name: $name) { name capital } }",
        "variables": { "name": "France" },
    });
    let response = send(&ctx, Method::POST, "/graphql", &body.to_string()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/json");

    let out: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(out, json!({ "data": { "country": { "name": "France", "capital": ["Paris"] } } }));
}

#[tokio::test]
async fn graphql_post_batch() {
    let stub = france_stub().await;
    let ctx = context(stub.client());

    let body = json!([
        { "query": "{ countries { name } }" },
        { "query": "{ country(name: \"France\") { population } }" },
    ]);
    let response = send(&ctx, Method::POST, "/graphql", &body.to_string()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let out: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(out, json!([
        { "data": { "countries": [{ "name": "France" }, { "name": "Japan" }] } },
        { "data": { "country": { "population": 67000000 } } },
    ]));
}

#[tokio::test]
async fn graphql_get() {
    let stub = france_stub().await;
    let ctx = context(stub.client());

    let uri = "/graphql?query=query(%24n%3AString!)%7Bcountry(name%3A%24n)%7Bregion%7D%7D\
        &variables=%7B%22n%22%3A%22France%22%7D";
    let response = send(&ctx, Method::GET, uri, "").await;
    assert_eq!(response.status(), StatusCode::OK);

    let out: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(out, json!({ "data": { "country": { "region": "Europe" } } }));
}

#[tokio::test]
async fn graphql_get_without_query() {
    let ctx = context(StubUpstream::unreachable_client().await);
    let response = send(&ctx, Method::GET, "/graphql", "").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_graphql_body() {
    let ctx = context(StubUpstream::unreachable_client().await);
    let response = send(&ctx, Method::POST, "/graphql", "{ not json").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn resolver_errors_are_returned_with_data() {
    let stub = StubUpstream::start().serve().await;
    let ctx = context(stub.client());

    let body = json!({ "query": "{ country(name: \"Atlantis\") { name } }" });
    let response = send(&ctx, Method::POST, "/graphql", &body.to_string()).await;

    // Field errors are part of a successful execution.
    assert_eq!(response.status(), StatusCode::OK);
    let out: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(out["data"], json!({ "country": null }));
    assert_eq!(out["errors"][0]["message"], "Not found: No data found for country: Atlantis");
    assert_eq!(out["errors"][0]["extensions"]["kind"], "NOT_FOUND");
}

#[tokio::test]
async fn validation_errors_are_bad_request() {
    let ctx = context(StubUpstream::unreachable_client().await);

    let body = json!({ "query": "{ country { name } }" });
    let response = send(&ctx, Method::POST, "/graphql", &body.to_string()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unsupported_methods_and_paths() {
    let ctx = context(StubUpstream::unreachable_client().await);

    let response = send(&ctx, Method::DELETE, "/graphql", "").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let response = send(&ctx, Method::POST, "/", "").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let response = send(&ctx, Method::GET, "/nope", "").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn graphiql() {
    let ctx = context(StubUpstream::unreachable_client().await);
    let response = send(&ctx, Method::GET, "/graphiql", "").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("/graphql"));
}

#[tokio::test]
async fn frontend_page_without_selection() {
    let stub = france_stub().await;
    let ctx = context(stub.client());

    let response = send(&ctx, Method::GET, "/", "").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "text/html; charset=UTF-8");

    let html = body_string(response).await;
    assert!(html.contains("Country Browser"));
    assert!(html.contains("Select a country"));
    assert!(html.contains("Japan"));
    assert!(html.contains("125,700,000"));
    assert!(!html.contains("Capital:"));
    assert_eq!(stub.requests().await.len(), 1);
}

#[tokio::test]
async fn frontend_page_with_selection() {
    let stub = france_stub().await;
    let ctx = context(stub.client());

    let response = send(&ctx, Method::GET, "/?country=France", "").await;
    let html = body_string(response).await;
    assert!(html.contains("<strong>Capital:</strong> Paris"));
    assert!(html.contains("<strong>Subregion:</strong> Western Europe"));
    assert!(html.contains("<strong>Population:</strong> 67,000,000"));
    assert_eq!(stub.requests().await.len(), 2);
}

#[tokio::test]
async fn frontend_page_with_upstream_down() {
    let ctx = context(StubUpstream::unreachable_client().await);

    let response = send(&ctx, Method::GET, "/?country=France", "").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Error fetching countries: Upstream failure: failed to fetch data from the REST Countries API"));
}
