use hyper::{Method, StatusCode};

use crate::prelude::*;
use super::{Body, Response};


pub(crate) fn html(body: String) -> Response {
    Response::builder()
        .header("content-type", "text/html; charset=UTF-8")
        .body(Body::from(body))
        .expect("bug: invalid response")
}

pub(crate) fn json(status: StatusCode, body: Vec<u8>) -> Response {
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .expect("bug: invalid response")
}

pub(crate) fn bad_request(msg: Option<&str>) -> Response {
    let body = match msg {
        Some(s) => Body::from(s.to_owned()),
        None => Body::from("Bad request"),
    };
    Response::builder()
        .status(StatusCode::BAD_REQUEST)
        .header("content-type", "text/plain; charset=UTF-8")
        .body(body)
        .expect("bug: invalid response")
}

pub(crate) fn not_found(method: &Method, path: &str) -> Response {
    debug!("Responding with 404 to {:?} '{}'", method, path);
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("content-type", "text/plain; charset=UTF-8")
        .body(Body::from("404 Not found"))
        .expect("bug: invalid response")
}

pub(crate) fn method_not_allowed() -> Response {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("content-type", "text/plain; charset=UTF-8")
        .body(Body::from("405 Method not allowed"))
        .expect("bug: invalid response")
}

pub(crate) fn internal_server_error() -> Response {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .body(Body::from("Internal server error"))
        .expect("bug: invalid response")
}
