use bytes::Bytes;
use http_body_util::BodyExt;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::prelude::*;


/// Returns an HTTP client that can also speak HTTPS. HTTPS is _not_ enforced!
///
/// If the system has no usable root certificates, a warning is logged and
/// the client is still built: plain HTTP keeps working and HTTPS requests
/// will fail certificate verification.
pub(crate) fn http_client<B>() -> Result<Client<HttpsConnector<HttpConnector>, B>>
where
    B: hyper::body::Body + Send,
    B::Data: Send,
{
    // Both `aws-lc-rs` and `ring` end up in our dependency tree, so rustls
    // cannot pick a provider on its own. Fails if one was installed already.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let builder = match HttpsConnectorBuilder::new().with_native_roots() {
        Ok(builder) => builder,
        Err(e) => {
            warn!("Could not load native root certificates, HTTPS requests will fail: {e}");
            let tls = rustls::ClientConfig::builder()
                .with_root_certificates(rustls::RootCertStore::empty())
                .with_no_client_auth();
            HttpsConnectorBuilder::new().with_tls_config(tls)
        }
    };

    let https = builder
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .build();

    Ok(Client::builder(TokioExecutor::new()).build(https))
}

/// Reads the whole body into memory.
pub(crate) async fn download_body<B>(body: B) -> Result<Bytes>
where
    B: hyper::body::Body<Data = Bytes>,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let collected = body.collect().await.context("failed to read HTTP body")?;
    Ok(collected.to_bytes())
}

/// Escapes text so that it can be placed into HTML element content and
/// (double quoted) attribute values.
pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Formats an integer with `,` as thousands separator, e.g. `67,000,000`.
pub(crate) fn group_thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
