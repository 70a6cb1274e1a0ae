use axum::{
    body::Body,
    extract::{ConnectInfo, Request},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use tracing::Span;

/// Number of reverse proxies in front of the service whose headers we trust
pub const TRUSTED_PROXY_HOPS: usize = 1;

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";
pub const X_FORWARDED_HOST: &str = "x-forwarded-host";
pub const X_FORWARDED_PREFIX: &str = "x-forwarded-prefix";

/// Request origin as seen through the trusted proxy
///
/// Inserted into request extensions by [`normalize_forwarded_headers`]. The
/// lookup handlers never read it; it feeds request tracing, and the host also
/// replaces the request's `Host` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardedInfo {
    pub client_addr: Option<String>,
    pub proto: Option<String>,
    pub host: Option<String>,
    pub prefix: Option<String>,
}

impl ForwardedInfo {
    pub fn from_headers(headers: &HeaderMap, peer_addr: Option<SocketAddr>) -> Self {
        Self {
            client_addr: trusted_value(headers, X_FORWARDED_FOR)
                .or_else(|| peer_addr.map(|addr| addr.ip().to_string())),
            proto: trusted_value(headers, X_FORWARDED_PROTO),
            host: trusted_value(headers, X_FORWARDED_HOST),
            prefix: trusted_value(headers, X_FORWARDED_PREFIX),
        }
    }
}

/// Value appended by the outermost trusted proxy
///
/// All instances of the header are treated as one comma-separated list. With
/// N trusted hops the Nth value from the right is authoritative; anything to
/// its left was supplied by the client and is ignored. Returns `None` if the
/// header is absent, has fewer than N values, or the selected value is empty.
fn trusted_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let values: Vec<&str> = headers
        .get_all(name)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .collect();

    if values.len() < TRUSTED_PROXY_HOPS {
        return None;
    }

    let value = values[values.len() - TRUSTED_PROXY_HOPS];
    (!value.is_empty()).then(|| value.to_string())
}

/// Middleware that resolves forwarded headers into a [`ForwardedInfo`]
///
/// The trusted `X-Forwarded-Host` becomes the effective `Host`. The scheme
/// and prefix are only recorded: requests arrive in origin form, so there is
/// no URI scheme or mount point to rewrite.
pub async fn normalize_forwarded_headers(mut request: Request, next: Next) -> Response {
    let peer_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let info = ForwardedInfo::from_headers(request.headers(), peer_addr);

    if let Some(host) = info.host.as_deref() {
        match HeaderValue::from_str(host) {
            Ok(value) => {
                request.headers_mut().insert(header::HOST, value);
            }
            Err(_) => tracing::debug!("Ignoring unusable X-Forwarded-Host: {:?}", host),
        }
    }

    request.extensions_mut().insert(info);

    next.run(request).await
}

/// Span for `TraceLayer`, tagged with the resolved request origin
pub fn make_request_span(request: &Request<Body>) -> Span {
    let info = request
        .extensions()
        .get::<ForwardedInfo>()
        .cloned()
        .unwrap_or_default();

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        client = info.client_addr.as_deref().unwrap_or("-"),
        proto = info.proto.as_deref().unwrap_or("-"),
        host = info.host.as_deref().unwrap_or("-"),
        prefix = info.prefix.as_deref().unwrap_or("-"),
    )
}
