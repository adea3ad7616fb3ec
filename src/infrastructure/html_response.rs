// HTTP response utilities for HTML with optional Brotli encoding
use async_compression::tokio::bufread::BrotliEncoder;
use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, Response, StatusCode},
};
use tokio::io::AsyncReadExt;

/// Client hint carrying the browser's `prefers-color-scheme`.
pub const COLOR_SCHEME_HINT: &str = "sec-ch-prefers-color-scheme";

pub fn accepts_brotli(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.split(',').any(|enc| enc.trim().starts_with("br")))
        .unwrap_or(false)
}

pub fn prefers_light(headers: &HeaderMap) -> bool {
    headers
        .get(COLOR_SCHEME_HINT)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim().trim_matches('"').eq_ignore_ascii_case("light"))
        .unwrap_or(false)
}

/// Build an HTML response, Brotli-compressed when `compress` is set
pub async fn html_response(html: String, compress: bool) -> Result<Response<Body>, StatusCode> {
    let bytes = html.into_bytes();

    let (body_bytes, content_encoding) = if compress {
        let cursor = std::io::Cursor::new(bytes);
        let mut encoder = BrotliEncoder::new(cursor);
        let mut compressed = Vec::new();
        encoder.read_to_end(&mut compressed).await.map_err(|e| {
            tracing::error!("Brotli compression error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        (compressed, Some("br"))
    } else {
        (bytes, None)
    };

    let mut response_builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .header(header::CACHE_CONTROL, "no-store")
        .header(header::VARY, "Accept-Encoding, Sec-CH-Prefers-Color-Scheme")
        .header("accept-ch", "Sec-CH-Prefers-Color-Scheme")
        .header(header::CONTENT_LENGTH, HeaderValue::from(body_bytes.len()));

    if let Some(encoding) = content_encoding {
        response_builder = response_builder.header(header::CONTENT_ENCODING, encoding);
    }

    response_builder
        .body(Body::from(body_bytes))
        .map_err(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
