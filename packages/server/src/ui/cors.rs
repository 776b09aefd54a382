//! CORS layer for browser clients on another origin.

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

/// Build a CORS layer allowing `origin` (`*` for any origin).
///
/// Returns `None` when `origin` is not a valid header value.
pub fn build_cors_layer(origin: &str) -> Option<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers(Any);

    if origin.trim() == "*" {
        return Some(layer.allow_origin(Any));
    }

    match origin.trim().parse::<HeaderValue>() {
        Ok(value) => Some(layer.allow_origin(value)),
        Err(e) => {
            tracing::warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_cors_layer() {
        // テスト項目: ワイルドカードと具体的なオリジンは受け付け、不正な値は拒否する
        assert!(build_cors_layer("*").is_some());
        assert!(build_cors_layer("http://localhost:3000").is_some());
        assert!(build_cors_layer("http://bad\norigin").is_none());
    }
}
