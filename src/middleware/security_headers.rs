//! Security-related response headers for browser clients.
//!
//! Responses here carry session cookies, so they must not be cached by
//! intermediaries. Every header is only set when the handler did not set it.

use axum::Router;
use axum::http::header::{self, HeaderName, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;

const HEADERS: &[(&str, &str)] = &[
    // Clickjacking protection (legacy + modern)
    ("x-frame-options", "DENY"),
    ("content-security-policy", "frame-ancestors 'none'"),
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "no-referrer"),
    (
        "permissions-policy",
        "camera=(), microphone=(), geolocation=()",
    ),
];

pub fn apply(router: Router) -> Router {
    let router = HEADERS.iter().fold(router, |router, &(name, value)| {
        router.layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        ))
    });

    router.layer(SetResponseHeaderLayer::if_not_present(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store"),
    ))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::IntoResponse,
        routing::get,
    };
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn sets_all_headers() {
        let app = apply(Router::new().route("/", get(|| async { "ok" })));
        let res = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        for (name, value) in HEADERS {
            assert_eq!(res.headers()[*name], *value, "{name}");
        }
        assert_eq!(res.headers()[header::CACHE_CONTROL], "no-store");
    }

    #[tokio::test]
    async fn keeps_handler_supplied_values() {
        let app = apply(Router::new().route(
            "/",
            get(|| async {
                (
                    StatusCode::OK,
                    [(header::CACHE_CONTROL, "max-age=60")],
                    "cached",
                )
                    .into_response()
            }),
        ));
        let res = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.headers()[header::CACHE_CONTROL], "max-age=60");
    }
}
