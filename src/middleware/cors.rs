//! CORS policy for browser clients.
//!
//! The session lives in cookies, so cross-origin callers only get a working
//! session when the response allows credentials.
//!
//! Policy:
//! - Development: any origin, WITHOUT credentials (same-origin dev servers still work).
//! - Production: allowlist from `CORS_ALLOWED_ORIGINS`, WITH credentials.
//!   An empty allowlist allows no cross-origin caller at all.

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::AppEnv;

pub fn layer(app_env: AppEnv, allowed_origins: &[String]) -> CorsLayer {
    let cors = if app_env.is_production() {
        let allowed: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        let allow_origin = AllowOrigin::predicate(move |origin: &HeaderValue, _req| {
            allowed.iter().any(|v| v == origin)
        });

        // Never combine credentials with a wildcard origin.
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_credentials(true)
    } else {
        CorsLayer::new().allow_origin(Any)
    };

    cors.allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-request-id"),
        ])
        .max_age(std::time::Duration::from_secs(60 * 10))
}

pub fn apply(router: Router, app_env: AppEnv, allowed_origins: &[String]) -> Router {
    router.layer(layer(app_env, allowed_origins))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::post,
    };
    use tower::ServiceExt;

    use super::*;

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/notifications")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
            .body(Body::empty())
            .unwrap()
    }

    fn router(app_env: AppEnv, origins: &[String]) -> Router {
        apply(
            Router::new().route("/notifications", post(|| async { StatusCode::OK })),
            app_env,
            origins,
        )
    }

    #[tokio::test]
    async fn production_allows_listed_origin_with_credentials() {
        let origins = vec!["https://app.example.com".to_string()];
        let res = router(AppEnv::Production, &origins)
            .oneshot(preflight("https://app.example.com"))
            .await
            .unwrap();

        let headers = res.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://app.example.com"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }

    #[tokio::test]
    async fn production_ignores_unlisted_origin() {
        let origins = vec!["https://app.example.com".to_string()];
        let res = router(AppEnv::Production, &origins)
            .oneshot(preflight("https://evil.example.com"))
            .await
            .unwrap();

        assert!(
            !res.headers()
                .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        );
    }

    #[tokio::test]
    async fn development_allows_any_origin_without_credentials() {
        let res = router(AppEnv::Development, &[])
            .oneshot(preflight("http://localhost:4321"))
            .await
            .unwrap();

        let headers = res.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(!headers.contains_key(header::ACCESS_CONTROL_ALLOW_CREDENTIALS));
    }
}
