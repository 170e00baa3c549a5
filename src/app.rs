use std::net::SocketAddr;
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use crate::state::AppState;
use crate::{admin, auth, chirps};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(admin::fileserver(&state))
        .merge(admin::router())
        .merge(auth::router())
        .merge(chirps::router())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
        .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        bearer: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = bearer {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(v) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(v.to_string())),
            None => req.body(Body::empty()),
        }
        .expect("request");

        let res = app.clone().oneshot(req).await.expect("response");
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .expect("body");
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    async fn register_and_login(app: &Router, email: &str, password: &str) -> Value {
        let (status, _) = send(
            app,
            Method::POST,
            "/api/users",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = send(
            app,
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    #[tokio::test]
    async fn healthz_reports_ok() {
        let app = build_app(AppState::fake().await);
        let (status, body) = send(&app, Method::GET, "/api/healthz", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::String("OK".into()));
    }

    #[tokio::test]
    async fn fileserver_hits_are_counted_and_reset() {
        let state = AppState::fake().await;
        let name = format!("chirpy-static-{}.html", uuid::Uuid::new_v4());
        std::fs::write(std::env::temp_dir().join(&name), "<h1>hi</h1>").expect("static file");
        let app = build_app(state.clone());

        for _ in 0..3 {
            let (status, _) = send(&app, Method::GET, &format!("/app/{name}"), None, None).await;
            assert_eq!(status, StatusCode::OK);
        }
        assert_eq!(state.metrics.hits(), 3);

        let (_, page) = send(&app, Method::GET, "/api/metrics", None, None).await;
        assert!(page
            .as_str()
            .expect("html")
            .contains("Chirpy has been visited 3 times!"));

        let (status, _) = send(&app, Method::GET, "/api/reset", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state.metrics.hits(), 0);
    }

    #[tokio::test]
    async fn chirps_are_created_masked_and_listed() {
        let app = build_app(AppState::fake().await);

        let (status, chirp) = send(
            &app,
            Method::POST,
            "/api/chirps",
            None,
            Some(json!({ "body": "What a Kerfuffle this is" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(chirp, json!({ "id": 1, "body": "What a **** this is" }));

        send(&app, Method::POST, "/api/chirps", None, Some(json!({ "body": "second" }))).await;

        let (status, list) = send(&app, Method::GET, "/api/chirps", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<u64> = list
            .as_array()
            .expect("array")
            .iter()
            .map(|c| c["id"].as_u64().expect("id"))
            .collect();
        assert_eq!(ids, vec![1, 2]);

        let (status, one) = send(&app, Method::GET, "/api/chirps/2", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(one["body"], "second");
    }

    #[tokio::test]
    async fn chirp_errors_map_to_statuses() {
        let app = build_app(AppState::fake().await);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/chirps",
            None,
            Some(json!({ "body": "x".repeat(141) })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Chirp is too long");

        let (status, _) = send(&app, Method::GET, "/api/chirps/99", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::GET, "/api/chirps/abc", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn validate_chirp_returns_cleaned_body() {
        let app = build_app(AppState::fake().await);
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/validate_chirp",
            None,
            Some(json!({ "body": "fornax is here" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "cleaned_body": "**** is here" }));

        let (_, body) = send(
            &app,
            Method::POST,
            "/api/validate_chirp",
            None,
            Some(json!({ "body": "What a Kerfuffle! Sharbert." })),
        )
        .await;
        assert_eq!(body, json!({ "cleaned_body": "What a ****! ****." }));
    }

    #[tokio::test]
    async fn register_login_and_bad_credentials() {
        let app = build_app(AppState::fake().await);

        let (status, user) = send(
            &app,
            Method::POST,
            "/api/users",
            None,
            Some(json!({ "email": "a@example.com", "password": "secret123" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(user, json!({ "id": 1, "email": "a@example.com" }));

        let (status, login) = send(
            &app,
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "email": "a@example.com", "password": "secret123" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(login["id"], 1);
        assert!(login["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert!(login["refresh_token"].as_str().is_some_and(|t| !t.is_empty()));

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "email": "a@example.com", "password": "wrong" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": "secret123" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/users",
            None,
            Some(json!({ "email": "not-an-email", "password": "secret123" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_user_requires_access_token() {
        let app = build_app(AppState::fake().await);
        let login = register_and_login(&app, "old@example.com", "pw-one").await;
        let access = login["token"].as_str().expect("token");
        let refresh = login["refresh_token"].as_str().expect("refresh token");
        let update = json!({ "email": "new@example.com", "password": "pw-two" });

        let (status, _) = send(&app, Method::PUT, "/api/users", None, Some(update.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/users",
            Some(refresh),
            Some(update.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) =
            send(&app, Method::PUT, "/api/users", Some(access), Some(update)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "id": 1, "email": "new@example.com" }));

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "email": "new@example.com", "password": "pw-two" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn refresh_accepts_only_refresh_tokens() {
        let app = build_app(AppState::fake().await);
        let login = register_and_login(&app, "r@example.com", "pw").await;
        let access = login["token"].as_str().expect("token");
        let refresh = login["refresh_token"].as_str().expect("refresh token");

        let (status, _) = send(&app, Method::POST, "/api/refresh", Some(access), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(&app, Method::POST, "/api/refresh", Some(refresh), None).await;
        assert_eq!(status, StatusCode::OK);
        let new_access = body["token"].as_str().expect("new token");

        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/users",
            Some(new_access),
            Some(json!({ "email": "r2@example.com", "password": "pw2" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn cors_headers_are_present() {
        let app = build_app(AppState::fake().await);
        let req = Request::builder()
            .uri("/api/healthz")
            .header(header::ORIGIN, "http://example.com")
            .body(Body::empty())
            .expect("request");
        let res = app.oneshot(req).await.expect("response");
        assert!(res
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }
}
