pub mod health;
pub mod pagination;

use axum::{extract::DefaultBodyLimit, routing::get, Router};

use crate::applications::handlers as applications;
use crate::profile::handlers as profile;
use crate::state::AppState;

/// Resume uploads go through the profile form.
const PROFILE_BODY_LIMIT: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/myJobApplications",
            get(applications::handle_my_job_applications),
        )
        .route("/job", get(applications::handle_job_sync))
        .route(
            "/myProfile",
            get(profile::handle_get_my_profile)
                .put(profile::handle_update_my_profile)
                .layer(DefaultBodyLimit::max(PROFILE_BODY_LIMIT)),
        );

    let base_path = state.config.api_base_path.clone();
    let router = Router::new().route("/health", get(health::health_handler));
    let router = if base_path.is_empty() || base_path == "/" {
        router.merge(api)
    } else {
        router.nest(&base_path, api)
    };
    router.with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::auth::tests::{machine_token, sign, user_token, TEST_ISSUER, TEST_SECRET};
    use crate::auth::JwtVerifier;
    use crate::config::{Auth0Config, Config};
    use crate::gateway::fake::FakeUpstream;
    use crate::models::candidate::{JobCandidate, ResourceBooking, WorkPeriod};
    use crate::models::job::Job;

    fn config() -> Config {
        Config {
            port: 0,
            rust_log: "debug".to_string(),
            api_base_path: "/api/my-gigs".to_string(),
            api_v5_url: "http://upstream.invalid/v5".to_string(),
            recruit_api_url: "http://recruit.invalid".to_string(),
            auth0: Auth0Config {
                url: "http://auth.invalid/oauth/token".to_string(),
                audience: "aud".to_string(),
                client_id: "id".to_string(),
                client_secret: "secret".to_string(),
                proxy_server_url: None,
            },
            auth_secret: TEST_SECRET.to_string(),
            valid_issuers: vec![TEST_ISSUER.to_string()],
            upstream_timeout_secs: 5,
        }
    }

    fn app(upstream: Arc<FakeUpstream>) -> Router {
        let config = config();
        let jwt = Arc::new(JwtVerifier::new(&config.auth_secret, &config.valid_issuers));
        build_router(AppState {
            config,
            upstream,
            jwt,
        })
    }

    fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .uri(uri)
            .header(header::HOST, "gigs.example.com");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn completed_upstream() -> FakeUpstream {
        FakeUpstream {
            candidates: vec![JobCandidate {
                user_id: "u1".to_string(),
                job_id: "j1".to_string(),
                status: "placed".to_string(),
                ..Default::default()
            }],
            candidate_total: 45,
            bookings: vec![ResourceBooking {
                id: "rb1".to_string(),
                user_id: "u1".to_string(),
                job_id: "j1".to_string(),
                start_date: Some("2019-06-01".to_string()),
                end_date: Some("2020-01-01".to_string()),
            }],
            work_periods: vec![WorkPeriod {
                id: None,
                user_handle: "h1".to_string(),
                resource_booking_id: "rb1".to_string(),
                payment_total: 250.0,
            }],
            jobs: vec![Job {
                id: "j1".to_string(),
                title: Some("Engineer".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(Arc::new(FakeUpstream::default()))
            .oneshot(get_request("/health", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["service"], json!("gigs-api"));
    }

    #[tokio::test]
    async fn test_my_job_applications_body_and_headers() {
        let upstream = Arc::new(completed_upstream());
        let response = app(upstream.clone())
            .oneshot(get_request(
                "/api/my-gigs/myJobApplications?status=completed_jobs&perPage=20&page=2",
                Some(&user_token("h1")),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers().clone();
        assert_eq!(headers["x-total"], "45");
        assert_eq!(headers["x-page"], "2");
        assert_eq!(headers["x-per-page"], "20");
        assert_eq!(headers["x-total-pages"], "3");
        assert_eq!(headers["x-prev-page"], "1");
        assert_eq!(headers["x-next-page"], "3");
        let link = headers["link"].to_str().unwrap();
        assert!(link.contains(
            "<http://gigs.example.com/api/my-gigs/myJobApplications?status=completed_jobs&perPage=20&page=3>; rel=\"next\""
        ));

        let body = json_body(response).await;
        assert_eq!(body[0]["title"], json!("Engineer"));
        assert_eq!(body[0]["status"], json!("completed"));
        assert_eq!(body[0]["paymentTotal"], json!(250.0));
        assert_eq!(body[0]["payment"]["currency"], json!("$"));
    }

    #[tokio::test]
    async fn test_validation_errors_joined() {
        let response = app(Arc::new(FakeUpstream::default()))
            .oneshot(get_request(
                "/api/my-gigs/myJobApplications?page=abc&sortOrder=up",
                Some(&user_token("h1")),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"message": "\"page\" must be a number, \"sortOrder\" must be one of [desc, asc]"})
        );
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let response = app(Arc::new(FakeUpstream::default()))
            .oneshot(get_request("/api/my-gigs/myJobApplications", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            json_body(response).await,
            json!({"message": "No token provided."})
        );
    }

    #[tokio::test]
    async fn test_tampered_token_is_unauthorized() {
        let token = sign(json!({ "https://topcoder-dev.com/handle": "h1" }));
        let tampered = format!("{token}x");
        let response = app(Arc::new(FakeUpstream::default()))
            .oneshot(get_request("/api/my-gigs/job", Some(&tampered)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await, json!({"message": "Invalid Token."}));
    }

    #[tokio::test]
    async fn test_machine_gets_empty_list() {
        let upstream = Arc::new(completed_upstream());
        let response = app(upstream.clone())
            .oneshot(get_request(
                "/api/my-gigs/myJobApplications",
                Some(&machine_token()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-total"], "0");
        assert_eq!(json_body(response).await, json!([]));
        assert!(upstream.calls().is_empty());
    }

    #[tokio::test]
    async fn test_job_sync_route() {
        let response = app(Arc::new(FakeUpstream::default()))
            .oneshot(get_request(
                "/api/my-gigs/job?externalId=ext1",
                Some(&user_token("h1")),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"synced": false}));
    }

    #[tokio::test]
    async fn test_upstream_status_reaches_client() {
        let upstream = Arc::new(FakeUpstream {
            fail_with: Some(404),
            ..Default::default()
        });
        let response = app(upstream)
            .oneshot(get_request("/api/my-gigs/myProfile", Some(&user_token("h1"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response).await,
            json!({"message": "fetch_member failed"})
        );
    }

    #[tokio::test]
    async fn test_update_profile_multipart() {
        let upstream = Arc::new(FakeUpstream {
            member: json!({"handle": "h1", "addresses": []}),
            ..Default::default()
        });
        let boundary = "gigs-boundary";
        let mut body = String::new();
        for (name, value) in [
            ("firstName", "Tony"),
            ("lastName", "J"),
            ("city", "Austin"),
            ("country", "Canada"),
            ("phone", "+1 555 0100"),
            ("availability", "true"),
        ] {
            body.push_str(&format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"cv.txt\"\r\nContent-Type: text/plain\r\n\r\nhello\r\n--{boundary}--\r\n"
        ));

        let request = Request::builder()
            .method("PUT")
            .uri("/api/my-gigs/myProfile")
            .header(header::AUTHORIZATION, format!("Bearer {}", user_token("h1")))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app(upstream.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["handle"], json!("h1"));

        let writes = upstream.writes.lock().unwrap();
        assert_eq!(writes.len(), 3);
        assert_eq!(writes[2].1["resume"], json!("cv.txt"));
        assert_eq!(writes[2].1["availability"], json!(true));
    }
}
