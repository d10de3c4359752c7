//! HTTP API integration tests
//!
//! The axum router is driven in-process through `tower::ServiceExt::oneshot`
//! with an in-memory email store; no server or database is started.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use markdown_email_service::config::Settings;
use markdown_email_service::server::{create_app, AppState};

fn app_with(settings: Settings) -> Router {
    create_app(AppState::new(settings))
}

fn app() -> Router {
    app_with(Settings::default())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn welcome_email() -> Value {
    json!({
        "subject": "Welcome\r\nBcc: victim@example.com",
        "markdown": "# Hello {{name}}\n\nThanks for joining.",
        "recipients": ["john@example.com"],
        "variables": {"name": "John"}
    })
}

mod render_api_tests {
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["store"]["backend"], "memory");
        assert_eq!(body["store"]["stored_emails"], 0);
        assert_eq!(body["emails"]["created"], 0);
    }

    #[tokio::test]
    async fn test_render() {
        let (status, body) = send(
            &app(),
            post_json(
                "/api/v1/render",
                json!({"markdown": "Hi **{{ name }}**", "variables": {"name": "Ada"}}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let html = body["html"].as_str().unwrap();
        assert!(html.contains("<strong>Ada</strong>"));
        assert!(html.contains("<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn test_render_missing_variable_is_422() {
        let (status, body) = send(
            &app(),
            post_json("/api/v1/render", json!({"markdown": "Hi {{name}}"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "MISSING_VARIABLES");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("missing variables: name"));
    }

    #[tokio::test]
    async fn test_render_unknown_template_is_422() {
        let (status, body) = send(
            &app(),
            post_json(
                "/api/v1/render",
                json!({"markdown": "# Hi", "template": "does-not-exist"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "TEMPLATE_RENDER_FAILED");
    }

    #[tokio::test]
    async fn test_render_empty_markdown_is_400() {
        let (status, body) =
            send(&app(), post_json("/api/v1/render", json!({"markdown": "  "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_button() {
        let (status, body) = send(
            &app(),
            post_json(
                "/api/v1/buttons",
                json!({"text": "Pay <now>", "url": "javascript:alert(1)", "type": "danger"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let html = body["html"].as_str().unwrap();
        assert!(html.starts_with(r##"<a href="#""##));
        assert!(html.contains("background-color: #e74c3c"));
        assert!(html.contains("Pay &lt;now&gt;"));
    }

    #[tokio::test]
    async fn test_button_defaults_to_primary() {
        let (status, body) = send(
            &app(),
            post_json(
                "/api/v1/buttons",
                json!({"text": "Go", "url": "https://example.com"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["html"]
            .as_str()
            .unwrap()
            .contains("background-color: #3498db"));
    }
}

mod email_api_tests {
    use super::*;

    #[tokio::test]
    async fn test_email_lifecycle() {
        let app = app();

        let (status, created) = send(&app, post_json("/api/v1/emails", welcome_email())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "draft");
        assert_eq!(created["subject"], "WelcomeBcc: victim@example.com");
        assert_eq!(created["template_used"], "base-template");
        assert!(created["html_content"]
            .as_str()
            .unwrap()
            .contains("Hello John"));

        let id = created["id"].as_str().unwrap().to_string();

        let (status, fetched) = send(&app, get(&format!("/api/v1/emails/{}", id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["id"], id.as_str());

        let (status, sent) = send(
            &app,
            post_json(&format!("/api/v1/emails/{}/sent", id), json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(sent["status"], "sent");
        assert!(sent["sent_at"].is_string());

        let (status, list) = send(&app, get("/api/v1/emails?status=sent")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list["total"], 1);

        let (_, health) = send(&app, get("/health")).await;
        assert_eq!(health["emails"]["created"], 1);
        assert_eq!(health["emails"]["sent"], 1);
    }

    #[tokio::test]
    async fn test_mark_failed() {
        let app = app();
        let (_, created) = send(&app, post_json("/api/v1/emails", welcome_email())).await;
        let id = created["id"].as_str().unwrap();

        let (status, failed) = send(
            &app,
            post_json(
                &format!("/api/v1/emails/{}/failed", id),
                json!({"error": "SMTP connection refused"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(failed["status"], "failed");
        assert_eq!(failed["error_message"], "SMTP connection refused");

        let (_, drafts) = send(&app, get("/api/v1/emails?status=draft")).await;
        assert_eq!(drafts["total"], 0);
        let (_, failed_list) = send(&app, get("/api/v1/emails?status=failed")).await;
        assert_eq!(failed_list["total"], 1);
    }

    #[tokio::test]
    async fn test_create_validation() {
        let app = app();
        let mut email = welcome_email();
        email["recipients"] = json!([]);

        let (status, body) = send(&app, post_json("/api/v1/emails", email)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_create_render_failure_not_stored() {
        let app = app();
        let mut email = welcome_email();
        email["variables"] = json!({});

        let (status, _) = send(&app, post_json("/api/v1/emails", email)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (_, list) = send(&app, get("/api/v1/emails")).await;
        assert_eq!(list["total"], 0);
    }

    #[tokio::test]
    async fn test_unknown_email_is_404() {
        let (status, body) = send(
            &app(),
            get("/api/v1/emails/6a2f41a3-c54c-fce8-32d2-0324e1c32e22"),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_invalid_id_and_status_are_400() {
        let app = app();
        let (status, _) = send(&app, get("/api/v1/emails/not-a-uuid")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, get("/api/v1/emails?status=bounced")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_store_emails_disabled() {
        let mut settings = Settings::default();
        settings.database.store_emails = false;
        let app = app_with(settings);

        let (status, created) = send(&app, post_json("/api/v1/emails", welcome_email())).await;
        assert_eq!(status, StatusCode::CREATED);

        let id = created["id"].as_str().unwrap();
        let (status, _) = send(&app, get(&format!("/api/v1/emails/{}", id))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

mod auth_tests {
    use super::*;

    fn secured_app() -> Router {
        let mut settings = Settings::default();
        settings.api.key = Some("s3cret".to_string());
        app_with(settings)
    }

    #[tokio::test]
    async fn test_missing_key_rejected() {
        let (status, _) = send(
            &secured_app(),
            post_json("/api/v1/render", json!({"markdown": "# Hi"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_key_accepted() {
        let mut request = post_json("/api/v1/render", json!({"markdown": "# Hi"}));
        request
            .headers_mut()
            .insert("X-API-Key", "s3cret".parse().unwrap());

        let (status, _) = send(&secured_app(), request).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_is_open() {
        let (status, _) = send(&secured_app(), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
    }
}
