use axum::http::{self, Request, StatusCode};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use http_body_util::BodyExt;
use mock_server::app;
use serde_json::Value;
use tower::ServiceExt;

const API_KEY: &str = "test-key";

fn authorization_for(key: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{key}:{key}")))
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header(http::header::AUTHORIZATION, authorization_for(API_KEY))
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, authorization_for(API_KEY))
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

// --- auth gate ---

#[tokio::test]
async fn missing_auth_returns_401() {
    let app = app(API_KEY);
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/v2/contacts")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn wrong_key_returns_401() {
    let app = app(API_KEY);
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/v2/devices")
                .header(http::header::AUTHORIZATION, authorization_for("other-key"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- contacts ---

#[tokio::test]
async fn contacts_start_empty() {
    let app = app(API_KEY);
    let resp = app.oneshot(get_request("/v2/contacts")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["contacts"], serde_json::json!([]));
}

#[tokio::test]
async fn create_contact_mints_iden_and_stamps() {
    let app = app(API_KEY);
    let resp = app
        .oneshot(json_request(
            "POST",
            "/v2/contacts",
            r#"{"name":"Ada","email":"ada@example.com"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let contact = body_json(resp).await;
    assert_eq!(contact["name"], "Ada");
    assert_eq!(contact["email"], "ada@example.com");
    assert!(!contact["iden"].as_str().unwrap().is_empty());
    assert!(contact["created"].as_f64().unwrap() > 0.0);
    assert_eq!(contact["active"], true);
}

#[tokio::test]
async fn update_unknown_contact_returns_404() {
    let app = app(API_KEY);
    let resp = app
        .oneshot(json_request(
            "POST",
            "/v2/contacts/nope",
            r#"{"name":"Nobody"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- devices ---

#[tokio::test]
async fn delete_unknown_device_returns_404() {
    let app = app(API_KEY);
    let resp = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/v2/devices/nope")
                .header(http::header::AUTHORIZATION, authorization_for(API_KEY))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["message"], "Object not found.");
}

// --- user profile ---

#[tokio::test]
async fn me_returns_fixed_profile() {
    let app = app(API_KEY);
    let resp = app.oneshot(get_request("/v2/users/me")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let me = body_json(resp).await;
    assert_eq!(me["email"], "mock@example.com");
    assert_eq!(me["name"], "Mock User");
    assert!(!me["iden"].as_str().unwrap().is_empty());
}

// --- pushes ---

#[tokio::test]
async fn push_create_echoes_params_and_maps_device_iden() {
    let app = app(API_KEY);
    let resp = app
        .oneshot(json_request(
            "POST",
            "/v2/pushes",
            r#"{"type":"note","title":"T","body":"B","device_iden":"d1"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let push = body_json(resp).await;
    assert_eq!(push["type"], "note");
    assert_eq!(push["title"], "T");
    assert_eq!(push["target_device_iden"], "d1");
    assert!(push.get("device_iden").is_none());
    assert_eq!(push["active"], true);
    assert!(!push["iden"].as_str().unwrap().is_empty());
}

// --- full lifecycle ---

#[tokio::test]
async fn api_lifecycle() {
    use tower::Service;

    let mut app = app(API_KEY).into_service();

    // create a contact
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/v2/contacts",
            r#"{"name":"Ada","email":"ada@example.com"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let created = body_json(resp).await;
    let contact_iden = created["iden"].as_str().unwrap().to_string();

    // update its name; email stays
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            &format!("/v2/contacts/{contact_iden}"),
            r#"{"name":"Ada Lovelace"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await;
    assert_eq!(updated["name"], "Ada Lovelace");
    assert_eq!(updated["email"], "ada@example.com");

    // list shows the one contact
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/v2/contacts"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["contacts"].as_array().unwrap().len(), 1);
    assert_eq!(body["contacts"][0]["iden"], contact_iden.as_str());

    // register a device
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/v2/devices",
            r#"{"nickname":"Office Phone","type":"stream"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let device = body_json(resp).await;
    let device_iden = device["iden"].as_str().unwrap().to_string();
    assert_eq!(device["nickname"], "Office Phone");
    assert_eq!(device["type"], "stream");
    assert!(device.get("model").is_none());

    // rename it
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            &format!("/v2/devices/{device_iden}"),
            r#"{"nickname":"Desk Phone"}"#,
        ))
        .await
        .unwrap();
    let renamed = body_json(resp).await;
    assert_eq!(renamed["nickname"], "Desk Phone");

    // submit a push; list preserves insertion order
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/v2/pushes",
            r#"{"type":"note","title":"First","body":"B"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/v2/pushes",
            r#"{"type":"link","title":"Second","url":"https://example.com"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/v2/pushes"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    let pushes = body["pushes"].as_array().unwrap();
    assert_eq!(pushes.len(), 2);
    assert_eq!(pushes[0]["title"], "First");
    assert_eq!(pushes[1]["title"], "Second");

    // delete the contact; 200 with an empty object body
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/v2/contacts/{contact_iden}"))
                .header(http::header::AUTHORIZATION, authorization_for(API_KEY))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await.as_ref(), b"{}");

    // delete again — 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/v2/contacts/{contact_iden}"))
                .header(http::header::AUTHORIZATION, authorization_for(API_KEY))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // contacts list is empty again
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/v2/contacts"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert!(body["contacts"].as_array().unwrap().is_empty());
}
