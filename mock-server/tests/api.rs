use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Contact};
use serde_json::Value;
use tower::ServiceExt;

const KEY: &str = "hapikey=demo";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder().method(method).uri(uri).body(String::new()).unwrap()
}

const ANN: &str = r#"{"properties":[{"property":"email","value":"ann@example.com"},{"property":"firstname","value":"Ann"}]}"#;

// --- auth ---

#[tokio::test]
async fn missing_hapikey_returns_401() {
    let resp = app()
        .oneshot(json_request("POST", "/contacts/v1/contact", ANN))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn empty_hapikey_returns_401() {
    let resp = app()
        .oneshot(empty_request("GET", "/contacts/v1/contact/vid/1/profile?hapikey="))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- contacts ---

#[tokio::test]
async fn create_contact_returns_profile() {
    let resp = app()
        .oneshot(json_request("POST", &format!("/contacts/v1/contact?{KEY}"), ANN))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let contact: Contact = body_json(resp).await;
    assert_eq!(contact.vid, 1);
    assert_eq!(contact.properties["email"]["value"], "ann@example.com");
    assert_eq!(contact.properties["firstname"]["value"], "Ann");
}

#[tokio::test]
async fn create_contact_without_email_returns_400() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            &format!("/contacts/v1/contact?{KEY}"),
            r#"{"properties":[{"property":"firstname","value":"Ann"}]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_contact_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", &format!("/contacts/v1/contact?{KEY}"), r#"{"props":[]}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_contact_not_found() {
    let resp = app()
        .oneshot(empty_request("GET", &format!("/contacts/v1/contact/vid/42/profile?{KEY}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_contact_bad_vid_returns_400() {
    let resp = app()
        .oneshot(empty_request("GET", &format!("/contacts/v1/contact/vid/abc/profile?{KEY}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_contact_not_found() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            &format!("/contacts/v1/contact/vid/42/profile?{KEY}"),
            r#"{"properties":[]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_contact_not_found() {
    let resp = app()
        .oneshot(empty_request("DELETE", &format!("/contacts/v1/contact/vid/42?{KEY}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- forms ---

#[tokio::test]
async fn get_form_bad_guid_returns_400() {
    let resp = app()
        .oneshot(empty_request("GET", &format!("/forms/v2/forms/not-a-uuid?{KEY}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn submit_to_unknown_form_returns_404() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/uploads/form/v2/62515/00000000-0000-0000-0000-000000000000")
                .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body("email=a%40x.com".to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full lifecycles ---

#[tokio::test]
async fn contact_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", &format!("/contacts/v1/contact?{KEY}"), ANN))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Contact = body_json(resp).await;
    let vid = created.vid;

    // duplicate email is rejected
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", &format!("/contacts/v1/contact?{KEY}"), ANN))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // update
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            &format!("/contacts/v1/contact/vid/{vid}/profile?{KEY}"),
            r#"{"properties":[{"property":"firstname","value":"Anne"}]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // get by email sees the update
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request(
            "GET",
            &format!("/contacts/v1/contact/email/ann%40example.com/profile?{KEY}"),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Contact = body_json(resp).await;
    assert_eq!(fetched.vid, vid);
    assert_eq!(fetched.properties["firstname"]["value"], "Anne");

    // create-or-update an existing email
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            &format!("/contacts/v1/contact/createOrUpdate/email/ann%40example.com?{KEY}"),
            r#"{"properties":[{"property":"lastname","value":"Lee"}]}"#,
        ))
        .await
        .unwrap();
    let upserted: Value = body_json(resp).await;
    assert_eq!(upserted["vid"], vid);
    assert_eq!(upserted["isNew"], false);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/contacts/v1/contact/vid/{vid}?{KEY}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let deleted: Value = body_json(resp).await;
    assert_eq!(deleted["deleted"], true);

    // get after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/contacts/v1/contact/vid/{vid}/profile?{KEY}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn form_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", &format!("/forms/v2/forms?{KEY}"), r#"{"name":"Demo form"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let form: Value = body_json(resp).await;
    let guid = form["guid"].as_str().unwrap().to_string();
    assert_eq!(form["name"], "Demo form");
    assert_eq!(form["fields"], serde_json::json!([]));

    // get
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/forms/v2/forms/{guid}?{KEY}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Value = body_json(resp).await;
    assert_eq!(fetched["guid"], guid.as_str());

    // submit, no key needed
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("POST")
                .uri(format!("/uploads/form/v2/62515/{guid}"))
                .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body("email=a%40x.com".to_string())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}
