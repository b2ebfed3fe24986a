use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, ContentObject, SessionEnvelope};
use tower::ServiceExt;

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

fn login_request(login: &str, password: &str) -> Request<String> {
    json_request(
        "POST",
        "/user/sessions",
        &format!(r#"{{"SessionInput":{{"login":"{login}","password":"{password}"}}}}"#),
    )
}

async fn login(app: &Router) -> SessionEnvelope {
    let resp = app.clone().oneshot(login_request("admin", "publish")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

// --- sessions ---

#[tokio::test]
async fn create_session_returns_201_with_token() {
    let app = app();
    let envelope = login(&app).await;
    let session = envelope.session;
    assert_eq!(session.name, "eZSESSID");
    assert_eq!(session.href, format!("/user/sessions/{}", session.identifier));
    assert!(!session.csrf_token.is_empty());
}

#[tokio::test]
async fn create_session_bad_password_returns_401() {
    let resp = app().oneshot(login_request("admin", "wrong")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_session_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/user/sessions", r#"{"SessionInput":{}}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn sessions_are_unique_per_login() {
    let app = app();
    let first = login(&app).await.session;
    let second = login(&app).await.session;
    assert_ne!(first.identifier, second.identifier);
    assert_ne!(first.csrf_token, second.csrf_token);
}

#[tokio::test]
async fn delete_session_returns_204_then_404() {
    let app = app();
    let session = login(&app).await.session;

    let delete = || {
        Request::builder()
            .method("DELETE")
            .uri(session.href.as_str())
            .body(String::new())
            .unwrap()
    };

    let resp = app.clone().oneshot(delete()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    let resp = app.oneshot(delete()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- content ---

#[tokio::test]
async fn list_content_is_public() {
    let resp = app()
        .oneshot(Request::builder().uri("/content/objects").body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let objects: Vec<ContentObject> = body_json(resp).await;
    assert!(objects.is_empty());
}

#[tokio::test]
async fn create_content_without_token_returns_401() {
    let resp = app()
        .oneshot(json_request("POST", "/content/objects", r#"{"title":"Home"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_content_with_unknown_token_returns_401() {
    let mut req = json_request("POST", "/content/objects", r#"{"title":"Home"}"#);
    req.headers_mut().insert(mock_server::CSRF_HEADER, "forged".parse().unwrap());
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_content_with_session_token() {
    let app = app();
    let session = login(&app).await.session;

    let mut req = json_request("POST", "/content/objects", r#"{"title":"Home"}"#);
    req.headers_mut().insert(mock_server::CSRF_HEADER, session.csrf_token.parse().unwrap());
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: ContentObject = body_json(resp).await;
    assert_eq!(created.title, "Home");
    assert_eq!(created.owner, "admin");

    let resp = app
        .oneshot(Request::builder().uri("/content/objects").body(String::new()).unwrap())
        .await
        .unwrap();
    let objects: Vec<ContentObject> = body_json(resp).await;
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].id, created.id);
}

#[tokio::test]
async fn token_is_rejected_after_logout() {
    let app = app();
    let session = login(&app).await.session;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(session.href.as_str())
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let mut req = json_request("POST", "/content/objects", r#"{"title":"Late"}"#);
    req.headers_mut().insert(mock_server::CSRF_HEADER, session.csrf_token.parse().unwrap());
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
