use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const SESSION_NAME: &str = "eZSESSID";
pub const CSRF_HEADER: &str = "x-csrf-token";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub name: String,
    pub identifier: String,
    #[serde(rename = "_href")]
    pub href: String,
    #[serde(rename = "csrfToken")]
    pub csrf_token: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionEnvelope {
    #[serde(rename = "Session")]
    pub session: Session,
}

#[derive(Deserialize)]
pub struct SessionInput {
    pub login: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct SessionInputEnvelope {
    #[serde(rename = "SessionInput")]
    pub input: SessionInput,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContentObject {
    pub id: Uuid,
    pub title: String,
    pub owner: String,
}

#[derive(Deserialize)]
pub struct CreateContent {
    pub title: String,
}

/// Live sessions keyed by identifier, with the login that owns each.
#[derive(Default)]
pub struct Store {
    pub users: HashMap<String, String>,
    pub sessions: HashMap<String, (Session, String)>,
    pub content: Vec<ContentObject>,
}

pub type Db = Arc<RwLock<Store>>;

/// Router with the default account `admin` / `publish`.
pub fn app() -> Router {
    app_with_users([("admin", "publish")])
}

pub fn app_with_users<'a>(users: impl IntoIterator<Item = (&'a str, &'a str)>) -> Router {
    let store = Store {
        users: users
            .into_iter()
            .map(|(login, password)| (login.to_string(), password.to_string()))
            .collect(),
        ..Store::default()
    };
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/user/sessions", post(create_session))
        .route("/user/sessions/{id}", delete(delete_session))
        .route("/content/objects", get(list_content).post(create_content))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn create_session(
    State(db): State<Db>,
    Json(input): Json<SessionInputEnvelope>,
) -> Result<(StatusCode, Json<SessionEnvelope>), StatusCode> {
    let mut store = db.write().await;
    let input = input.input;
    if store.users.get(&input.login) != Some(&input.password) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let identifier = Uuid::new_v4().simple().to_string();
    let session = Session {
        name: SESSION_NAME.to_string(),
        href: format!("/user/sessions/{identifier}"),
        identifier: identifier.clone(),
        csrf_token: Uuid::new_v4().simple().to_string(),
    };
    store.sessions.insert(identifier, (session.clone(), input.login));
    Ok((StatusCode::CREATED, Json(SessionEnvelope { session })))
}

async fn delete_session(State(db): State<Db>, Path(id): Path<String>) -> StatusCode {
    let mut store = db.write().await;
    match store.sessions.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

async fn list_content(State(db): State<Db>) -> Json<Vec<ContentObject>> {
    Json(db.read().await.content.clone())
}

async fn create_content(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateContent>,
) -> Result<(StatusCode, Json<ContentObject>), StatusCode> {
    let mut store = db.write().await;
    let token = headers
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let owner = store
        .sessions
        .values()
        .find(|(session, _)| session.csrf_token == token)
        .map(|(_, login)| login.clone())
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let object = ContentObject {
        id: Uuid::new_v4(),
        title: input.title,
        owner,
    };
    store.content.push(object.clone());
    Ok((StatusCode::CREATED, Json(object)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_serializes_with_wire_names() {
        let session = Session {
            name: SESSION_NAME.to_string(),
            identifier: "abc".to_string(),
            href: "/user/sessions/abc".to_string(),
            csrf_token: "tok".to_string(),
        };
        let json = serde_json::to_value(SessionEnvelope { session }).unwrap();
        assert_eq!(json["Session"]["_href"], "/user/sessions/abc");
        assert_eq!(json["Session"]["csrfToken"], "tok");
        assert_eq!(json["Session"]["name"], "eZSESSID");
    }

    #[test]
    fn session_input_requires_password() {
        let result: Result<SessionInputEnvelope, _> =
            serde_json::from_str(r#"{"SessionInput":{"login":"admin"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn session_input_parses_envelope() {
        let input: SessionInputEnvelope =
            serde_json::from_str(r#"{"SessionInput":{"login":"admin","password":"publish"}}"#).unwrap();
        assert_eq!(input.input.login, "admin");
        assert_eq!(input.input.password, "publish");
    }
}
