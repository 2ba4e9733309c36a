//! In-memory stand-in for the slice of the HubSpot API the integration tests
//! drive: contacts, forms and form submissions.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// A stored contact, rendered the way HubSpot renders profiles:
/// `{"vid": 1, "properties": {"email": {"value": "..."}}}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Contact {
    pub vid: i64,
    pub properties: Map<String, Value>,
}

impl Contact {
    fn email(&self) -> Option<&str> {
        self.properties.get("email")?.get("value")?.as_str()
    }

    fn apply(&mut self, updates: Vec<PropertyValue>) {
        for update in updates {
            self.properties
                .insert(update.property, serde_json::json!({ "value": update.value }));
        }
    }
}

/// One `{"property": ..., "value": ...}` record of a request body.
#[derive(Clone, Debug, Deserialize)]
pub struct PropertyValue {
    pub property: String,
    pub value: Value,
}

#[derive(Deserialize)]
pub struct PropertiesBody {
    pub properties: Vec<PropertyValue>,
}

#[derive(Serialize)]
pub struct Upserted {
    pub vid: i64,
    #[serde(rename = "isNew")]
    pub is_new: bool,
}

#[derive(Default)]
pub struct Store {
    next_vid: i64,
    contacts: HashMap<i64, Contact>,
    forms: HashMap<Uuid, Value>,
}

impl Store {
    fn by_email(&self, email: &str) -> Option<&Contact> {
        self.contacts.values().find(|c| c.email() == Some(email))
    }

    fn insert_contact(&mut self, properties: Vec<PropertyValue>) -> Contact {
        self.next_vid += 1;
        let mut contact = Contact {
            vid: self.next_vid,
            properties: Map::new(),
        };
        contact.apply(properties);
        self.contacts.insert(contact.vid, contact.clone());
        contact
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let api = Router::new()
        .route("/contacts/v1/contact", post(create_contact))
        .route(
            "/contacts/v1/contact/vid/{vid}/profile",
            get(get_contact).post(update_contact),
        )
        .route("/contacts/v1/contact/vid/{vid}", delete(delete_contact))
        .route("/contacts/v1/contact/email/{email}/profile", get(get_contact_by_email))
        .route(
            "/contacts/v1/contact/createOrUpdate/email/{email}",
            post(create_or_update_contact),
        )
        .route("/forms/v2/forms", post(create_form))
        .route("/forms/v2/forms/{guid}", get(get_form))
        .layer(middleware::from_fn(require_hapikey));
    // Submissions go to the forms origin, which takes no key.
    Router::new()
        .merge(api)
        .route("/uploads/form/v2/{portal_id}/{guid}", post(submit_form))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// The auth portion of an API query string; other keys are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct AuthQuery {
    pub hapikey: Option<String>,
}

impl AuthQuery {
    fn is_authorized(&self) -> bool {
        self.hapikey.as_deref().is_some_and(|key| !key.is_empty())
    }
}

async fn require_hapikey(
    Query(auth): Query<AuthQuery>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if !auth.is_authorized() {
        tracing::debug!(uri = %request.uri(), "rejecting request without hapikey");
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(next.run(request).await)
}

async fn create_contact(
    State(db): State<Db>,
    Json(input): Json<PropertiesBody>,
) -> Result<Json<Contact>, StatusCode> {
    let email = input
        .properties
        .iter()
        .find(|p| p.property == "email")
        .and_then(|p| p.value.as_str())
        .ok_or(StatusCode::BAD_REQUEST)?
        .to_string();
    let mut store = db.write().await;
    if store.by_email(&email).is_some() {
        return Err(StatusCode::CONFLICT);
    }
    let contact = store.insert_contact(input.properties);
    tracing::info!(vid = contact.vid, "created contact");
    Ok(Json(contact))
}

async fn get_contact(State(db): State<Db>, Path(vid): Path<i64>) -> Result<Json<Contact>, StatusCode> {
    let store = db.read().await;
    store.contacts.get(&vid).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn get_contact_by_email(
    State(db): State<Db>,
    Path(email): Path<String>,
) -> Result<Json<Contact>, StatusCode> {
    let store = db.read().await;
    store.by_email(&email).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_contact(
    State(db): State<Db>,
    Path(vid): Path<i64>,
    Json(input): Json<PropertiesBody>,
) -> StatusCode {
    let mut store = db.write().await;
    match store.contacts.get_mut(&vid) {
        Some(contact) => {
            contact.apply(input.properties);
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn create_or_update_contact(
    State(db): State<Db>,
    Path(email): Path<String>,
    Json(input): Json<PropertiesBody>,
) -> Json<Upserted> {
    let mut store = db.write().await;
    let existing = store.by_email(&email).map(|c| c.vid);
    if let Some(contact) = existing.and_then(|vid| store.contacts.get_mut(&vid)) {
        contact.apply(input.properties);
        return Json(Upserted {
            vid: contact.vid,
            is_new: false,
        });
    }
    let mut properties = input.properties;
    if !properties.iter().any(|p| p.property == "email") {
        properties.push(PropertyValue {
            property: "email".to_string(),
            value: Value::from(email),
        });
    }
    Json(Upserted {
        vid: store.insert_contact(properties).vid,
        is_new: true,
    })
}

async fn delete_contact(State(db): State<Db>, Path(vid): Path<i64>) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    store
        .contacts
        .remove(&vid)
        .map(|_| Json(serde_json::json!({ "vid": vid, "deleted": true, "reason": "OK" })))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn create_form(State(db): State<Db>, Json(input): Json<Value>) -> Result<Json<Value>, StatusCode> {
    let mut form = input.as_object().cloned().ok_or(StatusCode::BAD_REQUEST)?;
    let guid = Uuid::new_v4();
    form.insert("guid".to_string(), Value::from(guid.to_string()));
    form.entry("fields").or_insert_with(|| Value::Array(Vec::new()));
    let form = Value::Object(form);
    db.write().await.forms.insert(guid, form.clone());
    tracing::info!(%guid, "created form");
    Ok(Json(form))
}

async fn get_form(State(db): State<Db>, Path(guid): Path<Uuid>) -> Result<Json<Value>, StatusCode> {
    let store = db.read().await;
    store.forms.get(&guid).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn submit_form(
    State(db): State<Db>,
    Path((_portal_id, guid)): Path<(String, Uuid)>,
) -> StatusCode {
    if db.read().await.forms.contains_key(&guid) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
