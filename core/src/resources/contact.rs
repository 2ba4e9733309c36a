//! HubSpot Contacts API.

use serde::Serialize;
use serde_json::{json, Value};

use crate::client::HubSpotClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::params::Params;
use crate::properties::{properties_from_value, to_records, PropertyHash, PropertyRecord, DEFAULT_IDENTITY_KEY};
use crate::resources::members;

pub const CREATE_CONTACT_PATH: &str = "/contacts/v1/contact";
pub const GET_CONTACT_BY_EMAIL_PATH: &str = "/contacts/v1/contact/email/:contact_email/profile";
pub const GET_CONTACTS_BY_EMAIL_PATH: &str = "/contacts/v1/contact/emails/batch";
pub const GET_CONTACT_BY_ID_PATH: &str = "/contacts/v1/contact/vid/:contact_id/profile";
pub const CONTACT_BATCH_PATH: &str = "/contacts/v1/contact/vids/batch";
pub const GET_CONTACT_BY_UTK_PATH: &str = "/contacts/v1/contact/utk/:contact_utk/profile";
pub const GET_CONTACTS_BY_UTK_PATH: &str = "/contacts/v1/contact/utks/batch";
pub const UPDATE_CONTACT_PATH: &str = "/contacts/v1/contact/vid/:contact_id/profile";
pub const DESTROY_CONTACT_PATH: &str = "/contacts/v1/contact/vid/:contact_id";
pub const CONTACTS_PATH: &str = "/contacts/v1/lists/all/contacts/all";
pub const RECENT_CONTACTS_PATH: &str = "/contacts/v1/lists/recently_updated/contacts/recent";
pub const BATCH_CREATE_OR_UPDATE_PATH: &str = "/contacts/v1/contact/batch/";
pub const CREATE_OR_UPDATE_PATH: &str = "/contacts/v1/contact/createOrUpdate/email/:contact_email";

/// A contact as returned by the profile endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub vid: Option<i64>,
    pub properties: PropertyHash,
}

impl Contact {
    pub fn from_value(value: &Value) -> Self {
        Self {
            vid: value.get("vid").and_then(Value::as_i64),
            properties: properties_from_value(value.get("properties")),
        }
    }

    pub fn get(&self, property: &str) -> Option<&Value> {
        self.properties.get(property)
    }

    pub fn email(&self) -> Option<&str> {
        self.get("email").and_then(Value::as_str)
    }

    pub fn utk(&self) -> Option<&str> {
        self.get("usertoken").and_then(Value::as_str)
    }

    /// Merge properties that were just sent in an update.
    pub fn apply_update(&mut self, properties: &PropertyHash) {
        for (k, v) in properties {
            self.properties.insert(k.clone(), v.clone());
        }
    }
}

/// One entry of a batch create-or-update call. Needs a `vid` or an `email`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactUpsert {
    pub vid: Option<i64>,
    pub email: Option<String>,
    pub properties: PropertyHash,
}

#[derive(Serialize)]
struct BatchEntry<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    vid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    properties: Vec<PropertyRecord>,
}

fn properties_body(properties: &PropertyHash) -> Value {
    json!({ "properties": to_records(properties, DEFAULT_IDENTITY_KEY) })
}

impl HubSpotClient {
    /// Create a contact. `email` overrides any `email` in `properties`.
    pub fn build_create_contact(&self, email: &str, properties: &PropertyHash) -> Result<HttpRequest, ApiError> {
        let mut properties = properties.clone();
        properties.insert("email".to_string(), Value::from(email));
        self.build_post_json(CREATE_CONTACT_PATH, &Params::new(), Some(&properties_body(&properties)))
    }

    /// Parse a single contact profile.
    pub fn parse_contact(&self, response: HttpResponse) -> Result<Contact, ApiError> {
        let body: Value = self.parse_json(response)?;
        Ok(Contact::from_value(&body))
    }

    pub fn build_all_contacts(&self, params: &Params) -> Result<HttpRequest, ApiError> {
        self.build_get(CONTACTS_PATH, params)
    }

    /// Recently updated contacts; asks for the `email` property by default.
    pub fn build_recent_contacts(&self, params: &Params) -> Result<HttpRequest, ApiError> {
        let mut params = params.clone();
        params.insert("property", "email");
        self.build_get(RECENT_CONTACTS_PATH, &params)
    }

    /// Parse the `contacts` page returned by the list endpoints.
    pub fn parse_contacts(&self, response: HttpResponse) -> Result<Vec<Contact>, ApiError> {
        let body: Value = self.parse_json(response)?;
        Ok(members(&body, "contacts", Contact::from_value))
    }

    pub fn build_find_contact_by_id(&self, vid: i64) -> Result<HttpRequest, ApiError> {
        self.build_get(GET_CONTACT_BY_ID_PATH, &Params::new().with("contact_id", vid))
    }

    pub fn build_find_contacts_by_ids(&self, vids: &[i64]) -> Result<HttpRequest, ApiError> {
        self.batch_lookup(CONTACT_BATCH_PATH, "batch_vid", vids.to_vec())
    }

    pub fn build_find_contact_by_email(&self, email: &str) -> Result<HttpRequest, ApiError> {
        self.build_get(GET_CONTACT_BY_EMAIL_PATH, &Params::new().with("contact_email", email))
    }

    pub fn build_find_contacts_by_emails(&self, emails: &[&str]) -> Result<HttpRequest, ApiError> {
        self.batch_lookup(GET_CONTACTS_BY_EMAIL_PATH, "batch_email", emails.to_vec())
    }

    pub fn build_find_contact_by_utk(&self, utk: &str) -> Result<HttpRequest, ApiError> {
        self.build_get(GET_CONTACT_BY_UTK_PATH, &Params::new().with("contact_utk", utk))
    }

    pub fn build_find_contacts_by_utks(&self, utks: &[&str]) -> Result<HttpRequest, ApiError> {
        self.batch_lookup(GET_CONTACTS_BY_UTK_PATH, "batch_utk", utks.to_vec())
    }

    /// Parse a batch lookup response: an object keyed by vid.
    pub fn parse_contacts_batch(&self, response: HttpResponse) -> Result<Vec<Contact>, ApiError> {
        let body: Value = self.parse_json(response)?;
        let contacts = body
            .as_object()
            .map(|by_vid| by_vid.values().map(Contact::from_value).collect())
            .unwrap_or_default();
        Ok(contacts)
    }

    pub fn build_update_contact(&self, vid: i64, properties: &PropertyHash) -> Result<HttpRequest, ApiError> {
        let params = Params::new().with("contact_id", vid);
        self.build_post_json(UPDATE_CONTACT_PATH, &params, Some(&properties_body(properties)))
    }

    pub fn build_destroy_contact(&self, vid: i64) -> Result<HttpRequest, ApiError> {
        self.build_delete(DESTROY_CONTACT_PATH, &Params::new().with("contact_id", vid))
    }

    /// Create or update by email. An `email` already present in
    /// `properties` is kept.
    pub fn build_create_or_update_contact_by_email(
        &self,
        email: &str,
        properties: &PropertyHash,
    ) -> Result<HttpRequest, ApiError> {
        let mut properties = properties.clone();
        properties
            .entry("email".to_string())
            .or_insert_with(|| Value::from(email));
        let params = Params::new().with("contact_email", email);
        self.build_post_json(CREATE_OR_UPDATE_PATH, &params, Some(&properties_body(&properties)))
    }

    /// Batch create-or-update. Each entry is addressed by `vid` when present,
    /// otherwise by `email`.
    pub fn build_batch_create_or_update_contacts(&self, contacts: &[ContactUpsert]) -> Result<HttpRequest, ApiError> {
        let entries = contacts
            .iter()
            .map(|contact| {
                let mut properties = contact.properties.clone();
                properties.shift_remove("vid");
                let (vid, email) = match (contact.vid, contact.email.as_deref()) {
                    (Some(vid), _) => (Some(vid), None),
                    (None, Some(email)) => (None, Some(email)),
                    (None, None) => {
                        return Err(ApiError::InvalidParams("expecting vid or email for contact".to_string()))
                    }
                };
                Ok(BatchEntry {
                    vid,
                    email,
                    properties: to_records(&properties, DEFAULT_IDENTITY_KEY),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.build_post_json(BATCH_CREATE_OR_UPDATE_PATH, &Params::new(), Some(&entries))
    }

    fn batch_lookup<T>(&self, path: &str, key: &str, items: Vec<T>) -> Result<HttpRequest, ApiError>
    where
        T: Into<crate::params::Scalar>,
    {
        if items.is_empty() {
            return Err(ApiError::InvalidParams(format!("{key} needs at least one value")));
        }
        self.build_get(path, &Params::new().with(key, items))
    }
}
