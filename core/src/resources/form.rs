//! HubSpot Forms API.

use serde_json::{Map, Value};

use crate::client::HubSpotClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::params::Params;
use crate::resources::{elements, object};

pub const FORMS_PATH: &str = "/forms/v2/forms";
pub const FORM_PATH: &str = "/forms/v2/forms/:form_guid";
pub const FIELDS_PATH: &str = "/forms/v2/fields/:form_guid";
pub const FIELD_PATH: &str = "/forms/v2/fields/:form_guid/:field_name";
pub const SUBMIT_DATA_PATH: &str = "/uploads/form/v2/:portal_id/:form_guid";

#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub guid: Option<String>,
    pub fields: Vec<Value>,
    pub properties: Map<String, Value>,
}

impl Form {
    pub fn from_value(value: &Value) -> Self {
        Self {
            guid: value.get("guid").and_then(Value::as_str).map(str::to_string),
            fields: value.get("fields").and_then(Value::as_array).cloned().unwrap_or_default(),
            properties: object(value),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").and_then(Value::as_str)
    }

    /// Look a field up in the fields already loaded with the form.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|f| f.get("name").and_then(Value::as_str) == Some(name))
    }

    /// Path params addressing this form. A form without a guid leaves
    /// `form_guid` unfilled, so building fails with `MissingInterpolation`.
    fn params(&self) -> Params {
        let mut params = Params::new();
        if let Some(guid) = &self.guid {
            params.insert("form_guid", guid);
        }
        params
    }
}

impl HubSpotClient {
    pub fn build_create_form(&self, body: &Value) -> Result<HttpRequest, ApiError> {
        self.build_post_json(FORMS_PATH, &Params::new(), Some(body))
    }

    pub fn build_all_forms(&self, params: &Params) -> Result<HttpRequest, ApiError> {
        self.build_get(FORMS_PATH, params)
    }

    pub fn parse_forms(&self, response: HttpResponse) -> Result<Vec<Form>, ApiError> {
        let body: Value = self.parse_json(response)?;
        Ok(elements(&body, Form::from_value))
    }

    pub fn build_find_form(&self, guid: &str, params: &Params) -> Result<HttpRequest, ApiError> {
        self.build_get(FORM_PATH, &params.clone().with("form_guid", guid))
    }

    pub fn parse_form(&self, response: HttpResponse) -> Result<Form, ApiError> {
        let body: Value = self.parse_json(response)?;
        Ok(Form::from_value(&body))
    }

    /// Update the existing form named like `body["name"]`, or create one.
    pub fn build_create_or_update_form(&self, existing: &[Form], body: &Value) -> Result<HttpRequest, ApiError> {
        let name = body.get("name").and_then(Value::as_str);
        match existing.iter().find(|f| name.is_some() && f.name() == name) {
            Some(form) => self.build_update_form(form, body),
            None => self.build_create_form(body),
        }
    }

    pub fn build_form_fields(&self, form: &Form) -> Result<HttpRequest, ApiError> {
        self.build_get(FIELDS_PATH, &form.params())
    }

    pub fn parse_form_fields(&self, response: HttpResponse) -> Result<Vec<Value>, ApiError> {
        let body: Value = self.parse_json(response)?;
        Ok(elements(&body, Value::clone))
    }

    pub fn build_form_field(&self, form: &Form, field_name: &str) -> Result<HttpRequest, ApiError> {
        self.build_get(FIELD_PATH, &form.params().with("field_name", field_name))
    }

    pub fn parse_form_field(&self, response: HttpResponse) -> Result<Value, ApiError> {
        self.parse_json(response)
    }

    /// Forms are updated with `POST`. Parse the reply with `parse_form`.
    pub fn build_update_form(&self, form: &Form, body: &Value) -> Result<HttpRequest, ApiError> {
        self.build_post_json(FORM_PATH, &form.params(), Some(body))
    }

    pub fn build_destroy_form(&self, form: &Form) -> Result<HttpRequest, ApiError> {
        self.build_delete(FORM_PATH, &form.params())
    }

    /// A form counts as destroyed only on `204 No Content`.
    pub fn parse_destroy_form(&self, response: HttpResponse) -> Result<bool, ApiError> {
        let destroyed = response.status == 204;
        self.parse_empty(response)?;
        Ok(destroyed)
    }

    /// Submit field values. Check the reply with `parse_submit`.
    pub fn build_submit_form(&self, form: &Form, fields: &[(String, String)]) -> Result<HttpRequest, ApiError> {
        self.build_form_submit(SUBMIT_DATA_PATH, &form.params(), fields)
    }
}
