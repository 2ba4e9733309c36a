//! Contact and company property definitions.
//!
//! Both resources expose the same CRUD surface under different roots, so a
//! single set of builders is parameterized by [`SchemaKind`].

use serde_json::{Map, Value};

use crate::client::HubSpotClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::params::Params;
use crate::resources::{elements, object};

pub const CONTACT_PROPERTIES_PATH: &str = "/contacts/v2/properties/";
pub const CONTACT_PROPERTY_BY_NAME_PATH: &str = "/contacts/v2/properties/named/:property_name";
pub const COMPANY_PROPERTIES_PATH: &str = "/companies/v2/properties/";
pub const COMPANY_PROPERTY_BY_NAME_PATH: &str = "/companies/v2/properties/named/:property_name";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Contact,
    Company,
}

impl SchemaKind {
    fn collection_path(self) -> &'static str {
        match self {
            SchemaKind::Contact => CONTACT_PROPERTIES_PATH,
            SchemaKind::Company => COMPANY_PROPERTIES_PATH,
        }
    }

    fn named_path(self) -> &'static str {
        match self {
            SchemaKind::Contact => CONTACT_PROPERTY_BY_NAME_PATH,
            SchemaKind::Company => COMPANY_PROPERTY_BY_NAME_PATH,
        }
    }
}

/// A property definition, kept as the raw JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySchema {
    pub name: Option<String>,
    pub properties: Map<String, Value>,
}

impl PropertySchema {
    pub fn from_value(value: &Value) -> Self {
        Self {
            name: value.get("name").and_then(Value::as_str).map(str::to_string),
            properties: object(value),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

/// HubSpot group names are lower-case with underscores.
pub fn format_group_name(group_name: &str) -> String {
    group_name.to_lowercase().replace(' ', "_")
}

fn named(name: &str) -> Params {
    Params::new().with("property_name", name)
}

impl HubSpotClient {
    pub fn build_all_property_schemas(&self, kind: SchemaKind, params: &Params) -> Result<HttpRequest, ApiError> {
        self.build_get(kind.collection_path(), params)
    }

    pub fn parse_property_schemas(&self, response: HttpResponse) -> Result<Vec<PropertySchema>, ApiError> {
        let body: Value = self.parse_json(response)?;
        Ok(elements(&body, PropertySchema::from_value))
    }

    pub fn build_find_property_schema(&self, kind: SchemaKind, name: &str) -> Result<HttpRequest, ApiError> {
        self.build_get(kind.named_path(), &named(name))
    }

    pub fn parse_property_schema(&self, response: HttpResponse) -> Result<PropertySchema, ApiError> {
        let body: Value = self.parse_json(response)?;
        Ok(PropertySchema::from_value(&body))
    }

    /// Create a property in `group_name`; the group name is normalized.
    pub fn build_create_property_schema(
        &self,
        kind: SchemaKind,
        group_name: &str,
        definition: &Map<String, Value>,
    ) -> Result<HttpRequest, ApiError> {
        let mut body = definition.clone();
        body.insert("groupName".to_string(), Value::from(format_group_name(group_name)));
        self.build_post_json(kind.collection_path(), &Params::new(), Some(&body))
    }

    /// Update property `name`. A `groupName` in `definition` is normalized.
    pub fn build_update_property_schema(
        &self,
        kind: SchemaKind,
        name: &str,
        definition: &Map<String, Value>,
    ) -> Result<HttpRequest, ApiError> {
        let mut body = definition.clone();
        let group = body.get("groupName").and_then(Value::as_str).map(format_group_name);
        if let Some(group) = group {
            body.insert("groupName".to_string(), Value::from(group));
        }
        self.build_put_json(kind.named_path(), &named(name), Some(&body))
    }

    pub fn build_delete_property_schema(&self, kind: SchemaKind, name: &str) -> Result<HttpRequest, ApiError> {
        self.build_delete(kind.named_path(), &named(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::http::HttpMethod;
    use serde_json::json;

    fn client() -> HubSpotClient {
        HubSpotClient::new(Config::new("demo"))
    }

    fn definition(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn group_names_are_normalized() {
        assert_eq!(format_group_name("Contact Information"), "contact_information");
        assert_eq!(format_group_name("ok"), "ok");
    }

    #[test]
    fn create_posts_to_collection_with_group() {
        let req = client()
            .build_create_property_schema(
                SchemaKind::Company,
                "Company Info",
                &definition(json!({"name": "size", "type": "string"})),
            )
            .unwrap();
        assert_eq!(req.url, "https://api.hubapi.com/companies/v2/properties/?hapikey=demo");
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"name": "size", "type": "string", "groupName": "company_info"}));
    }

    #[test]
    fn update_and_delete_use_named_path() {
        let c = client();
        let req = c
            .build_update_property_schema(
                SchemaKind::Contact,
                "my property",
                &definition(json!({"groupName": "Contact Information"})),
            )
            .unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(
            req.url,
            "https://api.hubapi.com/contacts/v2/properties/named/my%20property?hapikey=demo"
        );
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["groupName"], "contact_information");

        let req = c.build_delete_property_schema(SchemaKind::Contact, "email").unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "https://api.hubapi.com/contacts/v2/properties/named/email?hapikey=demo");
    }

    #[test]
    fn parse_schemas() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"[{"name": "email", "groupName": "contactinformation"}, {"label": "nameless"}]"#.to_string(),
        };
        let schemas = client().parse_property_schemas(response).unwrap();
        assert_eq!(schemas[0].name.as_deref(), Some("email"));
        assert_eq!(schemas[1].name, None);
        assert_eq!(schemas[1].get("label"), Some(&json!("nameless")));
    }
}
