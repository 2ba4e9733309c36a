//! Contact lists, looked up in batches.

use serde_json::{Map, Value};

use crate::client::HubSpotClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::params::Params;
use crate::resources::{members, object};

pub const LIST_BATCH_PATH: &str = "/contacts/v1/lists/batch";

#[derive(Debug, Clone, PartialEq)]
pub struct ContactList {
    pub list_id: Option<i64>,
    pub properties: Map<String, Value>,
}

impl ContactList {
    pub fn from_value(value: &Value) -> Self {
        Self {
            list_id: value.get("listId").and_then(Value::as_i64),
            properties: object(value),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").and_then(Value::as_str)
    }
}

impl HubSpotClient {
    /// Fetch several lists at once; ids go out as repeated `listId` keys.
    pub fn build_find_contact_lists(&self, list_ids: &[i64]) -> Result<HttpRequest, ApiError> {
        if list_ids.is_empty() {
            return Err(ApiError::InvalidParams("no list ids given".to_string()));
        }
        let params = Params::new().with("batch_list_id", list_ids.to_vec());
        self.build_get(LIST_BATCH_PATH, &params)
    }

    pub fn parse_contact_lists(&self, response: HttpResponse) -> Result<Vec<ContactList>, ApiError> {
        let body: Value = self.parse_json(response)?;
        Ok(members(&body, "lists", ContactList::from_value))
    }
}
