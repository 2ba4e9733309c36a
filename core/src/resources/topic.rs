//! Blog topics.

use serde_json::{Map, Value};

use crate::client::HubSpotClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::params::Params;
use crate::resources::{members, object};

pub const TOPICS_PATH: &str = "/blogs/v3/topics";
pub const TOPIC_PATH: &str = "/blogs/v3/topics/:topic_id";

#[derive(Debug, Clone, PartialEq)]
pub struct Topic {
    pub properties: Map<String, Value>,
}

impl Topic {
    pub fn from_value(value: &Value) -> Self {
        Self { properties: object(value) }
    }

    pub fn id(&self) -> Option<i64> {
        self.properties.get("id").and_then(Value::as_i64)
    }

    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").and_then(Value::as_str)
    }
}

impl HubSpotClient {
    pub fn build_list_topics(&self, params: &Params) -> Result<HttpRequest, ApiError> {
        self.build_get(TOPICS_PATH, params)
    }

    pub fn parse_topics(&self, response: HttpResponse) -> Result<Vec<Topic>, ApiError> {
        let body: Value = self.parse_json(response)?;
        Ok(members(&body, "objects", Topic::from_value))
    }

    pub fn build_find_topic(&self, topic_id: i64, params: &Params) -> Result<HttpRequest, ApiError> {
        self.build_get(TOPIC_PATH, &params.clone().with("topic_id", topic_id))
    }

    pub fn parse_topic(&self, response: HttpResponse) -> Result<Topic, ApiError> {
        let body: Value = self.parse_json(response)?;
        Ok(Topic::from_value(&body))
    }
}
