//! HubSpot Deals API.

use serde_json::{json, Value};

use crate::client::HubSpotClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::params::Params;
use crate::properties::{properties_from_value, to_records, PropertyHash};
use crate::resources::{i64_list, members};

pub const CREATE_DEAL_PATH: &str = "/deals/v1/deal";
pub const DEAL_PATH: &str = "/deals/v1/deal/:deal_id";
pub const RECENT_UPDATED_PATH: &str = "/deals/v1/deal/recent/modified";

const IDENTITY_KEY: &str = "name";

#[derive(Debug, Clone, PartialEq)]
pub struct Deal {
    pub deal_id: Option<i64>,
    pub portal_id: Option<i64>,
    pub company_ids: Vec<i64>,
    pub vids: Vec<i64>,
    pub properties: PropertyHash,
}

impl Deal {
    pub fn from_value(value: &Value) -> Self {
        let associations = value.get("associations");
        Self {
            deal_id: value.get("dealId").and_then(Value::as_i64),
            portal_id: value.get("portalId").and_then(Value::as_i64),
            company_ids: i64_list(associations.and_then(|a| a.get("associatedCompanyIds"))),
            vids: i64_list(associations.and_then(|a| a.get("associatedVids"))),
            properties: properties_from_value(value.get("properties")),
        }
    }

    pub fn get(&self, property: &str) -> Option<&Value> {
        self.properties.get(property)
    }

    pub fn apply_update(&mut self, properties: &PropertyHash) {
        for (k, v) in properties {
            self.properties.insert(k.clone(), v.clone());
        }
    }
}

impl HubSpotClient {
    pub fn build_create_deal(
        &self,
        portal_id: i64,
        company_ids: &[i64],
        vids: &[i64],
        properties: &PropertyHash,
    ) -> Result<HttpRequest, ApiError> {
        let body = json!({
            "portalId": portal_id,
            "associations": {
                "associatedCompanyIds": company_ids,
                "associatedVids": vids,
            },
            "properties": to_records(properties, IDENTITY_KEY),
        });
        self.build_post_json(CREATE_DEAL_PATH, &Params::new(), Some(&body))
    }

    pub fn build_find_deal(&self, deal_id: i64) -> Result<HttpRequest, ApiError> {
        self.build_get(DEAL_PATH, &Params::new().with("deal_id", deal_id))
    }

    pub fn parse_deal(&self, response: HttpResponse) -> Result<Deal, ApiError> {
        let body: Value = self.parse_json(response)?;
        Ok(Deal::from_value(&body))
    }

    /// Recently modified deals; `count` and `offset` paginate.
    pub fn build_recent_deals(&self, params: &Params) -> Result<HttpRequest, ApiError> {
        self.build_get(RECENT_UPDATED_PATH, params)
    }

    pub fn parse_recent_deals(&self, response: HttpResponse) -> Result<Vec<Deal>, ApiError> {
        let body: Value = self.parse_json(response)?;
        Ok(members(&body, "results", Deal::from_value))
    }

    pub fn build_update_deal(&self, deal_id: i64, properties: &PropertyHash) -> Result<HttpRequest, ApiError> {
        let body = json!({ "properties": to_records(properties, IDENTITY_KEY) });
        self.build_put_json(DEAL_PATH, &Params::new().with("deal_id", deal_id), Some(&body))
    }

    pub fn build_destroy_deal(&self, deal_id: i64) -> Result<HttpRequest, ApiError> {
        self.build_delete(DEAL_PATH, &Params::new().with("deal_id", deal_id))
    }
}
