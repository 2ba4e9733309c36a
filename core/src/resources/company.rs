//! HubSpot Companies API.

use serde_json::{json, Value};

use crate::client::HubSpotClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::params::Params;
use crate::properties::{properties_from_value, to_records, PropertyHash};
use crate::resources::{elements, members};

pub const CREATE_COMPANY_PATH: &str = "/companies/v2/companies/";
pub const ALL_COMPANIES_PATH: &str = "/companies/v2/companies/paged";
pub const RECENTLY_CREATED_COMPANIES_PATH: &str = "/companies/v2/companies/recent/created";
pub const RECENTLY_MODIFIED_COMPANIES_PATH: &str = "/companies/v2/companies/recent/modified";
pub const GET_COMPANY_BY_ID_PATH: &str = "/companies/v2/companies/:company_id";
pub const GET_COMPANY_BY_DOMAIN_PATH: &str = "/companies/v2/companies/domain/:domain";
pub const UPDATE_COMPANY_PATH: &str = "/companies/v2/companies/:company_id";
pub const ADD_CONTACT_TO_COMPANY_PATH: &str = "/companies/v2/companies/:company_id/contacts/:vid";
pub const DESTROY_COMPANY_PATH: &str = "/companies/v2/companies/:company_id";

/// Companies key their property records on `name`.
const IDENTITY_KEY: &str = "name";

#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    pub company_id: Option<i64>,
    pub name: Option<String>,
    pub properties: PropertyHash,
}

impl Company {
    pub fn from_value(value: &Value) -> Self {
        let properties = properties_from_value(value.get("properties"));
        Self {
            company_id: value.get("companyId").and_then(Value::as_i64),
            name: properties.get("name").and_then(Value::as_str).map(str::to_string),
            properties,
        }
    }

    pub fn get(&self, property: &str) -> Option<&Value> {
        self.properties.get(property)
    }

    pub fn apply_update(&mut self, properties: &PropertyHash) {
        for (k, v) in properties {
            self.properties.insert(k.clone(), v.clone());
        }
        if let Some(name) = properties.get("name").and_then(Value::as_str) {
            self.name = Some(name.to_string());
        }
    }
}

fn properties_body(properties: &PropertyHash) -> Value {
    json!({ "properties": to_records(properties, IDENTITY_KEY) })
}

impl HubSpotClient {
    /// Paged listing; pass `count` and `offset` for pagination.
    pub fn build_all_companies(&self, params: &Params) -> Result<HttpRequest, ApiError> {
        self.build_get(ALL_COMPANIES_PATH, params)
    }

    pub fn parse_all_companies(&self, response: HttpResponse) -> Result<Vec<Company>, ApiError> {
        let body: Value = self.parse_json(response)?;
        Ok(members(&body, "companies", Company::from_value))
    }

    /// Recently created companies, or recently modified ones when
    /// `recently_updated` is set.
    pub fn build_recent_companies(&self, params: &Params, recently_updated: bool) -> Result<HttpRequest, ApiError> {
        let path = if recently_updated {
            RECENTLY_MODIFIED_COMPANIES_PATH
        } else {
            RECENTLY_CREATED_COMPANIES_PATH
        };
        self.build_get(path, params)
    }

    pub fn parse_recent_companies(&self, response: HttpResponse) -> Result<Vec<Company>, ApiError> {
        let body: Value = self.parse_json(response)?;
        Ok(members(&body, "results", Company::from_value))
    }

    pub fn build_find_company_by_id(&self, company_id: i64, params: &Params) -> Result<HttpRequest, ApiError> {
        let params = params.clone().with("company_id", company_id);
        self.build_get(GET_COMPANY_BY_ID_PATH, &params)
    }

    pub fn parse_company(&self, response: HttpResponse) -> Result<Company, ApiError> {
        let body: Value = self.parse_json(response)?;
        Ok(Company::from_value(&body))
    }

    pub fn build_find_companies_by_domain(&self, domain: &str, params: &Params) -> Result<HttpRequest, ApiError> {
        if domain.is_empty() {
            return Err(ApiError::InvalidParams("expecting a non-empty domain".to_string()));
        }
        let params = params.clone().with("domain", domain);
        self.build_get(GET_COMPANY_BY_DOMAIN_PATH, &params)
    }

    /// A 404 means no company uses the domain and yields an empty list.
    pub fn parse_companies_by_domain(&self, response: HttpResponse) -> Result<Vec<Company>, ApiError> {
        match self.parse_json::<Value>(response) {
            Ok(body) => Ok(elements(&body, Company::from_value)),
            Err(ApiError::NotFound) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Create a company. `name` overrides any `name` in `properties`.
    pub fn build_create_company(&self, name: &str, properties: &PropertyHash) -> Result<HttpRequest, ApiError> {
        let mut properties = properties.clone();
        properties.insert("name".to_string(), Value::from(name));
        self.build_post_json(CREATE_COMPANY_PATH, &Params::new(), Some(&properties_body(&properties)))
    }

    pub fn build_update_company(&self, company_id: i64, properties: &PropertyHash) -> Result<HttpRequest, ApiError> {
        let params = Params::new().with("company_id", company_id);
        self.build_put_json(UPDATE_COMPANY_PATH, &params, Some(&properties_body(properties)))
    }

    pub fn build_add_contact_to_company(&self, company_id: i64, vid: i64) -> Result<HttpRequest, ApiError> {
        let params = Params::new().with("company_id", company_id).with("vid", vid);
        self.build_put_json::<Value>(ADD_CONTACT_TO_COMPANY_PATH, &params, None)
    }

    pub fn build_destroy_company(&self, company_id: i64) -> Result<HttpRequest, ApiError> {
        self.build_delete(DESTROY_COMPANY_PATH, &Params::new().with("company_id", company_id))
    }
}
