//! HubSpot Engagements API.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::client::HubSpotClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::params::Params;

pub const ALL_ENGAGEMENTS_PATH: &str = "/engagements/v1/engagements/paged";
pub const RECENT_ENGAGEMENTS_PATH: &str = "/engagements/v1/engagements/recent/modified";

/// Engagement metadata. Timestamps arrive as epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Engagement {
    pub id: i64,
    pub portal_id: i64,
    #[serde(default)]
    pub active: bool,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_updated: DateTime<Utc>,
    pub created_by: Option<i64>,
    pub modified_by: Option<i64>,
    pub owner_id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Deserialize)]
struct EngagementEnvelope {
    engagement: Engagement,
}

/// One page of engagements.
#[derive(Debug, Clone, PartialEq)]
pub struct EngagementPage {
    pub results: Vec<Engagement>,
    pub has_more: bool,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPage {
    #[serde(default)]
    results: Vec<EngagementEnvelope>,
    #[serde(default)]
    has_more: bool,
    offset: Option<i64>,
}

impl HubSpotClient {
    pub fn build_all_engagements(&self, params: &Params) -> Result<HttpRequest, ApiError> {
        self.build_get(ALL_ENGAGEMENTS_PATH, params)
    }

    /// Recently modified engagements; `since` filters on modification time.
    pub fn build_recent_engagements(&self, params: &Params) -> Result<HttpRequest, ApiError> {
        self.build_get(RECENT_ENGAGEMENTS_PATH, params)
    }

    pub fn parse_engagements(&self, response: HttpResponse) -> Result<EngagementPage, ApiError> {
        let page: RawPage = self.parse_json(response)?;
        Ok(EngagementPage {
            results: page.results.into_iter().map(|e| e.engagement).collect(),
            has_more: page.has_more,
            offset: page.offset,
        })
    }
}
