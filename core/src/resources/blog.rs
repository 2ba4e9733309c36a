//! HubSpot COS blogs and blog posts.

use chrono::{DateTime, Months, Utc};
use serde_json::{Map, Value};

use crate::client::HubSpotClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::params::{ParamValue, Params, Scalar};
use crate::resources::{members, object};

pub const BLOG_LIST_PATH: &str = "/content/api/v2/blogs";
pub const GET_BLOG_BY_ID_PATH: &str = "/content/api/v2/blogs/:blog_id";
pub const BLOG_POSTS_PATH: &str = "/content/api/v2/blog-posts";
pub const GET_BLOG_POST_BY_ID_PATH: &str = "/content/api/v2/blog-posts/:blog_post_id";

/// Post states accepted by the posts filter. `false` disables the filter.
const POST_STATES: [&str; 2] = ["PUBLISHED", "DRAFT"];

#[derive(Debug, Clone, PartialEq)]
pub struct Blog {
    pub properties: Map<String, Value>,
}

impl Blog {
    pub fn from_value(value: &Value) -> Self {
        Self { properties: object(value) }
    }

    pub fn id(&self) -> Option<i64> {
        self.properties.get("id").and_then(Value::as_i64)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlogPost {
    pub properties: Map<String, Value>,
}

impl BlogPost {
    pub fn from_value(value: &Value) -> Self {
        Self { properties: object(value) }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.get("created")
            .and_then(Value::as_i64)
            .and_then(DateTime::from_timestamp_millis)
    }

    /// Ids of the topics attached to the post. Fetch each with
    /// `build_find_topic`.
    pub fn topic_ids(&self) -> Vec<i64> {
        crate::resources::i64_list(self.get("topic_ids"))
    }
}

fn check_state(params: &Params) -> Result<(), ApiError> {
    match params.get("state") {
        None | Some(ParamValue::Scalar(Scalar::Bool(false))) => Ok(()),
        Some(ParamValue::Scalar(Scalar::Str(state))) if POST_STATES.contains(&state.as_str()) => Ok(()),
        Some(other) => Err(ApiError::InvalidParams(format!("state parameter was invalid: {other:?}"))),
    }
}

impl HubSpotClient {
    pub fn build_list_blogs(&self, params: &Params) -> Result<HttpRequest, ApiError> {
        self.build_get(BLOG_LIST_PATH, params)
    }

    pub fn parse_blogs(&self, response: HttpResponse) -> Result<Vec<Blog>, ApiError> {
        let body: Value = self.parse_json(response)?;
        Ok(members(&body, "objects", Blog::from_value))
    }

    pub fn build_find_blog(&self, blog_id: i64, params: &Params) -> Result<HttpRequest, ApiError> {
        self.build_get(GET_BLOG_BY_ID_PATH, &params.clone().with("blog_id", blog_id))
    }

    pub fn parse_blog(&self, response: HttpResponse) -> Result<Blog, ApiError> {
        let body: Value = self.parse_json(response)?;
        Ok(Blog::from_value(&body))
    }

    /// Posts of `blog`, newest first. Defaults to published posts created in
    /// the two months before `now`; any default can be overridden and a
    /// `false` value drops that filter entirely.
    pub fn build_blog_posts(&self, blog: &Blog, params: &Params, now: DateTime<Utc>) -> Result<HttpRequest, ApiError> {
        let blog_id = blog
            .id()
            .ok_or_else(|| ApiError::InvalidParams("blog has no id".to_string()))?;
        let mut params = params.clone();
        params.insert_default("content_group_id", blog_id);
        params.insert_default("order_by", "-created");
        if let Some(since) = now.checked_sub_months(Months::new(2)) {
            params.insert_default("created__gt", since);
        }
        params.insert_default("state", "PUBLISHED");
        check_state(&params)?;
        params.drop_disabled();
        self.build_get(BLOG_POSTS_PATH, &params)
    }

    pub fn parse_blog_posts(&self, response: HttpResponse) -> Result<Vec<BlogPost>, ApiError> {
        let body: Value = self.parse_json(response)?;
        Ok(members(&body, "objects", BlogPost::from_value))
    }

    pub fn build_find_blog_post(&self, blog_post_id: i64, params: &Params) -> Result<HttpRequest, ApiError> {
        self.build_get(GET_BLOG_POST_BY_ID_PATH, &params.clone().with("blog_post_id", blog_post_id))
    }

    pub fn parse_blog_post(&self, response: HttpResponse) -> Result<BlogPost, ApiError> {
        let body: Value = self.parse_json(response)?;
        Ok(BlogPost::from_value(&body))
    }
}
