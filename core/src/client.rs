//! Stateless HTTP request builder and response parser for the HubSpot API.
//!
//! # Design
//! `HubSpotClient` holds only a `Config` and carries no mutable state between
//! calls. Every operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`. The
//! caller executes the round trip in between, keeping the core
//! deterministic and free of I/O.
//!
//! This module holds the verb-level building blocks. Per-resource operations
//! live in `crate::resources` as further `impl HubSpotClient` blocks.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::Params;
use crate::url::{build_url, UrlOptions};

/// Origin of the event tracking endpoint.
pub const TRACK_BASE_URL: &str = "http://track.hubspot.com";
/// Origin of the form submission endpoint.
pub const FORMS_BASE_URL: &str = "https://forms.hubspot.com";
/// Statuses the form submission endpoint answers with on success.
pub const FORM_SUBMIT_ACCEPTED: [u16; 3] = [200, 204, 302];

const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const FORM_FIELD: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'*');

/// Synchronous, stateless client for the HubSpot API.
#[derive(Debug, Clone, Default)]
pub struct HubSpotClient {
    config: Config,
}

impl HubSpotClient {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the configuration. Subsequent builds observe the new value.
    pub fn configure(&mut self, config: Config) {
        self.config = config;
    }

    /// Return to the unconfigured state; every build fails until reconfigured.
    pub fn reset_config(&mut self) {
        self.config.reset();
    }

    /// Render a URL against this client's configuration.
    pub fn url(&self, template: &str, params: &Params, options: &UrlOptions) -> Result<String, ApiError> {
        Ok(build_url(template, params, &self.config, options)?)
    }

    pub fn build_get(&self, template: &str, params: &Params) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Get, template, params, None)
    }

    pub fn build_delete(&self, template: &str, params: &Params) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Delete, template, params, None)
    }

    /// `POST` with a JSON body. `None` sends no payload.
    pub fn build_post_json<B: Serialize + ?Sized>(
        &self,
        template: &str,
        params: &Params,
        body: Option<&B>,
    ) -> Result<HttpRequest, ApiError> {
        let body = body.map(to_json).transpose()?;
        self.request(HttpMethod::Post, template, params, body)
    }

    /// `PUT` with a JSON body. `None` sends no payload.
    pub fn build_put_json<B: Serialize + ?Sized>(
        &self,
        template: &str,
        params: &Params,
        body: Option<&B>,
    ) -> Result<HttpRequest, ApiError> {
        let body = body.map(to_json).transpose()?;
        self.request(HttpMethod::Put, template, params, body)
    }

    /// `GET` against the tracking origin: no auth key, portal id as `_a`.
    pub fn build_track(&self, template: &str, params: &Params) -> Result<HttpRequest, ApiError> {
        let options = UrlOptions::default()
            .with_base_url(TRACK_BASE_URL)
            .without_hapikey()
            .with_portal_id_param();
        let url = self.url(template, params, &options)?;
        tracing::debug!(method = %HttpMethod::Get, template, "built tracking request");
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: Vec::new(),
            body: None,
        })
    }

    /// Form-encoded `POST` against the forms origin, without the auth key.
    pub fn build_form_submit(
        &self,
        template: &str,
        params: &Params,
        fields: &[(String, String)],
    ) -> Result<HttpRequest, ApiError> {
        let options = UrlOptions::default().with_base_url(FORMS_BASE_URL).without_hapikey();
        let url = self.url(template, params, &options)?;
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", form_encode(k), form_encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        tracing::debug!(method = %HttpMethod::Post, template, fields = fields.len(), "built form submission");
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url,
            headers: vec![("content-type".to_string(), FORM_CONTENT_TYPE.to_string())],
            body: Some(body),
        })
    }

    /// Check for a 2xx status and deserialize the body.
    pub fn parse_json<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// Check for a 2xx status and ignore the body.
    pub fn parse_empty(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    /// Whether a form submission was accepted.
    pub fn parse_submit(&self, response: HttpResponse) -> bool {
        let accepted = FORM_SUBMIT_ACCEPTED.contains(&response.status);
        tracing::debug!(status = response.status, accepted, "form submission response");
        accepted
    }

    fn request(
        &self,
        method: HttpMethod,
        template: &str,
        params: &Params,
        body: Option<String>,
    ) -> Result<HttpRequest, ApiError> {
        let url = self.url(template, params, &UrlOptions::default())?;
        let headers = if body.is_some() {
            vec![("content-type".to_string(), JSON_CONTENT_TYPE.to_string())]
        } else {
            Vec::new()
        };
        tracing::debug!(%method, template, params = params.len(), "built request");
        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }
}

fn to_json<B: Serialize + ?Sized>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn form_encode(value: &str) -> String {
    utf8_percent_encode(value, FORM_FIELD).to_string()
}

/// Map non-success status codes to the appropriate `ApiError` variant.
pub(crate) fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    tracing::debug!(status = response.status, "received response");
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
