//! Client configuration: API key, portal id and base URL override.
//!
//! # Design
//! Configuration is an explicit value owned by `HubSpotClient` rather than
//! process-wide state. It is expected to be set once and read many times;
//! changing it requires `&mut` access to the client, so a reconfiguration can
//! never race a URL build.

/// Origin used when neither the call nor the configuration overrides it.
pub const DEFAULT_BASE_URL: &str = "https://api.hubapi.com";

pub const API_KEY_ENV: &str = "HUBSPOT_API_KEY";
pub const PORTAL_ID_ENV: &str = "HUBSPOT_PORTAL_ID";
pub const BASE_URL_ENV: &str = "HUBSPOT_BASE_URL";

/// API credentials and endpoint settings.
///
/// `Config::default()` is the unconfigured state: every URL build fails with
/// `BuildError::ConfigurationError` until an API key is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    api_key: Option<String>,
    portal_id: Option<String>,
    base_url: Option<String>,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    pub fn with_portal_id(mut self, portal_id: impl ToString) -> Self {
        self.portal_id = Some(portal_id.to_string());
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.trim_end_matches('/').to_string());
        self
    }

    /// Read configuration from `HUBSPOT_API_KEY`, `HUBSPOT_PORTAL_ID` and
    /// `HUBSPOT_BASE_URL`. Missing variables stay unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::from_env`] but with a caller-supplied lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());
        Self {
            api_key: non_empty(API_KEY_ENV),
            portal_id: non_empty(PORTAL_ID_ENV),
            base_url: non_empty(BASE_URL_ENV).map(|u| u.trim_end_matches('/').to_string()),
        }
    }

    /// Drop every setting, returning to the unconfigured state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn portal_id(&self) -> Option<&str> {
        self.portal_id.as_deref()
    }

    /// The configured origin, or [`DEFAULT_BASE_URL`].
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }
}
