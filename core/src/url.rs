//! URL builder: path template interpolation and query-string encoding.
//!
//! # Design
//! A template such as `/contacts/v1/contact/vid/:contact_id/profile` is split
//! into literal text and `:name` placeholders by a small scanner. Each
//! placeholder is filled from the caller's parameters (falling back to the
//! configuration for `portal_id` and `hapikey`), and whatever parameters are
//! left over become the query string, in insertion order. The auth key always
//! comes last.
//!
//! The builder borrows its inputs and works on a private copy of the
//! parameters, so the caller's mapping is never mutated.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::Config;
use crate::error::BuildError;
use crate::params::{ParamValue, Params, Scalar};

/// Characters left untouched in path segments and query components.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Query key carrying the API key.
pub const AUTH_PARAM: &str = "hapikey";
/// Placeholder and query key filled from the configured portal.
pub const PORTAL_ID_PARAM: &str = "portal_id";
/// Query key the tracking endpoint expects the portal id under.
pub const TRACK_PORTAL_PARAM: &str = "_a";

const BATCH_PREFIX: &str = "batch_";

/// Per-call overrides for [`build_url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlOptions {
    /// Replaces the configured origin verbatim.
    pub base_url: Option<String>,
    /// Append `hapikey=<key>`. On by default.
    pub hapikey: bool,
    /// Append `_a=<portal id>` ahead of the auth key.
    pub portal_id_param: bool,
}

impl Default for UrlOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            hapikey: true,
            portal_id_param: false,
        }
    }
}

impl UrlOptions {
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.trim_end_matches('/').to_string());
        self
    }

    pub fn without_hapikey(mut self) -> Self {
        self.hapikey = false;
        self
    }

    pub fn with_portal_id_param(mut self) -> Self {
        self.portal_id_param = true;
        self
    }
}

/// A piece of a path template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'t> {
    Literal(&'t str),
    Placeholder(&'t str),
}

/// Split a template into literal runs and `:name` placeholders.
///
/// A placeholder name is `[A-Za-z_][A-Za-z0-9_]*`; a colon not followed by a
/// name start is kept as literal text.
pub fn tokenize(template: &str) -> Vec<Token<'_>> {
    let bytes = template.as_bytes();
    let mut tokens = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let starts_ident = bytes
            .get(i + 1)
            .is_some_and(|b| b.is_ascii_alphabetic() || *b == b'_');
        if bytes[i] != b':' || !starts_ident {
            i += 1;
            continue;
        }

        if literal_start < i {
            tokens.push(Token::Literal(&template[literal_start..i]));
        }
        let name_start = i + 1;
        let mut end = name_start;
        while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
            end += 1;
        }
        tokens.push(Token::Placeholder(&template[name_start..end]));
        literal_start = end;
        i = end;
    }

    if literal_start < bytes.len() {
        tokens.push(Token::Literal(&template[literal_start..]));
    }
    tokens
}

/// Names of every placeholder in `template`, in order of appearance.
pub fn placeholders(template: &str) -> Vec<&str> {
    tokenize(template)
        .into_iter()
        .filter_map(|t| match t {
            Token::Placeholder(name) => Some(name),
            Token::Literal(_) => None,
        })
        .collect()
}

/// Render `template` and `params` into an absolute URL.
///
/// Fails with [`BuildError::ConfigurationError`] whenever `config` carries no
/// API key, regardless of whether this particular call would send it.
pub fn build_url(
    template: &str,
    params: &Params,
    config: &Config,
    options: &UrlOptions,
) -> Result<String, BuildError> {
    let api_key = config
        .api_key()
        .ok_or_else(|| BuildError::ConfigurationError("hapikey is not configured".to_string()))?;

    let mut remaining = params.clone();
    let path = interpolate(template, &mut remaining, config, api_key)?;
    // The configured key is the only one sent, and always last.
    remaining.remove(AUTH_PARAM);

    let mut pairs: Vec<(String, String)> = Vec::new();
    for (key, value) in remaining.iter() {
        push_query_pairs(&mut pairs, key, value);
    }
    if options.portal_id_param {
        let portal_id = require_portal_id(config)?;
        pairs.push((TRACK_PORTAL_PARAM.to_string(), encode(portal_id)));
    }
    if options.hapikey {
        pairs.push((AUTH_PARAM.to_string(), encode(api_key)));
    }

    let base_url = options.base_url.as_deref().unwrap_or_else(|| config.base_url());
    let mut url = format!("{base_url}{path}");
    if !pairs.is_empty() {
        url.push(if path.contains('?') { '&' } else { '?' });
        let query: Vec<String> = pairs.into_iter().map(|(k, v)| format!("{k}={v}")).collect();
        url.push_str(&query.join("&"));
    }

    tracing::trace!(template, url = %redact(&url, api_key), "rendered url");
    Ok(url)
}

fn interpolate(
    template: &str,
    remaining: &mut Params,
    config: &Config,
    api_key: &str,
) -> Result<String, BuildError> {
    let mut path = String::with_capacity(template.len());
    for token in tokenize(template) {
        match token {
            Token::Literal(text) => path.push_str(text),
            Token::Placeholder(name) => {
                let value = match remaining.remove(name) {
                    Some(value) => path_value(name, &value)?,
                    None if name == PORTAL_ID_PARAM => require_portal_id(config)?.to_string(),
                    None if name == AUTH_PARAM => api_key.to_string(),
                    None => return Err(BuildError::MissingInterpolation(name.to_string())),
                };
                path.push_str(&encode(&value));
            }
        }
    }
    Ok(path)
}

fn path_value(name: &str, value: &ParamValue) -> Result<String, BuildError> {
    match value {
        ParamValue::Scalar(s) => Ok(s.to_string()),
        ParamValue::Time(t) => Ok(t.timestamp_millis().to_string()),
        ParamValue::Range { .. } | ParamValue::List(_) => {
            Err(BuildError::InvalidPathValue(name.to_string()))
        }
    }
}

fn require_portal_id(config: &Config) -> Result<&str, BuildError> {
    config
        .portal_id()
        .ok_or_else(|| BuildError::ConfigurationError("portal_id is not configured".to_string()))
}

fn push_query_pairs(pairs: &mut Vec<(String, String)>, key: &str, value: &ParamValue) {
    let key = encode(&query_key(key));
    match value {
        ParamValue::Scalar(s) => pairs.push((key, encode_scalar(s))),
        ParamValue::Time(t) => pairs.push((key, t.timestamp_millis().to_string())),
        ParamValue::Range { start, end } => {
            pairs.push((key.clone(), start.timestamp_millis().to_string()));
            pairs.push((key, end.timestamp_millis().to_string()));
        }
        ParamValue::List(items) => {
            for item in items {
                pairs.push((key.clone(), encode_scalar(item)));
            }
        }
    }
}

/// Map a parameter name to the key HubSpot expects on the wire.
///
/// `batch_` names are stripped of the prefix and aliased per endpoint; an
/// unknown batch name keeps its stripped form.
pub fn query_key(name: &str) -> String {
    match name.strip_prefix(BATCH_PREFIX) {
        Some("list_id") => "listId".to_string(),
        Some(stripped) => stripped.to_string(),
        None => name.to_string(),
    }
}

fn encode_scalar(value: &Scalar) -> String {
    match value {
        Scalar::Str(s) => encode(s),
        other => other.to_string(),
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

fn redact(url: &str, api_key: &str) -> String {
    if api_key.is_empty() {
        return url.to_string();
    }
    url.replace(&encode(api_key), "***")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn config() -> Config {
        Config::new("demo").with_portal_id("62515")
    }

    fn build(template: &str, params: &Params) -> Result<String, BuildError> {
        build_url(template, params, &config(), &UrlOptions::default())
    }

    #[test]
    fn tokenize_splits_literals_and_placeholders() {
        assert_eq!(
            tokenize("/test/:email/:id/profile"),
            vec![
                Token::Literal("/test/"),
                Token::Placeholder("email"),
                Token::Literal("/"),
                Token::Placeholder("id"),
                Token::Literal("/profile"),
            ]
        );
    }

    #[test]
    fn tokenize_keeps_bare_colons_literal() {
        assert_eq!(tokenize("/a:/b::1"), vec![Token::Literal("/a:/b::1")]);
        assert_eq!(placeholders("/x/:_a1/y"), vec!["_a1"]);
        assert!(placeholders("/contacts/v1/contact").is_empty());
    }

    #[test]
    fn interpolates_and_encodes_path_values() {
        let params = Params::new().with("email", "email@address.com");
        assert_eq!(
            build("/test/:email/profile", &params).unwrap(),
            "https://api.hubapi.com/test/email%40address.com/profile?hapikey=demo"
        );
    }

    #[test]
    fn interpolates_multiple_placeholders() {
        let params = Params::new().with("email", "email@address.com").with("id", 1234);
        assert_eq!(
            build("/test/:email/:id/profile", &params).unwrap(),
            "https://api.hubapi.com/test/email%40address.com/1234/profile?hapikey=demo"
        );
    }

    #[test]
    fn leftover_params_become_query_before_auth() {
        let params = Params::new().with("email", "email@address.com").with("id", 1234);
        assert_eq!(
            build("/test/:email/profile", &params).unwrap(),
            "https://api.hubapi.com/test/email%40address.com/profile?id=1234&hapikey=demo"
        );
    }

    #[test]
    fn portal_id_comes_from_configuration() {
        assert_eq!(
            build("/test/:portal_id/profile", &Params::new()).unwrap(),
            "https://api.hubapi.com/test/62515/profile?hapikey=demo"
        );
    }

    #[test]
    fn caller_portal_id_wins_over_configuration() {
        let params = Params::new().with("portal_id", 1);
        assert_eq!(
            build("/test/:portal_id", &params).unwrap(),
            "https://api.hubapi.com/test/1?hapikey=demo"
        );
    }

    #[test]
    fn unconfigured_portal_id_is_a_configuration_error() {
        let err = build_url(
            "/test/:portal_id/profile",
            &Params::new(),
            &Config::new("demo"),
            &UrlOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::ConfigurationError(_)));
    }

    #[test]
    fn missing_placeholder_is_an_interpolation_error() {
        let err = build("/test/:email/profile", &Params::new()).unwrap_err();
        assert_eq!(err, BuildError::MissingInterpolation("email".to_string()));
    }

    #[test]
    fn unconfigured_client_fails_even_without_placeholders() {
        let err = build_url("/test/emails", &Params::new(), &Config::default(), &UrlOptions::default())
            .unwrap_err();
        assert!(matches!(err, BuildError::ConfigurationError(_)));

        let options = UrlOptions::default().without_hapikey();
        let err = build_url("/test/emails", &Params::new(), &Config::default(), &options).unwrap_err();
        assert!(matches!(err, BuildError::ConfigurationError(_)));
    }

    #[test]
    fn configuration_error_is_checked_before_interpolation() {
        let err = build_url("/test/:email", &Params::new(), &Config::default(), &UrlOptions::default())
            .unwrap_err();
        assert!(matches!(err, BuildError::ConfigurationError(_)));
    }

    #[test]
    fn caller_params_are_not_mutated() {
        let params = Params::new().with("email", "test").with("id", 1);
        let before = params.clone();
        build("/test/:email/profile", &params).unwrap();
        assert_eq!(params, before);
    }

    #[test]
    fn time_is_rendered_as_epoch_millis() {
        let start = Utc.with_ymd_and_hms(2014, 10, 10, 0, 0, 0).unwrap();
        let params = Params::new().with("email", "e@x.com").with("id", 1234).with("start", start);
        assert_eq!(
            build("/test/:email/profile", &params).unwrap(),
            "https://api.hubapi.com/test/e%40x.com/profile?id=1234&start=1412899200000&hapikey=demo"
        );
    }

    #[test]
    fn range_repeats_key_start_then_end() {
        let start = Utc.with_ymd_and_hms(2014, 10, 10, 0, 0, 0).unwrap();
        let end = start + Duration::days(1);
        let params = Params::new().with("created__range", start..=end);
        let url = build("/test/posts", &params).unwrap();
        assert_eq!(
            url,
            "https://api.hubapi.com/test/posts?created__range=1412899200000&created__range=1412985600000&hapikey=demo"
        );
    }

    #[test]
    fn batch_email_expands_to_repeated_keys() {
        let params = Params::new().with("batch_email", vec!["email1@example.com", "email2@example.com"]);
        assert_eq!(
            build("/test/emails", &params).unwrap(),
            "https://api.hubapi.com/test/emails?email=email1%40example.com&email=email2%40example.com&hapikey=demo"
        );
    }

    #[test]
    fn batch_list_id_is_aliased() {
        let params = Params::new().with("batch_list_id", vec![1, 2, 3]);
        assert_eq!(
            build("/contacts/v1/lists/batch", &params).unwrap(),
            "https://api.hubapi.com/contacts/v1/lists/batch?listId=1&listId=2&listId=3&hapikey=demo"
        );
    }

    #[test]
    fn batch_key_aliases() {
        assert_eq!(query_key("batch_vid"), "vid");
        assert_eq!(query_key("batch_utk"), "utk");
        assert_eq!(query_key("batch_email"), "email");
        assert_eq!(query_key("batch_list_id"), "listId");
        assert_eq!(query_key("count"), "count");
    }

    #[test]
    fn plain_list_repeats_its_own_key() {
        let params = Params::new().with("property", vec!["email", "firstname"]);
        assert_eq!(
            build("/contacts", &params).unwrap(),
            "https://api.hubapi.com/contacts?property=email&property=firstname&hapikey=demo"
        );
    }

    #[test]
    fn base_url_override_without_auth_key() {
        let options = UrlOptions::default().with_base_url("https://cool.com").without_hapikey();
        let params = Params::new().with("email", "test");
        assert_eq!(
            build_url("/test/:email/profile", &params, &config(), &options).unwrap(),
            "https://cool.com/test/test/profile"
        );
    }

    #[test]
    fn configured_base_url_is_used_by_default() {
        let config = Config::new("demo").with_base_url("http://localhost:3000");
        assert_eq!(
            build_url("/x", &Params::new(), &config, &UrlOptions::default()).unwrap(),
            "http://localhost:3000/x?hapikey=demo"
        );
    }

    #[test]
    fn tracking_appends_portal_after_params() {
        let options = UrlOptions::default()
            .with_base_url("http://track.hubspot.com")
            .without_hapikey()
            .with_portal_id_param();
        let params = Params::new().with("email", "testingapis@hubspot.com").with("_n", "000000001625");
        assert_eq!(
            build_url("/v1/event/", &params, &config(), &options).unwrap(),
            "http://track.hubspot.com/v1/event/?email=testingapis%40hubspot.com&_n=000000001625&_a=62515"
        );
    }

    #[test]
    fn existing_query_in_template_is_extended() {
        let params = Params::new().with("count", 2);
        assert_eq!(
            build("/x?a=1", &params).unwrap(),
            "https://api.hubapi.com/x?a=1&count=2&hapikey=demo"
        );
    }

    #[test]
    fn list_in_path_is_rejected() {
        let params = Params::new().with("id", vec![1, 2]);
        let err = build("/x/:id", &params).unwrap_err();
        assert_eq!(err, BuildError::InvalidPathValue("id".to_string()));
    }

    #[test]
    fn caller_hapikey_in_query_is_replaced_by_configured_key() {
        let params = Params::new().with("hapikey", "other").with("count", 1);
        let url = build("/x", &params).unwrap();
        assert_eq!(url, "https://api.hubapi.com/x?count=1&hapikey=demo");
        assert_eq!(url.matches("hapikey=").count(), 1);
    }

    #[test]
    fn caller_hapikey_is_dropped_when_key_is_not_sent() {
        let params = Params::new().with("hapikey", "other").with("email", "a@x.com");
        let options = UrlOptions::default().without_hapikey();
        assert_eq!(
            build_url("/v1/event/", &params, &config(), &options).unwrap(),
            "https://api.hubapi.com/v1/event/?email=a%40x.com"
        );
    }

    #[test]
    fn spaces_and_reserved_characters_are_encoded() {
        let params = Params::new().with("name", "a b/c").with("q", "x&y=z");
        assert_eq!(
            build("/n/:name", &params).unwrap(),
            "https://api.hubapi.com/n/a%20b%2Fc?q=x%26y%3Dz&hapikey=demo"
        );
    }
}
