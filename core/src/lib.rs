//! Synchronous client core for the HubSpot CRM REST API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, so every URL and body can be checked without a
//! live portal.
//!
//! # Design
//! - [`url::build_url`] expands `:name` path templates, renders the leftover
//!   parameters as the query string and appends the `hapikey` last.
//! - [`properties`] converts between HubSpot's `[{property, value}]` records
//!   and the flat [`PropertyHash`] the resource records carry.
//! - `HubSpotClient` holds an explicit [`Config`] instead of process-wide
//!   state. Resource endpoints live in [`resources`] as further
//!   `build_*`/`parse_*` pairs on the client.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod params;
pub mod properties;
pub mod resources;
pub mod url;

pub use client::HubSpotClient;
pub use config::Config;
pub use error::{ApiError, BuildError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::{ParamValue, Params, Scalar};
pub use properties::{PropertyHash, PropertyRecord};
pub use resources::blog::{Blog, BlogPost};
pub use resources::company::Company;
pub use resources::contact::{Contact, ContactUpsert};
pub use resources::contact_list::ContactList;
pub use resources::deal::Deal;
pub use resources::engagement::{Engagement, EngagementPage};
pub use resources::form::Form;
pub use resources::property_schema::{PropertySchema, SchemaKind};
pub use resources::topic::Topic;
pub use url::UrlOptions;
