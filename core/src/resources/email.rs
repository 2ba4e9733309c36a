//! HubSpot transactional (single send) email.

use serde_json::{json, Value};

use crate::client::HubSpotClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::params::Params;
use crate::properties::{to_records, PropertyHash};

pub const SINGLE_SEND_EMAIL_PATH: &str = "/email/public/v1/singleEmail/send";

const IDENTITY_KEY: &str = "name";

impl HubSpotClient {
    /// Send email template `email_id`. `message` carries the recipient
    /// (`to`, `from`, ...); both property maps are sent keyed on `name`.
    pub fn build_send_email(
        &self,
        email_id: i64,
        message: &Value,
        custom_properties: &PropertyHash,
        contact_properties: &PropertyHash,
    ) -> Result<HttpRequest, ApiError> {
        let body = json!({
            "emailId": email_id,
            "message": message,
            "contactProperties": to_records(contact_properties, IDENTITY_KEY),
            "customProperties": to_records(custom_properties, IDENTITY_KEY),
        });
        self.build_post_json(SINGLE_SEND_EMAIL_PATH, &Params::new(), Some(&body))
    }

    pub fn parse_send_email(&self, response: HttpResponse) -> Result<Value, ApiError> {
        self.parse_json(response)
    }
}
